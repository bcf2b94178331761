//! Infrastructure layer
//!
//! Adapters implementing the application's port interfaces.

pub mod captioning;
pub mod capture;
pub mod config;
pub mod export;
pub mod preview;
