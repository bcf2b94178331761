//! Image captioning adapters

pub mod gemini;

pub use gemini::{GeminiCaptioner, GeminiCaptionerFactory};
