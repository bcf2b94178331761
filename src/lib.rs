//! ReportScribe - multimodal to text report builder CLI
//!
//! This crate captures text, audio, and image inputs, optionally runs an
//! AI image-captioning model on the image, composes everything into a
//! plain-text report, and exports the report as TXT, PDF, or DOCX.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, Gemini, exporters, etc.)
//! - **CLI**: Command-line interface, argument parsing, and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
