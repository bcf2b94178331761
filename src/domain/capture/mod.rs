//! Capture session state machine

pub mod state;

pub use state::{CapturePhase, CaptureStateMachine, InvalidCaptureTransition};
