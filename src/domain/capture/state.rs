//! Recording state machine for the recorded-audio slot

use std::fmt;
use thiserror::Error;

/// Capture phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CapturePhase {
    #[default]
    Idle,
    Recording,
}

impl CapturePhase {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
        }
    }
}

impl fmt::Display for CapturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid capture transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid capture transition: cannot {action} while in {current_phase} state")]
pub struct InvalidCaptureTransition {
    pub current_phase: CapturePhase,
    pub action: String,
}

/// Capture state machine entity.
///
/// State machine:
///   IDLE -> RECORDING (start)
///   RECORDING -> IDLE (stop)
///
/// Stopping while idle is a no-op rather than an error: the control
/// surface may invoke stop redundantly.
#[derive(Debug, Default)]
pub struct CaptureStateMachine {
    phase: CapturePhase,
}

impl CaptureStateMachine {
    /// Create a new state machine in idle phase
    pub fn new() -> Self {
        Self {
            phase: CapturePhase::Idle,
        }
    }

    /// Get the current phase
    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    /// Check if currently idle
    pub fn is_idle(&self) -> bool {
        self.phase == CapturePhase::Idle
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.phase == CapturePhase::Recording
    }

    /// Transition from IDLE to RECORDING.
    /// Only one recording session may be open at a time.
    pub fn start(&mut self) -> Result<(), InvalidCaptureTransition> {
        if self.phase != CapturePhase::Idle {
            return Err(InvalidCaptureTransition {
                current_phase: self.phase,
                action: "start recording".to_string(),
            });
        }
        self.phase = CapturePhase::Recording;
        Ok(())
    }

    /// Transition from RECORDING to IDLE.
    /// Returns true if a recording was actually in progress; stopping
    /// while idle returns false with no state change.
    pub fn stop(&mut self) -> bool {
        if self.phase == CapturePhase::Recording {
            self.phase = CapturePhase::Idle;
            true
        } else {
            false
        }
    }
}
