//! Configuration and simulation error types.
//!
//! Level and tuning problems are fatal at load time and surface before the
//! first tick. Runtime failures abort the current frame.

use std::fmt;

/// A level file that cannot be played.
#[derive(Debug)]
pub enum LevelError {
    /// Level source could not be read.
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Level source is not valid level JSON.
    Parse(serde_json::Error),
    /// The level defines no gravity wells at all.
    NoWells,
    /// The level has nowhere to put the cat.
    NoTargetSpawns,
    /// A viewport fraction is non-finite or outside [0, 1].
    FractionOutOfRange {
        field: &'static str,
        index: Option<usize>,
        value: (f32, f32),
    },
    /// A well strength is negative or non-finite.
    InvalidStrength { index: usize, value: f32 },
    /// No built-in level with this number.
    UnknownLevel(u32),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io { path, source } => {
                write!(f, "failed to read level '{}': {}", path, source)
            }
            LevelError::Parse(e) => write!(f, "malformed level data: {}", e),
            LevelError::NoWells => write!(f, "level has no gravity wells"),
            LevelError::NoTargetSpawns => write!(f, "level has no target spawn positions"),
            LevelError::FractionOutOfRange { field, index, value } => match index {
                Some(i) => write!(
                    f,
                    "{}[{}] = ({}, {}) is not a viewport fraction in [0, 1]",
                    field, i, value.0, value.1
                ),
                None => write!(
                    f,
                    "{} = ({}, {}) is not a viewport fraction in [0, 1]",
                    field, value.0, value.1
                ),
            },
            LevelError::InvalidStrength { index, value } => {
                write!(f, "wells[{}] has invalid strength {}", index, value)
            }
            LevelError::UnknownLevel(n) => write!(f, "no built-in level {}", n),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io { source, .. } => Some(source),
            LevelError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Parse(e)
    }
}

/// Balance values outside their safe operating range.
#[derive(Debug)]
pub enum TuningError {
    Parse(serde_json::Error),
    NonPositive { name: &'static str, value: f32 },
    Negative { name: &'static str, value: f32 },
    /// Value must be strictly greater than `bound`.
    NotAbove {
        name: &'static str,
        value: f32,
        bound: f32,
    },
    InvertedRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "malformed tuning data: {}", e),
            TuningError::NonPositive { name, value } => {
                write!(f, "{} must be positive, got {}", name, value)
            }
            TuningError::Negative { name, value } => {
                write!(f, "{} must not be negative, got {}", name, value)
            }
            TuningError::NotAbove { name, value, bound } => {
                write!(f, "{} must be greater than {}, got {}", name, bound, value)
            }
            TuningError::InvertedRange { name, min, max } => {
                write!(f, "{} range is inverted: [{}, {}]", name, min, max)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Top-level error for a running simulation.
#[derive(Debug)]
pub enum SimError {
    Level(LevelError),
    Tuning(TuningError),
    /// Body would have a non-positive or non-finite mass or radius.
    InvalidBody { mass: f32, radius: f32 },
    /// A signal handler refused the signal; remaining handlers were skipped.
    Handler {
        signal: &'static str,
        message: String,
    },
}

impl SimError {
    pub fn handler(signal: &'static str, message: impl Into<String>) -> Self {
        SimError::Handler {
            signal,
            message: message.into(),
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Level(e) => write!(f, "level error: {}", e),
            SimError::Tuning(e) => write!(f, "tuning error: {}", e),
            SimError::InvalidBody { mass, radius } => write!(
                f,
                "invalid body: mass {} and radius {} must be positive and finite",
                mass, radius
            ),
            SimError::Handler { signal, message } => {
                write!(f, "handler for '{}' failed: {}", signal, message)
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Level(e) => Some(e),
            SimError::Tuning(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LevelError> for SimError {
    fn from(e: LevelError) -> Self {
        SimError::Level(e)
    }
}

impl From<TuningError> for SimError {
    fn from(e: TuningError) -> Self {
        SimError::Tuning(e)
    }
}
