use thiserror::Error;

/// Faults the interpreter can raise. All of them are unrecoverable for the
/// running program; the driver decides whether to tear down the process or
/// just this machine instance.
#[derive(Debug, Error)]
pub enum VmError {
    #[error("unrecognized opcode {0:#06X}")]
    DecodeFault(u16),

    #[error("{entity} value {value} outside [0, {max}]")]
    OutOfRange {
        entity: &'static str,
        value: usize,
        max: usize,
    },

    #[error("ROM of {size} bytes does not fit in {capacity} bytes of program space")]
    LoadTooLarge { size: usize, capacity: usize },

    #[error("ROM not found at {path}")]
    ResourceNotFound { path: String },

    #[error("failed to read ROM: {0}")]
    Io(#[from] std::io::Error),
}
