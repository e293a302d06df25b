pub mod consts;
pub mod core;
pub mod error;
pub mod external;
pub mod utils;

pub use crate::core::cpu::{Cpu, StepOutcome};
pub use crate::core::machine::{FrameBuffer, Keypad, Machine};
pub use crate::core::rom::Rom;
pub use crate::error::VmError;
