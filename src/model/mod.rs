//! Domain model types (pure).
//!
//! All types in this module are plain data; none of them perform I/O.

pub mod device;
pub mod error;
pub mod key_action;
pub mod log_line;
pub mod timestamp;

// Re-export for convenience
pub use device::DeviceInfo;
pub use error::{AppError, ExportError, ExtractionError, TransportError};
pub use key_action::KeyAction;
pub use log_line::{LogBuffer, LogLine};
