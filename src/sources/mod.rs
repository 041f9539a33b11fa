//! Byte source implementations

pub mod replay;
#[cfg(feature = "serial")]
pub mod serial;

pub use replay::ReplaySource;
#[cfg(feature = "serial")]
pub use serial::SerialSource;
