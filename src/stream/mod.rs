//! Stream pacing utilities for display consumers

mod pace;

pub use pace::{PaceExt, Paced};
