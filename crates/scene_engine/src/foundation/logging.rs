//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
pub fn init() {
    env_logger::init();
}

/// Initialize logging unless a logger is already installed
///
/// Hosts that bring their own logger and test binaries that initialise
/// repeatedly use this variant.
pub fn try_init() -> bool {
    env_logger::try_init().is_ok()
}
