//! Logging setup.
//!
//! Records go through the `log` facade into `tui-logger`, which buffers them
//! until the log panel draws them.

use crate::error::AppError;
use log::LevelFilter;

/// Timestamp layout of log panel lines.
///
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";

/// Install the global logger at the given level. Fails when a logger is
/// already installed.
///
pub fn init(level: LevelFilter) -> Result<(), AppError> {
    tui_logger::init_logger(level).map_err(|e| AppError::Logger(e.to_string()))?;
    tui_logger::set_default_level(level);
    Ok(())
}

/// Move records logged since the last call into the panel buffer.
///
pub fn collect() {
    tui_logger::move_events();
}
