pub mod manager;

#[cfg(test)]
pub mod fake;

#[cfg(target_os = "macos")]
pub mod macos;

pub use manager::{HotkeyChord, HotkeyMonitor};

use crate::error::AppError;

/// Create the event-tap backed monitor for this platform.
pub fn create_monitor() -> Result<Box<dyn HotkeyMonitor>, AppError> {
    #[cfg(target_os = "macos")]
    return Ok(Box::new(macos::EventTapMonitor));

    #[cfg(not(target_os = "macos"))]
    Err(AppError::UnsupportedPlatform(
        "global hotkey monitoring requires macOS".to_string(),
    ))
}
