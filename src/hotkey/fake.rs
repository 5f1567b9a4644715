use super::manager::{HotkeyChord, HotkeyMonitor};
use crate::error::AppError;

/// Returns immediately, as if the chord had been pressed, unless told to fail.
#[derive(Default)]
pub struct FakeHotkey {
    pub waits: Vec<HotkeyChord>,
    pub fail_install: bool,
}

impl FakeHotkey {
    pub fn failing() -> Self {
        Self {
            waits: Vec::new(),
            fail_install: true,
        }
    }
}

impl HotkeyMonitor for FakeHotkey {
    fn wait_for(&mut self, chord: HotkeyChord) -> Result<(), AppError> {
        self.waits.push(chord);
        if self.fail_install {
            return Err(AppError::HotkeyMonitor(
                "Failed to create event tap (enable Input Monitoring?).".into(),
            ));
        }
        Ok(())
    }
}
