use serde::{Deserialize, Serialize};

use crate::error::AppError;

// kCGEventFlagMaskCommand = NX_COMMANDMASK = 1 << 20
pub const FLAG_MASK_COMMAND: u64 = 1 << 20;
// kCGEventFlagMaskAlternate = NX_ALTERNATEMASK = 1 << 19
pub const FLAG_MASK_ALTERNATE: u64 = 1 << 19;
// kCGEventFlagMaskShift = 1 << 17, kCGEventFlagMaskControl = 1 << 18
pub const FLAG_MASK_SHIFT: u64 = 1 << 17;
pub const FLAG_MASK_CONTROL: u64 = 1 << 18;
// kVK_ANSI_T
pub const VK_ANSI_T: u16 = 17;

fn key_name(keycode: u16) -> Option<&'static str> {
    match keycode {
        VK_ANSI_T => Some("T"),
        _ => None,
    }
}

/// A key plus the modifier bits that must all be held.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HotkeyChord {
    pub keycode: u16,
    pub modifiers: u64,
}

impl HotkeyChord {
    pub fn new(keycode: u16, modifiers: u64) -> Self {
        Self { keycode, modifiers }
    }

    /// ⌘⌥T
    pub fn cmd_opt_t() -> Self {
        Self::new(VK_ANSI_T, FLAG_MASK_COMMAND | FLAG_MASK_ALTERNATE)
    }

    /// Human-readable form in menu order, e.g. `⌥⌘T`.
    pub fn describe(&self) -> String {
        let mut label = String::new();
        for (mask, symbol) in [
            (FLAG_MASK_CONTROL, '⌃'),
            (FLAG_MASK_ALTERNATE, '⌥'),
            (FLAG_MASK_SHIFT, '⇧'),
            (FLAG_MASK_COMMAND, '⌘'),
        ] {
            if self.modifiers & mask != 0 {
                label.push(symbol);
            }
        }
        match key_name(self.keycode) {
            Some(name) => label.push_str(name),
            None => label.push_str(&format!("<keycode {}>", self.keycode)),
        }
        label
    }

    /// Extra modifiers (shift, caps lock, ...) do not prevent a match.
    pub fn matches(&self, keycode: u16, flags: u64) -> bool {
        keycode == self.keycode && flags & self.modifiers == self.modifiers
    }
}

/// Blocks the calling thread until a chord is seen anywhere in the system.
pub trait HotkeyMonitor {
    fn wait_for(&mut self, chord: HotkeyChord) -> Result<(), AppError>;
}
