use serde::{Deserialize, Serialize};

use crate::hotkey::HotkeyChord;

/// Constants driving one probe run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeConfig {
    /// Appended to the whole value by the direct-set step.
    pub direct_set_marker: String,
    /// Written in place of the selection by the replace step.
    pub replace_marker: String,
    /// Characters shown on each side of the caret in the report.
    pub context_radius: usize,
    pub hotkey: HotkeyChord,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            direct_set_marker: "<<DIRECT SET VALUE>>".into(),
            replace_marker: "<<REPLACED SELECTION>>".into(),
            context_radius: 20,
            hotkey: HotkeyChord::cmd_opt_t(),
        }
    }
}
