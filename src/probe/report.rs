use std::fmt;

use serde::Serialize;

use crate::accessibility::text::{
    read_selected_range, read_selected_text, read_string_for_range, total_characters, utf16_len,
    value_or_empty,
};
use crate::accessibility::{is_text_input_role, AccessibilityApi, SelectionRange};
use crate::error::AppError;

/// `(left, right)` bounds of the context shown around `caret`.
/// `right` never drops below `left`, even if the caret sits past `total`.
pub fn context_bounds(caret: usize, total: usize, radius: usize) -> (usize, usize) {
    let left = caret.saturating_sub(radius);
    let right = total.min(caret.saturating_add(radius)).max(left);
    (left, right)
}

/// Final state of one probe run, assembled whatever the mutation steps did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    pub role: String,
    pub role_ok: bool,
    pub direct_set_ok: bool,
    pub direct_set_error: Option<String>,
    pub replace_ok: bool,
    pub replace_error: Option<String>,
    /// Span the replace step wrote over, when it got that far.
    pub replaced_range: Option<SelectionRange>,
    pub selected_text: String,
    pub caret: usize,
    pub context_left: usize,
    pub context_right: usize,
    pub context: String,
}

impl ProbeReport {
    pub fn collect<A: AccessibilityApi>(
        ax: &A,
        element: &A::Element,
        role: &str,
        direct_set: Result<(), AppError>,
        replace: Result<SelectionRange, AppError>,
        context_radius: usize,
    ) -> Self {
        let selected_text = read_selected_text(ax, element);
        let range = read_selected_range(ax, element)
            .unwrap_or_else(|| SelectionRange::caret(utf16_len(&value_or_empty(ax, element))));
        let caret = range.location;

        let total = total_characters(ax, element);
        let (left, right) = context_bounds(caret, total, context_radius);
        let context = read_string_for_range(ax, element, SelectionRange::new(left, right - left));

        let (replace_ok, replace_error, replaced_range) = match replace {
            Ok(range) => (true, None, Some(range)),
            Err(e) => (false, Some(e.to_string()), None),
        };

        Self {
            role: role.to_string(),
            role_ok: is_text_input_role(role),
            direct_set_ok: direct_set.is_ok(),
            direct_set_error: direct_set.err().map(|e| e.to_string()),
            replace_ok,
            replace_error,
            replaced_range,
            selected_text,
            caret,
            context_left: left,
            context_right: right,
            context,
        }
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== AX TEXT TEST REPORT ===")?;
        writeln!(f, "Text role OK: {}", self.role_ok)?;
        writeln!(f, "Direct set value success: {}", self.direct_set_ok)?;
        writeln!(f, "Replace selection success: {}", self.replace_ok)?;
        writeln!(f, "Selected text (now): {:?}", self.selected_text)?;
        writeln!(f, "Caret index (if length==0): {}", self.caret)?;
        writeln!(
            f,
            "Context [{}:{}]: {:?}",
            self.context_left, self.context_right, self.context
        )?;
        writeln!(f, "===========================")
    }
}
