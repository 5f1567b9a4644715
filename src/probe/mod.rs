pub mod report;

use std::io::Write;

use crate::accessibility::text::{
    read_number_of_characters, read_selected_range, read_selected_text, read_string_for_range,
    read_value, total_characters, utf16_len,
};
use crate::accessibility::{is_text_input_role, AccessibilityApi, SelectionRange};
use crate::config::ProbeConfig;
use crate::error::AppError;
use crate::hotkey::HotkeyMonitor;

pub use report::{context_bounds, ProbeReport};

/// How a probe run ended.
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    /// Accessibility trust was missing; the consent prompt has been shown.
    NotTrusted,
    /// The focused control is not a text input, nothing was touched.
    NotTextInput { role: String },
    Completed(ProbeReport),
}

/// Overwrite the whole value with `current` plus `marker`.
///
/// Last writer wins: an edit made by the target application after `current`
/// was read is lost.
pub fn append_marker<A: AccessibilityApi>(
    ax: &A,
    element: &A::Element,
    current: &str,
    marker: &str,
) -> Result<(), AppError> {
    ax.set_value(element, &format!("{current}{marker}"))
}

/// Replace the current selection (or insert at the caret) with `marker`.
///
/// The selection is re-read because some applications move it after a value
/// write. Returns the span that was replaced.
pub fn replace_selection<A: AccessibilityApi>(
    ax: &A,
    element: &A::Element,
    marker: &str,
) -> Result<SelectionRange, AppError> {
    let reported = read_selected_range(ax, element);
    let range = reported.unwrap_or_else(|| SelectionRange::caret(total_characters(ax, element)));

    let count = read_number_of_characters(ax, element);
    let range = match count {
        Some(total) => range.clamped(total),
        None => range,
    };
    crate::app_log!(
        "[probe] replacing range ({}, {}), reported: {}, character count: {:?}",
        range.location,
        range.length,
        reported.is_some(),
        count
    );

    let before = if range.location > 0 {
        read_string_for_range(ax, element, SelectionRange::new(0, range.location))
    } else {
        String::new()
    };
    // Without a character count the tail length is unknown and nothing is kept.
    let after_len = count.map_or(0, |total| total.saturating_sub(range.end()));
    let after = if after_len > 0 {
        read_string_for_range(ax, element, SelectionRange::new(range.end(), after_len))
    } else {
        String::new()
    };

    ax.set_selected_range(element, range)?;
    ax.set_value(element, &format!("{before}{marker}{after}"))?;
    Ok(range)
}

/// Run the full probe against the given accessibility and hotkey backends,
/// printing progress and the final report to `out`.
///
/// A failed hotkey install, a missing focused element and an unreadable
/// initial value are returned as errors before anything is written; mutation
/// failures are printed and recorded in the report.
pub fn run_probe<A, W>(
    ax: &A,
    hotkey: &mut dyn HotkeyMonitor,
    config: &ProbeConfig,
    out: &mut W,
) -> Result<ProbeOutcome, AppError>
where
    A: AccessibilityApi,
    W: Write + ?Sized,
{
    if !ax.is_trusted_or_prompt() {
        crate::app_log!("[probe] process is not trusted for accessibility");
        writeln!(
            out,
            "This script needs Accessibility permission (prompt shown). Rerun after granting."
        )?;
        return Ok(ProbeOutcome::NotTrusted);
    }

    writeln!(
        out,
        "Focus a text field / editor, then press {}...",
        config.hotkey.describe()
    )?;
    out.flush()?;
    hotkey.wait_for(config.hotkey)?;

    let element = ax.focused_element()?;
    let role = ax.role(&element).unwrap_or_else(|e| {
        crate::app_log!("[probe] role unavailable: {e}");
        String::new()
    });
    writeln!(out, "Focused role: {role:?}")?;
    if !is_text_input_role(&role) {
        writeln!(
            out,
            "Focused element is not a text input (AXTextField/AXTextArea/AXTextView). Aborting."
        )?;
        return Ok(ProbeOutcome::NotTextInput { role });
    }

    let initial = read_value(ax, &element)?;
    crate::app_log!(
        "[probe] before mutations: value length {}, selected {:?}, range {:?}, characters {:?}",
        utf16_len(&initial),
        read_selected_text(ax, &element),
        read_selected_range(ax, &element),
        read_number_of_characters(ax, &element)
    );

    let direct_set = append_marker(ax, &element, &initial, &config.direct_set_marker);
    if let Err(e) = &direct_set {
        writeln!(out, "[Direct set] Failed: {e}")?;
    }

    let replace = replace_selection(ax, &element, &config.replace_marker);
    if let Err(e) = &replace {
        writeln!(out, "[Replace selection] Failed: {e}")?;
    }

    let report = ProbeReport::collect(
        ax,
        &element,
        &role,
        direct_set,
        replace,
        config.context_radius,
    );
    write!(out, "\n{report}")?;
    out.flush()?;

    match serde_json::to_string(&report) {
        Ok(json) => crate::logger::log_file_only(format!("[probe] report {json}")),
        Err(e) => crate::app_log!("[probe] could not serialize report: {e}"),
    }

    Ok(ProbeOutcome::Completed(report))
}
