//! Best-effort text reads over an [`AccessibilityApi`].
//!
//! Only [`read_value`] propagates its error; every other read degrades to an
//! empty or absent value and leaves a log line behind.

use super::{AccessibilityApi, SelectionRange};
use crate::error::AppError;

/// Length of `text` in UTF-16 code units, the unit AX ranges are counted in.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

pub fn read_value<A: AccessibilityApi>(ax: &A, element: &A::Element) -> Result<String, AppError> {
    ax.value(element)
}

pub fn value_or_empty<A: AccessibilityApi>(ax: &A, element: &A::Element) -> String {
    match ax.value(element) {
        Ok(value) => value,
        Err(e) => {
            crate::app_log!("[ax] value read failed, treating as empty: {e}");
            String::new()
        }
    }
}

/// Not every control exposes selected text directly.
pub fn read_selected_text<A: AccessibilityApi>(ax: &A, element: &A::Element) -> String {
    match ax.selected_text(element) {
        Ok(text) => text,
        Err(e) => {
            crate::app_log!("[ax] selected text unavailable: {e}");
            String::new()
        }
    }
}

pub fn read_selected_range<A: AccessibilityApi>(
    ax: &A,
    element: &A::Element,
) -> Option<SelectionRange> {
    match ax.selected_range(element) {
        Ok(range) => range,
        Err(e) => {
            crate::app_log!("[ax] selected range unavailable: {e}");
            None
        }
    }
}

/// `None` when the control does not expose a character count.
pub fn read_number_of_characters<A: AccessibilityApi>(
    ax: &A,
    element: &A::Element,
) -> Option<usize> {
    match ax.number_of_characters(element) {
        Ok(count) => Some(count),
        Err(e) => {
            crate::app_log!("[ax] number of characters unavailable: {e}");
            None
        }
    }
}

/// Character count, or the UTF-16 length of the current value when the
/// control does not report one.
pub fn total_characters<A: AccessibilityApi>(ax: &A, element: &A::Element) -> usize {
    read_number_of_characters(ax, element)
        .unwrap_or_else(|| utf16_len(&value_or_empty(ax, element)))
}

pub fn read_string_for_range<A: AccessibilityApi>(
    ax: &A,
    element: &A::Element,
    range: SelectionRange,
) -> String {
    match ax.string_for_range(element, range) {
        Ok(text) => text,
        Err(e) => {
            crate::app_log!(
                "[ax] string for range ({}, {}) unavailable: {e}",
                range.location,
                range.length
            );
            String::new()
        }
    }
}
