//! In-memory stand-in for the accessibility service used by tests.

use std::cell::{Cell, RefCell};

use super::text::utf16_len;
use super::{AccessibilityApi, SelectionRange, ROLE_TEXT_FIELD};
use crate::error::AppError;

// kAXErrorAttributeUnsupported
const AX_ERROR_ATTRIBUTE_UNSUPPORTED: i32 = -25205;
// kAXErrorCannotComplete
const AX_ERROR_CANNOT_COMPLETE: i32 = -25204;

/// Slice `text` by a UTF-16 range, clamping to the end of the string.
fn utf16_slice(text: &str, range: SelectionRange) -> String {
    let units: Vec<u16> = text.encode_utf16().collect();
    let range = range.clamped(units.len());
    String::from_utf16_lossy(&units[range.location..range.end()])
}

/// What the fake control does with its selection after a value write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAfterWrite {
    /// The previous span survives, clamped to the new text.
    Keep,
    /// The caret jumps to the end of the new text.
    ResetToEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeElement;

pub struct FakeAccessibility {
    trusted: bool,
    focused: bool,
    role: String,
    value: RefCell<String>,
    selection: RefCell<Option<SelectionRange>>,
    reports_selection: bool,
    after_write: SelectionAfterWrite,
    selected_text_supported: bool,
    count_supported: bool,
    range_reads_supported: bool,
    value_reads_fail: bool,
    value_writes_fail: bool,
    selection_writes_fail: bool,
    value_writes: Cell<usize>,
    calls: RefCell<Vec<&'static str>>,
}

impl FakeAccessibility {
    /// A trusted, focused `AXTextField` holding `value` with the caret at the end.
    pub fn new(value: &str) -> Self {
        Self {
            trusted: true,
            focused: true,
            role: ROLE_TEXT_FIELD.to_string(),
            value: RefCell::new(value.to_string()),
            selection: RefCell::new(Some(SelectionRange::caret(utf16_len(value)))),
            reports_selection: true,
            after_write: SelectionAfterWrite::ResetToEnd,
            selected_text_supported: true,
            count_supported: true,
            range_reads_supported: true,
            value_reads_fail: false,
            value_writes_fail: false,
            selection_writes_fail: false,
            value_writes: Cell::new(0),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn untrusted(mut self) -> Self {
        self.trusted = false;
        self
    }

    pub fn without_focus(mut self) -> Self {
        self.focused = false;
        self
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = role.to_string();
        self
    }

    pub fn with_selection(self, range: SelectionRange) -> Self {
        *self.selection.borrow_mut() = Some(range);
        self
    }

    /// The control never answers `AXSelectedTextRange`.
    pub fn without_selection_range(mut self) -> Self {
        self.reports_selection = false;
        self
    }

    pub fn selection_after_write(mut self, policy: SelectionAfterWrite) -> Self {
        self.after_write = policy;
        self
    }

    pub fn without_selected_text(mut self) -> Self {
        self.selected_text_supported = false;
        self
    }

    pub fn without_character_count(mut self) -> Self {
        self.count_supported = false;
        self
    }

    pub fn without_range_reads(mut self) -> Self {
        self.range_reads_supported = false;
        self
    }

    pub fn failing_value_reads(mut self) -> Self {
        self.value_reads_fail = true;
        self
    }

    /// Behaves like a secure or read-only field.
    pub fn read_only(mut self) -> Self {
        self.value_writes_fail = true;
        self
    }

    pub fn failing_selection_writes(mut self) -> Self {
        self.selection_writes_fail = true;
        self
    }

    pub fn stored_value(&self) -> String {
        self.value.borrow().clone()
    }

    pub fn value_writes(&self) -> usize {
        self.value_writes.get()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    /// Number of calls that attempted to change the control.
    pub fn mutation_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(**c, "set_value" | "set_selected_range"))
            .count()
    }

    fn record(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }

    fn unsupported(attribute: &str) -> AppError {
        AppError::attribute(attribute, AX_ERROR_ATTRIBUTE_UNSUPPORTED)
    }
}

impl AccessibilityApi for FakeAccessibility {
    type Element = FakeElement;

    fn is_trusted_or_prompt(&self) -> bool {
        self.record("is_trusted_or_prompt");
        self.trusted
    }

    fn focused_element(&self) -> Result<FakeElement, AppError> {
        self.record("focused_element");
        if self.focused {
            Ok(FakeElement)
        } else {
            Err(AppError::FocusedElement(
                "Could not get focused UI element (is a text field focused?).".into(),
            ))
        }
    }

    fn role(&self, _: &FakeElement) -> Result<String, AppError> {
        self.record("role");
        Ok(self.role.clone())
    }

    fn value(&self, _: &FakeElement) -> Result<String, AppError> {
        self.record("value");
        if self.value_reads_fail {
            return Err(AppError::attribute("AXValue", AX_ERROR_CANNOT_COMPLETE));
        }
        Ok(self.stored_value())
    }

    fn set_value(&self, _: &FakeElement, text: &str) -> Result<(), AppError> {
        self.record("set_value");
        if self.value_writes_fail {
            return Err(AppError::attribute("AXValue", AX_ERROR_CANNOT_COMPLETE));
        }
        *self.value.borrow_mut() = text.to_string();
        self.value_writes.set(self.value_writes.get() + 1);

        let total = utf16_len(text);
        let mut selection = self.selection.borrow_mut();
        *selection = match self.after_write {
            SelectionAfterWrite::Keep => selection.map(|r| r.clamped(total)),
            SelectionAfterWrite::ResetToEnd => Some(SelectionRange::caret(total)),
        };
        Ok(())
    }

    fn selected_text(&self, _: &FakeElement) -> Result<String, AppError> {
        self.record("selected_text");
        if !self.selected_text_supported {
            return Err(Self::unsupported("AXSelectedText"));
        }
        Ok(match *self.selection.borrow() {
            Some(range) => utf16_slice(&self.value.borrow(), range),
            None => String::new(),
        })
    }

    fn selected_range(&self, _: &FakeElement) -> Result<Option<SelectionRange>, AppError> {
        self.record("selected_range");
        if !self.reports_selection {
            return Ok(None);
        }
        Ok(*self.selection.borrow())
    }

    fn set_selected_range(&self, _: &FakeElement, range: SelectionRange) -> Result<(), AppError> {
        self.record("set_selected_range");
        if self.selection_writes_fail {
            return Err(AppError::attribute(
                "AXSelectedTextRange",
                AX_ERROR_CANNOT_COMPLETE,
            ));
        }
        let total = utf16_len(&self.value.borrow());
        *self.selection.borrow_mut() = Some(range.clamped(total));
        Ok(())
    }

    fn string_for_range(&self, _: &FakeElement, range: SelectionRange) -> Result<String, AppError> {
        self.record("string_for_range");
        if !self.range_reads_supported {
            return Err(Self::unsupported("AXStringForRange"));
        }
        Ok(utf16_slice(&self.value.borrow(), range))
    }

    fn number_of_characters(&self, _: &FakeElement) -> Result<usize, AppError> {
        self.record("number_of_characters");
        if !self.count_supported {
            return Err(Self::unsupported("AXNumberOfCharacters"));
        }
        Ok(utf16_len(&self.value.borrow()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_slice_clamps() {
        assert_eq!(utf16_slice("hello", SelectionRange::new(1, 3)), "ell");
        assert_eq!(utf16_slice("hello", SelectionRange::new(3, 10)), "lo");
        assert_eq!(utf16_slice("hello", SelectionRange::new(9, 1)), "");
        assert_eq!(utf16_slice("h😀llo", SelectionRange::new(1, 2)), "😀");
    }
}
