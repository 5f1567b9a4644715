#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(test)]
pub mod fake;

pub mod text;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// AX attribute names used by the probe.
pub mod attr {
    pub const FOCUSED_UI_ELEMENT: &str = "AXFocusedUIElement";
    pub const ROLE: &str = "AXRole";
    pub const VALUE: &str = "AXValue";
    pub const SELECTED_TEXT: &str = "AXSelectedText";
    pub const SELECTED_TEXT_RANGE: &str = "AXSelectedTextRange";
    pub const NUMBER_OF_CHARACTERS: &str = "AXNumberOfCharacters";
    pub const STRING_FOR_RANGE: &str = "AXStringForRange";
}

pub const ROLE_TEXT_FIELD: &str = "AXTextField";
pub const ROLE_TEXT_AREA: &str = "AXTextArea";
pub const ROLE_TEXT_VIEW: &str = "AXTextView";

const TEXT_INPUT_ROLES: [&str; 3] = [ROLE_TEXT_FIELD, ROLE_TEXT_AREA, ROLE_TEXT_VIEW];

pub fn is_text_input_role(role: &str) -> bool {
    TEXT_INPUT_ROLES.contains(&role)
}

/// A `(location, length)` span in UTF-16 code units, as AX reports it.
/// `length == 0` is a bare caret.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionRange {
    pub location: usize,
    pub length: usize,
}

impl SelectionRange {
    pub fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    pub fn caret(location: usize) -> Self {
        Self::new(location, 0)
    }

    pub fn end(&self) -> usize {
        self.location + self.length
    }

    /// Pull the span inside `[0, total]`.
    pub fn clamped(&self, total: usize) -> Self {
        let location = self.location.min(total);
        let length = self.length.min(total - location);
        Self { location, length }
    }
}

/// Synchronous access to the OS accessibility service.
///
/// Every call is a round-trip to the process owning the element; nothing is
/// cached, so values may change between any two calls.
pub trait AccessibilityApi {
    /// Opaque handle to an element owned by another process.
    type Element;

    /// Returns the trust state before any consent prompt is shown.
    fn is_trusted_or_prompt(&self) -> bool;

    fn focused_element(&self) -> Result<Self::Element, AppError>;

    fn role(&self, element: &Self::Element) -> Result<String, AppError>;

    fn value(&self, element: &Self::Element) -> Result<String, AppError>;

    fn set_value(&self, element: &Self::Element, text: &str) -> Result<(), AppError>;

    fn selected_text(&self, element: &Self::Element) -> Result<String, AppError>;

    /// `Ok(None)` when the element has no selection to report.
    fn selected_range(&self, element: &Self::Element) -> Result<Option<SelectionRange>, AppError>;

    fn set_selected_range(
        &self,
        element: &Self::Element,
        range: SelectionRange,
    ) -> Result<(), AppError>;

    fn string_for_range(
        &self,
        element: &Self::Element,
        range: SelectionRange,
    ) -> Result<String, AppError>;

    fn number_of_characters(&self, element: &Self::Element) -> Result<usize, AppError>;
}

#[cfg(target_os = "macos")]
pub fn create_platform() -> Result<macos::MacAccessibility, AppError> {
    Ok(macos::MacAccessibility)
}

#[cfg(not(target_os = "macos"))]
pub fn create_platform() -> Result<UnsupportedAccessibility, AppError> {
    Err(AppError::UnsupportedPlatform(
        "the accessibility probe requires macOS".to_string(),
    ))
}

/// Placeholder type for targets without an accessibility backend.
#[cfg(not(target_os = "macos"))]
pub enum UnsupportedAccessibility {}

#[cfg(not(target_os = "macos"))]
impl AccessibilityApi for UnsupportedAccessibility {
    type Element = ();

    fn is_trusted_or_prompt(&self) -> bool {
        match *self {}
    }
    fn focused_element(&self) -> Result<(), AppError> {
        match *self {}
    }
    fn role(&self, _: &()) -> Result<String, AppError> {
        match *self {}
    }
    fn value(&self, _: &()) -> Result<String, AppError> {
        match *self {}
    }
    fn set_value(&self, _: &(), _: &str) -> Result<(), AppError> {
        match *self {}
    }
    fn selected_text(&self, _: &()) -> Result<String, AppError> {
        match *self {}
    }
    fn selected_range(&self, _: &()) -> Result<Option<SelectionRange>, AppError> {
        match *self {}
    }
    fn set_selected_range(&self, _: &(), _: SelectionRange) -> Result<(), AppError> {
        match *self {}
    }
    fn string_for_range(&self, _: &(), _: SelectionRange) -> Result<String, AppError> {
        match *self {}
    }
    fn number_of_characters(&self, _: &()) -> Result<usize, AppError> {
        match *self {}
    }
}
