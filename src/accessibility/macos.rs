use std::ffi::c_void;

use accessibility_sys::{
    kAXErrorFailure, kAXErrorNoValue, kAXErrorSuccess, kAXValueTypeCFRange,
    AXUIElementCopyAttributeValue, AXUIElementCopyParameterizedAttributeValue,
    AXUIElementCreateSystemWide, AXUIElementRef, AXUIElementSetAttributeValue, AXValueCreate,
    AXValueGetTypeID, AXValueGetValue, AXValueRef,
};
use core_foundation::base::{CFRelease, CFType, CFTypeRef, TCFType};
use core_foundation::number::CFNumber;
use core_foundation::string::{CFString, CFStringRef};
use core_foundation_sys::base::{CFIndex, CFRange};

use super::{attr, AccessibilityApi, SelectionRange};
use crate::error::AppError;

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXIsProcessTrustedWithOptions(options: *const c_void) -> bool;
    static kAXTrustedCheckOptionPrompt: *const c_void;
}

#[link(name = "CoreFoundation", kind = "framework")]
extern "C" {
    fn CFDictionaryCreate(
        allocator: *const c_void,
        keys: *const *const c_void,
        values: *const *const c_void,
        num_values: isize,
        key_callbacks: *const c_void,
        value_callbacks: *const c_void,
    ) -> *const c_void;
    static kCFBooleanTrue: *const c_void;
}

/// Takes ownership of a +1 reference returned by a Copy/Create call.
fn wrap_created(ptr: CFTypeRef) -> Option<CFType> {
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { CFType::wrap_under_create_rule(ptr) })
    }
}

fn decode_string(value: CFType) -> Option<String> {
    value.downcast::<CFString>().map(|s| s.to_string())
}

fn decode_range(value: &CFType) -> Option<SelectionRange> {
    if value.type_of() != unsafe { AXValueGetTypeID() } {
        return None;
    }
    let mut range = CFRange {
        location: 0,
        length: 0,
    };
    let ok = unsafe {
        AXValueGetValue(
            value.as_CFTypeRef() as AXValueRef,
            kAXValueTypeCFRange,
            &mut range as *mut CFRange as *mut c_void,
        )
    };
    ok.then(|| {
        SelectionRange::new(
            range.location.max(0) as usize,
            range.length.max(0) as usize,
        )
    })
}

fn ax_range(range: SelectionRange) -> Result<CFType, AppError> {
    let raw = CFRange {
        location: range.location as CFIndex,
        length: range.length as CFIndex,
    };
    let ptr = unsafe {
        AXValueCreate(
            kAXValueTypeCFRange,
            &raw as *const CFRange as *const c_void,
        )
    };
    wrap_created(ptr as CFTypeRef)
        .ok_or_else(|| AppError::attribute("AXValue(CFRange)", kAXErrorFailure))
}

/// A retained `AXUIElementRef` owned by another process.
pub struct AxElement(CFType);

impl AxElement {
    fn as_ax_ref(&self) -> AXUIElementRef {
        self.0.as_CFTypeRef() as AXUIElementRef
    }
}

/// Accessibility access through the ApplicationServices framework.
pub struct MacAccessibility;

impl MacAccessibility {
    fn copy_attribute(
        &self,
        element: AXUIElementRef,
        attribute: &str,
    ) -> Result<Option<CFType>, AppError> {
        let name = CFString::new(attribute);
        let mut value: CFTypeRef = std::ptr::null();
        let err = unsafe {
            AXUIElementCopyAttributeValue(
                element,
                name.as_concrete_TypeRef() as CFStringRef,
                &mut value,
            )
        };
        if err != kAXErrorSuccess {
            return Err(AppError::attribute(attribute, err));
        }
        Ok(wrap_created(value))
    }

    fn set_attribute(
        &self,
        element: &AxElement,
        attribute: &str,
        value: CFTypeRef,
    ) -> Result<(), AppError> {
        let name = CFString::new(attribute);
        let err = unsafe {
            AXUIElementSetAttributeValue(
                element.as_ax_ref(),
                name.as_concrete_TypeRef() as CFStringRef,
                value,
            )
        };
        if err != kAXErrorSuccess {
            crate::app_log!("[ax] set {attribute} failed with AXError {err}");
            return Err(AppError::attribute(attribute, err));
        }
        Ok(())
    }

    fn copy_string(&self, element: &AxElement, attribute: &str) -> Result<String, AppError> {
        Ok(self
            .copy_attribute(element.as_ax_ref(), attribute)?
            .and_then(decode_string)
            .unwrap_or_default())
    }
}

impl AccessibilityApi for MacAccessibility {
    type Element = AxElement;

    fn is_trusted_or_prompt(&self) -> bool {
        unsafe {
            let keys = [kAXTrustedCheckOptionPrompt];
            let values = [kCFBooleanTrue];
            let options = CFDictionaryCreate(
                std::ptr::null(),
                keys.as_ptr(),
                values.as_ptr(),
                1,
                std::ptr::null(),
                std::ptr::null(),
            );
            if options.is_null() {
                return false;
            }
            let trusted = AXIsProcessTrustedWithOptions(options);
            CFRelease(options);
            trusted
        }
    }

    fn focused_element(&self) -> Result<AxElement, AppError> {
        let system_wide = wrap_created(unsafe { AXUIElementCreateSystemWide() } as CFTypeRef)
            .ok_or_else(|| {
                AppError::FocusedElement("Could not create system-wide AX element".into())
            })?;
        let focused = self
            .copy_attribute(
                system_wide.as_CFTypeRef() as AXUIElementRef,
                attr::FOCUSED_UI_ELEMENT,
            )
            .map_err(|e| {
                AppError::FocusedElement(format!(
                    "Could not get focused UI element (is a text field focused?): {e}"
                ))
            })?
            .ok_or_else(|| {
                AppError::FocusedElement(
                    "Could not get focused UI element (is a text field focused?).".into(),
                )
            })?;
        Ok(AxElement(focused))
    }

    fn role(&self, element: &AxElement) -> Result<String, AppError> {
        self.copy_string(element, attr::ROLE)
    }

    fn value(&self, element: &AxElement) -> Result<String, AppError> {
        self.copy_string(element, attr::VALUE)
    }

    fn set_value(&self, element: &AxElement, text: &str) -> Result<(), AppError> {
        let value = CFString::new(text);
        self.set_attribute(element, attr::VALUE, value.as_CFTypeRef())
    }

    fn selected_text(&self, element: &AxElement) -> Result<String, AppError> {
        self.copy_string(element, attr::SELECTED_TEXT)
    }

    fn selected_range(&self, element: &AxElement) -> Result<Option<SelectionRange>, AppError> {
        Ok(self
            .copy_attribute(element.as_ax_ref(), attr::SELECTED_TEXT_RANGE)?
            .as_ref()
            .and_then(decode_range))
    }

    fn set_selected_range(
        &self,
        element: &AxElement,
        range: SelectionRange,
    ) -> Result<(), AppError> {
        let value = ax_range(range)?;
        self.set_attribute(element, attr::SELECTED_TEXT_RANGE, value.as_CFTypeRef())
    }

    fn string_for_range(
        &self,
        element: &AxElement,
        range: SelectionRange,
    ) -> Result<String, AppError> {
        let name = CFString::new(attr::STRING_FOR_RANGE);
        let parameter = ax_range(range)?;
        let mut result: CFTypeRef = std::ptr::null();
        let err = unsafe {
            AXUIElementCopyParameterizedAttributeValue(
                element.as_ax_ref(),
                name.as_concrete_TypeRef() as CFStringRef,
                parameter.as_CFTypeRef(),
                &mut result,
            )
        };
        if err != kAXErrorSuccess {
            return Err(AppError::attribute(attr::STRING_FOR_RANGE, err));
        }
        Ok(wrap_created(result)
            .and_then(decode_string)
            .unwrap_or_default())
    }

    fn number_of_characters(&self, element: &AxElement) -> Result<usize, AppError> {
        self.copy_attribute(element.as_ax_ref(), attr::NUMBER_OF_CHARACTERS)?
            .and_then(|v| v.downcast::<CFNumber>())
            .and_then(|n| n.to_i64())
            .filter(|n| *n >= 0)
            .map(|n| n as usize)
            .ok_or_else(|| AppError::attribute(attr::NUMBER_OF_CHARACTERS, kAXErrorNoValue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_only_matching_cf_types() {
        let text = CFString::new("h😀llo").as_CFType();
        assert_eq!(decode_string(text.clone()).as_deref(), Some("h😀llo"));
        assert_eq!(decode_range(&text), None);

        let number = CFNumber::from(12i64).as_CFType();
        assert_eq!(decode_string(number), None);
    }

    #[test]
    fn test_cf_range_value_keeps_utf16_span() {
        let value = ax_range(SelectionRange::new(1, 2)).unwrap();
        assert_eq!(decode_range(&value), Some(SelectionRange::new(1, 2)));
    }
}
