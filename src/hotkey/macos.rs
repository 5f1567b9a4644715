use std::ffi::c_void;
use std::ptr::null_mut;

use core_foundation::base::TCFType;
use core_foundation::mach_port::CFMachPort;
use core_foundation::runloop::{kCFRunLoopDefaultMode, CFRunLoop};
use core_foundation_sys::mach_port::{CFMachPortInvalidate, CFMachPortRef};

use super::manager::{HotkeyChord, HotkeyMonitor};
use crate::error::AppError;

type CGEventRef = *mut c_void;

type CGEventTapCallBack = extern "C" fn(
    proxy: *mut c_void,
    event_type: u32,
    event: CGEventRef,
    user_info: *mut c_void,
) -> CGEventRef;

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventTapCreate(
        tap: u32,
        place: u32,
        options: u32,
        events_of_interest: u64,
        callback: CGEventTapCallBack,
        user_info: *mut c_void,
    ) -> *mut c_void;
    fn CGEventTapEnable(tap: *mut c_void, enable: bool);
    fn CGEventGetIntegerValueField(event: CGEventRef, field: u32) -> i64;
    fn CGEventGetFlags(event: CGEventRef) -> u64;
}

// kCGHIDEventTap = 0
const CG_HID_EVENT_TAP: u32 = 0;
// kCGHeadInsertEventTap = 0
const CG_HEAD_INSERT_EVENT_TAP: u32 = 0;
// kCGEventTapOptionDefault = 0
const CG_EVENT_TAP_OPTION_DEFAULT: u32 = 0;
// kCGEventKeyDown = 10
const CG_EVENT_KEY_DOWN: u32 = 10;
const CG_EVENT_TAP_DISABLED_BY_TIMEOUT: u32 = 0xFFFF_FFFE;
const CG_EVENT_TAP_DISABLED_BY_USER_INPUT: u32 = 0xFFFF_FFFF;
// kCGKeyboardEventKeycode = 9
const CG_KEYBOARD_EVENT_KEYCODE: u32 = 9;

/// Shared with the tap callback through `user_info` for the life of one wait.
struct TapState {
    chord: HotkeyChord,
    tap: *mut c_void,
    hit: bool,
}

extern "C" fn tap_callback(
    _proxy: *mut c_void,
    event_type: u32,
    event: CGEventRef,
    user_info: *mut c_void,
) -> CGEventRef {
    if user_info.is_null() {
        return event;
    }
    let state = unsafe { &mut *(user_info as *mut TapState) };

    match event_type {
        CG_EVENT_TAP_DISABLED_BY_TIMEOUT | CG_EVENT_TAP_DISABLED_BY_USER_INPUT => {
            crate::app_log!("[hotkey] event tap disabled by the system, re-enabling");
            if !state.tap.is_null() {
                unsafe { CGEventTapEnable(state.tap, true) };
            }
        }
        CG_EVENT_KEY_DOWN => {
            let keycode =
                unsafe { CGEventGetIntegerValueField(event, CG_KEYBOARD_EVENT_KEYCODE) } as u16;
            let flags = unsafe { CGEventGetFlags(event) };
            if state.chord.matches(keycode, flags) {
                state.hit = true;
                CFRunLoop::get_current().stop();
            }
        }
        _ => {}
    }
    event
}

/// Global hotkey wait built on a session-wide `CGEventTap`.
///
/// The tap and its run-loop source live only for the duration of
/// [`HotkeyMonitor::wait_for`]; exactly one tap exists per wait.
pub struct EventTapMonitor;

impl HotkeyMonitor for EventTapMonitor {
    fn wait_for(&mut self, chord: HotkeyChord) -> Result<(), AppError> {
        let mut state = Box::new(TapState {
            chord,
            tap: null_mut(),
            hit: false,
        });
        let state_ptr: *mut TapState = &mut *state;

        let tap = unsafe {
            CGEventTapCreate(
                CG_HID_EVENT_TAP,
                CG_HEAD_INSERT_EVENT_TAP,
                CG_EVENT_TAP_OPTION_DEFAULT,
                1u64 << CG_EVENT_KEY_DOWN,
                tap_callback,
                state_ptr as *mut c_void,
            )
        };
        if tap.is_null() {
            return Err(AppError::HotkeyMonitor(
                "Failed to create event tap (enable Input Monitoring?).".into(),
            ));
        }
        unsafe { (*state_ptr).tap = tap };
        let port = unsafe { CFMachPort::wrap_under_create_rule(tap as CFMachPortRef) };

        let source = match port.create_runloop_source(0) {
            Ok(source) => source,
            Err(()) => {
                unsafe { CFMachPortInvalidate(port.as_concrete_TypeRef()) };
                return Err(AppError::HotkeyMonitor(
                    "Failed to create run loop source for event tap".into(),
                ));
            }
        };

        let run_loop = CFRunLoop::get_current();
        unsafe {
            run_loop.add_source(&source, kCFRunLoopDefaultMode);
            CGEventTapEnable(tap, true);
        }
        crate::app_log!(
            "[hotkey] event tap installed, waiting for keycode {} with modifiers {:#x}",
            chord.keycode,
            chord.modifiers
        );

        CFRunLoop::run_current();

        unsafe {
            CGEventTapEnable(tap, false);
            run_loop.remove_source(&source, kCFRunLoopDefaultMode);
            CFMachPortInvalidate(port.as_concrete_TypeRef());
        }
        crate::app_log!("[hotkey] event tap removed");

        if state.hit {
            Ok(())
        } else {
            Err(AppError::HotkeyMonitor("Hotkey wait aborted.".into()))
        }
    }
}
