use log::{error, trace, warn};
use std::ffi::CStr;
use std::os::raw::c_void;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};
use vulkanalia::vk;
use vulkanalia::vk::HasBuilder;

// Lifecycle phases of the diagnostic listener. The callback only records
// messages while armed, so the noise the backend produces while the instance
// itself is still being brought up (or torn down) never turns into an error.
// Arming happens strictly after both instance creation and messenger
// installation have succeeded.
const UNINITIALIZED: u8 = 0;
const ARMED: u8 = 1;
const DESTROYED: u8 = 2;

/// Captures warning-or-worse diagnostics emitted by the backend so they can
/// be escalated into [`GraphicsError::DiagnosticEscalation`] at the next
/// construction checkpoint. The callback reaches this through the messenger
/// user-data pointer, which is why the instance keeps it boxed at a stable
/// address.
///
/// [`GraphicsError::DiagnosticEscalation`]: crate::gapi::errors::GraphicsError::DiagnosticEscalation
#[derive(Debug, Default)]
pub(crate) struct Listener {
    phase: AtomicU8,
    captured: Mutex<Vec<String>>,
}

impl Listener {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(UNINITIALIZED),
            captured: Mutex::new(Vec::new()),
        }
    }

    pub fn arm(&self) {
        self.phase.store(ARMED, Ordering::Release);
    }

    pub fn retire(&self) {
        self.phase.store(DESTROYED, Ordering::Release);
    }

    pub fn is_armed(&self) -> bool {
        self.phase.load(Ordering::Acquire) == ARMED
    }

    /// Records a diagnostic message. Dropped silently unless armed.
    pub fn record(&self, message: String) {
        if !self.is_armed() {
            return;
        }
        if let Ok(mut captured) = self.captured.lock() {
            captured.push(message);
        }
    }

    /// Takes the oldest captured diagnostic, if any.
    pub fn take_captured(&self) -> Option<String> {
        match self.captured.lock() {
            Ok(mut captured) if !captured.is_empty() => Some(captured.remove(0)),
            _ => None,
        }
    }
}

/// Builds the messenger descriptor that is both chained into the instance
/// create info (so creation-time diagnostics are captured too) and used to
/// install the long-lived messenger afterwards.
///
/// Severity is warning-and-up; all three message-type categories are on.
pub(crate) fn messenger_info(listener: &Listener) -> vk::DebugUtilsMessengerCreateInfoEXTBuilder {
    let mut builder = vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .user_callback(Some(debug_callback));
    builder.user_data = std::ptr::from_ref(listener) as *mut c_void;
    builder
}

/// The debug callback exposed to the (external) Vulkan loader, hence
/// `extern "system"`.
///
/// Every message is logged at a level matching its severity. On top of that,
/// warning-or-worse messages are recorded on the [`Listener`] behind the
/// user-data pointer, but only while it is armed, see above.
///
/// The returned (Vulkan) boolean tells the backend whether the call that
/// triggered the message should be aborted; that is only useful for testing
/// the validation layers themselves, so this always returns `vk::FALSE`.
extern "system" fn debug_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    type_: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    user_data: *mut c_void,
) -> vk::Bool32 {
    let data = unsafe { *data };
    let message = unsafe { CStr::from_ptr(data.message) }.to_string_lossy();

    if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        error!("({:?}) {}", type_, message);
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        warn!("({:?}) {}", type_, message);
    } else {
        trace!("({:?}) {}", type_, message);
    }

    if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING && !user_data.is_null() {
        let listener = unsafe { &*(user_data as *const Listener) };
        listener.record(message.into_owned());
    }

    vk::FALSE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninitialized_listener_drops_messages() {
        let listener = Listener::new();
        listener.record("noise during bring-up".into());
        assert_eq!(listener.take_captured(), None);
    }

    #[test]
    fn armed_listener_captures_in_order() {
        let listener = Listener::new();
        listener.arm();
        listener.record("first".into());
        listener.record("second".into());
        assert_eq!(listener.take_captured().as_deref(), Some("first"));
        assert_eq!(listener.take_captured().as_deref(), Some("second"));
        assert_eq!(listener.take_captured(), None);
    }

    #[test]
    fn retired_listener_stops_capturing() {
        let listener = Listener::new();
        listener.arm();
        listener.retire();
        listener.record("noise during teardown".into());
        assert_eq!(listener.take_captured(), None);
        assert!(!listener.is_armed());
    }
}
