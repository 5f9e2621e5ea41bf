//! Browser presentation of storage warnings published on a [`NotificationBus`].

use playground_host::{NotificationBus, SubscriptionId};

/// DOM event name dispatched on `window` for every storage warning.
pub const STORAGE_WARNING_EVENT: &str = "storage-warning";

#[derive(Debug, Clone, Copy, Default)]
/// Forwards warnings to page UI as a `storage-warning` `CustomEvent` whose `detail` is the
/// message text.
pub struct WebWarningPresenter;

impl WebWarningPresenter {
    /// Dispatches `message` to the page.
    ///
    /// # Errors
    ///
    /// Returns an error when no window is available or event construction fails.
    pub fn present(self, message: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsValue;

            let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
            let init = web_sys::CustomEventInit::new();
            init.set_detail(&js_sys::JsString::from(message));
            let event =
                web_sys::CustomEvent::new_with_event_init_dict(STORAGE_WARNING_EVENT, &init)
                    .map_err(|err: JsValue| format!("storage warning event failed: {err:?}"))?;
            window
                .dispatch_event(&event)
                .map(|_| ())
                .map_err(|err: JsValue| format!("storage warning dispatch failed: {err:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = message;
            Ok(())
        }
    }

    /// Subscribes the presenter to `bus` and returns the subscription handle.
    pub fn attach(self, bus: &NotificationBus) -> SubscriptionId {
        bus.subscribe(move |message| {
            self.present_or_log(message);
        })
    }

    /// Presents `message`, logging it to the console when dispatch fails.
    ///
    /// Returns `true` when the page event was dispatched.
    pub fn present_or_log(self, message: &str) -> bool {
        match self.present(message) {
            Ok(()) => true,
            Err(err) => {
                leptos::logging::warn!("{message} ({err})");
                false
            }
        }
    }
}
