//! Native `window.alert` / `window.confirm` as the session's dialogs.

use nodes::Dialogs;

/// Blocking browser dialogs. Outside the browser, alerts are dropped and
/// every confirmation is declined.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserDialogs;

impl Dialogs for BrowserDialogs {
    fn alert(&self, message: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(window) = web_sys::window() {
                if window.alert_with_message(message).is_err() {
                    log::warn!("alert failed: {message}");
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = message;
        }
    }

    fn confirm(&self, message: &str) -> bool {
        #[cfg(feature = "csr")]
        {
            web_sys::window()
                .and_then(|window| window.confirm_with_message(message).ok())
                .unwrap_or(false)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = message;
            false
        }
    }
}
