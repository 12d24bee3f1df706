//! Notification toast state polled from the presentation app.

use gloo::timers::callback::Interval;
use voyage_core::bevy::NotificationSummary;
use yew::prelude::*;

use super::{POLL_INTERVAL_MS, get_notification_state, get_notification_version};

/// Current toast state. Re-renders only when the store version changes.
#[hook]
pub fn use_notifications() -> NotificationSummary {
    let summary = use_state(NotificationSummary::default);
    let last_version = use_mut_ref(|| 0u64);

    {
        let summary = summary.clone();
        use_effect_with((), move |_| {
            let interval = Interval::new(POLL_INTERVAL_MS, move || {
                let version = get_notification_version();
                if version == *last_version.borrow() {
                    return;
                }
                *last_version.borrow_mut() = version;
                let js_value = get_notification_state();
                if let Ok(state) = serde_wasm_bindgen::from_value::<NotificationSummary>(js_value) {
                    summary.set(state);
                }
            });

            move || drop(interval)
        });
    }

    (*summary).clone()
}
