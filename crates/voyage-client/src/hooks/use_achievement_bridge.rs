//! Runs achievement checks requested by the presentation app.

use gloo::timers::callback::Interval;
use voyage_core::AchievementRequest;
use voyage_core::bevy::PresentationCommand;
use yew::prelude::*;

use super::{POLL_INTERVAL_MS, VoyageContext, get_achievement_request_version, take_achievement_requests};
use crate::host;

/// Picks up pending check requests, asks the page for the unlocked
/// identifiers and submits them back under the request's ticket.
///
/// Failed checks are logged and dropped. The app ignores answers for tickets
/// it no longer waits for, so no bookkeeping is needed here.
#[hook]
pub fn use_achievement_bridge(voyage: VoyageContext) {
    let last_version = use_mut_ref(|| 0u64);

    use_effect_with(voyage, move |voyage| {
        let voyage = voyage.clone();
        let interval = voyage.initialized.then(|| {
            Interval::new(POLL_INTERVAL_MS, move || {
                let version = get_achievement_request_version();
                if version == *last_version.borrow() {
                    return;
                }
                *last_version.borrow_mut() = version;

                let requests = serde_wasm_bindgen::from_value::<Vec<AchievementRequest>>(
                    take_achievement_requests(),
                )
                .unwrap_or_default();

                for request in requests {
                    let voyage = voyage.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        run_check(&voyage, request).await;
                    });
                }
            })
        });

        move || drop(interval)
    });
}

async fn run_check(voyage: &VoyageContext, request: AchievementRequest) {
    tracing::info!(
        ticket = request.ticket,
        instance = %request.instance,
        "[achievements] checking"
    );
    let ids = match host::check_achievements(&request.player_address, &request.instance).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(ticket = request.ticket, "[achievements] check failed: {}", e);
            return;
        }
    };

    let command = PresentationCommand::SubmitAchievements {
        ticket: request.ticket,
        ids,
    };
    if let Err(e) = voyage.send(&command) {
        tracing::warn!("[achievements] failed to submit result: {}", e);
    }
}
