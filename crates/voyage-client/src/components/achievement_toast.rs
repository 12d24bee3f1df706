//! AchievementToast component - one unlocked achievement at a time.

use voyage_core::SequencerState;
use voyage_core::bevy::PresentationCommand;
use yew::prelude::*;

use crate::achievements::AchievementCatalog;
use crate::hooks::{use_image_preloader, use_notifications, use_voyage};

#[function_component(AchievementToast)]
pub fn achievement_toast() -> Html {
    let voyage = use_voyage();
    let summary = use_notifications();
    let catalog = AchievementCatalog;
    let icons = use_image_preloader(catalog.icon_paths());

    // The last card stays mounted while it animates out.
    let exiting = matches!(summary.state, SequencerState::Exiting);
    if !summary.visible && !exiting {
        return html! {};
    }

    let on_dismiss = Callback::from(move |_: MouseEvent| {
        if let Err(e) = voyage.send(&PresentationCommand::DismissNotifications) {
            tracing::warn!("[notify] failed to dismiss: {}", e);
        }
    });

    let class = classes!("achievement-toast", exiting.then_some("exiting"));

    // Unknown identifiers keep their slot and dwell but show no card.
    let card = summary
        .current
        .as_deref()
        .and_then(|id| catalog.lookup(id))
        .map(|info| {
            html! {
                <div class="achievement-card">
                    if icons.is_ready() {
                        <img class="achievement-icon" src={info.icon} alt={info.title} />
                    }
                    <div class="achievement-text">
                        <div class="achievement-title">{ info.title }</div>
                        <div class="achievement-description">{ info.description }</div>
                    </div>
                </div>
            }
        });

    let dots = (summary.total > 1).then(|| {
        html! {
            <div class="achievement-dots">
                { for (0..summary.total).map(|i| {
                    let dot = classes!("dot", (i == summary.index).then_some("active"));
                    html! { <span class={dot} /> }
                }) }
            </div>
        }
    });

    html! {
        <div class={class}>
            { for card }
            { for dots }
            <button class="achievement-dismiss" onclick={on_dismiss}>{ "×" }</button>
        </div>
    }
}
