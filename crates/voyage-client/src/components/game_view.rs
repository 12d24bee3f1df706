//! GameView component - feeds the presentation app from the host page.

use gloo::timers::callback::Interval;
use voyage_core::bevy::PresentationCommand;
use voyage_core::{DeviceClass, FrameSetSpec, GameSnapshot};
use yew::prelude::*;

use super::{AchievementToast, SpriteCanvas};
use crate::hooks::{POLL_INTERVAL_MS, use_achievement_bridge, use_voyage};
use crate::host;

/// Viewports narrower than this use the compact camera profiles.
const COMPACT_MAX_WIDTH: f64 = 768.0;

#[derive(Properties, PartialEq)]
pub struct GameViewProps {
    /// Frames of the ship shown while it moves.
    pub ship_sprite: FrameSetSpec,
    #[prop_or(12.0)]
    pub sprite_fps: f64,
}

fn viewport_device_class() -> DeviceClass {
    let width = web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|w| w.as_f64())
        .unwrap_or(COMPACT_MAX_WIDTH);
    DeviceClass::from_compact(width < COMPACT_MAX_WIDTH)
}

/// Overlay on top of the Bevy canvas.
///
/// Polls the page for the game snapshot and player address and forwards
/// changes as commands. The device class is computed once when the app is up.
#[function_component(GameView)]
pub fn game_view(props: &GameViewProps) -> Html {
    let voyage = use_voyage();
    let moving = use_state(|| false);

    use_achievement_bridge(voyage.clone());

    {
        let moving = moving.clone();
        use_effect_with(voyage, move |voyage| {
            let voyage = voyage.clone();
            let interval = voyage.initialized.then(|| {
                let device = viewport_device_class();
                if let Err(e) = voyage.send(&PresentationCommand::SetDeviceClass { device }) {
                    tracing::warn!("[voyage] failed to set device class: {}", e);
                }

                let mut last_snapshot: Option<GameSnapshot> = None;
                let mut last_address: Option<Option<String>> = None;
                Interval::new(POLL_INTERVAL_MS, move || {
                    let address = host::player_address();
                    if last_address.as_ref() != Some(&address) {
                        let command = PresentationCommand::SetPlayerAddress {
                            address: address.clone(),
                        };
                        if voyage.send(&command).is_ok() {
                            last_address = Some(address);
                        }
                    }

                    let Some(snapshot) = host::snapshot() else {
                        return;
                    };
                    if last_snapshot.as_ref() == Some(&snapshot) {
                        return;
                    }
                    moving.set(snapshot.is_moving);
                    let command = PresentationCommand::SetSnapshot {
                        snapshot: snapshot.clone(),
                    };
                    match voyage.send(&command) {
                        Ok(()) => last_snapshot = Some(snapshot),
                        Err(e) => tracing::warn!("[voyage] failed to send snapshot: {}", e),
                    }
                })
            });

            move || drop(interval)
        });
    }

    html! {
        <div class="voyage-overlay">
            if *moving {
                <SpriteCanvas
                    class="ship-sprite"
                    spec={props.ship_sprite.clone()}
                    fps={props.sprite_fps}
                    width={128}
                    height={128}
                />
            }
            <AchievementToast />
        </div>
    }
}
