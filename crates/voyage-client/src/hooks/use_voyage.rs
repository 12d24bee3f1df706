//! Bevy integration for Yew.
//!
//! Starts the presentation app on a canvas and exposes a small context for
//! sending typed commands to it.

use voyage_core::bevy::PresentationCommand;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use yew::prelude::*;

// ============================================================================
// Direct calls to voyage-core WASM functions
// These are re-exported from voyage_core::bevy::wasm_entry
// ============================================================================

pub use voyage_core::bevy::{
    get_achievement_request_version, get_notification_state, get_notification_version,
    is_voyage_ready, request_voyage_exit, send_command, start_voyage_app,
    take_achievement_requests,
};

/// Polling interval in milliseconds.
pub const POLL_INTERVAL_MS: u32 = 50; // 20 FPS for UI updates

/// Delay before starting Bevy, so the canvas is mounted.
const START_DELAY_MS: u32 = 100;

// ============================================================================
// Context
// ============================================================================

#[derive(Clone, PartialEq)]
pub struct VoyageContext {
    /// Whether the app has been started.
    pub initialized: bool,
}

impl VoyageContext {
    /// Serialize and queue a command for the next frame.
    pub fn send(&self, command: &PresentationCommand) -> Result<(), String> {
        if !self.initialized {
            return Err("Voyage app not initialized".to_string());
        }
        let json = serde_json::to_string(command).map_err(|e| e.to_string())?;
        send_command(&json).map_err(|e| format!("{e:?}"))
    }
}

#[derive(Properties, PartialEq)]
pub struct VoyageProviderProps {
    pub children: Children,
    /// Canvas element ID.
    pub canvas_id: String,
    /// Presentation config as JSON; empty for defaults.
    #[prop_or_default]
    pub config_json: String,
}

/// Starts the Bevy app once and shares a [`VoyageContext`] with children.
#[function_component(VoyageProvider)]
pub fn voyage_provider(props: &VoyageProviderProps) -> Html {
    let initialized = use_state(|| false);

    {
        let initialized = initialized.clone();
        let canvas_id = props.canvas_id.clone();
        let config_json = props.config_json.clone();

        use_effect_with((), move |_| {
            // Stop the app before the page goes away
            let beforeunload = Closure::<dyn Fn()>::new(move || {
                tracing::info!("[voyage] beforeunload: requesting exit");
                request_voyage_exit();
            });
            let window = web_sys::window();
            if let Some(window) = &window {
                if let Err(e) = window.add_event_listener_with_callback(
                    "beforeunload",
                    beforeunload.as_ref().unchecked_ref(),
                ) {
                    tracing::warn!("[voyage] failed to add beforeunload listener: {:?}", e);
                }
            }

            let timeout = gloo::timers::callback::Timeout::new(START_DELAY_MS, move || {
                initialized.set(true);
                tracing::info!("[voyage] starting presentation app");

                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = start_voyage_app(&canvas_id, &config_json) {
                        tracing::error!("[voyage] failed to start: {:?}", e);
                    }
                });
            });

            move || {
                if let Some(window) = window {
                    let _ = window.remove_event_listener_with_callback(
                        "beforeunload",
                        beforeunload.as_ref().unchecked_ref(),
                    );
                }
                drop(timeout);
            }
        });
    }

    let context = VoyageContext {
        initialized: *initialized,
    };

    let canvas_style = "position: fixed; top: 0; left: 0; width: 100%; height: 100%; z-index: 0;";

    html! {
        <ContextProvider<VoyageContext> context={context}>
            <canvas
                id={props.canvas_id.clone()}
                class="voyage-canvas"
                style={canvas_style}
            />
            { props.children.clone() }
        </ContextProvider<VoyageContext>>
    }
}

#[hook]
pub fn use_voyage() -> VoyageContext {
    use_context::<VoyageContext>().unwrap_or(VoyageContext { initialized: false })
}
