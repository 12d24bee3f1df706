//! WASM entry points for the voyage presentation.
//!
//! Provides JavaScript-callable functions to start and drive the Bevy app.

use std::sync::atomic::{AtomicBool, Ordering};

use bevy::prelude::*;
use bevy::winit::{UpdateMode, WinitSettings};
use parking_lot::Mutex;
use wasm_bindgen::prelude::*;

use crate::bevy::{CommandQueue, PresentationCommand, StateStores, VoyagePresentationPlugin};
use crate::config::PresentationConfig;

// ============================================================================
// Global State
// ============================================================================

/// Checked every frame by [`check_exit_system`].
static SHOULD_EXIT: AtomicBool = AtomicBool::new(false);

/// The winit event loop can only be created once per page.
static APP_STARTED: AtomicBool = AtomicBool::new(false);

#[derive(Clone)]
struct GlobalState {
    command_queue: CommandQueue,
    state_stores: StateStores,
}

static GLOBAL_STATE: Mutex<Option<GlobalState>> = Mutex::new(None);

fn global_state() -> GlobalState {
    GLOBAL_STATE
        .lock()
        .get_or_insert_with(|| GlobalState {
            command_queue: CommandQueue::new(),
            state_stores: StateStores::new(),
        })
        .clone()
}

fn is_shutdown_requested() -> bool {
    SHOULD_EXIT.load(Ordering::SeqCst)
}

/// Request the app to exit on its next frame. Called before page unload.
#[wasm_bindgen]
pub fn request_voyage_exit() {
    tracing::info!("[voyage] exit requested");
    SHOULD_EXIT.store(true, Ordering::SeqCst);
    if let Some(state) = GLOBAL_STATE.lock().take() {
        state.command_queue.clear();
    }
}

/// Sends `AppExit` once an exit was requested.
pub fn check_exit_system(mut exit: MessageWriter<bevy::app::AppExit>) {
    if SHOULD_EXIT.load(Ordering::SeqCst) {
        tracing::info!("[voyage] check_exit_system: sending AppExit");
        exit.write(bevy::app::AppExit::Success);
    }
}

// ============================================================================
// Initialization
// ============================================================================

/// Start the Bevy app on `#canvas_id`.
///
/// `config_json` may be empty for the default configuration.
#[wasm_bindgen]
pub fn start_voyage_app(canvas_id: &str, config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    if APP_STARTED.load(Ordering::SeqCst) {
        tracing::info!("[voyage] app already running, skipping creation");
        return Ok(());
    }

    let config = if config_json.trim().is_empty() {
        PresentationConfig::default()
    } else {
        PresentationConfig::from_json(config_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?
    };

    let state = global_state();
    tracing::info!("[voyage] creating Bevy app for canvas: #{}", canvas_id);

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    canvas: Some(format!("#{canvas_id}")),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: true,
                    ..default()
                }),
                ..default()
            })
            .disable::<bevy::log::LogPlugin>(),
    );
    app.insert_resource(WinitSettings {
        focused_mode: UpdateMode::Continuous,
        unfocused_mode: UpdateMode::Continuous,
    });
    app.add_plugins(VoyagePresentationPlugin::new(
        config,
        state.command_queue,
        state.state_stores,
    ));

    SHOULD_EXIT.store(false, Ordering::SeqCst);
    APP_STARTED.store(true, Ordering::SeqCst);

    app.run();
    Ok(())
}

/// Check if the app is running and accepting commands.
#[wasm_bindgen]
pub fn is_voyage_ready() -> bool {
    APP_STARTED.load(Ordering::SeqCst) && !is_shutdown_requested()
}

// ============================================================================
// Commands
// ============================================================================

/// Sends a JSON command (`{"type": "...", ...}`) to the running app.
#[wasm_bindgen]
pub fn send_command(command_json: &str) -> Result<(), JsValue> {
    if is_shutdown_requested() {
        return Err(JsValue::from_str("Voyage app is shutting down"));
    }

    let command: PresentationCommand = serde_json::from_str(command_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid command JSON: {e}")))?;

    global_state().command_queue.push(command);
    Ok(())
}

// ============================================================================
// State Getters (for Yew hooks)
// ============================================================================

/// Get the notification toast state.
#[wasm_bindgen]
pub fn get_notification_state() -> JsValue {
    if is_shutdown_requested() {
        return JsValue::NULL;
    }
    let summary = global_state().state_stores.notifications.get_summary();
    serde_wasm_bindgen::to_value(&summary).unwrap_or(JsValue::NULL)
}

/// Get notification state version (for change detection).
#[wasm_bindgen]
pub fn get_notification_version() -> u64 {
    global_state().state_stores.notifications.get_version()
}

/// Take pending achievement check requests.
#[wasm_bindgen]
pub fn take_achievement_requests() -> JsValue {
    let requests = global_state().state_stores.achievements.take_requests();
    serde_wasm_bindgen::to_value(&requests).unwrap_or(JsValue::NULL)
}

/// Get achievement request version (for change detection).
#[wasm_bindgen]
pub fn get_achievement_request_version() -> u64 {
    global_state().state_stores.achievements.get_version()
}
