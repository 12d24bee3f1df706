//! Bridge to the embedding page.
//!
//! The page owns game state, the wallet and achievement eligibility. It
//! exposes them on `window.voyageHost`:
//!
//! - `getSnapshot()` returns the current game snapshot object, or `null`
//! - `getPlayerAddress()` returns the connected address, or `null`
//! - `checkAchievements(address, instance)` returns a promise of identifiers

use js_sys::{Function, Promise, Reflect};
use voyage_core::GameSnapshot;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

const HOST_OBJECT: &str = "voyageHost";

fn host_object() -> Option<JsValue> {
    let window = web_sys::window()?;
    let host = Reflect::get(&window, &JsValue::from_str(HOST_OBJECT)).ok()?;
    if host.is_null() || host.is_undefined() {
        return None;
    }
    Some(host)
}

fn host_function(name: &str) -> Option<(JsValue, Function)> {
    let host = host_object()?;
    let function = Reflect::get(&host, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    Some((host, function))
}

/// Current game snapshot, if the page provides one.
pub fn snapshot() -> Option<GameSnapshot> {
    let (host, get_snapshot) = host_function("getSnapshot")?;
    let value = get_snapshot.call0(&host).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    match serde_wasm_bindgen::from_value(value) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!("[host] malformed snapshot: {}", e);
            None
        }
    }
}

/// Connected player address, if any.
pub fn player_address() -> Option<String> {
    let (host, get_address) = host_function("getPlayerAddress")?;
    get_address.call0(&host).ok()?.as_string()
}

/// Ask the page which achievements `address` unlocked in `instance`.
pub async fn check_achievements(address: &str, instance: &str) -> Result<Vec<String>, String> {
    let (host, check) = host_function("checkAchievements")
        .ok_or_else(|| format!("{HOST_OBJECT}.checkAchievements is not defined"))?;

    let promise = check
        .call2(&host, &JsValue::from_str(address), &JsValue::from_str(instance))
        .map_err(|e| format!("{e:?}"))?
        .dyn_into::<Promise>()
        .map_err(|_| "checkAchievements did not return a promise".to_string())?;

    let value = JsFuture::from(promise).await.map_err(|e| format!("{e:?}"))?;
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}
