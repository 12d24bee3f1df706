//! `requestAnimationFrame` loop hook.

use std::cell::RefCell;
use std::rc::Rc;

use voyage_core::{FrameClock, Tick};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use yew::prelude::*;

/// Calls `on_frame` once per display frame while `enabled` is true.
///
/// Deltas come from a [`FrameClock`], so a background tab resumes with a
/// clamped step instead of a jump. The latest `on_frame` is used on every
/// frame without restarting the loop.
#[hook]
pub fn use_animation_frame(enabled: bool, on_frame: Callback<Tick>) {
    let callback = use_mut_ref(|| on_frame.clone());
    *callback.borrow_mut() = on_frame;

    let animation_frame_id = use_mut_ref(|| None::<i32>);

    use_effect_with(enabled, move |enabled| {
        let animation_frame_id_cleanup = animation_frame_id.clone();

        // Closure reference for cleanup (to break reference cycle)
        let closure_for_cleanup: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> =
            Rc::new(RefCell::new(None));
        let closure_for_cleanup_clone = closure_for_cleanup.clone();

        if *enabled {
            let closure = closure_for_cleanup.clone();
            let closure_clone = closure.clone();
            let animation_frame_id = animation_frame_id.clone();
            let mut clock = FrameClock::new();

            *closure.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
                let tick = clock.advance_to(timestamp);
                let on_frame = callback.borrow().clone();
                on_frame.emit(tick);

                if let Some(window) = web_sys::window() {
                    if let Some(ref closure) = *closure_clone.borrow() {
                        let id = window
                            .request_animation_frame(closure.as_ref().unchecked_ref())
                            .ok();
                        *animation_frame_id.borrow_mut() = id;
                    }
                }
            }));

            if let Some(window) = web_sys::window() {
                if let Some(ref closure) = *closure.borrow() {
                    let id = window
                        .request_animation_frame(closure.as_ref().unchecked_ref())
                        .ok();
                    *animation_frame_id_cleanup.borrow_mut() = id;
                }
            }
        }

        move || {
            if let Some(id) = animation_frame_id_cleanup.borrow_mut().take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
            *closure_for_cleanup_clone.borrow_mut() = None;
        }
    });
}
