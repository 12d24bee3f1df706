//! Sprite frame animation hook.

use std::cell::RefCell;
use std::rc::Rc;

use voyage_core::{FrameAnimator, FrameSetSpec, LoadState};
use web_sys::HtmlImageElement;
use yew::prelude::*;

use crate::loader::HtmlImageLoader;

/// Handle returned by [`use_frame_animator`].
#[derive(Clone)]
pub struct FrameAnimatorHandle {
    animator: Rc<RefCell<FrameAnimator<HtmlImageLoader>>>,
    /// Load state as of the last render.
    pub state: LoadState,
}

impl FrameAnimatorHandle {
    pub fn is_ready(&self) -> bool {
        self.animator.borrow().is_ready()
    }

    /// Image to draw at `now_ms`, once every frame has loaded.
    pub fn current_frame(&self, now_ms: f64) -> Option<HtmlImageElement> {
        self.animator.borrow_mut().current_frame(now_ms)
    }

    pub fn reset(&self) {
        self.animator.borrow_mut().reset();
    }
}

/// Loads the frames of `spec` and plays them at `fps`.
///
/// Changing `spec` drops the previous frames; a load still in flight for the
/// old spec is discarded when it settles. `None` unloads everything.
#[hook]
pub fn use_frame_animator(spec: Option<FrameSetSpec>, fps: f64) -> FrameAnimatorHandle {
    let animator = use_mut_ref(|| FrameAnimator::new(Rc::new(HtmlImageLoader), fps));
    let state = use_state(|| LoadState::Empty);

    {
        let animator = animator.clone();
        let state = state.clone();
        use_effect_with(spec, move |spec| {
            let task = match spec.clone() {
                Some(spec) => animator.borrow_mut().set_spec(spec),
                None => {
                    animator.borrow_mut().unload();
                    None
                }
            };
            state.set(animator.borrow().state());

            if let Some(task) = task {
                let animator = Rc::downgrade(&animator);
                wasm_bindgen_futures::spawn_local(async move {
                    task.await;
                    if let Some(animator) = animator.upgrade() {
                        state.set(animator.borrow().state());
                    }
                });
            }
            || ()
        });
    }

    {
        let animator = animator.clone();
        use_effect_with(fps, move |fps| {
            animator.borrow_mut().set_fps(*fps);
            || ()
        });
    }

    FrameAnimatorHandle {
        animator,
        state: *state,
    }
}
