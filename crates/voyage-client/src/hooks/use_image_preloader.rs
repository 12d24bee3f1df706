//! Image preloading hook.

use std::cell::RefCell;
use std::rc::Rc;

use voyage_core::{ImagePreloader, LoadState};
use web_sys::HtmlImageElement;
use yew::prelude::*;

use crate::loader::HtmlImageLoader;

#[derive(Clone)]
pub struct ImagePreloaderHandle {
    preloader: Rc<RefCell<ImagePreloader<HtmlImageLoader>>>,
    pub state: LoadState,
}

impl ImagePreloaderHandle {
    /// True once every path has loaded.
    pub fn is_ready(&self) -> bool {
        self.preloader.borrow().is_ready()
    }

    pub fn get(&self, path: &str) -> Option<HtmlImageElement> {
        self.preloader.borrow().get(path)
    }
}

/// Loads `paths` up front so later `<img>` and canvas draws hit the cache.
#[hook]
pub fn use_image_preloader(paths: Vec<String>) -> ImagePreloaderHandle {
    let preloader = use_mut_ref(|| ImagePreloader::new(Rc::new(HtmlImageLoader)));
    let state = use_state(|| LoadState::Empty);

    {
        let preloader = preloader.clone();
        let state = state.clone();
        use_effect_with(paths, move |paths| {
            let task = preloader.borrow_mut().preload(paths.clone());
            state.set(preloader.borrow().state());

            if let Some(task) = task {
                let preloader = Rc::downgrade(&preloader);
                wasm_bindgen_futures::spawn_local(async move {
                    task.await;
                    if let Some(preloader) = preloader.upgrade() {
                        state.set(preloader.borrow().state());
                    }
                });
            }
            || ()
        });
    }

    ImagePreloaderHandle {
        preloader,
        state: *state,
    }
}
