//! Frame-based sprite animation over asynchronously loaded textures.
//!
//! The pieces are layered:
//! - [`FrameCursor`] is pure timing. It turns timestamps into a frame index at
//!   a fixed logical rate, whatever the render rate is.
//! - [`TextureSet`] owns one batch of loaded textures. Each batch load is
//!   tagged with a [`Generation`] so that a superseded load releases its own
//!   results instead of committing them.
//! - [`FrameAnimator`] and [`ImagePreloader`] combine the two for numbered
//!   frame sets and explicit path lists respectively.
//!
//! Loading is driven by the caller: `load` returns a future that the host
//! spawns (`spawn_local` in the browser, an executor in tests). Readiness is
//! polled on every tick.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::FutureExt;
use futures::future::{LocalBoxFuture, join_all};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::scheduler::{Generation, GenerationCounter};

/// Rate used when a non-positive or non-finite fps is requested.
pub const MIN_FPS: f64 = 1.0;

/// Source of textures.
///
/// `release` takes the texture by value, so each loaded texture can be handed
/// back exactly once.
pub trait TextureLoader: 'static {
    type Texture: 'static;

    fn load(&self, path: &str) -> LocalBoxFuture<'static, Result<Self::Texture, LoadError>>;

    fn release(&self, texture: Self::Texture);
}

// ============================================================================
// Frame timing
// ============================================================================

/// Frame interval in milliseconds for `fps`, clamped to at least [`MIN_FPS`].
pub fn frame_interval_ms(fps: f64) -> f64 {
    if fps.is_finite() && fps > 0.0 {
        1000.0 / fps
    } else {
        tracing::warn!(fps, "[sprite] invalid fps, clamping to {MIN_FPS}");
        1000.0 / MIN_FPS
    }
}

/// Cycling frame index advanced by whole logical intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameCursor {
    frame_count: usize,
    interval_ms: f64,
    index: usize,
    last_advance_ms: f64,
    /// Set by `reset`; the next `advance` takes its `now` as the start.
    rewound: bool,
}

impl FrameCursor {
    pub fn new(frame_count: usize, fps: f64) -> Self {
        Self {
            frame_count,
            interval_ms: frame_interval_ms(fps),
            index: 0,
            last_advance_ms: 0.0,
            rewound: false,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Change the logical rate without touching the current frame.
    pub fn set_fps(&mut self, fps: f64) {
        self.interval_ms = frame_interval_ms(fps);
    }

    /// Advance to `now_ms` and return the current index.
    ///
    /// The cursor moves by `floor((now - last) / interval)` frames and `last`
    /// moves forward by that many whole intervals, so leftover time carries
    /// over to the next call.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn advance(&mut self, now_ms: f64) -> usize {
        if self.frame_count == 0 {
            return 0;
        }
        if self.rewound {
            self.rewound = false;
            self.last_advance_ms = now_ms;
            return self.index;
        }
        let elapsed = now_ms - self.last_advance_ms;
        if elapsed >= self.interval_ms {
            let steps = (elapsed / self.interval_ms).floor();
            let wrapped = (steps as u64 % self.frame_count as u64) as usize;
            self.index = (self.index + wrapped) % self.frame_count;
            self.last_advance_ms += steps * self.interval_ms;
        }
        self.index
    }

    /// Back to frame 0. The next `advance` restarts the loop from its own
    /// timestamp instead of catching up from zero.
    pub fn reset(&mut self) {
        self.index = 0;
        self.last_advance_ms = 0.0;
        self.rewound = true;
    }
}

// ============================================================================
// Texture ownership
// ============================================================================

/// Lifecycle of a [`TextureSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Empty,
    Loading,
    Ready,
    Failed,
}

struct Slot<T> {
    generation: GenerationCounter,
    textures: Vec<T>,
    state: LoadState,
}

/// An owned batch of textures loaded together.
///
/// Dropping the set releases whatever it holds. A load that resolves after
/// the set was dropped, cleared or reloaded releases its own results.
pub struct TextureSet<L: TextureLoader> {
    loader: Rc<L>,
    slot: Rc<RefCell<Slot<L::Texture>>>,
}

impl<L: TextureLoader> TextureSet<L> {
    pub fn new(loader: Rc<L>) -> Self {
        Self {
            loader,
            slot: Rc::new(RefCell::new(Slot {
                generation: GenerationCounter::new(),
                textures: Vec::new(),
                state: LoadState::Empty,
            })),
        }
    }

    pub fn state(&self) -> LoadState {
        self.slot.borrow().state
    }

    pub fn is_ready(&self) -> bool {
        self.state() == LoadState::Ready
    }

    pub fn len(&self) -> usize {
        self.slot.borrow().textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release the current textures and invalidate any load in flight.
    fn invalidate(&self, next_state: LoadState) -> Generation {
        let mut slot = self.slot.borrow_mut();
        for texture in slot.textures.drain(..) {
            self.loader.release(texture);
        }
        slot.state = next_state;
        slot.generation.bump()
    }

    /// Release everything and return to [`LoadState::Empty`].
    pub fn clear(&mut self) {
        self.invalidate(LoadState::Empty);
    }

    /// Replace the contents with `paths`, loaded concurrently.
    ///
    /// The returned future commits the batch when every load succeeds and the
    /// request is still the latest one.
    pub fn load(&mut self, paths: &[String]) -> LocalBoxFuture<'static, ()> {
        if paths.is_empty() {
            self.clear();
            return futures::future::ready(()).boxed_local();
        }

        let generation = self.invalidate(LoadState::Loading);
        let pending: Vec<_> = paths.iter().map(|p| self.loader.load(p)).collect();
        let loader = Rc::clone(&self.loader);
        let slot = Rc::downgrade(&self.slot);

        async move {
            let results = join_all(pending).await;
            settle(loader.as_ref(), &slot, generation, results);
        }
        .boxed_local()
    }

    /// Run `f` on the texture at `index`, if loaded.
    pub fn with_texture<R>(&self, index: usize, f: impl FnOnce(&L::Texture) -> R) -> Option<R> {
        let slot = self.slot.borrow();
        if slot.state != LoadState::Ready {
            return None;
        }
        slot.textures.get(index).map(f)
    }
}

impl<L> TextureSet<L>
where
    L: TextureLoader,
    L::Texture: Clone,
{
    /// Handle to the texture at `index`, if loaded.
    pub fn texture(&self, index: usize) -> Option<L::Texture> {
        self.with_texture(index, Clone::clone)
    }
}

impl<L: TextureLoader> Drop for TextureSet<L> {
    fn drop(&mut self) {
        self.invalidate(LoadState::Empty);
    }
}

fn release_all<L: TextureLoader>(loader: &L, results: Vec<Result<L::Texture, LoadError>>) {
    for texture in results.into_iter().flatten() {
        loader.release(texture);
    }
}

fn settle<L: TextureLoader>(
    loader: &L,
    slot: &Weak<RefCell<Slot<L::Texture>>>,
    generation: Generation,
    results: Vec<Result<L::Texture, LoadError>>,
) {
    let Some(slot) = slot.upgrade() else {
        tracing::debug!("[sprite] owner gone before load settled, releasing");
        release_all(loader, results);
        return;
    };
    let mut slot = slot.borrow_mut();

    if !slot.generation.is_current(generation) {
        tracing::debug!(
            generation = generation.value(),
            current = slot.generation.current().value(),
            "[sprite] discarding superseded load"
        );
        release_all(loader, results);
        return;
    }

    let mut textures = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(texture) => textures.push(texture),
            Err(e) => errors.push(e),
        }
    }

    if let Some(first) = errors.first() {
        tracing::warn!(
            path = first.path(),
            failed = errors.len(),
            "[sprite] texture load failed: {first}"
        );
        for texture in textures {
            loader.release(texture);
        }
        slot.state = LoadState::Failed;
        return;
    }

    slot.textures = textures;
    slot.state = LoadState::Ready;
}

// ============================================================================
// Frame sets
// ============================================================================

/// Naming scheme of a numbered frame sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSetSpec {
    pub base_path: String,
    pub frame_count: usize,
    #[serde(default)]
    pub prefix: String,
    /// Minimum digit count of the frame number, zero-padded.
    #[serde(default)]
    pub padding: usize,
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    "png".to_string()
}

impl FrameSetSpec {
    pub fn new(base_path: impl Into<String>, frame_count: usize) -> Self {
        Self {
            base_path: base_path.into(),
            frame_count,
            prefix: String::new(),
            padding: 0,
            extension: default_extension(),
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Path of the 0-based frame `index`.
    pub fn frame_path(&self, index: usize) -> String {
        let base = self.base_path.trim_end_matches('/');
        format!(
            "{base}/{prefix}{index:0>width$}.{ext}",
            prefix = self.prefix,
            width = self.padding,
            ext = self.extension,
        )
    }

    pub fn paths(&self) -> Vec<String> {
        (0..self.frame_count).map(|i| self.frame_path(i)).collect()
    }
}

/// Numbered frame sequence played at a fixed rate.
pub struct FrameAnimator<L: TextureLoader> {
    spec: Option<FrameSetSpec>,
    fps: f64,
    cursor: FrameCursor,
    textures: TextureSet<L>,
}

impl<L: TextureLoader> FrameAnimator<L> {
    pub fn new(loader: Rc<L>, fps: f64) -> Self {
        Self {
            spec: None,
            fps,
            cursor: FrameCursor::new(0, fps),
            textures: TextureSet::new(loader),
        }
    }

    pub fn spec(&self) -> Option<&FrameSetSpec> {
        self.spec.as_ref()
    }

    pub fn state(&self) -> LoadState {
        self.textures.state()
    }

    /// Switch to a new frame set.
    ///
    /// Returns the load future to spawn, or `None` when nothing needs loading
    /// (same spec as before, or an empty set).
    pub fn set_spec(&mut self, spec: FrameSetSpec) -> Option<LocalBoxFuture<'static, ()>> {
        if self.spec.as_ref() == Some(&spec) {
            return None;
        }
        self.cursor = FrameCursor::new(spec.frame_count, self.fps);
        let paths = spec.paths();
        self.spec = Some(spec);

        if paths.is_empty() {
            self.textures.clear();
            return None;
        }
        tracing::debug!(frames = paths.len(), "[sprite] loading frame set");
        Some(self.textures.load(&paths))
    }

    pub fn set_fps(&mut self, fps: f64) {
        self.fps = fps;
        self.cursor.set_fps(fps);
    }

    pub fn is_ready(&self) -> bool {
        self.cursor.frame_count() > 0 && self.textures.is_ready()
    }

    /// Advance the cursor and return the index to draw, once ready.
    pub fn current_index(&mut self, now_ms: f64) -> Option<usize> {
        if !self.is_ready() {
            return None;
        }
        Some(self.cursor.advance(now_ms))
    }

    /// Rewind to the first frame without reloading.
    pub fn reset(&mut self) {
        self.cursor.reset();
    }

    /// Drop the loaded textures and forget the frame set.
    pub fn unload(&mut self) {
        self.spec = None;
        self.cursor = FrameCursor::new(0, self.fps);
        self.textures.clear();
    }
}

impl<L> FrameAnimator<L>
where
    L: TextureLoader,
    L::Texture: Clone,
{
    /// Texture to draw at `now_ms`, or `None` until every frame has loaded.
    pub fn current_frame(&mut self, now_ms: f64) -> Option<L::Texture> {
        let index = self.current_index(now_ms)?;
        self.textures.texture(index)
    }
}

/// Loads an explicit list of images and looks them up by path.
pub struct ImagePreloader<L: TextureLoader> {
    paths: Vec<String>,
    textures: TextureSet<L>,
}

impl<L: TextureLoader> ImagePreloader<L> {
    pub fn new(loader: Rc<L>) -> Self {
        Self {
            paths: Vec::new(),
            textures: TextureSet::new(loader),
        }
    }

    /// Start loading `paths`. Returns `None` if the list is unchanged.
    pub fn preload(&mut self, paths: Vec<String>) -> Option<LocalBoxFuture<'static, ()>> {
        if paths == self.paths {
            return None;
        }
        let task = self.textures.load(&paths);
        self.paths = paths;
        Some(task)
    }

    pub fn is_ready(&self) -> bool {
        !self.paths.is_empty() && self.textures.is_ready()
    }

    pub fn state(&self) -> LoadState {
        self.textures.state()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}

impl<L> ImagePreloader<L>
where
    L: TextureLoader,
    L::Texture: Clone,
{
    pub fn get(&self, path: &str) -> Option<L::Texture> {
        let index = self.paths.iter().position(|p| p == path)?;
        self.textures.texture(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    struct MockTexture {
        path: String,
    }

    #[derive(Default)]
    struct Counters {
        created: Cell<usize>,
        released: Cell<usize>,
    }

    #[derive(Default)]
    struct MockLoader {
        counters: Rc<Counters>,
        failing: RefCell<Vec<String>>,
        deferred: Cell<bool>,
        gates: RefCell<Vec<oneshot::Sender<()>>>,
    }

    impl MockLoader {
        fn deferred() -> Rc<Self> {
            let loader = Self::default();
            loader.deferred.set(true);
            Rc::new(loader)
        }

        fn open_gates(&self) {
            for gate in self.gates.borrow_mut().drain(..) {
                let _ = gate.send(());
            }
        }

        fn created(&self) -> usize {
            self.counters.created.get()
        }

        fn released(&self) -> usize {
            self.counters.released.get()
        }
    }

    impl TextureLoader for MockLoader {
        type Texture = MockTexture;

        fn load(&self, path: &str) -> LocalBoxFuture<'static, Result<MockTexture, LoadError>> {
            let counters = Rc::clone(&self.counters);
            let path = path.to_string();
            let fail = self.failing.borrow().contains(&path);
            let gate = if self.deferred.get() {
                let (tx, rx) = oneshot::channel();
                self.gates.borrow_mut().push(tx);
                Some(rx)
            } else {
                None
            };

            async move {
                if let Some(rx) = gate {
                    let _ = rx.await;
                }
                if fail {
                    return Err(LoadError::Fetch {
                        path,
                        reason: "404".to_string(),
                    });
                }
                counters.created.set(counters.created.get() + 1);
                Ok(MockTexture { path })
            }
            .boxed_local()
        }

        fn release(&self, _texture: MockTexture) {
            self.counters.released.set(self.counters.released.get() + 1);
        }
    }

    #[test]
    fn test_cursor_at_24_fps() {
        let mut cursor = FrameCursor::new(8, 24.0);
        assert_eq!(cursor.advance(0.0), 0);
        assert_eq!(cursor.advance(50.0), 1);
        assert_eq!(cursor.advance(50.0), 1);
        assert_eq!(cursor.advance(90.0), 2);
    }

    #[test]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn test_cursor_total_advance_matches_elapsed() {
        let frames = 5;
        let mut cursor = FrameCursor::new(frames, 30.0);
        let mut now = 0.0;
        // Irregular render cadence
        for step in [7.0, 16.6, 33.3, 5.0, 120.0, 16.6, 1.0, 250.0] {
            now += step;
            cursor.advance(now);
        }
        let expected = ((now / cursor.interval_ms()).floor() as usize) % frames;
        assert_eq!(cursor.index(), expected);
    }

    #[test]
    fn test_cursor_reset_and_invalid_fps() {
        let mut cursor = FrameCursor::new(4, 0.0);
        assert!((cursor.interval_ms() - 1000.0).abs() < 1e-9);
        cursor.advance(2_500.0);
        assert_eq!(cursor.index(), 2);
        cursor.reset();
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.advance(999.0), 0);

        let cursor = FrameCursor::new(4, f64::NAN);
        assert!(cursor.interval_ms().is_finite());
    }

    #[test]
    fn test_reset_restarts_from_next_timestamp() {
        let mut cursor = FrameCursor::new(24, 10.0);
        cursor.advance(1_000.0);
        cursor.reset();
        assert_eq!(cursor.advance(12_345.0), 0);
        assert_eq!(cursor.advance(12_445.0), 1);
        // Catch-up still applies after the anchor
        assert_eq!(cursor.advance(12_845.0), 5);
    }

    #[test]
    fn test_frame_paths() {
        let spec = FrameSetSpec::new("sprites/ship/", 3)
            .with_prefix("ship_")
            .with_padding(3);
        assert_eq!(spec.frame_path(2), "sprites/ship/ship_002.png");
        assert_eq!(
            FrameSetSpec::new("fx", 12).with_extension("webp").frame_path(11),
            "fx/11.webp"
        );
        assert_eq!(spec.paths().len(), 3);
    }

    #[test]
    fn test_animator_plays_after_load() {
        let loader = Rc::new(MockLoader::default());
        let mut animator = FrameAnimator::new(Rc::clone(&loader), 24.0);
        let task = animator.set_spec(FrameSetSpec::new("ship", 4)).unwrap();

        assert!(!animator.is_ready());
        assert_eq!(animator.current_frame(0.0), None);

        block_on(task);
        assert!(animator.is_ready());
        assert_eq!(animator.current_frame(0.0).unwrap().path, "ship/0.png");
        assert_eq!(animator.current_frame(50.0).unwrap().path, "ship/1.png");

        animator.reset();
        assert_eq!(animator.current_frame(10.0).unwrap().path, "ship/0.png");
    }

    #[test]
    fn test_same_spec_is_not_reloaded() {
        let loader = Rc::new(MockLoader::default());
        let mut animator = FrameAnimator::new(Rc::clone(&loader), 12.0);
        block_on(animator.set_spec(FrameSetSpec::new("a", 2)).unwrap());
        assert!(animator.set_spec(FrameSetSpec::new("a", 2)).is_none());
        assert_eq!(loader.created(), 2);
        assert_eq!(loader.released(), 0);
    }

    #[test]
    fn test_empty_frame_set_is_never_ready() {
        let loader = Rc::new(MockLoader::default());
        let mut animator = FrameAnimator::new(Rc::clone(&loader), 12.0);
        assert!(animator.set_spec(FrameSetSpec::new("none", 0)).is_none());
        assert!(!animator.is_ready());
        assert_eq!(animator.current_frame(1_000.0), None);
        assert_eq!(loader.created(), 0);
    }

    #[test]
    fn test_reload_releases_previous_set_once() {
        let loader = Rc::new(MockLoader::default());
        let mut animator = FrameAnimator::new(Rc::clone(&loader), 12.0);
        block_on(animator.set_spec(FrameSetSpec::new("a", 3)).unwrap());
        block_on(animator.set_spec(FrameSetSpec::new("b", 2)).unwrap());
        assert_eq!(loader.released(), 3);

        drop(animator);
        assert_eq!(loader.created(), 5);
        assert_eq!(loader.released(), 5);
    }

    #[test]
    fn test_superseded_load_is_discarded() {
        let loader = MockLoader::deferred();
        let mut animator = FrameAnimator::new(Rc::clone(&loader), 12.0);
        let first = animator.set_spec(FrameSetSpec::new("a", 3)).unwrap();
        let second = animator.set_spec(FrameSetSpec::new("b", 2)).unwrap();

        loader.open_gates();
        block_on(second);
        block_on(first);

        assert!(animator.is_ready());
        assert_eq!(animator.current_frame(0.0).unwrap().path, "b/0.png");
        assert_eq!(loader.released(), 3);

        drop(animator);
        assert_eq!(loader.created(), loader.released());
    }

    #[test]
    fn test_drop_while_loading_balances() {
        let loader = MockLoader::deferred();
        let mut animator = FrameAnimator::new(Rc::clone(&loader), 12.0);
        let task = animator.set_spec(FrameSetSpec::new("a", 4)).unwrap();
        drop(animator);

        loader.open_gates();
        block_on(task);
        assert_eq!(loader.created(), 4);
        assert_eq!(loader.released(), 4);
    }

    #[test]
    fn test_partial_failure() {
        let loader = Rc::new(MockLoader::default());
        loader.failing.borrow_mut().push("a/1.png".to_string());
        let mut animator = FrameAnimator::new(Rc::clone(&loader), 12.0);
        block_on(animator.set_spec(FrameSetSpec::new("a", 3)).unwrap());

        assert_eq!(animator.state(), LoadState::Failed);
        assert!(!animator.is_ready());
        assert_eq!(animator.current_frame(0.0), None);
        assert_eq!(loader.created(), 2);
        assert_eq!(loader.released(), 2);
    }

    #[test]
    fn test_preloader_lookup() {
        let loader = Rc::new(MockLoader::default());
        let mut preloader = ImagePreloader::new(Rc::clone(&loader));
        let paths = vec!["icons/first.png".to_string(), "icons/streak.png".to_string()];
        block_on(preloader.preload(paths.clone()).unwrap());

        assert!(preloader.is_ready());
        assert_eq!(
            preloader.get("icons/streak.png").unwrap().path,
            "icons/streak.png"
        );
        assert!(preloader.get("icons/missing.png").is_none());
        assert!(preloader.preload(paths).is_none());

        drop(preloader);
        assert_eq!(loader.released(), 2);
    }
}
