//! UI components for the voyage client.

mod achievement_toast;
mod game_view;
mod sprite_canvas;

pub use achievement_toast::AchievementToast;
pub use game_view::GameView;
pub use sprite_canvas::SpriteCanvas;
