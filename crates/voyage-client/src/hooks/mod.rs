mod use_achievement_bridge;
mod use_animation_frame;
mod use_frame_animator;
mod use_image_preloader;
mod use_notifications;
mod use_voyage;

pub use use_achievement_bridge::use_achievement_bridge;
pub use use_animation_frame::use_animation_frame;
pub use use_frame_animator::*;
pub use use_image_preloader::*;
pub use use_notifications::use_notifications;
pub use use_voyage::*;
