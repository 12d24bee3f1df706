//! Camera tracking system.

use bevy::prelude::*;

use crate::bevy::{CameraTrackerRes, CurrentSnapshot, MainCamera, PresentationClock, ViewportClass};

/// Run the tracker and write its pose into the main camera.
pub fn track_camera(
    clock: Res<PresentationClock>,
    snapshot: Res<CurrentSnapshot>,
    viewport: Res<ViewportClass>,
    mut tracker: ResMut<CameraTrackerRes>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    let frame = tracker.0.update(clock.tick(), snapshot.get(), viewport.0);
    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };
    *transform = Transform::from_translation(frame.eye).looking_at(frame.look_at, Vec3::Y);
}
