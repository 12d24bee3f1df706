//! Presentation time.

use bevy::prelude::*;

use crate::bevy::PresentationClock;

/// Advance the presentation clock by this frame's virtual delta.
pub fn advance_presentation_clock(time: Res<Time>, mut clock: ResMut<PresentationClock>) {
    clock.advance(time.delta_secs_f64() * 1000.0);
}
