//! Main application component.

use voyage_core::FrameSetSpec;
use yew::prelude::*;

use crate::components::GameView;
use crate::hooks::VoyageProvider;

pub const VOYAGE_CANVAS_ID: &str = "voyage-canvas";

const SHIP_SPRITE_PATH: &str = "/assets/sprites/ship";
const SHIP_SPRITE_FRAMES: usize = 24;

#[function_component(App)]
pub fn app() -> Html {
    let ship_sprite = FrameSetSpec::new(SHIP_SPRITE_PATH, SHIP_SPRITE_FRAMES)
        .with_prefix("ship_")
        .with_padding(2);

    html! {
        <VoyageProvider canvas_id={VOYAGE_CANVAS_ID}>
            <GameView ship_sprite={ship_sprite} />
        </VoyageProvider>
    }
}
