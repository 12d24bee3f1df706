//! SpriteCanvas component - plays a numbered frame sequence on a 2D canvas.

use voyage_core::{FrameSetSpec, Tick};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

use crate::hooks::{use_animation_frame, use_frame_animator};

#[derive(Properties, PartialEq)]
pub struct SpriteCanvasProps {
    pub spec: FrameSetSpec,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    #[prop_or_default]
    pub class: Classes,
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

/// Draws nothing until every frame has loaded, then loops the sequence.
#[function_component(SpriteCanvas)]
pub fn sprite_canvas(props: &SpriteCanvasProps) -> Html {
    let canvas_ref = use_node_ref();
    let animator = use_frame_animator(Some(props.spec.clone()), props.fps);
    let ready = animator.is_ready();

    // Loop time restarts with each animation so the first frame is frame 0.
    let origin_ms = use_mut_ref(|| None::<f64>);
    {
        let origin_ms = origin_ms.clone();
        let animator = animator.clone();
        use_effect_with(props.spec.clone(), move |_| {
            *origin_ms.borrow_mut() = None;
            animator.reset();
            || ()
        });
    }

    let on_frame = {
        let canvas_ref = canvas_ref.clone();
        let animator = animator.clone();
        let width = f64::from(props.width);
        let height = f64::from(props.height);
        Callback::from(move |tick: Tick| {
            let origin = *origin_ms.borrow_mut().get_or_insert(tick.elapsed_ms);
            let Some(frame) = animator.current_frame(tick.elapsed_ms - origin) else {
                return;
            };
            let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() else {
                return;
            };
            let Some(ctx) = context_2d(&canvas) else {
                return;
            };
            ctx.clear_rect(0.0, 0.0, width, height);
            if let Err(e) =
                ctx.draw_image_with_html_image_element_and_dw_and_dh(&frame, 0.0, 0.0, width, height)
            {
                tracing::debug!("[sprite] draw failed: {:?}", e);
            }
        })
    };

    use_animation_frame(ready, on_frame);

    html! {
        <canvas
            ref={canvas_ref}
            class={props.class.clone()}
            width={props.width.to_string()}
            height={props.height.to_string()}
        />
    }
}
