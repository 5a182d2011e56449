use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlCanvasElement, HtmlImageElement, KeyboardEvent, PointerEvent, WheelEvent};
use yew::prelude::*;

use super::app::Session;
use crate::model::{Rgb, Size, Theme, Vec2};
use crate::render;
use crate::state::GestureState;
use crate::state::markers::HIT_TOLERANCE_PX;
use crate::util::vibrate_soft;

const MAP_IMAGE_SRC: &str = "map.png";
/// Per-keypress zoom factor for the +/- shortcuts.
const KEY_ZOOM_STEP: f64 = 1.2;
/// Wheel delta to zoom-factor conversion, exp(-delta * rate).
const WHEEL_ZOOM_RATE: f64 = 0.001;

#[derive(Properties, PartialEq, Clone)]
pub struct MapViewProps {
    pub session: Rc<RefCell<Session>>,
    pub theme: Theme,
    pub color: Rgb,
    /// Changes whenever markers were mutated outside this component.
    pub marker_epoch: u32,
}

fn event_pos(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

fn canvas_center(canvas: &HtmlCanvasElement) -> Vec2 {
    Vec2::new(canvas.width() as f64 / 2.0, canvas.height() as f64 / 2.0)
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let gesture = use_mut_ref(GestureState::default);
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);

    // Redraw when theme, color, or outside marker mutations land.
    {
        let draw_ref = draw_ref.clone();
        use_effect_with(
            (props.theme, props.color, props.marker_epoch),
            move |_| {
                if let Some(f) = &*draw_ref.borrow() {
                    f();
                }
                || ()
            },
        );
    }

    // Mount: canvas sizing, image load, all input listeners.
    {
        let canvas_ref = canvas_ref.clone();
        let session = props.session.clone();
        let gesture = gesture.clone();
        let draw_ref_setup = draw_ref.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let canvas: HtmlCanvasElement = canvas_ref
                .cast::<HtmlCanvasElement>()
                .expect("canvas_ref not attached to a canvas element");

            let apply_canvas_size = {
                let canvas = canvas.clone();
                let window = window.clone();
                move || {
                    let width = window
                        .inner_width()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(800.0);
                    let height = window
                        .inner_height()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(600.0);
                    canvas.set_width(width.max(0.0) as u32);
                    canvas.set_height(height.max(0.0) as u32);
                }
            };
            apply_canvas_size();

            let image = HtmlImageElement::new().expect("image element");

            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let session = session.clone();
                let image = image.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let s = session.borrow();
                    render::draw_scene(&canvas, &image, &s.view, &s.markers, s.theme);
                })
            };
            *draw_ref_setup.borrow_mut() = Some(draw_closure.clone());

            // Image metadata arrival unlocks every coordinate operation:
            // until then gestures are ignored, afterwards the fit scale is
            // known and a first run snaps to it.
            let image_load_cb = {
                let session = session.clone();
                let canvas = canvas.clone();
                let image = image.clone();
                let draw = draw_closure.clone();
                Closure::wrap(Box::new(move || {
                    let mut s = session.borrow_mut();
                    s.view.image_natural = Size::new(
                        image.natural_width() as f64,
                        image.natural_height() as f64,
                    );
                    let viewport = Size::new(canvas.width() as f64, canvas.height() as f64);
                    s.view.recompute_min_scale(viewport);
                    if s.first_run {
                        s.view.scale = s.view.min_scale;
                        s.view.translation = Vec2::default();
                        s.first_run = false;
                    } else {
                        s.view.clamp_scale();
                    }
                    s.persist();
                    drop(s);
                    draw();
                }) as Box<dyn FnMut()>)
            };
            image.set_onload(Some(image_load_cb.as_ref().unchecked_ref()));
            image.set_src(MAP_IMAGE_SRC);

            let pointerdown_cb = {
                let canvas = canvas.clone();
                let session = session.clone();
                let gesture = gesture.clone();
                Closure::wrap(Box::new(move |e: PointerEvent| {
                    e.prevent_default();
                    let s = session.borrow();
                    if !s.view.is_ready() {
                        return;
                    }
                    let _ = canvas.set_pointer_capture(e.pointer_id());
                    let pos = event_pos(&canvas, e.client_x(), e.client_y());
                    gesture.borrow_mut().pointer_down(e.pointer_id(), pos, &s.view);
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "pointerdown",
                    pointerdown_cb.as_ref().unchecked_ref(),
                )
                .ok();

            let pointermove_cb = {
                let canvas = canvas.clone();
                let session = session.clone();
                let gesture = gesture.clone();
                let draw = draw_closure.clone();
                Closure::wrap(Box::new(move |e: PointerEvent| {
                    e.prevent_default();
                    let mut s = session.borrow_mut();
                    let pos = event_pos(&canvas, e.client_x(), e.client_y());
                    let center = canvas_center(&canvas);
                    let changed =
                        gesture
                            .borrow_mut()
                            .pointer_move(e.pointer_id(), pos, center, &mut s.view);
                    if changed {
                        s.persist();
                        drop(s);
                        draw();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "pointermove",
                    pointermove_cb.as_ref().unchecked_ref(),
                )
                .ok();

            let pointerup_cb = {
                let canvas = canvas.clone();
                let session = session.clone();
                let gesture = gesture.clone();
                let draw = draw_closure.clone();
                Closure::wrap(Box::new(move |e: PointerEvent| {
                    e.prevent_default();
                    let mut s = session.borrow_mut();
                    let pos = event_pos(&canvas, e.client_x(), e.client_y());
                    let tap = gesture
                        .borrow_mut()
                        .pointer_up(e.pointer_id(), pos, now_ms(), &s.view);
                    if let Some(at) = tap {
                        let center = canvas_center(&canvas);
                        let map_pt = s.view.screen_to_map(center, at);
                        let tolerance = HIT_TOLERANCE_PX / s.view.scale;
                        let color = s.color;
                        let seed = js_sys::Math::random() * 1000.0;
                        s.markers.toggle(map_pt, tolerance, color, seed);
                        vibrate_soft();
                        s.persist();
                        drop(s);
                        draw();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "pointerup",
                    pointerup_cb.as_ref().unchecked_ref(),
                )
                .ok();

            let pointercancel_cb = {
                let session = session.clone();
                let gesture = gesture.clone();
                Closure::wrap(Box::new(move |e: PointerEvent| {
                    let s = session.borrow();
                    gesture.borrow_mut().pointer_cancel(e.pointer_id(), &s.view);
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "pointercancel",
                    pointercancel_cb.as_ref().unchecked_ref(),
                )
                .ok();

            let wheel_cb = {
                let canvas = canvas.clone();
                let session = session.clone();
                let draw = draw_closure.clone();
                Closure::wrap(Box::new(move |e: WheelEvent| {
                    e.prevent_default();
                    let mut s = session.borrow_mut();
                    if !s.view.is_ready() {
                        return;
                    }
                    let anchor = event_pos(&canvas, e.client_x(), e.client_y());
                    let center = canvas_center(&canvas);
                    let factor = (-e.delta_y() * WHEEL_ZOOM_RATE).exp();
                    let target = s.view.scale * factor;
                    s.view.zoom_about(center, anchor, target);
                    s.persist();
                    drop(s);
                    draw();
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref())
                .ok();

            let keydown_cb = {
                let canvas = canvas.clone();
                let session = session.clone();
                let draw = draw_closure.clone();
                Closure::wrap(Box::new(move |e: KeyboardEvent| {
                    let factor = match e.key().as_str() {
                        "+" | "=" => KEY_ZOOM_STEP,
                        "-" | "_" => 1.0 / KEY_ZOOM_STEP,
                        _ => return,
                    };
                    e.prevent_default();
                    let mut s = session.borrow_mut();
                    if !s.view.is_ready() {
                        return;
                    }
                    let center = canvas_center(&canvas);
                    s.view.zoom_step(center, factor);
                    s.persist();
                    drop(s);
                    draw();
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("keydown", keydown_cb.as_ref().unchecked_ref())
                .ok();

            let resize_cb = {
                let canvas = canvas.clone();
                let session = session.clone();
                let draw = draw_closure.clone();
                let apply_canvas_size = apply_canvas_size.clone();
                Closure::wrap(Box::new(move || {
                    apply_canvas_size();
                    let mut s = session.borrow_mut();
                    let viewport = Size::new(canvas.width() as f64, canvas.height() as f64);
                    s.view.recompute_min_scale(viewport);
                    s.persist();
                    drop(s);
                    draw();
                }) as Box<dyn FnMut()>)
            };
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                .ok();

            draw_closure();

            move || {
                let _ = window.remove_event_listener_with_callback(
                    "keydown",
                    keydown_cb.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                drop(image_load_cb);
                drop(pointerdown_cb);
                drop(pointermove_cb);
                drop(pointerup_cb);
                drop(pointercancel_cb);
                drop(wheel_cb);
            }
        });
    }

    html! {
        <canvas
            ref={canvas_ref}
            style="position:absolute; inset:0; touch-action:none; cursor:grab;"
        />
    }
}
