use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlCanvasElement, MouseEvent, Touch, TouchList,
    Window,
};

use crate::render::reset_surface;
use crate::state::{Phase, Point, State};

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn set_status(status_el: &Element, phase: Phase, text: &str) {
    let _ = status_el.set_attribute("data-state", phase.as_str());
    status_el.set_text_content(Some(text));
}

/// Both controls follow the flow phase: locked while a submission is in
/// flight, enabled otherwise.
pub fn sync_controls(
    clear_button: &HtmlButtonElement,
    submit_button: &HtmlButtonElement,
    phase: Phase,
) {
    let locked = matches!(phase, Phase::Sending);
    clear_button.set_disabled(locked);
    submit_button.set_disabled(locked);
}

pub fn effective_ratio(raw: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        1.0
    }
}

pub fn backing_size(logical: f64, ratio: f64) -> u32 {
    (logical * ratio) as u32
}

/// Re-dimensions the backing buffer to logical size x device pixel ratio,
/// pins the layout size to the logical size, and applies a uniform scale so
/// draw calls stay in logical coordinates. Resizing wipes the buffer and
/// resets context state, so the surface is re-initialized afterwards.
pub fn resize_for_hidpi(window: &Window, state: &mut State) {
    let ratio = effective_ratio(window.device_pixel_ratio());
    state.canvas.set_width(backing_size(state.width, ratio));
    state.canvas.set_height(backing_size(state.height, ratio));
    let style = state.canvas.style();
    let _ = style.set_property("width", &format!("{}px", state.width));
    let _ = style.set_property("height", &format!("{}px", state.height));
    let _ = state.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
    reset_surface(state);
}

pub fn resolve_position(client_x: f64, client_y: f64, origin_left: f64, origin_top: f64) -> Point {
    Point {
        x: client_x - origin_left,
        y: client_y - origin_top,
    }
}

/// Maps a mouse or touch event to logical canvas coordinates. Touch input
/// uses the first active touch point; the rest are ignored.
pub fn event_to_point(canvas: &HtmlCanvasElement, event: &Event) -> Option<Point> {
    let rect = canvas.get_bounding_client_rect();
    let (client_x, client_y) = event_client_coords(event)?;
    Some(resolve_position(client_x, client_y, rect.left(), rect.top()))
}

fn event_client_coords(event: &Event) -> Option<(f64, f64)> {
    if let Some(touch) = first_active_touch(event) {
        return Some((touch.client_x() as f64, touch.client_y() as f64));
    }
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some((mouse.client_x() as f64, mouse.client_y() as f64))
}

// Probed through Reflect: mouse events carry no `touches` list, and not
// every browser exposes a TouchEvent constructor to cast against.
fn first_active_touch(event: &Event) -> Option<Touch> {
    let touches = Reflect::get(event.as_ref(), &JsValue::from_str("touches")).ok()?;
    if touches.is_undefined() || touches.is_null() {
        return None;
    }
    let touches: TouchList = touches.unchecked_into();
    touches.get(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_relative_to_canvas_origin() {
        let point = resolve_position(120.0, 80.0, 100.0, 50.0);
        assert_eq!(point, Point { x: 20.0, y: 30.0 });
    }

    #[test]
    fn position_ignores_pixel_density() {
        // Resolution happens in logical space; the same client coordinates
        // map to the same point whatever the backing-store scale is.
        let on_standard = resolve_position(40.0, 40.0, 10.0, 10.0);
        let on_retina = resolve_position(40.0, 40.0, 10.0, 10.0);
        assert_eq!(on_standard, on_retina);
    }

    #[test]
    fn backing_size_scales_by_ratio() {
        assert_eq!(backing_size(280.0, 1.0), 280);
        assert_eq!(backing_size(280.0, 2.0), 560);
        assert_eq!(backing_size(280.0, 1.5), 420);
    }

    #[test]
    fn bogus_ratios_fall_back_to_one() {
        assert_eq!(effective_ratio(0.0), 1.0);
        assert_eq!(effective_ratio(-2.0), 1.0);
        assert_eq!(effective_ratio(f64::NAN), 1.0);
        assert_eq!(effective_ratio(2.0), 2.0);
    }
}
