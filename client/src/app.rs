use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Document, Element, Event, EventTarget,
    HtmlButtonElement, HtmlCanvasElement, HtmlSelectElement, MouseEvent,
};

use digitpad_shared::is_valid_label;

use crate::actions::{clear_pad, end_stroke, extend_stroke, start_stroke};
use crate::dom::{event_to_point, get_element, resize_for_hidpi, set_status, sync_controls};
use crate::net::{submit_sample, MSG_FAILED, MSG_NO_LABEL, MSG_SAVED, MSG_SENDING};
use crate::state::{Phase, State, StrokeSession};

fn document_ready_state(document: &Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

fn is_primary_button(event: &Event) -> bool {
    match event.dyn_ref::<MouseEvent>() {
        Some(mouse) => mouse.button() == 0,
        None => true,
    }
}

// Touch listeners must be non-passive or preventDefault is ignored and the
// page scrolls under the stylus.
fn add_touch_listener(
    target: &EventTarget,
    kind: &str,
    listener: &Closure<dyn FnMut(Event)>,
) -> Result<(), JsValue> {
    let options = AddEventListenerOptions::new();
    options.set_passive(false);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        kind,
        listener.as_ref().unchecked_ref(),
        &options,
    )
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    if document_ready_state(&document).as_deref() == Some("complete") {
        return start_app();
    }

    let started = Rc::new(Cell::new(false));
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, "digitCanvas")?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    let digit_select: HtmlSelectElement = get_element(&document, "digitSelect")?;
    let clear_button: HtmlButtonElement = get_element(&document, "clearBtn")?;
    let submit_button: HtmlButtonElement = get_element(&document, "submitBtn")?;
    let status_el: Element = get_element(&document, "status")?;

    // The width/height attributes carry the logical size; the backing
    // buffer is scaled up from it right below.
    let state = Rc::new(RefCell::new(State {
        width: f64::from(canvas.width()),
        height: f64::from(canvas.height()),
        canvas: canvas.clone(),
        ctx,
        stroke: StrokeSession::Idle,
    }));

    {
        let mut state = state.borrow_mut();
        resize_for_hidpi(&window, &mut state);
    }
    set_status(&status_el, Phase::Idle, "");
    sync_controls(&clear_button, &submit_button, Phase::Idle);

    {
        let down_state = state.clone();
        let ondown = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if !is_primary_button(&event) {
                return;
            }
            let mut state = down_state.borrow_mut();
            let Some(point) = event_to_point(&state.canvas, &event) else {
                return;
            };
            event.prevent_default();
            start_stroke(&mut state, point);
        });
        canvas.add_event_listener_with_callback("mousedown", ondown.as_ref().unchecked_ref())?;
        add_touch_listener(canvas.as_ref(), "touchstart", &ondown)?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let onmove = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let mut state = move_state.borrow_mut();
            if !state.stroke.is_active() {
                return;
            }
            event.prevent_default();
            let Some(point) = event_to_point(&state.canvas, &event) else {
                return;
            };
            extend_stroke(&mut state, point);
        });
        canvas.add_event_listener_with_callback("mousemove", onmove.as_ref().unchecked_ref())?;
        add_touch_listener(canvas.as_ref(), "touchmove", &onmove)?;
        onmove.forget();
    }

    {
        // Release, leave and cancel all end the session the same way, so a
        // pointer escaping the canvas mid-stroke cannot leave it stuck.
        let up_state = state.clone();
        let onup = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let mut state = up_state.borrow_mut();
            if !state.stroke.is_active() {
                return;
            }
            event.prevent_default();
            end_stroke(&mut state);
        });
        canvas.add_event_listener_with_callback("mouseup", onup.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback("mouseleave", onup.as_ref().unchecked_ref())?;
        add_touch_listener(canvas.as_ref(), "touchend", &onup)?;
        add_touch_listener(canvas.as_ref(), "touchcancel", &onup)?;
        onup.forget();
    }

    {
        let clear_state = state.clone();
        let status_el_cb = status_el.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            {
                let mut state = clear_state.borrow_mut();
                clear_pad(&mut state);
            }
            set_status(&status_el_cb, Phase::Idle, "");
        });
        clear_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let submit_state = state.clone();
        let window_cb = window.clone();
        let digit_select_cb = digit_select.clone();
        let status_el_cb = status_el.clone();
        let clear_button_cb = clear_button.clone();
        let submit_button_cb = submit_button.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let label = digit_select_cb.value();
            if !is_valid_label(&label) {
                set_status(&status_el_cb, Phase::Error, MSG_NO_LABEL);
                return;
            }
            set_status(&status_el_cb, Phase::Sending, MSG_SENDING);
            sync_controls(&clear_button_cb, &submit_button_cb, Phase::Sending);

            let image = match submit_state.borrow().canvas.to_data_url_with_type("image/png") {
                Ok(url) => url,
                Err(_) => {
                    set_status(&status_el_cb, Phase::Error, MSG_FAILED);
                    sync_controls(&clear_button_cb, &submit_button_cb, Phase::Error);
                    return;
                }
            };

            let state = submit_state.clone();
            let window = window_cb.clone();
            let status_el = status_el_cb.clone();
            let clear_button = clear_button_cb.clone();
            let submit_button = submit_button_cb.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = submit_sample(&window, label, image).await;
                let phase = match result {
                    Ok(()) => {
                        let mut state = state.borrow_mut();
                        clear_pad(&mut state);
                        set_status(&status_el, Phase::Success, MSG_SAVED);
                        Phase::Success
                    }
                    Err(message) => {
                        web_sys::console::error_1(&JsValue::from_str(&message));
                        set_status(&status_el, Phase::Error, &message);
                        Phase::Error
                    }
                };
                // Single completion point: whatever the outcome, both
                // controls come back.
                sync_controls(&clear_button, &submit_button, phase);
            });
        });
        submit_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    Ok(())
}
