//! Scroll-linked treatment of the hero visualization.
//!
//! Scroll events fire far more often than frames paint, so the listener only
//! flips a guard flag and books a single animation frame; the frame callback
//! measures the reference element and restyles the target. At most one style
//! write per painted frame, no matter how fast the page scrolls.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Window};

use crate::scroll::{intensity, ScrollEffect, PULSE_CLASS};

pub fn attach(window: &Window, reference: HtmlElement, target: HtmlElement) -> Result<(), JsValue> {
    let pending = Rc::new(Cell::new(false));

    let apply = {
        let pending = pending.clone();
        Rc::new(Closure::wrap(Box::new(move || {
            pending.set(false);
            let Some(window) = web_sys::window() else {
                return;
            };
            let viewport = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0) as f32;
            let rect = reference.get_bounding_client_rect();
            let center = (rect.top() + rect.height() / 2.0) as f32;
            let effect = ScrollEffect::from_intensity(intensity(center, viewport));

            let style = target.style();
            let _ = style.set_property("transform", &format!("scale({:.4})", effect.scale));
            let _ = style.set_property("opacity", &format!("{:.4}", effect.opacity));
            let classes = target.class_list();
            if effect.pulse {
                let _ = classes.add_1(PULSE_CLASS);
            } else {
                let _ = classes.remove_1(PULSE_CLASS);
            }
        }) as Box<dyn FnMut()>))
    };

    let on_scroll = {
        let pending = pending.clone();
        let apply = apply.clone();
        Closure::wrap(Box::new(move || {
            if pending.get() {
                return;
            }
            pending.set(true);
            match web_sys::window() {
                Some(window) => {
                    if window
                        .request_animation_frame(apply.as_ref().as_ref().unchecked_ref())
                        .is_err()
                    {
                        pending.set(false);
                    }
                }
                None => pending.set(false),
            }
        }) as Box<dyn FnMut()>)
    };
    window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    on_scroll.forget();

    // Style the target once on load so it is correct before any scrolling.
    pending.set(true);
    window.request_animation_frame(apply.as_ref().as_ref().unchecked_ref())?;
    Ok(())
}
