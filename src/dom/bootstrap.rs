//! Page entry point.
//!
//! Queries the landing page's known element ids and wires up whichever
//! features the markup carries: the hero canvas gets the 3D scene and its
//! animation loop, the waitlist form gets its controller, and the hero
//! section gets the scroll-linked treatment. A missing element silently
//! disables just that feature.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlFormElement, HtmlInputElement};

use crate::wasm::WasmBrainScene;

pub const CANVAS_ID: &str = "brain-canvas";
pub const FORM_ID: &str = "waitlist-form";
pub const EMAIL_INPUT_ID: &str = "waitlist-email";
pub const MESSAGE_ID: &str = "waitlist-message";
pub const AUX_ROW_ID: &str = "waitlist-row";
pub const AUX_NOTE_ID: &str = "waitlist-note";
pub const SCROLL_REFERENCE_ID: &str = "hero-section";
pub const SCROLL_TARGET_ID: &str = "brain-frame";

pub const MESH_URL: &str = "assets/brain.obj";

/// Frame deltas above this are treated as a tab-switch pause, not a slow
/// frame, and clamped so the sweep does not jump.
const MAX_FRAME_DT: f32 = 0.1;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    crate::wasm::init_panic_hook(false);

    let Some(window) = web_sys::window() else {
        return Ok(());
    };
    let Some(document) = window.document() else {
        return Ok(());
    };

    if let Some(canvas) = element_of::<HtmlCanvasElement>(&document, CANVAS_ID) {
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = boot_scene(canvas).await {
                log::warn!("hero scene unavailable: {:?}", e);
            }
        });
    } else {
        log::info!("no #{} element, skipping hero scene", CANVAS_ID);
    }

    match (
        element_of::<HtmlFormElement>(&document, FORM_ID),
        element_of::<HtmlInputElement>(&document, EMAIL_INPUT_ID),
        element_of::<HtmlElement>(&document, MESSAGE_ID),
    ) {
        (Some(form), Some(input), Some(message)) => {
            crate::dom::waitlist_form::attach(
                form,
                input,
                message,
                element_of::<HtmlElement>(&document, AUX_ROW_ID),
                element_of::<HtmlElement>(&document, AUX_NOTE_ID),
            )?;
        }
        _ => log::info!("waitlist elements missing, skipping form controller"),
    }

    match (
        element_of::<HtmlElement>(&document, SCROLL_REFERENCE_ID),
        element_of::<HtmlElement>(&document, SCROLL_TARGET_ID),
    ) {
        (Some(reference), Some(target)) => {
            crate::dom::scroll_binder::attach(&window, reference, target)?;
        }
        _ => log::info!("scroll elements missing, skipping scroll effect"),
    }

    Ok(())
}

fn element_of<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

async fn boot_scene(canvas: HtmlCanvasElement) -> Result<(), JsValue> {
    size_canvas_to_client(&canvas);
    let scene = crate::wasm::create_brain_scene(canvas.clone()).await?;
    scene.load_mesh_from_url(MESH_URL);
    attach_resize(scene.clone(), canvas)?;
    run_render_loop(scene)
}

fn size_canvas_to_client(canvas: &HtmlCanvasElement) {
    let w = canvas.client_width().max(0) as u32;
    let h = canvas.client_height().max(0) as u32;
    if w > 0 && h > 0 {
        canvas.set_width(w);
        canvas.set_height(h);
    }
}

fn attach_resize(scene: WasmBrainScene, canvas: HtmlCanvasElement) -> Result<(), JsValue> {
    let Some(window) = web_sys::window() else {
        return Ok(());
    };
    let on_resize = Closure::wrap(Box::new(move || {
        let w = canvas.client_width().max(0) as u32;
        let h = canvas.client_height().max(0) as u32;
        if w > 0 && h > 0 && (w != canvas.width() || h != canvas.height()) {
            canvas.set_width(w);
            canvas.set_height(h);
            scene.resize(w, h);
        }
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();
    Ok(())
}

/// Self-rescheduling requestAnimationFrame loop. The closure holds an `Rc`
/// to itself; dropping that handle when the scene stops lets the whole loop
/// be collected.
fn run_render_loop(scene: WasmBrainScene) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let performance = window
        .performance()
        .ok_or_else(|| JsValue::from_str("no performance clock"))?;

    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let scheduled = frame.clone();
    let last_ms = Rc::new(Cell::new(performance.now()));

    *scheduled.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !scene.is_running() {
            frame.borrow_mut().take();
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let now = window.performance().map(|p| p.now()).unwrap_or(0.0);
        let dt = ((now - last_ms.get()) / 1000.0) as f32;
        last_ms.set(now);
        scene.render(dt.clamp(0.0, MAX_FRAME_DT));
        if let Some(callback) = frame.borrow().as_ref() {
            let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = scheduled.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}
