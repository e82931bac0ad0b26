//! Submit handling for the waitlist form.
//!
//! The listener drives [`FormFeedback`] and mirrors each resulting view onto
//! the page: message text and class, the input's error marker, and the
//! auxiliary row/note visibility. Valid submissions propagate to whatever
//! provider handler the page has attached; the confirmation message lands on
//! a fixed-delay timer rather than on a provider response.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlFormElement, HtmlInputElement};

use crate::waitlist::{FeedbackView, FormFeedback, CONFIRM_DELAY_MS, INPUT_ERROR_CLASS};

pub fn attach(
    form: HtmlFormElement,
    input: HtmlInputElement,
    message: HtmlElement,
    aux_row: Option<HtmlElement>,
    aux_note: Option<HtmlElement>,
) -> Result<(), JsValue> {
    let feedback = Rc::new(RefCell::new(FormFeedback::new()));

    let on_confirm: Rc<Closure<dyn FnMut()>> = {
        let feedback = feedback.clone();
        let input = input.clone();
        let message = message.clone();
        let aux_row = aux_row.clone();
        let aux_note = aux_note.clone();
        Rc::new(Closure::wrap(Box::new(move || {
            if let Some(view) = feedback.borrow_mut().confirm() {
                apply_view(&view, &input, &message, &aux_row, &aux_note);
            }
        }) as Box<dyn FnMut()>))
    };

    let on_submit = Closure::wrap(Box::new(move |event: web_sys::Event| {
        let view = feedback.borrow_mut().submit(&input.value());
        if view.block_submission {
            event.prevent_default();
        }
        apply_view(&view, &input, &message, &aux_row, &aux_note);
        if !view.block_submission {
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    on_confirm.as_ref().as_ref().unchecked_ref(),
                    CONFIRM_DELAY_MS,
                );
            }
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();
    Ok(())
}

fn apply_view(
    view: &FeedbackView,
    input: &HtmlInputElement,
    message: &HtmlElement,
    aux_row: &Option<HtmlElement>,
    aux_note: &Option<HtmlElement>,
) {
    message.set_text_content(Some(view.message));
    message.set_class_name(view.message_class);

    let classes = input.class_list();
    if view.input_invalid {
        let _ = classes.add_1(INPUT_ERROR_CLASS);
    } else {
        let _ = classes.remove_1(INPUT_ERROR_CLASS);
    }

    if view.hide_aux {
        for element in [aux_row, aux_note].into_iter().flatten() {
            let _ = element.style().set_property("display", "none");
        }
    }
}
