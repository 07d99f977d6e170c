//! Thin helpers over `web_sys` globals: window/document lookup, fire-and-forget
//! timers and listener registration.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlElement, Window};

use crate::error::{ClientError, ClientResult};

pub(crate) fn window() -> ClientResult<Window> {
    web_sys::window().ok_or(ClientError::NoWindow)
}

pub(crate) fn document() -> ClientResult<Document> {
    window()?.document().ok_or(ClientError::NoDocument)
}

/// The `<html>` element the modal marker classes and custom property live on.
pub(crate) fn root_element(doc: &Document) -> ClientResult<HtmlElement> {
    doc.document_element()
        .ok_or_else(|| ClientError::MissingElement("documentElement".into()))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| ClientError::WrongElement { id: "documentElement".into(), expected: "HTMLElement" })
}

/// First element matching `selector`; an invalid selector counts as no match.
pub(crate) fn query(doc: &Document, selector: &str) -> Option<Element> {
    doc.query_selector(selector).ok().flatten()
}

/// Run `f` once after `ms` milliseconds. There is no cancellation handle; callers
/// guard against stale callbacks themselves.
pub(crate) fn set_timeout(ms: i32, f: impl FnOnce() + 'static) -> ClientResult<i32> {
    let callback = Closure::once_into_js(f);
    let handle = window()?
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), ms)?;
    Ok(handle)
}

/// Logs a failed DOM mutation from a timer callback, where there is no caller
/// to propagate to.
pub(crate) fn warn_on_err<T>(context: &str, result: Result<T, JsValue>) {
    if let Err(err) = result {
        log::warn!("{context}: {}", ClientError::from(err));
    }
}

/// Attach a listener for the page lifetime; the closure is leaked.
pub(crate) fn listen<E>(target: &EventTarget, event: &str, handler: impl FnMut(E) + 'static) -> ClientResult<()>
where
    E: JsCast + 'static,
{
    let mut handler = handler;
    let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
        if let Ok(evt) = evt.dyn_into::<E>() {
            handler(evt);
        }
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
