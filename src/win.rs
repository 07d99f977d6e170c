//! Page changes when the article is guessed.

use web_sys::{Document, Event};

use crate::dom;
use crate::error::ClientResult;

/// Removes the word input and the attempts panel; returns how many were present.
pub fn remove_play_controls(doc: &Document, word_input_id: &str, attempts_id: &str) -> usize {
    [word_input_id, attempts_id]
        .into_iter()
        .filter_map(|id| match doc.get_element_by_id(id) {
            Some(el) => {
                el.remove();
                Some(id)
            }
            None => {
                log::debug!("#{id} already gone");
                None
            }
        })
        .count()
}

/// Makes a click anywhere in the controls container run `on_click`.
/// Returns false when the container is not in the page.
pub fn wire_controls(
    doc: &Document,
    controls_selector: &str,
    on_click: impl FnMut(Event) + 'static,
) -> ClientResult<bool> {
    let Some(controls) = dom::query(doc, controls_selector) else {
        log::warn!("{controls_selector} not in page; win modal only reachable once");
        return Ok(false);
    };
    dom::listen(&controls, "click", on_click)?;
    Ok(true)
}
