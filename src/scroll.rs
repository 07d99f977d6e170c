//! Word occurrence navigation and page scroll utilities.
//!
//! Every occurrence of a guessed word carries a class `word-{index}-{sub}`,
//! where `index` is the attempt number and `sub` counts occurrences in the
//! article. Clicking an attempt cycles through its occurrences.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, ScrollToOptions,
    Window,
};

use crate::config::{HIDDEN_CLASS, HIGHLIGHT_CLASS, HIT_CLASS};
use crate::dom;
use crate::error::ClientResult;

/// Class naming the `sub`-th occurrence of word group `index`.
pub fn word_class(index: u32, sub: u32) -> String {
    format!("word-{index}-{sub}")
}

/// Next occurrence to visit, per word group. Lives for the page session.
#[derive(Debug, Default)]
pub struct WordScrollTracker {
    positions: HashMap<u32, u32>,
}

impl WordScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sub-index the next call for `index` will try first (0 if never seen).
    pub fn position(&self, index: u32) -> u32 {
        self.positions.get(&index).copied().unwrap_or(0)
    }

    /// Looks up the current occurrence of `index` via `lookup` (given a class
    /// name). When it is missing the position wraps to 0 and the lookup is
    /// retried once. The position advances only when an occurrence was found.
    pub fn advance<T>(&mut self, index: u32, mut lookup: impl FnMut(&str) -> Option<T>) -> Option<T> {
        let sub = self.positions.entry(index).or_insert(0);
        let found = match lookup(&word_class(index, *sub)) {
            Some(found) => Some(found),
            None => {
                *sub = 0;
                lookup(&word_class(index, 0))
            }
        };
        if found.is_some() {
            *sub += 1;
        }
        found
    }
}

/// Scrolls the next occurrence of word group `index` to the viewport centre and
/// replays its hit pulse. Returns false (and logs) when the group has no
/// occurrence in the page.
pub fn scroll_to_next_word(
    tracker: &mut WordScrollTracker,
    doc: &Document,
    index: u32,
    flash_ms: i32,
) -> ClientResult<bool> {
    let word = tracker.advance(index, |class| dom::query(doc, &format!(".{class}")));
    let Some(word) = word else {
        log::warn!("no occurrence of word group {index} in page");
        return Ok(false);
    };

    let opts = ScrollIntoViewOptions::new();
    opts.set_behavior(ScrollBehavior::Smooth);
    opts.set_block(ScrollLogicalPosition::Center);
    word.scroll_into_view_with_scroll_into_view_options(&opts);

    word.class_list().remove_1(HIT_CLASS)?;
    let pulsed = word.clone();
    dom::set_timeout(flash_ms, move || {
        dom::warn_on_err("hit pulse", pulsed.class_list().add_1(HIT_CLASS));
    })?;
    Ok(true)
}

/// Drops the `highlight` marker everywhere; returns how many elements had it.
pub fn unhighlight_words(doc: &Document) -> ClientResult<u32> {
    let nodes = doc.query_selector_all(&format!(".{HIGHLIGHT_CLASS}"))?;
    let mut cleared = 0;
    // NodeList is static, so removing the class does not shift indices
    for i in 0..nodes.length() {
        let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        el.class_list().remove_1(HIGHLIGHT_CLASS)?;
        cleared += 1;
    }
    Ok(cleared)
}

// --- Page scrolling ------------------------------------------------------------

/// Whether the scroll-to-top button should show at vertical offset `scroll_y`.
pub fn up_button_visible(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

pub fn scrollbar_visible(body_scroll_height: i32, screen_height: i32) -> bool {
    body_scroll_height > screen_height
}

/// Scrolls the attempts panel to its last entry.
pub fn scroll_attempts_to_bottom(doc: &Document, attempts_id: &str) {
    match doc.get_element_by_id(attempts_id) {
        Some(panel) => panel.scroll_with_x_and_y(0.0, f64::from(panel.scroll_height())),
        None => log::debug!("#{attempts_id} not in page"),
    }
}

pub fn update_up_button(win: &Window, doc: &Document, button_id: &str, threshold: f64) -> ClientResult<()> {
    let Some(button) = doc.get_element_by_id(button_id) else {
        return Ok(());
    };
    let classes = button.class_list();
    if up_button_visible(win.scroll_y()?, threshold) {
        classes.remove_1(HIDDEN_CLASS)?;
    } else {
        classes.add_1(HIDDEN_CLASS)?;
    }
    Ok(())
}

pub fn scroll_to_top(win: &Window) {
    let opts = ScrollToOptions::new();
    opts.set_top(0.0);
    opts.set_behavior(ScrollBehavior::Smooth);
    win.scroll_to_with_scroll_to_options(&opts);
}

/// Whether the body is taller than the screen. Informational only.
pub fn is_scrollbar_visible(win: &Window, doc: &Document) -> ClientResult<bool> {
    let Some(body) = doc.body() else {
        return Ok(false);
    };
    let screen_height = win.screen()?.height()?;
    Ok(scrollbar_visible(body.scroll_height(), screen_height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn page(classes: &[&str]) -> HashSet<String> {
        classes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn class_name_format() {
        assert_eq!(word_class(3, 0), "word-3-0");
        assert_eq!(word_class(12, 7), "word-12-7");
    }

    #[test]
    fn unseen_index_starts_at_zero() {
        let mut tracker = WordScrollTracker::new();
        let dom = page(&["word-1-0", "word-1-1"]);
        let mut tried = Vec::new();
        let hit = tracker.advance(1, |c| {
            tried.push(c.to_string());
            dom.get(c).cloned()
        });
        assert_eq!(tried, vec!["word-1-0"]);
        assert_eq!(hit.as_deref(), Some("word-1-0"));
        assert_eq!(tracker.position(1), 1);
    }

    #[test]
    fn cycles_then_wraps_with_one_retry() {
        let mut tracker = WordScrollTracker::new();
        let dom = page(&["word-2-0", "word-2-1"]);
        let mut visited = Vec::new();
        for _ in 0..3 {
            visited.push(tracker.advance(2, |c| dom.get(c).cloned()).unwrap());
        }
        assert_eq!(visited, vec!["word-2-0", "word-2-1", "word-2-0"]);
        assert_eq!(tracker.position(2), 1);
    }

    #[test]
    fn missing_group_is_a_noop_left_at_zero() {
        let mut tracker = WordScrollTracker::new();
        let mut lookups = 0;
        let hit: Option<String> = tracker.advance(9, |_| {
            lookups += 1;
            None
        });
        assert!(hit.is_none());
        assert_eq!(lookups, 2);
        assert_eq!(tracker.position(9), 0);
    }

    #[test]
    fn groups_are_independent() {
        let mut tracker = WordScrollTracker::new();
        let dom = page(&["word-1-0", "word-1-1", "word-2-0"]);
        tracker.advance(1, |c| dom.get(c).cloned());
        tracker.advance(1, |c| dom.get(c).cloned());
        assert_eq!(tracker.position(1), 2);
        assert_eq!(tracker.position(2), 0);
    }

    #[test]
    fn up_button_threshold_is_exclusive() {
        assert!(!up_button_visible(200.0, 200.0));
        assert!(up_button_visible(200.5, 200.0));
        assert!(!up_button_visible(0.0, 200.0));
    }

    #[test]
    fn scrollbar_visibility() {
        assert!(scrollbar_visible(2000, 1080));
        assert!(!scrollbar_visible(1080, 1080));
    }
}
