// Integration tests (native) for the `wikidle-client` crate.
// These tests avoid wasm-specific functionality and exercise the browser-free
// rules so they can run under `cargo test` on the host.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use wikidle_client::modal::{ModalAction, ModalState};
use wikidle_client::scroll::{WordScrollTracker, word_class};
use wikidle_client::sync::{GameDataStore, attach_game_data, persist_game_data};
use wikidle_client::{ClientConfig, ClientResult};

#[derive(Default)]
struct MemoryStore(RefCell<Option<String>>);

impl GameDataStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.0.borrow().clone()
    }
    fn save(&self, value: &str) -> ClientResult<()> {
        *self.0.borrow_mut() = Some(value.to_string());
        Ok(())
    }
}

/// Dialog stand-in: the native `open` flag flips on show and on close completion.
struct FakeDialog {
    open: bool,
    state: ModalState<&'static str>,
}

impl FakeDialog {
    fn toggle_and_settle(&mut self) {
        match ModalAction::toggle(self.open) {
            ModalAction::Open => {
                let t = self.state.begin_open();
                self.open = true;
                self.state.finish_open(t, "game-win-modal");
            }
            ModalAction::Close => {
                let t = self.state.begin_close();
                if self.state.finish_close(t) {
                    self.open = false;
                }
            }
        }
    }
}

#[test]
fn toggling_twice_restores_closed_modal() {
    let mut dialog = FakeDialog { open: false, state: ModalState::new() };
    dialog.toggle_and_settle();
    assert!(dialog.open);
    assert_eq!(dialog.state.visible(), Some(&"game-win-modal"));
    dialog.toggle_and_settle();
    assert!(!dialog.open);
    assert_eq!(dialog.state.visible(), None);
}

#[test]
fn toggling_twice_restores_open_modal() {
    let mut dialog = FakeDialog { open: true, state: ModalState::new() };
    dialog.toggle_and_settle();
    dialog.toggle_and_settle();
    assert!(dialog.open);
}

#[test]
fn rapid_open_close_open_settles_on_last_cycle() {
    let mut st: ModalState<u8> = ModalState::new();
    let first_open = st.begin_open();
    let close = st.begin_close();
    let second_open = st.begin_open();
    // timers fire in scheduling order
    assert!(!st.finish_open(first_open, 1));
    assert!(!st.finish_close(close));
    assert!(st.finish_open(second_open, 2));
    assert_eq!(st.visible(), Some(&2));
}

#[test]
fn sub_index_grows_by_one_while_occurrences_exist() {
    let occurrences: HashSet<String> = (0..5).map(|sub| word_class(4, sub)).collect();
    let mut tracker = WordScrollTracker::new();
    for expected in 1..=5 {
        assert!(tracker.advance(4, |c| occurrences.get(c).cloned()).is_some());
        assert_eq!(tracker.position(4), expected);
    }
    // sixth call wraps to the first occurrence
    let hit = tracker.advance(4, |c| occurrences.get(c).cloned());
    assert_eq!(hit.as_deref(), Some("word-4-0"));
    assert_eq!(tracker.position(4), 1);
}

#[test]
fn stale_position_after_dom_swap_wraps() {
    let mut tracker = WordScrollTracker::new();
    let before: HashSet<String> = ["word-1-0", "word-1-1", "word-1-2"].iter().map(|s| s.to_string()).collect();
    tracker.advance(1, |c| before.get(c).cloned());
    tracker.advance(1, |c| before.get(c).cloned());
    let after: HashSet<String> = ["word-1-0"].iter().map(|s| s.to_string()).collect();
    let mut tried = Vec::new();
    let hit = tracker.advance(1, |c| {
        tried.push(c.to_string());
        after.get(c).cloned()
    });
    assert_eq!(tried, vec!["word-1-2", "word-1-0"]);
    assert_eq!(hit.as_deref(), Some("word-1-0"));
}

#[test]
fn request_cycle_round_trips_server_blob() {
    let cfg = ClientConfig::default();
    let store = MemoryStore::default();

    let mut first: HashMap<String, String> = HashMap::new();
    assert!(!attach_game_data(&store, &mut first, &cfg.form_field).unwrap());

    let blob = r#"{"i":"c0ffee","g":{"s":["rust"],"w":false,"i":"20261016"},"s":1}"#;
    assert!(persist_game_data(&store, Some(blob)).unwrap());

    let mut second: HashMap<String, String> = HashMap::new();
    assert!(attach_game_data(&store, &mut second, &cfg.form_field).unwrap());
    assert_eq!(second.get("gameData").map(String::as_str), Some(blob));

    // a response without the game-data element keeps the previous blob
    assert!(!persist_game_data(&store, None).unwrap());
    assert_eq!(store.load().as_deref(), Some(blob));
}
