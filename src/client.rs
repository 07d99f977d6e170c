//! Page-session controller.
//!
//! One [`Client`] per page, created by `startClient()`. It owns the modal
//! controller, the word scroll positions and the sync component, and wires the
//! document listeners that drive them.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, KeyboardEvent, MouseEvent};

use crate::config::ClientConfig;
use crate::dom;
use crate::error::{ClientError, ClientResult};
use crate::modal::ModalController;
use crate::scroll::{self, WordScrollTracker};
use crate::sync::{GameDataSync, RequestDetail};
use crate::win;

pub struct Client {
    config: ClientConfig,
    modal: ModalController,
    words: WordScrollTracker,
    sync: GameDataSync,
    controls_wired: bool,
}

thread_local! {
    static CLIENT: RefCell<Option<Client>> = const { RefCell::new(None) };
}

/// Runs `f` against the page client.
pub(crate) fn with_client<R>(f: impl FnOnce(&mut Client) -> ClientResult<R>) -> ClientResult<R> {
    CLIENT.with(|cell| {
        let mut slot = cell.try_borrow_mut().map_err(|_| ClientError::Js("client re-entered".into()))?;
        let client = slot.as_mut().ok_or(ClientError::NotInitialized)?;
        f(client)
    })
}

fn report(context: &str, result: ClientResult<impl Sized>) {
    if let Err(err) = result {
        log::error!("{context}: {err}");
    }
}

/// Creates the page client and wires its listeners.
pub(crate) fn start(config: ClientConfig) -> ClientResult<()> {
    start_with(config, |config| {
        wire_document(config)?;
        if config.install_globals {
            install_globals()?;
        }
        Ok(())
    })
}

/// Installs the client, then runs `wire`. A failed wiring uninstalls it again
/// so a later start can retry.
fn start_with(
    config: ClientConfig,
    wire: impl FnOnce(&ClientConfig) -> ClientResult<()>,
) -> ClientResult<()> {
    let installed = CLIENT.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_some() {
            return false;
        }
        *slot = Some(Client::new(config.clone()));
        true
    });
    if !installed {
        return Err(ClientError::AlreadyStarted);
    }
    log::set_max_level(config.level_filter());

    if let Err(err) = wire(&config) {
        // listeners attached so far report NotInitialized until a retry succeeds
        CLIENT.with(|cell| *cell.borrow_mut() = None);
        return Err(err);
    }
    log::info!("wikidle client started");
    Ok(())
}

impl Client {
    fn new(config: ClientConfig) -> Self {
        Self {
            modal: ModalController::new(&config),
            words: WordScrollTracker::new(),
            sync: GameDataSync::new(&config),
            controls_wired: false,
            config,
        }
    }

    pub fn toggle_modal(&mut self) -> ClientResult<()> {
        self.modal.toggle(&dom::window()?, &dom::document()?)
    }

    pub fn scroll_to_next_word(&mut self, index: u32) -> ClientResult<bool> {
        scroll::scroll_to_next_word(&mut self.words, &dom::document()?, index, self.config.flash_ms)
    }

    pub fn unhighlight_words(&self) -> ClientResult<u32> {
        scroll::unhighlight_words(&dom::document()?)
    }

    pub fn scroll_to_top(&self) -> ClientResult<()> {
        scroll::scroll_to_top(&dom::window()?);
        Ok(())
    }

    pub fn is_scrollbar_visible(&self) -> ClientResult<bool> {
        scroll::is_scrollbar_visible(&dom::window()?, &dom::document()?)
    }

    /// Drops the play controls, lets the controls bar reopen the win modal,
    /// and opens it.
    pub fn on_game_win(&mut self) -> ClientResult<()> {
        let doc = dom::document()?;
        win::remove_play_controls(&doc, &self.config.word_input_id, &self.config.attempts_id);
        if !self.controls_wired {
            self.controls_wired = win::wire_controls(&doc, &self.config.controls_selector, |_evt: Event| {
                report("controls click", with_client(|c| c.toggle_modal()));
            })?;
        }
        log::info!("game won");
        self.toggle_modal()
    }

    pub fn before_request(&self, event: &Event) -> ClientResult<bool> {
        self.sync.before_request(&dom::window()?, RequestDetail::from_event(event))
    }

    pub fn after_request(&self) -> ClientResult<bool> {
        self.sync.after_request(&dom::window()?, &dom::document()?)
    }

    fn on_page_load(&self) -> ClientResult<()> {
        scroll::scroll_attempts_to_bottom(&dom::document()?, &self.config.attempts_id);
        Ok(())
    }

    fn on_scroll(&self) -> ClientResult<()> {
        scroll::update_up_button(
            &dom::window()?,
            &dom::document()?,
            &self.config.up_button_id,
            self.config.up_button_threshold,
        )
    }
}

fn wire_document(config: &ClientConfig) -> ClientResult<()> {
    let doc = dom::document()?;

    dom::listen(&doc, "click", |evt: MouseEvent| {
        report(
            "modal click",
            with_client(|c| c.modal.on_click(&dom::document()?, &evt)),
        );
    })?;
    dom::listen(&doc, "keydown", |evt: KeyboardEvent| {
        report(
            "modal keydown",
            with_client(|c| c.modal.on_keydown(&dom::document()?, &evt)),
        );
    })?;
    dom::listen(&doc, "scroll", |_evt: Event| {
        report("scroll", with_client(|c| c.on_scroll()));
    })?;
    dom::listen(&doc, &config.pre_request_event, |evt: Event| {
        report("before request", with_client(|c| c.before_request(&evt)));
    })?;
    dom::listen(&doc, &config.post_request_event, |_evt: Event| {
        report("after request", with_client(|c| c.after_request()));
    })?;

    if doc.ready_state() == "loading" {
        dom::listen(&doc, "DOMContentLoaded", |_evt: Event| {
            report("page load", with_client(|c| c.on_page_load()));
        })?;
    } else {
        with_client(|c| c.on_page_load())?;
    }
    Ok(())
}

/// Exposes the page functions on `window` under the names the server-rendered
/// markup calls (`onclick="scrollToNextWord(3)"`, `<script>onGameWin();</script>`).
fn install_globals() -> ClientResult<()> {
    let win = dom::window()?;
    let set = |name: &str, f: JsValue| -> ClientResult<()> {
        js_sys::Reflect::set(&win, &JsValue::from_str(name), &f)?;
        Ok(())
    };

    set("onGameWin", Closure::<dyn FnMut()>::new(|| {
        report("onGameWin", with_client(|c| c.on_game_win()));
    }).into_js_value())?;
    set("toggleModal", Closure::<dyn FnMut()>::new(|| {
        report("toggleModal", with_client(|c| c.toggle_modal()));
    }).into_js_value())?;
    set("scrollToNextWord", Closure::<dyn FnMut(u32) -> bool>::new(|index: u32| {
        with_client(|c| c.scroll_to_next_word(index)).unwrap_or_else(|err| {
            log::error!("scrollToNextWord: {err}");
            false
        })
    }).into_js_value())?;
    set("unhighlightWords", Closure::<dyn FnMut()>::new(|| {
        report("unhighlightWords", with_client(|c| c.unhighlight_words()));
    }).into_js_value())?;
    set("scrollToTop", Closure::<dyn FnMut()>::new(|| {
        report("scrollToTop", with_client(|c| c.scroll_to_top()));
    }).into_js_value())?;
    set("isScrollbarVisible", Closure::<dyn FnMut() -> bool>::new(|| {
        with_client(|c| c.is_scrollbar_visible()).unwrap_or(false)
    }).into_js_value())?;
    set("beforeRequest", Closure::<dyn FnMut(JsValue)>::new(|evt: JsValue| {
        if let Ok(evt) = evt.dyn_into::<Event>() {
            report("beforeRequest", with_client(|c| c.before_request(&evt)));
        }
    }).into_js_value())?;
    set("afterRequest", Closure::<dyn FnMut()>::new(|| {
        report("afterRequest", with_client(|c| c.after_request()));
    }).into_js_value())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed() -> bool {
        CLIENT.with(|cell| cell.borrow().is_some())
    }

    #[test]
    fn operations_before_start_are_not_initialized() {
        assert_eq!(with_client(|_| Ok(())), Err(ClientError::NotInitialized));
    }

    #[test]
    fn start_lifecycle() {
        // failed wiring leaves the slot free for a retry
        let failed = start_with(ClientConfig::default(), |_| Err(ClientError::NoWindow));
        assert_eq!(failed, Err(ClientError::NoWindow));
        assert!(!installed());

        let mut cfg = ClientConfig::default();
        cfg.log_level = "warn".to_string();
        assert_eq!(start_with(cfg, |_| Ok(())), Ok(()));
        assert!(installed());
        assert_eq!(log::max_level(), log::LevelFilter::Warn);

        // a rejected second start leaves the log level alone
        let mut louder = ClientConfig::default();
        louder.log_level = "trace".to_string();
        assert_eq!(start_with(louder, |_| Ok(())), Err(ClientError::AlreadyStarted));
        assert_eq!(log::max_level(), log::LevelFilter::Warn);

        assert_eq!(with_client(|c| Ok(c.controls_wired)), Ok(false));
    }
}
