//! Win modal: open/close choreography around a native `<dialog>`.
//!
//! Opening and closing are two-phase. The root element gets its marker classes
//! immediately and the animation timer finishes the job. The "visible" modal is
//! recorded only once the open animation completes and forgotten as soon as a
//! close starts, so the document click handler never dismisses a modal that is
//! still animating in (the click that opened it is still bubbling).
//!
//! Each begin hands out a [`Ticket`]; a completion whose ticket is no longer the
//! latest is ignored, which keeps rapid toggles deterministic.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlDialogElement, KeyboardEvent, Node, Window};

use crate::config::{
    ClientConfig, MODAL_CLOSING_CLASS, MODAL_OPEN_CLASS, MODAL_OPENING_CLASS, SCROLLBAR_WIDTH_VAR,
};
use crate::dom;
use crate::error::{ClientError, ClientResult};

// --- State machine -----------------------------------------------------------

/// Identifies one open or close cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// What a toggle should do given the dialog's native `open` flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalAction {
    Open,
    Close,
}

impl ModalAction {
    pub fn toggle(is_open: bool) -> Self {
        if is_open { ModalAction::Close } else { ModalAction::Open }
    }
}

/// Tracks the single visible modal. Generic over the modal handle so the rules
/// run without a browser.
#[derive(Debug)]
pub struct ModalState<M> {
    visible: Option<M>,
    generation: u64,
}

impl<M> Default for ModalState<M> {
    fn default() -> Self {
        Self { visible: None, generation: 0 }
    }
}

impl<M: Clone> ModalState<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> Option<&M> {
        self.visible.as_ref()
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    pub fn begin_open(&mut self) -> Ticket {
        self.generation += 1;
        Ticket(self.generation)
    }

    /// Records `modal` as visible unless a newer cycle started meanwhile.
    pub fn finish_open(&mut self, ticket: Ticket, modal: M) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.visible = Some(modal);
        true
    }

    pub fn begin_close(&mut self) -> Ticket {
        self.visible = None;
        self.generation += 1;
        Ticket(self.generation)
    }

    pub fn finish_close(&self, ticket: Ticket) -> bool {
        self.is_current(ticket)
    }

    /// The modal an Escape press should close, if any.
    pub fn dismiss_on_key(&self, key: &str) -> Option<M> {
        if key == "Escape" { self.visible.clone() } else { None }
    }

    /// The modal a document click should close, if any.
    pub fn dismiss_on_click(&self, inside_content: impl FnOnce(&M) -> bool) -> Option<M> {
        let modal = self.visible.as_ref()?;
        if inside_content(modal) { None } else { Some(modal.clone()) }
    }
}

/// Page scrollbar width in px (zero when the page has no scrollbar).
pub fn scrollbar_width(inner_width: f64, client_width: i32) -> i32 {
    (inner_width - f64::from(client_width)).round() as i32
}

// --- DOM controller ----------------------------------------------------------

pub struct ModalController {
    state: Rc<RefCell<ModalState<HtmlDialogElement>>>,
    modal_id: String,
    content_selector: String,
    animation_ms: i32,
}

impl ModalController {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(ModalState::new())),
            modal_id: config.modal_id.clone(),
            content_selector: config.modal_content_selector.clone(),
            animation_ms: config.animation_ms,
        }
    }

    pub fn visible(&self) -> Option<HtmlDialogElement> {
        self.state.borrow().visible().cloned()
    }

    /// Opens the win modal if closed, closes it if open; no-op when absent.
    pub fn toggle(&self, win: &Window, doc: &Document) -> ClientResult<()> {
        let Some(el) = doc.get_element_by_id(&self.modal_id) else {
            log::debug!("toggle: #{} not in page", self.modal_id);
            return Ok(());
        };
        let modal: HtmlDialogElement = el.dyn_into().map_err(|_| ClientError::WrongElement {
            id: self.modal_id.clone(),
            expected: "HTMLDialogElement",
        })?;
        match ModalAction::toggle(modal.open()) {
            ModalAction::Open => self.open(win, doc, modal),
            ModalAction::Close => self.close(doc, modal),
        }
    }

    pub fn open(&self, win: &Window, doc: &Document, modal: HtmlDialogElement) -> ClientResult<()> {
        let html = dom::root_element(doc)?;
        let inner_width = win.inner_width()?.as_f64().unwrap_or(0.0);
        let width = scrollbar_width(inner_width, html.client_width());
        if width != 0 {
            html.style().set_property(SCROLLBAR_WIDTH_VAR, &format!("{width}px"))?;
        }
        let classes = html.class_list();
        classes.remove_1(MODAL_CLOSING_CLASS)?;
        classes.add_2(MODAL_OPEN_CLASS, MODAL_OPENING_CLASS)?;

        let ticket = self.state.borrow_mut().begin_open();
        let state = Rc::clone(&self.state);
        let opened = modal.clone();
        dom::set_timeout(self.animation_ms, move || {
            let finished = state.borrow_mut().finish_open(ticket, opened);
            if finished {
                dom::warn_on_err("finish open", html.class_list().remove_1(MODAL_OPENING_CLASS));
            }
        })?;

        if !modal.open() {
            modal.show_modal()?;
        }
        log::debug!("modal #{} opening", self.modal_id);
        Ok(())
    }

    pub fn close(&self, doc: &Document, modal: HtmlDialogElement) -> ClientResult<()> {
        let ticket = self.state.borrow_mut().begin_close();
        let html = dom::root_element(doc)?;
        html.class_list().add_1(MODAL_CLOSING_CLASS)?;

        let state = Rc::clone(&self.state);
        dom::set_timeout(self.animation_ms, move || {
            if !state.borrow().finish_close(ticket) {
                return;
            }
            // opening too: a superseded open never removed it
            dom::warn_on_err(
                "finish close",
                html.class_list().remove_3(MODAL_CLOSING_CLASS, MODAL_OPEN_CLASS, MODAL_OPENING_CLASS),
            );
            dom::warn_on_err("finish close", html.style().remove_property(SCROLLBAR_WIDTH_VAR));
            modal.close();
        })?;
        log::debug!("modal #{} closing", self.modal_id);
        Ok(())
    }

    /// Document click: closes the visible modal when the click landed outside
    /// its content region.
    pub fn on_click(&self, doc: &Document, event: &Event) -> ClientResult<()> {
        let target: Option<Node> = event.target().and_then(|t| t.dyn_into::<Node>().ok());
        let selector = &self.content_selector;
        let to_close = self.state.borrow().dismiss_on_click(|modal| {
            let content: Node = match modal.query_selector(selector).ok().flatten() {
                Some(content) => content.into(),
                None => modal.clone().into(),
            };
            content.contains(target.as_ref())
        });
        match to_close {
            Some(modal) => self.close(doc, modal),
            None => Ok(()),
        }
    }

    pub fn on_keydown(&self, doc: &Document, event: &KeyboardEvent) -> ClientResult<()> {
        let to_close = self.state.borrow().dismiss_on_key(&event.key());
        match to_close {
            Some(modal) => self.close(doc, modal),
            None => Ok(()),
        }
    }
}
