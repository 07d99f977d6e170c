//! Client configuration: DOM ids, storage keys, timings and event names.
//!
//! Everything the server-rendered page and the stylesheet agree on lives here so
//! the rest of the crate never hard-codes a selector. The CSS contract (root
//! marker classes and the scrollbar custom property) is fixed by the stylesheet
//! and therefore kept as constants rather than configuration.

#[cfg(feature = "serde")]
use serde::Deserialize;

// --- CSS contract ------------------------------------------------------------

/// Root-element class present while a modal is open (including both animations).
pub const MODAL_OPEN_CLASS: &str = "modal-is-open";
/// Root-element class present during the open animation.
pub const MODAL_OPENING_CLASS: &str = "modal-is-opening";
/// Root-element class present during the close animation.
pub const MODAL_CLOSING_CLASS: &str = "modal-is-closing";
/// Custom property holding the scrollbar width while the page scrollbar is hidden.
pub const SCROLLBAR_WIDTH_VAR: &str = "--pico-scrollbar-width";

/// Pulse marker re-added on the occurrence we just scrolled to.
pub const HIT_CLASS: &str = "hit";
/// Generic highlight marker cleared by `unhighlightWords`.
pub const HIGHLIGHT_CLASS: &str = "highlight";
/// Visibility marker toggled on the scroll-to-top button.
pub const HIDDEN_CLASS: &str = "hidden";

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ClientConfig {
    /// Native `<dialog>` shown when the game is won.
    pub modal_id: String,
    /// Selector of the content region inside the modal; clicks outside it dismiss.
    pub modal_content_selector: String,
    pub word_input_id: String,
    pub attempts_id: String,
    pub controls_selector: String,
    pub up_button_id: String,
    /// Element whose text carries the fresh game data after a swap.
    pub game_data_id: String,

    pub storage_key: String,
    /// Form field the stored blob is attached under on outgoing requests.
    pub form_field: String,

    pub animation_ms: i32,
    pub flash_ms: i32,
    /// Scroll offset (px) past which the scroll-to-top button is shown.
    pub up_button_threshold: f64,

    /// Request lifecycle event carrying the mutable outgoing form data.
    pub pre_request_event: String,
    /// Lifecycle event fired once the swapped fragment is in the DOM.
    pub post_request_event: String,

    /// Expose the camel-case page functions on `window` for inline handlers.
    pub install_globals: bool,
    /// `log` level filter name ("off", "error", "warn", "info", "debug", "trace").
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            modal_id: "game-win-modal".to_string(),
            modal_content_selector: "article".to_string(),
            word_input_id: "word-input-wrapper".to_string(),
            attempts_id: "attempts".to_string(),
            controls_selector: ".controls".to_string(),
            up_button_id: "up-button".to_string(),
            game_data_id: "game-data".to_string(),
            storage_key: "gameData".to_string(),
            form_field: "gameData".to_string(),
            animation_ms: 400,
            flash_ms: 100,
            up_button_threshold: 200.0,
            pre_request_event: "htmx:configRequest".to_string(),
            post_request_event: "htmx:afterSettle".to_string(),
            install_globals: true,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Parsed log filter; unknown names fall back to `Info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, crate::error::ClientError> {
        serde_json::from_str(json).map_err(|e| crate::error::ClientError::Config(e.to_string()))
    }
}
