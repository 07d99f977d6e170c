//! Wikidle browser client.
//!
//! Client-side behaviour for the daily article guessing game: the win modal,
//! cycling through highlighted occurrences of a guessed word, page scroll
//! helpers, and keeping the server's game data blob in local storage across
//! htmx partial requests. Game rules and rendering live on the server.
//!
//! Call `startClient()` (or `startClientWithConfig(json)`) once from the page.

use wasm_bindgen::prelude::*;

mod client;
pub mod config;
mod dom;
pub mod error;
pub mod modal;
pub mod scroll;
pub mod sync;
pub mod win;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // Already set when the module is instantiated twice; keep the first logger.
    let _ = console_log::init_with_level(log::Level::Debug);
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen(js_name = startClient)]
pub fn start_client() -> Result<(), JsValue> {
    client::start(ClientConfig::default())?;
    Ok(())
}

/// Starts the client with a JSON object overriding any `ClientConfig` fields
/// (camelCase keys).
#[cfg(feature = "serde_json")]
#[wasm_bindgen(js_name = startClientWithConfig)]
pub fn start_client_with_config(json: &str) -> Result<(), JsValue> {
    client::start(ClientConfig::from_json(json)?)?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Page operations (same names as the window functions installed at start)
// -----------------------------------------------------------------------------

#[wasm_bindgen(js_name = toggleModal)]
pub fn toggle_modal() -> Result<(), JsValue> {
    client::with_client(|c| c.toggle_modal())?;
    Ok(())
}

#[wasm_bindgen(js_name = onGameWin)]
pub fn on_game_win() -> Result<(), JsValue> {
    client::with_client(|c| c.on_game_win())?;
    Ok(())
}

/// Scrolls to the next occurrence of the word from attempt `index`; false when
/// the page has none.
#[wasm_bindgen(js_name = scrollToNextWord)]
pub fn scroll_to_next_word(index: u32) -> Result<bool, JsValue> {
    Ok(client::with_client(|c| c.scroll_to_next_word(index))?)
}

#[wasm_bindgen(js_name = unhighlightWords)]
pub fn unhighlight_words() -> Result<u32, JsValue> {
    Ok(client::with_client(|c| c.unhighlight_words())?)
}

#[wasm_bindgen(js_name = scrollToTop)]
pub fn scroll_to_top() -> Result<(), JsValue> {
    client::with_client(|c| c.scroll_to_top())?;
    Ok(())
}

#[wasm_bindgen(js_name = isScrollbarVisible)]
pub fn is_scrollbar_visible() -> Result<bool, JsValue> {
    Ok(client::with_client(|c| c.is_scrollbar_visible())?)
}

/// Pre-request hook for `hx-on` attributes; the document listener already
/// covers the configured lifecycle event.
#[wasm_bindgen(js_name = beforeRequest)]
pub fn before_request(event: &web_sys::Event) -> Result<bool, JsValue> {
    Ok(client::with_client(|c| c.before_request(event))?)
}

#[wasm_bindgen(js_name = afterRequest)]
pub fn after_request() -> Result<bool, JsValue> {
    Ok(client::with_client(|c| c.after_request())?)
}
