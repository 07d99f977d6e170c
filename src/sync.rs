//! Game data sync around partial-page requests.
//!
//! The server owns the game progress format; the browser only keeps the last
//! blob it was handed and sends it back. Outgoing requests get the stored blob
//! as a form field. After the swap settles, the text of the game-data element
//! (rendered out-of-band by the server) becomes the new stored blob.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, Document, Event, FormData, Storage, Window};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Where the game data blob is kept between requests.
pub trait GameDataStore {
    fn load(&self) -> Option<String>;
    fn save(&self, value: &str) -> ClientResult<()>;
}

/// Something an outgoing request carries key/value pairs in.
pub trait PayloadSink {
    fn attach(&mut self, key: &str, value: &str) -> ClientResult<()>;
}

impl PayloadSink for HashMap<String, String> {
    fn attach(&mut self, key: &str, value: &str) -> ClientResult<()> {
        self.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl PayloadSink for FormData {
    fn attach(&mut self, key: &str, value: &str) -> ClientResult<()> {
        self.set_with_str(key, value)?;
        Ok(())
    }
}

/// Attaches the stored blob under `field`. An absent or empty blob is not sent.
pub fn attach_game_data<S, P>(store: &S, sink: &mut P, field: &str) -> ClientResult<bool>
where
    S: GameDataStore + ?Sized,
    P: PayloadSink + ?Sized,
{
    match store.load() {
        Some(data) if !data.is_empty() => {
            sink.attach(field, &data)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Stores `text` as the new blob; absent or empty text leaves the store untouched.
pub fn persist_game_data<S>(store: &S, text: Option<&str>) -> ClientResult<bool>
where
    S: GameDataStore + ?Sized,
{
    match text {
        Some(data) if !data.is_empty() => {
            store.save(data)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

// --- Browser side ------------------------------------------------------------

pub struct LocalStorageStore {
    storage: Storage,
    key: String,
}

impl LocalStorageStore {
    pub fn open(win: &Window, key: &str) -> ClientResult<Self> {
        let storage = win.local_storage()?.ok_or(ClientError::NoStorage)?;
        Ok(Self { storage, key: key.to_string() })
    }
}

impl GameDataStore for LocalStorageStore {
    fn load(&self) -> Option<String> {
        self.storage.get_item(&self.key).ok().flatten()
    }

    fn save(&self, value: &str) -> ClientResult<()> {
        self.storage.set_item(&self.key, value)?;
        Ok(())
    }
}

/// What the sync needs from a pre-request lifecycle event.
#[derive(Debug, Default)]
pub struct RequestDetail {
    /// Mutable form data of the outgoing request, when the library exposes it.
    pub form_data: Option<FormData>,
}

impl RequestDetail {
    pub fn from_event(event: &Event) -> Self {
        let form_data = event
            .dyn_ref::<CustomEvent>()
            .map(|e| e.detail())
            .and_then(|detail| js_sys::Reflect::get(&detail, &JsValue::from_str("formData")).ok())
            .and_then(|value| value.dyn_into::<FormData>().ok());
        Self { form_data }
    }
}

pub struct GameDataSync {
    storage_key: String,
    form_field: String,
    game_data_id: String,
}

impl GameDataSync {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            storage_key: config.storage_key.clone(),
            form_field: config.form_field.clone(),
            game_data_id: config.game_data_id.clone(),
        }
    }

    /// Pre-request hook: adds the stored blob to the outgoing form data.
    pub fn before_request(&self, win: &Window, detail: RequestDetail) -> ClientResult<bool> {
        let Some(mut form_data) = detail.form_data else {
            log::debug!("request without form data; {} not attached", self.form_field);
            return Ok(false);
        };
        let store = LocalStorageStore::open(win, &self.storage_key)?;
        let attached = attach_game_data(&store, &mut form_data, &self.form_field)?;
        if attached {
            log::debug!("attached {} to outgoing request", self.form_field);
        }
        Ok(attached)
    }

    /// Post-swap hook: stores the text of the game-data element when non-empty.
    pub fn after_request(&self, win: &Window, doc: &Document) -> ClientResult<bool> {
        let text = doc.get_element_by_id(&self.game_data_id).and_then(|el| el.text_content());
        let store = LocalStorageStore::open(win, &self.storage_key)?;
        let saved = persist_game_data(&store, text.as_deref())?;
        if saved {
            log::debug!("stored fresh {}", self.storage_key);
        }
        Ok(saved)
    }
}
