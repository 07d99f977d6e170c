//! Error type shared by the DOM glue.
//!
//! Page operations treat missing elements as no-ops; the variants here cover
//! the environment itself being unusable (no window, no storage) and JS calls
//! that threw.

use wasm_bindgen::JsValue;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("local storage unavailable")]
    NoStorage,
    /// A required element (e.g. the root `<html>`) is missing.
    #[error("missing element {0}")]
    MissingElement(String),
    /// Element exists but is not of the expected interface.
    #[error("element #{id} is not a {expected}")]
    WrongElement { id: String, expected: &'static str },
    #[error("client not started; call startClient() first")]
    NotInitialized,
    #[error("client already started")]
    AlreadyStarted,
    #[error("invalid client config: {0}")]
    Config(String),
    /// A browser API threw; carries the stringified exception.
    #[error("js error: {0}")]
    Js(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<JsValue> for ClientError {
    fn from(value: JsValue) -> Self {
        let msg = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        ClientError::Js(msg)
    }
}

impl From<ClientError> for JsValue {
    fn from(err: ClientError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_element() {
        let err = ClientError::WrongElement { id: "game-win-modal".into(), expected: "HTMLDialogElement" };
        assert_eq!(err.to_string(), "element #game-win-modal is not a HTMLDialogElement");
        assert_eq!(ClientError::MissingElement("documentElement".into()).to_string(), "missing element documentElement");
    }

    #[test]
    fn lifecycle_errors_are_std_errors() {
        let err: Box<dyn std::error::Error> = Box::new(ClientError::AlreadyStarted);
        assert_eq!(err.to_string(), "client already started");
        assert_eq!(
            ClientError::NotInitialized.to_string(),
            "client not started; call startClient() first"
        );
        assert_eq!(ClientError::Config("bad".into()).to_string(), "invalid client config: bad");
    }
}
