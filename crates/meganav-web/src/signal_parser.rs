#![forbid(unsafe_code)]

//! JSON parser for host-encoded DOM signals.
//!
//! The JS glue serializes each observed DOM event as a small JSON object and
//! hands it over as a string; [`parse_signal`] turns it into a [`NavSignal`].
//!
//! ```json
//! {"kind":"pointerenter","target":"nav-section-1-item-2","epoch":3}
//! {"kind":"click","target":"nav-hamburger"}
//! {"kind":"keydown","key":"Escape"}
//! {"kind":"focusout","relatedTarget":"nav-link-4"}
//! {"kind":"mediachange","matches":true}
//! {"kind":"resize","width":1024}
//! ```
//!
//! DOM event kinds the navigation does not react to (`focusin`, `touchstart`,
//! ...) and keys it does not distinguish return `Ok(None)`.

use meganav_core::event::{KeyCode, NavSignal};
use serde::Deserialize;

/// DOM event kinds that are valid but carry no navigation meaning.
const IGNORED_KINDS: &[&str] = &["focusin", "mouseover", "mouseout", "touchstart", "touchend", "keyup"];

/// Errors from parsing encoded signal JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// Unknown event kind.
    UnknownKind(String),
    /// A key value that names no key.
    UnknownKey(String),
}

impl core::fmt::Display for SignalParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::UnknownKind(kind) => write!(f, "unknown signal kind: {kind}"),
            Self::UnknownKey(key) => write!(f, "unknown key: {key:?}"),
        }
    }
}

impl std::error::Error for SignalParseError {}

/// Internal deserialization target for the host's JSON schema.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSignal {
    kind: String,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    epoch: Option<u64>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    related_target: Option<String>,
    #[serde(default)]
    matches: Option<bool>,
    #[serde(default)]
    width: Option<u32>,
}

/// Parse one JSON-encoded host signal.
///
/// Returns `Ok(None)` for recognized DOM kinds the navigation ignores.
pub fn parse_signal(json: &str) -> Result<Option<NavSignal>, SignalParseError> {
    let raw: RawSignal =
        serde_json::from_str(json).map_err(|e| SignalParseError::Json(e.to_string()))?;

    let signal = match raw.kind.as_str() {
        "pointerenter" | "mouseenter" => NavSignal::PointerEnter {
            target: require(raw.target, "target")?,
            epoch: raw.epoch,
        },
        "pointerleave" | "mouseleave" => NavSignal::PointerLeave {
            target: require(raw.target, "target")?,
            epoch: raw.epoch,
        },
        "click" => NavSignal::Click {
            target: require(raw.target, "target")?,
        },
        "keydown" => {
            let key = require(raw.key, "key")?;
            if key.is_empty() {
                return Err(SignalParseError::UnknownKey(key));
            }
            match KeyCode::from_dom_key(&key) {
                KeyCode::Other => return Ok(None),
                key => NavSignal::KeyDown {
                    target: raw.target,
                    key,
                },
            }
        }
        "focusout" => NavSignal::FocusOut {
            related_target: raw.related_target,
        },
        "mediachange" | "change" => NavSignal::MediaChange {
            desktop: require(raw.matches, "matches")?,
        },
        "resize" => NavSignal::Resize {
            width: require(raw.width, "width")?,
        },
        other if IGNORED_KINDS.contains(&other) => return Ok(None),
        other => return Err(SignalParseError::UnknownKind(other.to_string())),
    };
    Ok(Some(signal))
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, SignalParseError> {
    value.ok_or(SignalParseError::MissingField(field))
}
