//! Helpers for hand-built stanzas

use rand::rngs::OsRng;
use rand::RngCore;
use reqwest::Url;

use crate::application::errors::{BotError, MediaError};

/// Escape `&`, `<`, `>`, `'` and `"` for use in element text or a quoted attribute.
pub fn escape_markup(s: &str) -> String {
    html_escape::encode_quoted_attribute(s).into_owned()
}

/// Random 64-bit stanza id as 16 lowercase hex digits.
///
/// Only the operating system's generator is used; if it is unavailable the
/// caller gets `RandomSource` and must not send.
pub fn new_nonce() -> Result<String, BotError> {
    let mut bytes = [0u8; 8];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| BotError::RandomSource(e.to_string()))?;
    Ok(format!("{:016x}", u64::from_be_bytes(bytes)))
}

/// Drop the query component of a media URI. Tracking parameters never go out
/// with a shared link.
pub fn strip_query(raw: &str) -> Result<String, MediaError> {
    let mut url = Url::parse(raw).map_err(|e| MediaError::Decode(format!("{}: {}", raw, e)))?;
    url.set_query(None);
    Ok(url.to_string())
}
