//! Shared response helpers

use serde_json::Value;

use crate::error::{Result, SatError};

/// Extract a named field from a response object
///
/// Well-formed platform responses always carry the fields the protocol
/// relies on; an absent key means a malformed or unexpected reply.
pub fn get_key<'a>(response: &'a Value, key_name: &str) -> Result<&'a Value> {
    response
        .get(key_name)
        .ok_or_else(|| SatError::MissingField(key_name.to_string()))
}

/// Extract a named field and require it to be a string
pub fn get_key_str<'a>(response: &'a Value, key_name: &str) -> Result<&'a str> {
    get_key(response, key_name)?
        .as_str()
        .ok_or_else(|| SatError::MissingField(key_name.to_string()))
}
