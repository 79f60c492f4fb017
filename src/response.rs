//! Decoding of authy `--json` responses.
//!
//! Kept strictly separate from the invocation layer so the protocol can
//! be exercised with synthetic (exit code, stdout, stderr) triples.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::{self, AuthyError, Result};
use crate::invoke::InvocationOutput;

/// Decode a finished invocation into a loose JSON object.
///
/// On a zero exit, empty stdout yields an empty object and non-empty
/// stdout must be one well-formed JSON object; anything else is a
/// [`AuthyError::Protocol`] violation by the binary. A non-zero exit
/// defers to the error mapper.
pub fn decode(output: &InvocationOutput) -> Result<Map<String, Value>> {
    if !output.success() {
        return Err(errors::map_failure(output.exit_code, &output.stderr));
    }
    let body = output.stdout.trim();
    if body.is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(body).map_err(|e| AuthyError::Protocol(e.to_string()))
}

/// Decode a successful response into a typed record.
///
/// A response that parses as JSON but does not fit `T` is still a
/// protocol violation, not a domain error.
pub fn decode_as<T: DeserializeOwned>(output: &InvocationOutput) -> Result<T> {
    let map = decode(output)?;
    serde_json::from_value(Value::Object(map)).map_err(|e| AuthyError::Protocol(e.to_string()))
}
