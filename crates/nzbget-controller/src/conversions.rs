//! Decoding of response envelopes into operation-specific results.
//!
//! The `result` member of an NZBGet response changes type with the method: a boolean for control
//! verbs, a number for `append`, an array or object for listings. Every operation decodes it here,
//! right at the transport boundary, into the one shape it accepts.

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use nzbget_types::NzbGetError;

use crate::ops::{Envelope, RpcError, TransportError};

/// Typed envelope of a query endpoint.
#[derive(Debug, Deserialize)]
struct QueryEnvelope<T> {
    result: Option<T>,
    #[serde(default)]
    error: Option<RpcError>,
}

/// Maps transport errors to queue errors, tagging them with the operation.
pub(crate) fn map_transport_error(op: &'static str, err: TransportError) -> NzbGetError {
    match err {
        TransportError::Unauthorized => NzbGetError::Unauthorized,
        TransportError::Timeout => NzbGetError::Timeout { op },
        TransportError::Decode(message) => NzbGetError::Decode { op, message },
        TransportError::Io(message) => NzbGetError::FileSystem(format!("{op}: {message}")),
        TransportError::Network(message) => NzbGetError::Network { op, message },
        err @ (TransportError::Request(_)
        | TransportError::Status(_)
        | TransportError::Body(_)) => NzbGetError::Network {
            op,
            message: err.to_string(),
        },
    }
}

fn server_error(op: &'static str, error: RpcError) -> NzbGetError {
    NzbGetError::Server {
        op,
        code: error.code,
        message: error.message,
    }
}

/// Returns the result of a successful envelope, or the server error it carries.
pub(crate) fn into_result(op: &'static str, envelope: Envelope) -> Result<Value, NzbGetError> {
    match envelope.error {
        Some(error) => Err(server_error(op, error)),
        None => Ok(envelope.result),
    }
}

/// Accepts the literal `true` only.
pub(crate) fn expect_true(op: &'static str, result: Value) -> Result<(), NzbGetError> {
    match result {
        Value::Bool(true) => Ok(()),
        other => Err(NzbGetError::Rejected {
            op,
            result: other.to_string(),
        }),
    }
}

/// Accepts a positive integral number: the id `append` assigned.
///
/// NZBGet answers `0` (older versions `-1`) when it refused the file.
pub(crate) fn expect_queue_id(op: &'static str, result: Value) -> Result<i64, NzbGetError> {
    let id = match &result {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    }
    .ok_or_else(|| NzbGetError::UnexpectedResult {
        op,
        result: result.to_string(),
    })?;

    if id <= 0 {
        return Err(NzbGetError::Rejected {
            op,
            result: id.to_string(),
        });
    }
    Ok(id)
}

/// Decodes the body of a query endpoint into its typed result.
///
/// A `null` or absent result is accepted when `T` can be built from `null`, e.g. `()`.
pub(crate) fn decode_query<T: DeserializeOwned>(
    op: &'static str,
    body: &[u8],
) -> Result<T, NzbGetError> {
    let envelope: QueryEnvelope<T> =
        serde_json::from_slice(body).map_err(|e| NzbGetError::Decode {
            op,
            message: e.to_string(),
        })?;

    if let Some(error) = envelope.error {
        return Err(server_error(op, error));
    }
    match envelope.result {
        Some(result) => Ok(result),
        None => serde_json::from_value(Value::Null).map_err(|_| NzbGetError::Decode {
            op,
            message: "response has no result".to_string(),
        }),
    }
}
