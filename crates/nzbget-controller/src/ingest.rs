//! Preparation of NZB files for the `append` method.
//!
//! A remote NZB is fetched into a scoped temporary file, read back, parsed for its name and
//! base64-encoded. Nothing here talks to NZBGet itself; the append call is only made once every
//! local step has succeeded.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tracing::debug;

use nzbget_types::{AddOptions, NzbGetError, NzbMetadata, parse_nzb};

use crate::ops::{Transport, TransportError};

/// An NZB ready to be appended.
#[derive(Debug)]
pub(crate) struct PreparedNzb {
    /// Name to submit.
    pub(crate) name: String,
    /// Base64 of the raw document.
    pub(crate) content: String,
    pub(crate) metadata: NzbMetadata,
}

/// Fetches `url` into a fresh temporary file.
///
/// The file is deleted when the returned handle drops, so every early return of the caller
/// cleans up after itself.
pub(crate) async fn fetch_to_temp<T: Transport>(
    transport: &T,
    url: &str,
    temp_dir: Option<&Path>,
) -> Result<NamedTempFile, NzbGetError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("nzbget-").suffix(".nzb");
    let temp = match temp_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| NzbGetError::FileSystem(format!("failed to create temporary file: {e}")))?;

    let bytes = transport
        .fetch(url, temp.path())
        .await
        .map_err(|e| map_fetch_error(url, e))?;
    debug!("Fetched {bytes} bytes from {url}");

    Ok(temp)
}

fn map_fetch_error(url: &str, err: TransportError) -> NzbGetError {
    match err {
        TransportError::Io(message) => NzbGetError::FileSystem(format!("{url}: {message}")),
        err => NzbGetError::Download(format!("{url}: {err}")),
    }
}

/// Reads an NZB file as raw bytes; decoding is left to the parser.
pub(crate) async fn read_nzb(path: &Path) -> Result<Vec<u8>, NzbGetError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| NzbGetError::FileSystem(format!("failed to read {}: {e}", path.display())))
}

/// Parses and encodes `raw`, resolving the name to submit.
///
/// The document has to parse even when the options carry a name override.
pub(crate) fn prepare(raw: &[u8], options: &AddOptions) -> Result<PreparedNzb, NzbGetError> {
    let metadata = parse_nzb(raw)?;
    let content = STANDARD.encode(raw);

    let name = match (options.override_name(), metadata.name.as_deref()) {
        (Some(name), _) | (None, Some(name)) => name.to_string(),
        (None, None) => {
            return Err(NzbGetError::InvalidNzb(
                "no name in the document and no name override given".to_string(),
            ));
        }
    };

    Ok(PreparedNzb {
        name,
        content,
        metadata,
    })
}

/// Positional parameters of `append`, in the order NZBGet expects them.
pub(crate) fn append_params(nzb: &PreparedNzb, options: &AddOptions) -> Vec<Value> {
    vec![
        json!(nzb.name),
        json!(nzb.content),
        json!(options.category),
        json!(options.priority.value()),
        json!(options.add_to_top),
        json!(options.add_paused),
        json!(options.dupe_key),
        json!(options.dupe_score),
        json!(options.dupe_mode),
        json!(options.parameters),
    ]
}
