//! NZBGet client implementation.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{Span, debug, debug_span, instrument, warn};

use nzbget_types::{
    AddOptions, DownloadQueue, Group, HistoryItem, NzbGetError, QueueSnapshot, StatusSnapshot,
    VersionInfo,
};

use crate::config::ClientConfig;
use crate::conversions::{
    decode_query, expect_queue_id, expect_true, into_result, map_transport_error,
};
use crate::ingest::{self, PreparedNzb};
use crate::ops::Transport;
use crate::transport::HttpTransport;


const APPEND: &str = "append";
const EDIT_QUEUE: &str = "editqueue";
const PAUSE_DOWNLOAD: &str = "pausedownload";
const RESUME_DOWNLOAD: &str = "resumedownload";
const LIST_GROUPS: &str = "listgroups";
const HISTORY: &str = "history";
const STATUS: &str = "status";
const VERSION: &str = "version";

/// NzbGetClient is a download queue client that uses the NZBGet JSON-RPC API.
///
/// The client keeps no state between calls, so one instance can serve concurrent callers.
#[allow(missing_debug_implementations)]
pub struct NzbGetClient<T: Transport = HttpTransport> {
    transport: T,
    temp_dir: Option<PathBuf>,
    span: Span,
}

impl NzbGetClient {
    /// Create a new NzbGetClient for the endpoint in `config`.
    ///
    /// No request is made here; an unreachable server shows up on the first call.
    pub fn try_new(config: ClientConfig) -> Result<Self, NzbGetError> {
        let transport = HttpTransport::try_new(&config)?;
        debug!("Using NZBGet RPC at {}", transport.endpoint());
        let span = debug_span!("nzbget", endpoint = %transport.endpoint());

        Ok(Self {
            transport,
            temp_dir: config.temp_dir,
            span,
        })
    }

    /// Create a new NzbGetClient from `NZBGET_*` environment variables.
    pub fn from_env() -> Result<Self, NzbGetError> {
        Self::try_new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> NzbGetClient<T> {
    /// Create an NzbGetClient on top of a custom transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            temp_dir: None,
            span: debug_span!("nzbget"),
        }
    }

    /// Record this client's events under `span` instead of the default one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Put temporary copies of fetched NZB files in `dir`.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    async fn rpc(&self, method: &'static str, params: Vec<Value>) -> Result<Value, NzbGetError> {
        let envelope = self
            .transport
            .call(method, params)
            .await
            .map_err(|e| map_transport_error(method, e))?;
        into_result(method, envelope)
    }

    async fn query<R: DeserializeOwned>(
        &self,
        path: &'static str,
        params: Vec<(String, String)>,
    ) -> Result<R, NzbGetError> {
        let body = self
            .transport
            .get(path, params)
            .await
            .map_err(|e| map_transport_error(path, e))?;
        decode_query(path, &body)
    }

    async fn append(&self, nzb: PreparedNzb, options: &AddOptions) -> Result<i64, NzbGetError> {
        debug!(
            "Appending {} ({} files, {} segments, {} bytes)",
            nzb.name, nzb.metadata.files, nzb.metadata.segments, nzb.metadata.total_bytes
        );
        let params = ingest::append_params(&nzb, options);
        let result = self.rpc(APPEND, params).await?;
        let id = expect_queue_id(APPEND, result)?;
        debug!("Appended {} as queue id {id}", nzb.name);
        Ok(id)
    }
}

impl<T: Transport> DownloadQueue for NzbGetClient<T> {
    #[instrument(parent = &self.span, skip(self, options))]
    async fn add(&self, source_url: &str, options: AddOptions) -> Result<i64, NzbGetError> {
        debug!("Adding NZB from {source_url}");
        let temp =
            ingest::fetch_to_temp(&self.transport, source_url, self.temp_dir.as_deref()).await?;
        let raw = ingest::read_nzb(temp.path()).await?;
        if let Err(e) = temp.close() {
            warn!("Failed to remove temporary NZB file: {e}");
        }

        let nzb = ingest::prepare(&raw, &options)?;
        self.append(nzb, &options).await
    }

    #[instrument(parent = &self.span, skip(self, options))]
    async fn add_file(&self, path: &Path, options: AddOptions) -> Result<i64, NzbGetError> {
        debug!("Adding NZB file {}", path.display());
        let raw = ingest::read_nzb(path).await?;
        let nzb = ingest::prepare(&raw, &options)?;
        self.append(nzb, &options).await
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn list(&self) -> Result<QueueSnapshot, NzbGetError> {
        let status = self.status().await?;
        let captured_at = Utc::now();
        let groups = self.groups().await?;
        debug!("Listed {} groups", groups.len());

        Ok(QueueSnapshot {
            status,
            groups,
            captured_at,
        })
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn groups(&self) -> Result<Vec<Group>, NzbGetError> {
        debug!("Listing active groups");
        let groups: Vec<Group> = self.query(LIST_GROUPS, Vec::new()).await?;
        debug!("Active groups: {groups:?}");
        Ok(groups)
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn history(&self, include_hidden: bool) -> Result<Vec<HistoryItem>, NzbGetError> {
        debug!("Getting history, include_hidden={include_hidden}");
        let params = vec![("hidden".to_string(), include_hidden.to_string())];
        let items: Vec<HistoryItem> = self.query(HISTORY, params).await?;
        debug!("History has {} entries", items.len());
        Ok(items)
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn status(&self) -> Result<StatusSnapshot, NzbGetError> {
        debug!("Getting server status");
        let status: StatusSnapshot = self.query(STATUS, Vec::new()).await?;
        debug!("Server status: {status:?}");
        Ok(status)
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn version(&self) -> Result<VersionInfo, NzbGetError> {
        self.query(VERSION, Vec::new()).await
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn pause_all(&self) -> Result<(), NzbGetError> {
        debug!("Pausing all downloads");
        let result = self.rpc(PAUSE_DOWNLOAD, Vec::new()).await?;
        expect_true(PAUSE_DOWNLOAD, result)
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn resume_all(&self) -> Result<(), NzbGetError> {
        debug!("Resuming all downloads");
        let result = self.rpc(RESUME_DOWNLOAD, Vec::new()).await?;
        expect_true(RESUME_DOWNLOAD, result)
    }

    #[instrument(parent = &self.span, skip(self))]
    async fn edit_queue(
        &self,
        command: &str,
        parameter: &str,
        ids: &[i64],
    ) -> Result<(), NzbGetError> {
        let params = vec![json!(command), json!(parameter), json!(ids)];
        let result = self.rpc(EDIT_QUEUE, params).await?;
        expect_true(EDIT_QUEUE, result)?;
        debug!("{command} applied to {ids:?}");
        Ok(())
    }
}
