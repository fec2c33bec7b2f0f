//! # NZBGet Types
//!
//! This crate defines the common types and traits for clients of the NZBGet download queue.

use std::{cmp::Ordering, fmt, hash};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod nzb;

pub use nzb::{NzbMetadata, parse_nzb};

/// Error type for download queue operations.
#[derive(Error, Debug)]
pub enum NzbGetError {
    /// Network-related errors (connection failures, bad HTTP status, unreadable body)
    #[error("{op}: network error: {message}")]
    Network {
        /// The remote operation that failed.
        op: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// The per-call deadline elapsed before the server answered.
    #[error("{op}: request timed out")]
    Timeout {
        /// The remote operation that failed.
        op: &'static str,
    },

    /// The response body could not be decoded.
    #[error("{op}: undecodable response: {message}")]
    Decode {
        /// The remote operation that failed.
        op: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// Authentication errors
    #[error("authentication required")]
    Unauthorized,

    /// Server returned an error envelope
    #[error("{op}: server error {code}: {message}")]
    Server {
        /// The remote operation that failed.
        op: &'static str,
        /// Remote error code.
        code: i64,
        /// Remote error message.
        message: String,
    },

    /// The call went through but the server did not acknowledge it.
    #[error("{op}: rejected by server (result: {result})")]
    Rejected {
        /// The remote operation that failed.
        op: &'static str,
        /// The raw result the server sent back.
        result: String,
    },

    /// The result had a different type than the operation requires.
    #[error("{op}: unexpected result: {result}")]
    UnexpectedResult {
        /// The remote operation that failed.
        op: &'static str,
        /// The raw result the server sent back.
        result: String,
    },

    /// Fetching a remote NZB file failed
    #[error("download failed: {0}")]
    Download(String),

    /// File system errors (temp file creation, reading the fetched file, etc.)
    #[error("file system error: {0}")]
    FileSystem(String),

    /// The content is not a usable NZB document
    #[error("invalid nzb: {0}")]
    InvalidNzb(String),

    /// Invalid client configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Priority of a queue entry.
///
/// The named levels cover everything NZBGet's own UI offers. The server accepts any integer
/// though, so [`Priority::Custom`] carries values outside the named set. Ordering and equality
/// are numeric: `Priority::Custom(0) == Priority::Normal`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Priority {
    /// -100
    VeryLow,
    /// -50
    Low,
    /// 0
    #[default]
    Normal,
    /// 50
    High,
    /// 100
    VeryHigh,
    /// 900, bypasses duplicate checks.
    Force,
    /// Any other raw priority.
    Custom(i32),
}

impl Priority {
    /// Returns the wire value of this priority.
    pub const fn value(self) -> i32 {
        match self {
            Self::VeryLow => -100,
            Self::Low => -50,
            Self::Normal => 0,
            Self::High => 50,
            Self::VeryHigh => 100,
            Self::Force => 900,
            Self::Custom(v) => v,
        }
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        match value {
            -100 => Self::VeryLow,
            -50 => Self::Low,
            0 => Self::Normal,
            50 => Self::High,
            100 => Self::VeryHigh,
            900 => Self::Force,
            v => Self::Custom(v),
        }
    }
}

impl From<Priority> for i32 {
    fn from(priority: Priority) -> Self {
        priority.value()
    }
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Eq for Priority {}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value().cmp(&other.value())
    }
}

impl hash::Hash for Priority {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.value().hash(state);
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A named post-processing parameter passed along with an appended NZB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostProcessParameter {
    /// Parameter name, e.g. `*unpack:` or a script option.
    #[serde(rename = "Name")]
    pub name: String,
    /// Parameter value.
    #[serde(rename = "Value")]
    pub value: String,
}

/// Options applied when an NZB is appended to the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOptions {
    /// Category to file the download under. Empty means none.
    pub category: String,
    /// Queue priority.
    pub priority: Priority,
    /// Put the entry at the top of the queue instead of the bottom.
    pub add_to_top: bool,
    /// Add the entry in paused state.
    pub add_paused: bool,
    /// Duplicate key.
    pub dupe_key: String,
    /// Duplicate score.
    pub dupe_score: i32,
    /// Duplicate mode: `SCORE`, `ALL` or `FORCE`.
    pub dupe_mode: String,
    /// Display name to submit instead of the one in the NZB head.
    pub name: Option<String>,
    /// Extra post-processing parameters, sent in order.
    pub parameters: Vec<PostProcessParameter>,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            category: String::new(),
            priority: Priority::Normal,
            add_to_top: false,
            add_paused: false,
            dupe_key: String::new(),
            dupe_score: 0,
            dupe_mode: "SCORE".to_string(),
            name: None,
            parameters: Vec::new(),
        }
    }
}

impl AddOptions {
    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the display name override.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a post-processing parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(PostProcessParameter {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Returns the override name when one is set and non-empty.
    pub fn override_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// Commands understood by the `editqueue` method that this crate issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    /// Remove a group from the queue, moving it to history.
    GroupDelete,
    /// Pause a group.
    GroupPause,
    /// Resume a paused group.
    GroupResume,
    /// Move a group to the top of the queue.
    GroupMoveTop,
    /// Move a group to the bottom of the queue.
    GroupMoveBottom,
    /// Change a group's priority. The parameter is the priority value.
    GroupSetPriority,
    /// Change a group's category. The parameter is the category name.
    GroupSetCategory,
    /// Hide a history entry.
    HistoryDelete,
    /// Remove a history entry for good.
    HistoryFinalDelete,
    /// Download a history entry again from scratch.
    HistoryRedownload,
}

impl EditCommand {
    /// Returns the wire name of the command.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GroupDelete => "GroupDelete",
            Self::GroupPause => "GroupPause",
            Self::GroupResume => "GroupResume",
            Self::GroupMoveTop => "GroupMoveTop",
            Self::GroupMoveBottom => "GroupMoveBottom",
            Self::GroupSetPriority => "GroupSetPriority",
            Self::GroupSetCategory => "GroupSetCategory",
            Self::HistoryDelete => "HistoryDelete",
            Self::HistoryFinalDelete => "HistoryFinalDelete",
            Self::HistoryRedownload => "HistoryRedownload",
        }
    }
}

impl fmt::Display for EditCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DownloadQueue defines the common interface for download queue clients.
#[allow(async_fn_in_trait)]
pub trait DownloadQueue {
    /// Fetch an NZB from `source_url` and append it to the queue. Returns the new queue id.
    async fn add(&self, source_url: &str, options: AddOptions) -> Result<i64, NzbGetError>;
    /// Append a local NZB file to the queue. Returns the new queue id.
    async fn add_file(&self, path: &std::path::Path, options: AddOptions)
    -> Result<i64, NzbGetError>;
    /// Server status plus the active groups, captured together.
    async fn list(&self) -> Result<QueueSnapshot, NzbGetError>;
    /// Active queue entries.
    async fn groups(&self) -> Result<Vec<Group>, NzbGetError>;
    /// History entries. Hidden entries are included when `include_hidden` is set.
    async fn history(&self, include_hidden: bool) -> Result<Vec<HistoryItem>, NzbGetError>;
    /// Server-wide status.
    async fn status(&self) -> Result<StatusSnapshot, NzbGetError>;
    /// Server version.
    async fn version(&self) -> Result<VersionInfo, NzbGetError>;
    /// Pause all downloads.
    async fn pause_all(&self) -> Result<(), NzbGetError>;
    /// Resume all downloads.
    async fn resume_all(&self) -> Result<(), NzbGetError>;
    /// Run an `editqueue` command against the given entries.
    async fn edit_queue(
        &self,
        command: &str,
        parameter: &str,
        ids: &[i64],
    ) -> Result<(), NzbGetError>;

    /// Remove a queue entry, moving it to history.
    async fn remove(&self, id: i64) -> Result<(), NzbGetError> {
        self.edit_queue(EditCommand::GroupDelete.as_str(), "", &[id])
            .await
    }

    /// Hide a history entry.
    async fn delete(&self, id: i64) -> Result<(), NzbGetError> {
        self.edit_queue(EditCommand::HistoryDelete.as_str(), "", &[id])
            .await
    }

    /// Remove a history entry permanently.
    async fn destroy(&self, id: i64) -> Result<(), NzbGetError> {
        self.edit_queue(EditCommand::HistoryFinalDelete.as_str(), "", &[id])
            .await
    }

    /// Pause a queue entry.
    async fn pause(&self, id: i64) -> Result<(), NzbGetError> {
        self.edit_queue(EditCommand::GroupPause.as_str(), "", &[id])
            .await
    }

    /// Resume a queue entry.
    async fn resume(&self, id: i64) -> Result<(), NzbGetError> {
        self.edit_queue(EditCommand::GroupResume.as_str(), "", &[id])
            .await
    }

    /// Move a queue entry to the top.
    async fn move_to_top(&self, id: i64) -> Result<(), NzbGetError> {
        self.edit_queue(EditCommand::GroupMoveTop.as_str(), "", &[id])
            .await
    }

    /// Move a queue entry to the bottom.
    async fn move_to_bottom(&self, id: i64) -> Result<(), NzbGetError> {
        self.edit_queue(EditCommand::GroupMoveBottom.as_str(), "", &[id])
            .await
    }

    /// Change the priority of a queue entry.
    async fn set_priority(&self, id: i64, priority: Priority) -> Result<(), NzbGetError> {
        let parameter = priority.to_string();
        self.edit_queue(EditCommand::GroupSetPriority.as_str(), &parameter, &[id])
            .await
    }

    /// Change the category of a queue entry.
    async fn set_category(&self, id: i64, category: &str) -> Result<(), NzbGetError> {
        self.edit_queue(EditCommand::GroupSetCategory.as_str(), category, &[id])
            .await
    }

    /// Put a history entry back into the queue and download it again.
    async fn history_redownload(&self, id: i64) -> Result<(), NzbGetError> {
        self.edit_queue(EditCommand::HistoryRedownload.as_str(), "", &[id])
            .await
    }
}

// Field names follow the NZBGet API.

/// Active queue entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
#[allow(missing_docs)] // rationale: these are the same fields as in the NZBGet API
pub struct Group {
    #[serde(rename = "NZBID")]
    pub id: i64,

    #[serde(rename = "NZBName")]
    pub name: String,

    #[serde(rename = "NZBFilename")]
    pub filename: String,

    #[serde(rename = "Category")]
    pub category: String,

    #[serde(rename = "Status")]
    pub status: String,

    #[serde(rename = "MaxPriority")]
    pub priority: Priority,

    #[serde(rename = "FileSizeMB")]
    pub file_size_mb: i64,

    #[serde(rename = "RemainingSizeMB")]
    pub remaining_size_mb: i64,

    #[serde(rename = "PausedSizeMB")]
    pub paused_size_mb: i64,

    #[serde(rename = "DownloadedSizeMB")]
    pub downloaded_size_mb: i64,

    #[serde(rename = "ActiveDownloads")]
    pub active_downloads: i32,

    #[serde(rename = "Health")]
    pub health: i32,

    #[serde(rename = "DupeKey")]
    pub dupe_key: String,

    #[serde(rename = "DupeScore")]
    pub dupe_score: i32,

    #[serde(rename = "DupeMode")]
    pub dupe_mode: String,

    #[serde(rename = "DestDir")]
    pub dest_dir: String,
}

/// Completed, failed or removed queue entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct HistoryItem {
    #[serde(rename = "NZBID")]
    pub id: i64,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Kind")]
    pub kind: String,

    #[serde(rename = "Category")]
    pub category: String,

    #[serde(rename = "Status")]
    pub status: String,

    /// Unix timestamp of when the entry was added to history.
    #[serde(rename = "HistoryTime")]
    pub history_time: i64,

    #[serde(rename = "FileSizeMB")]
    pub file_size_mb: i64,

    #[serde(rename = "DownloadTimeSec")]
    pub download_time_sec: i64,

    #[serde(rename = "ParStatus")]
    pub par_status: String,

    #[serde(rename = "UnpackStatus")]
    pub unpack_status: String,

    #[serde(rename = "DeleteStatus")]
    pub delete_status: String,

    #[serde(rename = "MarkStatus")]
    pub mark_status: String,

    #[serde(rename = "DestDir")]
    pub dest_dir: String,

    #[serde(rename = "DupeKey")]
    pub dupe_key: String,
}

/// Server-wide status.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct StatusSnapshot {
    #[serde(rename = "DownloadPaused")]
    pub download_paused: bool,

    #[serde(rename = "Download2Paused")]
    pub download2_paused: bool,

    #[serde(rename = "PostPaused")]
    pub post_paused: bool,

    #[serde(rename = "ScanPaused")]
    pub scan_paused: bool,

    #[serde(rename = "ServerStandBy")]
    pub server_stand_by: bool,

    /// Bytes per second.
    #[serde(rename = "DownloadRate")]
    pub download_rate: i64,

    #[serde(rename = "AverageDownloadRate")]
    pub average_download_rate: i64,

    #[serde(rename = "DownloadLimit")]
    pub download_limit: i64,

    #[serde(rename = "RemainingSizeMB")]
    pub remaining_size_mb: i64,

    #[serde(rename = "ForcedSizeMB")]
    pub forced_size_mb: i64,

    #[serde(rename = "DownloadedSizeMB")]
    pub downloaded_size_mb: i64,

    #[serde(rename = "ThreadCount")]
    pub thread_count: i32,

    #[serde(rename = "PostJobCount")]
    pub post_job_count: i32,

    #[serde(rename = "UpTimeSec")]
    pub up_time_sec: i64,

    #[serde(rename = "DownloadTimeSec")]
    pub download_time_sec: i64,

    #[serde(rename = "FreeDiskSpaceMB")]
    pub free_disk_space_mb: i64,

    #[serde(rename = "ServerTime")]
    pub server_time: i64,

    #[serde(rename = "ResumeTime")]
    pub resume_time: i64,
}

impl StatusSnapshot {
    /// Whether downloading is paused, by the user or by the scheduler.
    pub fn is_paused(&self) -> bool {
        self.download_paused || self.download2_paused
    }
}

/// Server version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct VersionInfo {
    /// Version string as reported by the server, e.g. `21.1`.
    pub version: String,
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.version)
    }
}

/// Status and active groups, captured by one `list` call.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueSnapshot {
    /// Server status taken before the groups were listed.
    pub status: StatusSnapshot,
    /// Active queue entries.
    pub groups: Vec<Group>,
    /// When the snapshot was taken.
    pub captured_at: DateTime<Utc>,
}
