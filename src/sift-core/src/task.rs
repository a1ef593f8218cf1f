use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::ErrorResponse;
use crate::query::{QueryPairs, ToQuery};

/// TaskStatus is the lifecycle state of a server-side task.
///
/// `Succeeded`, `Failed` and `Canceled` are terminal: once a task reports one
/// of them it never transitions again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Enqueued,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded | TaskStatus::Failed | TaskStatus::Canceled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Enqueued => "enqueued",
            TaskStatus::Processing => "processing",
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::Failed => "failed",
            TaskStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TaskType is the kind of operation a task performs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TaskType {
    IndexCreation,
    IndexUpdate,
    IndexDeletion,
    IndexSwap,
    DocumentAdditionOrUpdate,
    DocumentDeletion,
    SettingsUpdate,
    DumpCreation,
    TaskCancelation,
    TaskDeletion,
    SnapshotCreation,
    /// Operation kinds introduced by newer servers
    #[serde(other)]
    Unknown,
}

impl TaskType {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::IndexCreation => "indexCreation",
            TaskType::IndexUpdate => "indexUpdate",
            TaskType::IndexDeletion => "indexDeletion",
            TaskType::IndexSwap => "indexSwap",
            TaskType::DocumentAdditionOrUpdate => "documentAdditionOrUpdate",
            TaskType::DocumentDeletion => "documentDeletion",
            TaskType::SettingsUpdate => "settingsUpdate",
            TaskType::DumpCreation => "dumpCreation",
            TaskType::TaskCancelation => "taskCancelation",
            TaskType::TaskDeletion => "taskDeletion",
            TaskType::SnapshotCreation => "snapshotCreation",
            TaskType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// EnqueuedTask is the handle returned immediately by every mutating call.
/// It carries just enough to look the task up later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnqueuedTask {
    pub task_uid: u64,
    #[serde(default)]
    pub index_uid: Option<String>,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub kind: TaskType,
    pub enqueued_at: DateTime<Utc>,
}

/// Task is a snapshot of a server-side task, fetched fresh on every lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub uid: u64,
    #[serde(default)]
    pub index_uid: Option<String>,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub kind: TaskType,
    #[serde(default)]
    pub canceled_by: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
    /// ISO-8601 duration as reported by the server, e.g. `PT0.0254S`
    #[serde(default)]
    pub duration: Option<String>,
    pub enqueued_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Succeeded
    }

    pub fn is_failure(&self) -> bool {
        self.status == TaskStatus::Failed
    }
}

/// Anything that identifies a task: a raw uid, a handle or a snapshot.
pub trait AsTaskUid {
    fn task_uid(&self) -> u64;
}

impl AsTaskUid for u64 {
    fn task_uid(&self) -> u64 {
        *self
    }
}

impl AsTaskUid for EnqueuedTask {
    fn task_uid(&self) -> u64 {
        self.task_uid
    }
}

impl AsTaskUid for Task {
    fn task_uid(&self) -> u64 {
        self.uid
    }
}

impl<T: AsTaskUid + ?Sized> AsTaskUid for &T {
    fn task_uid(&self) -> u64 {
        (**self).task_uid()
    }
}

/// TasksQuery filters task listings, cancelations and deletions.
/// Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TasksQuery {
    pub uids: Option<Vec<u64>>,
    pub index_uids: Option<Vec<String>>,
    pub types: Option<Vec<TaskType>>,
    pub statuses: Option<Vec<TaskStatus>>,
    pub canceled_by: Option<Vec<u64>>,
    pub before_enqueued_at: Option<DateTime<Utc>>,
    pub after_enqueued_at: Option<DateTime<Utc>>,
    pub before_started_at: Option<DateTime<Utc>>,
    pub after_started_at: Option<DateTime<Utc>>,
    pub before_finished_at: Option<DateTime<Utc>>,
    pub after_finished_at: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub from: Option<u64>,
}

impl TasksQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uids(mut self, uids: impl IntoIterator<Item = u64>) -> Self {
        self.uids = Some(uids.into_iter().collect());
        self
    }

    pub fn with_index_uids<S: Into<String>>(mut self, uids: impl IntoIterator<Item = S>) -> Self {
        self.index_uids = Some(uids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = TaskType>) -> Self {
        self.types = Some(types.into_iter().collect());
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    pub fn with_canceled_by(mut self, uids: impl IntoIterator<Item = u64>) -> Self {
        self.canceled_by = Some(uids.into_iter().collect());
        self
    }

    pub fn with_before_enqueued_at(mut self, at: DateTime<Utc>) -> Self {
        self.before_enqueued_at = Some(at);
        self
    }

    pub fn with_after_enqueued_at(mut self, at: DateTime<Utc>) -> Self {
        self.after_enqueued_at = Some(at);
        self
    }

    pub fn with_before_started_at(mut self, at: DateTime<Utc>) -> Self {
        self.before_started_at = Some(at);
        self
    }

    pub fn with_after_started_at(mut self, at: DateTime<Utc>) -> Self {
        self.after_started_at = Some(at);
        self
    }

    pub fn with_before_finished_at(mut self, at: DateTime<Utc>) -> Self {
        self.before_finished_at = Some(at);
        self
    }

    pub fn with_after_finished_at(mut self, at: DateTime<Utc>) -> Self {
        self.after_finished_at = Some(at);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    /// Filter parameters only, without pagination. Cancel and delete
    /// requests reject `limit` and `from`.
    pub fn to_filter_query(&self) -> QueryPairs {
        let mut query = QueryPairs::new();
        query
            .push_list("uids", self.uids.as_deref())
            .push_list("indexUids", self.index_uids.as_deref())
            .push_list("types", self.types.as_deref())
            .push_list("statuses", self.statuses.as_deref())
            .push_list("canceledBy", self.canceled_by.as_deref())
            .push_date("beforeEnqueuedAt", self.before_enqueued_at)
            .push_date("afterEnqueuedAt", self.after_enqueued_at)
            .push_date("beforeStartedAt", self.before_started_at)
            .push_date("afterStartedAt", self.after_started_at)
            .push_date("beforeFinishedAt", self.before_finished_at)
            .push_date("afterFinishedAt", self.after_finished_at);
        query
    }
}

impl ToQuery for TasksQuery {
    fn to_query(&self) -> QueryPairs {
        let mut query = self.to_filter_query();
        query
            .push_opt("limit", self.limit)
            .push_opt("from", self.from);
        query
    }
}

/// TasksResults is one page of a task listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksResults {
    pub results: Vec<Task>,
    pub limit: u32,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub next: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// WaitOptions bounds the task polling loop.
///
/// No poll is made once `timeout` has elapsed. `interval` larger than
/// `timeout` is allowed and results in a single poll before the timeout fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_WAIT_INTERVAL_MS: u64 = 50;

impl WaitOptions {
    pub fn from_millis(timeout_ms: u64, interval_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            interval: Duration::from_millis(interval_ms),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self::from_millis(DEFAULT_WAIT_TIMEOUT_MS, DEFAULT_WAIT_INTERVAL_MS)
    }
}
