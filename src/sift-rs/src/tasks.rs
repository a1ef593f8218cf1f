use std::sync::Arc;
use tokio::time::{self, Instant};

use crate::request::Requester;
use crate::{ClientError, Result};
use sift_core::{AsTaskUid, EnqueuedTask, Task, TasksQuery, TasksResults, ToQuery, WaitOptions};

/// Looks up server-side tasks and waits for them to finish.
///
/// Waiting is plain polling: the server has no push channel. A timeout only
/// abandons the wait; the server keeps processing the task.
#[derive(Clone)]
pub struct TaskClient {
    http: Arc<Requester>,
    defaults: WaitOptions,
}

impl TaskClient {
    pub(crate) fn new(http: Arc<Requester>, defaults: WaitOptions) -> Self {
        Self { http, defaults }
    }

    /// Wait bounds used when a call passes `None`
    pub fn default_wait_options(&self) -> WaitOptions {
        self.defaults
    }

    /// Fetch one task. An unknown uid surfaces as an API error with code
    /// `task_not_found`.
    pub async fn get_task(&self, task: impl AsTaskUid) -> Result<Task> {
        let path = format!("tasks/{}", task.task_uid());
        self.http.get(&path, &Default::default()).await
    }

    pub async fn get_tasks(&self, query: &TasksQuery) -> Result<TasksResults> {
        self.http.get("tasks", &query.to_query()).await
    }

    /// Cancel every enqueued or processing task matching the filter. The
    /// cancelation is itself a task.
    pub async fn cancel_tasks(&self, query: &TasksQuery) -> Result<EnqueuedTask> {
        self.http
            .post_empty("tasks/cancel", &query.to_filter_query())
            .await
    }

    /// Delete finished tasks matching the filter from the task history
    pub async fn delete_tasks(&self, query: &TasksQuery) -> Result<EnqueuedTask> {
        self.http.delete("tasks", &query.to_filter_query()).await
    }

    /// Poll a task until it reaches a terminal status.
    ///
    /// `Failed` and `Canceled` tasks are returned as values; check
    /// `task.error` for the cause. Only running out of time (or a transport /
    /// API failure while polling) is an error, and the timeout error carries
    /// the last snapshot seen.
    pub async fn wait_for_task(
        &self,
        task: impl AsTaskUid,
        options: Option<WaitOptions>,
    ) -> Result<Task> {
        self.wait_for_task_with(task, options, |_| {}).await
    }

    /// Like [`wait_for_task`](Self::wait_for_task), calling `observer` with
    /// every snapshot fetched, terminal or not.
    #[tracing::instrument(skip(self, task, observer), fields(task_uid = task.task_uid()))]
    pub async fn wait_for_task_with<F>(
        &self,
        task: impl AsTaskUid,
        options: Option<WaitOptions>,
        mut observer: F,
    ) -> Result<Task>
    where
        F: FnMut(&Task) + Send,
    {
        let options = options.unwrap_or(self.defaults);
        let uid = task.task_uid();
        let started = Instant::now();
        let mut polls = 0u32;
        let mut task = self.get_task(uid).await?;

        loop {
            polls += 1;
            observer(&task);

            if task.status.is_terminal() {
                tracing::info!(
                    status = %task.status,
                    polls,
                    "Task finished"
                );
                return Ok(task);
            }

            if started.elapsed() < options.timeout {
                tracing::debug!(status = %task.status, polls, "Task not finished yet");
                time::sleep(options.interval).await;
            }

            // No fetch once the budget is spent, even right after a sleep
            let elapsed = started.elapsed();
            if elapsed >= options.timeout {
                tracing::warn!(
                    status = %task.status,
                    polls,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Gave up waiting for task"
                );
                return Err(ClientError::TaskTimeout {
                    task: Box::new(task),
                    elapsed,
                    timeout: options.timeout,
                });
            }

            task = self.get_task(uid).await?;
        }
    }

    /// Wait for several tasks one after another.
    ///
    /// Results are in input order. The first timeout aborts the whole call
    /// and the remaining tasks are never polled.
    pub async fn wait_for_tasks<I>(&self, tasks: I, options: Option<WaitOptions>) -> Result<Vec<Task>>
    where
        I: IntoIterator,
        I::Item: AsTaskUid,
    {
        self.wait_for_tasks_with(tasks, options, |_| {}).await
    }

    pub async fn wait_for_tasks_with<I, F>(
        &self,
        tasks: I,
        options: Option<WaitOptions>,
        mut observer: F,
    ) -> Result<Vec<Task>>
    where
        I: IntoIterator,
        I::Item: AsTaskUid,
        F: FnMut(&Task) + Send,
    {
        let uids: Vec<u64> = tasks.into_iter().map(|t| t.task_uid()).collect();
        let mut finished = Vec::with_capacity(uids.len());

        for uid in uids {
            let task = self
                .wait_for_task_with(uid, options, &mut observer)
                .await?;
            finished.push(task);
        }

        Ok(finished)
    }
}
