// Page-spanning gist iteration.
// A background task walks the list endpoint page by page and hands summaries over one at a time.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::Result;

use super::service::GistService;
use super::types::GistSummary;

/// Page size used by [`GistService::iter`].
pub const DEFAULT_PER_PAGE: i64 = 40;

/// How the `page` query parameter moves from one request to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageAdvance {
    /// Start at 0 and add the page size each time: 0, 40, 80, ...
    #[default]
    ByPageSize,
    /// Start at 1 and count pages: 1, 2, 3, ...
    Sequential,
}

impl PageAdvance {
    pub fn first(self) -> i64 {
        match self {
            PageAdvance::ByPageSize => 0,
            PageAdvance::Sequential => 1,
        }
    }

    pub fn next(self, page: i64, per_page: i64) -> i64 {
        match self {
            PageAdvance::ByPageSize => page.saturating_add(per_page),
            PageAdvance::Sequential => page.saturating_add(1),
        }
    }
}

/// Page size and cursor policy for an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    pub per_page: i64,
    pub advance: PageAdvance,
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            advance: PageAdvance::default(),
        }
    }
}

/// Single-pass sequence of every gist the user owns.
///
/// Yields `Ok` summaries in API order and ends with `None` after the first
/// empty page. A failed page request is yielded once as `Err`, after which
/// the sequence ends. Dropping the stream (or calling [`close`](Self::close))
/// stops the background task.
#[derive(Debug)]
pub struct GistStream {
    rx: mpsc::Receiver<Result<GistSummary>>,
    task: JoinHandle<()>,
}

impl GistStream {
    pub async fn next(&mut self) -> Option<Result<GistSummary>> {
        self.rx.recv().await
    }

    /// Next summary, treating a failure like exhaustion.
    pub async fn next_summary(&mut self) -> Option<GistSummary> {
        match self.rx.recv().await? {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::debug!("gist iteration stopped: {}", e);
                None
            }
        }
    }

    /// Summaries only: the sequence ends quietly at the first error.
    pub fn into_summaries(self) -> Summaries {
        Summaries {
            stream: self,
            done: false,
        }
    }

    /// Drain the rest of the sequence, failing on the first error.
    pub async fn try_collect(mut self) -> Result<Vec<GistSummary>> {
        let mut summaries = Vec::new();
        while let Some(summary) = self.next().await {
            summaries.push(summary?);
        }
        Ok(summaries)
    }

    /// Stop producing; items already handed over can still be received.
    pub fn close(&mut self) {
        self.rx.close();
    }

    /// Whether the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// [`GistStream`] without the error channel.
#[derive(Debug)]
pub struct Summaries {
    stream: GistStream,
    done: bool,
}

impl Summaries {
    pub async fn next(&mut self) -> Option<GistSummary> {
        if self.done {
            return None;
        }
        let summary = self.stream.next_summary().await;
        if summary.is_none() {
            self.done = true;
            self.stream.close();
        }
        summary
    }

    pub fn is_finished(&self) -> bool {
        self.stream.is_finished()
    }
}

impl Drop for GistStream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl GistService {
    /// Iterate over every gist with the default page policy.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn iter(&self) -> GistStream {
        self.iter_with(PagePolicy::default())
    }

    pub fn iter_with(&self, policy: PagePolicy) -> GistStream {
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(produce(self.clone(), policy, tx));
        GistStream { rx, task }
    }
}

async fn produce(
    service: GistService,
    policy: PagePolicy,
    tx: mpsc::Sender<Result<GistSummary>>,
) {
    let mut page = policy.advance.first();
    let mut emitted = 0usize;

    loop {
        if tx.is_closed() {
            tracing::debug!("gist iteration abandoned after {} items", emitted);
            return;
        }

        let summaries = match service.list(policy.per_page, page).await {
            Ok(summaries) => summaries,
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                return;
            }
        };

        if summaries.is_empty() {
            if emitted == 0 {
                service.logger().warning(&format!(
                    "no gists found for {}",
                    service.config().username
                ));
            }
            tracing::debug!("gist iteration finished after {} items", emitted);
            return;
        }

        for summary in summaries {
            if tx.send(Ok(summary)).await.is_err() {
                tracing::debug!("gist iteration abandoned after {} items", emitted);
                return;
            }
            emitted += 1;
        }

        page = policy.advance.next(page, policy.per_page);
    }
}
