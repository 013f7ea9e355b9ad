use crate::config::Credential;
use crate::error::{InsightsError, Result};
use crate::insights::InsightClient;
use crate::results::{InsightRecord, PageUrl};
use tokio::sync::mpsc;

/// Lifecycle of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Running,
    Completed,
}

/// Emitted after each URL has been scored
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// 1-based position of the URL just processed
    pub index: usize,

    /// Number of URLs in the batch
    pub total: usize,

    /// All records produced so far, in sitemap order
    pub records: Vec<InsightRecord>,
}

impl BatchProgress {
    /// The record produced by this step
    pub fn latest(&self) -> Option<&InsightRecord> {
        self.records.last()
    }

    pub fn is_last(&self) -> bool {
        self.index == self.total
    }
}

/// Scores a list of URLs one at a time
#[derive(Debug, Clone)]
pub struct BatchRunner {
    client: InsightClient,
    credential: Credential,
    state: BatchState,
}

impl BatchRunner {
    pub fn new(client: InsightClient, credential: Credential) -> Self {
        Self {
            client,
            credential,
            state: BatchState::Idle,
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Run the batch to completion, calling `on_progress` after every URL.
    ///
    /// Requests are strictly sequential. The output has one record per input
    /// URL, in input order.
    pub async fn run<F>(
        &mut self,
        urls: &[PageUrl],
        mut on_progress: F,
    ) -> Result<Vec<InsightRecord>>
    where
        F: FnMut(&BatchProgress),
    {
        if urls.is_empty() {
            ::log::warn!("Batch started with no URLs");
            return Err(InsightsError::NoUrlsToProcess);
        }

        let total = urls.len();
        self.state = BatchState::Running;
        ::log::info!("Starting batch of {} URLs", total);

        let mut progress = BatchProgress {
            index: 0,
            total,
            records: Vec::with_capacity(total),
        };

        for (i, url) in urls.iter().enumerate() {
            let record = self.client.query(url, &self.credential).await;
            progress.index = i + 1;
            progress.records.push(record);

            ::log::debug!("Processed {}/{}: {}", progress.index, total, url);
            on_progress(&progress);
        }

        self.state = BatchState::Completed;
        ::log::info!("Batch complete - {} records", progress.records.len());
        Ok(progress.records)
    }

    /// Start the batch on a background task and get a receiver for progress events.
    ///
    /// The channel closes once the last URL has been processed.
    pub fn spawn(mut self, urls: Vec<PageUrl>) -> Result<mpsc::Receiver<BatchProgress>> {
        if urls.is_empty() {
            ::log::warn!("Batch started with no URLs");
            return Err(InsightsError::NoUrlsToProcess);
        }

        let (tx, rx) = mpsc::channel::<BatchProgress>(urls.len());

        tokio::spawn(async move {
            let result = self
                .run(&urls, |progress| {
                    // Receiver gone means nobody renders progress any more
                    if let Err(e) = tx.try_send(progress.clone()) {
                        ::log::debug!("Dropping progress event: {}", e);
                    }
                })
                .await;

            if let Err(e) = result {
                ::log::error!("Batch failed: {}", e);
            }
        });

        Ok(rx)
    }
}
