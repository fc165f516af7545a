//! The fetch → display → persist cycle for one category, and the composite
//! "everything" run over all four.

use std::fs;

use dailydose_client::ContentClient;
use dailydose_core::{
    AppError, Category, CategoryReport, DailyDoseSummary, ErrorEnvelope, ErrorLog, HubConfig,
    PipelineOutcome, Record, StoreStats,
};
use dailydose_store::CsvStore;
use tracing::info;

/// Receives everything a pipeline run wants to show the user.
///
/// The banner hooks default to doing nothing.
pub trait Presenter {
    /// A request for `category` is about to be sent.
    fn fetching(&self, category: Category);

    /// A record was fetched and normalized, before it is stored.
    fn show_record(&self, record: &Record);

    /// Final outcome of one category.
    fn report(&self, report: &CategoryReport);

    fn everything_started(&self) {}

    fn before_category(&self, _category: Category) {}

    fn everything_finished(&self, _summary: &DailyDoseSummary) {}

    fn show_stats(&self, _stats: &StoreStats) {}
}

/// Content client, stores and error envelope, wired together.
pub struct Pipeline {
    client: ContentClient,
    store: CsvStore,
    envelope: ErrorEnvelope,
}

impl Pipeline {
    pub fn new(client: ContentClient, store: CsvStore, envelope: ErrorEnvelope) -> Self {
        Self {
            client,
            store,
            envelope,
        }
    }

    /// Builds every component from one configuration value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` for a malformed endpoint.
    pub fn from_config(config: &HubConfig) -> Result<Self, AppError> {
        let client = ContentClient::new(&config.http, &config.endpoints)?;
        let store = CsvStore::new(config.storage.clone());
        let envelope = ErrorEnvelope::new(ErrorLog::new(config.storage.log_path()));
        Ok(Self::new(client, store, envelope))
    }

    pub fn store(&self) -> &CsvStore {
        &self.store
    }

    pub fn envelope(&self) -> &ErrorEnvelope {
        &self.envelope
    }

    /// Creates the log directory and every store that does not exist yet.
    pub fn bootstrap(&self) -> Result<(), AppError> {
        if let Some(dir) = self.envelope.log().path().parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        self.store.ensure_all()
    }

    /// Runs one fetch-display-persist cycle.
    ///
    /// Network, parse and storage failures end up in the report; only an
    /// unexpected error is returned as `Err`.
    pub async fn run_category(
        &self,
        category: Category,
        presenter: &dyn Presenter,
    ) -> Result<CategoryReport, AppError> {
        presenter.fetching(category);

        let fetched = self
            .envelope
            .run_async(category, self.client.fetch(category))
            .await?;

        let Some(record) = fetched else {
            let report = CategoryReport::new(category, PipelineOutcome::FetchFailed);
            presenter.report(&report);
            return Ok(report);
        };

        presenter.show_record(&record);

        let saved = self
            .envelope
            .run(category, || self.store.append(&record))?
            .is_some();
        let outcome = if saved {
            PipelineOutcome::Saved
        } else {
            PipelineOutcome::SaveFailed
        };
        info!(category = %category, ?outcome, "Pipeline finished");

        let report = CategoryReport::new(category, outcome);
        presenter.report(&report);
        Ok(report)
    }

    /// Runs every category in order. A failing category never stops the next one.
    pub async fn run_everything(
        &self,
        presenter: &dyn Presenter,
    ) -> Result<DailyDoseSummary, AppError> {
        presenter.everything_started();

        let mut summary = DailyDoseSummary::new();
        for category in Category::ALL {
            presenter.before_category(category);
            summary.add(self.run_category(category, presenter).await?);
        }

        info!(
            "Daily dose complete: {} saved, {} failed",
            summary.saved_count(),
            summary.failed_count()
        );
        presenter.everything_finished(&summary);
        Ok(summary)
    }

    /// Row counts per category; an unreadable store counts as 0.
    pub fn statistics(&self, presenter: &dyn Presenter) -> StoreStats {
        let stats = self.store.stats();
        presenter.show_stats(&stats);
        stats
    }
}
