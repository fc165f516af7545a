//! Outcome types for pipeline runs and store statistics.
//!
//! Pure bookkeeping, decoupled from I/O and terminal rendering.

use crate::models::Category;

/// Result of one fetch-display-persist cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Fetched and appended to the store
    Saved,
    /// Fetched and shown, but the append failed
    SaveFailed,
    /// Nothing came back from the upstream; no write attempted
    FetchFailed,
}

/// Outcome of a single-category pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryReport {
    pub category: Category,
    pub outcome: PipelineOutcome,
}

impl CategoryReport {
    pub fn new(category: Category, outcome: PipelineOutcome) -> Self {
        Self { category, outcome }
    }

    pub fn is_saved(&self) -> bool {
        self.outcome == PipelineOutcome::Saved
    }

    /// True when a record was obtained, whether or not it was stored.
    pub fn fetched(&self) -> bool {
        self.outcome != PipelineOutcome::FetchFailed
    }
}

/// Aggregated results from the "everything" run.
#[derive(Debug, Clone, Default)]
pub struct DailyDoseSummary {
    pub reports: Vec<CategoryReport>,
}

impl DailyDoseSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, report: CategoryReport) {
        self.reports.push(report);
    }

    pub fn saved_count(&self) -> usize {
        self.reports.iter().filter(|r| r.is_saved()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.reports.iter().filter(|r| !r.is_saved()).count()
    }

    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn report_for(&self, category: Category) -> Option<&CategoryReport> {
        self.reports.iter().find(|r| r.category == category)
    }
}

/// Data row counts per category.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub advice: usize,
    pub books: usize,
    pub quotes: usize,
    pub dogs: usize,
}

impl StoreStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: Category, count: usize) {
        match category {
            Category::Advice => self.advice = count,
            Category::Book => self.books = count,
            Category::Quote => self.quotes = count,
            Category::Dog => self.dogs = count,
        }
    }

    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Advice => self.advice,
            Category::Book => self.books,
            Category::Quote => self.quotes,
            Category::Dog => self.dogs,
        }
    }

    pub fn total(&self) -> usize {
        self.advice + self.books + self.quotes + self.dogs
    }
}
