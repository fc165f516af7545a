//! Daily Dose Core - Domain types, error envelope, and configuration.

pub mod breed;
pub mod config;
pub mod envelope;
pub mod error;
pub mod models;
pub mod outcome;

pub use breed::derive_breed_label;
pub use config::{
    default_config_path, load_config, EndpointConfig, HttpConfig, HubConfig, StorageConfig,
};
pub use envelope::{ErrorEnvelope, ErrorLog};
pub use error::{AppError, FailureClass};
pub use models::{
    format_timestamp, timestamp_now, AdviceRecord, BookRecord, Category, DogRecord, QuoteRecord,
    Record,
};
pub use outcome::{CategoryReport, DailyDoseSummary, PipelineOutcome, StoreStats};
