//! Daily Dose Store - append-only CSV persistence, one file per category.

pub mod csv_store;

pub use csv_store::CsvStore;
