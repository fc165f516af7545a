//! Daily Dose Client - HTTP client for the content endpoints
//!
//! This crate provides [`ContentClient`], which talks to the four upstream
//! services:
//!
//! - advice slips
//! - a book collection (one entry is recommended at random)
//! - quotes
//! - random dog images
//!
//! # Overview
//!
//! The client handles request building, timeouts, response parsing and
//! normalization into the records defined in `dailydose-core`.

pub mod content;

pub use content::ContentClient;
