//! Test support for tablo.
//!
//! Provides a scripted [`MockAdapter`] that records every call it
//! receives, injects failures, and can hold fetches open so tests can
//! interleave completions deterministically, plus the small CRM sample
//! dataset the cross-crate tests share.

pub mod dataset;
pub mod mock_adapter;

pub use dataset::{leads_page, sample_leads};
pub use mock_adapter::{AdapterCall, Gate, MockAdapter};
