#![deny(unsafe_code)]

//! Shared test utilities for the sofkey workspace.
//!
//! Provides config builders, document doubles, on-disk taxonomy fixtures, and
//! tracing helpers so that individual crate tests stay concise and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! sofkey-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod fixture;
pub mod tracing_setup;

pub use fixture::{CountingSource, FakeDocument, ReadCounter, SAMPLE_DE, SAMPLE_EN, TaxonomyFixture};
