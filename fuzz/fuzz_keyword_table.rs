//! Fuzz target for keyword table parsing and version detection.
//!
//! Run with: cargo +nightly fuzz run fuzz_keyword_table
//!
//! Arbitrary text is parsed as a table, projected onto every declared
//! version, and also scanned as a deck marker and a sidecar file.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sofkey_core::detect::{parse_marker, parse_sidecar};
use sofkey_core::taxonomy::{RawTaxonomy, Taxonomy};
use sofkey_core::{AvailabilitySpec, Language};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_marker(text);
    let _ = parse_sidecar(text);

    if let Ok(raw) = RawTaxonomy::from_json(text) {
        for version in &raw.versions.versions {
            let taxonomy = Taxonomy::project(&raw, version, Language::En);
            let _ = taxonomy.statistics();
            let _ = taxonomy.validate(version);
        }
    }

    if let Some(spec) = AvailabilitySpec::parse(text) {
        let table = RawTaxonomy::empty().versions;
        let _ = spec.covers(text, &table);
    }
});
