#![no_main]

//! Fuzz target for upstream path reconstruction and validation.
//!
//! # Goal
//! Verify that arbitrary path input does not cause:
//! - Panics
//! - A traversal (`..`) or empty-segment (`//`) path slipping through
//!
//! The validated output, when accepted, must never contain either
//! rejected substring.

use libfuzzer_sys::fuzz_target;
use stockgate::path::{reconstruct, validate_path};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if validate_path(input).is_ok() {
        assert!(!input.contains(".."));
        assert!(!input.contains("//"));
    }

    // The same property must hold for the segment-joining form.
    let segments: Vec<&str> = input.split('/').collect();
    if let Ok(joined) = reconstruct(&segments) {
        assert!(!joined.contains(".."));
        assert!(!joined.contains("//"));
    }
});
