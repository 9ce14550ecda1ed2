//! Integration tests for ripple-check
//!
//! These tests use wiremock to stand up mock HTTP servers and exercise real
//! probes, page extraction, and full runs against SQLite.

mod check_tests;
mod extract_tests;
