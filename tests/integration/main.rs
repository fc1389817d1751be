//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full scraping pipeline end-to-end.

mod common;
mod pagination_tests;
mod storage_tests;
