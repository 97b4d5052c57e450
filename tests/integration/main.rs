//! Integration tests for Site-Atlas
//!
//! These tests run full crawls against wiremock servers.

mod crawl_tests;
