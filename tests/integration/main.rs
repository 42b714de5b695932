//! Integration tests for Cache-Warmer
//!
//! These tests use wiremock to serve sitemaps and pages and exercise
//! resolution and warming end-to-end.

mod common;
mod sitemap_tests;
mod warmup_tests;
