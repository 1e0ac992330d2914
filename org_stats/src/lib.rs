//! Organization repository statistics
//!
//! # Overview
//!
//! Library gathering metadata and access statistics of every repository in a GitHub organization.
//! Given an organization name, library fetches a single page of up to 100 repositories (sorted by last update) and, for each of them, its clone traffic, view traffic, release downloads and contributor count.
//! Traffic numbers cover the trailing 14 day window reported by the API.
//! Each repository becomes one row of a CSV report; rows are emitted in listing order.
//! A failed per-repository call never drops the row. Its fields fall back to zero, so a zero in the report means "unknown", not "confirmed zero".
//!
//! The `totals` module is the second half of the toolset: it sums the numeric columns of a previously produced report.

pub mod api;
#[cfg(feature = "collector")]
pub mod collector;
pub mod totals;
