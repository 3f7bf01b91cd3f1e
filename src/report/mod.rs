//! Renderers for scan results.
//!
//! - [`terminal`] — colored summary box and one table per severity; respects
//!   `--verbose` / `--quiet`.
//! - [`json`] — machine-readable summary plus every finding.

pub mod json;
pub mod terminal;
