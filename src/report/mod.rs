//! Report renderers for resolved licenses.
//!
//! - [`terminal`] — colored, tabular output with summary box; respects `--verbose` / `--quiet`.
//!
//! JSON output is the serialized [`DependencyLicenses`](crate::models::DependencyLicenses) list.

pub mod terminal;
