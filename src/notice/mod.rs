//! License references recovered from an archive's `about.html` legal notice.
//!
//! - [`scanner`] — pattern matching over the notice HTML.
//! - [`resolver`] — turns the notice and the files it references into
//!   [`LicenseRecord`](crate::models::LicenseRecord)s.

pub mod resolver;
pub mod scanner;

pub use resolver::{NoticePolicy, NoticeResolver};
