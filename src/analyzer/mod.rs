use std::path::Path;

use anyhow::Result;

use crate::models::Coordinates;

pub mod bundles;
pub mod java;

/// Lists the dependencies a build declares.
pub trait Analyzer {
    fn analyze(&self, path: &Path) -> Result<Vec<Coordinates>>;
}
