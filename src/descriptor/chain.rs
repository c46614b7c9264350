use std::collections::HashSet;

use log::debug;

use crate::descriptor::{DescriptorLicense, PackageDescriptor};
use crate::error::ChainError;
use crate::lookup::DescriptorLookup;

/// Follow `descriptor`'s parents until one declares licenses.
///
/// Returns an empty list when the chain ends without any. Every coordinate is
/// visited at most once; revisiting one fails with [`ChainError::CycleDetected`].
pub fn resolve_licenses(
    descriptor: PackageDescriptor,
    lookup: &dyn DescriptorLookup,
) -> Result<Vec<DescriptorLicense>, ChainError> {
    let mut visited = HashSet::new();
    if let Some(coordinates) = descriptor.coordinates() {
        visited.insert(coordinates);
    }

    let mut current = descriptor;
    while current.licenses.is_empty() {
        let Some(parent) = current.parent.take() else {
            return Ok(Vec::new());
        };
        if !visited.insert(parent.clone()) {
            return Err(ChainError::CycleDetected(parent));
        }

        debug!("Following parent descriptor {}", parent);
        let path = lookup.lookup(&parent)?;
        let content = std::fs::read_to_string(&path).map_err(|source| ChainError::Io {
            path: path.clone(),
            source,
        })?;
        current = PackageDescriptor::parse(&content).map_err(|message| ChainError::Parse {
            origin: parent.to_string(),
            message,
        })?;
    }

    Ok(current.licenses)
}
