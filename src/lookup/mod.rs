//! Resolution of parent descriptors by coordinates.
//!
//! The chain walker only sees the [`DescriptorLookup`] trait. [`maven`]
//! resolves against a Maven-layout local repository and, when online, remote
//! repositories; [`CachingLookup`] memoizes any lookup across dependencies.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::LookupError;
use crate::models::Coordinates;

pub mod maven;

pub trait DescriptorLookup {
    /// Resolve the POM for `coordinates` to a local file.
    fn lookup(&self, coordinates: &Coordinates) -> Result<PathBuf, LookupError>;
}

impl<L: DescriptorLookup + ?Sized> DescriptorLookup for &L {
    fn lookup(&self, coordinates: &Coordinates) -> Result<PathBuf, LookupError> {
        (**self).lookup(coordinates)
    }
}

/// Remembers successful and not-found lookups; resolution errors are retried.
pub struct CachingLookup<L> {
    inner: L,
    cache: RefCell<HashMap<Coordinates, Option<PathBuf>>>,
}

impl<L: DescriptorLookup> CachingLookup<L> {
    pub fn new(inner: L) -> Self {
        CachingLookup {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }
}

impl<L: DescriptorLookup> DescriptorLookup for CachingLookup<L> {
    fn lookup(&self, coordinates: &Coordinates) -> Result<PathBuf, LookupError> {
        if let Some(cached) = self.cache.borrow().get(coordinates) {
            return cached
                .clone()
                .ok_or_else(|| LookupError::NotFound(coordinates.clone()));
        }

        let result = self.inner.lookup(coordinates);
        match &result {
            Ok(path) => {
                self.cache
                    .borrow_mut()
                    .insert(coordinates.clone(), Some(path.clone()));
            }
            Err(LookupError::NotFound(_)) => {
                self.cache.borrow_mut().insert(coordinates.clone(), None);
            }
            Err(LookupError::Resolution { .. }) => {}
        }
        result
    }
}
