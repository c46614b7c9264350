use std::collections::HashMap;

use log::{debug, warn};

use crate::extractor::ArchiveExtractor;
use crate::models::{ArtifactRef, Coordinates, LicenseRecord};

/// Resolved artifacts keyed by `group:artifact`, whatever version they carry.
///
/// A [`versioned`](ArtifactMap::versioned) map keys on the full coordinates
/// instead, for when the dependency list was read from the archives
/// themselves and several versions of one bundle sit side by side.
#[derive(Debug, Default)]
pub struct ArtifactMap {
    artifacts: HashMap<String, ArtifactRef>,
    versioned: bool,
}

impl ArtifactMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn versioned() -> Self {
        ArtifactMap {
            artifacts: HashMap::new(),
            versioned: true,
        }
    }

    fn key(&self, coordinates: &Coordinates) -> String {
        if self.versioned {
            coordinates.to_string()
        } else {
            coordinates.key()
        }
    }

    pub fn insert(&mut self, artifact: ArtifactRef) {
        let key = self.key(&artifact.coordinates);
        self.artifacts.insert(key, artifact);
    }

    pub fn get(&self, coordinates: &Coordinates) -> Option<&ArtifactRef> {
        self.artifacts.get(&self.key(coordinates))
    }
}

/// Per-dependency license collection: the host's own answer first, the
/// bundle's contents only when that answer is empty.
pub struct LicenseHook<'a> {
    artifacts: &'a ArtifactMap,
    extractor: &'a ArchiveExtractor<'a>,
}

impl<'a> LicenseHook<'a> {
    pub fn new(artifacts: &'a ArtifactMap, extractor: &'a ArchiveExtractor<'a>) -> Self {
        LicenseHook {
            artifacts,
            extractor,
        }
    }

    /// Never fails; problems are logged and leave the list empty.
    pub fn collect<F>(&self, dependency: &Coordinates, baseline: F) -> Vec<LicenseRecord>
    where
        F: FnOnce(&Coordinates) -> Vec<LicenseRecord>,
    {
        let mut licenses = baseline(dependency);
        if !licenses.is_empty() {
            return licenses;
        }

        let Some(artifact) = self.artifacts.get(dependency) else {
            debug!("No resolved artifact for {}", dependency.key());
            return licenses;
        };
        if artifact.file.is_none() {
            warn!("Artifact file is null: {}", artifact.coordinates);
            return licenses;
        }

        match self.extractor.extract(artifact) {
            Ok(found) => licenses.extend(found),
            Err(e) => warn!("Cannot read licenses of {}: {}", artifact.coordinates, e),
        }
        licenses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::manifest::MANIFEST_PATH;
    use crate::models::LicenseSource;
    use crate::notice::NoticePolicy;
    use crate::test_support::{manifest_with_licenses, write_jar, FakeLookup};
    use tempfile::tempdir;

    fn dependency() -> Coordinates {
        Coordinates::new("org.example", "bundle", "1.0")
    }

    #[test]
    fn test_baseline_wins() {
        let lookup = FakeLookup::new();
        let extractor = ArchiveExtractor::new(&lookup, NoticePolicy::EnumerateAll).unwrap();
        let mut artifacts = ArtifactMap::new();
        artifacts.insert(ArtifactRef::new(dependency(), Some("/does/not/exist.jar".into())));
        let hook = LicenseHook::new(&artifacts, &extractor);

        let licenses = hook.collect(&dependency(), |d| {
            vec![LicenseRecord::with_url(&d.artifact_id, "http://mit", LicenseSource::Host)]
        });
        assert_eq!(licenses.len(), 1);
        assert_eq!(licenses[0].source, LicenseSource::Host);
    }

    #[test]
    fn test_empty_baseline_uses_archive_of_resolved_version() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("bundle-2.0.jar");
        let manifest = manifest_with_licenses("http://a/1, http://b/2");
        write_jar(&jar, &[(MANIFEST_PATH, manifest.as_str())]);

        let lookup = FakeLookup::new();
        let extractor = ArchiveExtractor::new(&lookup, NoticePolicy::EnumerateAll).unwrap();
        let mut artifacts = ArtifactMap::new();
        artifacts.insert(ArtifactRef::new(
            Coordinates::new("org.example", "bundle", "2.0"),
            Some(jar),
        ));
        let hook = LicenseHook::new(&artifacts, &extractor);

        let licenses = hook.collect(&dependency(), |_| Vec::new());
        assert_eq!(licenses.len(), 2);
        assert!(licenses.iter().all(|l| l.source == LicenseSource::Manifest));
    }

    #[test]
    fn test_versioned_map_keeps_bundle_versions_apart() {
        let dir = tempdir().unwrap();
        let old = Coordinates::new("com.foo", "com.foo", "1.0");
        let new = Coordinates::new("com.foo", "com.foo", "2.0");
        let old_jar = dir.path().join("com.foo_1.0.jar");
        let new_jar = dir.path().join("com.foo_2.0.jar");
        write_jar(&old_jar, &[(MANIFEST_PATH, manifest_with_licenses("http://old").as_str())]);
        write_jar(&new_jar, &[(MANIFEST_PATH, manifest_with_licenses("http://new").as_str())]);

        let lookup = FakeLookup::new();
        let extractor = ArchiveExtractor::new(&lookup, NoticePolicy::EnumerateAll).unwrap();
        let mut artifacts = ArtifactMap::versioned();
        artifacts.insert(ArtifactRef::new(old.clone(), Some(old_jar)));
        artifacts.insert(ArtifactRef::new(new.clone(), Some(new_jar)));
        let hook = LicenseHook::new(&artifacts, &extractor);

        let licenses = hook.collect(&old, |_| Vec::new());
        assert_eq!(licenses.len(), 1);
        assert_eq!(licenses[0].location_string(), "http://old");
        let licenses = hook.collect(&new, |_| Vec::new());
        assert_eq!(licenses[0].location_string(), "http://new");

        assert!(artifacts
            .get(&Coordinates::new("com.foo", "com.foo", "3.0"))
            .is_none());
    }

    #[test]
    fn test_unresolved_artifacts_leave_list_empty() {
        let lookup = FakeLookup::new();
        let extractor = ArchiveExtractor::new(&lookup, NoticePolicy::EnumerateAll).unwrap();
        let mut artifacts = ArtifactMap::new();
        artifacts.insert(ArtifactRef::new(Coordinates::new("org.example", "nofile", "1"), None));
        let hook = LicenseHook::new(&artifacts, &extractor);

        assert!(hook.collect(&dependency(), |_| Vec::new()).is_empty());
        assert!(hook
            .collect(&Coordinates::new("org.example", "nofile", "1"), |_| Vec::new())
            .is_empty());
    }

    #[test]
    fn test_broken_archive_is_not_fatal() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("broken.jar");
        std::fs::write(&jar, "garbage").unwrap();

        let lookup = FakeLookup::new();
        let extractor = ArchiveExtractor::new(&lookup, NoticePolicy::EnumerateAll).unwrap();
        let mut artifacts = ArtifactMap::new();
        artifacts.insert(ArtifactRef::new(dependency(), Some(jar)));
        let hook = LicenseHook::new(&artifacts, &extractor);

        assert!(hook.collect(&dependency(), |_| Vec::new()).is_empty());
    }
}
