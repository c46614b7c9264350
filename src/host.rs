//! Stand-ins for the build host: the artifact map and the licenses a
//! dependency declares in its own POM.

use log::{debug, warn};

use crate::descriptor::PackageDescriptor;
use crate::hook::ArtifactMap;
use crate::lookup::maven::MavenRepository;
use crate::models::{ArtifactRef, Coordinates, LicenseRecord, LicenseSource, Location};

/// Map each dependency to its JAR in the local repository. Dependencies
/// whose JAR is absent are still mapped, without a file.
pub fn artifact_map(dependencies: &[Coordinates], repository: &MavenRepository) -> ArtifactMap {
    let mut map = ArtifactMap::new();
    for dependency in dependencies {
        let jar = repository.artifact_path(dependency, "jar");
        let file = if jar.is_file() {
            Some(jar)
        } else {
            debug!("{} is not in {}", dependency, repository.local_root().display());
            None
        };
        map.insert(ArtifactRef::new(dependency.clone(), file));
    }
    map
}

/// Licenses declared directly in the dependency's POM, without parents.
pub fn declared_licenses(repository: &MavenRepository, dependency: &Coordinates) -> Vec<LicenseRecord> {
    let pom = repository.artifact_path(dependency, "pom");
    let content = match std::fs::read_to_string(&pom) {
        Ok(content) => content,
        Err(e) => {
            debug!("No POM for {}: {}", dependency, e);
            return Vec::new();
        }
    };

    match PackageDescriptor::parse(&content) {
        Ok(descriptor) => descriptor
            .licenses
            .into_iter()
            .map(|l| {
                LicenseRecord::new(
                    l.name.as_deref().unwrap_or(&dependency.artifact_id),
                    l.url.as_deref().map(Location::from),
                    LicenseSource::Host,
                )
            })
            .collect(),
        Err(e) => {
            warn!("Cannot parse {}: {}", pom.display(), e);
            Vec::new()
        }
    }
}
