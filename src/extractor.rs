use std::path::Path;

use log::{debug, warn};
use regex::Regex;

use crate::archive::manifest::{Manifest, MANIFEST_PATH};
use crate::archive::{self, Jar};
use crate::descriptor::chain::resolve_licenses;
use crate::descriptor::PackageDescriptor;
use crate::error::{ChainError, ExtractError, LookupError};
use crate::lookup::DescriptorLookup;
use crate::models::{ArtifactRef, LicenseRecord, LicenseSource, Location};
use crate::notice::{NoticePolicy, NoticeResolver};

const EMBEDDED_POM_PATTERN: &str = r"^META-INF/maven/.*/pom\.xml$";

/// Recovers licenses from a bundle's own contents.
///
/// Strategies run in order and the first one yielding anything wins:
/// 1. `Bundle-License` manifest header
/// 2. embedded `META-INF/maven/**/pom.xml`, following parents
/// 3. `about.html` legal notice
pub struct ArchiveExtractor<'a> {
    lookup: &'a dyn DescriptorLookup,
    notices: NoticeResolver,
    embedded_pom: Regex,
}

impl<'a> ArchiveExtractor<'a> {
    pub fn new(lookup: &'a dyn DescriptorLookup, policy: NoticePolicy) -> anyhow::Result<Self> {
        Ok(ArchiveExtractor {
            lookup,
            notices: NoticeResolver::new(policy),
            embedded_pom: Regex::new(EMBEDDED_POM_PATTERN)?,
        })
    }

    /// Extract licenses from `artifact`'s archive.
    ///
    /// Missing entries are not errors; only an archive that cannot be opened
    /// or read fails.
    pub fn extract(&self, artifact: &ArtifactRef) -> Result<Vec<LicenseRecord>, ExtractError> {
        let Some(path) = artifact.file.as_deref() else {
            warn!("Artifact file is not resolved: {}", artifact.coordinates);
            return Ok(Vec::new());
        };

        {
            let mut jar = archive::open(path)?;

            let licenses = self.from_manifest(artifact, path, &mut jar)?;
            if !licenses.is_empty() {
                return Ok(licenses);
            }

            let licenses = self.from_embedded_poms(artifact, path, &mut jar)?;
            if !licenses.is_empty() {
                return Ok(licenses);
            }
        }

        self.notices.resolve_file(artifact.artifact_id(), path)
    }

    fn from_manifest(
        &self,
        artifact: &ArtifactRef,
        path: &Path,
        jar: &mut Jar,
    ) -> Result<Vec<LicenseRecord>, ExtractError> {
        let content = archive::read_entry_text(jar, MANIFEST_PATH).map_err(|source| {
            ExtractError::Archive {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let Some(content) = content else {
            debug!("Artifact does not have a manifest: {}", artifact.coordinates);
            return Ok(Vec::new());
        };

        let urls = Manifest::parse(&content).bundle_licenses();
        if !urls.is_empty() {
            debug!("Found license urls in manifest header: {}", urls.join(", "));
        }

        Ok(urls
            .iter()
            .map(|url| LicenseRecord::with_url(artifact.artifact_id(), url, LicenseSource::Manifest))
            .collect())
    }

    fn from_embedded_poms(
        &self,
        artifact: &ArtifactRef,
        path: &Path,
        jar: &mut Jar,
    ) -> Result<Vec<LicenseRecord>, ExtractError> {
        let poms: Vec<String> = archive::entry_names(jar)
            .into_iter()
            .filter(|name| self.embedded_pom.is_match(name))
            .collect();

        let mut licenses = Vec::new();
        for entry in poms {
            debug!("Found embedded pom: {}", entry);
            let content = archive::read_entry_text(jar, &entry).map_err(|source| {
                ExtractError::Archive {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            let Some(content) = content else { continue };

            let found = PackageDescriptor::parse(&content)
                .map_err(|message| ChainError::Parse {
                    origin: entry.clone(),
                    message,
                })
                .and_then(|descriptor| resolve_licenses(descriptor, self.lookup));

            match found {
                Ok(found) => licenses.extend(found.into_iter().map(|l| {
                    LicenseRecord::new(
                        l.name.as_deref().unwrap_or(artifact.artifact_id()),
                        l.url.as_deref().map(Location::from),
                        LicenseSource::Descriptor,
                    )
                })),
                Err(ChainError::Lookup(LookupError::NotFound(coordinates))) => {
                    debug!(
                        "Parent descriptor {} of {} ({}) not found",
                        coordinates, artifact.coordinates, entry
                    );
                }
                Err(e) => {
                    warn!(
                        "Cannot resolve licenses of {} from {}: {}",
                        artifact.coordinates, entry, e
                    );
                }
            }
        }

        Ok(licenses)
    }
}
