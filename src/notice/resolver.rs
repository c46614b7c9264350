use std::fmt;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::archive::{self, ArchiveEntryLocator, Jar};
use crate::error::ExtractError;
use crate::models::{LicenseRecord, LicenseSource};
use crate::notice::scanner;

pub const ABOUT_HTML: &str = "about.html";
pub const ABOUT_FILES_DIR: &str = "about_files/";

/// How many records a legal notice turns into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticePolicy {
    /// The notice itself, then one record per referenced `about_files/` entry.
    #[default]
    EnumerateAll,
    /// One record: a stated license URL, else the first referenced file,
    /// else the notice itself.
    SingleBest,
}

impl fmt::Display for NoticePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticePolicy::EnumerateAll => write!(f, "enumerate-all"),
            NoticePolicy::SingleBest => write!(f, "single-best"),
        }
    }
}

pub struct NoticeResolver {
    policy: NoticePolicy,
}

impl NoticeResolver {
    pub fn new(policy: NoticePolicy) -> Self {
        NoticeResolver { policy }
    }

    /// Open `archive_path` and resolve its notice. The archive is closed
    /// before returning.
    pub fn resolve_file(
        &self,
        artifact_id: &str,
        archive_path: &Path,
    ) -> Result<Vec<LicenseRecord>, ExtractError> {
        let mut jar = archive::open(archive_path)?;
        self.resolve(artifact_id, archive_path, &mut jar)
    }

    /// Records for the notice in an already open archive. No `about.html`
    /// yields an empty list.
    pub fn resolve(
        &self,
        artifact_id: &str,
        archive_path: &Path,
        jar: &mut Jar,
    ) -> Result<Vec<LicenseRecord>, ExtractError> {
        let content = archive::read_entry_text(jar, ABOUT_HTML).map_err(|source| {
            ExtractError::Archive {
                path: archive_path.to_path_buf(),
                source,
            }
        })?;
        let Some(content) = content else {
            debug!("No {} in {}", ABOUT_HTML, archive_path.display());
            return Ok(Vec::new());
        };

        let embedded = |entry: &str| {
            LicenseRecord::embedded(
                artifact_id,
                ArchiveEntryLocator::new(archive_path, entry),
                LicenseSource::Notice,
            )
        };

        let licenses = match self.policy {
            NoticePolicy::EnumerateAll => std::iter::once(embedded(ABOUT_HTML))
                .chain(
                    scanner::find_license_filenames(&content)
                        .iter()
                        .map(|name| embedded(&format!("{}{}", ABOUT_FILES_DIR, name))),
                )
                .collect(),
            NoticePolicy::SingleBest => {
                let license = if let Some(url) = scanner::find_license_url(&content) {
                    LicenseRecord::with_url(artifact_id, &url, LicenseSource::Notice)
                } else if let Some(name) = scanner::find_license_filename(&content) {
                    embedded(&format!("{}{}", ABOUT_FILES_DIR, name))
                } else {
                    embedded(ABOUT_HTML)
                };
                vec![license]
            }
        };

        debug!(
            "Resolved {} license(s) from {} in {}",
            licenses.len(),
            ABOUT_HTML,
            archive_path.display()
        );
        Ok(licenses)
    }
}
