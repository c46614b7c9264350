use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::archive::ArchiveEntryLocator;

/// Maven coordinates of a single artifact version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Coordinates {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Coordinates {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Coordinates {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
        }
    }

    /// `group:artifact`, the version-less key used by the artifact map.
    pub fn key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A dependency artifact together with its resolved local file, if any.
#[derive(Debug, Clone)]
pub struct ArtifactRef {
    pub coordinates: Coordinates,
    pub file: Option<PathBuf>,
}

impl ArtifactRef {
    pub fn new(coordinates: Coordinates, file: Option<PathBuf>) -> Self {
        ArtifactRef { coordinates, file }
    }

    pub fn artifact_id(&self) -> &str {
        &self.coordinates.artifact_id
    }
}

/// Where a license text can be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Any location we do not interpret, kept verbatim (usually an http URL).
    Url(String),
    /// An entry inside a local archive.
    Archive(ArchiveEntryLocator),
    /// A plain file path, rendered as `file:<path>`.
    LocalFile(String),
}

impl Location {
    pub fn is_embedded(&self) -> bool {
        matches!(self, Location::Archive(_))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Url(url) => write!(f, "{}", url),
            Location::Archive(locator) => write!(f, "{}", locator),
            Location::LocalFile(path) => write!(f, "file:{}", path),
        }
    }
}

impl FromStr for Location {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(locator) = s.parse::<ArchiveEntryLocator>() {
            return Ok(Location::Archive(locator));
        }
        match s.strip_prefix("file:") {
            Some(path) if !path.is_empty() => Ok(Location::LocalFile(path.to_string())),
            _ => Ok(Location::Url(s.to_string())),
        }
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for Location {
    fn from(s: &str) -> Self {
        match s.parse::<Location>() {
            Ok(location) => location,
            Err(never) => match never {},
        }
    }
}

/// Which strategy produced a license record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseSource {
    /// The dependency's own declared metadata.
    Host,
    /// `Bundle-License` manifest header.
    Manifest,
    /// Embedded `pom.xml` or one of its parents.
    Descriptor,
    /// `about.html` legal notice.
    Notice,
}

impl fmt::Display for LicenseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseSource::Host => write!(f, "pom"),
            LicenseSource::Manifest => write!(f, "manifest"),
            LicenseSource::Descriptor => write!(f, "embedded pom"),
            LicenseSource::Notice => write!(f, "about.html"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseRecord {
    pub name: String,
    pub location: Option<Location>,
    pub source: LicenseSource,
    /// Set once the license file has been copied out of its archive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<PathBuf>,
}

impl LicenseRecord {
    pub fn new(name: &str, location: Option<Location>, source: LicenseSource) -> Self {
        LicenseRecord {
            name: name.to_string(),
            location,
            source,
            file_name: None,
        }
    }

    /// A record for a location given as text; archive locators and `file:`
    /// paths are recognised.
    pub fn with_url(name: &str, url: &str, source: LicenseSource) -> Self {
        Self::new(name, Some(Location::from(url)), source)
    }

    pub fn embedded(name: &str, locator: ArchiveEntryLocator, source: LicenseSource) -> Self {
        Self::new(name, Some(Location::Archive(locator)), source)
    }

    /// The location in its string form, empty when none was declared.
    pub fn location_string(&self) -> String {
        self.location
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

/// A scanned dependency and everything found for it.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyLicenses {
    pub coordinates: Coordinates,
    pub licenses: Vec<LicenseRecord>,
}

impl DependencyLicenses {
    pub fn is_unlicensed(&self) -> bool {
        self.licenses.is_empty()
    }

    /// The strategy that produced the records, if any were found.
    pub fn source(&self) -> Option<LicenseSource> {
        self.licenses.first().map(|l| l.source)
    }
}
