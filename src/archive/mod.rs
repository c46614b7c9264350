//! Read-only access to JAR archives and the `jar:file:` locator format.
//!
//! - [`manifest`] — `META-INF/MANIFEST.MF` main-section parsing.
//! - [`locator`] — rewriting archive locators into plain `file:` paths.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::ExtractError;

pub mod locator;
pub mod manifest;

const JAR_FILE_PREFIX: &str = "jar:file:";
const ENTRY_MARKER: &str = "!/";

/// Upper bound on buffer space reserved from an entry's declared size.
const MAX_PREALLOC: u64 = 64 * 1024;
/// Entries larger than this are not read at all.
const MAX_ENTRY_SIZE: u64 = 16 * 1024 * 1024;

pub type Jar = ZipArchive<File>;

/// One entry inside one archive file.
///
/// Rendered as `jar:file:<absolute-archive-path>!/<entry>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntryLocator {
    pub archive: PathBuf,
    pub entry: String,
}

impl ArchiveEntryLocator {
    pub fn new(archive: &Path, entry: &str) -> Self {
        let archive = archive
            .canonicalize()
            .unwrap_or_else(|_| archive.to_path_buf());
        ArchiveEntryLocator {
            archive,
            entry: entry.trim_start_matches('/').to_string(),
        }
    }
}

impl fmt::Display for ArchiveEntryLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.archive.to_string_lossy().replace('\\', "/");
        let slash = if path.starts_with('/') { "" } else { "/" };
        write!(
            f,
            "{}{}{}{}{}",
            JAR_FILE_PREFIX, slash, path, ENTRY_MARKER, self.entry
        )
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct NotALocator;

impl FromStr for ArchiveEntryLocator {
    type Err = NotALocator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix(JAR_FILE_PREFIX).ok_or(NotALocator)?;
        let (archive, entry) = rest.split_once(ENTRY_MARKER).ok_or(NotALocator)?;
        if archive.is_empty() {
            return Err(NotALocator);
        }
        Ok(ArchiveEntryLocator {
            archive: PathBuf::from(archive),
            entry: entry.to_string(),
        })
    }
}

/// Open an archive read-only. The handle closes when the returned value drops.
pub fn open(path: &Path) -> Result<Jar, ExtractError> {
    let file = File::open(path).map_err(|source| ExtractError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    ZipArchive::new(file).map_err(|source| ExtractError::Archive {
        path: path.to_path_buf(),
        source,
    })
}

/// Read an entry's bytes; `Ok(None)` when the archive has no such entry.
pub fn read_entry(archive: &mut Jar, name: &str) -> Result<Option<Vec<u8>>, ZipError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e),
    };
    let declared = entry.size();
    let bytes = read_capped(&mut entry, declared, MAX_ENTRY_SIZE)?;
    Ok(Some(bytes))
}

/// Read at most `limit` bytes. The declared size comes from the archive
/// header and only sizes the initial buffer.
fn read_capped<R: Read>(reader: R, declared: u64, limit: u64) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(declared.min(MAX_PREALLOC).min(limit) as usize);
    reader.take(limit + 1).read_to_end(&mut bytes)?;
    if bytes.len() as u64 > limit {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("entry exceeds {} bytes", limit),
        ));
    }
    Ok(bytes)
}

/// Read an entry decoded as UTF-8, replacing invalid sequences.
pub fn read_entry_text(archive: &mut Jar, name: &str) -> Result<Option<String>, ZipError> {
    Ok(read_entry(archive, name)?.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
}

/// Entry names in archive order.
pub fn entry_names(archive: &Jar) -> Vec<String> {
    (0..archive.len())
        .filter_map(|i| archive.name_for_index(i).map(str::to_string))
        .collect()
}
