use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, warn};

use crate::archive::{self, locator, Jar};
use crate::models::{DependencyLicenses, Location};

/// Copy every archive-located license file to
/// `<target>/<artifact_id>/<entry>` and rewrite its location to `file:<entry>`.
///
/// A file that cannot be copied is logged and its record is left pointing
/// into the archive.
pub fn copy_license_files(dependencies: &mut [DependencyLicenses], target: &Path) -> Result<usize> {
    std::fs::create_dir_all(target)
        .with_context(|| format!("cannot create {}", target.display()))?;

    let mut copied = 0;
    for dependency in dependencies.iter_mut() {
        let base = target.join(&dependency.coordinates.artifact_id);
        let mut open: HashMap<PathBuf, Jar> = HashMap::new();

        for license in dependency.licenses.iter_mut() {
            let Some(Location::Archive(entry)) = &license.location else {
                continue;
            };

            let jar = match open.entry(entry.archive.clone()) {
                std::collections::hash_map::Entry::Occupied(slot) => slot.into_mut(),
                std::collections::hash_map::Entry::Vacant(slot) => match archive::open(&entry.archive) {
                    Ok(jar) => slot.insert(jar),
                    Err(e) => {
                        warn!("Cannot copy {}: {}", entry, e);
                        continue;
                    }
                },
            };

            match copy_entry(jar, &entry.entry, &base) {
                Ok(written) => {
                    debug!("Copied {} to {}", entry, written.display());
                    license.file_name = Some(written);
                    locator::normalize(license);
                    copied += 1;
                }
                Err(e) => warn!("Cannot copy {}: {:#}", entry, e),
            }
        }
    }

    Ok(copied)
}

/// Rewrite archive locations without copying anything.
pub fn localize_locations(dependencies: &mut [DependencyLicenses]) {
    for license in dependencies.iter_mut().flat_map(|d| d.licenses.iter_mut()) {
        locator::normalize(license);
    }
}

fn copy_entry(jar: &mut Jar, entry: &str, base: &Path) -> Result<PathBuf> {
    let relative = safe_relative(entry)?;
    let Some(bytes) = archive::read_entry(jar, entry)? else {
        bail!("no entry {}", entry);
    };

    let target = base.join(relative);
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&target, bytes)?;
    Ok(target)
}

/// Entry paths must stay inside the target directory.
fn safe_relative(entry: &str) -> Result<PathBuf> {
    let path = Path::new(entry);
    if path
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        bail!("refusing to write entry outside target: {}", entry);
    }
    Ok(path.to_path_buf())
}
