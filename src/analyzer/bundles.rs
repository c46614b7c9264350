use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::archive::manifest::{Manifest, MANIFEST_PATH};
use crate::archive::{self, Jar};
use crate::models::{ArtifactRef, Coordinates};

/// Loose bundles: a single `.jar` or a directory of them, such as an
/// Eclipse `plugins/` folder.
///
/// Coordinates come from an embedded `pom.properties`, else from the OSGi
/// `Bundle-SymbolicName`/`Bundle-Version` headers, else from the file name.
pub fn scan(path: &Path) -> Result<Vec<ArtifactRef>> {
    let jars = if path.is_dir() {
        let mut jars: Vec<PathBuf> = std::fs::read_dir(path)
            .with_context(|| format!("cannot list {}", path.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_jar(p))
            .collect();
        jars.sort();
        jars
    } else {
        vec![path.to_path_buf()]
    };

    Ok(jars
        .into_iter()
        .map(|jar| {
            let coordinates = identify(&jar);
            debug!("{} identified as {}", jar.display(), coordinates);
            ArtifactRef::new(coordinates, Some(jar))
        })
        .collect())
}

pub fn is_jar(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"))
}

fn identify(path: &Path) -> Coordinates {
    let from_file_name = || {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Coordinates::new("", &stem, "")
    };

    let mut jar = match archive::open(path) {
        Ok(jar) => jar,
        Err(e) => {
            warn!("{}", e);
            return from_file_name();
        }
    };

    pom_properties(&mut jar)
        .or_else(|| bundle_headers(&mut jar))
        .unwrap_or_else(from_file_name)
}

fn pom_properties(jar: &mut Jar) -> Option<Coordinates> {
    let entry = archive::entry_names(jar).into_iter().find(|name| {
        name.starts_with("META-INF/maven/") && name.ends_with("/pom.properties")
    })?;
    let content = archive::read_entry_text(jar, &entry).ok()??;

    let property = |key: &str| {
        content.lines().find_map(|line| {
            let (k, v) = line.split_once('=')?;
            (k.trim() == key).then(|| v.trim().to_string())
        })
    };

    Some(Coordinates::new(
        &property("groupId")?,
        &property("artifactId")?,
        &property("version").unwrap_or_default(),
    ))
}

fn bundle_headers(jar: &mut Jar) -> Option<Coordinates> {
    let content = archive::read_entry_text(jar, MANIFEST_PATH).ok()??;
    let manifest = Manifest::parse(&content);

    // "org.example.bundle;singleton:=true" -> "org.example.bundle"
    let symbolic_name = manifest.get("Bundle-SymbolicName")?;
    let name = symbolic_name.split(';').next().unwrap_or(symbolic_name).trim();
    let version = manifest.get("Bundle-Version").unwrap_or_default();

    Some(Coordinates::new("", name, version))
}
