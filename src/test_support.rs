//! Fixture builders shared by unit tests.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::LookupError;
use crate::lookup::DescriptorLookup;
use crate::models::Coordinates;

/// Write a JAR with the given `(entry, content)` pairs, in order.
pub fn write_jar(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }

    zip.finish().unwrap();
}

pub fn manifest_with_licenses(value: &str) -> String {
    format!(
        "Manifest-Version: 1.0\r\nBundle-SymbolicName: org.example.bundle\r\nBundle-License: {}\r\n\r\n",
        value
    )
}

/// Minimal POM with optional parent and `(name, url)` licenses.
pub fn pom(coordinates: &Coordinates, parent: Option<&Coordinates>, licenses: &[(&str, &str)]) -> String {
    let parent = parent
        .map(|p| {
            format!(
                "  <parent>\n    <groupId>{}</groupId>\n    <artifactId>{}</artifactId>\n    <version>{}</version>\n  </parent>\n",
                p.group_id, p.artifact_id, p.version
            )
        })
        .unwrap_or_default();
    let licenses = if licenses.is_empty() {
        String::new()
    } else {
        let items: String = licenses
            .iter()
            .map(|(name, url)| {
                format!(
                    "    <license>\n      <name>{}</name>\n      <url>{}</url>\n    </license>\n",
                    name, url
                )
            })
            .collect();
        format!("  <licenses>\n{}  </licenses>\n", items)
    };
    format!(
        "<?xml version=\"1.0\"?>\n<project xmlns=\"http://maven.apache.org/POM/4.0.0\">\n{}  <groupId>{}</groupId>\n  <artifactId>{}</artifactId>\n  <version>{}</version>\n{}</project>\n",
        parent, coordinates.group_id, coordinates.artifact_id, coordinates.version, licenses
    )
}

/// In-memory repository of POM files keyed by coordinates.
pub struct FakeLookup {
    dir: tempfile::TempDir,
    poms: HashMap<Coordinates, PathBuf>,
    failing: Vec<Coordinates>,
    pub calls: std::cell::RefCell<Vec<Coordinates>>,
}

impl FakeLookup {
    pub fn new() -> Self {
        FakeLookup {
            dir: tempfile::tempdir().unwrap(),
            poms: HashMap::new(),
            failing: Vec::new(),
            calls: std::cell::RefCell::new(Vec::new()),
        }
    }

    pub fn with_pom(mut self, coordinates: &Coordinates, content: &str) -> Self {
        let path = self
            .dir
            .path()
            .join(format!("{}-{}.pom", coordinates.artifact_id, coordinates.version));
        std::fs::write(&path, content).unwrap();
        self.poms.insert(coordinates.clone(), path);
        self
    }

    pub fn with_failure(mut self, coordinates: &Coordinates) -> Self {
        self.failing.push(coordinates.clone());
        self
    }
}

impl DescriptorLookup for FakeLookup {
    fn lookup(&self, coordinates: &Coordinates) -> Result<PathBuf, LookupError> {
        self.calls.borrow_mut().push(coordinates.clone());
        if self.failing.contains(coordinates) {
            return Err(LookupError::Resolution {
                coordinates: coordinates.clone(),
                message: "connection refused".to_string(),
            });
        }
        self.poms
            .get(coordinates)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(coordinates.clone()))
    }
}
