use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::error::LookupError;
use crate::lookup::DescriptorLookup;
use crate::models::Coordinates;

pub const MAVEN_CENTRAL: &str = "https://repo1.maven.org/maven2";

/// A Maven-layout local repository, optionally backed by remote repositories.
///
/// POMs fetched from a remote are written into the local repository, the same
/// way Maven caches them, so the lookup always answers with a local path.
pub struct MavenRepository {
    local: PathBuf,
    remotes: Vec<String>,
    client: Option<Client>,
}

impl MavenRepository {
    /// Local-only repository; unknown coordinates are reported as not found.
    pub fn offline(local: &Path) -> Self {
        MavenRepository {
            local: local.to_path_buf(),
            remotes: Vec::new(),
            client: None,
        }
    }

    pub fn online(local: &Path, remotes: Vec<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("osgi-licenses/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(MavenRepository {
            local: local.to_path_buf(),
            remotes,
            client: Some(client),
        })
    }

    pub fn local_root(&self) -> &Path {
        &self.local
    }

    /// `<root>/<group path>/<artifact>/<version>/<artifact>-<version>.<extension>`
    pub fn artifact_path(&self, coordinates: &Coordinates, extension: &str) -> PathBuf {
        self.local.join(relative_path(coordinates, extension))
    }

    fn fetch(&self, client: &Client, coordinates: &Coordinates) -> Result<PathBuf, LookupError> {
        let relative = relative_path(coordinates, "pom");
        let relative = relative.to_string_lossy().replace('\\', "/");

        for remote in &self.remotes {
            let url = format!("{}/{}", remote.trim_end_matches('/'), relative);
            debug!("Fetching {}", url);

            let response = client
                .get(&url)
                .send()
                .map_err(|e| resolution_error(coordinates, &e))?;

            if response.status() == StatusCode::NOT_FOUND {
                continue;
            }
            if !response.status().is_success() {
                return Err(LookupError::Resolution {
                    coordinates: coordinates.clone(),
                    message: format!("{} returned {}", url, response.status()),
                });
            }

            let body = response
                .text()
                .map_err(|e| resolution_error(coordinates, &e))?;
            let target = self.artifact_path(coordinates, "pom");
            if let Some(dir) = target.parent() {
                std::fs::create_dir_all(dir).map_err(|e| resolution_error(coordinates, &e))?;
            }
            std::fs::write(&target, body).map_err(|e| resolution_error(coordinates, &e))?;
            return Ok(target);
        }

        Err(LookupError::NotFound(coordinates.clone()))
    }
}

impl DescriptorLookup for MavenRepository {
    fn lookup(&self, coordinates: &Coordinates) -> Result<PathBuf, LookupError> {
        if coordinates.group_id.is_empty() || coordinates.version.is_empty() {
            return Err(LookupError::NotFound(coordinates.clone()));
        }

        let local = self.artifact_path(coordinates, "pom");
        if local.is_file() {
            return Ok(local);
        }

        match &self.client {
            Some(client) => self.fetch(client, coordinates),
            None => Err(LookupError::NotFound(coordinates.clone())),
        }
    }
}

fn relative_path(coordinates: &Coordinates, extension: &str) -> PathBuf {
    let mut path: PathBuf = coordinates.group_id.split('.').collect();
    path.push(&coordinates.artifact_id);
    path.push(&coordinates.version);
    path.push(format!(
        "{}-{}.{}",
        coordinates.artifact_id, coordinates.version, extension
    ));
    path
}

fn resolution_error(coordinates: &Coordinates, error: &dyn std::fmt::Display) -> LookupError {
    LookupError::Resolution {
        coordinates: coordinates.clone(),
        message: error.to_string(),
    }
}
