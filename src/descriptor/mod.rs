//! Maven package descriptors (`pom.xml`) and their parent chains.
//!
//! - [`PackageDescriptor`] — the license list and parent pointer of one POM.
//! - [`chain`] — walks parent descriptors until one declares licenses.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::models::Coordinates;

pub mod chain;

/// One `<license>` element of a POM.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorLicense {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Default)]
pub struct PackageDescriptor {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub parent: Option<Coordinates>,
    pub licenses: Vec<DescriptorLicense>,
}

impl PackageDescriptor {
    /// Parse a POM using the quick-xml event API.
    ///
    /// Only `project/licenses/license` and `project/parent` are read; anything
    /// else in the document is skipped. Malformed XML or a root element other
    /// than `<project>` is an error.
    pub fn parse(xml: &str) -> Result<Self, String> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut descriptor = PackageDescriptor::default();
        let mut path: Vec<String> = Vec::new();
        let mut saw_project = false;

        let mut license = DescriptorLicense::default();
        let mut parent_group = String::new();
        let mut parent_artifact = String::new();
        let mut parent_version = String::new();

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let tag = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                    if path.is_empty() {
                        if tag != "project" {
                            return Err(format!("unexpected root element <{}>", tag));
                        }
                        saw_project = true;
                    }
                    path.push(tag);

                    if path_str(&path) == "project/licenses/license" {
                        license = DescriptorLicense::default();
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    if path.is_empty() {
                        let tag = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                        if tag != "project" {
                            return Err(format!("unexpected root element <{}>", tag));
                        }
                        saw_project = true;
                    }
                }
                Ok(Event::End(_)) => {
                    match path_str(&path).as_str() {
                        "project/licenses/license" => {
                            descriptor.licenses.push(std::mem::take(&mut license));
                        }
                        "project/parent" => {
                            if !parent_artifact.is_empty() {
                                descriptor.parent = Some(Coordinates::new(
                                    &parent_group,
                                    &parent_artifact,
                                    &parent_version,
                                ));
                            }
                        }
                        _ => {}
                    }
                    path.pop();
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape().map_err(|err| err.to_string())?.into_owned();
                    apply_text(
                        &path_str(&path),
                        text,
                        &mut descriptor,
                        &mut license,
                        (&mut parent_group, &mut parent_artifact, &mut parent_version),
                    );
                }
                Ok(Event::CData(ref e)) => {
                    let text = String::from_utf8_lossy(e).trim().to_string();
                    apply_text(
                        &path_str(&path),
                        text,
                        &mut descriptor,
                        &mut license,
                        (&mut parent_group, &mut parent_artifact, &mut parent_version),
                    );
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(format!(
                        "malformed XML at byte {}: {}",
                        reader.buffer_position(),
                        e
                    ))
                }
                _ => {}
            }
            buf.clear();
        }

        if !saw_project {
            return Err("no <project> element".to_string());
        }
        if let Some(open) = path.last() {
            return Err(format!("unexpected end of document inside <{}>", open));
        }

        Ok(descriptor)
    }

    /// Own coordinates, inheriting group and version from the parent.
    pub fn coordinates(&self) -> Option<Coordinates> {
        let artifact_id = self.artifact_id.as_deref()?;
        let group_id = self
            .group_id
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.group_id.as_str()))?;
        let version = self
            .version
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.version.as_str()))?;
        Some(Coordinates::new(group_id, artifact_id, version))
    }
}

fn path_str(path: &[String]) -> String {
    path.join("/")
}

fn apply_text(
    path: &str,
    text: String,
    descriptor: &mut PackageDescriptor,
    license: &mut DescriptorLicense,
    parent: (&mut String, &mut String, &mut String),
) {
    match path {
        "project/groupId" => descriptor.group_id = Some(text),
        "project/artifactId" => descriptor.artifact_id = Some(text),
        "project/version" => descriptor.version = Some(text),
        "project/licenses/license/name" => license.name = Some(text),
        "project/licenses/license/url" => license.url = Some(text),
        "project/parent/groupId" => *parent.0 = text,
        "project/parent/artifactId" => *parent.1 = text,
        "project/parent/version" => *parent.2 = text,
        _ => {}
    }
}
