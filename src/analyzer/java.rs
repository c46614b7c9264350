use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use log::warn;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use crate::models::Coordinates;

/// Direct dependencies of a Maven or Gradle project.
///
/// Parses `pom.xml` and `gradle.lockfile`. Dependencies are deduplicated by
/// `group:artifact:version` key; the lockfile pins the versions actually on
/// the classpath.
pub struct JavaAnalyzer;

impl JavaAnalyzer {
    /// Create a new `JavaAnalyzer`.
    pub fn new() -> Self {
        Self
    }
}

impl super::Analyzer for JavaAnalyzer {
    fn analyze(&self, path: &Path) -> Result<Vec<Coordinates>> {
        let mut deps: Vec<Coordinates> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        let mut push_all = |parsed: Vec<Coordinates>| {
            for d in parsed {
                if seen.insert(d.to_string()) {
                    deps.push(d);
                }
            }
        };

        // Parse pom.xml
        let pom = path.join("pom.xml");
        if pom.exists() {
            match parse_pom_xml(&pom) {
                Ok(parsed) => push_all(parsed),
                Err(e) => warn!("Cannot parse {}: {}", pom.display(), e),
            }
        }

        // Parse gradle.lockfile if present
        let lockfile = path.join("gradle.lockfile");
        if lockfile.exists() {
            match parse_gradle_lockfile(&lockfile) {
                Ok(parsed) => push_all(parsed),
                Err(e) => warn!("Cannot parse {}: {}", lockfile.display(), e),
            }
        }

        Ok(deps)
    }
}

/// Parse the `<dependencies>` of a `pom.xml` using quick-xml event API.
///
/// Entries under `<dependencyManagement>` are version constraints, not
/// dependencies, and are skipped.
fn parse_pom_xml(path: &Path) -> Result<Vec<Coordinates>> {
    let content = std::fs::read_to_string(path)?;
    let mut reader = Reader::from_str(&content);
    reader.config_mut().trim_text(true);

    let mut deps = Vec::new();
    let mut buf = Vec::new();

    let mut in_management = false;
    let mut in_dependencies = false;
    let mut depth: u32 = 0;
    let mut dependencies_depth: u32 = 0;

    let mut in_dependency = false;
    let mut current_tag = String::new();
    let mut group_id = String::new();
    let mut artifact_id = String::new();
    let mut version = String::new();
    let mut scope = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                depth += 1;
                let name =
                    String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                current_tag = name.clone();

                match name.as_str() {
                    "dependencyManagement" => in_management = true,
                    "dependencies" if !in_dependency && !in_management => {
                        in_dependencies = true;
                        dependencies_depth = depth;
                    }
                    "dependency" if in_dependencies => {
                        in_dependency = true;
                        group_id.clear();
                        artifact_id.clear();
                        version.clear();
                        scope.clear();
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => {
                let name =
                    String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();

                if name == "dependency" && in_dependency {
                    if !artifact_id.is_empty() && scope != "import" {
                        deps.push(Coordinates::new(&group_id, &artifact_id, &version));
                    }
                    in_dependency = false;
                } else if name == "dependencies" && depth == dependencies_depth {
                    in_dependencies = false;
                } else if name == "dependencyManagement" {
                    in_management = false;
                }

                depth = depth.saturating_sub(1);
                current_tag.clear();
            }
            Event::Text(ref e) => {
                if in_dependency {
                    let text = e.unescape().unwrap_or_default();
                    match current_tag.as_str() {
                        "groupId" => group_id = text.to_string(),
                        "artifactId" => artifact_id = text.to_string(),
                        "version" => version = text.to_string(),
                        "scope" => scope = text.to_string(),
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(deps)
}

/// Parse `gradle.lockfile` — format: `group:artifact:version=configurations`
fn parse_gradle_lockfile(path: &Path) -> Result<Vec<Coordinates>> {
    let content = std::fs::read_to_string(path)?;
    let re = Regex::new(r"^([^:]+):([^:]+):([^=\s]+)")?;
    let mut deps = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("empty=") {
            continue;
        }
        if let Some(caps) = re.captures(line) {
            deps.push(Coordinates::new(&caps[1], &caps[2], &caps[3]));
        }
    }

    Ok(deps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_parse_pom_xml() {
        let xml = r#"<?xml version="1.0"?>
<project>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.eclipse.platform</groupId>
        <artifactId>platform-bom</artifactId>
        <version>4.30</version>
        <scope>import</scope>
      </dependency>
    </dependencies>
  </dependencyManagement>
  <dependencies>
    <dependency>
      <groupId>org.eclipse.platform</groupId>
      <artifactId>org.eclipse.osgi</artifactId>
      <version>3.18.0</version>
    </dependency>
    <dependency>
      <groupId>javax.mail</groupId>
      <artifactId>mail</artifactId>
      <version>1.4.0</version>
    </dependency>
  </dependencies>
</project>"#;

        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{}", xml).unwrap();
        let deps = parse_pom_xml(f.path()).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(
            deps[0],
            Coordinates::new("org.eclipse.platform", "org.eclipse.osgi", "3.18.0")
        );
        assert_eq!(deps[1].key(), "javax.mail:mail");
    }

    #[test]
    fn test_parse_gradle_lockfile() {
        let content = "# This is a Gradle generated file for dependency locking.\n\
                       com.ibm.icu:icu4j:54.1.1=compileClasspath,runtimeClasspath\n\
                       org.easymock:easymock:2.4=testCompileClasspath\n\
                       empty=annotationProcessor\n";
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{}", content).unwrap();
        let deps = parse_gradle_lockfile(f.path()).unwrap();
        assert_eq!(
            deps,
            vec![
                Coordinates::new("com.ibm.icu", "icu4j", "54.1.1"),
                Coordinates::new("org.easymock", "easymock", "2.4"),
            ]
        );
    }

    #[test]
    fn test_analyze_deduplicates() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("pom.xml"),
            "<project><dependencies><dependency><groupId>a</groupId><artifactId>b</artifactId><version>1</version></dependency></dependencies></project>",
        )
        .unwrap();
        std::fs::write(dir.path().join("gradle.lockfile"), "a:b:1=runtimeClasspath\na:c:2=runtimeClasspath\n").unwrap();

        let deps = JavaAnalyzer::new().analyze(dir.path()).unwrap();
        assert_eq!(deps.len(), 2);
    }
}
