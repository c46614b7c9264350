use std::path::Path;

use crate::analyzer::bundles::is_jar;

/// What kind of input the user pointed us at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A Maven or Gradle project whose dependencies live in a local repository.
    Project,
    /// A single bundle or a directory of bundles.
    Bundles,
}

/// Auto-detect the input kind by looking for known build files.
pub fn detect_input(path: &Path) -> Option<Input> {
    if path.is_file() {
        return is_jar(path).then_some(Input::Bundles);
    }

    if path.join("pom.xml").exists() || path.join("gradle.lockfile").exists() {
        return Some(Input::Project);
    }

    let has_jars = std::fs::read_dir(path)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .any(|e| is_jar(&e.path()))
        })
        .unwrap_or(false);

    has_jars.then_some(Input::Bundles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_detect_project() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        assert_eq!(detect_input(dir.path()), Some(Input::Project));
    }

    #[test]
    fn test_detect_bundles() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("bundle.jar");
        std::fs::write(&jar, "").unwrap();
        assert_eq!(detect_input(dir.path()), Some(Input::Bundles));
        assert_eq!(detect_input(&jar), Some(Input::Bundles));
    }

    #[test]
    fn test_detect_nothing() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "").unwrap();
        assert_eq!(detect_input(dir.path()), None);
        assert_eq!(detect_input(&dir.path().join("README.md")), None);
    }
}
