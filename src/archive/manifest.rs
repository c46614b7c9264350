pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
pub const BUNDLE_LICENSE: &str = "Bundle-License";

/// Main-section headers of a JAR manifest, in declaration order.
#[derive(Debug, Default)]
pub struct Manifest {
    headers: Vec<(String, String)>,
}

impl Manifest {
    /// Parse the main section. Continuation lines start with a single space
    /// that is dropped before joining, even when nothing follows it; the
    /// section ends at the first empty line.
    pub fn parse(content: &str) -> Self {
        let mut headers: Vec<(String, String)> = Vec::new();

        for line in content.lines() {
            if let Some(continued) = line.strip_prefix(' ') {
                if let Some((_, value)) = headers.last_mut() {
                    value.push_str(continued);
                }
                continue;
            }
            if line.trim().is_empty() {
                if headers.is_empty() {
                    continue;
                }
                break;
            }
            if let Some((key, value)) = line.split_once(':') {
                headers.push((key.trim().to_string(), value.trim_start().to_string()));
            }
        }

        for (_, value) in headers.iter_mut() {
            *value = value.trim_end().to_string();
        }

        Manifest { headers }
    }

    /// Header lookup; names compare case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// URLs listed in `Bundle-License`, whitespace around commas ignored.
    pub fn bundle_licenses(&self) -> Vec<String> {
        self.get(BUNDLE_LICENSE)
            .map(split_license_list)
            .unwrap_or_default()
    }
}

fn split_license_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}
