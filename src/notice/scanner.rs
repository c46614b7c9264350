use std::sync::LazyLock;

use regex::Regex;

/// An anchor pointing into `about_files/`, capturing the file name. Line
/// breaks and other attributes may surround `href` inside the tag.
static LICENSE_FILE_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a\s+(?:[^>]*?\s)?href\s*=\s*["']about_files/([^"'\s]+)["'][^>]*>"#)
        .expect("license file anchor pattern")
});

/// A URL following "available at", either as an anchor href or as text.
static LICENSE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)available\s+at\s*:?\s*(?:<a\s+(?:[^>]*?\s)?href\s*=\s*["'](https?://[^"'\s]+)["'][^>]*>|(https?://[^\s<>"']+))"#,
    )
    .expect("license url pattern")
});

/// A URL anchor followed, within the same sentence, by "available at".
static LICENSE_URL_BEFORE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<a\s+(?:[^>]*?\s)?href\s*=\s*["'](https?://[^"'\s]+)["'][^>]*>(?:[^.]|\.\S)*?available\s+at"#,
    )
    .expect("license url before phrase pattern")
});

static THIRD_PARTY_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Third\s+Party\s+Content").expect("third party pattern"));

/// Every `about_files/` file name referenced by an anchor, in document order.
/// Duplicates are kept.
pub fn find_license_filenames(text: &str) -> Vec<String> {
    LICENSE_FILE_ANCHOR
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// The first `about_files/` anchor after the "Third Party Content" heading.
pub fn find_license_filename(text: &str) -> Option<String> {
    let section = third_party_section(text)?;
    LICENSE_FILE_ANCHOR
        .captures(section)
        .map(|caps| caps[1].to_string())
}

/// The first URL tied to an "available at" phrase after the "Third Party
/// Content" heading. The link may follow the phrase or precede it in the
/// same sentence.
pub fn find_license_url(text: &str) -> Option<String> {
    let section = third_party_section(text)?;

    let after = LICENSE_URL.captures(section).and_then(|caps| {
        let url = caps.get(1).or_else(|| caps.get(2))?;
        Some((caps.get(0)?.start(), url.as_str()))
    });
    let before = LICENSE_URL_BEFORE_PHRASE
        .captures(section)
        .and_then(|caps| Some((caps.get(0)?.start(), caps.get(1)?.as_str())));

    let (_, url) = match (after, before) {
        (Some(a), Some(b)) => {
            if b.0 < a.0 {
                b
            } else {
                a
            }
        }
        (a, b) => a.or(b)?,
    };
    let url = url.trim_end_matches(['.', ',', ';', ')']);
    Some(url.to_string())
}

fn third_party_section(text: &str) -> Option<&str> {
    THIRD_PARTY_CONTENT.find(text).map(|m| &text[m.end()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    const ECLIPSE_ABOUT: &str = r#"<html>
<body>
<h2>About This Content</h2>
<p>The Eclipse Foundation makes available all content in this plug-in.</p>
<h3>Third Party Content</h3>
<p>The Content includes items that have been sourced from third parties as set out below.</p>
<h4>JavaMail</h4>
<p>Your use of JavaMail is subject to the terms of the Apache License, Version 2.0.
A copy of the license is contained in the file <a href="about_files/LICENSE-2.0.txt">LICENSE-2.0.txt</a>
and is also available at <a href="http://www.apache.org/licenses/" target="_blank">http://www.apache.org/licenses/</a>.</p>
</body>
</html>"#;

    #[test]
    fn test_filenames_in_order_with_duplicates() {
        let html = r#"<a href="about_files/a.txt">a</a> and <a
href="about_files/b.txt">b</a>, again <a href="about_files/a.txt">a</a>"#;
        assert_eq!(find_license_filenames(html), vec!["a.txt", "b.txt", "a.txt"]);
    }

    #[test]
    fn test_filename_with_extra_attributes() {
        let html = r#"<a class="license"
   href = "about_files/epl-v10.html" target="_blank"
   title="EPL">EPL</a>"#;
        assert_eq!(find_license_filenames(html), vec!["epl-v10.html"]);
    }

    #[test]
    fn test_no_anchors() {
        assert!(find_license_filenames("<html><p>No license here.</p></html>").is_empty());
        assert!(find_license_filenames(r#"<a href="http://x/about_files/a.txt">"#).is_empty());
    }

    #[test]
    fn test_url_after_third_party_content() {
        assert_eq!(
            find_license_url(ECLIPSE_ABOUT).as_deref(),
            Some("http://www.apache.org/licenses/")
        );
        assert_eq!(
            find_license_filename(ECLIPSE_ABOUT).as_deref(),
            Some("LICENSE-2.0.txt")
        );
    }

    #[test]
    fn test_url_with_line_break_before_href() {
        let html = "<h3>Third Party Content</h3>\n<p>EasyMock license is also available at <a\n\
                    href=\"http://www.easymock.org/License.html\">here</a></p>";
        assert_eq!(
            find_license_url(html).as_deref(),
            Some("http://www.easymock.org/License.html")
        );
    }

    #[test]
    fn test_url_with_target_before_href() {
        let html = r#"<h3>Third  Party
Content</h3> <p>The license is available at: <a target="_blank" href="http://www.apache.org/licenses/LICENSE-2.0.html">link</a></p>"#;
        assert_eq!(
            find_license_url(html).as_deref(),
            Some("http://www.apache.org/licenses/LICENSE-2.0.html")
        );
    }

    #[test]
    fn test_url_as_plain_text() {
        let html = "<h3>Third Party Content</h3><p>also available at http://x/LICENSE.</p>";
        assert_eq!(find_license_url(html).as_deref(), Some("http://x/LICENSE"));
    }

    #[test]
    fn test_url_before_phrase() {
        let html = r#"<h3>Third Party Content</h3>
<p>The <a href="https://www.eclipse.org/legal/epl-2.0/" target="_blank">Eclipse Public
License</a> text is also available at the Eclipse web site.</p>"#;
        assert_eq!(
            find_license_url(html).as_deref(),
            Some("https://www.eclipse.org/legal/epl-2.0/")
        );
    }

    #[test]
    fn test_url_in_earlier_sentence_is_not_tied_to_phrase() {
        let html = r#"<h3>Third Party Content</h3>
<p>See <a href="http://unrelated/">the project</a>. The license is also available at
<a href="http://x/LICENSE">x</a>.</p>"#;
        assert_eq!(find_license_url(html).as_deref(), Some("http://x/LICENSE"));
    }

    #[test]
    fn test_matches_before_heading_are_ignored() {
        let html = r#"<p>also available at <a href="http://early/LICENSE">x</a>
<a href="about_files/early.txt">early</a></p><h3>Third Party Content</h3><p>none</p>"#;
        assert_eq!(find_license_url(html), None);
        assert_eq!(find_license_filename(html), None);
        assert_eq!(find_license_filenames(html), vec!["early.txt"]);
    }

    #[test]
    fn test_missing_heading() {
        let html = r#"<p>also available at <a href="http://x/LICENSE">x</a></p>"#;
        assert_eq!(find_license_url(html), None);
        assert_eq!(find_license_filename(html), None);
    }
}
