use crate::models::{LicenseRecord, Location};

/// Rewrite a license whose location reads `jar:file:<path>!/<entry>` to a
/// plain `file:<entry>` path. The location text decides, whichever variant
/// holds it, so applying this twice is the same as applying it once.
pub fn normalize(record: &mut LicenseRecord) {
    let Some(location) = &record.location else {
        return;
    };
    let rewritten = match location {
        Location::Archive(locator) => Location::LocalFile(locator.entry.clone()),
        Location::Url(url) => Location::from(normalize_location(url).as_str()),
        Location::LocalFile(_) => return,
    };
    record.location = Some(rewritten);
}

/// String form of [`normalize`].
///
/// `jar:file:/x/y.jar!/about.html` becomes `file:about.html`; anything else,
/// including a `jar:file:` URL without the `!/` marker, is returned unchanged.
pub fn normalize_location(location: &str) -> String {
    match Location::from(location) {
        Location::Archive(locator) => Location::LocalFile(locator.entry).to_string(),
        _ => location.to_string(),
    }
}
