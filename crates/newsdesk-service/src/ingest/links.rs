use url::Url;

/// Resolve a scraped link target against the site it came from.
///
/// Targets that already carry a scheme are kept as written. Everything else
/// (`/path`, `path`, `//host/path`, `?query`) is resolved against `base`.
pub fn absolutize(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match Url::parse(href) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => base.join(href).ok().map(String::from),
        Err(_) => None,
    }
}

/// `Some` only for http and https URLs, the only ones rendered as links.
pub fn web_link(raw: &str) -> Option<Url> {
    Url::parse(raw)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
}
