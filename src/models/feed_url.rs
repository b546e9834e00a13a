use url::Url;

/// Canonical form of a feed URL, used both when storing and when looking up
/// podcast URLs. Accepts absolute http(s) URLs with a host, drops the
/// fragment and lets the `url` crate normalise the rest (so
/// `https://mypodcast.com` becomes `https://mypodcast.com/`).
pub fn normalize_url(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    let mut url = Url::parse(raw).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    url.set_fragment(None);
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http() {
        assert_eq!(normalize_url(None), None);
        assert_eq!(normalize_url(Some("   ")), None);
        assert_eq!(normalize_url(Some("not a url")), None);
        assert_eq!(normalize_url(Some("ftp://mypodcast.com/feed")), None);
        assert_eq!(normalize_url(Some("file:///etc/passwd")), None);
    }

    #[test]
    fn trims_and_drops_fragment() {
        assert_eq!(
            normalize_url(Some(" https://mypodcast.com/feed#latest ")).as_deref(),
            Some("https://mypodcast.com/feed")
        );
    }

    #[test]
    fn bare_host_gets_root_path() {
        assert_eq!(
            normalize_url(Some("https://mypodcast.com")).as_deref(),
            Some("https://mypodcast.com/")
        );
        assert_eq!(
            normalize_url(Some("HTTPS://MyPodcast.com/")),
            normalize_url(Some("https://mypodcast.com"))
        );
    }
}
