use crate::UrlError;
use url::Url;

/// Normalizes a URL into the identity form used for deduplication
///
/// Two URLs name the same page iff their normalized forms are equal. Scheme,
/// host, port, path and query take part in identity; the fragment does not.
///
/// Rules applied on top of `url`'s own parsing (which already lowercases the
/// host, drops default ports and resolves `.`/`..` in absolute URLs):
/// - only `http` and `https` with a non-empty host are accepted
/// - empty path segments are removed, so `//a///b` becomes `/a/b`
/// - a trailing slash is removed, except for the root path `/`
/// - the fragment is dropped
/// - a bare `?` with no query is dropped; a non-empty query is kept verbatim
///
/// Normalization is idempotent.
///
/// # Examples
///
/// ```
/// use sitewalk::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.COM/docs/#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn normalize_url(raw: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    let path = collapse_path(url.path());
    url.set_path(&path);
    url.set_fragment(None);

    if matches!(url.query(), Some("")) {
        url.set_query(None);
    }

    Ok(url)
}

/// Rebuilds a path without empty or dot segments and without a trailing slash
fn collapse_path(path: &str) -> String {
    let segments = path.split('/').fold(Vec::new(), |mut kept, segment| {
        match segment {
            "" | "." => {}
            ".." => {
                kept.pop();
            }
            other => kept.push(other),
        }
        kept
    });

    format!("/{}", segments.join("/"))
}
