//! Host and path pattern matching

/// Match a host pattern against a resource host.
///
/// `*` matches every host. `*.example.com` matches any host with at least
/// one label in front of `example.com`, never `example.com` itself. Any other
/// pattern must equal the host, ignoring ASCII case.
pub fn match_host(pattern: &str, host: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    if let Some(suffix) = pattern.strip_prefix("*.") {
        let suffix_len = suffix.len() + 1;
        if host.len() <= suffix_len {
            return false;
        }
        let split = host.len() - suffix_len;
        return host.is_char_boundary(split)
            && host[split..].starts_with('.')
            && host[split + 1..].eq_ignore_ascii_case(suffix);
    }
    pattern.eq_ignore_ascii_case(host)
}

/// Match a path pattern against a resource path on segment boundaries.
///
/// A pattern ending in `/` is a directory and matches everything below it.
/// Otherwise `/foo` matches `/foo` and `/foo/bar` but not `/foobar`.
pub fn match_path(pattern: &str, path: &str) -> bool {
    if pattern.ends_with('/') {
        return path.starts_with(pattern);
    }
    match path.strip_prefix(pattern) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
