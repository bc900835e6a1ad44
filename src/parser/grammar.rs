//! Hand-rolled matchers for the lexical sub-grammars of CSP
//!
//! Each matcher either rejects its input or returns the captured pieces.
//! Optional captures are `None` when absent, never empty strings.

/// Captures of a host-source expression: `[scheme "://"] host [":" port] [path]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HostSourceParts<'a> {
    pub scheme: Option<&'a str>,
    pub host: &'a str,
    pub port: Option<&'a str>,
    pub path: Option<&'a str>,
}

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
pub(crate) fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic()) && chars.all(is_scheme_char)
}

fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

fn is_host_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-'
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '/' | '-' | '.' | '_' | '~' | '%' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+'
                | '=' | ':' | '@'
        )
}

/// `scheme ":"`, returning the scheme
pub(crate) fn scheme_source(token: &str) -> Option<&str> {
    let scheme = token.strip_suffix(':')?;
    is_scheme(scheme).then_some(scheme)
}

pub(crate) fn host_source(token: &str) -> Option<HostSourceParts<'_>> {
    let scheme_len = token.find(|c| !is_scheme_char(c)).unwrap_or(token.len());
    let (scheme, rest) = match token[scheme_len..].strip_prefix("://") {
        Some(rest) if is_scheme(&token[..scheme_len]) => (Some(&token[..scheme_len]), rest),
        Some(_) => return None,
        None => (None, token),
    };

    let host_len = host_part_len(rest)?;
    let (host, rest) = rest.split_at(host_len);

    let (port, rest) = match rest.strip_prefix(':') {
        Some(after_colon) => {
            let port_len = if after_colon.starts_with('*') {
                1
            } else {
                after_colon.bytes().take_while(u8::is_ascii_digit).count()
            };
            if port_len == 0 {
                return None;
            }
            let (port, rest) = after_colon.split_at(port_len);
            (Some(port), rest)
        }
        None => (None, rest),
    };

    let path = if rest.is_empty() {
        None
    } else if rest.starts_with('/') && rest.chars().all(is_path_char) {
        Some(rest)
    } else {
        return None;
    };

    Some(HostSourceParts {
        scheme,
        host,
        port,
        path,
    })
}

/// Length of `"*" / [ "*." ] 1*host-char *( "." 1*host-char )` at the start of `s`
fn host_part_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    if bytes.first() == Some(&b'*') {
        if bytes.get(1) != Some(&b'.') {
            return Some(1);
        }
        i = 2;
    }
    loop {
        let label_start = i;
        while bytes.get(i).copied().is_some_and(is_host_char) {
            i += 1;
        }
        if i == label_start {
            return None;
        }
        let next_label = bytes.get(i + 1).copied().is_some_and(is_host_char);
        if bytes.get(i) == Some(&b'.') && next_label {
            i += 1;
        } else {
            return Some(i);
        }
    }
}

/// RFC 2045 token character
fn is_mime_token_char(c: char) -> bool {
    c.is_ascii_graphic() && !"()<>@,;:\\\"/[]?=".contains(c)
}

/// `type "/" subtype`
pub(crate) fn media_type(token: &str) -> Option<(&str, &str)> {
    let (type_, subtype) = token.split_once('/')?;
    let valid = |part: &str| !part.is_empty() && part.chars().all(is_mime_token_char);
    (valid(type_) && valid(subtype)).then_some((type_, subtype))
}

/// RFC 7230 token
pub(crate) fn is_sandbox_token(token: &str) -> bool {
    !token.is_empty()
        && token.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(
                    c,
                    '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`'
                        | '|' | '~'
                )
        })
}
