//! Small string helpers for header fields and file names.

/// Split `s` on whitespace into at most `max` parts.
///
/// With `max == 0` there is no limit. With `max == 1` the whole string is
/// returned untouched as the only part. Otherwise, once `max - 1` parts have
/// been taken, the rest of the string (minus leading whitespace) becomes the
/// last part.
pub fn split_string(s: &str, max: usize) -> Vec<String> {
    if max == 1 {
        return vec![s.to_string()];
    }

    let mut parts = Vec::new();
    let mut rest = s;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        if max != 0 && parts.len() == max - 1 {
            parts.push(rest.to_string());
            break;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        parts.push(rest[..end].to_string());
        rest = &rest[end..];
    }
    parts
}

/// True if `s` is non-empty and all ASCII digits.
pub fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// True if `s` is non-empty and all ASCII letters.
pub fn is_alpha(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphabetic())
}

/// File name of `path` without directories and without `extension`.
///
/// Both `/` and `\` count as separators. The name is cut at the first
/// occurrence of `extension`; if it does not occur the whole name is kept.
pub fn base_name<'a>(path: &'a str, extension: &str) -> &'a str {
    let name = match path.rfind(|c: char| c == '/' || c == '\\') {
        Some(separator) => &path[separator + 1..],
        None => path,
    };
    if extension.is_empty() {
        return name;
    }
    match name.find(extension) {
        Some(index) => &name[..index],
        None => name,
    }
}
