//! Pure string functions over the backslash path dialect used by the
//! legacy scripting surface.
//!
//! Every function is total: empty input produces a safe default (`"."`,
//! `""`, `false`) rather than an error. There is no path *object*; all
//! operations are string-in/string-out, and normalization preserves a
//! trailing separator because directory-path semantics depend on it.

/// The dialect separator.
pub const SEP: char = '\\';

/// The dialect separator as a string slice, for joining.
pub const SEP_STR: &str = "\\";

/// Returns the directory portion of a path.
///
/// `"."` for empty input or a path with no separator, `"\"` when the only
/// separator is the leading one.
pub fn dirname(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let path = path.replace('/', SEP_STR);
    match path.rfind(SEP) {
        None => ".".to_string(),
        Some(0) => SEP_STR.to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

/// Returns the final component of a path, optionally stripping `ext`
/// when the component ends with it.
pub fn basename(path: &str, ext: Option<&str>) -> String {
    if path.is_empty() {
        return String::new();
    }
    let path = path.replace('/', SEP_STR);
    let base = match path.rfind(SEP) {
        None => path.as_str(),
        Some(idx) => &path[idx + 1..],
    };
    match ext {
        Some(ext) if !ext.is_empty() && base.ends_with(ext) => {
            base[..base.len() - ext.len()].to_string()
        }
        _ => base.to_string(),
    }
}

/// Returns the extension of the final component, including the dot.
///
/// A leading dot is not an extension marker (hidden-file convention), so
/// `extname(".profile")` is `""`.
pub fn extname(path: &str) -> String {
    let base = basename(path, None);
    match base.rfind('.') {
        None | Some(0) => String::new(),
        Some(idx) => base[idx..].to_string(),
    }
}

/// Joins path fragments with the dialect separator and normalizes the
/// result. Empty fragments are skipped.
pub fn join(parts: &[&str]) -> String {
    let parts: Vec<&str> = parts.iter().copied().filter(|p| !p.is_empty()).collect();
    normalize(&parts.join(SEP_STR))
}

/// Converts forward slashes to the dialect separator and collapses runs
/// of separators to one.
///
/// A trailing separator on the input is preserved on the output, and
/// `normalize` is idempotent.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let had_trailing = path.ends_with('/') || path.ends_with(SEP);
    let mut out = String::with_capacity(path.len());
    let mut prev_sep = false;
    for ch in path.chars() {
        let ch = if ch == '/' { SEP } else { ch };
        if ch == SEP {
            if prev_sep {
                continue;
            }
            prev_sep = true;
        } else {
            prev_sep = false;
        }
        out.push(ch);
    }
    if had_trailing && !out.ends_with(SEP) {
        out.push(SEP);
    }
    out
}

/// True for drive-letter-rooted (`C:\`) or UNC-style (`\\host`) paths.
pub fn is_absolute(path: &str) -> bool {
    if path.starts_with("\\\\") {
        return true;
    }
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(drive), Some(':'), Some('/' | '\\')) if drive.is_ascii_alphabetic()
    )
}
