// ABOUTME: Pure string path normalization used before any path is joined under a namespace.
// ABOUTME: Resolves `.` and `..` against a virtual root so the result can never climb above it.

/// Normalize a caller-supplied path into a rooted, slash-separated form.
///
/// Both `/` and `\` count as separators. Empty and `.` segments are dropped,
/// `..` pops the previous segment and is ignored at the root. The result
/// always starts with exactly one `/`; empty or root-only input yields `/`.
/// No filesystem access happens here.
pub fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut out = String::with_capacity(path.len() + 1);
    for segment in &segments {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Join an already normalized path under a namespace prefix.
///
/// The root path maps onto the prefix itself.
pub fn join(prefix: &str, normalized: &str) -> String {
    if normalized == "/" {
        prefix.to_string()
    } else {
        format!("{prefix}{normalized}")
    }
}
