const SUFFIX: &str = "_Memories.png";

/// Download name for a card: each whitespace run in `name` becomes one `_`.
///
/// Leading and trailing runs are replaced too, not trimmed.
pub fn export_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + SUFFIX.len());
    let mut in_run = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_run {
                out.push('_');
            }
            in_run = true;
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out.push_str(SUFFIX);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/export/filename.rs"]
mod tests;
