//! Markdown fence stripping for raw model output

const FENCE: &str = "```";

/// Strip a surrounding markdown code fence and trim
///
/// Only a fence that opens the text is removed, together with an optional
/// language tag on the same line and a closing fence at the very end. Fences
/// elsewhere in the text are left alone.
pub fn clean_response(raw: &str) -> String {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed.to_string();
    };

    // Language tag: a run of non-whitespace right after the opening marker
    let body = match rest.find(|c: char| c.is_whitespace()) {
        Some(idx) if !rest[..idx].contains(['{', '[', '"']) => &rest[idx..],
        Some(_) => rest,
        None => {
            if rest.contains(['{', '[', '"']) {
                rest
            } else {
                ""
            }
        }
    };

    let body = body.trim_end();
    let body = body.strip_suffix(FENCE).unwrap_or(body);

    body.trim().to_string()
}
