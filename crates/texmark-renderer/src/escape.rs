//! LaTeX character escaping.

/// Characters that must be preceded by a backslash in LaTeX text mode.
const RESERVED: &[u8] = b"_{}%$&\\~#";

fn needs_backslash(byte: u8) -> bool {
    RESERVED.contains(&byte)
}

/// Append `text` to `out`, escaping LaTeX reserved characters.
///
/// Runs of ordinary characters are copied with a single write. Every reserved
/// character (`_ { } % $ & \ ~ #`) is written as a backslash followed by the
/// character itself.
///
/// All reserved characters are ASCII, so slicing at their byte offsets always
/// lands on a `char` boundary.
pub fn push_escaped(out: &mut String, text: &str) {
    let mut run_start = 0;
    for (i, byte) in text.bytes().enumerate() {
        if !needs_backslash(byte) {
            continue;
        }
        if i > run_start {
            out.push_str(&text[run_start..i]);
        }
        out.push('\\');
        out.push(char::from(byte));
        run_start = i + 1;
    }
    if run_start < text.len() {
        out.push_str(&text[run_start..]);
    }
}

/// Escape LaTeX reserved characters in `text`.
///
/// # Examples
///
/// ```
/// use texmark_renderer::escape_latex;
///
/// assert_eq!(escape_latex("50% of $10"), r"50\% of \$10");
/// assert_eq!(escape_latex("snake_case"), r"snake\_case");
/// ```
#[must_use]
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    push_escaped(&mut out, text);
    out
}
