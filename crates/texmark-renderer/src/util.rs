//! Shared utility functions for LaTeX rendering.

use pulldown_cmark::{Alignment, HeadingLevel};

/// Return `path` without its file extension.
///
/// The extension is the suffix starting at the last `.` of the final path
/// component. Names without a dot, and dot-files such as `.hidden`, are
/// returned unchanged: a dot-file is never reduced to an empty name or to
/// its bare directory (`dir/.hidden` stays `dir/.hidden`, not `dir/`).
///
/// # Examples
///
/// ```
/// use texmark_renderer::strip_extension;
///
/// assert_eq!(strip_extension("pics/photo.jpg"), "pics/photo");
/// assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
/// assert_eq!(strip_extension("dir.d/README"), "dir.d/README");
/// ```
#[must_use]
pub fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |slash| slash + 1);
    match path[name_start..].rfind('.') {
        Some(0) | None => path,
        Some(dot) => &path[..name_start + dot],
    }
}

/// Sectioning command that opens a heading of the given level.
pub(crate) fn heading_open(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "\n\\section{",
        HeadingLevel::H2 => "\n\\subsection{",
        HeadingLevel::H3 => "\n\\subsubsection{",
        HeadingLevel::H4 => "\n\\paragraph{",
        HeadingLevel::H5 => "\n\\subparagraph{",
        HeadingLevel::H6 => "\n\\textbf{",
    }
}

/// Column specification letter for a `tabular` column.
pub(crate) fn column_spec(alignment: Alignment) -> char {
    match alignment {
        Alignment::Left => 'l',
        Alignment::Right => 'r',
        Alignment::Center | Alignment::None => 'c',
    }
}
