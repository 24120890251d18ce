//! LaTeX backend.
//!
//! [`LatexRenderer`] exposes one operation per markdown construct. Every
//! operation appends to a caller-supplied `String` sink. Heading, list and
//! paragraph take a continuation that renders their children into the same
//! sink; when the continuation reports that nothing was written, the opening
//! wrapper is discarded by truncating the sink back to where the call began.

use pulldown_cmark::{Alignment, HeadingLevel};

use crate::config::RendererConfig;
use crate::escape::push_escaped;
use crate::node::{LinkKind, ListKind};
use crate::util::{column_spec, heading_open, strip_extension};

const PREAMBLE_HEAD: &str = r"\documentclass{article}
\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}
\usepackage{lmodern}
\usepackage{marvosym}
\usepackage{textcomp}
\DeclareUnicodeCharacter{20AC}{\EUR{}}
\DeclareUnicodeCharacter{2260}{\neq}
\DeclareUnicodeCharacter{2264}{\leq}
\DeclareUnicodeCharacter{2265}{\geq}
\DeclareUnicodeCharacter{22C5}{\cdot}
\DeclareUnicodeCharacter{A0}{~}
\DeclareUnicodeCharacter{B1}{\pm}
\DeclareUnicodeCharacter{D7}{\times}

\usepackage{amsmath}
\usepackage{graphicx}
\usepackage{listings}
\usepackage[margin=1in]{geometry}
\usepackage{verbatim}
\usepackage[normalem]{ulem}
\usepackage{hyperref}

\title{";

const PREAMBLE_HYPERSETUP: &str = r"}

\hypersetup{colorlinks,%
  citecolor=black,%
  filecolor=black,%
  linkcolor=black,%
  urlcolor=black,%
  pdfstartview=FitH,%
  breaklinks=true,%
  pdfauthor={";

const PREAMBLE_TAIL: &str = r"}}

\newcommand{\HRule}{\rule{\linewidth}{0.5mm}}
\addtolength{\parskip}{0.5\baselineskip}
\parindent=0pt

\begin{document}
";

const VERBATIM_BEGIN: &str = "\n\\begin{verbatim}\n";
const VERBATIM_END: &str = "\n\\end{verbatim}\n";
const ROW_SEPARATOR: &str = " \\\\\n";
const CELL_SEPARATOR: &str = " & ";

/// Write `open`, run `body`, then either close the wrapper or roll back.
///
/// Returns whether the block was kept.
fn wrap_or_rollback<F>(out: &mut String, open: &str, close: &str, body: F) -> bool
where
    F: FnOnce(&mut String) -> bool,
{
    let mark = out.len();
    out.push_str(open);
    if !body(out) {
        out.truncate(mark);
        tracing::trace!(open = open.trim(), "Empty block rolled back");
        return false;
    }
    out.push_str(close);
    true
}

fn wrap(out: &mut String, open: &str, content: &str, close: &str) {
    out.push_str(open);
    out.push_str(content);
    out.push_str(close);
}

/// Renders markdown constructs as LaTeX.
///
/// The renderer holds only the immutable [`RendererConfig`]; all output goes
/// to the sink passed to each call, so one renderer can serve any number of
/// sequential passes.
///
/// # Example
///
/// ```
/// use texmark_renderer::{HeadingLevel, LatexRenderer, RendererConfig};
///
/// let latex = LatexRenderer::new(RendererConfig::default());
/// let mut out = String::new();
/// latex.heading(&mut out, HeadingLevel::H2, |out| {
///     latex.text(out, "Costs & benefits");
///     true
/// });
/// assert_eq!(out, "\n\\subsection{Costs \\& benefits}\n");
/// ```
#[derive(Clone, Debug, Default)]
pub struct LatexRenderer {
    config: RendererConfig,
}

impl LatexRenderer {
    /// Create a renderer for one document configuration.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// The configuration this renderer was created with.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    // Document lifecycle

    /// Write the document preamble up to and including `\begin{document}`.
    pub fn document_header(&self, out: &mut String) {
        out.push_str(PREAMBLE_HEAD);
        push_escaped(out, self.config.title());
        out.push_str("}\n\\author{");
        push_escaped(out, self.config.author());
        out.push_str(PREAMBLE_HYPERSETUP);
        push_escaped(out, self.config.generator());
        out.push_str(PREAMBLE_TAIL);
    }

    /// Write `\maketitle` if a title is configured.
    ///
    /// The title itself must be declared in the preamble, so the title block
    /// text supplied by the traversal is ignored.
    pub fn title_block(&self, out: &mut String, _text: &str) {
        if !self.config.title().is_empty() {
            out.push_str("\\maketitle\n");
        }
    }

    /// Write `\end{document}`.
    pub fn document_footer(&self, out: &mut String) {
        out.push_str("\n\\end{document}\n");
    }

    // Blocks with rollback

    /// Render a sectioning heading, or nothing if `body` writes nothing.
    pub fn heading<F>(&self, out: &mut String, level: HeadingLevel, body: F) -> bool
    where
        F: FnOnce(&mut String) -> bool,
    {
        wrap_or_rollback(out, heading_open(level), "}\n", body)
    }

    /// Render an `enumerate` or `itemize` environment, or nothing if empty.
    pub fn list<F>(&self, out: &mut String, kind: ListKind, body: F) -> bool
    where
        F: FnOnce(&mut String) -> bool,
    {
        let (open, close) = match kind {
            ListKind::Ordered => ("\n\\begin{enumerate}\n", "\n\\end{enumerate}\n"),
            ListKind::Unordered => ("\n\\begin{itemize}\n", "\n\\end{itemize}\n"),
        };
        wrap_or_rollback(out, open, close, body)
    }

    /// Render a paragraph, or nothing if `body` writes nothing.
    pub fn paragraph<F>(&self, out: &mut String, body: F) -> bool
    where
        F: FnOnce(&mut String) -> bool,
    {
        wrap_or_rollback(out, "\n", "\n", body)
    }

    // Blocks with materialized content

    /// Render a list item marker followed by its content.
    pub fn list_item(&self, out: &mut String, content: &str) {
        out.push_str("\n\\item ");
        out.push_str(content);
    }

    /// Render a `quotation` environment.
    pub fn block_quote(&self, out: &mut String, content: &str) {
        wrap(
            out,
            "\n\\begin{quotation}\n",
            content,
            "\n\\end{quotation}\n",
        );
    }

    /// Render embedded foreign markup literally in a `verbatim` environment.
    pub fn raw_block(&self, out: &mut String, markup: &str) {
        wrap(out, VERBATIM_BEGIN, markup, VERBATIM_END);
    }

    /// Render a code block.
    ///
    /// Without a language the code goes into `verbatim`; with one it goes into
    /// `lstlisting` with the language copied as-is.
    pub fn code_block(&self, out: &mut String, code: &str, lang: &str) {
        if lang.is_empty() {
            wrap(out, VERBATIM_BEGIN, code, VERBATIM_END);
        } else {
            out.push_str("\n\\begin{lstlisting}[language=");
            out.push_str(lang);
            out.push_str("]\n");
            out.push_str(code);
            out.push_str("\n\\end{lstlisting}\n");
        }
    }

    /// Render the `\HRule` command defined in the preamble.
    pub fn horizontal_rule(&self, out: &mut String) {
        out.push_str("\n\\HRule\n");
    }

    // Tables

    /// Render a `tabular` environment from a rendered header row and body.
    pub fn table(&self, out: &mut String, header: &str, body: &str, alignments: &[Alignment]) {
        out.push_str("\n\\begin{tabular}{");
        out.extend(alignments.iter().copied().map(column_spec));
        out.push_str("}\n");
        out.push_str(header);
        out.push_str(ROW_SEPARATOR);
        out.push_str("\\hline\n");
        out.push_str(body);
        out.push_str("\n\\end{tabular}\n");
    }

    /// Append a rendered row to a table body.
    ///
    /// Rows after the first are preceded by a row break.
    pub fn table_row(&self, out: &mut String, content: &str, first: bool) {
        if !first {
            out.push_str(ROW_SEPARATOR);
        }
        out.push_str(content);
    }

    /// Append a header cell to a row.
    pub fn table_header_cell(
        &self,
        out: &mut String,
        content: &str,
        alignment: Alignment,
        first: bool,
    ) {
        self.table_cell(out, content, alignment, first);
    }

    /// Append a body cell to a row.
    ///
    /// Cells after the first are preceded by a column separator. Alignment is
    /// carried by the column specification, not by individual cells.
    pub fn table_cell(&self, out: &mut String, content: &str, _alignment: Alignment, first: bool) {
        if !first {
            out.push_str(CELL_SEPARATOR);
        }
        out.push_str(content);
    }

    // Footnotes

    /// Footnote groups are not rendered yet; `body` is never invoked.
    ///
    /// Always returns `false`.
    pub fn footnotes<F>(&self, _out: &mut String, _body: F) -> bool
    where
        F: FnOnce(&mut String) -> bool,
    {
        false
    }

    /// Footnote definitions are not rendered yet.
    pub fn footnote_item(&self, _out: &mut String, _name: &str, _content: &str) {}

    /// Footnote references are not rendered yet.
    pub fn footnote_ref(&self, _out: &mut String, _reference: &str, _index: usize) {}

    // Inline

    /// Render a bare URL or email address as a hyperlink to itself.
    pub fn auto_link(&self, out: &mut String, link: &str, kind: LinkKind) {
        out.push_str("\\href{");
        if kind == LinkKind::Email {
            out.push_str("mailto:");
        }
        out.push_str(link);
        out.push_str("}{");
        out.push_str(link);
        out.push('}');
    }

    /// Render raw inline code in a monospace font, escaping its content.
    pub fn code_span(&self, out: &mut String, code: &str) {
        out.push_str("\\texttt{");
        push_escaped(out, code);
        out.push('}');
    }

    pub fn strong(&self, out: &mut String, content: &str) {
        wrap(out, "\\textbf{", content, "}");
    }

    pub fn emphasis(&self, out: &mut String, content: &str) {
        wrap(out, "\\textit{", content, "}");
    }

    pub fn strong_emphasis(&self, out: &mut String, content: &str) {
        wrap(out, "\\textbf{\\textit{", content, "}}");
    }

    pub fn strikethrough(&self, out: &mut String, content: &str) {
        wrap(out, "\\sout{", content, "}");
    }

    /// Render a hyperlink. The title is not representable and is dropped.
    pub fn link(&self, out: &mut String, link: &str, _title: &str, content: &str) {
        out.push_str("\\href{");
        out.push_str(link);
        out.push_str("}{");
        out.push_str(content);
        out.push('}');
    }

    /// Render an image.
    ///
    /// Remote images cannot be embedded, so `http://` and `https://` targets
    /// become a hyperlink labelled with the alt text. Local images become
    /// `\includegraphics` with the file extension removed, letting LaTeX pick
    /// the best available format.
    pub fn image(&self, out: &mut String, link: &str, title: &str, alt: &str) {
        if link.starts_with("http://") || link.starts_with("https://") {
            self.link(out, link, title, alt);
        } else {
            wrap(out, "\\includegraphics{", strip_extension(link), "}");
        }
    }

    pub fn line_break(&self, out: &mut String) {
        out.push_str(ROW_SEPARATOR);
    }

    /// Inline foreign markup has no LaTeX equivalent and is dropped.
    pub fn raw_inline(&self, _out: &mut String, _markup: &str) {}

    /// Write an entity reference as-is. No decoding is performed.
    pub fn entity(&self, out: &mut String, entity: &str) {
        out.push_str(entity);
    }

    /// Render a run of plain text.
    pub fn text(&self, out: &mut String, text: &str) {
        push_escaped(out, text);
    }

    /// Render a math expression. The source is copied unescaped.
    pub fn math(&self, out: &mut String, source: &str, inline: bool) {
        if inline {
            wrap(out, "\\(", source, "\\)");
        } else {
            wrap(out, "\\[", source, "\\]");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn renderer() -> LatexRenderer {
        LatexRenderer::new(RendererConfig::new("My Title", "Jane_Doe"))
    }

    fn render(f: impl FnOnce(&LatexRenderer, &mut String)) -> String {
        let mut out = String::new();
        f(&renderer(), &mut out);
        out
    }

    #[test]
    fn test_heading_levels() {
        let cases = [
            (HeadingLevel::H1, "\n\\section{X}\n"),
            (HeadingLevel::H2, "\n\\subsection{X}\n"),
            (HeadingLevel::H3, "\n\\subsubsection{X}\n"),
            (HeadingLevel::H4, "\n\\paragraph{X}\n"),
            (HeadingLevel::H5, "\n\\subparagraph{X}\n"),
            (HeadingLevel::H6, "\n\\textbf{X}\n"),
        ];
        for (level, expected) in cases {
            let out = render(|r, out| {
                r.heading(out, level, |out| {
                    out.push('X');
                    true
                });
            });
            assert_eq!(out, expected);
        }
    }

    #[test]
    fn test_heading_rollback_leaves_sink_untouched() {
        let mut out = String::from("before");
        let kept = renderer().heading(&mut out, HeadingLevel::H1, |out| {
            out.push_str("   ");
            false
        });
        assert!(!kept);
        assert_eq!(out, "before");
    }

    #[test]
    fn test_list_ordered_and_unordered() {
        let ordered = render(|r, out| {
            r.list(out, ListKind::Ordered, |out| {
                r.list_item(out, "one");
                true
            });
        });
        assert_eq!(
            ordered,
            "\n\\begin{enumerate}\n\n\\item one\n\\end{enumerate}\n"
        );

        let unordered = render(|r, out| {
            r.list(out, ListKind::Unordered, |out| {
                r.list_item(out, "one");
                true
            });
        });
        assert_eq!(unordered, "\n\\begin{itemize}\n\n\\item one\n\\end{itemize}\n");
    }

    #[test]
    fn test_list_rollback() {
        let mut out = String::from("x");
        assert!(!renderer().list(&mut out, ListKind::Ordered, |_| false));
        assert_eq!(out, "x");
    }

    #[test]
    fn test_paragraph_commit_and_rollback() {
        let kept = render(|r, out| {
            r.paragraph(out, |out| {
                r.text(out, "Hello");
                true
            });
        });
        assert_eq!(kept, "\nHello\n");

        let mut out = String::from("prefix");
        assert!(!renderer().paragraph(&mut out, |_| false));
        assert_eq!(out, "prefix");
    }

    #[test]
    fn test_nested_rollback_only_discards_inner() {
        let r = renderer();
        let mut out = String::new();
        r.list(&mut out, ListKind::Unordered, |out| {
            r.list_item(out, "kept");
            let inner = r.paragraph(out, |_| false);
            assert!(!inner);
            true
        });
        assert_eq!(out, "\n\\begin{itemize}\n\n\\item kept\n\\end{itemize}\n");
    }

    #[test]
    fn test_block_quote() {
        let out = render(|r, out| r.block_quote(out, "quoted"));
        assert_eq!(out, "\n\\begin{quotation}\nquoted\n\\end{quotation}\n");
    }

    #[test]
    fn test_raw_block_is_verbatim_and_unescaped() {
        let out = render(|r, out| r.raw_block(out, "<div>&amp;</div>"));
        assert_eq!(out, "\n\\begin{verbatim}\n<div>&amp;</div>\n\\end{verbatim}\n");
    }

    #[test]
    fn test_code_block_without_language() {
        let out = render(|r, out| r.code_block(out, "x = 1_000", ""));
        assert_eq!(out, "\n\\begin{verbatim}\nx = 1_000\n\\end{verbatim}\n");
    }

    #[test]
    fn test_code_block_with_language() {
        let out = render(|r, out| r.code_block(out, "fmt.Println()", "go"));
        assert_eq!(
            out,
            "\n\\begin{lstlisting}[language=go]\nfmt.Println()\n\\end{lstlisting}\n"
        );
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(render(|r, out| r.horizontal_rule(out)), "\n\\HRule\n");
    }

    #[test]
    fn test_table_column_spec() {
        let out = render(|r, out| {
            r.table(
                out,
                "A & B & C",
                "1 & 2 & 3",
                &[Alignment::Left, Alignment::Center, Alignment::Right],
            );
        });
        assert!(out.starts_with("\n\\begin{tabular}{lcr}\n"));
    }

    #[test]
    fn test_table_default_alignment_is_center() {
        let out = render(|r, out| r.table(out, "A", "1", &[Alignment::None]));
        assert!(out.contains("{tabular}{c}"));
    }

    #[test]
    fn test_table_rows_and_cells() {
        let r = renderer();
        let mut body = String::new();
        for (index, cells) in [["a", "b"], ["c", "d"]].iter().enumerate() {
            let mut row = String::new();
            for (column, cell) in cells.iter().enumerate() {
                r.table_cell(&mut row, cell, Alignment::None, column == 0);
            }
            r.table_row(&mut body, &row, index == 0);
        }
        assert_eq!(body, "a & b \\\\\nc & d");

        let mut header = String::new();
        r.table_header_cell(&mut header, "H1", Alignment::Left, true);
        r.table_header_cell(&mut header, "H2", Alignment::Left, false);

        let mut out = String::new();
        r.table(&mut out, &header, &body, &[Alignment::Left, Alignment::Left]);
        assert_eq!(
            out,
            "\n\\begin{tabular}{ll}\nH1 & H2 \\\\\n\\hline\na & b \\\\\nc & d\n\\end{tabular}\n"
        );
    }

    #[test]
    fn test_footnotes_never_invoke_body() {
        let mut out = String::new();
        let mut invoked = false;
        let kept = renderer().footnotes(&mut out, |_| {
            invoked = true;
            true
        });
        assert!(!kept);
        assert!(!invoked);
        assert!(out.is_empty());
    }

    #[test]
    fn test_auto_link() {
        let out = render(|r, out| r.auto_link(out, "https://example.com", LinkKind::Normal));
        assert_eq!(out, "\\href{https://example.com}{https://example.com}");

        let out = render(|r, out| r.auto_link(out, "me@example.com", LinkKind::Email));
        assert_eq!(out, "\\href{mailto:me@example.com}{me@example.com}");
    }

    #[test]
    fn test_code_span_escapes() {
        let out = render(|r, out| r.code_span(out, "a_b{}"));
        assert_eq!(out, "\\texttt{a\\_b\\{\\}}");
    }

    #[test]
    fn test_emphasis_variants() {
        assert_eq!(render(|r, out| r.strong(out, "x")), "\\textbf{x}");
        assert_eq!(render(|r, out| r.emphasis(out, "x")), "\\textit{x}");
        assert_eq!(
            render(|r, out| r.strong_emphasis(out, "x")),
            "\\textbf{\\textit{x}}"
        );
        assert_eq!(render(|r, out| r.strikethrough(out, "x")), "\\sout{x}");
    }

    #[test]
    fn test_link() {
        let out = render(|r, out| r.link(out, "https://rust-lang.org", "Rust", "the site"));
        assert_eq!(out, "\\href{https://rust-lang.org}{the site}");
    }

    #[test]
    fn test_remote_image_becomes_link() {
        let out = render(|r, out| r.image(out, "http://x.com/i.png", "", "cap"));
        assert_eq!(out, "\\href{http://x.com/i.png}{cap}");
        assert!(!out.contains("includegraphics"));

        let out = render(|r, out| r.image(out, "https://x.com/i.png", "", "cap"));
        assert_eq!(out, "\\href{https://x.com/i.png}{cap}");
    }

    #[test]
    fn test_local_image_strips_extension() {
        let out = render(|r, out| r.image(out, "pics/photo.jpg", "", "alt"));
        assert_eq!(out, "\\includegraphics{pics/photo}");
    }

    #[test]
    fn test_line_break() {
        assert_eq!(render(|r, out| r.line_break(out)), " \\\\\n");
    }

    #[test]
    fn test_raw_inline_is_dropped() {
        assert_eq!(render(|r, out| r.raw_inline(out, "<br>")), "");
    }

    #[test]
    fn test_entity_passthrough() {
        assert_eq!(render(|r, out| r.entity(out, "&amp;")), "&amp;");
    }

    #[test]
    fn test_text_escapes() {
        assert_eq!(render(|r, out| r.text(out, "100%")), "100\\%");
    }

    #[test]
    fn test_math() {
        assert_eq!(render(|r, out| r.math(out, "x_1^2", true)), "\\(x_1^2\\)");
        assert_eq!(render(|r, out| r.math(out, "x_1^2", false)), "\\[x_1^2\\]");
    }

    #[test]
    fn test_document_header_escapes_title_and_author() {
        let out = render(|r, out| r.document_header(out));
        assert!(out.starts_with("\\documentclass{article}\n"));
        assert!(out.contains("\\title{My Title}\n\\author{Jane\\_Doe}\n"));
        assert!(out.contains("pdfauthor={texmark}}"));
        assert!(out.contains("\\newcommand{\\HRule}{\\rule{\\linewidth}{0.5mm}}"));
        assert!(out.ends_with("\\begin{document}\n"));
    }

    #[test]
    fn test_document_header_uses_configured_generator() {
        let r = LatexRenderer::new(RendererConfig::default().with_generator("texmark 9.9"));
        let mut out = String::new();
        r.document_header(&mut out);
        assert!(out.contains("pdfauthor={texmark 9.9}}"));
    }

    #[test]
    fn test_title_block() {
        assert_eq!(render(|r, out| r.title_block(out, "")), "\\maketitle\n");

        let untitled = LatexRenderer::default();
        let mut out = String::new();
        untitled.title_block(&mut out, "ignored");
        assert_eq!(out, "");
    }

    #[test]
    fn test_empty_document_is_complete() {
        let out = render(|r, out| {
            r.document_header(out);
            r.title_block(out, "");
            r.document_footer(out);
        });
        assert!(out.starts_with("\\documentclass{article}"));
        assert!(out.contains("\\begin{document}\n\\maketitle\n"));
        assert!(out.ends_with("\n\\end{document}\n"));
        assert_eq!(out.matches("\\begin{document}").count(), 1);
        assert_eq!(out.matches("\\end{document}").count(), 1);
    }
}
