//! Markdown to LaTeX conversion driven by `pulldown-cmark` events.

use std::iter::Peekable;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, LinkType, Options, Parser, Tag, TagEnd};

use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::latex::LatexRenderer;
use crate::node::{Body, Emission, LinkKind, ListKind, Node};

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered LaTeX.
    pub latex: String,
    /// Constructs that could not be rendered faithfully, one entry per kind.
    pub warnings: Vec<String>,
}

/// Markdown to LaTeX renderer.
///
/// Walks a `pulldown-cmark` event stream depth-first and dispatches each
/// construct to a [`LatexRenderer`]. Headings, lists and paragraphs are
/// rendered through continuations so that empty ones leave no trace.
///
/// # Example
///
/// ```
/// use texmark_renderer::{MarkdownRenderer, RendererConfig};
///
/// let result = MarkdownRenderer::new(RendererConfig::new("Notes", "Me"))
///     .with_standalone(false)
///     .render_markdown("# Hello\n\n**Bold** 100%")
///     .unwrap();
/// assert_eq!(result.latex, "\n\\section{Hello}\n\n\\textbf{Bold} 100\\%\n");
/// ```
pub struct MarkdownRenderer {
    latex: LatexRenderer,
    gfm: bool,
    math: bool,
    footnotes: bool,
    standalone: bool,
}

impl MarkdownRenderer {
    /// Create a renderer producing a standalone document, with GFM tables,
    /// strikethrough, math and footnote syntax enabled.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        Self {
            latex: LatexRenderer::new(config),
            gfm: true,
            math: true,
            footnotes: true,
            standalone: true,
        }
    }

    /// Enable or disable GitHub Flavored Markdown tables and strikethrough.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Enable or disable `$inline$` and `$$display$$` math.
    #[must_use]
    pub fn with_math(mut self, enabled: bool) -> Self {
        self.math = enabled;
        self
    }

    /// Enable or disable footnote syntax.
    #[must_use]
    pub fn with_footnotes(mut self, enabled: bool) -> Self {
        self.footnotes = enabled;
        self
    }

    /// Wrap the output in a preamble and `\end{document}`.
    ///
    /// Enabled by default. When disabled only the body markup is produced.
    #[must_use]
    pub fn with_standalone(mut self, enabled: bool) -> Self {
        self.standalone = enabled;
        self
    }

    /// Get parser options based on configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options |= Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        }
        if self.math {
            options |= Options::ENABLE_MATH;
        }
        if self.footnotes {
            options |= Options::ENABLE_FOOTNOTES;
        }
        options
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Render markdown text directly using configured parser options.
    pub fn render_markdown(&self, markdown: &str) -> Result<RenderResult, RenderError> {
        self.render(self.create_parser(markdown))
    }

    /// Render markdown events.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if start and end tags in `events` do not pair
    /// up. Streams produced by [`Parser`] are always balanced.
    pub fn render<'a, I>(&self, events: I) -> Result<RenderResult, RenderError>
    where
        I: Iterator<Item = Event<'a>>,
    {
        let mut pass = Pass::new(&self.latex, events);
        let mut latex = String::with_capacity(4096);
        pass.document(&mut latex, self.standalone)?;
        tracing::debug!(
            bytes = latex.len(),
            warnings = pass.warnings.len(),
            "Rendered LaTeX"
        );
        Ok(RenderResult {
            latex,
            warnings: pass.warnings,
        })
    }

    /// The underlying LaTeX renderer.
    #[must_use]
    pub fn latex(&self) -> &LatexRenderer {
        &self.latex
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

/// Language of a code block: the first word of a fence's info string.
fn fence_language<'k>(kind: &'k CodeBlockKind<'_>) -> &'k str {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().unwrap_or(""),
        CodeBlockKind::Indented => "",
    }
}

/// State of one rendering pass over an event stream.
struct Pass<'r, 'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    latex: &'r LatexRenderer,
    events: Peekable<I>,
    /// Footnote definitions as (label, rendered content), emitted after the body.
    footnotes: Vec<(String, String)>,
    /// Footnote labels in order of first reference.
    footnote_refs: Vec<String>,
    warnings: Vec<String>,
}

impl<'r, 'a, I> Pass<'r, 'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    fn new(latex: &'r LatexRenderer, events: I) -> Self {
        Self {
            latex,
            events: events.peekable(),
            footnotes: Vec::new(),
            footnote_refs: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn document(&mut self, out: &mut String, standalone: bool) -> Result<(), RenderError> {
        if standalone {
            self.emit(Node::DocumentHeader, out);
            self.emit(Node::TitleBlock { text: "" }, out);
        }
        while let Some(event) = self.events.next() {
            self.event(event, out)?;
        }
        self.flush_footnotes(out);
        if standalone {
            self.emit(Node::DocumentFooter, out);
        }
        Ok(())
    }

    fn emit(&mut self, node: Node<'_>, out: &mut String) {
        let name = node.name();
        if self.latex.render(node, out) == Emission::Unsupported {
            let warning = format!("{name} is not supported");
            if !self.warnings.contains(&warning) {
                self.warnings.push(warning);
            }
        }
    }

    fn event(&mut self, event: Event<'a>, out: &mut String) -> Result<(), RenderError> {
        match event {
            Event::Start(tag) => return self.start(tag, out),
            Event::End(found) => return Err(RenderError::StrayEnd { found }),
            Event::Text(text) => self.emit(Node::Text { text: &text }, out),
            Event::Code(code) => self.emit(Node::CodeSpan { code: &code }, out),
            Event::InlineMath(source) => self.emit(
                Node::Math {
                    source: &source,
                    inline: true,
                },
                out,
            ),
            Event::DisplayMath(source) => self.emit(
                Node::Math {
                    source: &source,
                    inline: false,
                },
                out,
            ),
            Event::Html(markup) => self.emit(Node::RawBlock { markup: &markup }, out),
            Event::InlineHtml(markup) => self.emit(Node::RawInline { markup: &markup }, out),
            Event::FootnoteReference(label) => {
                let index = self.footnote_index(&label);
                self.emit(
                    Node::FootnoteRef {
                        reference: &label,
                        index,
                    },
                    out,
                );
            }
            Event::SoftBreak => self.emit(Node::Text { text: "\n" }, out),
            Event::HardBreak => self.emit(Node::LineBreak, out),
            Event::Rule => self.emit(Node::HorizontalRule, out),
            Event::TaskListMarker(_) => {}
        }
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn start(&mut self, tag: Tag<'a>, out: &mut String) -> Result<(), RenderError> {
        let end = tag.to_end();
        let latex = self.latex;
        let mut failure = None;
        match tag {
            Tag::Paragraph => {
                let body = self.body(end, &mut failure);
                latex.render(Node::Paragraph { body }, out);
            }
            Tag::Heading { level, .. } => {
                let body = self.body(end, &mut failure);
                latex.render(Node::Heading { level, body }, out);
            }
            Tag::List(start) => {
                let kind = if start.is_some() {
                    ListKind::Ordered
                } else {
                    ListKind::Unordered
                };
                let body = self.body(end, &mut failure);
                latex.render(Node::List { kind, body }, out);
            }
            Tag::Item => {
                let content = self.scratch(end)?;
                self.emit(Node::ListItem { content: &content }, out);
            }
            Tag::BlockQuote(_) => {
                let content = self.scratch(end)?;
                self.emit(Node::BlockQuote { content: &content }, out);
            }
            Tag::CodeBlock(kind) => {
                let code = self.verbatim(end)?;
                let lang = fence_language(&kind);
                self.emit(Node::CodeBlock { code: &code, lang }, out);
            }
            Tag::HtmlBlock => {
                let markup = self.verbatim(end)?;
                self.emit(Node::RawBlock { markup: &markup }, out);
            }
            Tag::Table(alignments) => self.table(&alignments, out)?,
            Tag::FootnoteDefinition(label) => {
                let content = self.scratch(end)?;
                self.footnotes.push((label.into_string(), content));
            }
            Tag::Emphasis | Tag::Strong => self.emphasis(end, out)?,
            Tag::Strikethrough => {
                let content = self.scratch(end)?;
                self.emit(Node::Strikethrough { content: &content }, out);
            }
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let content = self.scratch(end)?;
                let node = match link_type {
                    LinkType::Autolink => Node::AutoLink {
                        link: &dest_url,
                        kind: LinkKind::Normal,
                    },
                    LinkType::Email => Node::AutoLink {
                        link: &dest_url,
                        kind: LinkKind::Email,
                    },
                    _ => Node::Link {
                        link: &dest_url,
                        title: &title,
                        content: &content,
                    },
                };
                self.emit(node, out);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let alt = self.scratch(end)?;
                self.emit(
                    Node::Image {
                        link: &dest_url,
                        title: &title,
                        alt: &alt,
                    },
                    out,
                );
            }
            Tag::MetadataBlock(_) => {
                self.verbatim(end)?;
            }
            // Rows and cells only carry meaning inside a table; definition
            // lists and scripts have no wrapper of their own.
            Tag::TableHead
            | Tag::TableRow
            | Tag::TableCell
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => self.children(end, out)?,
        }
        failure.map_or(Ok(()), Err)
    }

    /// Continuation rendering children up to `end`.
    ///
    /// Reports `true` when the children wrote anything but ASCII whitespace,
    /// so a lone no-break space still counts as content. A
    /// malformed stream is parked in `failure` and reported as empty, so the
    /// wrapper is rolled back before the error propagates.
    fn body<'s>(&'s mut self, end: TagEnd, failure: &'s mut Option<RenderError>) -> Body<'s> {
        Box::new(move |out: &mut String| {
            let mark = out.len();
            match self.children(end, out) {
                Ok(()) => !out[mark..].trim_ascii().is_empty(),
                Err(err) => {
                    *failure = Some(err);
                    false
                }
            }
        })
    }

    /// Render events into `out` until `end` is consumed.
    fn children(&mut self, end: TagEnd, out: &mut String) -> Result<(), RenderError> {
        loop {
            match self.events.next() {
                Some(Event::End(found)) if found == end => return Ok(()),
                Some(Event::End(found)) => {
                    return Err(RenderError::UnbalancedTag {
                        expected: end,
                        found,
                    });
                }
                Some(event) => self.event(event, out)?,
                None => return Err(RenderError::UnexpectedEof { expected: end }),
            }
        }
    }

    /// Render children up to `end` into a fresh buffer.
    fn scratch(&mut self, end: TagEnd) -> Result<String, RenderError> {
        let mut buf = String::new();
        self.children(end, &mut buf)?;
        Ok(buf)
    }

    /// Collect literal text up to `end` without rendering it.
    fn verbatim(&mut self, end: TagEnd) -> Result<String, RenderError> {
        let mut buf = String::new();
        loop {
            match self.events.next() {
                Some(Event::End(found)) if found == end => return Ok(buf),
                Some(Event::End(found)) => {
                    return Err(RenderError::UnbalancedTag {
                        expected: end,
                        found,
                    });
                }
                Some(Event::Text(text) | Event::Html(text)) => buf.push_str(&text),
                Some(Event::SoftBreak | Event::HardBreak) => buf.push('\n'),
                Some(_) => {}
                None => return Err(RenderError::UnexpectedEof { expected: end }),
            }
        }
    }

    /// Render strong or emphasized text, folding `***text***` into one
    /// strong-and-emphasis construct.
    fn emphasis(&mut self, end: TagEnd, out: &mut String) -> Result<(), RenderError> {
        let inner_end = if end == TagEnd::Strong {
            TagEnd::Emphasis
        } else {
            TagEnd::Strong
        };
        let nested = matches!(
            self.events.peek(),
            Some(Event::Start(tag)) if tag.to_end() == inner_end
        );

        let mut content = String::new();
        if nested {
            self.events.next();
            let inner = self.scratch(inner_end)?;
            if matches!(self.events.peek(), Some(Event::End(found)) if *found == end) {
                self.events.next();
                self.emit(Node::StrongEmphasis { content: &inner }, out);
                return Ok(());
            }
            self.emit(styled(inner_end, &inner), &mut content);
        }
        self.children(end, &mut content)?;
        self.emit(styled(end, &content), out);
        Ok(())
    }

    fn table(&mut self, alignments: &[Alignment], out: &mut String) -> Result<(), RenderError> {
        let mut header = String::new();
        let mut body = String::new();
        let mut first_row = true;
        loop {
            match self.events.next() {
                Some(Event::Start(Tag::TableHead)) => {
                    self.table_cells(TagEnd::TableHead, alignments, true, &mut header)?;
                }
                Some(Event::Start(Tag::TableRow)) => {
                    let mut row = String::new();
                    self.table_cells(TagEnd::TableRow, alignments, false, &mut row)?;
                    self.emit(
                        Node::TableRow {
                            content: &row,
                            first: first_row,
                        },
                        &mut body,
                    );
                    first_row = false;
                }
                Some(Event::End(TagEnd::Table)) => break,
                Some(Event::End(found)) => {
                    return Err(RenderError::UnbalancedTag {
                        expected: TagEnd::Table,
                        found,
                    });
                }
                Some(_) => {}
                None => {
                    return Err(RenderError::UnexpectedEof {
                        expected: TagEnd::Table,
                    });
                }
            }
        }
        self.emit(
            Node::Table {
                header: &header,
                body: &body,
                alignments,
            },
            out,
        );
        Ok(())
    }

    fn table_cells(
        &mut self,
        end: TagEnd,
        alignments: &[Alignment],
        header: bool,
        row: &mut String,
    ) -> Result<(), RenderError> {
        let mut column = 0;
        loop {
            match self.events.next() {
                Some(Event::Start(Tag::TableCell)) => {
                    let content = self.scratch(TagEnd::TableCell)?;
                    let alignment = alignments.get(column).copied().unwrap_or(Alignment::None);
                    let first = column == 0;
                    let node = if header {
                        Node::TableHeaderCell {
                            content: &content,
                            alignment,
                            first,
                        }
                    } else {
                        Node::TableCell {
                            content: &content,
                            alignment,
                            first,
                        }
                    };
                    self.emit(node, row);
                    column += 1;
                }
                Some(Event::End(found)) if found == end => return Ok(()),
                Some(Event::End(found)) => {
                    return Err(RenderError::UnbalancedTag {
                        expected: end,
                        found,
                    });
                }
                Some(_) => {}
                None => return Err(RenderError::UnexpectedEof { expected: end }),
            }
        }
    }

    /// One-based index of a footnote label, by order of first reference.
    fn footnote_index(&mut self, label: &str) -> usize {
        if let Some(pos) = self.footnote_refs.iter().position(|seen| seen == label) {
            return pos + 1;
        }
        self.footnote_refs.push(label.to_owned());
        self.footnote_refs.len()
    }

    fn flush_footnotes(&mut self, out: &mut String) {
        if self.footnotes.is_empty() {
            return;
        }
        let latex = self.latex;
        let notes = std::mem::take(&mut self.footnotes);
        let body: Body<'_> = Box::new(|out: &mut String| {
            for (name, content) in &notes {
                latex.render(Node::FootnoteItem { name, content }, out);
            }
            true
        });
        self.emit(Node::Footnotes { body }, out);
    }
}

fn styled(end: TagEnd, content: &str) -> Node<'_> {
    if end == TagEnd::Strong {
        Node::Strong { content }
    } else {
        Node::Emphasis { content }
    }
}
