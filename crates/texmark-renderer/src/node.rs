//! Closed set of renderable constructs and their dispatch.

use pulldown_cmark::{Alignment, HeadingLevel};

use crate::latex::LatexRenderer;

/// Continuation that renders a block's children into the sink.
///
/// Returns `true` if it wrote content, `false` if the block turned out empty.
pub type Body<'a> = Box<dyn FnOnce(&mut String) -> bool + 'a>;

/// Kind of list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// Kind of autolink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// A URL.
    Normal,
    /// A bare email address; rendered with a `mailto:` target.
    Email,
}

/// What dispatching a [`Node`] did to the sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emission {
    /// Markup was written.
    Written,
    /// Nothing was written: the block was empty or the construct has no
    /// LaTeX form.
    Suppressed,
    /// The construct is not supported yet. Footnotes write nothing; entities
    /// are copied through undecoded.
    Unsupported,
}

/// A markdown construct ready to be rendered.
///
/// Block constructs that may turn out empty (heading, list, paragraph,
/// footnote group) carry a [`Body`] continuation; every other construct
/// carries content that was already rendered.
pub enum Node<'a> {
    DocumentHeader,
    /// Title block, emitted once the document body begins.
    TitleBlock {
        text: &'a str,
    },
    DocumentFooter,

    Heading {
        level: HeadingLevel,
        body: Body<'a>,
    },
    List {
        kind: ListKind,
        body: Body<'a>,
    },
    Paragraph {
        body: Body<'a>,
    },
    ListItem {
        content: &'a str,
    },
    BlockQuote {
        content: &'a str,
    },
    /// Fenced or indented code. An empty `lang` means no language.
    CodeBlock {
        code: &'a str,
        lang: &'a str,
    },
    /// Block of embedded foreign markup, such as an HTML block.
    RawBlock {
        markup: &'a str,
    },
    HorizontalRule,

    Table {
        header: &'a str,
        body: &'a str,
        alignments: &'a [Alignment],
    },
    /// Row appended to a table body sink.
    TableRow {
        content: &'a str,
        first: bool,
    },
    /// Cell appended to the header row sink.
    TableHeaderCell {
        content: &'a str,
        alignment: Alignment,
        first: bool,
    },
    /// Cell appended to a body row sink.
    TableCell {
        content: &'a str,
        alignment: Alignment,
        first: bool,
    },

    Footnotes {
        body: Body<'a>,
    },
    FootnoteItem {
        name: &'a str,
        content: &'a str,
    },

    AutoLink {
        link: &'a str,
        kind: LinkKind,
    },
    /// Raw inline code; escaped when rendered.
    CodeSpan {
        code: &'a str,
    },
    Emphasis {
        content: &'a str,
    },
    Strong {
        content: &'a str,
    },
    StrongEmphasis {
        content: &'a str,
    },
    Strikethrough {
        content: &'a str,
    },
    Link {
        link: &'a str,
        title: &'a str,
        content: &'a str,
    },
    Image {
        link: &'a str,
        title: &'a str,
        alt: &'a str,
    },
    LineBreak,
    /// Inline foreign markup, such as an HTML tag.
    RawInline {
        markup: &'a str,
    },
    FootnoteRef {
        reference: &'a str,
        index: usize,
    },
    Entity {
        entity: &'a str,
    },
    /// Raw text run; escaped when rendered.
    Text {
        text: &'a str,
    },
    Math {
        source: &'a str,
        inline: bool,
    },
}

impl Node<'_> {
    /// Human-readable construct name, used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DocumentHeader => "document header",
            Self::TitleBlock { .. } => "title block",
            Self::DocumentFooter => "document footer",
            Self::Heading { .. } => "heading",
            Self::List { .. } => "list",
            Self::Paragraph { .. } => "paragraph",
            Self::ListItem { .. } => "list item",
            Self::BlockQuote { .. } => "block quote",
            Self::CodeBlock { .. } => "code block",
            Self::RawBlock { .. } => "raw block",
            Self::HorizontalRule => "horizontal rule",
            Self::Table { .. } => "table",
            Self::TableRow { .. } => "table row",
            Self::TableHeaderCell { .. } => "table header cell",
            Self::TableCell { .. } => "table cell",
            Self::Footnotes { .. } => "footnote group",
            Self::FootnoteItem { .. } => "footnote definition",
            Self::AutoLink { .. } => "autolink",
            Self::CodeSpan { .. } => "code span",
            Self::Emphasis { .. } => "emphasis",
            Self::Strong { .. } => "strong emphasis",
            Self::StrongEmphasis { .. } => "strong and emphasis",
            Self::Strikethrough { .. } => "strikethrough",
            Self::Link { .. } => "link",
            Self::Image { .. } => "image",
            Self::LineBreak => "line break",
            Self::RawInline { .. } => "raw inline markup",
            Self::FootnoteRef { .. } => "footnote reference",
            Self::Entity { .. } => "entity reference",
            Self::Text { .. } => "text",
            Self::Math { .. } => "math",
        }
    }
}

fn committed(kept: bool) -> Emission {
    if kept {
        Emission::Written
    } else {
        Emission::Suppressed
    }
}

impl LatexRenderer {
    /// Render one construct into `out`.
    ///
    /// # Example
    ///
    /// ```
    /// use texmark_renderer::{Emission, LatexRenderer, Node};
    ///
    /// let latex = LatexRenderer::default();
    /// let mut out = String::new();
    /// let emission = latex.render(Node::Paragraph { body: Box::new(|_: &mut String| false) }, &mut out);
    /// assert_eq!(emission, Emission::Suppressed);
    /// assert!(out.is_empty());
    /// ```
    pub fn render(&self, node: Node<'_>, out: &mut String) -> Emission {
        match node {
            Node::DocumentHeader => self.document_header(out),
            Node::TitleBlock { text } => self.title_block(out, text),
            Node::DocumentFooter => self.document_footer(out),
            Node::Heading { level, body } => return committed(self.heading(out, level, body)),
            Node::List { kind, body } => return committed(self.list(out, kind, body)),
            Node::Paragraph { body } => return committed(self.paragraph(out, body)),
            Node::ListItem { content } => self.list_item(out, content),
            Node::BlockQuote { content } => self.block_quote(out, content),
            Node::CodeBlock { code, lang } => self.code_block(out, code, lang),
            Node::RawBlock { markup } => self.raw_block(out, markup),
            Node::HorizontalRule => self.horizontal_rule(out),
            Node::Table {
                header,
                body,
                alignments,
            } => self.table(out, header, body, alignments),
            Node::TableRow { content, first } => self.table_row(out, content, first),
            Node::TableHeaderCell {
                content,
                alignment,
                first,
            } => self.table_header_cell(out, content, alignment, first),
            Node::TableCell {
                content,
                alignment,
                first,
            } => self.table_cell(out, content, alignment, first),
            Node::Footnotes { body } => {
                self.footnotes(out, body);
                tracing::debug!("Footnotes are not supported");
                return Emission::Unsupported;
            }
            Node::FootnoteItem { name, content } => {
                self.footnote_item(out, name, content);
                tracing::debug!(name, "Footnote definitions are not supported");
                return Emission::Unsupported;
            }
            Node::AutoLink { link, kind } => self.auto_link(out, link, kind),
            Node::CodeSpan { code } => self.code_span(out, code),
            Node::Emphasis { content } => self.emphasis(out, content),
            Node::Strong { content } => self.strong(out, content),
            Node::StrongEmphasis { content } => self.strong_emphasis(out, content),
            Node::Strikethrough { content } => self.strikethrough(out, content),
            Node::Link {
                link,
                title,
                content,
            } => self.link(out, link, title, content),
            Node::Image { link, title, alt } => self.image(out, link, title, alt),
            Node::LineBreak => self.line_break(out),
            Node::RawInline { markup } => {
                self.raw_inline(out, markup);
                return Emission::Suppressed;
            }
            Node::FootnoteRef { reference, index } => {
                self.footnote_ref(out, reference, index);
                tracing::debug!(reference, index, "Footnote references are not supported");
                return Emission::Unsupported;
            }
            Node::Entity { entity } => {
                self.entity(out, entity);
                tracing::debug!(entity, "Entity copied without decoding");
                return Emission::Unsupported;
            }
            Node::Text { text } => self.text(out, text),
            Node::Math { source, inline } => self.math(out, source, inline),
        }
        Emission::Written
    }
}
