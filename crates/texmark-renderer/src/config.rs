//! Per-document renderer configuration.

use std::ops::BitOr;

/// Behavior switches for the LaTeX renderer.
///
/// Reserved for future use: no flag currently changes the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RenderFlags(u32);

impl RenderFlags {
    /// No flags set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Create flags from raw bits, keeping unknown bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for RenderFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Generator name written to the PDF metadata when none is configured.
pub const DEFAULT_GENERATOR: &str = "texmark";

/// Document configuration, fixed for the lifetime of a [`LatexRenderer`](crate::LatexRenderer).
///
/// # Example
///
/// ```
/// use texmark_renderer::RendererConfig;
///
/// let config = RendererConfig::new("Annual Report", "Jane Doe")
///     .with_generator("texmark 1.0");
/// assert_eq!(config.title(), "Annual Report");
/// assert_eq!(config.generator(), "texmark 1.0");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RendererConfig {
    title: String,
    author: String,
    generator: String,
    flags: RenderFlags,
}

impl RendererConfig {
    /// Create a configuration with the given title and author.
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            generator: DEFAULT_GENERATOR.to_owned(),
            flags: RenderFlags::empty(),
        }
    }

    /// Set the generator name embedded as `pdfauthor` in the preamble.
    #[must_use]
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    /// Set behavior flags.
    #[must_use]
    pub fn with_flags(mut self, flags: RenderFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Document title. Empty means no title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Document author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Generator name for the PDF metadata.
    #[must_use]
    pub fn generator(&self) -> &str {
        &self.generator
    }

    /// Behavior flags.
    #[must_use]
    pub fn flags(&self) -> RenderFlags {
        self.flags
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::new("", "")
    }
}
