//! Error types for the markdown driver.

use pulldown_cmark::TagEnd;

/// Malformed event stream.
///
/// [`LatexRenderer`](crate::LatexRenderer) operations never fail; only the
/// event-driven [`MarkdownRenderer`](crate::MarkdownRenderer) can receive a
/// stream whose start and end tags do not pair up.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The stream ended inside an open container.
    #[error("Event stream ended before the end of {expected:?}")]
    UnexpectedEof {
        /// End tag that was still expected.
        expected: TagEnd,
    },
    /// An end tag closed a different container than the open one.
    #[error("Unbalanced event stream: expected end of {expected:?}, found end of {found:?}")]
    UnbalancedTag {
        /// End tag of the open container.
        expected: TagEnd,
        /// End tag that was received.
        found: TagEnd,
    },
    /// An end tag arrived with no container open.
    #[error("Unexpected end of {found:?} outside any container")]
    StrayEnd {
        /// End tag that was received.
        found: TagEnd,
    },
}
