//! Error types for template compilation

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Length of the `<%` start marker
const START_MARKER_LEN: usize = 2;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// A `<%` start marker with no matching `%>` (strict mode only)
    #[error("unterminated tag at offset {offset}: '<%' has no matching '%>'")]
    MalformedTemplate { offset: usize },

    /// A namespace path that cannot be expanded into valid assignments
    #[error("invalid namespace path '{path}': {reason}")]
    InvalidNamespace { path: String, reason: String },
}

impl CompileError {
    pub fn malformed(offset: usize) -> Self {
        Self::MalformedTemplate { offset }
    }

    pub fn invalid_namespace(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNamespace {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get the source span if the error points into template text
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::MalformedTemplate { offset } => Some(*offset..*offset + START_MARKER_LEN),
            Self::InvalidNamespace { .. } => None,
        }
    }

    /// Format the error with source context using ariadne
    ///
    /// Errors without a span fall back to their `Display` text.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return format!("Error: {}\n", self);
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_config(Config::default().with_color(false))
            .with_message("unterminated template tag")
            .with_label(
                Label::new((filename, span))
                    .with_message("this '<%' is never closed by '%>'")
                    .with_color(Color::Red),
            )
            .with_help("close the tag with '%>' or escape the literal text")
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("Error: {}\n", self),
        }
    }
}
