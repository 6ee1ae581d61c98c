//! Template compilation
//!
//! Template source is literal text with three tag kinds:
//!
//! ```text
//! <% code %>     evaluate: code runs, nothing is output
//! <%= expr %>    interpolate: value is output as-is (null/undefined -> '')
//! <%- expr %>    escape: value is HTML-escaped before output
//! ```
//!
//! The [`lexer`] splits source into fragments and the [`compiler`] turns them
//! into the body of a JavaScript function taking the data context.

pub mod compiler;
pub mod lexer;

pub use compiler::{compile, wrap_function, CompilerConfig, TemplateCompiler};
pub use lexer::{scan, Fragment, TagKind, TagMatch, TagScanner};
