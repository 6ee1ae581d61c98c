//! jstml - JavaScript template pre-compiler with namespacing support
//!
//! Templates are literal text with `<% code %>`, `<%= expr %>` and
//! `<%- expr %>` tags. This library compiles them ahead of time into
//! JavaScript functions mounted under a nested namespace object, and can
//! also compile single-file components (template, script and style regions)
//! into a namespaced module plus a class-scoped stylesheet.
//!
//! # Example
//!
//! ```rust
//! use jstml::compile_template_function;
//!
//! let code = compile_template_function("APP.views.greeting", "Hello <%= data.name %>!").unwrap();
//! assert!(code.starts_with("APP.views = APP.views || {};\n"));
//! assert!(code.contains("APP.views.greeting = function greeting (data) {"));
//! ```

pub mod component;
pub mod config;
pub mod error;
pub mod escape;
pub mod namespace;
pub mod project;
pub mod template;

pub use component::{compile_component, split_component, ComponentOutput, ComponentParts};
pub use config::{ConfigError, ProjectConfig};
pub use error::CompileError;
pub use escape::{escape_html, escape_literal};
pub use namespace::{camel_case, expand_namespace, NamespaceExpansion};
pub use project::{BuildError, BuildOutput, Project, TemplateSource};
pub use template::{compile, CompilerConfig, TemplateCompiler};

/// Compile a template into a function assigned at a dotted namespace path
/// using the default configuration
///
/// The function is named after the last path segment.
///
/// # Example
///
/// ```rust
/// use jstml::compile_template_function;
///
/// let code = compile_template_function("render", "<p><%- data.text %></p>").unwrap();
/// assert!(code.starts_with("render = function render (data) {\n"));
/// assert!(code.ends_with("\n};\n"));
/// ```
pub fn compile_template_function(path: &str, source: &str) -> Result<String, CompileError> {
    compile_template_function_with_config(path, source, &CompilerConfig::default())
}

/// Compile a template into a function assigned at a dotted namespace path
pub fn compile_template_function_with_config(
    path: &str,
    source: &str,
    config: &CompilerConfig,
) -> Result<String, CompileError> {
    let expansion = expand_namespace(path)?;
    let name = path.rsplit('.').next().unwrap_or(path);
    let function = TemplateCompiler::new(config.clone()).compile_function(name, source)?;
    Ok(format!("{}{}", expansion.prefix(), function))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_function_nested_path() {
        let code = compile_template_function("APP.theme.whatever", "x").unwrap();
        assert!(code.starts_with("APP.theme = APP.theme || {};\nAPP.theme.whatever = function whatever (data) {\n"));
    }

    #[test]
    fn test_template_function_invalid_path() {
        let result = compile_template_function("APP.", "x");
        assert!(matches!(result, Err(CompileError::InvalidNamespace { .. })));
    }

    #[test]
    fn test_template_function_strict_config() {
        let config = CompilerConfig::new().with_strict(true);
        let result = compile_template_function_with_config("A.b", "<% if (x) {", &config);
        assert_eq!(result, Err(CompileError::MalformedTemplate { offset: 0 }));
    }

    #[test]
    fn test_template_function_is_idempotent() {
        let source = "<ul><% data.items.forEach(function (i) { %><li><%- i %></li><% }); %></ul>";
        assert_eq!(
            compile_template_function("A.b.c", source).unwrap(),
            compile_template_function("A.b.c", source).unwrap()
        );
    }
}
