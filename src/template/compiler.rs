//! Code generation for compiled template bodies
//!
//! A compiled body is plain JavaScript: it declares an accumulator string,
//! appends every literal chunk and tag value to it in source order, and
//! returns it. For example
//!
//! ```text
//! <ul><% items.forEach(function (item) { %><li><%= item %></li><% }); %></ul>
//! ```
//!
//! compiles to
//!
//! ```text
//! var __t, __jstml = '';
//! __jstml += '<ul>';
//!  items.forEach(function (item) {
//! __jstml += '<li>'+
//! ( (__t = ( item )) == null ? '' : __t ) +
//! '</li>';
//!  });
//! __jstml += '</ul>';
//! return __jstml;
//! ```

use serde::Deserialize;

use crate::error::CompileError;
use crate::escape::{escape_literal, js_html_escaper};

use super::lexer::{scan, Fragment, TagKind};

/// Temporary holding a tag's value during its null check
const VALUE_TEMP: &str = "__t";

/// Name of the runtime HTML escaper emitted for `<%- %>` tags
const ESCAPE_FN: &str = "__e";

/// Configuration for template and component compilation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Accumulator variable declared in every compiled body
    pub variable: String,
    /// Parameter name of generated template functions
    pub argument: String,
    /// Fail on a `<%` without matching `%>` instead of treating it as text
    pub strict: bool,
    /// Prefix of the CSS class derived for components
    pub class_prefix: String,
    /// Element wrapping a component's template
    pub container_tag: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            variable: "__jstml".to_string(),
            argument: "data".to_string(),
            strict: false,
            class_prefix: "c-".to_string(),
            container_tag: "div".to_string(),
        }
    }
}

impl CompilerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accumulator variable name
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = variable.into();
        self
    }

    /// Set the generated function's parameter name
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = argument.into();
        self
    }

    /// Enable or disable strict handling of unterminated tags
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the component CSS class prefix
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Set the element wrapping component templates
    pub fn with_container_tag(mut self, tag: impl Into<String>) -> Self {
        self.container_tag = tag.into();
        self
    }
}

/// Compiles template source into JavaScript function bodies
#[derive(Debug, Clone, Default)]
pub struct TemplateCompiler {
    config: CompilerConfig,
}

impl TemplateCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile template source to a function body
    ///
    /// In strict mode an unterminated `<%` is a
    /// [`CompileError::MalformedTemplate`]; otherwise it and the rest of the
    /// source are emitted as literal text.
    pub fn compile(&self, source: &str) -> Result<String, CompileError> {
        let scanned = scan(source);
        if let Some(offset) = scanned.dangling {
            if self.config.strict {
                return Err(CompileError::malformed(offset));
            }
            log::warn!(
                "unterminated '<%' at offset {}, emitting the rest of the template as text",
                offset
            );
        }
        Ok(self.generate(&scanned.fragments))
    }

    /// Compile template source and wrap it in a named function declaration
    pub fn compile_function(&self, name: &str, source: &str) -> Result<String, CompileError> {
        let body = self.compile(source)?;
        Ok(wrap_function(name, &self.config.argument, &body))
    }

    fn generate(&self, fragments: &[Fragment<'_>]) -> String {
        let acc = &self.config.variable;
        let append_open = format!("{} += '", acc);

        let mut code = append_open.clone();
        let mut uses_escape = false;

        for fragment in fragments {
            match fragment {
                Fragment::Literal(text) => code.push_str(&escape_literal(text)),
                Fragment::Tag { kind, code: inner, .. } => match kind {
                    TagKind::Escape => {
                        uses_escape = true;
                        code.push_str(&format!(
                            "'+\n( ({t} = ({expr})) == null ? '' : {esc}({t}) ) +\n'",
                            t = VALUE_TEMP,
                            expr = inner,
                            esc = ESCAPE_FN,
                        ));
                    }
                    TagKind::Interpolate => {
                        code.push_str(&format!(
                            "'+\n( ({t} = ({expr})) == null ? '' : {t} ) +\n'",
                            t = VALUE_TEMP,
                            expr = inner,
                        ));
                    }
                    TagKind::Evaluate => {
                        code.push_str("';\n");
                        code.push_str(inner);
                        code.push('\n');
                        code.push_str(&append_open);
                    }
                },
            }
        }
        code.push_str("';\n");

        let mut body = format!("var {}, {} = '';\n", VALUE_TEMP, acc);
        if uses_escape {
            body.push_str(&js_html_escaper(ESCAPE_FN));
        }
        body.push_str(&code);
        body.push_str(&format!("return {};\n", acc));
        body
    }
}

/// Compile template source with the default configuration
///
/// Unterminated tags degrade to literal text, so this never fails.
pub fn compile(source: &str) -> String {
    let scanned = scan(source);
    TemplateCompiler::default().generate(&scanned.fragments)
}

/// Wrap a compiled body in a function; an empty name gives an anonymous
/// function expression
pub fn wrap_function(name: &str, argument: &str, body: &str) -> String {
    if name.is_empty() {
        format!("function ({}) {{\n{}\n}};\n", argument, body)
    } else {
        format!("function {} ({}) {{\n{}\n}};\n", name, argument, body)
    }
}
