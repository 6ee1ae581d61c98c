//! Single-file components
//!
//! A component file bundles up to three regions:
//!
//! ```text
//! <template><button><%- data.label %></button></template>
//! <script>module.exports = { onClick: function () {} };</script>
//! <style>button { color: red; }</style>
//! ```
//!
//! Compiling it under `APP.ui.button` produces a namespaced module object
//! initialized by the script, a `tpl` render method on that object, and a
//! style rule scoped under the class `c-APP-ui-button`, which is also set on
//! the element wrapping the rendered template.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CompileError;
use crate::namespace::expand_namespace;
use crate::template::{wrap_function, CompilerConfig, TemplateCompiler};

/// Regions extracted from a component source; missing regions are empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComponentParts<'s> {
    pub template: &'s str,
    /// Byte offset of the template region's inner text in the source
    pub template_offset: usize,
    pub script: &'s str,
    pub style: &'s str,
}

/// Generated code for one component
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentOutput {
    /// Module initializer and render method
    pub script: String,
    /// Scoped style rule, empty when the component has no style
    pub style: String,
}

static TEMPLATE_REGION: OnceLock<Regex> = OnceLock::new();
static SCRIPT_REGION: OnceLock<Regex> = OnceLock::new();
static STYLE_REGION: OnceLock<Regex> = OnceLock::new();

fn region_regex(name: &str) -> Regex {
    // case-insensitive, '.' spans newlines, first opening tag to first closing tag
    Regex::new(&format!(r"(?is)<{0}(?:\s[^>]*)?>(.*?)</{0}\s*>", name))
        .expect("region pattern is valid")
}

fn region<'s>(cell: &OnceLock<Regex>, name: &str, source: &'s str) -> Option<regex::Match<'s>> {
    cell.get_or_init(|| region_regex(name))
        .captures(source)
        .and_then(|caps| caps.get(1))
}

/// Extract the template, script and style regions of a component source
///
/// When a region occurs more than once only the first is used.
pub fn split_component(source: &str) -> ComponentParts<'_> {
    let template = region(&TEMPLATE_REGION, "template", source);

    ComponentParts {
        template: matched(template),
        template_offset: template.map_or(0, |m| m.start()),
        script: matched(region(&SCRIPT_REGION, "script", source)),
        style: matched(region(&STYLE_REGION, "style", source)),
    }
}

fn matched<'s>(m: Option<regex::Match<'s>>) -> &'s str {
    m.map_or("", |m| m.as_str())
}

/// CSS class for a fully-qualified component name: dots become hyphens
pub fn component_class(prefix: &str, full_name: &str) -> String {
    format!("{}{}", prefix, full_name.replace('.', "-"))
}

/// Compile a component source mounted at the dotted `full_name`
pub fn compile_component(
    source: &str,
    full_name: &str,
    config: &CompilerConfig,
) -> Result<ComponentOutput, CompileError> {
    let parts = split_component(source);
    let class = component_class(&config.class_prefix, full_name);
    let expansion = expand_namespace(full_name)?;

    let open = format!("<{} class=\"{}\">", config.container_tag, class);
    let wrapped = format!("{}{}</{}>", open, parts.template, config.container_tag);
    let body = TemplateCompiler::new(config.clone())
        .compile(&wrapped)
        .map_err(|err| match err {
            // report the offset within the component source
            CompileError::MalformedTemplate { offset } => {
                CompileError::malformed(offset.saturating_sub(open.len()) + parts.template_offset)
            }
            other => other,
        })?;

    let mut script = expansion.prefix();
    script.push_str(&module_initializer(parts.script));
    script.push_str(&format!("{}.tpl = ", full_name));
    script.push_str(&wrap_function("", &config.argument, &body));

    let style = if parts.style.trim().is_empty() {
        String::new()
    } else {
        format!(".{} {{\n{}\n}}\n", class, parts.style)
    };

    log::debug!(
        "compiled component {} (template {} bytes, script {} bytes, style {} bytes)",
        full_name,
        parts.template.len(),
        parts.script.len(),
        parts.style.len()
    );

    Ok(ComponentOutput { script, style })
}

/// Self-invoking function running the script region and yielding its exports
///
/// The script sees a `module` object and may either assign
/// `module.exports` or return an object directly.
fn module_initializer(script: &str) -> String {
    format!(
        "(function (module) {{\n{}\nreturn module.exports || {{}};\n}})({{ exports: {{}} }});\n",
        script
    )
}
