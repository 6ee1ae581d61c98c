//! Escaping for literal text in generated code and for HTML output
//!
//! Literal template text ends up inside single-quoted JavaScript string
//! literals, so every character that could terminate the literal or break
//! the line is rewritten to its backslash form. Values produced by `<%- %>`
//! tags are HTML-escaped at render time by a small helper that the compiler
//! embeds in the generated body; the helper is built from [`HTML_ENTITIES`]
//! so the Rust-side [`escape_html`] and the generated JavaScript agree.

/// Characters escaped by `<%- %>` tags and their HTML entities
pub const HTML_ENTITIES: [(char, &str); 6] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#x27;"),
    ('`', "&#x60;"),
];

/// Backslash escape for a character that cannot appear raw in a
/// single-quoted string literal
fn literal_escape(c: char) -> Option<&'static str> {
    match c {
        '\\' => Some("\\\\"),
        '\'' => Some("\\'"),
        '\r' => Some("\\r"),
        '\n' => Some("\\n"),
        '\u{2028}' => Some("\\u2028"),
        '\u{2029}' => Some("\\u2029"),
        _ => None,
    }
}

/// Make literal text safe to embed inside a single-quoted string literal
///
/// Only backslash, single quote, CR, LF, U+2028 and U+2029 are rewritten;
/// every other character passes through untouched.
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match literal_escape(c) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(c),
        }
    }
    out
}

/// Escape a value's text form for use as HTML content
///
/// `None` stands for a null/undefined value and maps to the empty string.
pub fn escape_html(value: Option<&str>) -> String {
    let Some(text) = value else {
        return String::new();
    };

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match HTML_ENTITIES.iter().find(|(ch, _)| *ch == c) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}

/// JavaScript statements defining `fn_name`, the runtime HTML escaper used
/// by `<%- %>` tags
///
/// The helper stringifies its argument and replaces each character of
/// [`HTML_ENTITIES`]; null checks happen at the call site.
pub fn js_html_escaper(fn_name: &str) -> String {
    let map_name = format!("{}Map", fn_name);
    let entries = HTML_ENTITIES
        .iter()
        .map(|(c, entity)| format!("'{}': '{}'", escape_literal(&c.to_string()), entity))
        .collect::<Vec<_>>()
        .join(", ");
    let class: String = HTML_ENTITIES.iter().map(|(c, _)| *c).collect();

    format!(
        "var {map} = {{{entries}}};\n\
         var {name} = function (s) {{ return String(s).replace(/[{class}]/g, function (c) {{ return {map}[c]; }}); }};\n",
        map = map_name,
        entries = entries,
        name = fn_name,
        class = class,
    )
}
