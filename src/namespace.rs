//! Namespace paths and identifier normalization
//!
//! Many independently compiled templates are mounted under one nested
//! object, e.g. `APP.theme.button` and `APP.theme.card`. Expanding a path
//! emits `x = x || {}` for each intermediate container, so a later template
//! sharing a prefix never replaces objects an earlier one populated.

use crate::error::CompileError;

/// Convert a dash-separated name to camel case
///
/// The input is lower-cased first, then every `-` followed by a character is
/// removed and that character upper-cased: `my-template` → `myTemplate`.
/// A trailing dash is kept.
pub fn camel_case(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut chars = lower.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '-' {
            match chars.peek() {
                Some(&next) if next != '\n' => {
                    out.extend(next.to_uppercase());
                    chars.next();
                }
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Generated code for mounting a value at a namespace path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceExpansion {
    /// Statements creating each missing intermediate container
    pub init: String,
    /// Assignment target for the final segment, ending in ` = `
    pub target: String,
}

impl NamespaceExpansion {
    /// Initialization followed by the assignment target, ready to be
    /// followed directly by a value expression
    pub fn prefix(&self) -> String {
        format!("{}{}", self.init, self.target)
    }
}

/// Expand a dotted path into container initialization and an assignment target
///
/// The first segment is the root object and must already exist; every later
/// segment except the last is created empty if absent:
///
/// ```text
/// APP.theme.render  =>  APP.theme = APP.theme || {};
///                       APP.theme.render =
/// ```
pub fn expand_namespace(path: &str) -> Result<NamespaceExpansion, CompileError> {
    let segments = split_path(path)?;
    let (last, containers) = segments
        .split_last()
        .ok_or_else(|| CompileError::invalid_namespace(path, "path is empty"))?;

    let mut init = String::new();
    let mut accumulated = String::new();
    for (i, segment) in containers.iter().enumerate() {
        if i > 0 {
            accumulated.push('.');
        }
        accumulated.push_str(segment);
        if i > 0 {
            init.push_str(&format!("{0} = {0} || {{}};\n", accumulated));
        }
    }

    let target = if accumulated.is_empty() {
        format!("{} = ", last)
    } else {
        format!("{}.{} = ", accumulated, last)
    };

    Ok(NamespaceExpansion { init, target })
}

/// Join a namespace and a name, either of which may be empty
pub fn join_path(namespace: &str, name: &str) -> String {
    match (namespace.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (_, true) => namespace.to_string(),
        _ => format!("{}.{}", namespace, name),
    }
}

fn split_path(path: &str) -> Result<Vec<&str>, CompileError> {
    if path.trim().is_empty() {
        return Err(CompileError::invalid_namespace(path, "path is empty"));
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(CompileError::invalid_namespace(path, "path has an empty segment"));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_camel_case_dashes() {
        assert_eq!(camel_case("my-template"), "myTemplate");
        assert_eq!(camel_case("my-template-name"), "myTemplateName");
    }

    #[test]
    fn test_camel_case_lowercases_first() {
        assert_eq!(camel_case("My-Big-Template"), "myBigTemplate");
        assert_eq!(camel_case("README"), "readme");
    }

    #[test]
    fn test_camel_case_without_dashes() {
        assert_eq!(camel_case("header"), "header");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn test_camel_case_edge_dashes() {
        assert_eq!(camel_case("trailing-"), "trailing-");
        assert_eq!(camel_case("-lead"), "Lead");
        assert_eq!(camel_case("a--b"), "a-b");
    }

    #[test]
    fn test_camel_case_is_stable_for_dashed_input() {
        let once = camel_case("already-camel");
        assert_eq!(once, "alreadyCamel");
        assert_eq!(camel_case("already-camel"), once);
    }

    #[test]
    fn test_expand_three_segments() {
        let exp = expand_namespace("APP.theme.render").unwrap();
        assert_eq!(exp.init, "APP.theme = APP.theme || {};\n");
        assert_eq!(exp.target, "APP.theme.render = ");
    }

    #[test]
    fn test_expand_deep_path() {
        let exp = expand_namespace("A.b.c.d").unwrap();
        assert_eq!(exp.prefix(), "A.b = A.b || {};\nA.b.c = A.b.c || {};\nA.b.c.d = ");
    }

    #[test]
    fn test_expand_two_segments_needs_no_init() {
        let exp = expand_namespace("APP.render").unwrap();
        assert_eq!(exp.init, "");
        assert_eq!(exp.target, "APP.render = ");
    }

    #[test]
    fn test_expand_single_segment() {
        let exp = expand_namespace("render").unwrap();
        assert_eq!(exp.prefix(), "render = ");
    }

    #[test]
    fn test_sibling_expansions_never_reset_containers() {
        let c = expand_namespace("A.B.c").unwrap();
        let d = expand_namespace("A.B.d").unwrap();
        // both guard the shared container instead of assigning a fresh object
        assert_eq!(c.init, "A.B = A.B || {};\n");
        assert_eq!(d.init, c.init);
        assert!(!c.init.contains("= {}"));
        assert_eq!(d.target, "A.B.d = ");
    }

    #[test]
    fn test_expand_rejects_empty_segments() {
        assert!(matches!(
            expand_namespace(""),
            Err(CompileError::InvalidNamespace { .. })
        ));
        assert!(expand_namespace("APP..x").is_err());
        assert!(expand_namespace(".x").is_err());
        assert!(expand_namespace("x.").is_err());
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("APP", "a.b"), "APP.a.b");
        assert_eq!(join_path("", "a"), "a");
        assert_eq!(join_path("APP", ""), "APP");
    }
}
