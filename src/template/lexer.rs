//! Tag tokenizer for template source using logos
//!
//! The lexer splits source text into literal runs and tags. A tag starts at
//! `<%` and the callback decides its kind by trying, in precedence order,
//! `<%-` (escape), `<%=` (interpolate) and plain `<%` (evaluate). Each kind
//! needs at least one character of inner text and ends at the first `%>`
//! after it, so tags never nest.

use logos::{Lexer, Logos};

use crate::error::Span;

/// Kind of a template tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<%- expr %>`: value is HTML-escaped
    Escape,
    /// `<%= expr %>`: value inserted verbatim
    Interpolate,
    /// `<% code %>`: code spliced in, no output
    Evaluate,
}

impl TagKind {
    /// Kinds in the order they are tried at a `<%`
    pub const PRECEDENCE: [TagKind; 3] = [TagKind::Escape, TagKind::Interpolate, TagKind::Evaluate];

    /// Marker that follows `<%` for this kind
    pub fn marker(self) -> &'static str {
        match self {
            TagKind::Escape => "-",
            TagKind::Interpolate => "=",
            TagKind::Evaluate => "",
        }
    }

    /// Full opening delimiter
    pub fn open(self) -> &'static str {
        match self {
            TagKind::Escape => "<%-",
            TagKind::Interpolate => "<%=",
            TagKind::Evaluate => "<%",
        }
    }
}

const TAG_START: &str = "<%";
const TAG_END: &str = "%>";

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[token("<%", lex_tag)]
    Tag(TagKind),

    // Anything up to the next '<', or a '<' that does not start a tag
    #[regex(r"[^<]+")]
    #[token("<")]
    Literal,
}

/// Resolve the kind of the tag opened by the `<%` just matched and consume
/// its inner text and closing `%>`
fn lex_tag(lex: &mut Lexer<Token>) -> Option<TagKind> {
    let rest = lex.remainder();
    let (kind, len) = TagKind::PRECEDENCE
        .iter()
        .find_map(|kind| tag_body_len(rest, kind.marker()).map(|len| (*kind, len)))?;
    lex.bump(len);
    Some(kind)
}

/// Length of `marker + inner + "%>"` at the start of `rest`, if the tag closes
fn tag_body_len(rest: &str, marker: &str) -> Option<usize> {
    let body = rest.strip_prefix(marker)?;
    // inner text must be at least one character long
    let first = body.chars().next()?.len_utf8();
    let close = body[first..].find(TAG_END)?;
    Some(marker.len() + first + close + TAG_END.len())
}

/// A piece of template source: literal text or a tag with its inner text
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment<'s> {
    Literal(&'s str),
    Tag { kind: TagKind, code: &'s str, span: Span },
}

/// Result of scanning a template source
#[derive(Debug, Clone, PartialEq)]
pub struct Scan<'s> {
    /// Literal runs and tags in source order, adjacent literals merged
    pub fragments: Vec<Fragment<'s>>,
    /// Offset of a `<%` that never closes; everything from there on is in
    /// the final literal fragment
    pub dangling: Option<usize>,
}

/// Single-pass tag scanner over one template source
///
/// Yields each tag in order together with its span; literal text is whatever
/// lies between consecutive tags. Iteration stops at the end of input or at
/// the first `<%` without a matching `%>`, which is reported through
/// [`TagScanner::dangling`].
pub struct TagScanner<'s> {
    lexer: Lexer<'s, Token>,
    dangling: Option<usize>,
}

/// A tag found by [`TagScanner`]
#[derive(Debug, Clone, PartialEq)]
pub struct TagMatch<'s> {
    pub kind: TagKind,
    pub code: &'s str,
    pub span: Span,
}

impl<'s> TagScanner<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            lexer: Token::lexer(source),
            dangling: None,
        }
    }

    /// Offset of the unterminated `<%`, once the scanner has reached it
    pub fn dangling(&self) -> Option<usize> {
        self.dangling
    }
}

impl<'s> Iterator for TagScanner<'s> {
    type Item = TagMatch<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.dangling.is_some() {
            return None;
        }
        while let Some(token) = self.lexer.next() {
            let span = self.lexer.span();
            match token {
                Ok(Token::Tag(kind)) => {
                    let slice = self.lexer.slice();
                    let code = &slice[kind.open().len()..slice.len() - TAG_END.len()];
                    return Some(TagMatch { kind, code, span });
                }
                Ok(Token::Literal) => continue,
                Err(()) => {
                    debug_assert!(self.lexer.slice().starts_with(TAG_START));
                    self.dangling = Some(span.start);
                    return None;
                }
            }
        }
        None
    }
}

/// Split template source into literal and tag fragments
pub fn scan(source: &str) -> Scan<'_> {
    let mut fragments = Vec::new();
    let mut index = 0;
    let mut scanner = TagScanner::new(source);

    for tag in scanner.by_ref() {
        if tag.span.start > index {
            fragments.push(Fragment::Literal(&source[index..tag.span.start]));
        }
        index = tag.span.end;
        fragments.push(Fragment::Tag {
            kind: tag.kind,
            code: tag.code,
            span: tag.span,
        });
    }

    // an unclosed '<%' cannot be followed by a closed tag, so the rest is literal
    if index < source.len() {
        fragments.push(Fragment::Literal(&source[index..]));
    }

    Scan {
        fragments,
        dangling: scanner.dangling(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(source: &str) -> Vec<(TagKind, &str)> {
        TagScanner::new(source).map(|t| (t.kind, t.code)).collect()
    }

    #[test]
    fn test_three_tag_kinds() {
        assert_eq!(
            tags("<%- a %><%= b %><% c %>"),
            vec![
                (TagKind::Escape, " a "),
                (TagKind::Interpolate, " b "),
                (TagKind::Evaluate, " c "),
            ]
        );
    }

    #[test]
    fn test_tag_spans() {
        let found: Vec<_> = TagScanner::new("ab<%= x %>cd").collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, 2..10);
    }

    #[test]
    fn test_tag_spans_multiple_lines() {
        assert_eq!(
            tags("<% if (a) {\n  b();\n} %>"),
            vec![(TagKind::Evaluate, " if (a) {\n  b();\n} ")]
        );
    }

    #[test]
    fn test_first_end_marker_closes_tag() {
        assert_eq!(
            tags("<%= a %> %> <%= b %>"),
            vec![(TagKind::Interpolate, " a "), (TagKind::Interpolate, " b ")]
        );
    }

    #[test]
    fn test_lone_angle_brackets_are_literal() {
        let result = scan("a < b <p> 100%> c");
        assert_eq!(result.fragments, vec![Fragment::Literal("a < b <p> 100%> c")]);
        assert_eq!(result.dangling, None);
    }

    #[test]
    fn test_inner_text_needs_one_character() {
        // '<%=%>' is not an empty interpolation; it is an evaluate tag holding '='
        assert_eq!(tags("<%=%>"), vec![(TagKind::Evaluate, "=")]);
        // '<%-%>' likewise
        assert_eq!(tags("<%-%>"), vec![(TagKind::Evaluate, "-")]);
    }

    #[test]
    fn test_escape_falls_back_when_it_cannot_close() {
        // after '<%-' the first possible end is at least one char in, which
        // is past the only '%>'; evaluate takes '-' as its inner text
        assert_eq!(tags("<%-%>tail"), vec![(TagKind::Evaluate, "-")]);
    }

    #[test]
    fn test_whitespace_only_tags_pass_through() {
        assert_eq!(tags("<%=  %>"), vec![(TagKind::Interpolate, "  ")]);
    }

    #[test]
    fn test_scan_fragments_in_order() {
        let result = scan("Hi <%= name %>!");
        assert_eq!(
            result.fragments,
            vec![
                Fragment::Literal("Hi "),
                Fragment::Tag {
                    kind: TagKind::Interpolate,
                    code: " name ",
                    span: 3..14,
                },
                Fragment::Literal("!"),
            ]
        );
    }

    #[test]
    fn test_scan_unterminated_tag() {
        let result = scan("a <%= b %> c <% d");
        assert_eq!(result.dangling, Some(13));
        assert_eq!(
            result.fragments.last(),
            Some(&Fragment::Literal(" c <% d"))
        );
    }

    #[test]
    fn test_scan_no_tags() {
        let result = scan("plain text");
        assert_eq!(result.fragments, vec![Fragment::Literal("plain text")]);
        assert!(scan("").fragments.is_empty());
    }

    #[test]
    fn test_multibyte_inner_text() {
        assert_eq!(tags("<%=é%>"), vec![(TagKind::Interpolate, "é")]);
    }
}
