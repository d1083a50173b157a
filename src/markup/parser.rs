//! Line-oriented parser for generated study text.
//!
//! Each line is classified on its own, then its payload is split into math,
//! bold and plain spans. The parser keeps no state between calls and never
//! fails: unmatched delimiters stay in the output as literal text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::markup::nodes::{BlockNode, InlineSpan};

static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.\s").expect("ORDERED_ITEM is a valid regex pattern"));

// `$` may not appear inside a math span.
static MATH_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[^$]+\$").expect("MATH_SPAN is a valid regex pattern"));

static BOLD_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("BOLD_SPAN is a valid regex pattern"));

pub fn parse(text: &str) -> Vec<BlockNode> {
    text.split('\n').map(parse_line).collect()
}

fn parse_line(line: &str) -> BlockNode {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if let Some(rest) = line.strip_prefix("### ") {
        return heading(3, rest);
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return heading(2, rest);
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return heading(1, rest);
    }
    if line.trim() == "---" {
        return BlockNode::Rule;
    }

    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("• ")) {
        return BlockNode::ListItem {
            ordered: false,
            marker: None,
            spans: tokenize_inline(rest),
        };
    }
    if let Some(caps) = ORDERED_ITEM.captures(line) {
        let marker = caps.get(1).map(|m| m.as_str().to_string());
        let consumed = caps.get(0).map(|m| m.end()).unwrap_or(0);
        return BlockNode::ListItem {
            ordered: true,
            marker,
            spans: tokenize_inline(&line[consumed..]),
        };
    }

    // Whitespace-only lines are paragraphs, not breaks.
    if line.is_empty() {
        return BlockNode::Break;
    }

    BlockNode::Paragraph {
        spans: tokenize_inline(line),
    }
}

fn heading(level: u8, rest: &str) -> BlockNode {
    BlockNode::Heading {
        level,
        spans: tokenize_inline(rest),
    }
}

/// Splits a line payload into spans. Math is matched first so that `**`
/// inside `$...$` is never read as bold.
pub fn tokenize_inline(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for found in MATH_SPAN.find_iter(text) {
        push_bold_and_text(&text[cursor..found.start()], &mut spans);
        let delimited = found.as_str();
        spans.push(InlineSpan::math(&delimited[1..delimited.len() - 1]));
        cursor = found.end();
    }
    push_bold_and_text(&text[cursor..], &mut spans);

    spans
}

fn push_bold_and_text(segment: &str, spans: &mut Vec<InlineSpan>) {
    let mut cursor = 0;

    for caps in BOLD_SPAN.captures_iter(segment) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_text(&segment[cursor..whole.start()], spans);
        spans.push(InlineSpan::bold(inner.as_str()));
        cursor = whole.end();
    }
    push_text(&segment[cursor..], spans);
}

fn push_text(segment: &str, spans: &mut Vec<InlineSpan>) {
    if !segment.is_empty() {
        spans.push(InlineSpan::text(segment));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::nodes::SpanKind;

    fn single_line(text: &str) -> BlockNode {
        let mut nodes = parse(text);
        assert_eq!(nodes.len(), 1, "expected one node for {:?}", text);
        nodes.remove(0)
    }

    #[test]
    fn math_span_strips_delimiters() {
        let node = single_line("$x^2$");
        assert_eq!(node.spans(), &[InlineSpan::math("x^2")]);
    }

    #[test]
    fn bold_span_strips_delimiters() {
        let node = single_line("**bold**");
        assert_eq!(node.spans(), &[InlineSpan::bold("bold")]);
    }

    #[test]
    fn bold_markers_inside_math_are_not_tokenized() {
        let node = single_line("$a**b**c$");
        assert_eq!(node.spans(), &[InlineSpan::math("a**b**c")]);
    }

    #[test]
    fn heading_levels_follow_precedence() {
        assert_eq!(
            single_line("## Title"),
            BlockNode::Heading {
                level: 2,
                spans: vec![InlineSpan::text("Title")]
            }
        );
        assert!(matches!(single_line("### Deep"), BlockNode::Heading { level: 3, .. }));
        assert!(matches!(single_line("# Top"), BlockNode::Heading { level: 1, .. }));
        assert!(matches!(single_line("#NoSpace"), BlockNode::Paragraph { .. }));
    }

    #[test]
    fn rule_and_break_lines() {
        assert_eq!(single_line("  ---  "), BlockNode::Rule);
        assert_eq!(single_line(""), BlockNode::Break);
        assert_eq!(
            single_line("   "),
            BlockNode::Paragraph {
                spans: vec![InlineSpan::text("   ")]
            }
        );
    }

    #[test]
    fn indented_markers_are_paragraphs() {
        assert_eq!(
            single_line("  - item"),
            BlockNode::Paragraph {
                spans: vec![InlineSpan::text("  - item")]
            }
        );
        assert_eq!(single_line("\t1. step").plain_text(), "\t1. step");
    }

    #[test]
    fn unordered_list_markers() {
        for line in ["- Photosynthesis", "• Photosynthesis"] {
            assert_eq!(
                single_line(line),
                BlockNode::ListItem {
                    ordered: false,
                    marker: None,
                    spans: vec![InlineSpan::text("Photosynthesis")]
                }
            );
        }
    }

    #[test]
    fn ordered_list_captures_number() {
        assert_eq!(
            single_line("12. Factorise **first**"),
            BlockNode::ListItem {
                ordered: true,
                marker: Some("12".to_string()),
                spans: vec![InlineSpan::text("Factorise "), InlineSpan::bold("first")]
            }
        );
        assert!(matches!(single_line("3.14 is pi"), BlockNode::Paragraph { .. }));
    }

    #[test]
    fn mixed_inline_content_keeps_order() {
        let node = single_line("If $a=2$ then **double** it: $2a$.");
        let kinds: Vec<SpanKind> = node.spans().iter().map(|s| s.kind).collect();

        assert_eq!(
            kinds,
            vec![
                SpanKind::Text,
                SpanKind::Math,
                SpanKind::Text,
                SpanKind::Bold,
                SpanKind::Text,
                SpanKind::Math,
                SpanKind::Text
            ]
        );
        assert_eq!(node.plain_text(), "If a=2 then double it: 2a.");
    }

    #[test]
    fn unterminated_delimiters_are_literal_text() {
        assert_eq!(
            single_line("costs $5 today"),
            BlockNode::Paragraph {
                spans: vec![InlineSpan::text("costs $5 today")]
            }
        );
        assert_eq!(
            single_line("**not closed"),
            BlockNode::Paragraph {
                spans: vec![InlineSpan::text("**not closed")]
            }
        );
        assert_eq!(single_line("$$").plain_text(), "$$");
    }

    #[test]
    fn every_non_delimiter_character_survives() {
        let cases = [
            ("plain words", "plain words"),
            ("a $b$ c **d** e", "a b c d e"),
            ("odd $ dollar and ** stars", "odd $ dollar and ** stars"),
            ("$open **bold** close", "$open bold close"),
            ("**x** $y$ **z", "x y **z"),
            ("ünïcödé $α+β$ **γ**", "ünïcödé α+β γ"),
        ];

        for (input, expected) in cases {
            assert_eq!(single_line(input).plain_text(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn recovered_text_is_a_subsequence_of_the_input() {
        let input = "odd $ dollar, $m**a**th$ and **bo$ld** end";
        let recovered: String = tokenize_inline(input)
            .into_iter()
            .map(|span| span.content)
            .collect();

        let mut source = input.chars();
        assert!(recovered.chars().all(|c| source.any(|s| s == c)));
        let removed = input.chars().count() - recovered.chars().count();
        assert!(input.chars().filter(|c| *c == '$' || *c == '*').count() >= removed);
    }

    #[test]
    fn multi_line_input_yields_one_node_per_line() {
        let nodes = parse("# Algebra\n\nIntro line\n- point\n---\n1. step");

        assert_eq!(nodes.len(), 6);
        assert!(matches!(nodes[0], BlockNode::Heading { level: 1, .. }));
        assert_eq!(nodes[1], BlockNode::Break);
        assert!(matches!(nodes[2], BlockNode::Paragraph { .. }));
        assert!(matches!(nodes[3], BlockNode::ListItem { ordered: false, .. }));
        assert_eq!(nodes[4], BlockNode::Rule);
        assert!(matches!(nodes[5], BlockNode::ListItem { ordered: true, .. }));
    }

    #[test]
    fn whole_documents_keep_every_non_delimiter_character() {
        let text = "# Title\n   \n  - nested\n\t2. tabbed\n- **key** $k$\n3. done\n\nplain $x$ text";
        let expected = [
            "Title",
            "   ",
            "  - nested",
            "\t2. tabbed",
            "key k",
            "done",
            "",
            "plain x text",
        ];

        let recovered: Vec<String> = parse(text).iter().map(BlockNode::plain_text).collect();
        assert_eq!(recovered, expected);
    }

    #[test]
    fn carriage_returns_are_line_terminators() {
        let nodes = parse("## Title\r\nbody\r");
        assert_eq!(nodes[0].plain_text(), "Title");
        assert_eq!(nodes[1].plain_text(), "body");
    }

    #[test]
    fn reparsing_is_deterministic() {
        let text = "## Cells\nThe **nucleus** holds $DNA$.";
        assert_eq!(parse(text), parse(text));
    }
}
