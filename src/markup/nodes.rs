use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Text,
    Bold,
    Math,
}

/// Delimiter-free run of inline content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InlineSpan {
    pub kind: SpanKind,
    pub content: String,
}

impl InlineSpan {
    pub fn text(content: &str) -> Self {
        InlineSpan {
            kind: SpanKind::Text,
            content: content.to_string(),
        }
    }

    pub fn bold(content: &str) -> Self {
        InlineSpan {
            kind: SpanKind::Bold,
            content: content.to_string(),
        }
    }

    pub fn math(content: &str) -> Self {
        InlineSpan {
            kind: SpanKind::Math,
            content: content.to_string(),
        }
    }
}

/// Line-level structural unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockNode {
    Heading {
        level: u8,
        spans: Vec<InlineSpan>,
    },
    Paragraph {
        spans: Vec<InlineSpan>,
    },
    ListItem {
        ordered: bool,
        /// The captured number for ordered items.
        marker: Option<String>,
        spans: Vec<InlineSpan>,
    },
    Rule,
    Break,
}

impl BlockNode {
    pub fn spans(&self) -> &[InlineSpan] {
        match self {
            BlockNode::Heading { spans, .. }
            | BlockNode::Paragraph { spans }
            | BlockNode::ListItem { spans, .. } => spans,
            BlockNode::Rule | BlockNode::Break => &[],
        }
    }

    /// Concatenated span content with all delimiters stripped.
    pub fn plain_text(&self) -> String {
        self.spans().iter().map(|span| span.content.as_str()).collect()
    }
}
