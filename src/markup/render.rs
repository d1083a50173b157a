use serde::Serialize;
use thiserror::Error;

use crate::markup::nodes::{BlockNode, InlineSpan, SpanKind};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Cannot typeset '{latex}': {reason}")]
pub struct TypesetError {
    pub latex: String,
    pub reason: String,
}

/// External LaTeX renderer used by the presentation layer.
pub trait MathTypesetter: Send + Sync {
    fn typeset(&self, latex: &str) -> Result<String, TypesetError>;
}

/// Inline content after math has been handed to the typesetter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum RenderedInline {
    Text(String),
    Bold(String),
    Math(String),
    /// Math the typesetter rejected, shown as code-styled literal source.
    Code(String),
}

pub fn render_span(span: &InlineSpan, typesetter: &dyn MathTypesetter) -> RenderedInline {
    match span.kind {
        SpanKind::Text => RenderedInline::Text(span.content.clone()),
        SpanKind::Bold => RenderedInline::Bold(span.content.clone()),
        SpanKind::Math => match typesetter.typeset(&span.content) {
            Ok(rendered) => RenderedInline::Math(rendered),
            Err(err) => {
                log::debug!("Falling back to literal math: {}", err);
                RenderedInline::Code(span.content.clone())
            }
        },
    }
}

pub fn render_block(block: &BlockNode, typesetter: &dyn MathTypesetter) -> Vec<RenderedInline> {
    block
        .spans()
        .iter()
        .map(|span| render_span(span, typesetter))
        .collect()
}
