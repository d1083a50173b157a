pub mod document;
pub mod nodes;
pub mod parser;
pub mod render;

pub use document::TutorialDocument;
pub use nodes::{BlockNode, InlineSpan, SpanKind};
pub use parser::parse;
pub use render::{render_block, MathTypesetter, RenderedInline, TypesetError};
