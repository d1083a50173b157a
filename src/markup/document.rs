use crate::markup::nodes::BlockNode;
use crate::markup::parser::parse;

/// Accumulates streamed tutorial fragments and keeps a parsed view of
/// everything received so far.
#[derive(Debug, Default, Clone)]
pub struct TutorialDocument {
    text: String,
    blocks: Vec<BlockNode>,
}

impl TutorialDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment and re-parses the whole accumulated text; a line
    /// split across fragments is only classified once it is complete.
    pub fn append(&mut self, fragment: &str) -> &[BlockNode] {
        self.text.push_str(fragment);
        self.blocks = parse(&self.text);
        &self.blocks
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn blocks(&self) -> &[BlockNode] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.blocks.clear();
    }
}
