use blocktree_engine::{
    Block, BlockError, BlockSerialize, block_from_json_with_max_depth,
    blocks_from_json_with_max_depth, blocks_to_json, blocks_to_json_pretty,
};

/// A block document on disk: either one root block or a list of siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Single(Block),
    Many(Vec<Block>),
}

impl Document {
    pub fn parse(text: &str, max_depth: usize) -> Result<Self, BlockError> {
        if text.trim_start().starts_with('[') {
            blocks_from_json_with_max_depth(text, max_depth).map(Document::Many)
        } else {
            block_from_json_with_max_depth(text, max_depth).map(Document::Single)
        }
    }

    pub fn roots(&self) -> &[Block] {
        match self {
            Document::Single(block) => std::slice::from_ref(block),
            Document::Many(blocks) => blocks,
        }
    }

    /// Total number of blocks, roots included.
    pub fn block_count(&self) -> usize {
        self.roots()
            .iter()
            .map(|root| 1 + root.descendant_count())
            .sum()
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, BlockError> {
        match (self, pretty) {
            (Document::Single(block), true) => block.to_json_pretty(),
            (Document::Single(block), false) => block.to_json(),
            (Document::Many(blocks), true) => blocks_to_json_pretty(blocks),
            (Document::Many(blocks), false) => blocks_to_json(blocks),
        }
    }
}
