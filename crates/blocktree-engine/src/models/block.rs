use std::collections::BTreeMap;

use crate::codec::{self, BlockMap};
use crate::error::BlockError;
use crate::id::{IdProvider, UuidProvider};

use super::capabilities::{
    BlockSerialize, Contented, Identified, Nested, Parameterized, Typed,
};

/// String-keyed parameter bag. Ordered so serialization is deterministic.
pub type Parameters = BTreeMap<String, String>;

/// A node in a block tree.
///
/// A block exclusively owns its children; the tree has no back references
/// and no node appears in two places. Equality is structural over every
/// field, recursively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    id: String,
    block_type: String,
    content: String,
    parameters: Parameters,
    children: Vec<Block>,
}

impl Block {
    /// Create an untyped block with a freshly generated id.
    pub fn new() -> Self {
        Self::with_id_provider(&UuidProvider)
    }

    /// Create an untyped block whose id comes from `provider`.
    pub fn with_id_provider(provider: &dyn IdProvider) -> Self {
        Self {
            id: provider.next_id(),
            ..Self::empty()
        }
    }

    /// Create a block with every field empty, without generating an id.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        id: String,
        block_type: String,
        content: String,
        parameters: Parameters,
        children: Vec<Block>,
    ) -> Self {
        Self {
            id,
            block_type,
            content,
            parameters,
            children,
        }
    }

    pub fn children_mut(&mut self) -> &mut Vec<Block> {
        &mut self.children
    }

    /// Visit this block and every descendant depth-first, parents before
    /// children, passing the depth of each (the receiver is depth 0).
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Block, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a Block, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }

    /// Number of blocks below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Height of the tree rooted here; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Block::depth).max().unwrap_or(0)
    }

    /// First block with `id` in pre-order, including the receiver.
    pub fn find(&self, id: &str) -> Option<&Block> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

impl Identified for Block {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }
}

impl Typed for Block {
    fn block_type(&self) -> &str {
        &self.block_type
    }

    fn set_block_type(&mut self, block_type: impl Into<String>) {
        self.block_type = block_type.into();
    }
}

impl Contented for Block {
    fn content(&self) -> &str {
        &self.content
    }

    fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }
}

impl Parameterized for Block {
    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn set_parameters(&mut self, parameters: Parameters) {
        self.parameters = parameters;
    }

    fn set_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(key.into(), value.into());
    }

    fn remove_parameter(&mut self, key: &str) -> Option<String> {
        self.parameters.remove(key)
    }
}

impl Nested for Block {
    fn children(&self) -> &[Block] {
        &self.children
    }

    fn set_children(&mut self, children: Vec<Block>) {
        self.children = children;
    }

    fn add_child(&mut self, child: Block) {
        self.children.push(child);
    }

    fn add_children(&mut self, children: impl IntoIterator<Item = Block>) {
        self.children.extend(children);
    }
}

impl BlockSerialize for Block {
    fn to_map(&self) -> BlockMap {
        codec::block_to_map(self)
    }

    fn to_json(&self) -> Result<String, BlockError> {
        codec::block_to_json(self)
    }

    fn to_json_pretty(&self) -> Result<String, BlockError> {
        codec::block_to_json_pretty(self)
    }
}
