//! Narrow capability traits implemented by [`Block`].
//!
//! Collaborators that only need one facet of a block (say, its type tag for
//! dispatch) can take `&impl Typed` instead of the whole entity.

use crate::codec::BlockMap;
use crate::error::BlockError;

use super::block::{Block, Parameters};

pub trait Identified {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: impl Into<String>)
    where
        Self: Sized;
}

pub trait Typed {
    /// The free-form type tag. Empty means untyped.
    fn block_type(&self) -> &str;
    fn set_block_type(&mut self, block_type: impl Into<String>)
    where
        Self: Sized;
}

pub trait Contented {
    fn content(&self) -> &str;
    fn set_content(&mut self, content: impl Into<String>)
    where
        Self: Sized;
}

pub trait Parameterized {
    fn parameters(&self) -> &Parameters;

    /// Replace the whole bag.
    fn set_parameters(&mut self, parameters: Parameters);

    /// Value for `key`, or `""` when absent.
    fn parameter(&self, key: &str) -> &str {
        self.parameters().get(key).map(String::as_str).unwrap_or("")
    }

    fn has_parameter(&self, key: &str) -> bool {
        self.parameters().contains_key(key)
    }

    fn set_parameter(&mut self, key: impl Into<String>, value: impl Into<String>)
    where
        Self: Sized;

    fn remove_parameter(&mut self, key: &str) -> Option<String>;
}

pub trait Nested {
    fn children(&self) -> &[Block];

    /// Replace the whole ordered child sequence.
    fn set_children(&mut self, children: Vec<Block>);

    fn add_child(&mut self, child: Block);

    fn add_children(&mut self, children: impl IntoIterator<Item = Block>)
    where
        Self: Sized;
}

pub trait BlockSerialize {
    fn to_map(&self) -> BlockMap;
    fn to_json(&self) -> Result<String, BlockError>;
    fn to_json_pretty(&self) -> Result<String, BlockError>;
}
