use std::fmt;
use std::sync::Arc;

use crate::id::{IdProvider, UuidProvider};

use super::block::{Block, Parameters};

/// Fluent accumulator for [`Block`]s.
///
/// `build` clones the accumulated fields, so a builder can stamp out any
/// number of independent blocks. When no id was supplied each built block
/// gets a fresh one from the id provider.
#[derive(Clone)]
pub struct BlockBuilder {
    id: Option<String>,
    block_type: String,
    content: String,
    parameters: Parameters,
    children: Vec<Block>,
    id_provider: Arc<dyn IdProvider>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            block_type: String::new(),
            content: String::new(),
            parameters: Parameters::new(),
            children: vec![],
            id_provider: Arc::new(UuidProvider),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_type(mut self, block_type: impl Into<String>) -> Self {
        self.block_type = block_type.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    pub fn with_child(mut self, child: Block) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_id_provider(mut self, provider: Arc<dyn IdProvider>) -> Self {
        self.id_provider = provider;
        self
    }

    pub fn build(&self) -> Block {
        let id = match &self.id {
            Some(id) => id.clone(),
            None => self.id_provider.next_id(),
        };

        Block::from_parts(
            id,
            self.block_type.clone(),
            self.content.clone(),
            self.parameters.clone(),
            self.children.clone(),
        )
    }
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BlockBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockBuilder")
            .field("id", &self.id)
            .field("block_type", &self.block_type)
            .field("content", &self.content)
            .field("parameters", &self.parameters)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
