//! JSON text form of a block tree.
//!
//! Blocks are never serialized directly. They are first projected onto
//! [`BlockJsonObject`], whose field order (`id`, `type`, `content`,
//! `parameters`, `children`) is the wire shape, so internal field layout
//! can change without touching the format.
//!
//! Decoding lifts serde_json's fixed recursion limit so that any configured
//! `max_depth` can be honoured. Nesting is bounded by a scan of the text
//! before parsing instead.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::BlockError;
use crate::models::{Block, Contented, Identified, Nested, Parameterized, Parameters, Typed};

use super::map::{BlockMap, DEFAULT_MAX_DEPTH, convert_map_to_block_with_max_depth};

/// Canonical serialization shape of one block.
#[derive(Debug, Serialize)]
pub(crate) struct BlockJsonObject<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    block_type: &'a str,
    content: &'a str,
    parameters: &'a Parameters,
    children: Vec<BlockJsonObject<'a>>,
}

impl<'a> From<&'a Block> for BlockJsonObject<'a> {
    fn from(block: &'a Block) -> Self {
        Self {
            id: block.id(),
            block_type: block.block_type(),
            content: block.content(),
            parameters: block.parameters(),
            children: block.children().iter().map(BlockJsonObject::from).collect(),
        }
    }
}

pub fn block_to_json(block: &Block) -> Result<String, BlockError> {
    Ok(serde_json::to_string(&BlockJsonObject::from(block))?)
}

/// Same shape as [`block_to_json`], indented by two spaces.
pub fn block_to_json_pretty(block: &Block) -> Result<String, BlockError> {
    Ok(serde_json::to_string_pretty(&BlockJsonObject::from(block))?)
}

/// Parse a JSON object and strictly convert it into a block tree.
pub fn block_from_json(json: &str) -> Result<Block, BlockError> {
    block_from_json_with_max_depth(json, DEFAULT_MAX_DEPTH)
}

pub fn block_from_json_with_max_depth(json: &str, max_depth: usize) -> Result<Block, BlockError> {
    let map: BlockMap = parse_bounded(json, max_depth, 0)?;
    convert_map_to_block_with_max_depth(&map, max_depth)
}

/// Parse `json` once its container nesting is known to fit `max_depth`
/// blocks, plus `outer` enclosing levels.
///
/// Each block level takes two JSON levels (the block object, then its
/// `parameters` or `children`). One block level past the limit still parses
/// so the strict conversion can name its path.
pub(crate) fn parse_bounded<T: DeserializeOwned>(
    json: &str,
    max_depth: usize,
    outer: usize,
) -> Result<T, BlockError> {
    let limit = max_depth
        .saturating_add(1)
        .saturating_mul(2)
        .saturating_add(outer);
    check_nesting(json, limit, max_depth)?;

    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let value: T = serde::Deserialize::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

fn check_nesting(json: &str, limit: usize, max_depth: usize) -> Result<(), BlockError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in json.bytes().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > limit {
                    return Err(BlockError::DepthExceeded {
                        location: text_position(json, offset),
                        max_depth,
                    });
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

fn text_position(json: &str, offset: usize) -> String {
    let before = &json[..offset];
    let line = before.matches('\n').count() + 1;
    let column = offset - before.rfind('\n').map_or(0, |newline| newline + 1) + 1;
    format!("line {line}, column {column}")
}
