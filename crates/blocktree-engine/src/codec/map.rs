//! Conversion between [`Block`] trees and the untyped map form.
//!
//! Two entry points exist on purpose:
//!
//! - **Permissive** (`block_from_map`, `block_from_map_with_children`): for
//!   programmatic construction. Never fails; missing or mistyped fields fall
//!   back to empty values.
//! - **Strict** (`map_to_block_map`, `convert_map_to_block`): for freshly
//!   decoded data of unknown origin. `id` and `type` must be strings, optional
//!   fields must have the right shape, and the first bad descendant aborts the
//!   whole conversion.

use serde_json::Value;

use crate::error::BlockError;
use crate::models::{Block, Contented, Identified, Nested, Parameterized, Parameters, Typed};

/// Generic nested map form of a block.
pub type BlockMap = serde_json::Map<String, Value>;

/// Deepest block nesting accepted by default (the root is level 1).
pub const DEFAULT_MAX_DEPTH: usize = 64;

pub(crate) const ID: &str = "id";
pub(crate) const TYPE: &str = "type";
pub(crate) const CONTENT: &str = "content";
pub(crate) const PARAMETERS: &str = "parameters";
pub(crate) const CHILDREN: &str = "children";

/// Render a block and its subtree as nested maps. `parameters` and `children`
/// are always present, empty when the block has none.
pub fn block_to_map(block: &Block) -> BlockMap {
    let parameters = block
        .parameters()
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    let children = block
        .children()
        .iter()
        .map(|child| Value::Object(block_to_map(child)))
        .collect();

    let mut map = BlockMap::new();
    map.insert(ID.into(), Value::String(block.id().to_string()));
    map.insert(TYPE.into(), Value::String(block.block_type().to_string()));
    map.insert(CONTENT.into(), Value::String(block.content().to_string()));
    map.insert(PARAMETERS.into(), Value::Object(parameters));
    map.insert(CHILDREN.into(), Value::Array(children));
    map
}

/// Best-effort conversion of a map whose `children` are nested maps.
///
/// Non-string `id`/`type`/`content` become `""`, non-string parameter values
/// are skipped, and child entries that are not maps are dropped. Subtrees
/// nested deeper than [`DEFAULT_MAX_DEPTH`] are cut off.
pub fn block_from_map(map: &BlockMap) -> Block {
    loose_block(map, 1, DEFAULT_MAX_DEPTH)
}

/// Best-effort conversion of a map whose children have already been built.
///
/// Any `children` entry in `map` is ignored in favour of `children`.
pub fn block_from_map_with_children(map: &BlockMap, children: Vec<Block>) -> Block {
    let mut block = Block::empty();
    block.set_id(loose_string(map, ID));
    block.set_block_type(loose_string(map, TYPE));
    block.set_content(loose_string(map, CONTENT));
    block.set_parameters(loose_parameters(map));
    block.set_children(children);
    block
}

fn loose_block(map: &BlockMap, depth: usize, max_depth: usize) -> Block {
    let children = match map.get(CHILDREN) {
        Some(Value::Array(items)) if depth < max_depth => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(child) => Some(loose_block(child, depth + 1, max_depth)),
                other => {
                    log::warn!("skipping non-map child entry: {other}");
                    None
                }
            })
            .collect(),
        Some(Value::Array(items)) if !items.is_empty() => {
            log::warn!("dropping children nested deeper than {max_depth} levels");
            vec![]
        }
        _ => vec![],
    };

    block_from_map_with_children(map, children)
}

fn loose_string(map: &BlockMap, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn loose_parameters(map: &BlockMap) -> Parameters {
    match map.get(PARAMETERS) {
        Some(Value::Object(entries)) => entries
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
            .collect(),
        _ => Parameters::new(),
    }
}

/// Validate and normalize an untyped map.
///
/// The result always carries `id`, `type`, `content`, `parameters` (an object
/// of strings) and `children` (an array of normalized maps). The input is
/// left untouched.
pub fn map_to_block_map(map: &BlockMap) -> Result<BlockMap, BlockError> {
    map_to_block_map_with_max_depth(map, DEFAULT_MAX_DEPTH)
}

pub fn map_to_block_map_with_max_depth(
    map: &BlockMap,
    max_depth: usize,
) -> Result<BlockMap, BlockError> {
    convert_map_to_block_with_max_depth(map, max_depth).map(|block| block_to_map(&block))
}

/// Strictly convert an untyped map into a block tree.
pub fn convert_map_to_block(map: &BlockMap) -> Result<Block, BlockError> {
    convert_map_to_block_with_max_depth(map, DEFAULT_MAX_DEPTH)
}

pub fn convert_map_to_block_with_max_depth(
    map: &BlockMap,
    max_depth: usize,
) -> Result<Block, BlockError> {
    convert_at(map, "", max_depth)
}

/// Strict conversion with error paths reported relative to `path`.
pub(crate) fn convert_at(
    map: &BlockMap,
    path: &str,
    max_depth: usize,
) -> Result<Block, BlockError> {
    strict_block(map, path, 1, max_depth)
}

fn strict_block(
    map: &BlockMap,
    path: &str,
    depth: usize,
    max_depth: usize,
) -> Result<Block, BlockError> {
    if depth > max_depth {
        let location = if path.is_empty() { "root" } else { path };
        return Err(BlockError::DepthExceeded {
            location: location.to_string(),
            max_depth,
        });
    }
    log::trace!("converting block map at depth {depth}");

    let id = required_string(map, path, ID)?;
    let block_type = required_string(map, path, TYPE)?;
    let content = optional_string(map, path, CONTENT)?;

    let parameters = match map.get(PARAMETERS) {
        None | Some(Value::Null) => Parameters::new(),
        Some(Value::Object(entries)) => {
            let mut parameters = Parameters::new();
            for (key, value) in entries {
                let Value::String(value) = value else {
                    return Err(BlockError::InvalidField {
                        field: field_path(path, &format!("{PARAMETERS}.{key}")),
                        expected: "a string",
                    });
                };
                parameters.insert(key.clone(), value.clone());
            }
            parameters
        }
        Some(_) => {
            return Err(BlockError::InvalidField {
                field: field_path(path, PARAMETERS),
                expected: "an object",
            });
        }
    };

    let children = match map.get(CHILDREN) {
        None | Some(Value::Null) => vec![],
        Some(Value::Array(items)) => {
            let mut children = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let child_path = field_path(path, &format!("{CHILDREN}[{index}]"));
                let Value::Object(child) = item else {
                    return Err(BlockError::InvalidField {
                        field: child_path,
                        expected: "an object",
                    });
                };
                children.push(strict_block(child, &child_path, depth + 1, max_depth)?);
            }
            children
        }
        Some(_) => {
            return Err(BlockError::InvalidField {
                field: field_path(path, CHILDREN),
                expected: "an array",
            });
        }
    };

    Ok(Block::from_parts(id, block_type, content, parameters, children))
}

fn required_string(map: &BlockMap, path: &str, key: &str) -> Result<String, BlockError> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(BlockError::InvalidField {
            field: field_path(path, key),
            expected: "a string",
        }),
        None => Err(BlockError::MissingField {
            field: field_path(path, key),
        }),
    }
}

fn optional_string(map: &BlockMap, path: &str, key: &str) -> Result<String, BlockError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(BlockError::InvalidField {
            field: field_path(path, key),
            expected: "a string",
        }),
    }
}

fn field_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}
