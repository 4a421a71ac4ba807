//! # Block codecs
//!
//! - **`map`**: block tree ⇄ generic nested map (`serde_json::Map`), with a
//!   permissive path for programmatic construction and a strict path for
//!   untrusted input
//! - **`json`**: block tree ⇄ JSON text through a canonical serialization shape
//! - **`collection`**: the same conversions applied to ordered sibling lists
//!
//! ## Key Invariants
//!
//! - `parameters` and `children` are always emitted, as `{}` / `[]` when empty
//! - Child order is preserved through every conversion
//! - Strict conversion either yields a whole tree or an error, never a partial tree

pub mod collection;
pub mod json;
pub mod map;

pub use collection::{
    blocks_from_json, blocks_from_json_with_max_depth, blocks_from_map, blocks_to_json,
    blocks_to_json_pretty, blocks_to_map,
};
pub use json::{
    block_from_json, block_from_json_with_max_depth, block_to_json, block_to_json_pretty,
};
pub use map::{
    BlockMap, DEFAULT_MAX_DEPTH, block_from_map, block_from_map_with_children, block_to_map,
    convert_map_to_block, convert_map_to_block_with_max_depth, map_to_block_map,
    map_to_block_map_with_max_depth,
};
