//! Codecs for ordered sequences of sibling blocks.

use crate::error::BlockError;
use crate::models::Block;

use super::json::{BlockJsonObject, parse_bounded};
use super::map::{BlockMap, DEFAULT_MAX_DEPTH, block_from_map, block_to_map, convert_at};

pub fn blocks_to_json(blocks: &[Block]) -> Result<String, BlockError> {
    let objects: Vec<BlockJsonObject<'_>> = blocks.iter().map(BlockJsonObject::from).collect();
    Ok(serde_json::to_string(&objects)?)
}

pub fn blocks_to_json_pretty(blocks: &[Block]) -> Result<String, BlockError> {
    let objects: Vec<BlockJsonObject<'_>> = blocks.iter().map(BlockJsonObject::from).collect();
    Ok(serde_json::to_string_pretty(&objects)?)
}

/// Parse a JSON array of blocks. The first element that fails conversion
/// fails the whole call; its index leads the reported field path.
pub fn blocks_from_json(json: &str) -> Result<Vec<Block>, BlockError> {
    blocks_from_json_with_max_depth(json, DEFAULT_MAX_DEPTH)
}

pub fn blocks_from_json_with_max_depth(
    json: &str,
    max_depth: usize,
) -> Result<Vec<Block>, BlockError> {
    let maps: Vec<BlockMap> = parse_bounded(json, max_depth, 1)?;
    maps.iter()
        .enumerate()
        .map(|(index, map)| convert_at(map, &format!("[{index}]"), max_depth))
        .collect()
}

pub fn blocks_from_map(maps: &[BlockMap]) -> Vec<Block> {
    maps.iter().map(block_from_map).collect()
}

pub fn blocks_to_map(blocks: &[Block]) -> Vec<BlockMap> {
    blocks.iter().map(block_to_map).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockBuilder, Identified};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn siblings() -> Vec<Block> {
        vec![
            BlockBuilder::new()
                .with_id("a")
                .with_type("heading")
                .with_parameter("level", "1")
                .build(),
            BlockBuilder::new()
                .with_id("b")
                .with_type("list")
                .with_child(BlockBuilder::new().with_id("b1").with_type("item").build())
                .build(),
            BlockBuilder::new().with_id("c").with_type("footer").build(),
        ]
    }

    #[test]
    fn test_blocks_to_json_preserves_order() {
        let json = blocks_to_json(&siblings()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let ids: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(blocks_to_json(&[]).unwrap(), "[]");
        assert_eq!(blocks_from_json("[]").unwrap(), Vec::<Block>::new());
    }

    #[test]
    fn test_round_trip() {
        let blocks = siblings();
        let json = blocks_to_json(&blocks).unwrap();
        assert_eq!(blocks_from_json(&json).unwrap(), blocks);

        let pretty = blocks_to_json_pretty(&blocks).unwrap();
        assert_eq!(blocks_from_json(&pretty).unwrap(), blocks);
    }

    #[test]
    fn test_one_bad_element_fails_the_sequence() {
        let err = blocks_from_json(
            r#"[{"id":"a","type":"t"},{"id":"b","type":"t","children":[{"id":"b1"}]}]"#,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "[1].children[0].type not found");
    }

    #[test]
    fn test_non_array_is_malformed() {
        assert!(matches!(
            blocks_from_json(r#"{"id":"a","type":"t"}"#),
            Err(BlockError::MalformedInput(_))
        ));
        assert!(matches!(
            blocks_from_json(r#"[{"id":"a","type":"t"}, 3]"#),
            Err(BlockError::MalformedInput(_))
        ));
    }

    fn chain(levels: usize) -> Block {
        let mut block = BlockBuilder::new().with_id("leaf").with_type("t").build();
        for level in 1..levels {
            block = BlockBuilder::new()
                .with_id(format!("n{level}"))
                .with_type("t")
                .with_child(block)
                .build();
        }
        block
    }

    #[test]
    fn test_tree_at_default_limit_round_trips() {
        let blocks = vec![siblings().remove(0), chain(DEFAULT_MAX_DEPTH)];
        let json = blocks_to_json(&blocks).unwrap();
        assert_eq!(blocks_from_json(&json).unwrap(), blocks);
    }

    #[test]
    fn test_one_level_past_default_limit_names_the_element() {
        let blocks = vec![siblings().remove(0), chain(DEFAULT_MAX_DEPTH + 1)];
        let json = blocks_to_json_pretty(&blocks).unwrap();

        let err = blocks_from_json(&json).unwrap_err();
        let expected = format!("[1].{}", vec!["children[0]"; DEFAULT_MAX_DEPTH].join("."));
        match err {
            BlockError::DepthExceeded { location, .. } => assert_eq!(location, expected),
            other => panic!("expected DepthExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_far_past_limit_is_depth_error_not_syntax_error() {
        let json = blocks_to_json(&[chain(DEFAULT_MAX_DEPTH + 10)]).unwrap();
        assert!(matches!(
            blocks_from_json(&json),
            Err(BlockError::DepthExceeded { .. })
        ));
    }

    #[test]
    fn test_map_level_round_trip() {
        let blocks = siblings();
        let maps = blocks_to_map(&blocks);
        assert_eq!(maps.len(), 3);
        assert_eq!(blocks_from_map(&maps), blocks);
    }

    #[test]
    fn test_blocks_from_map_never_fails() {
        let maps: Vec<BlockMap> = vec![
            json!({"id": "x"}).as_object().unwrap().clone(),
            json!({"type": 3, "children": "no"}).as_object().unwrap().clone(),
        ];

        let blocks = blocks_from_map(&maps);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].id(), "x");
        assert_eq!(blocks[1].id(), "");
    }
}
