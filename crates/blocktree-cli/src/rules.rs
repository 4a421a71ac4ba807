use std::collections::BTreeSet;

use blocktree_config::{Config, TypeRule};
use blocktree_engine::{Block, BlockValidator, Contented, Nested, Parameterized, ValidationError};

/// Build a registry holding one validator per configured block type.
pub fn registry_from_config(config: &Config) -> BlockValidator {
    let registry = BlockValidator::new();
    let block_types: BTreeSet<&str> = config
        .rules
        .iter()
        .map(|rule| rule.block_type.as_str())
        .collect();

    for block_type in block_types {
        let Some(rule) = config.rule_for(block_type) else {
            continue;
        };
        let checked = rule.clone();
        registry.add(block_type, move |block: &Block| check_rule(&checked, block));
    }
    log::debug!("registered {} rule(s)", registry.len());
    registry
}

fn check_rule(rule: &TypeRule, block: &Block) -> Result<(), ValidationError> {
    let missing: Vec<&str> = rule
        .required_parameters
        .iter()
        .filter(|key| !block.has_parameter(key))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::new(format!(
            "{} block is missing parameter(s): {}",
            rule.block_type,
            missing.join(", ")
        )));
    }

    if !rule.allow_children && !block.children().is_empty() {
        return Err(ValidationError::new(format!(
            "{} block must not have children",
            rule.block_type
        )));
    }

    if rule.require_content && block.content().is_empty() {
        return Err(ValidationError::new(format!(
            "{} block requires content",
            rule.block_type
        )));
    }

    Ok(())
}
