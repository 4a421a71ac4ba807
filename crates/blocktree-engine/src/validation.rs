use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{BlockError, ValidationError};
use crate::models::{Block, Identified, Typed};

/// A per-type validation rule.
pub type Validator = Arc<dyn Fn(&Block) -> Result<(), ValidationError> + Send + Sync>;

/// Thread-safe registry mapping block type tags to validators.
///
/// Any number of `validate` calls may run concurrently; `add` and `remove`
/// take the write lock. Validators run after the lock is released.
#[derive(Default)]
pub struct BlockValidator {
    validators: RwLock<HashMap<String, Validator>>,
}

impl BlockValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `validator` for `block_type`, replacing any earlier one.
    pub fn add<F>(&self, block_type: impl Into<String>, validator: F)
    where
        F: Fn(&Block) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        let block_type = block_type.into();
        let mut validators = self
            .validators
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if validators
            .insert(block_type.clone(), Arc::new(validator))
            .is_some()
        {
            log::debug!("replaced validator for block type {block_type:?}");
        } else {
            log::debug!("registered validator for block type {block_type:?}");
        }
    }

    /// Unregister the validator for `block_type`. Returns whether one existed.
    pub fn remove(&self, block_type: &str) -> bool {
        self.validators
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(block_type)
            .is_some()
    }

    pub fn contains(&self, block_type: &str) -> bool {
        self.validators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(block_type)
    }

    pub fn len(&self) -> usize {
        self.validators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run the validator registered for the block's type.
    ///
    /// `None` and blocks whose type has no validator pass. Otherwise the
    /// validator's result is returned unchanged.
    pub fn validate(&self, block: Option<&Block>) -> Result<(), ValidationError> {
        let Some(block) = block else {
            return Ok(());
        };

        let validator = self
            .validators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(block.block_type())
            .cloned();

        match validator {
            Some(validator) => validator(block),
            None => Ok(()),
        }
    }

    /// Validate `root` and every descendant, parents before children.
    /// Stops at the first failure.
    pub fn validate_tree(&self, root: &Block) -> Result<(), BlockError> {
        let mut failure: Option<BlockError> = None;
        root.walk(&mut |block, _| {
            if failure.is_some() {
                return;
            }
            if let Err(source) = self.validate(Some(block)) {
                failure = Some(BlockError::Validation {
                    block_id: block.id().to_string(),
                    source,
                });
            }
        });

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for BlockValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let validators = self
            .validators
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut types: Vec<&String> = validators.keys().collect();
        types.sort();
        f.debug_struct("BlockValidator")
            .field("types", &types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockBuilder, Parameterized};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn typed(block_type: &str) -> Block {
        BlockBuilder::new().with_type(block_type).build()
    }

    #[test]
    fn test_registered_validator_is_invoked() {
        let registry = BlockValidator::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        registry.add("test", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        registry.validate(Some(&typed("test"))).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unregistered_type_passes() {
        let registry = BlockValidator::new();
        registry.add("button", |_| Err(ValidationError::new("never")));

        assert_eq!(registry.validate(Some(&typed("unknown"))), Ok(()));
    }

    #[test]
    fn test_none_block_passes_without_calling_validators() {
        let registry = BlockValidator::new();
        registry.add("", |_| panic!("validator should not run for a missing block"));

        assert_eq!(registry.validate(None), Ok(()));
    }

    #[test]
    fn test_failure_is_returned_verbatim() {
        let registry = BlockValidator::new();
        registry.add("button", |_| Err(ValidationError::new("validation failed")));

        let err = registry.validate(Some(&typed("button"))).unwrap_err();
        assert_eq!(err, ValidationError::new("validation failed"));
    }

    #[test]
    fn test_validator_sees_the_block() {
        let registry = BlockValidator::new();
        registry.add("button", |block: &Block| {
            if block.has_parameter("label") {
                Ok(())
            } else {
                Err(ValidationError::new("label is required"))
            }
        });

        let good = BlockBuilder::new()
            .with_type("button")
            .with_parameter("label", "OK")
            .build();
        assert!(registry.validate(Some(&good)).is_ok());
        assert!(registry.validate(Some(&typed("button"))).is_err());
    }

    #[test]
    fn test_re_registering_replaces_validator() {
        let registry = BlockValidator::new();
        registry.add("t", |_| Err(ValidationError::new("first")));
        registry.add("t", |_| Err(ValidationError::new("second")));

        let err = registry.validate(Some(&typed("t"))).unwrap_err();
        assert_eq!(err.message(), "second");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_failure_does_not_affect_other_blocks() {
        let registry = BlockValidator::new();
        registry.add("bad", |_| Err(ValidationError::new("no")));
        registry.add("good", |_| Ok(()));

        assert!(registry.validate(Some(&typed("bad"))).is_err());
        assert!(registry.validate(Some(&typed("good"))).is_ok());
        assert!(registry.validate(Some(&typed("bad"))).is_err());
    }

    #[test]
    fn test_remove_and_contains() {
        let registry = BlockValidator::new();
        assert!(registry.is_empty());
        registry.add("t", |_| Err(ValidationError::new("no")));
        assert!(registry.contains("t"));

        assert!(registry.remove("t"));
        assert!(!registry.remove("t"));
        assert!(!registry.contains("t"));
        assert!(registry.validate(Some(&typed("t"))).is_ok());
    }

    #[test]
    fn test_validator_may_consult_registry() {
        let registry = Arc::new(BlockValidator::new());
        let inner = Arc::clone(&registry);
        registry.add("outer", move |_| {
            if inner.contains("outer") {
                Ok(())
            } else {
                Err(ValidationError::new("missing"))
            }
        });

        assert!(registry.validate(Some(&typed("outer"))).is_ok());
    }

    #[test]
    fn test_validate_tree_reports_first_failing_descendant() {
        let registry = BlockValidator::new();
        registry.add("leaf", |block: &Block| {
            if block.has_parameter("ok") {
                Ok(())
            } else {
                Err(ValidationError::new("leaf needs ok"))
            }
        });

        let tree = BlockBuilder::new()
            .with_id("root")
            .with_type("page")
            .with_children(vec![
                BlockBuilder::new()
                    .with_id("l1")
                    .with_type("leaf")
                    .with_parameter("ok", "1")
                    .build(),
                BlockBuilder::new().with_id("l2").with_type("leaf").build(),
                BlockBuilder::new().with_id("l3").with_type("leaf").build(),
            ])
            .build();

        let err = registry.validate_tree(&tree).unwrap_err();
        assert_eq!(err.to_string(), "block l2 failed validation: leaf needs ok");
    }

    #[test]
    fn test_concurrent_registration_and_validation() {
        const THREADS: usize = 16;
        let registry = BlockValidator::new();

        std::thread::scope(|scope| {
            for n in 0..THREADS {
                let registry = &registry;
                scope.spawn(move || {
                    let expected = format!("type-{n}");
                    registry.add(format!("type-{n}"), move |block: &Block| {
                        Err(ValidationError::new(format!(
                            "{expected} saw {}",
                            block.block_type()
                        )))
                    });
                });
            }
        });

        assert_eq!(registry.len(), THREADS);

        let validated = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for n in 0..THREADS {
                let registry = &registry;
                let validated = &validated;
                scope.spawn(move || {
                    let block = typed(&format!("type-{n}"));
                    let err = registry.validate(Some(&block)).unwrap_err();
                    assert_eq!(err.message(), format!("type-{n} saw type-{n}"));
                    validated.fetch_add(1, Ordering::SeqCst);
                });
            }
        });

        assert_eq!(validated.load(Ordering::SeqCst), THREADS);
    }
}
