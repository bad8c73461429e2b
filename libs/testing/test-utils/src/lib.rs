//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for all domain crates:
//! - `TestStorage`: temporary storage slot with automatic cleanup
//! - `TestDataBuilder`: Deterministic test data generation
//! - `assertions`: Custom assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestStorage};
//!
//! let storage = TestStorage::new();
//! let builder = TestDataBuilder::from_test_name("my_test");
//!
//! let name = builder.task_name("main");
//! let steps = builder.subtask_texts(3);
//! ```

mod storage;

pub use storage::TestStorage;

/// Builder for test data with deterministic values
///
/// This ensures tests are reproducible: the same seed always yields the same
/// names and texts.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// This is the recommended way to create a builder for consistent test data.
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_task");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a unique task name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.task_name("main"), "test-task-7-main");
    /// ```
    pub fn task_name(&self, suffix: &str) -> String {
        format!("test-task-{}-{}", self.seed, suffix)
    }

    /// `count` verb-first subtask texts, distinct within the list
    pub fn subtask_texts(&self, count: usize) -> Vec<String> {
        const VERBS: [&str; 5] = ["Book", "Pack", "Call", "Write", "Review"];

        (0..count)
            .map(|i| {
                let verb = VERBS[(self.seed as usize).wrapping_add(i) % VERBS.len()];
                format!("{} item {}-{}", verb, self.seed, i)
            })
            .collect()
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a JSON value is an array of `len` elements
    pub fn assert_json_array_len(value: &serde_json::Value, len: usize, context: &str) {
        let items = value
            .as_array()
            .unwrap_or_else(|| panic!("{}: expected JSON array, got {}", context, value));
        assert_eq!(
            items.len(),
            len,
            "{}: expected {} elements, got {}",
            context,
            len,
            items.len()
        );
    }
}
