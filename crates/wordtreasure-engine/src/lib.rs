//! WordTreasure Similarity Engine
//!
//! Scores how similar a player's guess is to the round's answer word and
//! produces a natural-language hint describing their relationship.
//!
//! # Architecture
//!
//! Three independent signals feed one score:
//!
//! - **semantic**: embedding cosine similarity (external embedding model)
//! - **relational**: NLI probe battery (external entailment model)
//! - **formative**: jamo-decomposed edit distance (pure CPU)
//!
//! A contradiction battery dampens the combined score multiplicatively, so
//! antonyms do not ride their surface similarity to a high score. The
//! winning relation pattern drives the hint.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use wordtreasure_domain::WordPair;
//! use wordtreasure_engine::{EngineConfig, SimilarityEngine};
//! use wordtreasure_model::{MockEmbeddingProvider, MockEntailmentProvider, NullCategoryProvider};
//!
//! # tokio_test::block_on(async {
//! let engine = SimilarityEngine::new(
//!     EngineConfig::default(),
//!     Arc::new(MockEmbeddingProvider::new(384)),
//!     Arc::new(MockEntailmentProvider::new()),
//!     Arc::new(NullCategoryProvider),
//! )
//! .unwrap();
//!
//! let result = engine.process(&WordPair::new("배신", "배신")).await.unwrap();
//! assert_eq!(result.score, 100.0);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod classifier;
pub mod config;
pub mod error;
pub mod hint;
pub mod jamo;
pub mod pipeline;
pub mod semantic;

// Re-exports for convenience
pub use config::{ConfigError, EngineConfig, Weights};
pub use error::{EngineError, ValidationError};
pub use pipeline::SimilarityEngine;
