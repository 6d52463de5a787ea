//! Recommendation Serving Core Library
//!
//! Provides the in-memory ranked indexes and the request-time algorithms used
//! to serve personalized item lists.
//!
//! # Architecture
//!
//! This crate defines:
//! - Immutable indexes (`SimilarityIndex`, `RecommendationIndex`) built once from snapshots
//! - Recommenders (`OfflineRecommender`, `OnlineCandidateGenerator`, `Blender`)
//! - The `EventHistoryProvider` collaborator trait and an in-memory implementation
//! - The service lifecycle gate (`Uninitialized -> Loading -> Ready -> Draining`)
//! - Error types, configuration and result aliases
//!
//! # Example
//!
//! ```
//! use recserve_core::recommend::blend;
//!
//! let blended = blend(&[1, 2, 3, 4], &[5, 6], 10);
//! assert_eq!(blended, vec![1, 6, 3, 4]);
//! ```

pub mod config;
pub mod dedup;
pub mod error;
pub mod index;
pub mod lifecycle;
pub mod recommend;
pub mod service;
pub mod snapshot;
pub mod stubs;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use config::ServingConfig;
pub use dedup::dedup_ids;
pub use error::{ConfigError, LoadError, ServingError, ServingResult};
pub use index::{RecommendationIndex, SimilarityIndex};
pub use lifecycle::{Lifecycle, ServiceState};
pub use recommend::{blend, Blender, OfflineRecommender, OnlineCandidateGenerator};
pub use service::RecommendationService;
pub use types::{ItemId, Neighbor, UserId};
