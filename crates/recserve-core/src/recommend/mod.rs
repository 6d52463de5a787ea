//! Request-time recommenders.
//!
//! - [`OfflineRecommender`]: precomputed per-user ranking with global fallback
//! - [`OnlineCandidateGenerator`]: similarity fan-out over recent events
//! - [`Blender`]: concurrent offline + online, merged with [`blend`]

mod blend;
mod offline;
mod online;


pub use blend::{blend, Blender};
pub use offline::OfflineRecommender;
pub use online::OnlineCandidateGenerator;
