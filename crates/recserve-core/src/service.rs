//! Service context.
//!
//! [`RecommendationService`] owns the immutable indexes and the recommenders
//! built on them, and gates every operation on the lifecycle state. The
//! startup routine builds it once; transports share it behind an `Arc`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::ServingConfig;
use crate::error::ServingResult;
use crate::index::{RecommendationIndex, SimilarityIndex};
use crate::lifecycle::{Lifecycle, ServiceState};
use crate::recommend::{Blender, OfflineRecommender, OnlineCandidateGenerator};
use crate::snapshot::{load_default_ranking, load_personal, load_similarity};
use crate::traits::{EventHistoryProvider, SimilaritySource};
use crate::types::{validate_k, ItemId, Neighbor, UserId};

/// The four serving operations over shared, read-only indexes.
#[derive(Debug)]
pub struct RecommendationService {
    lifecycle: Arc<Lifecycle>,
    similarity: Arc<SimilarityIndex>,
    recommendations: Arc<RecommendationIndex>,
    blender: Blender,
    request_timeout: Duration,
    config: ServingConfig,
}

impl RecommendationService {
    /// Load every snapshot named in `config`, build the indexes and become
    /// `Ready`.
    ///
    /// # Errors
    ///
    /// Any snapshot or build failure is returned as `ServingError::Load` and
    /// the service never reaches `Ready`.
    pub fn load(
        config: ServingConfig,
        history: Arc<dyn EventHistoryProvider>,
    ) -> ServingResult<Self> {
        Self::load_with_lifecycle(Arc::new(Lifecycle::new()), config, history)
    }

    /// Like [`Self::load`], reporting progress on a caller-owned lifecycle.
    pub fn load_with_lifecycle(
        lifecycle: Arc<Lifecycle>,
        config: ServingConfig,
        history: Arc<dyn EventHistoryProvider>,
    ) -> ServingResult<Self> {
        lifecycle.transition(ServiceState::Loading)?;
        info!("Starting load");

        let snapshots = &config.snapshots;
        let similarity = SimilarityIndex::build(load_similarity(&snapshots.similarity)?)?;
        info!("Loaded similarity index");

        let recommendations = RecommendationIndex::build(
            load_personal(&snapshots.personal)?,
            load_default_ranking(&snapshots.default_ranking)?,
        );
        info!("Loaded personal and default recommendations");

        Self::assemble(
            lifecycle,
            Arc::new(similarity),
            Arc::new(recommendations),
            history,
            config,
        )
    }

    /// Build a `Ready` service from indexes that are already in memory.
    pub fn from_indexes(
        similarity: Arc<SimilarityIndex>,
        recommendations: Arc<RecommendationIndex>,
        history: Arc<dyn EventHistoryProvider>,
        config: ServingConfig,
    ) -> ServingResult<Self> {
        let lifecycle = Arc::new(Lifecycle::new());
        lifecycle.transition(ServiceState::Loading)?;
        Self::assemble(lifecycle, similarity, recommendations, history, config)
    }

    fn assemble(
        lifecycle: Arc<Lifecycle>,
        similarity: Arc<SimilarityIndex>,
        recommendations: Arc<RecommendationIndex>,
        history: Arc<dyn EventHistoryProvider>,
        config: ServingConfig,
    ) -> ServingResult<Self> {
        let offline = OfflineRecommender::new(Arc::clone(&recommendations));
        let similarity_source: Arc<dyn SimilaritySource> = similarity.clone();
        let online = OnlineCandidateGenerator::new(history, similarity_source, &config.online);
        let blender = Blender::new(offline, online, &config.blend);

        let service = Self {
            lifecycle,
            similarity,
            recommendations,
            blender,
            request_timeout: config.blend.request_timeout(),
            config,
        };
        service.lifecycle.transition(ServiceState::Ready)?;
        info!(
            items = service.similarity.item_count(),
            users = service.recommendations.user_count(),
            "Ready!"
        );
        Ok(service)
    }

    /// Up to `k` items most similar to `item_id`.
    pub fn similar_items(&self, item_id: ItemId, k: i64) -> ServingResult<Vec<Neighbor>> {
        self.lifecycle.ensure_ready()?;
        Ok(self.similarity.query(item_id, k)?.to_vec())
    }

    /// Up to `k` precomputed items for `user_id`.
    pub fn recommendations_offline(&self, user_id: UserId, k: i64) -> ServingResult<Vec<ItemId>> {
        self.lifecycle.ensure_ready()?;
        self.blender.offline().get(user_id, k)
    }

    /// Up to `k` items derived from the user's recent events.
    ///
    /// Bounded by the end-to-end request timeout; on expiry the result is
    /// empty.
    pub async fn recommendations_online(
        &self,
        user_id: UserId,
        k: i64,
    ) -> ServingResult<Vec<ItemId>> {
        self.lifecycle.ensure_ready()?;
        let k = validate_k(k)?;
        match tokio::time::timeout(self.request_timeout, self.blender.online().candidates(user_id, k))
            .await
        {
            Ok(items) => Ok(items),
            Err(_) => {
                warn!(user_id, "Online recommendations missed the request deadline");
                Ok(Vec::new())
            }
        }
    }

    /// Up to `k` items blending offline and online recommendations.
    pub async fn recommendations(&self, user_id: UserId, k: i64) -> ServingResult<Vec<ItemId>> {
        self.lifecycle.ensure_ready()?;
        self.blender.recommend(user_id, k).await
    }

    /// Stop admitting requests. Indexes are left untouched.
    pub fn begin_drain(&self) -> ServingResult<()> {
        info!("Stopping: draining requests");
        self.lifecycle.transition(ServiceState::Draining)
    }

    pub fn state(&self) -> ServiceState {
        self.lifecycle.state()
    }

    pub fn lifecycle(&self) -> &Arc<Lifecycle> {
        &self.lifecycle
    }

    pub fn config(&self) -> &ServingConfig {
        &self.config
    }

    pub fn similarity_index(&self) -> &Arc<SimilarityIndex> {
        &self.similarity
    }

    pub fn recommendation_index(&self) -> &Arc<RecommendationIndex> {
        &self.recommendations
    }
}
