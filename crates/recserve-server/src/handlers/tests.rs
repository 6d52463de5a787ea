use std::sync::Arc;

use serde_json::{json, Value};

use recserve_core::index::{RecommendationIndex, SimilarityIndex};
use recserve_core::stubs::InMemoryEventHistory;
use recserve_core::types::{DefaultRankingRow, PersonalRanking, SimilarityRecord};
use recserve_core::{RecommendationService, ServingConfig};

use super::Handlers;
use crate::protocol::{error_codes, JsonRpcId, JsonRpcRequest, JsonRpcResponse};

fn handlers() -> Handlers {
    let similarity = SimilarityIndex::build(vec![
        SimilarityRecord {
            item_id: 17245,
            neighbor_id: 206329,
            score: 0.9507644176483154,
        },
        SimilarityRecord {
            item_id: 17245,
            neighbor_id: 280145,
            score: 0.9507176280021667,
        },
        SimilarityRecord {
            item_id: 17245,
            neighbor_id: 42741885,
            score: 0.950731635093689,
        },
    ])
    .unwrap();
    let recommendations = RecommendationIndex::build(
        vec![
            PersonalRanking {
                user_id: 1,
                item_id: 500,
                rank: 1,
            },
            PersonalRanking {
                user_id: 1,
                item_id: 501,
                rank: 2,
            },
        ],
        vec![
            DefaultRankingRow {
                item_id: 900,
                rank: 1,
            },
            DefaultRankingRow {
                item_id: 901,
                rank: 2,
            },
        ],
    );
    let events = Arc::new(InMemoryEventHistory::new(10));
    let service = RecommendationService::from_indexes(
        Arc::new(similarity),
        Arc::new(recommendations),
        events.clone(),
        ServingConfig::default(),
    )
    .unwrap();
    Handlers::new(Arc::new(service), events)
}

fn request(method: &str, params: Value) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(JsonRpcId::Number(1)),
        method: method.to_string(),
        params: Some(params),
    }
}

fn result_of(resp: JsonRpcResponse) -> Value {
    assert!(resp.error.is_none(), "unexpected error: {:?}", resp.error);
    resp.result.expect("success response must carry a result")
}

fn error_code(resp: JsonRpcResponse) -> i32 {
    resp.error.expect("expected an error response").code
}

#[tokio::test]
async fn test_similar_items() {
    let h = handlers();
    let result = result_of(
        h.dispatch(request("similar_items", json!({"item_id": 17245, "k": 3})))
            .await,
    );
    assert_eq!(
        result,
        json!({
            "item_id_2": [206329, 42741885, 280145],
            "score": [0.9507644176483154, 0.950731635093689, 0.9507176280021667]
        })
    );
}

#[tokio::test]
async fn test_similar_items_default_k_and_unknown_item() {
    let h = handlers();
    let result = result_of(h.dispatch(request("similar_items", json!({"item_id": 17245}))).await);
    assert_eq!(result["item_id_2"].as_array().unwrap().len(), 3);

    let result = result_of(h.dispatch(request("similar_items", json!({"item_id": 1}))).await);
    assert_eq!(result, json!({"item_id_2": [], "score": []}));
}

#[tokio::test]
async fn test_invalid_k_and_malformed_ids() {
    let h = handlers();
    let resp = h
        .dispatch(request("recommendations", json!({"user_id": 1, "k": 0})))
        .await;
    assert_eq!(error_code(resp), error_codes::INVALID_PARAMS);

    let resp = h
        .dispatch(request("recommendations_offline", json!({"user_id": -4})))
        .await;
    assert_eq!(error_code(resp), error_codes::INVALID_PARAMS);

    let resp = h
        .dispatch(request("similar_items", json!({"item_id": "abc"})))
        .await;
    assert_eq!(error_code(resp), error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_missing_params() {
    let h = handlers();
    let mut req = request("recommendations", json!({}));
    req.params = None;
    assert_eq!(error_code(h.dispatch(req).await), error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_offline_personal_and_default() {
    let h = handlers();
    let result = result_of(
        h.dispatch(request("recommendations_offline", json!({"user_id": 1, "k": 5})))
            .await,
    );
    assert_eq!(result, json!({"recs": [500, 501]}));

    let result = result_of(
        h.dispatch(request("recommendations_offline", json!({"user_id": 2, "k": 1})))
            .await,
    );
    assert_eq!(result, json!({"recs": [900]}));
}

#[tokio::test]
async fn test_events_feed_online_and_blended() {
    let h = handlers();
    result_of(
        h.dispatch(request("events/put", json!({"user_id": 1, "item_id": 17245})))
            .await,
    );

    let events = result_of(h.dispatch(request("events/get", json!({"user_id": 1, "k": 3}))).await);
    assert_eq!(events, json!({"events": [17245]}));

    let online = result_of(
        h.dispatch(request("recommendations_online", json!({"user_id": 1, "k": 10})))
            .await,
    );
    assert_eq!(online, json!({"recs": [206329, 42741885, 280145]}));

    // offline [500, 501]: 500, online[1], then online tail.
    let blended = result_of(
        h.dispatch(request("recommendations", json!({"user_id": 1, "k": 10})))
            .await,
    );
    assert_eq!(blended, json!({"recs": [500, 42741885, 280145]}));
}

#[tokio::test]
async fn test_events_get_rejects_bad_k() {
    let h = handlers();
    let resp = h
        .dispatch(request("events/get", json!({"user_id": 1, "k": 0})))
        .await;
    assert_eq!(error_code(resp), error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_unknown_method() {
    let h = handlers();
    let resp = h.dispatch(request("recommendations/v2", json!({}))).await;
    assert_eq!(error_code(resp), error_codes::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_health_and_shutdown() {
    let h = handlers();
    let health = result_of(h.dispatch(request("health", json!({}))).await);
    assert_eq!(health["state"], "Ready");
    assert_eq!(health["similarity_items"], 1);

    let resp = result_of(h.dispatch(request("shutdown", json!({}))).await);
    assert_eq!(resp["state"], "Draining");

    let resp = h
        .dispatch(request("similar_items", json!({"item_id": 17245})))
        .await;
    assert_eq!(error_code(resp), error_codes::NOT_READY);

    let resp = h
        .dispatch(request("events/put", json!({"user_id": 1, "item_id": 2})))
        .await;
    assert_eq!(error_code(resp), error_codes::NOT_READY);

    // A second shutdown is an illegal transition.
    let resp = h.dispatch(request("shutdown", json!({}))).await;
    assert_eq!(error_code(resp), error_codes::INTERNAL_ERROR);

    let health = result_of(h.dispatch(request("health", json!({}))).await);
    assert_eq!(health["state"], "Draining");
}
