use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use domain::{
    Asset, AssetProperty, EventConfiguration, EventType, EventTypeProperty, HistorianInfo,
    PropertyDatatype, PropertyType,
};
use editor_api::{AppState, build_app};
use historian_composer::{ComposerSettings, EditorSession};
use historian_data_api::{InMemoryDataApi, ReferenceData};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const PLANT: &str = "11111111-1111-4111-8111-111111111111";
const LINE1: &str = "22222222-2222-4222-8222-222222222222";

fn data() -> ReferenceData {
    ReferenceData {
        assets: vec![
            Asset {
                uuid: PLANT.to_string(),
                name: "Plant".to_string(),
                ..Asset::default()
            },
            Asset {
                uuid: LINE1.to_string(),
                name: "Line1".to_string(),
                parent_uuid: Some(PLANT.to_string()),
                asset_path: Some("Plant\\Line1".to_string()),
                ..Asset::default()
            },
        ],
        asset_properties: vec![AssetProperty {
            uuid: "AP1".to_string(),
            name: "Speed".to_string(),
            asset_uuid: LINE1.to_string(),
            measurement_uuid: "M1".to_string(),
        }],
        event_types: vec![EventType {
            uuid: "E1".to_string(),
            name: "Batch".to_string(),
            parent_uuid: None,
        }],
        event_type_properties: vec![
            EventTypeProperty {
                uuid: "P1".to_string(),
                name: "Operator".to_string(),
                event_type_uuid: "E1".to_string(),
                datatype: PropertyDatatype::String,
                property_type: PropertyType::Simple,
            },
            EventTypeProperty {
                uuid: "P2".to_string(),
                name: "Approved".to_string(),
                event_type_uuid: "E1".to_string(),
                datatype: PropertyDatatype::Bool,
                property_type: PropertyType::Simple,
            },
        ],
        event_configurations: vec![EventConfiguration {
            uuid: "C1".to_string(),
            asset_uuid: PLANT.to_string(),
            event_type_uuid: "E1".to_string(),
        }],
        info: HistorianInfo {
            version: "v7.3.1".to_string(),
            api_version: "v1".to_string(),
        },
        ..ReferenceData::default()
    }
}

fn app_with(api: Arc<InMemoryDataApi>) -> (Router, Arc<EditorSession>) {
    let session = Arc::new(EditorSession::new(api));
    let app = build_app(AppState::new(session.clone(), ComposerSettings::default()));
    (app, session)
}

async fn ready_app() -> Router {
    let (app, session) = app_with(Arc::new(InMemoryDataApi::new(data())));
    session.refresh_info().await;
    session.load().await.expect("load");
    app
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    call(app, Method::POST, uri, Some(body)).await
}

#[tokio::test]
async fn cyclic_asset_hierarchy_is_unprocessable() {
    let mut cyclic = data();
    cyclic.assets.extend([
        Asset {
            uuid: "CA".to_string(),
            name: "LoopA".to_string(),
            parent_uuid: Some("CB".to_string()),
            ..Asset::default()
        },
        Asset {
            uuid: "CB".to_string(),
            name: "LoopB".to_string(),
            parent_uuid: Some("CA".to_string()),
            ..Asset::default()
        },
    ]);
    let (app, session) = app_with(Arc::new(InMemoryDataApi::new(cyclic)));
    session.load().await.expect("load");

    let (status, body) = post(&app, "/api/editor/asset-tree", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "REFERENCE.CYCLIC_HIERARCHY");
}

#[tokio::test]
async fn health_carries_request_ids() {
    let (app, _) = app_with(Arc::new(InMemoryDataApi::new(data())));
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert!(response.headers().contains_key("x-trace-id"));
}

#[tokio::test]
async fn reference_status_reports_loading_until_refreshed() {
    let (app, _) = app_with(Arc::new(InMemoryDataApi::new(data())));

    let (status, body) = call(&app, Method::GET, "/api/reference/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["loading"], true);
    assert_eq!(body["data"]["assets"], 0);

    let (status, body) = call(&app, Method::POST, "/api/reference/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["loading"], false);
    assert_eq!(body["data"]["assets"], 2);
    assert_eq!(body["data"]["eventTypeProperties"], 2);
    assert_eq!(body["data"]["version"], "v7.3.1");
}

#[tokio::test]
async fn failed_refresh_is_bad_gateway() {
    let api = Arc::new(InMemoryDataApi::new(data()));
    api.set_unavailable(Some("maintenance".to_string()))
        .expect("set unavailable");
    let (app, _) = app_with(api);

    let (status, body) = call(&app, Method::POST, "/api/reference/refresh", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "REFERENCE.UNAVAILABLE");

    let (_, body) = call(&app, Method::GET, "/api/reference/status", None).await;
    assert_eq!(body["data"]["loading"], true);
}

#[tokio::test]
async fn event_options_follow_the_selection() {
    let (app, _) = app_with(Arc::new(InMemoryDataApi::new(data())));
    let request = json!({
        "query": {"Assets": [PLANT], "EventTypes": ["E1"]},
        "valueKey": "Approved"
    });

    let (_, loading) = post(&app, "/api/editor/event-options", request.clone()).await;
    assert_eq!(loading["data"]["loading"], true);
    assert_eq!(loading["data"]["eventTypes"], json!([]));

    let app = ready_app().await;
    let (status, body) = post(&app, "/api/editor/event-options", request).await;
    assert_eq!(status, StatusCode::OK);
    let options = &body["data"];
    assert_eq!(options["loading"], false);
    assert_eq!(options["eventTypes"], json!([{"label": "Batch", "value": "E1"}]));
    assert_eq!(options["propertyValues"], json!(["true", "false"]));
    assert_eq!(
        options["tagKeys"],
        json!(["duration", "Operator", "Approved", "parent:duration"])
    );
    assert_eq!(options["assetLabel"], "Plant");

    let (_, annotation) = post(
        &app,
        "/api/editor/event-options",
        json!({"query": {"Assets": [PLANT]}, "annotation": true}),
    )
    .await;
    let property_types = annotation["data"]["propertyTypes"]
        .as_array()
        .expect("property types");
    assert_eq!(property_types.len(), 1);
}

#[tokio::test]
async fn asset_tree_offers_search_matches() {
    let app = ready_app().await;
    let (status, body) = post(
        &app,
        "/api/editor/asset-tree",
        json!({"withProperties": true, "selector": LINE1, "search": "line"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["label"], "Plant\\Line1");
    assert_eq!(data["tree"][0]["value"], PLANT);
    assert_eq!(data["tree"][0]["items"][0]["value"], LINE1);
    assert_eq!(
        data["matches"],
        json!([
            {"label": "📦 Plant / 📦 Line1", "asset": LINE1},
            {"label": "📦 Plant / 📦 Line1 / 📏 Speed", "asset": LINE1, "property": "AP1"}
        ])
    );
}

#[tokio::test]
async fn reduce_merges_updates_and_reports_runnability() {
    let app = ready_app().await;

    let (status, body) = post(
        &app,
        "/api/editor/reduce",
        json!({
            "query": {"refId": "A", "tabIndex": 2},
            "update": {"field": "Event", "value": {"field": "Asset", "value": PLANT}}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let query = body["data"]["query"].clone();
    assert_eq!(query["queryType"], "EventQuery");
    assert_eq!(query["query"]["Assets"], json!([PLANT]));
    assert_eq!(query["seriesLimit"], 50);
    assert_eq!(body["data"]["runnable"], false);

    let (_, body) = post(
        &app,
        "/api/editor/reduce",
        json!({
            "query": query,
            "update": {"field": "Event", "value": {"field": "EventTypes", "value": ["Batch"]}}
        }),
    )
    .await;
    assert_eq!(body["data"]["query"]["query"]["EventTypes"], json!(["E1"]));
    assert_eq!(body["data"]["runnable"], true);
    assert_eq!(body["data"]["runRequested"], false);

    let (status, body) = post(
        &app,
        "/api/editor/reduce",
        json!({
            "query": {"refId": "B", "queryType": "RawQuery", "query": {}},
            "update": {"field": "Event", "value": {"field": "Asset", "value": PLANT}}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "EDITOR.INVALID_UPDATE");
}

#[tokio::test]
async fn annotation_reduce_auto_runs_complete_queries() {
    let app = ready_app().await;

    let (status, body) = post(
        &app,
        "/api/editor/reduce",
        json!({
            "query": {"refId": "Anno", "queryType": "EventQuery", "query": {"Assets": [PLANT]}},
            "update": {"field": "Event", "value": {"field": "EventTypes", "value": ["E1"]}},
            "annotation": true
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["runRequested"], true);

    let (status, body) = post(
        &app,
        "/api/editor/reduce",
        json!({
            "query": {"refId": "Anno"},
            "update": {"field": "QueryType", "value": "RawQuery"},
            "annotation": true
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "EDITOR.INVALID_UPDATE");
}

#[tokio::test]
async fn tag_edits_and_filter_conversion() {
    let app = ready_app().await;

    let (_, body) = post(
        &app,
        "/api/editor/tags",
        json!({"edit": {"action": "push", "key": "Operator"}}),
    )
    .await;
    let tags = body["data"].clone();
    assert_eq!(tags[0]["key"], "Operator");
    assert!(tags[0].get("condition").is_none());

    let (_, body) = post(
        &app,
        "/api/editor/tags",
        json!({"tags": tags, "edit": {"action": "editValue", "index": 0, "value": "/ann.*/"}}),
    )
    .await;
    assert_eq!(body["data"][0]["value"], "/ann.*/");
    assert_eq!(body["data"][0]["operator"], "=~");

    let (status, body) = post(
        &app,
        "/api/editor/tags",
        json!({"edit": {"action": "remove", "index": 3}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID.REQUEST");

    let (_, body) = post(
        &app,
        "/api/editor/filters",
        json!({
            "tags": [{"key": "Approved", "value": "true", "operator": "="}],
            "eventTypes": ["E1"]
        }),
    )
    .await;
    assert_eq!(body["data"]["filters"][0]["Datatype"], "boolean");
    assert_eq!(body["data"]["filters"][0]["Value"], "true");

    let (status, _) = post(&app, "/api/editor/filters", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn prepare_expands_templates() {
    let (app, _) = app_with(Arc::new(InMemoryDataApi::new(data())));
    let (status, body) = post(
        &app,
        "/api/editor/prepare",
        json!({
            "targets": [
                {"refId": "A", "queryType": "RawQuery", "query": {"TimeseriesDatabase": "$db", "Query": "q"}},
                {"refId": "B", "hide": true, "queryType": "RawQuery", "query": {}}
            ],
            "variables": [{"name": "db", "current": ["DB1"]}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let prepared = body["data"].as_array().expect("prepared");
    assert_eq!(prepared.len(), 1);
    assert_eq!(prepared[0]["query"]["TimeseriesDatabase"], "DB1");
    assert_eq!(prepared[0]["seriesLimit"], 50);
}

#[tokio::test]
async fn variable_queries_and_metrics() {
    let (app, _) = app_with(Arc::new(InMemoryDataApi::new(data())));
    let (status, body) = post(
        &app,
        "/api/variables/query",
        json!({"query": {"type": "EventTypeQuery", "filter": {}}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([{"text": "Batch", "value": "E1"}]));

    let (status, body) = call(&app, Method::GET, "/api/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["queryChanges"].is_number());
}
