use api_contract::{
    AssetMatchDto, EventOptionsRequest, FilterConversionRequest, PrepareRequest, ReduceRequest,
    ReferenceStatusDto, TagEdit, TagEditRequest, VariableQueryRequest,
};
use domain::{EventUpdate, FieldUpdate, QueryType, VariableQuery};

#[test]
fn reference_status_is_camel_case() {
    let status = ReferenceStatusDto {
        session_id: "s-1".to_string(),
        loading: false,
        version: "v7.3.0".to_string(),
        api_version: "v1".to_string(),
        assets: 3,
        asset_properties: 1,
        event_types: 2,
        event_type_properties: 4,
        event_configurations: 2,
    };
    let value = serde_json::to_value(status).expect("serialize");
    assert_eq!(value["sessionId"], "s-1");
    assert_eq!(value["apiVersion"], "v1");
    assert_eq!(value["eventTypeProperties"], 4);
    assert!(value.get("session_id").is_none());
}

#[test]
fn event_options_request_defaults_missing_fields() {
    let request: EventOptionsRequest =
        serde_json::from_str(r#"{"query":{"Assets":["A"],"EventTypes":["E1"]}}"#).expect("parse");
    assert_eq!(request.query.assets, vec!["A".to_string()]);
    assert_eq!(request.value_key, None);
    assert!(!request.annotation);
    assert!(request.variables.is_empty());
}

#[test]
fn reduce_request_carries_host_query_and_update() {
    let payload = r#"{
        "query": {"refId": "A", "queryType": "EventQuery", "query": {"Assets": []}, "tabIndex": 2},
        "update": {"field": "Event", "value": {"field": "EventTypes", "value": ["Batch"]}},
        "variables": [{"name": "site", "current": ["north"]}]
    }"#;
    let request: ReduceRequest = serde_json::from_str(payload).expect("parse");
    assert_eq!(request.query.ref_id, "A");
    assert_eq!(request.query.query_type(), Some(QueryType::EventQuery));
    assert_eq!(
        request.update,
        FieldUpdate::Event(EventUpdate::EventTypes(vec!["Batch".to_string()]))
    );
    assert!(!request.annotation);
    assert_eq!(request.variables[0].current, vec!["north".to_string()]);
}

#[test]
fn tag_edit_actions_are_tagged() {
    let request: TagEditRequest =
        serde_json::from_str(r#"{"edit":{"action":"editValue","index":0,"value":"/a.*/"}}"#)
            .expect("parse");
    assert!(request.tags.is_empty());
    assert!(matches!(request.edit, TagEdit::EditValue { index: 0, .. }));

    let push: TagEdit = serde_json::from_str(r#"{"action":"push","key":"Operator"}"#)
        .expect("parse push");
    assert!(matches!(push, TagEdit::Push { key } if key == "Operator"));
}

#[test]
fn conversion_and_prepare_requests_accept_empty_bodies() {
    let conversion: FilterConversionRequest = serde_json::from_str("{}").expect("conversion");
    assert!(conversion.filters.is_none());
    assert!(conversion.tags.is_none());

    let prepare: PrepareRequest =
        serde_json::from_str(r#"{"scopedVars":{"db":["DB1"]}}"#).expect("prepare");
    assert!(prepare.targets.is_empty());
    assert_eq!(prepare.scoped_vars["db"], vec!["DB1".to_string()]);
}

#[test]
fn variable_query_request_uses_type_tag() {
    let request: VariableQueryRequest =
        serde_json::from_str(r#"{"query":{"type":"EventTypeQuery","filter":{}}}"#).expect("parse");
    assert!(matches!(request.query, VariableQuery::EventTypeQuery(_)));
    assert!(request.scoped_vars.is_empty());
}

#[test]
fn asset_match_omits_missing_property() {
    let value = serde_json::to_value(AssetMatchDto {
        label: "Plant / Line1".to_string(),
        asset: "L1".to_string(),
        property: None,
    })
    .expect("serialize");
    assert!(value.get("property").is_none());
    assert_eq!(value["asset"], "L1");
}
