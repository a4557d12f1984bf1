use domain::{
    Asset, EventConfiguration, EventType, EventTypeProperty, HistorianInfo, PropertyDatatype,
    PropertyType,
};
use historian_options::{
    EventSelection, OptionGraph, OptionNode, OptionResolver, ReferenceSnapshot, ReferenceState,
    ResolverSettings,
};
use historian_template::TemplateContext;

fn state() -> ReferenceState {
    ReferenceState::ready(ReferenceSnapshot {
        assets: vec![
            Asset {
                uuid: "A".to_string(),
                name: "Plant".to_string(),
                ..Asset::default()
            },
            Asset {
                uuid: "B".to_string(),
                name: "Mill".to_string(),
                ..Asset::default()
            },
        ],
        event_types: vec![
            EventType {
                uuid: "E1".to_string(),
                name: "Batch".to_string(),
                parent_uuid: None,
            },
            EventType {
                uuid: "E2".to_string(),
                name: "Stop".to_string(),
                parent_uuid: None,
            },
        ],
        event_type_properties: vec![
            EventTypeProperty {
                uuid: "P1".to_string(),
                name: "Approved".to_string(),
                event_type_uuid: "E1".to_string(),
                datatype: PropertyDatatype::Bool,
                property_type: PropertyType::Simple,
            },
            EventTypeProperty {
                uuid: "P2".to_string(),
                name: "Reason".to_string(),
                event_type_uuid: "E2".to_string(),
                datatype: PropertyDatatype::String,
                property_type: PropertyType::Simple,
            },
        ],
        event_configurations: vec![
            EventConfiguration {
                uuid: "C1".to_string(),
                asset_uuid: "A".to_string(),
                event_type_uuid: "E1".to_string(),
            },
            EventConfiguration {
                uuid: "C2".to_string(),
                asset_uuid: "B".to_string(),
                event_type_uuid: "E2".to_string(),
            },
        ],
        info: HistorianInfo {
            version: "7.3.0".to_string(),
            api_version: "v1".to_string(),
        },
        ..ReferenceSnapshot::default()
    })
}

fn selection(asset: &str, event_types: &[&str]) -> EventSelection {
    EventSelection {
        asset: asset.to_string(),
        event_types: event_types.iter().map(|value| value.to_string()).collect(),
        version: "7.3.0".to_string(),
        ..EventSelection::default()
    }
}

#[test]
fn initial_evaluation_fills_every_node() {
    let state = state();
    let template = TemplateContext::default();
    let settings = ResolverSettings::default();
    let resolver = OptionResolver::new(&state, &template, &settings);

    let graph = OptionGraph::new(selection("A", &["E1"]), &resolver).expect("graph");
    let options = graph.options();
    assert!(!options.loading);
    assert_eq!(options.asset_tree.len(), 2);
    assert_eq!(options.asset_label, "Plant");
    assert_eq!(options.event_types.len(), 1);
    assert_eq!(options.properties.len(), 1);
    assert_eq!(options.tag_keys[0], "duration");
    assert_eq!(options.operators.len(), 14);
    assert_eq!(options.statuses.len(), 4);
}

#[test]
fn asset_change_recomputes_downstream() {
    let state = state();
    let template = TemplateContext::default();
    let settings = ResolverSettings::default();
    let resolver = OptionResolver::new(&state, &template, &settings);

    let mut graph = OptionGraph::new(selection("A", &["E1"]), &resolver).expect("graph");
    let recomputed = graph
        .select(selection("B", &["E2"]), &resolver)
        .expect("select");
    assert_eq!(
        recomputed,
        vec![
            OptionNode::EventTypes,
            OptionNode::Properties,
            OptionNode::PropertyValues,
            OptionNode::TagKeys
        ]
    );
    assert_eq!(graph.options().event_types[0].value, "E2");
    assert_eq!(graph.options().properties[0].value, "Reason");
    assert_eq!(graph.options().asset_label, "Mill");
}

#[test]
fn value_key_only_touches_values() {
    let state = state();
    let template = TemplateContext::default();
    let settings = ResolverSettings::default();
    let resolver = OptionResolver::new(&state, &template, &settings);

    let mut graph = OptionGraph::new(selection("A", &["E1"]), &resolver).expect("graph");
    let mut next = selection("A", &["E1"]);
    next.value_key = Some("Approved".to_string());

    let recomputed = graph.select(next.clone(), &resolver).expect("select");
    assert_eq!(recomputed, vec![OptionNode::PropertyValues]);
    assert_eq!(graph.options().property_values, vec!["true", "false"]);

    assert!(graph.select(next, &resolver).expect("noop").is_empty());
}

#[test]
fn loading_graph_is_empty() {
    let state = ReferenceState::Loading;
    let template = TemplateContext::default();
    let settings = ResolverSettings::default();
    let resolver = OptionResolver::new(&state, &template, &settings);

    let graph = OptionGraph::new(selection("A", &["E1"]), &resolver).expect("graph");
    let options = graph.into_options();
    assert!(options.loading);
    assert!(options.asset_tree.is_empty());
    assert!(options.event_types.is_empty());
    assert!(options.tag_keys.is_empty());
}
