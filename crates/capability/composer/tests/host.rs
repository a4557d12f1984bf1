use domain::{
    Asset, AssetFilter, AssetMeasurementQuery, EventConfiguration, EventType, EventTypeFilter,
    EventTypeProperty, EventUpdate, FieldUpdate, HistorianInfo, HostQuery,
    MeasurementQueryOptions, PropertyDatatype, PropertyType, QueryBody, QueryType, TabIndex,
    VariableQuery, VariableQueryType,
};
use historian_composer::{
    AnnotationEditor, ComposerError, ComposerSettings, EditorKind, QueryComposer, QueryHost,
    VariableEditor,
};
use historian_options::{OptionResolver, ReferenceSnapshot, ReferenceState, ResolverSettings};
use historian_template::TemplateContext;

const PLANT: &str = "11111111-1111-4111-8111-111111111111";

#[derive(Default)]
struct RecordingHost {
    query: HostQuery,
    changes: Vec<HostQuery>,
    runs: usize,
}

impl RecordingHost {
    fn with_query(query: HostQuery) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }
}

impl QueryHost for RecordingHost {
    fn query(&self) -> HostQuery {
        self.query.clone()
    }

    fn on_change(&mut self, query: HostQuery) {
        self.query = query.clone();
        self.changes.push(query);
    }

    fn on_run_query(&mut self) {
        self.runs += 1;
    }
}

fn reference() -> ReferenceState {
    ReferenceState::ready(ReferenceSnapshot {
        assets: vec![Asset {
            uuid: PLANT.to_string(),
            name: "Plant".to_string(),
            ..Asset::default()
        }],
        event_types: vec![EventType {
            uuid: "E1".to_string(),
            name: "Batch".to_string(),
            parent_uuid: None,
        }],
        event_type_properties: vec![EventTypeProperty {
            uuid: "P1".to_string(),
            name: "Operator".to_string(),
            event_type_uuid: "E1".to_string(),
            datatype: PropertyDatatype::String,
            property_type: PropertyType::Simple,
        }],
        event_configurations: vec![EventConfiguration {
            uuid: "C1".to_string(),
            asset_uuid: PLANT.to_string(),
            event_type_uuid: "E1".to_string(),
        }],
        info: HistorianInfo {
            version: "v7.3.0".to_string(),
            api_version: "v1".to_string(),
        },
        ..ReferenceSnapshot::default()
    })
}

#[test]
fn initialize_fills_missing_body() {
    let mut composer = QueryComposer::new(
        RecordingHost::with_query(HostQuery::new("A")),
        EditorKind::Query,
        ComposerSettings::default(),
    );
    let query = composer.initialize();
    assert_eq!(query.tab_index, Some(TabIndex::Assets));
    assert_eq!(query.series_limit, Some(50));
    assert_eq!(
        query.body,
        Some(QueryBody::AssetMeasurementQuery(AssetMeasurementQuery {
            options: MeasurementQueryOptions::default_for(false),
            ..AssetMeasurementQuery::default()
        }))
    );
    assert_eq!(composer.host().changes.len(), 1);

    let mut preset = HostQuery::new("B");
    preset.tab_index = Some(TabIndex::Events);
    let mut composer = QueryComposer::new(
        RecordingHost::with_query(preset),
        EditorKind::Query,
        ComposerSettings::default(),
    );
    assert_eq!(composer.initialize().query_type(), Some(QueryType::EventQuery));

    let existing = HostQuery::new("C").with_body(QueryType::RawQuery.empty_body());
    let mut composer = QueryComposer::new(
        RecordingHost::with_query(existing.clone()),
        EditorKind::Query,
        ComposerSettings::default(),
    );
    assert_eq!(composer.initialize(), existing);
    assert!(composer.host().changes.is_empty());
}

#[test]
fn every_merge_is_forwarded_and_runs_are_guarded() {
    let state = reference();
    let template = TemplateContext::default();
    let settings = ResolverSettings::default();
    let resolver = OptionResolver::new(&state, &template, &settings);

    let mut composer = QueryComposer::new(
        RecordingHost::with_query(HostQuery::new("A")),
        EditorKind::Query,
        ComposerSettings::default(),
    );
    composer.initialize();
    composer
        .apply(FieldUpdate::TabIndex(TabIndex::Events), &resolver)
        .expect("tab");
    composer
        .apply(FieldUpdate::Event(EventUpdate::Asset(PLANT.to_string())), &resolver)
        .expect("asset");
    assert_eq!(composer.host().changes.len(), 3);

    assert!(!composer.run());
    assert_eq!(composer.host().runs, 0);

    let merged = composer
        .apply(
            FieldUpdate::Event(EventUpdate::EventTypes(vec!["Batch".to_string()])),
            &resolver,
        )
        .expect("event types");
    assert_eq!(composer.host().query, merged);
    assert_eq!(composer.host().runs, 0);

    assert!(composer.run());
    assert_eq!(composer.host().runs, 1);
}

#[test]
fn annotation_editor_runs_only_complete_simple_queries() {
    let state = reference();
    let template = TemplateContext::default();
    let settings = ResolverSettings::default();
    let resolver = OptionResolver::new(&state, &template, &settings);

    let mut editor = AnnotationEditor::new(RecordingHost::default(), ComposerSettings::default());
    let initial = editor.initialize();
    let body = initial.event_query().expect("event body");
    assert_eq!(body.property_type, PropertyType::Simple);
    assert!(body.assets.is_empty());

    let next = editor
        .apply(EventUpdate::PropertyType(PropertyType::Periodic), &resolver)
        .expect("property type");
    assert_eq!(
        next.event_query().map(|query| query.property_type),
        Some(PropertyType::Simple)
    );

    editor
        .apply(EventUpdate::Asset(PLANT.to_string()), &resolver)
        .expect("asset");
    assert_eq!(editor.composer().host().runs, 0);

    editor
        .apply(EventUpdate::EventTypes(vec!["E1".to_string()]), &resolver)
        .expect("event types");
    assert_eq!(editor.composer().host().runs, 1);

    let selection = editor.selection("v7.3.0");
    assert!(selection.annotation);
    assert_eq!(selection.asset, PLANT);
    assert_eq!(selection.property_type, PropertyType::Simple);

    let host = editor.into_host();
    assert_eq!(host.changes.len(), 4);
}

#[test]
fn annotation_composer_rejects_other_query_types() {
    let state = ReferenceState::Loading;
    let template = TemplateContext::default();
    let settings = ResolverSettings::default();
    let resolver = OptionResolver::new(&state, &template, &settings);

    let mut composer = QueryComposer::new(
        RecordingHost::default(),
        EditorKind::Annotation,
        ComposerSettings::default(),
    );
    composer.initialize();
    let err = composer
        .apply(FieldUpdate::QueryType(QueryType::RawQuery), &resolver)
        .expect_err("unsupported");
    assert!(matches!(
        err,
        ComposerError::Unsupported {
            kind: EditorKind::Annotation,
            ..
        }
    ));
    assert_eq!(composer.host().changes.len(), 1);
}

#[test]
fn variable_editor_resets_filter_on_type_switch() {
    let mut editor = VariableEditor::default();
    assert_eq!(editor.query().query_type(), VariableQueryType::MeasurementQuery);

    editor.set_type(VariableQueryType::AssetQuery);
    editor.set_query(VariableQuery::AssetQuery(AssetFilter {
        keyword: Some("pump".to_string()),
        ..AssetFilter::default()
    }));

    let same = editor.set_type(VariableQueryType::AssetQuery).clone();
    assert_eq!(
        same,
        VariableQuery::AssetQuery(AssetFilter {
            keyword: Some("pump".to_string()),
            ..AssetFilter::default()
        })
    );

    let switched = editor.set_type(VariableQueryType::EventTypeQuery).clone();
    assert_eq!(switched, VariableQuery::EventTypeQuery(EventTypeFilter::default()));

    let options = VariableEditor::type_options();
    assert_eq!(options.len(), 6);
    assert_eq!(options[0].label, "Measurement");
    assert_eq!(options[0].value, "MeasurementQuery");
}
