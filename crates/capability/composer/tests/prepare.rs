use std::collections::BTreeMap;

use domain::{
    Aggregation, AssetMeasurementQuery, Condition, EventPropertyFilter, EventQuery, HostQuery,
    MeasurementQuery, MeasurementQueryOptions, Operator, PropertyDatatype, QueryBody, RawQuery,
    ValueFilter,
};
use historian_composer::{
    PreparedBody, PreparedQuery, VALUE_FILTER_PLACEHOLDER, parse_float, prepare_queries,
};
use historian_template::{ScopedVars, TemplateContext, TemplateVariable};
use serde_json::{Value, json};

fn template() -> TemplateContext {
    TemplateContext::new(vec![
        TemplateVariable::new("assets", vec!["A1".to_string(), "A2".to_string()]),
        TemplateVariable::new("limit", vec!["12.5kg".to_string()]),
        TemplateVariable::new("operators", vec!["ann".to_string(), "bob".to_string()]),
        TemplateVariable::new("db", vec!["DB1".to_string()]),
        TemplateVariable::new("empty", Vec::new()),
    ])
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn filter(
    property: &str,
    datatype: PropertyDatatype,
    operator: Operator,
    value: Option<&str>,
) -> EventPropertyFilter {
    EventPropertyFilter {
        property: property.to_string(),
        datatype,
        condition: Condition::None,
        operator,
        value: value.map(str::to_string),
        parent: false,
    }
}

fn prepare(targets: &[HostQuery]) -> Vec<PreparedQuery> {
    prepare_queries(targets, &template(), &ScopedVars::new(), 50)
}

#[test]
fn hidden_and_bodyless_targets_are_skipped() {
    let mut hidden = HostQuery::new("A").with_body(QueryBody::RawQuery(RawQuery::default()));
    hidden.hide = true;
    let bodyless = HostQuery::new("B");
    let mut limited = HostQuery::new("C").with_body(QueryBody::RawQuery(RawQuery {
        timeseries_database: "$db".to_string(),
        query: "SELECT * FROM $db".to_string(),
    }));
    limited.series_limit = Some(0);

    let prepared = prepare(&[hidden, bodyless, limited]);
    assert_eq!(prepared.len(), 1);
    assert_eq!(prepared[0].ref_id, "C");
    assert_eq!(prepared[0].series_limit, 50);
    assert_eq!(
        prepared[0].body,
        PreparedBody::RawQuery(RawQuery {
            timeseries_database: "DB1".to_string(),
            query: "SELECT * FROM DB1".to_string(),
        })
    );
}

#[test]
fn measurement_options_are_expanded() {
    let mut tags = BTreeMap::new();
    tags.insert("site".to_string(), "$db".to_string());
    let options = MeasurementQueryOptions {
        tags,
        aggregation: Some(Aggregation {
            name: "mean".to_string(),
            period: Some("$__interval".to_string()),
            arguments: strings(&["$db"]),
            fill: None,
        }),
        group_by: strings(&["$assets"]),
        value_filters: vec![
            ValueFilter {
                value: "$limit".to_string(),
                operator: Operator::Gt,
                condition: Condition::None,
            },
            ValueFilter {
                value: VALUE_FILTER_PLACEHOLDER.to_string(),
                operator: Operator::Lt,
                condition: Condition::And,
            },
        ],
        ..MeasurementQueryOptions::default()
    };
    let mut query = HostQuery::new("A").with_body(QueryBody::MeasurementQuery(MeasurementQuery {
        databases: strings(&["$db"]),
        measurements: strings(&["$assets", "m-3"]),
        options: options.clone(),
        ..MeasurementQuery::default()
    }));
    query.series_limit = Some(7);

    let prepared = prepare(&[query]);
    assert_eq!(prepared[0].series_limit, 7);
    let PreparedBody::MeasurementQuery(body) = &prepared[0].body else {
        panic!("measurement body");
    };
    assert_eq!(body.databases, strings(&["DB1"]));
    assert_eq!(body.measurements, strings(&["A1", "A2", "m-3"]));
    assert_eq!(body.options.tags.get("site").map(String::as_str), Some("DB1"));
    assert_eq!(body.options.group_by, strings(&["A1", "A2"]));
    assert_eq!(body.options.value_filters.len(), 1);
    assert_eq!(body.options.value_filters[0].value, "12.5kg");
    let aggregation = body.options.aggregation.as_ref().expect("aggregation");
    assert_eq!(aggregation.arguments, strings(&["DB1"]));
    assert_eq!(aggregation.period.as_deref(), Some("$__interval"));

    let assets = HostQuery::new("B").with_body(QueryBody::AssetMeasurementQuery(
        AssetMeasurementQuery {
            assets: strings(&["$assets"]),
            asset_properties: strings(&["Speed"]),
            options,
        },
    ));
    let PreparedBody::AssetMeasurementQuery(body) = &prepare(&[assets])[0].body else {
        panic!("asset measurement body");
    };
    assert_eq!(body.assets, strings(&["A1", "A2"]));
    assert_eq!(body.options.value_filters.len(), 1);
}

#[test]
fn event_property_filters_are_coerced_by_datatype() {
    let query = HostQuery::new("A").with_body(QueryBody::EventQuery(EventQuery {
        assets: strings(&["$assets"]),
        event_types: strings(&["E1"]),
        property_filter: vec![
            filter("Step", PropertyDatatype::Number, Operator::Gt, Some("$limit")),
            filter("Approved", PropertyDatatype::Bool, Operator::Eq, Some("true")),
            filter("Operator", PropertyDatatype::String, Operator::In, Some("$operators")),
            filter("Shift", PropertyDatatype::String, Operator::NotIn, Some("$empty")),
            filter("Reason", PropertyDatatype::String, Operator::Eq, Some("")),
            filter("Comment", PropertyDatatype::String, Operator::Eq, None),
            filter("Closed", PropertyDatatype::String, Operator::IsNull, None),
            filter("Weight", PropertyDatatype::Number, Operator::Eq, Some("heavy")),
        ],
        ..EventQuery::default()
    }));

    let prepared = prepare(&[query]);
    let PreparedBody::EventQuery(body) = &prepared[0].body else {
        panic!("event body");
    };
    assert_eq!(body.assets, strings(&["A1", "A2"]));

    let values: Vec<(&str, Option<&Value>)> = body
        .property_filter
        .iter()
        .map(|filter| (filter.property.as_str(), filter.value.as_ref()))
        .collect();
    assert_eq!(
        values,
        vec![
            ("Step", Some(&json!(12.5))),
            ("Approved", Some(&json!(true))),
            ("Operator", Some(&json!(["ann", "bob"]))),
            ("Shift", Some(&json!("$empty"))),
            ("Closed", None),
            ("Weight", Some(&Value::Null)),
        ]
    );

    let serialized = serde_json::to_value(&prepared[0]).expect("serialize");
    assert_eq!(serialized["queryType"], "EventQuery");
    assert_eq!(serialized["seriesLimit"], 50);
    assert_eq!(serialized["query"]["PropertyFilter"][0]["Value"], 12.5);
    assert!(serialized["query"]["PropertyFilter"][4].get("Value").is_none());
}

#[test]
fn event_asset_property_placeholders_are_dropped() {
    let options = MeasurementQueryOptions {
        value_filters: vec![ValueFilter {
            value: VALUE_FILTER_PLACEHOLDER.to_string(),
            operator: Operator::Eq,
            condition: Condition::None,
        }],
        ..MeasurementQueryOptions::default()
    };
    let query = HostQuery::new("A").with_body(QueryBody::EventQuery(EventQuery {
        query_asset_properties: true,
        options: Some(options),
        ..EventQuery::default()
    }));
    let PreparedBody::EventQuery(body) = &prepare(&[query])[0].body else {
        panic!("event body");
    };
    let options = body.options.as_ref().expect("options");
    assert!(options.value_filters.is_empty());
}

#[test]
fn float_prefix_parsing() {
    assert_eq!(parse_float("12.5kg"), Some(12.5));
    assert_eq!(parse_float("  -3e2 "), Some(-300.0));
    assert_eq!(parse_float(".5"), Some(0.5));
    assert_eq!(parse_float("7."), Some(7.0));
    assert_eq!(parse_float("Infinity"), Some(f64::INFINITY));
    assert_eq!(parse_float("abc"), None);
    assert_eq!(parse_float(""), None);
}
