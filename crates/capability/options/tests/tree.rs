use domain::{Asset, AssetProperty, CascaderOption};
use historian_options::{
    DEFAULT_SEPARATOR, TreeError, build_asset_tree, find_option, flatten_options, initial_label,
    search_options,
};

fn asset(uuid: &str, name: &str, parent: Option<&str>) -> Asset {
    Asset {
        uuid: uuid.to_string(),
        name: name.to_string(),
        parent_uuid: parent.map(str::to_string),
        ..Asset::default()
    }
}

fn property(uuid: &str, name: &str, asset: &str) -> AssetProperty {
    AssetProperty {
        uuid: uuid.to_string(),
        name: name.to_string(),
        asset_uuid: asset.to_string(),
        ..AssetProperty::default()
    }
}

#[test]
fn plant_with_one_line() {
    let assets = vec![asset("A", "Plant", None), asset("B", "Line1", Some("A"))];
    let tree = build_asset_tree(None, &assets, &[], Vec::new()).expect("tree");

    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].label, "📦 Plant");
    assert_eq!(tree[0].value, "A");
    assert_eq!(tree[0].items.len(), 1);
    assert_eq!(tree[0].items[0].label, "📦 Line1");
    assert!(tree[0].items[0].is_leaf());
}

#[test]
fn levels_sorted_and_placeholders_appended() {
    let assets = vec![
        asset("A", "plant", None),
        asset("B", "Area", None),
        asset("C", "zeta", Some("B")),
        asset("D", "Beta", Some("B")),
    ];
    let properties = vec![property("P2", "speed", "B"), property("P1", "Flow", "B")];
    let leaves = vec![CascaderOption::leaf("$site", "$site")];

    let tree = build_asset_tree(None, &assets, &properties, leaves).expect("tree");
    let labels: Vec<&str> = tree.iter().map(|node| node.label.as_str()).collect();
    assert_eq!(labels, vec!["📦 Area", "📦 plant", "$site"]);

    let children: Vec<&str> = tree[0].items.iter().map(|node| node.label.as_str()).collect();
    assert_eq!(children, vec!["📦 Beta", "📦 zeta", "📏 Flow", "📏 speed"]);
}

#[test]
fn empty_parent_uuid_is_root() {
    let assets = vec![asset("A", "Plant", Some(""))];
    let tree = build_asset_tree(None, &assets, &[], Vec::new()).expect("tree");
    assert_eq!(tree.len(), 1);
}

#[test]
fn cyclic_hierarchy_is_reported() {
    let assets = vec![asset("A", "Plant", Some("B")), asset("B", "Line", Some("A"))];
    let err = build_asset_tree(Some("A"), &assets, &[], Vec::new()).expect_err("cycle");
    assert_eq!(
        err,
        TreeError::CyclicHierarchy {
            uuid: "A".to_string()
        }
    );

    let self_loop = vec![asset("S", "Self", Some("S"))];
    assert!(build_asset_tree(Some("S"), &self_loop, &[], Vec::new()).is_err());
}

#[test]
fn cycle_without_root_fails_from_the_top() {
    let assets = vec![
        asset("R", "Root", None),
        asset("A", "Plant", Some("B")),
        asset("B", "Line", Some("A")),
    ];
    let err = build_asset_tree(None, &assets, &[], Vec::new()).expect_err("cycle");
    assert_eq!(
        err,
        TreeError::CyclicHierarchy {
            uuid: "A".to_string()
        }
    );

    let chain = vec![
        asset("R", "Root", None),
        asset("C", "Cell", Some("B")),
        asset("B", "Line", Some("R")),
        asset("X", "Orphan", Some("missing")),
    ];
    let tree = build_asset_tree(None, &chain, &[], Vec::new()).expect("acyclic");
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].items[0].items[0].value, "C");
}

#[test]
fn flatten_and_find_selection() {
    let assets = vec![asset("A", "Plant", None), asset("B", "Line1", Some("A"))];
    let properties = vec![property("P", "Speed", "B")];
    let tree = build_asset_tree(None, &assets, &properties, Vec::new()).expect("tree");

    let flat = flatten_options(&tree, DEFAULT_SEPARATOR);
    assert_eq!(flat.len(), 3);
    assert_eq!(flat[1].label, "📦 Plant / 📦 Line1");

    let property = find_option(&flat, "📦 Plant / 📦 Line1 / 📏 Speed").expect("property");
    let selection = property.selection().expect("selection");
    assert_eq!(selection.asset, "B");
    assert_eq!(selection.property.as_deref(), Some("P"));

    let line = find_option(&flat, "📦 Plant / 📦 Line1").expect("line");
    assert_eq!(line.selection().expect("selection").property, None);

    assert_eq!(search_options(&flat, "line1").len(), 2);
}

#[test]
fn initial_label_prefers_path() {
    let mut plant = asset("A", "Plant", None);
    plant.asset_path = Some("Site\\Plant".to_string());
    let assets = vec![plant, asset("B", "Line1", Some("A"))];

    assert_eq!(initial_label("A", &assets), "Site\\Plant");
    assert_eq!(initial_label("B", &assets), "Line1");
    assert_eq!(initial_label("/Pl.*/", &assets), "/Pl.*/");
}
