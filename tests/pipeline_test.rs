use phylolayout::{BranchLengthConfig, Direction, Error, GroupConfig, TreeParseError, layout_newick};

const CONFIG: &str = r#"{
    "layout": { "direction": "right" },
    "groups": {
        "mammals": { "order": ["Cat", "Dog"] },
        "birds": { "order": ["Eagle", "Owl"] }
    }
}"#;

const TREE: &str = "((Eagle,Owl)0.9,(Cat,Dog)0.4);";

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!((actual - expected).abs() < 1e-9, "{what}: expected {expected}, got {actual}");
}

#[test]
fn test_groups_are_ordered_and_placed() {
    let config = GroupConfig::from_json_str(CONFIG).unwrap();
    let positioned = layout_newick(TREE, &config, None).unwrap();
    let position = |name: &str| positioned.position_by_name(name).unwrap();

    // Mammals are declared first, so they move above the birds.
    assert!(position("Cat").1 < position("Dog").1);
    assert!(position("Dog").1 < position("Eagle").1);
    assert!(position("Eagle").1 < position("Owl").1);

    assert_close(position("Cat").0, 198.0, "Cat x");
    assert_close(position("Eagle").0, 283.0, "Eagle x");

    let tree = positioned.tree();
    let root_id = tree.first_node_id().unwrap();
    let clade_x: Vec<f64> =
        tree.child_ids(&root_id).iter().map(|id| positioned.position(*id).unwrap().0).collect();
    assert_close(clade_x[0], 98.0, "mammal clade x");
    assert_close(clade_x[1], 183.0, "bird clade x");
}

#[test]
fn test_group_order_and_direction_come_from_config() {
    let mut config = GroupConfig::from_json_str(CONFIG).unwrap();
    config.layout.group_order = Some(vec!["birds".to_string(), "mammals".to_string()]);
    config.layout.direction = Direction::Down;

    let branch_length = BranchLengthConfig { min: 0.0, max: 100.0, default: 50.0 };
    let positioned = layout_newick(TREE, &config, Some(&branch_length)).unwrap();
    assert_eq!(positioned.direction(), Direction::Down);

    let tips: Vec<String> = positioned
        .tree()
        .tip_node_ids_all()
        .iter()
        .filter_map(|id| positioned.tree().name(id).map(|name| name.to_string()))
        .collect();
    assert_eq!(tips, vec!["Eagle", "Owl", "Cat", "Dog"]);

    // Down moves children along x; every tip sits at the full depth.
    for name in ["Eagle", "Owl", "Cat", "Dog"] {
        assert_close(positioned.position_by_name(name).unwrap().1, 760.0, name);
    }
}

#[test]
fn test_errors_are_propagated() {
    let config = GroupConfig::default();
    let result = layout_newick("(A,B", &config, None);
    assert!(matches!(result, Err(Error::Parse(TreeParseError::Unclosed { open: 1 }))));

    let result = layout_newick(";", &config, None);
    assert!(matches!(result, Err(Error::Parse(TreeParseError::Empty))));
}

#[test]
fn test_json_document() {
    let config = GroupConfig::from_json_str(CONFIG).unwrap();
    let json = layout_newick(TREE, &config, None).unwrap().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["direction"], "right");
    // Pre-order after reordering: root, (Cat,Dog), Cat, Dog, (Eagle,Owl), Eagle, Owl.
    let nodes = value["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 7);
    assert_eq!(nodes[2]["name"], "Cat");
    assert_eq!(nodes[2]["parent"], 1);
    assert_eq!(nodes[4]["confidence"], 0.9);
    assert_eq!(nodes[5]["parent"], 4);
}
