use phylolayout::{GroupConfig, GroupIndex, NodeId, Tree, dominant_family, parse_newick, reorganize};

const CONFIG: &str = r#"{
    "groups": {
        "mammals": { "order": ["Cat", "Dog", "Cow"] },
        "birds": { "order": ["Eagle", "Owl"] },
        "reptiles": { "order": ["Snake", "Lizard"] }
    }
}"#;

fn index() -> GroupIndex {
    GroupIndex::build(&GroupConfig::from_json_str(CONFIG).unwrap())
}

fn tip_names(tree: &Tree) -> Vec<String> {
    tree.tip_node_ids_all()
        .iter()
        .map(|id| tree.name(id).map(|name| name.to_string()).unwrap_or_default())
        .collect()
}

fn reorganized(newick: &str, group_order: &[&str]) -> Vec<String> {
    let tree = reorganize(parse_newick(newick).unwrap(), &index(), group_order);
    tip_names(&tree)
}

#[test]
fn test_siblings_follow_group_order() {
    let test_cases = vec![
        ("Single bird before clade", "(Eagle,(Cat,Dog));", vec!["mammals", "birds"], vec!["Cat", "Dog", "Eagle"]),
        ("Reversed order", "(Eagle,(Cat,Dog));", vec!["birds", "mammals"], vec!["Eagle", "Cat", "Dog"]),
        (
            "Interleaved tips",
            "(Owl,Cat,Eagle,Dog,Cow);",
            vec!["mammals", "birds"],
            vec!["Cat", "Dog", "Cow", "Owl", "Eagle"],
        ),
        (
            "Three families",
            "((Snake,Lizard),(Eagle,Owl),(Cat,Dog));",
            vec!["mammals", "birds", "reptiles"],
            vec!["Cat", "Dog", "Eagle", "Owl", "Snake", "Lizard"],
        ),
    ];

    for (name, newick, group_order, expected) in test_cases {
        println!("Testing: {}", name);
        assert_eq!(reorganized(newick, &group_order), expected, "Wrong tip order for {}", name);
    }
}

#[test]
fn test_nested_nodes_are_reordered() {
    let tips = reorganized("((Owl,(Dog,Cat)),(Eagle,Cow));", &["mammals", "birds"]);
    // The inner (Dog,Cat) pair keeps its order: both tips share one family.
    assert_eq!(tips, vec!["Dog", "Cat", "Owl", "Cow", "Eagle"]);
}

#[test]
fn test_unknown_and_unlisted_families_go_first() {
    let tips = reorganized("(Cat,Platypus,Snake,Eagle);", &["mammals", "birds"]);
    assert_eq!(tips, vec!["Platypus", "Snake", "Cat", "Eagle"]);
}

/// Child order of every node, listed in pre-order.
fn child_orders(tree: &Tree) -> Vec<Vec<NodeId>> {
    tree.preorder_ids().iter().map(|id| tree.child_ids(id).to_vec()).collect()
}

#[test]
fn test_reorganize_is_idempotent() {
    let index = index();
    let test_cases = vec![
        ("Mixed families", "((Cat,(Snake,Owl)),(Dog,Eagle),Lizard,(Cow,Owl));", vec!["birds", "reptiles", "mammals"]),
        ("Unnamed tips", "((,Cat),(Eagle,),,(Owl,(,Dog)));", vec!["mammals", "birds"]),
        ("Unlisted families", "((Snake,Cat),(Lizard,Eagle),(Platypus,));", vec!["birds"]),
    ];

    for (name, newick, group_order) in test_cases {
        println!("Testing: {}", name);
        let once = reorganize(parse_newick(newick).unwrap(), &index, &group_order);
        let twice = reorganize(once.clone(), &index, &group_order);
        assert_eq!(child_orders(&once), child_orders(&twice), "Child order changed for {}", name);
    }
}

#[test]
fn test_method_and_owned_form_agree() {
    let index = index();
    let group_order = vec!["mammals".to_string(), "birds".to_string()];
    let newick = "((Eagle,Cat),(Owl,(Dog,Cow)));";

    let mut in_place = parse_newick(newick).unwrap();
    in_place.reorganize(&index, &group_order);
    let owned = reorganize(parse_newick(newick).unwrap(), &index, &group_order);
    assert_eq!(tip_names(&in_place), tip_names(&owned));
}

#[test]
fn test_reorganize_keeps_every_node() {
    let tree = parse_newick("((Eagle,Cat)0.4,(Owl,(Dog,Cow)0.9)0.7);").unwrap();
    let before = tree.node_count_all();
    let tree = reorganize(tree, &index(), &["mammals", "birds"]);

    assert_eq!(tree.node_count_all(), before);
    assert_eq!(tree.tip_count_all(), 5);
    let mut confidences: Vec<f64> =
        tree.preorder_ids().iter().filter_map(|id| tree.confidence(id)).collect();
    confidences.sort_by(f64::total_cmp);
    assert_eq!(confidences, vec![0.4, 0.7, 0.9]);
}

#[test]
fn test_dominant_family() {
    let index = index();
    let tree = parse_newick("((Cat,Dog,Eagle),(Cat,Eagle),(Platypus,Echidna),Owl);").unwrap();
    let root_id = tree.first_node_id().unwrap();
    let clades = tree.child_ids(&root_id).to_vec();

    let test_cases = vec![
        ("Majority wins", clades[0], vec!["birds", "mammals"], Some("mammals")),
        ("Tie goes to first listed", clades[1], vec!["mammals", "birds"], Some("mammals")),
        ("Tie goes to first listed, reversed", clades[1], vec!["birds", "mammals"], Some("birds")),
        ("Listed beats unlisted on a tie", clades[1], vec!["birds"], Some("birds")),
        ("Unlisted tie goes to first seen", clades[1], vec![], Some("mammals")),
        ("No indexed tips", clades[2], vec!["mammals", "birds"], None),
        ("A tip is its own clade", clades[3], vec!["mammals"], Some("birds")),
    ];

    for (name, node_id, group_order, expected) in test_cases {
        println!("Testing: {}", name);
        let family = dominant_family(&tree, &node_id, &index, &group_order);
        assert_eq!(family.as_deref(), expected, "Wrong family for {}", name);
    }
}

#[test]
fn test_empty_index_keeps_parse_order() {
    let index = GroupIndex::build(&GroupConfig::default());
    let tree = reorganize(parse_newick("(C,(B,A),D);").unwrap(), &index, index.group_order());
    assert_eq!(tip_names(&tree), vec!["C", "B", "A", "D"]);
}
