use minitrees::prelude::*;
use minitrees::{Node, TreeError};


// Toy example (A/B are the labels)
//
//   x = 0 : A A A A
//   x = 1 : B B B B
//
// The best split is `x < 0.5`.
fn toy_dataset() -> Dataset {
    let schema = Schema::new(
        vec![FeatureSpec::numeric("x")], vec!["A", "B"]
    ).unwrap();
    let examples = (0..8)
        .map(|i| {
            let (x, y) = if i < 4 { (0.0, "A") } else { (1.0, "B") };
            Example::new(vec![Value::from(x)], y)
        })
        .collect();
    Dataset::new(schema, examples).unwrap()
}


fn survey() -> Dataset {
    let mut path = std::env::current_dir().unwrap();
    path.push("tests/dataset/survey.csv");
    DatasetReader::default()
        .file(path)
        .target_feature("voted")
        .read()
        .unwrap()
}


fn training_accuracy(dataset: &Dataset, params: &TreeParams) -> f64 {
    let f = build(dataset, params).unwrap();
    let predictions = f.predict_all(dataset).unwrap();
    accuracy(&predictions, &dataset.labels()).unwrap()
}


#[test]
fn binary_feature_scenario() {
    let data = toy_dataset();
    let params = TreeParams::default()
        .with_min_n(1)
        .with_max_depth(1);
    let f = build(&data, &params).unwrap();

    let Node::Branch { splitter, left, right, .. } = f.root() else {
        panic!("expected a branch at the root, got {:?}", f.root());
    };
    assert_eq!(splitter.describe(f.schema()), "x < 0.500");
    assert!(left.is_leaf() && right.is_leaf());
    assert_eq!(left.distribution().probabilities(), &[1.0, 0.0]);
    assert_eq!(right.distribution().probabilities(), &[0.0, 1.0]);

    let p = f.predict(&[Value::from(0.0)]).unwrap();
    assert_eq!(p.label(), "A");
    let p = f.predict(&[Value::from(1.0)]).unwrap();
    assert_eq!(p.label(), "B");

    let predictions = f.predict_all(&data).unwrap();
    let truths = data.labels();
    let acc = accuracy(&predictions, &truths).unwrap();
    assert_eq!(acc, 1.0, "expected 1.0, got {acc}.");

    let cm = ConfusionMatrix::new(
        data.schema().labels(), &predictions, &truths
    ).unwrap();
    assert_eq!(cm.counts(), &[vec![4, 0], vec![0, 4]]);
}


#[test]
fn identical_labels_make_a_single_leaf() {
    let schema = Schema::new(
        vec![FeatureSpec::numeric("x")], vec!["A", "B"]
    ).unwrap();
    let examples = (0..10)
        .map(|i| Example::new(vec![Value::from(i as f64)], "B"))
        .collect();
    let data = Dataset::new(schema, examples).unwrap();

    for max_depth in [0, 1, 30] {
        let params = TreeParams::default()
            .with_min_n(1)
            .with_max_depth(max_depth);
        let f = build(&data, &params).unwrap();
        assert_eq!(f.n_nodes(), 1);

        let p = f.predict(&[Value::from(-3.0)]).unwrap();
        assert_eq!(p.label(), "B");
        assert_eq!(p.probability_of("B"), Some(1.0));
    }
}


#[test]
fn zero_depth_is_majority_baseline() {
    let data = survey();
    let params = TreeParams::default().with_max_depth(0);
    let f = build(&data, &params).unwrap();
    assert!(f.root().is_leaf());

    let counts = data.label_counts();
    let majority = *counts.iter().max().unwrap() as f64;
    let exp = majority / data.len() as f64;
    let res = training_accuracy(&data, &params);
    assert_eq!(exp, res, "expected {exp}, got {res}.");
}


#[test]
fn large_min_n_makes_a_single_leaf() {
    let data = survey();
    let params = TreeParams::default().with_min_n(data.len() + 1);
    let f = build(&data, &params).unwrap();
    assert_eq!(f.n_nodes(), 1);
}


#[test]
fn build_is_idempotent() {
    let data = survey();
    let params = TreeParams::default().with_min_n(2);
    let f = build(&data, &params).unwrap();
    let g = build(&data, &params).unwrap();
    assert_eq!(f, g);
}


#[test]
fn accuracy_is_monotone_in_depth() {
    let data = survey();
    let params = TreeParams::default().with_min_n(2);
    let mut prev = 0f64;
    for max_depth in 0..8 {
        let res = training_accuracy(&data, &params.with_max_depth(max_depth));
        assert!(
            res >= prev,
            "accuracy dropped from {prev} to {res} at depth {max_depth}."
        );
        prev = res;
    }
}


#[test]
fn pure_leaves_reproduce_training_labels() {
    let data = survey();
    let params = TreeParams::default()
        .with_min_n(1)
        .with_max_depth(data.len());
    let f = build(&data, &params).unwrap();

    let predictions = f.predict_all(&data).unwrap();
    assert_eq!(predictions, data.labels());
}


#[test]
fn entropy_criterion() {
    let data = toy_dataset();
    let tree = DecisionTreeBuilder::new()
        .min_n(1)
        .criterion(Criterion::Entropy)
        .build();
    let f = tree.fit(&data).unwrap();
    assert_eq!(f.depth(), 1);
    assert_eq!(f.n_leaves(), 2);
}


#[test]
fn feature_selection() {
    let data = survey();
    let tree = DecisionTreeBuilder::new()
        .min_n(2)
        .features(["region"])
        .build();
    let f = tree.fit(&data).unwrap();
    assert_eq!(f.feature_names(), vec!["region"]);

    // Every split tests `region`.
    fn check(node: &Node) {
        if let Node::Branch { splitter, left, right, .. } = node {
            assert_eq!(splitter.feature(), 1);
            check(left);
            check(right);
        }
    }
    check(f.root());
}


#[test]
fn unknown_feature_is_invalid_input() {
    let data = survey();
    let tree = DecisionTreeBuilder::new()
        .features(["income"])
        .build();
    let res = tree.fit(&data);
    assert!(matches!(res, Err(TreeError::InvalidInput(_))));
}


#[test]
fn prediction_schema_mismatch() {
    let data = survey();
    let f = build(&data, &TreeParams::default()).unwrap();
    let values = [
        Value::from("old"),
        Value::from("north"),
        Value::from(10.0),
        Value::from("yes"),
    ];
    let res = f.predict(&values);
    assert!(matches!(res, Err(TreeError::SchemaMismatch(_))));
}


#[test]
fn json_and_dot_files() {
    let data = survey();
    let params = TreeParams::default().with_min_n(5);
    let f = build(&data, &params).unwrap();

    let dir = std::env::temp_dir();
    let json = dir.join("minitrees_dtree_test.json");
    f.save(&json).unwrap();
    let g = DecisionTreeClassifier::load(&json).unwrap();
    assert_eq!(f.predict_all(&data).unwrap(), g.predict_all(&data).unwrap());

    let dot = dir.join("minitrees_dtree_test.dot");
    f.to_dot_file(&dot).unwrap();
    let text = std::fs::read_to_string(&dot).unwrap();
    assert!(text.starts_with("graph DecisionTree {"));
    assert!(text.trim_end().ends_with('}'));
}


#[test]
fn deep_tree_survives_save_and_load() {
    // Labels alternate along `x`, so every split peels off one example.
    let schema = Schema::new(
        vec![FeatureSpec::numeric("x")], vec!["A", "B"]
    ).unwrap();
    let examples = (0..400)
        .map(|i| {
            let y = if i % 2 == 0 { "A" } else { "B" };
            Example::new(vec![Value::from(i as f64)], y)
        })
        .collect();
    let data = Dataset::new(schema, examples).unwrap();
    let params = TreeParams::default()
        .with_min_n(1)
        .with_max_depth(1_000);
    let f = build(&data, &params).unwrap();
    assert!(f.depth() > 128, "got depth {}", f.depth());

    let json = f.to_json().unwrap();
    let g = DecisionTreeClassifier::from_json(&json).unwrap();
    assert_eq!(f.depth(), g.depth());
    assert_eq!(f.n_nodes(), g.n_nodes());
    assert_eq!(f.predict_all(&data).unwrap(), g.predict_all(&data).unwrap());

    let path = std::env::temp_dir().join("minitrees_deep_tree_test.json");
    f.save(&path).unwrap();
    let g = DecisionTreeClassifier::load(&path).unwrap();
    assert_eq!(f.predict_all(&data).unwrap(), g.predict_all(&data).unwrap());
}


#[test]
fn corrupt_tree_file_is_rejected() {
    let f = build(&toy_dataset(), &TreeParams::default().with_min_n(1)).unwrap();
    let json = f.to_json().unwrap()
        .replace("\"feature\":0", "\"feature\":7");

    let path = std::env::temp_dir().join("minitrees_corrupt_tree_test.json");
    std::fs::write(&path, json).unwrap();
    let res = DecisionTreeClassifier::load(&path);
    assert!(matches!(res, Err(TreeError::InvalidInput(_))), "got {res:?}");
}
