use minitrees::prelude::*;
use minitrees::cross_validate;


fn survey() -> Dataset {
    let mut path = std::env::current_dir().unwrap();
    path.push("tests/dataset/survey.csv");
    DatasetReader::default()
        .file(path)
        .target_feature("voted")
        .read()
        .unwrap()
}


#[test]
fn grid_search_over_default_grid() {
    let data = survey();
    let results = GridSearch::new(&data)
        .n_folds(4)
        .seed(777)
        .run()
        .unwrap();

    let records = results.records();
    assert_eq!(records.len(), 9);
    for record in records {
        assert_eq!(record.accuracies.len(), 4);
        assert!((0.0..=1.0).contains(&record.mean));
    }

    let best = results.select_best();
    let max = records.iter()
        .map(|r| r.mean)
        .fold(f64::MIN, f64::max);
    assert_eq!(best.mean, max);

    let first = records.iter()
        .position(|r| r.mean == max)
        .unwrap();
    assert_eq!(best, &records[first]);

    let params = results.finalize(&TreeParams::default());
    assert_eq!(params.max_depth, best.params.max_depth);
    assert_eq!(params.min_n, best.params.min_n);
}


#[test]
fn grid_search_is_deterministic() {
    let data = survey();
    let run = || {
        GridSearch::new(&data)
            .max_depths([1, 3])
            .min_ns([2, 10])
            .n_folds(3)
            .run()
            .unwrap()
    };
    assert_eq!(run(), run());
}


#[test]
fn cross_validate_decision_tree() {
    let data = survey();
    let folds = CrossValidation::new(&data)
        .n_folds(4)
        .verbose(true)
        .split()
        .unwrap();
    let tree = DecisionTreeBuilder::new()
        .max_depth(3)
        .min_n(2)
        .build();

    let accuracies = cross_validate(&tree, folds).unwrap();
    assert_eq!(accuracies.len(), 4);
    assert!(accuracies.iter().all(|a| (0.0..=1.0).contains(a)));
}


#[test]
fn too_many_folds() {
    let data = survey();
    let res = CrossValidation::new(&data)
        .n_folds(data.len() + 1)
        .split();
    assert!(res.is_err());
}
