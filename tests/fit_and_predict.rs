use chitree::{default_classifier, ChiTreeError, ConfigIO, Dataset, DecisionTree, Node, Row, TreeConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn weather() -> Dataset {
    Dataset::from_records(
        &["Weather", "Wind", "Play"],
        &[
            &["Sunny", "Weak", "+"],
            &["Sunny", "Strong", "+"],
            &["Rain", "Weak", "-"],
            &["Rain", "Strong", "-"],
        ],
        "Play",
        |c| c == "+",
    )
    .unwrap()
}

fn mixed(n: usize, seed: u64, noise: f64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let header = ["Temperature", "Sky", "Wind", "Play"];
    let skies = ["clear", "cloudy", "overcast"];
    let winds = ["calm", "breezy"];
    let records: Vec<Vec<String>> = (0..n)
        .map(|_| {
            let temperature = (rng.gen_range(0.0..40.0_f64) * 10.0).round() / 10.0;
            let sky = skies[rng.gen_range(0..skies.len())];
            let wind = winds[rng.gen_range(0..winds.len())];
            let signal = temperature > 15.0 && sky != "overcast";
            let play = if rng.gen_bool(1.0 - noise) == signal { "yes" } else { "no" };
            vec![format!("{:.1}", temperature), sky.to_string(), wind.to_string(), play.to_string()]
        })
        .collect();
    let records: Vec<Vec<&str>> = records.iter().map(|r| r.iter().map(String::as_str).collect()).collect();
    let records: Vec<&[&str]> = records.iter().map(|r| r.as_slice()).collect();
    Dataset::from_records(&header, &records, "Play", default_classifier).unwrap()
}

#[test]
fn test_weather_stump() -> Result<(), Box<dyn Error>> {
    let tree = DecisionTree::fit(weather(), TreeConfig::default())?;
    assert_eq!(tree.root().split_attribute(), Some("Weather"));
    assert!(tree.predict(&row(&[("Weather", "Sunny"), ("Wind", "Strong")]))?);
    assert!(!tree.predict(&row(&[("Weather", "Rain"), ("Wind", "Weak")]))?);
    Ok(())
}

#[test]
fn test_continuous_attribute_is_binned() -> Result<(), Box<dyn Error>> {
    let ds = Dataset::from_records(
        &["t", "y"],
        &[&["1", "+"], &["2", "+"], &["3", "-"], &["4", "-"]],
        "y",
        |c| c == "+",
    )?;
    let tree = DecisionTree::fit(ds, TreeConfig::default())?;
    let registry = tree.registry();
    assert!(registry.is_continuous("t")?);
    assert_eq!(registry.find_bin("t", 1.0)?, 0);
    assert_eq!(registry.find_bin("t", 4.0)?, 1);
    assert_eq!(registry.find_bin("t", 1000.0)?, 1);

    let edges: Vec<&str> = tree.root().children().map(|(label, _)| label).collect();
    assert_eq!(edges, vec!["≤2.5", ">2.5"]);
    assert!(tree.predict(&row(&[("t", "2.4")]))?);
    assert!(!tree.predict(&row(&[("t", "2.6")]))?);
    assert!(tree.predict(&row(&[("t", "-7")]))?);

    let bad = tree.predict(&row(&[("t", "warm")]));
    assert!(matches!(bad, Err(ChiTreeError::InvalidInput(_))));
    Ok(())
}

#[test]
fn test_unpruned_tree_reproduces_training_labels() -> Result<(), Box<dyn Error>> {
    let ds = mixed(300, 3, 0.0);
    let tree = DecisionTree::fit(ds.clone(), TreeConfig::default())?;
    let rows: Vec<Row> = (0..ds.len()).map(|i| ds.probe(i)).collect::<Result<_, _>>()?;
    assert_eq!(tree.predict_rows(&rows)?, ds.labels());
    Ok(())
}

#[test]
fn test_no_attribute_repeats_on_a_path() -> Result<(), Box<dyn Error>> {
    fn check(node: &Node, seen: &mut Vec<String>) {
        if let Some(attribute) = node.split_attribute() {
            assert!(!seen.iter().any(|s| s == attribute));
            seen.push(attribute.to_string());
            for (_, child) in node.children() {
                check(child, seen);
            }
            seen.pop();
        }
    }
    let tree = DecisionTree::fit(mixed(300, 5, 0.15), TreeConfig::default())?;
    check(tree.root(), &mut Vec::new());
    assert!(tree.depth() <= 3);
    Ok(())
}

#[test]
fn test_unknown_branch_and_wrong_arity() -> Result<(), Box<dyn Error>> {
    let tree = DecisionTree::fit(weather(), TreeConfig::default())?;

    let unseen = tree.predict(&row(&[("Weather", "Snow"), ("Wind", "Weak")]));
    assert!(matches!(
        unseen,
        Err(ChiTreeError::UnknownBranch { ref attribute, ref label }) if attribute == "Weather" && label == "Snow"
    ));

    let too_many = tree.predict(&row(&[("Weather", "Sunny"), ("Wind", "Weak"), ("Play", "+")]));
    assert!(matches!(too_many, Err(ChiTreeError::InvalidInput(_))));
    Ok(())
}

#[test]
fn test_pruning_monotone_and_idempotent() -> Result<(), Box<dyn Error>> {
    let unpruned = DecisionTree::fit(mixed(400, 11, 0.15), TreeConfig::default())?;
    let mut collapsed = Vec::new();
    for significance_level in [0.9, 0.5, 0.1, 0.05, 0.01, 0.0001] {
        let mut tree = unpruned.clone();
        let summary = tree.prune(significance_level)?;
        assert_eq!(summary.internal_before, unpruned.n_internal());
        collapsed.push(summary.collapsed());

        let again = tree.prune(significance_level)?;
        assert_eq!(again.collapsed(), 0);
    }
    assert!(collapsed.windows(2).all(|w| w[0] <= w[1]), "{:?}", collapsed);
    Ok(())
}

#[test]
fn test_save_and_load() -> Result<(), Box<dyn Error>> {
    let ds = mixed(200, 17, 0.1);
    let tree = DecisionTree::fit(ds.clone(), TreeConfig::default().set_prune(true))?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tree.json");
    tree.save(&path)?;
    let loaded = DecisionTree::load(&path)?;
    assert_eq!(loaded.root(), tree.root());
    assert_eq!(loaded.cfg, tree.cfg);

    for i in 0..ds.len() {
        assert_eq!(loaded.predict(&ds.probe(i)?)?, tree.predict(&ds.probe(i)?)?);
    }
    Ok(())
}

#[test]
fn test_fit_from_csv() -> Result<(), Box<dyn Error>> {
    let csv = "\
Outlook,Humidity,Play
Sunny,90,No
Sunny,85,No
Overcast,78,Yes
Rain,96,Yes
Rain,70,No
Overcast,65,Yes
";
    let ds = Dataset::from_csv(csv.as_bytes(), None, default_classifier)?;
    assert_eq!(ds.class_attribute(), "Play");
    let tree = DecisionTree::fit(ds.clone(), TreeConfig::default())?;
    for i in 0..ds.len() {
        assert_eq!(tree.predict(&ds.probe(i)?)?, ds.labels()[i]);
    }
    assert!(tree.to_string().lines().count() >= 3);
    Ok(())
}

#[test]
fn test_fit_with_a_huge_categorical_domain() -> Result<(), Box<dyn Error>> {
    // `id` takes more distinct values than fit in 16 bits, `k` decides the class.
    let n = u16::MAX as usize + 1_000;
    let records: Vec<[String; 3]> = (0..n)
        .map(|i| {
            let k = if i % 3 == 0 { "on" } else { "off" };
            let y = if i % 3 == 0 { "yes" } else { "no" };
            [k.to_string(), format!("id-{}", i), y.to_string()]
        })
        .collect();
    let records: Vec<Vec<&str>> = records.iter().map(|r| r.iter().map(String::as_str).collect()).collect();
    let records: Vec<&[&str]> = records.iter().map(|r| r.as_slice()).collect();
    let ds = Dataset::from_records(&["k", "id", "y"], &records, "y", default_classifier)?;

    let tree = DecisionTree::fit(ds, TreeConfig::default())?;
    assert_eq!(tree.registry().size("id")?, n);
    assert_eq!(tree.root().split_attribute(), Some("k"));
    assert!(tree.predict(&row(&[("k", "on"), ("id", "id-70000")]))?);
    assert!(!tree.predict(&row(&[("k", "off"), ("id", "id-1")]))?);
    Ok(())
}
