#![allow(dead_code)]
use chitree::Dataset;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Generates a dataset with `n_numeric` continuous and `n_categorical`
// categorical attributes, labelled by a noisy threshold rule.
pub(crate) fn create_data(n_samples: usize, n_numeric: usize, n_categorical: usize) -> Dataset {
    // reproducible seed
    let mut rng = StdRng::seed_from_u64(1903);

    let mut header: Vec<String> = (0..n_numeric).map(|j| format!("x{}", j)).collect();
    header.extend((0..n_categorical).map(|j| format!("c{}", j)));
    header.push("y".to_string());

    let levels = ["red", "green", "blue", "amber"];
    let mut records = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let numeric: Vec<f64> = (0..n_numeric).map(|_| rng.gen_range(0.0..100.0)).collect();
        let categorical: Vec<&str> = (0..n_categorical).map(|_| levels[rng.gen_range(0..levels.len())]).collect();

        let signal = numeric.first().map_or(false, |x| *x > 40.0)
            || categorical.first().map_or(false, |c| *c == "red");
        let label = if rng.gen_bool(0.9) == signal { "yes" } else { "no" };

        let mut record: Vec<String> = numeric.iter().map(|x| format!("{:.2}", x)).collect();
        record.extend(categorical.iter().map(|c| c.to_string()));
        record.push(label.to_string());
        records.push(record);
    }

    let rows: Vec<chitree::Row> = records
        .into_iter()
        .map(|r| header.iter().cloned().zip(r).collect())
        .collect();
    Dataset::new(&header, rows, "y", chitree::default_classifier).unwrap()
}
