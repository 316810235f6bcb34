#![cfg(test)]

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    arch::{activations::ActFn, layers::Dense, loss::Bce, Sequential},
    dataset::{two_blobs, Dataset},
    eval::{evaluate, Evaluation},
    optimization::GradientDescent,
    training::Trainer,
    weights::ClassWeights,
};

// a budget the weighted run converges in while the unweighted run is still
// stuck on the majority class; see main.rs
const EPOCHS: usize = 100;
const LEARNING_RATE: f32 = 0.05;
const HIDDEN_UNITS: usize = 10;

fn train_and_evaluate(train: &Dataset, test: &Dataset, loss_fn: Bce) -> Evaluation {
    let model = Sequential::new([
        Dense::new((train.n_features(), HIDDEN_UNITS), Some(ActFn::relu())),
        Dense::new((HIDDEN_UNITS, 1), Some(ActFn::sigmoid(1.0))),
    ]);

    let mut params = model.init_params(&mut StdRng::seed_from_u64(42));
    let mut trainer = Trainer::new(model, GradientDescent::new(LEARNING_RATE), loss_fn, EPOCHS);
    trainer
        .fit(&mut params, train.features(), train.targets())
        .unwrap();

    let mut model = trainer.into_model();
    evaluate(&mut model, &params, test.features(), test.targets()).unwrap()
}

#[test]
fn injection_produces_the_scenario_counts_and_weights() {
    let dataset = two_blobs(357, 212, 2.0, 1.0, 7).unwrap();
    let dataset = dataset.remove_labeled(1.0, 200).unwrap();

    assert_eq!(dataset.count(1.0), 12);
    assert_eq!(dataset.count(0.0), 357);

    let cw = ClassWeights::balanced(dataset.labels()).unwrap();
    assert!((cw.weight(1.0) - 15.375).abs() < 1e-3);
    assert!((cw.weight(0.0) - 0.5168).abs() < 1e-3);
}

#[test]
fn class_weights_rescue_the_starved_class() {
    let dataset = two_blobs(357, 212, 2.0, 1.0, 7).unwrap();
    let dataset = dataset.remove_labeled(1.0, 200).unwrap();
    let (train, test) = dataset.split(0.25, 21).unwrap();

    let class_weights = ClassWeights::balanced(train.labels()).unwrap();

    let unweighted = train_and_evaluate(&train, &test, Bce::new());
    let weighted = train_and_evaluate(&train, &test, Bce::weighted(class_weights));

    // the unweighted run collapses to the majority class
    assert!(
        unweighted.positive_fraction < 0.02,
        "unweighted positive fraction: {}",
        unweighted.positive_fraction
    );

    // the weighted run still predicts the minority class
    assert!(
        weighted.positive_fraction > 0.02,
        "weighted positive fraction: {}",
        weighted.positive_fraction
    );

    assert!(
        weighted.accuracy > unweighted.accuracy,
        "weighted {} vs unweighted {}",
        weighted.accuracy,
        unweighted.accuracy
    );
    assert!(weighted.accuracy > 0.95, "weighted accuracy: {}", weighted.accuracy);
}
