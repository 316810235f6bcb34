use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};

use imbalanced_training::{
    arch::{activations::ActFn, layers::Dense, loss::Bce, Sequential},
    dataset::{two_blobs, Dataset},
    eval::{evaluate, Evaluation},
    optimization::GradientDescent,
    training::Trainer,
    weights::ClassWeights,
};

const DATA_SEED: u64 = 7;
const SPLIT_SEED: u64 = 21;
const PARAM_SEED: u64 = 42;

const MINORITY_REMOVED: usize = 200;
const TEST_RATIO: f32 = 0.25;
const HIDDEN_UNITS: usize = 10;

// The epoch budget has to stay well below what full-batch descent needs to
// recover the starved class on its own: at ~3% of the training mass the
// minority's pull on the gradient is ~15x weaker than under balanced weights,
// so a budget the weighted run converges in leaves the unweighted run stuck
// predicting the majority.
const EPOCHS: usize = 100;
const LEARNING_RATE: f32 = 0.05;

fn main() -> Result<()> {
    env_logger::init();

    // 212 positive / 357 negative rows, then starve the positive class
    let dataset = two_blobs(357, 212, 2.0, 1.0, DATA_SEED)?;
    let dataset = dataset.remove_labeled(1.0, MINORITY_REMOVED)?;
    log::info!(
        "after removal: {} positive / {} negative rows",
        dataset.count(1.0),
        dataset.count(0.0)
    );

    let (train, test) = dataset.split(TEST_RATIO, SPLIT_SEED)?;
    log::info!("train {} rows, test {} rows", train.len(), test.len());

    let class_weights = ClassWeights::balanced(train.labels())?;
    log::info!(
        "class weights: positive {:.4}, negative {:.4}",
        class_weights.weight(1.0),
        class_weights.weight(0.0)
    );

    let unweighted = train_and_evaluate(&train, &test, Bce::new())?;
    let weighted = train_and_evaluate(&train, &test, Bce::weighted(class_weights))?;

    println!(
        "unweighted: positive fraction {:.4}, accuracy {:.4}",
        unweighted.positive_fraction, unweighted.accuracy
    );
    println!(
        "weighted:   positive fraction {:.4}, accuracy {:.4}",
        weighted.positive_fraction, weighted.accuracy
    );

    Ok(())
}

/// Trains a fresh model on `train` under the given loss and scores it on `test`.
fn train_and_evaluate(train: &Dataset, test: &Dataset, loss_fn: Bce) -> Result<Evaluation> {
    let model = Sequential::new([
        Dense::new((train.n_features(), HIDDEN_UNITS), Some(ActFn::relu())),
        Dense::new((HIDDEN_UNITS, 1), Some(ActFn::sigmoid(1.0))),
    ]);

    let mut rng = StdRng::seed_from_u64(PARAM_SEED);
    let mut params = model.init_params(&mut rng);

    let mut trainer = Trainer::new(model, GradientDescent::new(LEARNING_RATE), loss_fn, EPOCHS);
    let losses = trainer.fit(&mut params, train.features(), train.targets())?;
    log::info!(
        "trained for {EPOCHS} epochs, loss {:.4} -> {:.4}",
        losses.first().copied().unwrap_or(f32::NAN),
        losses.last().copied().unwrap_or(f32::NAN)
    );

    let mut model = trainer.into_model();
    Ok(evaluate(&mut model, &params, test.features(), test.targets())?)
}
