use std::collections::HashSet;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, error, warn};

use crate::config::WorksheetSettings;
use crate::worksheet_engine::models::{GenerationConfig, Operator, OperatorMode, Problem};

/// Attempts allowed per requested problem before giving up on a batch.
pub const ATTEMPTS_PER_PROBLEM: usize = 5;

/// Upper bound on the up-front reservation; larger batches grow on demand.
const PREALLOCATE_LIMIT: usize = 1024;

/// Core entry point: seed the RNG from the config and build one batch.
pub fn generate_questions(config: &GenerationConfig) -> Vec<Problem> {
    let mut rng: StdRng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    };
    generate_questions_with(&mut rng, config)
}

/// Build a batch of unique problems from `rng`.
pub fn generate_questions_with<R: Rng>(rng: &mut R, config: &GenerationConfig) -> Vec<Problem> {
    generate_batch_with(rng, config).problems
}

/// One generation pass plus the number of draws it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBatch {
    pub problems: Vec<Problem>,
    pub attempts: usize,
}

/// The loop is bounded by `count * 5` attempts, so a constraint space too small
/// to hold `count` distinct problems yields a short batch instead of spinning.
pub fn generate_batch_with<R: Rng>(rng: &mut R, config: &GenerationConfig) -> QuestionBatch {
    let empty = QuestionBatch { problems: Vec::new(), attempts: 0 };
    if config.count == 0 {
        return empty;
    }
    if config.min_value > config.max_value {
        warn!(
            min = config.min_value,
            max = config.max_value,
            "minimum exceeds maximum, no problems generated"
        );
        return empty;
    }

    let max_attempts = config.count.saturating_mul(ATTEMPTS_PER_PROBLEM);
    let space = key_space(config);
    let reserve = (config.count as u128).min(space).min(PREALLOCATE_LIMIT as u128) as usize;
    let mut seen: HashSet<String> = HashSet::with_capacity(reserve);
    let mut problems: Vec<Problem> = Vec::with_capacity(reserve);
    let mut attempts = 0usize;

    // Once every distinct problem has been drawn, further draws can only collide.
    while problems.len() < config.count && attempts < max_attempts && (problems.len() as u128) < space {
        let mut operand1 = rng.gen_range(config.min_value..=config.max_value);
        let mut operand2 = rng.gen_range(config.min_value..=config.max_value);

        let operator = match config.operator_mode {
            OperatorMode::Addition    => Operator::Add,
            OperatorMode::Subtraction => Operator::Subtract,
            OperatorMode::Mixed       => if rng.gen_bool(0.5) { Operator::Subtract } else { Operator::Add },
        };

        // Keep differences non-negative. Skews subtraction toward larger first operands.
        if operator == Operator::Subtract && operand1 < operand2 {
            std::mem::swap(&mut operand1, &mut operand2);
        }

        let problem = Problem { operand1, operand2, operator, orientation: config.orientation };
        if seen.insert(problem.text_key()) {
            problems.push(problem);
        }
        attempts += 1;
    }

    if problems.len() < config.count {
        debug!(
            requested = config.count,
            generated = problems.len(),
            attempts,
            "retry budget exhausted before batch was full"
        );
    } else {
        debug!(generated = problems.len(), attempts, "batch generated");
    }
    QuestionBatch { problems, attempts }
}

/// Number of distinct text keys the config can produce. Saturates for ranges
/// near the full `i64` span.
pub fn key_space(config: &GenerationConfig) -> u128 {
    if config.min_value > config.max_value {
        return 0;
    }
    let n = (config.max_value as i128 - config.min_value as i128 + 1) as u128;
    let sums = n.saturating_mul(n);
    // Subtraction keeps only pairs with operand1 >= operand2.
    let differences = n.saturating_mul(n + 1) / 2;
    match config.operator_mode {
        OperatorMode::Addition    => sums,
        OperatorMode::Subtraction => differences,
        OperatorMode::Mixed       => sums.saturating_add(differences),
    }
}

/// Generate from raw settings. A missing setting aborts with an empty batch.
pub fn generate_from_settings(settings: &WorksheetSettings) -> Vec<Problem> {
    match settings.generation_config() {
        Ok(config) => generate_questions(&config),
        Err(e) => {
            error!("cannot generate questions: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worksheet_engine::models::Orientation;

    #[test]
    fn zero_count_is_empty() {
        let config = GenerationConfig::new(1, 10, 0).with_seed(1);
        assert!(generate_questions(&config).is_empty());
    }

    #[test]
    fn inverted_range_does_not_panic() {
        let config = GenerationConfig::new(10, 1, 5).with_seed(1);
        assert!(generate_questions(&config).is_empty());
    }

    #[test]
    fn exhausted_key_space_stops_drawing() {
        let mut rng = StdRng::seed_from_u64(9);
        let batch = generate_batch_with(&mut rng, &GenerationConfig::new(3, 3, 1_000));
        assert_eq!(batch.problems.len(), 1);
        assert_eq!(batch.problems[0].text_key(), "3 + 3 = ");
        assert_eq!(batch.attempts, 1);
    }

    #[test]
    fn huge_count_over_tiny_range_does_not_allocate_up_front() {
        for mode in [OperatorMode::Addition, OperatorMode::Subtraction, OperatorMode::Mixed] {
            let mut rng = StdRng::seed_from_u64(11);
            let config = GenerationConfig::new(1, 2, usize::MAX / 8).with_mode(mode);
            let batch = generate_batch_with(&mut rng, &config);
            assert_eq!(batch.problems.len() as u128, key_space(&config), "{mode:?}");
        }
    }

    #[test]
    fn key_space_counts_distinct_problems() {
        let config = GenerationConfig::new(1, 3, 1);
        assert_eq!(key_space(&config), 9);
        assert_eq!(key_space(&config.clone().with_mode(OperatorMode::Subtraction)), 6);
        assert_eq!(key_space(&config.clone().with_mode(OperatorMode::Mixed)), 15);
        assert_eq!(key_space(&GenerationConfig::new(5, 1, 1)), 0);
        let full = GenerationConfig::new(i64::MIN, i64::MAX, 1).with_mode(OperatorMode::Mixed);
        assert_eq!(key_space(&full), u128::MAX);
    }

    #[test]
    fn full_batch_stops_early() {
        let mut rng = StdRng::seed_from_u64(4);
        let batch = generate_batch_with(&mut rng, &GenerationConfig::new(1, 1_000, 10));
        assert_eq!(batch.problems.len(), 10);
        assert!(batch.attempts >= 10 && batch.attempts <= 50);
    }

    #[test]
    fn orientation_is_uniform_across_batch() {
        let config = GenerationConfig::new(1, 20, 15)
            .with_orientation(Orientation::Vertical)
            .with_seed(3);
        let problems = generate_questions(&config);
        assert!(problems.iter().all(|p| p.orientation == Orientation::Vertical));
    }

    #[test]
    fn seeded_batches_are_reproducible() {
        let config = GenerationConfig::new(0, 50, 20).with_mode(OperatorMode::Mixed).with_seed(77);
        assert_eq!(generate_questions(&config), generate_questions(&config));
    }
}
