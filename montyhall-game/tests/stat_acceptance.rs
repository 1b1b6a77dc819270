use montyhall_game::{
    CLASSICAL_MONTY_HALL, Door, MontyHallExperiment, RevealRule, SimulationConfig, StrategyId,
    expected_win_probability,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const SAMPLE_SIZE: usize = 100_000;
const TOLERANCE: f64 = 0.02;

fn assert_near(observed: f64, expected: f64, label: &str) {
    assert!(
        (observed - expected).abs() <= TOLERANCE,
        "{label} drifted: observed {observed:.4}, expected {expected:.4}"
    );
}

#[test]
fn classical_swap_converges_to_two_thirds() {
    let mut rng = SmallRng::seed_from_u64(0xACED);
    let rate = CLASSICAL_MONTY_HALL
        .run_simulations_with(&StrategyId::AlwaysSwap, SAMPLE_SIZE, &mut rng)
        .expect("positive trial count");
    assert_near(rate, 2.0 / 3.0, "always swap");
}

#[test]
fn classical_stay_converges_to_one_third() {
    let mut rng = SmallRng::seed_from_u64(0xBEEF);
    let rate = CLASSICAL_MONTY_HALL
        .run_simulations_with(&StrategyId::NeverSwap, SAMPLE_SIZE, &mut rng)
        .expect("positive trial count");
    assert_near(rate, 1.0 / 3.0, "never swap");
}

#[test]
fn never_swap_converges_to_one_over_n() {
    for (idx, doors) in [4usize, 5, 7, 10].into_iter().enumerate() {
        let experiment = MontyHallExperiment::with_door_count(doors).expect("valid door count");
        let mut rng = SmallRng::seed_from_u64(0xD00D + idx as u64);
        let rate = experiment
            .run_simulations_with(&StrategyId::NeverSwap, 20_000, &mut rng)
            .expect("positive trial count");
        assert_near(rate, 1.0 / doors as f64, &format!("never swap with {doors} doors"));
    }
}

#[test]
fn multi_door_swap_tracks_closed_form() {
    for doors in [4usize, 6] {
        let experiment = MontyHallExperiment::with_door_count(doors).expect("valid door count");
        for rule in [RevealRule::Single, RevealRule::Progressive] {
            let cfg = SimulationConfig::new(40_000)
                .with_seed(0xF00D)
                .with_workers(2)
                .with_reveal(rule);
            let report = experiment
                .simulate(&StrategyId::AlwaysSwap, &cfg)
                .expect("valid config");
            let expected = expected_win_probability(doors, StrategyId::AlwaysSwap, rule)
                .expect("at least three doors");
            assert_near(
                report.win_rate,
                expected,
                &format!("always swap, {doors} doors, {rule} reveal"),
            );
        }
    }
}

#[test]
fn weighted_doors_swap_near_two_thirds() {
    let experiment = MontyHallExperiment::new([
        Door::new(0.5).expect("valid"),
        Door::new(0.3).expect("valid"),
        Door::new(0.2).expect("valid"),
    ])
    .expect("probabilities sum to one");
    let mut rng = SmallRng::seed_from_u64(0x5EED);
    let rate = experiment
        .run_simulations_with(&StrategyId::AlwaysSwap, 20_000, &mut rng)
        .expect("positive trial count");
    assert!((0.0..=1.0).contains(&rate));
    assert!((0.64..=0.69).contains(&rate), "weighted swap rate {rate:.4}");
}

#[test]
fn weighted_prize_distribution_follows_door_probabilities() {
    let experiment =
        MontyHallExperiment::from_probabilities(&[0.5, 0.3, 0.2]).expect("valid doors");
    let mut rng = SmallRng::seed_from_u64(0xCAFE);
    let mut hits = [0usize; 3];
    for _ in 0..SAMPLE_SIZE {
        let record = experiment.play_trial(&StrategyId::NeverSwap, RevealRule::Single, &mut rng);
        hits[record.prize] += 1;
    }
    for (door, expected) in [0.5, 0.3, 0.2].into_iter().enumerate() {
        let observed = hits[door] as f64 / SAMPLE_SIZE as f64;
        assert_near(observed, expected, &format!("prize frequency of door {door}"));
    }
}
