use cellforge_core::{GameConfig, RunSummary, Session, ToggleOutcome};

fn seeded_run(seed: u64, steps: usize) -> (RunSummary, Vec<bool>) {
    let config = GameConfig {
        seed,
        ..GameConfig::default()
    };
    let mut session = Session::try_new(config).expect("default config is valid");
    session.seed_random_life(0.3);
    let summary = session
        .try_run_experiment(steps, 5)
        .expect("experiment within bounds");
    let final_alive = session.grid().cells().iter().map(|c| c.alive).collect();
    (summary, final_alive)
}

#[test]
fn identical_seeds_reproduce_identical_runs() {
    let (summary_a, alive_a) = seeded_run(42, 60);
    let (summary_b, alive_b) = seeded_run(42, 60);
    assert_eq!(summary_a, summary_b);
    assert_eq!(alive_a, alive_b);
}

#[test]
fn different_seeds_diverge() {
    let (summary_a, alive_a) = seeded_run(42, 60);
    let (summary_c, alive_c) = seeded_run(43, 60);
    assert!(
        summary_a != summary_c || alive_a != alive_c,
        "different seeds should produce observably different runs"
    );
}

#[test]
fn node_placement_respects_quota_across_seeds() {
    for seed in 0..20 {
        let config = GameConfig {
            seed,
            ..GameConfig::default()
        };
        let session = Session::try_new(config).unwrap();
        let quota = session.config().node_quota();
        assert!(
            session.grid().resource_node_count() <= quota,
            "seed {seed}: node count exceeds quota {quota}"
        );
    }
}

#[test]
fn node_flags_survive_every_operation() {
    let mut session = Session::try_new(GameConfig {
        seed: 7,
        ..GameConfig::default()
    })
    .unwrap();
    session.seed_random_life(0.25);
    let nodes_before: Vec<bool> = session
        .grid()
        .cells()
        .iter()
        .map(|c| c.resource_node)
        .collect();

    for _ in 0..25 {
        session.tick();
    }
    session.toggle_cell(0, 0);
    session.submit();
    session.clear();

    let nodes_after: Vec<bool> = session
        .grid()
        .cells()
        .iter()
        .map(|c| c.resource_node)
        .collect();
    assert_eq!(nodes_before, nodes_after);
}

#[test]
fn default_session_affords_exactly_three_builds() {
    let mut session = Session::try_new(GameConfig::default()).unwrap();
    for col in 0..3 {
        assert!(matches!(
            session.toggle_cell(0, col),
            ToggleOutcome::Staged { .. }
        ));
    }
    assert_eq!(session.resources(), 0);
    assert_eq!(
        session.toggle_cell(0, 3),
        ToggleOutcome::InsufficientResources
    );
}

#[test]
fn experiment_guard_rails_reject_oversized_runs() {
    use cellforge_core::ExperimentError;

    let mut session = Session::try_new(GameConfig::default()).unwrap();
    assert!(matches!(
        session.try_run_experiment(Session::MAX_EXPERIMENT_STEPS + 1, 1),
        Err(ExperimentError::TooManySteps { .. })
    ));
    // 100k ticks sampled every tick would overflow the sample cap; rejected
    // before any tick runs.
    assert!(matches!(
        session.try_run_experiment(100_000, 1),
        Err(ExperimentError::TooManySamples { .. })
    ));
    assert_eq!(session.tick_index(), 0);
}

#[test]
fn run_summary_round_trips_through_json() {
    let (summary, _) = seeded_run(42, 20);
    let encoded = serde_json::to_string(&summary).expect("summary serializes");
    let decoded: RunSummary = serde_json::from_str(&encoded).expect("summary deserializes");
    assert_eq!(summary, decoded);
}
