#![cfg(feature = "gym")]

use rand::{rngs::StdRng, SeedableRng};
use smartcab::{
    algo::{QTableLearner, QTableLearnerConfig},
    gym::{Simulator, SmartcabWorld, WorldConfig},
    planner::RoutePlanner,
    LearningAgent,
};

fn setup(seed: u64) -> (SmartcabWorld<StdRng>, LearningAgent<RoutePlanner, StdRng>) {
    let rng = StdRng::seed_from_u64(seed);
    let world = SmartcabWorld::with_rng(WorldConfig::default(), rng).unwrap();
    let learner = QTableLearner::with_rng(
        QTableLearnerConfig::default(),
        StdRng::seed_from_u64(seed + 1),
    )
    .unwrap();
    (world, LearningAgent::from_parts(learner, RoutePlanner::new()))
}

#[test]
fn one_outcome_per_trial() {
    let (mut world, mut agent) = setup(4);
    let reports = Simulator::new(30).run(&mut world, &mut agent);

    assert_eq!(reports.len(), 30);
    assert_eq!(agent.successes().len(), 30);
    assert_eq!(agent.trial_rewards().len(), 30);
    for (report, &success) in reports.iter().zip(agent.successes()) {
        assert_eq!(report.reached, success, "trial {}", report.trial);
        assert!(report.steps > 0);
    }
    assert_eq!(
        agent.success_count(),
        reports.iter().filter(|r| r.reached).count()
    );
}

#[test]
fn learning_moves_values_off_zero() {
    let (mut world, mut agent) = setup(8);
    Simulator::new(10).run(&mut world, &mut agent);

    let touched = agent
        .learner()
        .q_table()
        .iter()
        .flat_map(|(_, row)| row.iter())
        .filter(|&(_, v)| v != 0.0)
        .count();
    assert!(touched > 0, "the table was updated");
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = |seed| {
        let (mut world, mut agent) = setup(seed);
        let reports = Simulator::new(5).run(&mut world, &mut agent);
        (reports, agent.trial_rewards().to_vec())
    };
    assert_eq!(run(21), run(21));
}
