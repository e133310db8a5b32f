use std::{error::Error, path::PathBuf};

use clap::Parser;
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use smartcab::{
    algo::{QTableLearner, QTableLearnerConfig},
    gym::{Simulator, SmartcabWorld, WorldConfig},
    planner::RoutePlanner,
    LearningAgent,
};
use tracing_subscriber::EnvFilter;

/// Train a smartcab to drive a grid world with Q-learning
#[derive(Parser, Debug)]
struct Args {
    /// Number of trials to run
    #[arg(short = 'n', long, default_value_t = 100)]
    trials: u32,

    /// Number of dummy vehicles sharing the roads
    #[arg(long, default_value_t = 3)]
    dummies: usize,

    /// Keep driving after the deadline, up to the hard time limit
    #[arg(long)]
    no_deadline: bool,

    /// Learning rate
    #[arg(long, default_value_t = 0.5)]
    alpha: f32,

    /// Discount factor
    #[arg(long, default_value_t = 0.5)]
    gamma: f32,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Write one CSV row per trial to this file
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let (world_rng, agent_rng) = match args.seed {
        Some(seed) => (StdRng::seed_from_u64(seed), StdRng::seed_from_u64(seed.wrapping_add(1))),
        None => (StdRng::from_entropy(), StdRng::from_entropy()),
    };

    let world_config = WorldConfig {
        num_dummies: args.dummies,
        enforce_deadline: !args.no_deadline,
        ..Default::default()
    };
    let mut world = SmartcabWorld::with_rng(world_config, world_rng)?;

    let learner_config = QTableLearnerConfig {
        alpha: args.alpha,
        gamma: args.gamma,
    };
    let learner = QTableLearner::with_rng(learner_config, agent_rng)?;
    let mut agent = LearningAgent::from_parts(learner, RoutePlanner::new());

    let reports = Simulator::new(args.trials).run(&mut world, &mut agent);

    let successes = agent.success_count();
    info!(
        "The success rate is {:.1}% ({successes} of {} trials)",
        100.0 * successes as f64 / args.trials.max(1) as f64,
        args.trials
    );

    if let Some(path) = args.out {
        let mut wtr = csv::Writer::from_path(&path)?;
        wtr.write_record(["trial", "steps", "reached", "reward"])?;
        for (report, reward) in reports.iter().zip(agent.trial_rewards()) {
            wtr.write_record([
                report.trial.to_string(),
                report.steps.to_string(),
                report.reached.to_string(),
                reward.to_string(),
            ])?;
        }
        wtr.flush()?;
        info!("Wrote {} trials to {}", reports.len(), path.display());
    }

    Ok(())
}
