use log::info;
use rand::Rng;

use crate::agent::Agent;

use super::world::SmartcabWorld;

/// Outcome of a single trial as observed by the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialReport {
    pub trial: u32,
    pub steps: u32,
    pub reached: bool,
}

/// Runs an agent through a fixed number of trials in a [`SmartcabWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Simulator {
    n_trials: u32,
}

impl Simulator {
    pub fn new(n_trials: u32) -> Self {
        Self { n_trials }
    }

    pub fn n_trials(&self) -> u32 {
        self.n_trials
    }

    /// Run every trial to completion
    ///
    /// The agent is reset with each trial's destination and told when the trial is over.
    pub fn run<R, A>(&self, world: &mut SmartcabWorld<R>, agent: &mut A) -> Vec<TrialReport>
    where
        R: Rng,
        A: Agent<SmartcabWorld<R>>,
    {
        let mut reports = Vec::with_capacity(self.n_trials as usize);
        for trial in 0..self.n_trials {
            let destination = world.reset();
            agent.reset(destination);

            while !world.is_done() {
                world.step(agent);
            }
            agent.finish();

            let report = TrialReport {
                trial,
                steps: world.t(),
                reached: world.reached(),
            };
            info!(
                "Trial {} {} after {} steps",
                trial + 1,
                if report.reached { "succeeded" } else { "failed" },
                report.steps
            );
            reports.push(report);
        }

        reports
    }
}
