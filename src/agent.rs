use log::debug;
use rand::{rngs::ThreadRng, Rng};

use crate::{
    algo::{QTableLearner, QTableLearnerConfig},
    env::{Environment, Location},
    planner::{Planner, RoutePlanner},
    state::StateKey,
    Result,
};

/// Something that drives in an [`Environment`], one trial at a time
pub trait Agent<E: Environment> {
    /// Prepare for a new trial towards `destination`
    fn reset(&mut self, destination: Location);

    /// Take a single step at time `t`
    fn update(&mut self, env: &mut E, t: u32);

    /// Called once the current trial is over
    fn finish(&mut self) {}
}

/// Bookkeeping for the trial in progress
#[derive(Debug, Clone, Copy, PartialEq)]
struct Trial {
    destination: Location,
    reward: f32,
    success: bool,
}

/// A smartcab that learns to drive with a [`QTableLearner`]
///
/// The learner persists across trials, so experience accumulates over the whole run.
/// Each finished trial leaves one success flag and one total reward behind.
///
/// ### Generics
/// - `P` - The [`Planner`] providing the navigation hint
/// - `R` - The random source of the learner
pub struct LearningAgent<P: Planner = RoutePlanner, R: Rng = ThreadRng> {
    learner: QTableLearner<R>,
    planner: P,
    trial: Option<Trial>,
    successes: Vec<bool>,
    trial_rewards: Vec<f32>,
}

impl LearningAgent {
    /// Initialize a new `LearningAgent` with a [`RoutePlanner`] and the thread RNG
    pub fn new(config: QTableLearnerConfig) -> Result<Self> {
        Ok(Self::from_parts(QTableLearner::new(config)?, RoutePlanner::new()))
    }
}

impl<P: Planner, R: Rng> LearningAgent<P, R> {
    pub fn from_parts(learner: QTableLearner<R>, planner: P) -> Self {
        Self {
            learner,
            planner,
            trial: None,
            successes: Vec::new(),
            trial_rewards: Vec::new(),
        }
    }

    pub fn learner(&self) -> &QTableLearner<R> {
        &self.learner
    }

    pub fn learner_mut(&mut self) -> &mut QTableLearner<R> {
        &mut self.learner
    }

    /// Success flag of every finished trial
    pub fn successes(&self) -> &[bool] {
        &self.successes
    }

    /// Total reward of every finished trial
    pub fn trial_rewards(&self) -> &[f32] {
        &self.trial_rewards
    }

    pub fn success_count(&self) -> usize {
        self.successes.iter().filter(|&&s| s).count()
    }

    /// Reward collected so far in the trial in progress
    pub fn current_reward(&self) -> Option<f32> {
        self.trial.map(|t| t.reward)
    }

    fn sense<E: Environment>(&self, env: &E) -> StateKey {
        let waypoint = self.planner.next_waypoint(env.location(), env.heading());
        StateKey::encode(&env.sense(), waypoint)
    }
}

impl<E, P, R> Agent<E> for LearningAgent<P, R>
where
    E: Environment,
    P: Planner,
    R: Rng,
{
    fn reset(&mut self, destination: Location) {
        Agent::<E>::finish(self);
        self.planner.route_to(destination);
        self.trial = Some(Trial {
            destination,
            reward: 0.0,
            success: false,
        });
    }

    fn update(&mut self, env: &mut E, t: u32) {
        let inputs = env.sense();
        let deadline = env.deadline();
        let waypoint = self.planner.next_waypoint(env.location(), env.heading());
        let state = StateKey::encode(&inputs, waypoint);

        let action = self.learner.select_action(state);
        let reward = env.act(action);

        let next_state = self.sense(env);
        self.learner.update(state, action, reward, next_state);

        debug!("t={t} deadline={deadline} inputs={inputs:?} action={action} reward={reward}");

        let trial = self
            .trial
            .as_mut()
            .expect("`reset` is called before the first `update`");
        trial.reward += reward;
        if env.location() == trial.destination && deadline >= 0 {
            trial.success = true;
        }
    }

    fn finish(&mut self) {
        if let Some(trial) = self.trial.take() {
            self.successes.push(trial.success);
            self.trial_rewards.push(trial.reward);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::env::{tests::MockEnv, Action, Inputs, Light};

    fn agent() -> LearningAgent<RoutePlanner, StdRng> {
        let rng = StdRng::seed_from_u64(3);
        let learner = QTableLearner::with_rng(QTableLearnerConfig::default(), rng).unwrap();
        LearningAgent::from_parts(learner, RoutePlanner::new())
    }

    fn green() -> Inputs {
        Inputs {
            light: Light::Green,
            ..Default::default()
        }
    }

    #[test]
    fn one_entry_per_trial() {
        let mut env = MockEnv::new(green());
        let mut agent = agent();

        for _ in 0..3 {
            Agent::<MockEnv>::reset(&mut agent, (5, 1));
            for t in 0..4 {
                agent.update(&mut env, t);
            }
        }
        Agent::<MockEnv>::finish(&mut agent);
        Agent::<MockEnv>::finish(&mut agent);

        assert_eq!(agent.successes(), [false, false, false]);
        assert_eq!(agent.trial_rewards().len(), 3);
        assert_eq!(agent.success_count(), 0);
        assert_eq!(agent.current_reward(), None);
    }

    #[test]
    fn reward_accumulates() {
        let mut env = MockEnv::new(green());
        let mut agent = agent();
        Agent::<MockEnv>::reset(&mut agent, (5, 1));
        for t in 0..10 {
            agent.update(&mut env, t);
        }

        let expected: f32 = env
            .actions
            .iter()
            .map(|&a| if a == Action::Forward { 1.0 } else { -1.0 })
            .sum();
        assert_eq!(agent.current_reward(), Some(expected));
    }

    #[test]
    fn learns_from_the_state_after_acting() {
        let mut env = MockEnv::new(green());
        let mut agent = agent();
        Agent::<MockEnv>::reset(&mut agent, (5, 1));
        agent.update(&mut env, 0);

        let state = StateKey::encode(&green(), Action::Forward);
        let action = env.actions[0];
        let expected = if action == Action::Forward { 0.5 } else { -0.5 };
        assert_eq!(agent.learner().q_table().get(state).get(action), expected);
    }

    #[test]
    fn success_on_arrival_within_deadline() {
        let mut env = MockEnv::new(green());
        let mut agent = agent();

        Agent::<MockEnv>::reset(&mut agent, env.location);
        agent.update(&mut env, 0);
        Agent::<MockEnv>::reset(&mut agent, env.location);
        env.deadline = -1;
        agent.update(&mut env, 0);
        Agent::<MockEnv>::finish(&mut agent);

        assert_eq!(agent.successes(), [true, false], "late arrival is not a success");
        assert_eq!(agent.success_count(), 1);
    }

    #[test]
    #[should_panic(expected = "`reset` is called before the first `update`")]
    fn update_before_reset() {
        let mut env = MockEnv::new(green());
        let mut agent = agent();
        agent.update(&mut env, 0);
    }
}
