use log::trace;
use rand::{rngs::ThreadRng, thread_rng, Rng};
use strum::{EnumCount, VariantArray};

use crate::{ensure_interval, env::Action, state::StateKey, Result};

/// Configuration for the [`QTableLearner`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QTableLearnerConfig {
    /// The learning rate, must be in the interval `[0, 1]`
    ///
    /// **Default**: `0.5`
    pub alpha: f32,
    /// The discount factor, must be in the interval `[0, 1]`
    ///
    /// **Default**: `0.5`
    pub gamma: f32,
}

impl Default for QTableLearnerConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            gamma: 0.5,
        }
    }
}

/// Estimated values of every [`Action`] in a single state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActionValues([f32; Action::COUNT]);

impl ActionValues {
    pub fn get(&self, action: Action) -> f32 {
        self.0[action as usize]
    }

    fn set(&mut self, action: Action, value: f32) {
        self.0[action as usize] = value;
    }

    /// Iterate over `(action, value)` pairs in action order
    pub fn iter(&self) -> impl Iterator<Item = (Action, f32)> + '_ {
        Action::VARIANTS.iter().map(|&a| (a, self.get(a)))
    }

    /// The highest value in the row
    pub fn max(&self) -> f32 {
        self.0.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Every action whose value equals the row maximum
    pub fn best_actions(&self) -> Vec<Action> {
        let max = self.max();
        self.iter()
            .filter(|&(_, v)| v == max)
            .map(|(a, _)| a)
            .collect()
    }
}

/// A table holding one [`ActionValues`] row for every [`StateKey`]
///
/// The table is fully populated at construction, so a lookup can never miss.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    rows: [ActionValues; StateKey::COUNT],
}

impl QTable {
    /// A table with every value set to `0.0`
    pub fn new() -> Self {
        Self {
            rows: [ActionValues::default(); StateKey::COUNT],
        }
    }

    pub fn get(&self, state: StateKey) -> &ActionValues {
        &self.rows[state.index()]
    }

    fn get_mut(&mut self, state: StateKey) -> &mut ActionValues {
        &mut self.rows[state.index()]
    }

    /// Number of state rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over every `(state, row)` pair in index order
    pub fn iter(&self) -> impl Iterator<Item = (StateKey, &ActionValues)> {
        StateKey::all().map(|s| (s, self.get(s)))
    }
}

impl Default for QTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A Q-learning core over a fully pre-populated [`QTable`]
///
/// The policy is greedy over the Q-values. Ties are broken by a uniform random
/// draw among the tied actions, which is the only source of exploration: there
/// is no epsilon schedule.
///
/// ### Generics
/// - `R` - The random source used for tie-breaking, the thread RNG by default
pub struct QTableLearner<R: Rng = ThreadRng> {
    q_table: QTable,
    alpha: f32, // learning rate
    gamma: f32, // discount factor
    rng: R,
}

impl QTableLearner {
    /// Initialize a new `QTableLearner` that breaks ties with the thread RNG
    ///
    /// **Errors** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(config: QTableLearnerConfig) -> Result<Self> {
        Self::with_rng(config, thread_rng())
    }
}

impl<R: Rng> QTableLearner<R> {
    /// Initialize a new `QTableLearner` with a provided random source
    ///
    /// **Errors** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn with_rng(config: QTableLearnerConfig, rng: R) -> Result<Self> {
        let QTableLearnerConfig { alpha, gamma } = config;
        ensure_interval!(alpha, 0.0, 1.0);
        ensure_interval!(gamma, 0.0, 1.0);
        Ok(Self {
            q_table: QTable::new(),
            alpha,
            gamma,
            rng,
        })
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Choose the greedy action in `state`, breaking ties uniformly at random
    pub fn select_action(&mut self, state: StateKey) -> Action {
        let ties = self.q_table.get(state).best_actions();
        let ix = self.rng.gen_range(0..ties.len());
        ties[ix]
    }

    /// Apply the one-step Q-learning update for taking `action` in `state`
    ///
    /// Q(s,a) ← (1 - α)Q(s,a) + α(r + γ max<sub>a'</sub> Q(s',a'))
    ///
    /// `reward` must be finite. A NaN would poison the row and leave no greedy action to select.
    pub fn update(&mut self, state: StateKey, action: Action, reward: f32, next_state: StateKey) {
        debug_assert!(reward.is_finite(), "Reward must be finite, got {reward}.");
        let max_next_q = self.q_table.get(next_state).max();
        let row = self.q_table.get_mut(state);
        let q_value = row.get(action);
        let new_q_value =
            (1.0 - self.alpha) * q_value + self.alpha * (reward + self.gamma * max_next_q);
        row.set(action, new_q_value);

        trace!("Q[{state:?}][{action}]: {q_value} -> {new_q_value} (reward = {reward})");
    }
}
