use strum::{EnumCount, VariantArray};

use crate::env::{Action, Inputs, Light};

/// Discrete summary of what the agent perceives, used to index the Q-table
///
/// The right-hand traffic is sensed by the environment but is not part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey {
    pub light: Light,
    pub oncoming: Action,
    pub left: Action,
    /// Next waypoint suggested by the route planner
    pub direction: Action,
}

impl StateKey {
    /// Number of distinct keys, the full product of the field domains
    pub const COUNT: usize = Light::COUNT * Action::COUNT * Action::COUNT * Action::COUNT;

    /// Build a key from sensed inputs and the planner's waypoint
    pub fn encode(inputs: &Inputs, waypoint: Action) -> Self {
        Self {
            light: inputs.light,
            oncoming: inputs.oncoming,
            left: inputs.left,
            direction: waypoint,
        }
    }

    /// Dense index of this key in `0..StateKey::COUNT`
    pub fn index(&self) -> usize {
        let n = Action::COUNT;
        ((self.light as usize * n + self.oncoming as usize) * n + self.left as usize) * n
            + self.direction as usize
    }

    /// Inverse of [`index`](Self::index), `None` when `ix` is out of range
    pub fn from_index(ix: usize) -> Option<Self> {
        if ix >= Self::COUNT {
            return None;
        }
        let n = Action::COUNT;
        Some(Self {
            light: Light::VARIANTS[ix / (n * n * n)],
            oncoming: Action::VARIANTS[ix / (n * n) % n],
            left: Action::VARIANTS[ix / n % n],
            direction: Action::VARIANTS[ix % n],
        })
    }

    /// Every possible key, in index order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).filter_map(Self::from_index)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn index_round_trip() {
        assert_eq!(StateKey::COUNT, 128, "2 lights x 4 x 4 x 4 intents");

        let keys = StateKey::all().collect::<Vec<_>>();
        assert_eq!(keys.len(), StateKey::COUNT);
        for (ix, key) in keys.iter().enumerate() {
            assert_eq!(key.index(), ix, "index matches position for {key:?}");
        }

        let unique = keys.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), StateKey::COUNT, "keys are distinct");
        assert_eq!(StateKey::from_index(StateKey::COUNT), None);
    }

    #[test]
    fn encode_copies_fields() {
        let inputs = Inputs {
            light: Light::Green,
            oncoming: Action::Left,
            left: Action::Forward,
            right: Action::Right,
        };
        let key = StateKey::encode(&inputs, Action::Right);
        assert_eq!(
            key,
            StateKey {
                light: Light::Green,
                oncoming: Action::Left,
                left: Action::Forward,
                direction: Action::Right,
            }
        );

        let other_right = Inputs {
            right: Action::Idle,
            ..inputs
        };
        assert_eq!(
            StateKey::encode(&other_right, Action::Right),
            key,
            "right-hand traffic does not change the key"
        );
    }
}
