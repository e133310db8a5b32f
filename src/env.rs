use strum::{Display, EnumCount, VariantArray};

/// Grid coordinates of an intersection, `x` growing east and `y` growing south
pub type Location = (i32, i32);

/// Unit vector of travel, e.g. `(1, 0)` is east and `(0, -1)` is north
pub type Heading = (i32, i32);

/// The four headings a vehicle can have, in clockwise order starting east
pub const HEADINGS: [Heading; 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// A driving action, also used to describe the intent of other traffic
///
/// `Idle` is the no-op. When reported as traffic intent it means there is no
/// vehicle on that approach, and as a waypoint it means the destination is reached.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, VariantArray,
)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Idle = 0,
    Forward = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    /// Actions that actually move a vehicle
    pub const MOVES: [Action; 3] = [Action::Forward, Action::Left, Action::Right];

    /// Heading after taking this action from `heading`
    pub fn turn(self, heading: Heading) -> Heading {
        match self {
            Action::Left => (heading.1, -heading.0),
            Action::Right => (-heading.1, heading.0),
            Action::Idle | Action::Forward => heading,
        }
    }
}

/// Traffic light color as seen from the sensing vehicle's approach
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, VariantArray,
)]
#[strum(serialize_all = "lowercase")]
pub enum Light {
    Green = 0,
    Red = 1,
}

/// What a vehicle senses at its current intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Inputs {
    pub light: Light,
    pub oncoming: Action,
    pub left: Action,
    pub right: Action,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            light: Light::Red,
            oncoming: Action::Idle,
            left: Action::Idle,
            right: Action::Idle,
        }
    }
}

/// The world as seen by the primary (learning) agent
///
/// Every method refers to the primary agent: its sensed traffic, its remaining
/// deadline, its position, and the consequences of its actions.
pub trait Environment {
    /// Sense the light and surrounding traffic at the agent's intersection
    fn sense(&self) -> Inputs;

    /// Steps left before the trial's deadline expires, negative once it has
    fn deadline(&self) -> i32;

    /// Apply an action taken by the agent
    ///
    /// **Returns** the reward for the action
    fn act(&mut self, action: Action) -> f32;

    /// Current location of the agent
    fn location(&self) -> Location;

    /// Current heading of the agent
    fn heading(&self) -> Heading;
}
