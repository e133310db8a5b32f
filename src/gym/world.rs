use log::{info, warn};
use rand::{rngs::ThreadRng, seq::SliceRandom, thread_rng, Rng};

use crate::{
    agent::Agent,
    env::{Action, Environment, Heading, Inputs, Light, Location, HEADINGS},
    planner::navigate,
    util::manhattan,
    Error, Result,
};

use super::traffic_light::TrafficLight;

/// Smallest grid dimension accepted by [`SmartcabWorld`]
pub const MIN_GRID_SIZE: i32 = 3;

/// Minimum distance between the start and the destination of a trial
const MIN_TRIP_DISTANCE: i32 = 4;

/// Attempts made at finding a trip of at least [`MIN_TRIP_DISTANCE`]
const TRIP_ATTEMPTS: usize = 100;

/// Steps allowed per unit of trip distance
const DEADLINE_FACTOR: i32 = 5;

/// Configuration for the [`SmartcabWorld`]
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    /// Number of intersections as `(columns, rows)`
    ///
    /// **Default**: `(8, 6)`
    pub grid_size: (i32, i32),
    /// Number of randomly driving vehicles sharing the roads with the smartcab
    ///
    /// **Default**: `3`
    pub num_dummies: usize,
    /// End the trial as soon as the deadline runs out
    ///
    /// **Default**: `true`
    pub enforce_deadline: bool,
    /// Deadline at which a trial ends even when the deadline is not enforced
    ///
    /// **Default**: `-100`
    pub hard_time_limit: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: (8, 6),
            num_dummies: 3,
            enforce_deadline: true,
            hard_time_limit: -100,
        }
    }
}

/// A vehicle driving at random while obeying the traffic rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dummy {
    location: Location,
    heading: Heading,
    waypoint: Action,
}

/// The learning agent's car and its trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cab {
    location: Location,
    heading: Heading,
    destination: Location,
    deadline: i32,
}

/// A grid of intersections with traffic lights, dummy traffic, and a smartcab
///
/// Roads wrap around at the edges of the grid. Intersections are numbered from
/// `(1, 1)` in the north-west corner to `(columns, rows)` in the south-east corner.
///
/// Rewards for the smartcab:
/// - `-1.0` for a move that breaks the traffic rules, in which case it stays put
/// - `0.0` for idling
/// - `2.0` for a legal move along the planned route, `-0.5` for any other legal move
/// - `+10.0` on top when reaching the destination before the deadline
pub struct SmartcabWorld<R: Rng = ThreadRng> {
    cols: i32,
    rows: i32,
    lights: Vec<TrafficLight>,
    dummies: Vec<Dummy>,
    cab: Cab,
    enforce_deadline: bool,
    hard_time_limit: i32,
    t: u32,
    done: bool,
    reached: bool,
    rng: R,
}

impl SmartcabWorld {
    pub fn new(config: WorldConfig) -> Result<Self> {
        Self::with_rng(config, thread_rng())
    }
}

impl<R: Rng> SmartcabWorld<R> {
    /// Initialize a new world drawing every random choice from `rng`
    ///
    /// **Errors** if the grid is smaller than [`MIN_GRID_SIZE`] in either direction
    /// or there are more dummies than intersections
    pub fn with_rng(config: WorldConfig, mut rng: R) -> Result<Self> {
        let (cols, rows) = config.grid_size;
        if cols < MIN_GRID_SIZE || rows < MIN_GRID_SIZE {
            return Err(Error::GridTooSmall {
                cols,
                rows,
                min: MIN_GRID_SIZE,
            });
        }
        let capacity = (cols * rows) as usize;
        if config.num_dummies > capacity {
            return Err(Error::TooManyDummies {
                requested: config.num_dummies,
                capacity,
            });
        }

        let lights = (0..capacity).map(|_| TrafficLight::random(&mut rng)).collect();
        let dummies = (0..config.num_dummies)
            .map(|_| Dummy {
                location: (1, 1),
                heading: HEADINGS[0],
                waypoint: Action::Forward,
            })
            .collect();

        Ok(Self {
            cols,
            rows,
            lights,
            dummies,
            cab: Cab {
                location: (1, 1),
                heading: HEADINGS[0],
                destination: (1, 1),
                deadline: 0,
            },
            enforce_deadline: config.enforce_deadline,
            hard_time_limit: config.hard_time_limit,
            t: 0,
            done: true,
            reached: false,
            rng,
        })
    }

    pub fn grid_size(&self) -> (i32, i32) {
        (self.cols, self.rows)
    }

    /// Current time step within the trial
    pub fn t(&self) -> u32 {
        self.t
    }

    /// Whether the trial is over, always `true` before the first [`reset`](Self::reset)
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether the smartcab reached its destination in this trial
    pub fn reached(&self) -> bool {
        self.reached
    }

    pub fn destination(&self) -> Location {
        self.cab.destination
    }

    /// The light at `location`, `None` when it lies outside the grid
    pub fn light_at(&self, location: Location) -> Option<&TrafficLight> {
        let (x, y) = location;
        let inside = (1..=self.cols).contains(&x) && (1..=self.rows).contains(&y);
        inside.then(|| &self.lights[self.light_index(location)])
    }

    fn light_index(&self, location: Location) -> usize {
        ((location.1 - 1) * self.cols + (location.0 - 1)) as usize
    }

    fn random_location(&mut self) -> Location {
        (
            self.rng.gen_range(1..=self.cols),
            self.rng.gen_range(1..=self.rows),
        )
    }

    fn random_heading(&mut self) -> Heading {
        *HEADINGS.choose(&mut self.rng).expect("`HEADINGS` is not empty")
    }

    fn random_waypoint(&mut self) -> Action {
        *Action::MOVES
            .choose(&mut self.rng)
            .expect("`Action::MOVES` is not empty")
    }

    /// Start a new trial with a fresh trip for the smartcab and scattered dummy traffic
    ///
    /// **Returns** the destination of the trip
    pub fn reset(&mut self) -> Location {
        self.t = 0;
        self.done = false;
        self.reached = false;
        for light in self.lights.iter_mut() {
            light.reset();
        }

        let mut start = self.random_location();
        let mut destination = self.random_location();
        for _ in 0..TRIP_ATTEMPTS {
            if manhattan(start, destination) >= MIN_TRIP_DISTANCE {
                break;
            }
            start = self.random_location();
            destination = self.random_location();
        }
        while destination == start {
            destination = self.random_location();
        }

        let heading = self.random_heading();
        let deadline = manhattan(start, destination) * DEADLINE_FACTOR;
        self.cab = Cab {
            location: start,
            heading,
            destination,
            deadline,
        };

        for i in 0..self.dummies.len() {
            let dummy = Dummy {
                location: self.random_location(),
                heading: self.random_heading(),
                waypoint: self.random_waypoint(),
            };
            self.dummies[i] = dummy;
        }

        info!("New trial from {start:?} to {destination:?} with deadline {deadline}");
        destination
    }

    /// Advance the world by one step: lights, dummy traffic, then the smartcab's `agent`
    pub fn step<A: Agent<Self>>(&mut self, agent: &mut A) {
        let t = self.t;
        for light in self.lights.iter_mut() {
            light.update(t);
        }
        for i in 0..self.dummies.len() {
            self.step_dummy(i);
        }

        agent.update(self, t);

        if !self.done {
            let deadline = self.cab.deadline;
            if deadline <= self.hard_time_limit {
                self.done = true;
                warn!("Hard time limit ({}) reached, aborting trial", self.hard_time_limit);
            } else if self.enforce_deadline && deadline <= 0 {
                self.done = true;
                info!("Smartcab could not reach its destination within the deadline");
            }
        }

        self.cab.deadline -= 1;
        self.t += 1;
    }

    fn step_dummy(&mut self, i: usize) {
        let Dummy {
            location,
            heading,
            waypoint,
        } = self.dummies[i];
        let inputs = self.traffic(location, heading, Some(i));

        let okay = match waypoint {
            Action::Idle => true,
            Action::Forward => inputs.light == Light::Green,
            Action::Left => {
                inputs.light == Light::Green
                    && !matches!(inputs.oncoming, Action::Forward | Action::Right)
            }
            Action::Right => !(inputs.light == Light::Red && inputs.left == Action::Forward),
        };
        if !okay {
            return;
        }

        let (location, heading) = self
            .try_move(location, heading, waypoint, &inputs)
            .unwrap_or((location, heading));
        let waypoint = self.random_waypoint();
        self.dummies[i] = Dummy {
            location,
            heading,
            waypoint,
        };
    }

    /// The smartcab's current waypoint, as reported to other traffic and used for rewards
    fn cab_waypoint(&self) -> Action {
        navigate(self.cab.location, self.cab.heading, self.cab.destination)
    }

    /// Light and traffic seen at `location` by a vehicle travelling along `heading`
    ///
    /// `me` is the index of the sensing dummy, or `None` for the smartcab.
    fn traffic(&self, location: Location, heading: Heading, me: Option<usize>) -> Inputs {
        let light = if self.lights[self.light_index(location)].is_green_for(heading) {
            Light::Green
        } else {
            Light::Red
        };
        let mut inputs = Inputs {
            light,
            ..Default::default()
        };

        let dummies = self
            .dummies
            .iter()
            .enumerate()
            .filter(|&(j, _)| Some(j) != me)
            .map(|(_, d)| (d.location, d.heading, d.waypoint));
        let cab = me.map(|_| (self.cab.location, self.cab.heading, self.cab_waypoint()));

        for (other_location, other_heading, intent) in dummies.chain(cab) {
            if other_location != location || other_heading == heading {
                continue;
            }
            if heading.0 * other_heading.0 + heading.1 * other_heading.1 == -1 {
                if inputs.oncoming != Action::Left {
                    inputs.oncoming = intent;
                }
            } else if heading.1 == other_heading.0 && -heading.0 == other_heading.1 {
                if !matches!(inputs.right, Action::Forward | Action::Left) {
                    inputs.right = intent;
                }
            } else if inputs.left != Action::Forward {
                inputs.left = intent;
            }
        }

        inputs
    }

    /// Where a vehicle ends up after taking `action`, `None` if the traffic rules forbid it
    fn try_move(
        &self,
        location: Location,
        heading: Heading,
        action: Action,
        inputs: &Inputs,
    ) -> Option<(Location, Heading)> {
        let green = inputs.light == Light::Green;
        let allowed = match action {
            Action::Idle => return Some((location, heading)),
            Action::Forward => green,
            Action::Left => green && matches!(inputs.oncoming, Action::Idle | Action::Left),
            Action::Right => {
                green || (inputs.oncoming != Action::Left && inputs.left != Action::Forward)
            }
        };
        if !allowed {
            return None;
        }

        let heading = action.turn(heading);
        let location = (
            (location.0 + heading.0 - 1).rem_euclid(self.cols) + 1,
            (location.1 + heading.1 - 1).rem_euclid(self.rows) + 1,
        );
        Some((location, heading))
    }
}

impl<R: Rng> Environment for SmartcabWorld<R> {
    fn sense(&self) -> Inputs {
        self.traffic(self.cab.location, self.cab.heading, None)
    }

    fn deadline(&self) -> i32 {
        self.cab.deadline
    }

    fn act(&mut self, action: Action) -> f32 {
        let inputs = self.sense();
        let waypoint = self.cab_waypoint();

        let mut reward = match self.try_move(self.cab.location, self.cab.heading, action, &inputs) {
            None => -1.0,
            Some(_) if action == Action::Idle => 0.0,
            Some((location, heading)) => {
                self.cab.location = location;
                self.cab.heading = heading;
                if action == waypoint {
                    2.0
                } else {
                    -0.5
                }
            }
        };

        if self.cab.location == self.cab.destination && !self.done {
            if self.cab.deadline >= 0 {
                reward += 10.0;
            }
            self.done = true;
            self.reached = true;
            info!("Smartcab reached its destination at t = {}", self.t);
        }

        reward
    }

    fn location(&self) -> Location {
        self.cab.location
    }

    fn heading(&self) -> Heading {
        self.cab.heading
    }
}
