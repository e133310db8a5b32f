use rand::{seq::SliceRandom, Rng};

/// Periods, in steps, that a light may be assigned
pub const PERIODS: [u32; 3] = [3, 4, 5];

/// A traffic light at a single intersection
///
/// When `state` is `true` the north-south road has right of way, otherwise the east-west road does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficLight {
    state: bool,
    period: u32,
    last_updated: u32,
}

impl TrafficLight {
    pub fn new(state: bool, period: u32) -> Self {
        assert!(period > 0, "A traffic light period must be positive.");
        Self {
            state,
            period,
            last_updated: 0,
        }
    }

    /// A light with a random initial state and a period drawn from [`PERIODS`]
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let period = *PERIODS.choose(rng).expect("`PERIODS` is not empty");
        Self::new(rng.gen(), period)
    }

    pub fn state(&self) -> bool {
        self.state
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    /// Whether a vehicle travelling along `heading` faces a green light
    pub fn is_green_for(&self, heading: (i32, i32)) -> bool {
        (self.state && heading.1 != 0) || (!self.state && heading.0 != 0)
    }

    /// Restart the cycle at time 0, keeping the current state
    pub fn reset(&mut self) {
        self.last_updated = 0;
    }

    /// Toggle the light once a full period has passed since the last change
    pub fn update(&mut self, t: u32) {
        if t.saturating_sub(self.last_updated) >= self.period {
            self.state = !self.state;
            self.last_updated = t;
        }
    }
}
