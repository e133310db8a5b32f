use crate::env::{Action, Heading, Location};

/// Suggests which way to go next on the way to a destination
pub trait Planner {
    /// Re-target the planner at a new destination
    fn route_to(&mut self, destination: Location);

    /// The direction to take from `location` while travelling along `heading`
    ///
    /// **Returns** [`Action::Idle`] once the destination is reached
    fn next_waypoint(&self, location: Location, heading: Heading) -> Action;
}

/// A greedy planner that closes the east-west gap first, then the north-south gap
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutePlanner {
    destination: Option<Location>,
}

impl RoutePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self) -> Option<Location> {
        self.destination
    }
}

impl Planner for RoutePlanner {
    fn route_to(&mut self, destination: Location) {
        self.destination = Some(destination);
    }

    fn next_waypoint(&self, location: Location, heading: Heading) -> Action {
        match self.destination {
            Some(destination) => navigate(location, heading, destination),
            None => Action::Idle,
        }
    }
}

/// Waypoint from `location` travelling along `heading` towards `destination`
///
/// A destination behind the vehicle starts a U-turn with a right turn.
pub fn navigate(location: Location, heading: Heading, destination: Location) -> Action {
    let dx = destination.0 - location.0;
    let dy = destination.1 - location.1;

    if dx != 0 {
        match (dx * heading.0).signum() {
            1 => Action::Forward,
            -1 => Action::Right,
            _ if dx * heading.1 > 0 => Action::Left,
            _ => Action::Right,
        }
    } else if dy != 0 {
        match (dy * heading.1).signum() {
            1 => Action::Forward,
            -1 => Action::Right,
            _ if dy * heading.0 > 0 => Action::Right,
            _ => Action::Left,
        }
    } else {
        Action::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EAST: Heading = (1, 0);
    const SOUTH: Heading = (0, 1);
    const WEST: Heading = (-1, 0);
    const NORTH: Heading = (0, -1);

    #[test]
    fn east_west_first() {
        let here = (4, 4);
        assert_eq!(navigate(here, EAST, (6, 1)), Action::Forward);
        assert_eq!(navigate(here, WEST, (6, 1)), Action::Right, "U-turn");
        assert_eq!(navigate(here, SOUTH, (6, 4)), Action::Left, "south, turn left to go east");
        assert_eq!(navigate(here, NORTH, (6, 4)), Action::Right, "north, turn right to go east");
        assert_eq!(navigate(here, SOUTH, (2, 4)), Action::Right, "south, turn right to go west");
    }

    #[test]
    fn then_north_south() {
        let here = (4, 4);
        assert_eq!(navigate(here, SOUTH, (4, 6)), Action::Forward);
        assert_eq!(navigate(here, NORTH, (4, 6)), Action::Right, "U-turn");
        assert_eq!(navigate(here, EAST, (4, 6)), Action::Right, "east, turn right to go south");
        assert_eq!(navigate(here, WEST, (4, 6)), Action::Left, "west, turn left to go south");
        assert_eq!(navigate(here, EAST, (4, 1)), Action::Left, "east, turn left to go north");
    }

    #[test]
    fn turns_point_towards_destination() {
        let here = (4, 4);
        for destination in [(6, 4), (2, 4), (4, 6), (4, 1)] {
            for heading in [EAST, SOUTH, WEST, NORTH] {
                let action = navigate(here, heading, destination);
                let new_heading = action.turn(heading);
                let gap = (destination.0 - here.0, destination.1 - here.1);
                let progress = gap.0 * new_heading.0 + gap.1 * new_heading.1;
                if action != Action::Right || progress != 0 {
                    assert!(progress > 0, "{action} from {heading:?} to {destination:?}");
                }
            }
        }
    }

    #[test]
    fn planner_state() {
        let mut planner = RoutePlanner::new();
        assert_eq!(planner.next_waypoint((1, 1), EAST), Action::Idle, "no route yet");

        planner.route_to((3, 1));
        assert_eq!(planner.destination(), Some((3, 1)));
        assert_eq!(planner.next_waypoint((1, 1), EAST), Action::Forward);
        assert_eq!(planner.next_waypoint((3, 1), EAST), Action::Idle, "arrived");
    }
}
