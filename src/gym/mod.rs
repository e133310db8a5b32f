pub mod simulator;
pub mod traffic_light;
pub mod world;

pub use simulator::{Simulator, TrialReport};
pub use traffic_light::TrafficLight;
pub use world::{SmartcabWorld, WorldConfig};
