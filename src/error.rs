use thiserror::Error;

/// Errors produced while configuring a learner or a world
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Invalid value for `{name}`: {value} is not in the interval [{min}, {max}].")]
    OutOfInterval {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("A {cols}x{rows} grid is too small, at least {min}x{min} intersections are required.")]
    GridTooSmall { cols: i32, rows: i32, min: i32 },
    #[error("{requested} dummy agents do not fit on {capacity} intersections.")]
    TooManyDummies { requested: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
