/// Checks that a numerical value is in the provided interval `[a,b]` and returns
/// early with [`Error::OutOfInterval`](crate::Error::OutOfInterval) if not
///
/// ### Example
/// ```ignore
/// let alpha = 2.0;
/// ensure_interval!(alpha, 0.0, 1.0);
/// ```
/// This returns the error "Invalid value for \`alpha\`: 2 is not in the interval \[0, 1\]."
#[macro_export]
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::Error::OutOfInterval {
                name: stringify!($var),
                value: $var,
                min: $a,
                max: $b,
            });
        }
    };
}

/// Manhattan distance between two grid positions
#[cfg(feature = "gym")]
pub fn manhattan(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

#[cfg(test)]
mod tests {
    use crate::Error;

    fn check(alpha: f32) -> crate::Result<f32> {
        ensure_interval!(alpha, 0.0, 1.0);
        Ok(alpha)
    }

    #[test]
    fn ensure_interval_functional() {
        assert_eq!(check(0.0), Ok(0.0));
        assert_eq!(check(1.0), Ok(1.0));
        assert_eq!(
            check(1.5),
            Err(Error::OutOfInterval {
                name: "alpha",
                value: 1.5,
                min: 0.0,
                max: 1.0
            })
        );
        assert!(check(f32::NAN).is_err(), "NaN is rejected");
    }

    #[test]
    #[cfg(feature = "gym")]
    fn manhattan_functional() {
        assert_eq!(super::manhattan((1, 1), (4, 5)), 7);
        assert_eq!(super::manhattan((4, 5), (1, 1)), 7);
        assert_eq!(super::manhattan((3, 3), (3, 3)), 0);
    }
}
