//! Per-frame rotation about the local Y axis.

use std::f64::consts::TAU;

/// A Y rotation that advances by a fixed step every frame.
///
/// Both the step and the angle are `f64`; the angle is wrapped into
/// `[0, 2π)` every frame so its magnitude never grows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    angle: f64,
    per_frame: f64,
}

impl Spin {
    pub fn new(per_frame: f64) -> Self {
        Self {
            angle: 0.0,
            per_frame,
        }
    }

    /// Step one frame.
    pub fn advance(&mut self) {
        self.angle = wrap_angle(self.angle + self.per_frame);
    }

    /// Current angle in radians, in `[0, 2π)`.
    pub fn angle(&self) -> f32 {
        self.angle as f32
    }
}

/// Wrap into `[0, 2π)`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates_step() {
        let mut spin = Spin::new(0.002);
        for _ in 0..10 {
            spin.advance();
        }
        assert!((spin.angle() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_angle_wraps() {
        let mut spin = Spin::new(1.0);
        for _ in 0..7 {
            spin.advance();
        }
        let expected = (7.0f64).rem_euclid(TAU) as f32;
        assert!((spin.angle() - expected).abs() < 1e-6);
        assert!(spin.angle() < TAU as f32);
    }

    #[test]
    fn test_negative_step_stays_in_range() {
        let mut spin = Spin::new(-0.5);
        spin.advance();
        assert!((spin.angle() as f64 - (TAU - 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_long_run_matches_exact_step() {
        let frames = 10_000_000u64;
        let mut spin = Spin::new(0.002);
        for _ in 0..frames {
            spin.advance();
        }
        let expected = (frames as f64 * 0.002).rem_euclid(TAU);
        assert!(
            (spin.angle as f64 - expected).abs() < 1e-6,
            "angle {} vs {expected}",
            spin.angle
        );
    }

    #[test]
    fn test_wrap_angle_bounds() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert_eq!(wrap_angle(TAU), 0.0);
        assert!(wrap_angle(-1e-20) < TAU);
    }
}
