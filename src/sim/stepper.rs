//! Display-clock to simulation-step conversion
//!
//! The host banks elapsed wall time with `consume`, then `step_simulation`
//! drains the bank into zero or more `apply(step_dt)` calls. Three policies:
//!
//! - [`VariableStepper`]: one step spanning everything banked
//! - [`SemiFixedStepper`]: fixed-size steps plus one tail step; never carries
//! - [`FixedStepper`]: fixed-size steps only; the tail carries to the next
//!   frame and is exposed for render-side position extrapolation
//!
//! Switching policy means constructing a new stepper, which starts with an
//! empty bank.

use crate::consts::{FIXED_STEP_SIZE, SEMI_FIXED_STEP_SIZE};

/// Drains banked wall time into simulation steps.
pub trait TimeStepper {
    /// Bank elapsed wall-clock seconds.
    fn consume(&mut self, dt: f64);

    /// Drain banked time into zero or more `apply(step_dt)` calls.
    fn step_simulation(&mut self, apply: &mut dyn FnMut(f64));

    /// Leftover unsimulated seconds since the last full step. Renderers
    /// extrapolate by `position + velocity * t`; only the fixed policy
    /// ever returns nonzero.
    fn render_frame_interpolation_time(&self) -> f64 {
        0.0
    }
}

/// One step per frame, however long the frame was.
#[derive(Debug, Default)]
pub struct VariableStepper {
    remaining: f64,
}

impl VariableStepper {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimeStepper for VariableStepper {
    fn consume(&mut self, dt: f64) {
        self.remaining += dt;
    }

    fn step_simulation(&mut self, apply: &mut dyn FnMut(f64)) {
        log::trace!("variable step {:.4}s", self.remaining);
        apply(self.remaining);
        self.remaining = 0.0;
    }
}

/// Fixed-size steps with a shorter tail step, draining the bank completely.
#[derive(Debug)]
pub struct SemiFixedStepper {
    remaining: f64,
    step_size: f64,
}

impl SemiFixedStepper {
    /// Panics on a non-positive step size; that is a host programming
    /// error, not runtime data.
    pub fn new(step_size: f64) -> Self {
        assert!(step_size > 0.0, "step size must be positive");
        Self {
            remaining: 0.0,
            step_size,
        }
    }
}

impl Default for SemiFixedStepper {
    fn default() -> Self {
        Self::new(SEMI_FIXED_STEP_SIZE)
    }
}

impl TimeStepper for SemiFixedStepper {
    fn consume(&mut self, dt: f64) {
        self.remaining += dt;
    }

    fn step_simulation(&mut self, apply: &mut dyn FnMut(f64)) {
        let mut full_steps = 0u32;
        while self.remaining >= self.step_size {
            apply(self.step_size);
            self.remaining -= self.step_size;
            full_steps += 1;
        }

        let tail = self.remaining;
        if self.remaining > 0.0 {
            apply(self.remaining);
            self.remaining = 0.0;
        }
        log::trace!(
            "semi-fixed: {} x {:.4}s + tail {:.4}s",
            full_steps,
            self.step_size,
            tail
        );
    }
}

/// Fixed-size steps only; leftover time carries to the next frame.
///
/// Decouples the simulation rate from the display rate: the render side
/// smooths the mismatch by extrapolating with
/// [`render_frame_interpolation_time`](TimeStepper::render_frame_interpolation_time).
#[derive(Debug)]
pub struct FixedStepper {
    remaining: f64,
    step_size: f64,
}

impl FixedStepper {
    /// Panics on a non-positive step size; that is a host programming
    /// error, not runtime data.
    pub fn new(step_size: f64) -> Self {
        assert!(step_size > 0.0, "step size must be positive");
        Self {
            remaining: 0.0,
            step_size,
        }
    }
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new(FIXED_STEP_SIZE)
    }
}

impl TimeStepper for FixedStepper {
    fn consume(&mut self, dt: f64) {
        self.remaining += dt;
    }

    fn step_simulation(&mut self, apply: &mut dyn FnMut(f64)) {
        let mut full_steps = 0u32;
        while self.remaining >= self.step_size {
            apply(self.step_size);
            self.remaining -= self.step_size;
            full_steps += 1;
        }
        log::trace!(
            "fixed: {} x {:.4}s, interpolate {:.4}s",
            full_steps,
            self.step_size,
            self.remaining
        );
    }

    fn render_frame_interpolation_time(&self) -> f64 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(stepper: &mut dyn TimeStepper) -> Vec<f64> {
        let mut steps = Vec::new();
        stepper.step_simulation(&mut |dt| steps.push(dt));
        steps
    }

    #[test]
    fn test_variable_consumes_everything_in_one_step() {
        let mut stepper = VariableStepper::new();
        stepper.consume(0.016);
        stepper.consume(0.004);
        let steps = drain(&mut stepper);
        assert_eq!(steps.len(), 1);
        assert!((steps[0] - 0.02).abs() < 1e-12);
        assert_eq!(stepper.render_frame_interpolation_time(), 0.0);

        // Nothing banked: still a single zero-length step
        let steps = drain(&mut stepper);
        assert_eq!(steps, vec![0.0]);
    }

    #[test]
    fn test_semi_fixed_drains_with_tail_step() {
        let mut stepper = SemiFixedStepper::new(1.0 / 60.0);
        stepper.consume(0.025);
        let steps = drain(&mut stepper);
        assert_eq!(steps.len(), 2);
        assert!((steps[0] - 1.0 / 60.0).abs() < 1e-12);
        assert!((steps[1] - (0.025 - 1.0 / 60.0)).abs() < 1e-12);
        // Fully drained: nothing carries
        assert_eq!(stepper.render_frame_interpolation_time(), 0.0);
        assert!(drain(&mut stepper).is_empty());
    }

    #[test]
    fn test_fixed_produces_four_steps_for_20ms_at_240hz() {
        let mut stepper = FixedStepper::new(1.0 / 240.0);
        stepper.consume(0.02);
        let steps = drain(&mut stepper);
        assert_eq!(steps.len(), 4);
        for step in &steps {
            assert!((step - 1.0 / 240.0).abs() < 1e-12);
        }
        let leftover = stepper.render_frame_interpolation_time();
        assert!((leftover - (0.02 - 4.0 / 240.0)).abs() < 1e-12);
    }

    #[test]
    fn test_fixed_carries_leftover_into_next_frame() {
        let mut stepper = FixedStepper::new(1.0 / 240.0);
        stepper.consume(0.02);
        drain(&mut stepper); // 4 steps, ~3.33ms banked

        stepper.consume(0.02);
        let steps = drain(&mut stepper);
        // 23.33ms banked: five full steps this time
        assert_eq!(steps.len(), 5);
        let leftover = stepper.render_frame_interpolation_time();
        assert!((leftover - (0.04 - 9.0 / 240.0)).abs() < 1e-12);
        assert!(leftover < 1.0 / 240.0);
    }

    #[test]
    fn test_fixed_does_not_step_below_step_size() {
        let mut stepper = FixedStepper::new(1.0 / 240.0);
        stepper.consume(0.003);
        assert!(drain(&mut stepper).is_empty());
        assert!((stepper.render_frame_interpolation_time() - 0.003).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "step size must be positive")]
    fn test_zero_step_size_is_fatal() {
        let _ = FixedStepper::new(0.0);
    }

    #[test]
    #[should_panic(expected = "step size must be positive")]
    fn test_negative_step_size_is_fatal() {
        let _ = SemiFixedStepper::new(-1.0 / 60.0);
    }
}
