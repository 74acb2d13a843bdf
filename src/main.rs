//! Ballbox demo host
//!
//! Headless stand-in for a rendering host: builds a small arena scene,
//! drives the fixed-policy stepper with synthetic 60 Hz frame deltas, logs
//! ball state once per simulated second, then saves the scene and reloads
//! it to prove the round trip.

use glam::DVec2;

use ballbox::consts::*;
use ballbox::scene::{SceneError, SceneFile};
use ballbox::sim::{
    Ball, Boundary, BoundaryOrientation, FixedStepper, PhysicsCircle, PhysicsLine,
    PhysicsPolyline, Simulation, TimeStepper,
};

/// An 800x600 arena with a ramp, a bumper, a funnel and a few balls.
fn build_scene() -> Simulation {
    let mut sim = Simulation::new();
    sim.gravity = -350.0;
    sim.enable_ball_collisions = true;

    sim.add_boundary(Boundary::new(BoundaryOrientation::MinX, 0.0));
    sim.add_boundary(Boundary::new(BoundaryOrientation::MaxX, 800.0));
    sim.add_boundary(Boundary::new(BoundaryOrientation::MinY, 0.0));
    sim.add_boundary(Boundary::new(BoundaryOrientation::MaxY, 600.0));

    // Ramp across the lower left
    sim.add_line(PhysicsLine::new(
        DVec2::new(40.0, 260.0),
        DVec2::new(360.0, 140.0),
    ));
    // Bumper mid-arena
    sim.add_circle(PhysicsCircle::new(DVec2::new(480.0, 220.0), 45.0));
    // Funnel on the right
    sim.add_polyline(PhysicsPolyline::new(vec![
        DVec2::new(560.0, 420.0),
        DVec2::new(660.0, 330.0),
        DVec2::new(760.0, 420.0),
    ]));

    for (x, y) in [(120.0, 520.0), (300.0, 560.0), (520.0, 540.0), (680.0, 500.0)] {
        let mut ball = Ball::new(DVec2::new(x, y), BALL_RADIUS);
        ball.velocity = DVec2::new((x - 400.0) * 0.2, 0.0);
        sim.add_ball(ball);
    }
    sim
}

fn main() -> Result<(), SceneError> {
    env_logger::init();

    let mut sim = build_scene();
    let mut stepper = FixedStepper::new(FIXED_STEP_SIZE);

    let frame_dt = 1.0 / 60.0;
    for frame in 0..600u32 {
        stepper.consume(frame_dt);
        stepper.step_simulation(&mut |dt| sim.step(dt));

        if frame % 60 == 59 {
            let second = (frame + 1) / 60;
            log::info!(
                "t={}s interpolate={:.4}s",
                second,
                stepper.render_frame_interpolation_time()
            );
            for ball in &sim.balls {
                log::info!(
                    "  ball {}: pos=({:.1}, {:.1}) vel=({:.1}, {:.1})",
                    ball.id,
                    ball.position.x,
                    ball.position.y,
                    ball.velocity.x,
                    ball.velocity.y
                );
            }
        }
    }

    let path = std::env::temp_dir().join("ballbox_demo.json");
    SceneFile::new("demo", sim.clone()).save(&path)?;
    let reloaded = SceneFile::load(&path)?;
    assert_eq!(reloaded.simulation.balls.len(), sim.balls.len());
    log::info!("Scene round trip ok: {} balls", reloaded.simulation.balls.len());
    Ok(())
}
