//! Scene save/load
//!
//! The full entity store serializes into a versioned JSON envelope so saved
//! sandboxes reload identically. The payload shape is the `Simulation` serde
//! contract; the envelope adds a format version (newer files are refused,
//! not guessed at) and a display name.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Simulation;

/// Current scene format version
pub const SCENE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("scene encoding failed: {0}")]
    Format(#[from] serde_json::Error),
    #[error("unsupported scene format version {0} (newest supported: {SCENE_FORMAT_VERSION})")]
    UnsupportedVersion(u32),
}

/// A saved scene: version envelope around a full `Simulation`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    pub version: u32,
    pub name: String,
    pub simulation: Simulation,
}

impl SceneFile {
    pub fn new(name: impl Into<String>, simulation: Simulation) -> Self {
        Self {
            version: SCENE_FORMAT_VERSION,
            name: name.into(),
            simulation,
        }
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let mut scene: SceneFile = serde_json::from_str(json)?;
        if scene.version > SCENE_FORMAT_VERSION {
            return Err(SceneError::UnsupportedVersion(scene.version));
        }
        scene.simulation.refresh_entity_id_counter();
        Ok(scene)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Saved scene '{}' to {}", self.name, path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let scene = Self::from_json(&fs::read_to_string(path)?)?;
        log::info!("Loaded scene '{}' from {}", scene.name, path.display());
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{
        Ball, Boundary, BoundaryOrientation, PhysicsCircle, PhysicsLine, PhysicsPolyline,
    };
    use glam::DVec2;

    fn populated_simulation() -> Simulation {
        let mut sim = Simulation::new();
        sim.gravity = -350.0;
        sim.enable_ball_collisions = true;

        sim.add_boundary(Boundary::new(BoundaryOrientation::MinX, 0.0));
        sim.add_boundary(Boundary::new(BoundaryOrientation::MaxX, 800.0));
        sim.add_boundary(Boundary::new(BoundaryOrientation::MinY, 0.0));
        let mut ceiling = Boundary::new(BoundaryOrientation::MaxY, 600.0);
        ceiling.enabled = false;
        sim.add_boundary(ceiling);

        let mut ball = Ball::new(DVec2::new(120.0, 400.0), 12.0);
        ball.velocity = DVec2::new(35.0, -10.0);
        ball.elasticity = 0.65;
        sim.add_ball(ball);

        sim.add_line(PhysicsLine::new(
            DVec2::new(50.0, 200.0),
            DVec2::new(300.0, 120.0),
        ));
        sim.add_circle(PhysicsCircle::new(DVec2::new(400.0, 150.0), 40.0));
        sim.add_polyline(PhysicsPolyline::new(vec![
            DVec2::new(500.0, 300.0),
            DVec2::new(550.0, 250.0),
            DVec2::new(600.0, 300.0),
        ]));
        sim
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let sim = populated_simulation();
        let json = SceneFile::new("test scene", sim.clone()).to_json().unwrap();
        let restored = SceneFile::from_json(&json).unwrap();

        assert_eq!(restored.name, "test scene");
        let loaded = &restored.simulation;
        assert_eq!(loaded.balls.len(), sim.balls.len());
        assert_eq!(loaded.boundaries.len(), sim.boundaries.len());
        assert_eq!(loaded.lines.len(), sim.lines.len());
        assert_eq!(loaded.circles.len(), sim.circles.len());
        assert_eq!(loaded.polylines.len(), sim.polylines.len());

        assert_eq!(loaded.gravity, sim.gravity);
        assert_eq!(loaded.enable_ball_collisions, sim.enable_ball_collisions);

        let ball = &loaded.balls[0];
        assert_eq!(ball.position, DVec2::new(120.0, 400.0));
        assert_eq!(ball.velocity, DVec2::new(35.0, -10.0));
        assert_eq!(ball.elasticity, 0.65);
        assert_eq!(ball.radius, 12.0);

        // Boundary enablement survives the trip
        assert!(!loaded.boundaries[3].enabled);
        assert_eq!(loaded.polylines[0].point_count(), 3);
    }

    #[test]
    fn test_round_trip_keeps_ids_allocating_fresh() {
        let sim = populated_simulation();
        let json = SceneFile::new("ids", sim).to_json().unwrap();
        let mut restored = SceneFile::from_json(&json).unwrap().simulation;

        let existing = restored.balls[0].id;
        let fresh = restored.add_ball(Ball::new(DVec2::ZERO, 5.0));
        assert_ne!(fresh, existing);
    }

    #[test]
    fn test_stepping_a_reloaded_scene_matches_the_original() {
        let mut original = populated_simulation();
        let json = SceneFile::new("replay", original.clone()).to_json().unwrap();
        let mut reloaded = SceneFile::from_json(&json).unwrap().simulation;

        for _ in 0..120 {
            original.step(1.0 / 240.0);
            reloaded.step(1.0 / 240.0);
        }
        assert_eq!(original.balls[0].position, reloaded.balls[0].position);
        assert_eq!(original.balls[0].velocity, reloaded.balls[0].velocity);
    }

    #[test]
    fn test_newer_version_is_refused() {
        let sim = Simulation::new();
        let mut scene = SceneFile::new("future", sim);
        scene.version = SCENE_FORMAT_VERSION + 1;
        let json = serde_json::to_string(&scene).unwrap();

        match SceneFile::from_json(&json) {
            Err(SceneError::UnsupportedVersion(v)) => {
                assert_eq!(v, SCENE_FORMAT_VERSION + 1);
            }
            other => panic!("expected version refusal, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_json_is_a_format_error() {
        assert!(matches!(
            SceneFile::from_json("{not json"),
            Err(SceneError::Format(_))
        ));
    }
}
