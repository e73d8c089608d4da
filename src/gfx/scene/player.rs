//! The entity steered by the game pad.

use cgmath::Vector3;

use super::entity::Entity;
use super::terrain::TerrainHeight;
use crate::config::PlayerConfig;
use crate::input::{GamePadKey, InputState};

#[derive(Debug, Clone)]
pub struct Player {
    pub entity: Entity,
    config: PlayerConfig,
    current_speed: f32,
    current_turn_speed: f32,
    upwards_speed: f32,
    grounded: bool,
}

impl Player {
    pub fn new(entity: Entity, config: PlayerConfig) -> Self {
        Self {
            entity,
            config,
            current_speed: 0.0,
            current_turn_speed: 0.0,
            upwards_speed: 0.0,
            grounded: true,
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        self.entity.position
    }

    /// Heading in degrees about Y.
    pub fn rot_y(&self) -> f32 {
        self.entity.rotation.y
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Advances the player by `dt` seconds against `terrain`.
    pub fn update<T: TerrainHeight + ?Sized>(&mut self, dt: f32, input: &InputState, terrain: &T) {
        self.check_inputs(input);

        self.entity
            .increase_rotation(0.0, self.current_turn_speed * dt, 0.0);
        let distance = self.current_speed * dt;
        let heading = self.rot_y().to_radians();
        let dx = -distance * heading.sin();
        let dz = distance * heading.cos();
        self.entity.increase_position(dx, 0.0, dz);

        self.upwards_speed += self.config.gravity * dt;
        self.entity.increase_position(0.0, self.upwards_speed * dt, 0.0);

        let position = self.entity.position;
        let ground = terrain.height_at(position.x, position.z);
        if position.y <= ground {
            self.upwards_speed = 0.0;
            self.grounded = true;
            self.entity.position.y = ground;
        }
    }

    fn jump(&mut self) {
        if self.grounded {
            self.upwards_speed = self.config.jump_power;
            self.grounded = false;
        }
    }

    fn check_inputs(&mut self, input: &InputState) {
        self.current_speed = if input.is_pressed(GamePadKey::Up) {
            self.config.run_speed
        } else if input.is_pressed(GamePadKey::Down) {
            -self.config.run_speed
        } else {
            0.0
        };

        self.current_turn_speed = if input.is_pressed(GamePadKey::Left) {
            -self.config.turn_speed
        } else if input.is_pressed(GamePadKey::Right) {
            self.config.turn_speed
        } else {
            0.0
        };

        if input.is_pressed(GamePadKey::X) {
            self.jump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::entity::{EntityKind, GenericEntity};
    use rand::Rng;
    use std::rc::Rc;

    /// Rolling hills.
    struct Hills;

    impl TerrainHeight for Hills {
        fn height_at(&self, x: f32, z: f32) -> f32 {
            (x * 0.1).sin() * 5.0 + (z * 0.07).cos() * 3.0
        }
    }

    fn player_at(x: f32, y: f32, z: f32) -> Player {
        let generic = Rc::new(GenericEntity::new(EntityKind::Player));
        Player::new(
            Entity::new(generic, Vector3::new(x, y, z)),
            PlayerConfig::default(),
        )
    }

    #[test]
    fn test_runs_along_heading() {
        let mut player = player_at(0.0, 0.0, 0.0);
        let mut input = InputState::new();
        input.set_key(GamePadKey::Up, true);
        player.update(0.5, &input, &Hills);
        // rotY 0 moves along +z
        assert!(player.position().x.abs() < 1e-4);
        assert!((player.position().z - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_turn_direction() {
        let mut player = player_at(0.0, 0.0, 0.0);
        let mut input = InputState::new();
        input.set_key(GamePadKey::Right, true);
        player.update(0.25, &input, &Hills);
        assert!((player.rot_y() - 40.0).abs() < 1e-4);
        input.set_key(GamePadKey::Right, false);
        input.set_key(GamePadKey::Left, true);
        player.update(0.5, &input, &Hills);
        assert!((player.rot_y() + 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut player = player_at(0.0, 10.0, 0.0);
        let mut input = InputState::new();
        input.set_key(GamePadKey::X, true);
        player.update(0.01, &input, &Hills);
        assert!(!player.is_grounded());
        let peak_speed = player.upwards_speed;
        player.update(0.01, &input, &Hills);
        // no second impulse mid-air
        assert!(player.upwards_speed < peak_speed);
    }

    #[test]
    fn test_never_below_terrain() {
        let mut rng = rand::rng();
        let mut player = player_at(3.0, 20.0, -4.0);
        let mut input = InputState::new();
        let keys = [GamePadKey::Up, GamePadKey::Down, GamePadKey::Left, GamePadKey::Right, GamePadKey::X];
        for _ in 0..500 {
            for key in keys {
                input.set_key(key, rng.random::<f32>() < 0.4);
            }
            player.update(rng.random_range(0.001..0.1), &input, &Hills);
            let p = player.position();
            assert!(p.y >= Hills.height_at(p.x, p.z) - 1e-4);
        }
    }
}
