//! Pointer-reactive particle cloud
//!
//! A fixed number of point masses spring back toward their rest positions
//! while being pushed away from the pointer. Fast pointer motion widens the
//! push radius and force; past a threshold the whole cloud "explodes".
//!
//! Integration is explicit Euler with one update per fixed step, the same
//! arithmetic the hero section has always used, so frame pacing is handled
//! by [`FrameClock`] rather than by scaling forces with `dt`.

use std::f32::consts::TAU;
use std::str::FromStr;

use glam::{EulerRot, Quat, Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::frame::{Animated, FrameClock, Viewport};
use crate::pointer::PointerState;

/// Extra repel force added per unit of smoothed pointer speed
const FORCE_PER_SPEED: f32 = 0.2;
/// Force applied to every particle while exploding
const EXPLOSION_FORCE: f32 = 1.0;

/// Shape the rest positions are sampled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestVolume {
    /// Ball of radius `cluster_size / 2`
    Sphere,
    /// Axis-aligned cube with edge `cluster_size`
    Cube,
}

/// HSL parameters for the glowing-core coloring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowPalette {
    pub hue: f32,
    /// Random hue offset in `0..hue_jitter`
    pub hue_jitter: f32,
    pub saturation: f32,
    /// Lightness at the very center
    pub lightness: f32,
    /// Distance (as a fraction of `cluster_size`) where lightness reaches zero
    pub falloff: f32,
}

impl Default for GlowPalette {
    fn default() -> Self {
        Self {
            hue: 0.85,
            hue_jitter: 0.1,
            saturation: 0.9,
            lightness: 0.6,
            falloff: 0.5,
        }
    }
}

/// Tunables for the particle field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleFieldConfig {
    pub particle_count: usize,
    /// Overall extent of the cloud in world units
    pub cluster_size: f32,
    /// Push radius with a still pointer
    pub base_mouse_radius: f32,
    /// Push force with a still pointer
    pub base_repel_force: f32,
    /// Radius added per unit of smoothed pointer speed
    pub speed_multiplier: f32,
    /// Smoothed speed above which the whole cloud is pushed
    pub explosion_threshold: f32,
    /// Spring constant toward the rest position
    pub return_force: f32,
    /// Velocity multiplier applied every step (must be below 1)
    pub damping: f32,
    pub volume: RestVolume,
    pub palette: GlowPalette,
    /// Cosmetic rotation per step around the x and y axes (radians)
    pub rotation_rate: Vec2,
    /// Rendered point size in world units
    pub point_size: f32,
    pub opacity: f32,
    /// Cloud offset from the scene origin on wide viewports
    pub anchor: Vec3,
    /// Cloud offset on viewports at most `compact_breakpoint` wide
    pub compact_anchor: Vec3,
    pub compact_breakpoint: f32,
}

impl Default for ParticleFieldConfig {
    fn default() -> Self {
        Self::sphere()
    }
}

impl ParticleFieldConfig {
    /// Ball-shaped cloud with a jittered pink-to-violet core
    pub fn sphere() -> Self {
        Self {
            particle_count: 20_000,
            cluster_size: 15.0,
            base_mouse_radius: 1.5,
            base_repel_force: 0.1,
            speed_multiplier: 40.0,
            explosion_threshold: 0.8,
            return_force: 0.01,
            damping: 0.95,
            volume: RestVolume::Sphere,
            palette: GlowPalette::default(),
            rotation_rate: Vec2::new(0.0002, 0.0005),
            point_size: 0.1,
            opacity: 0.9,
            anchor: Vec3::new(9.0, 0.0, 0.0),
            compact_anchor: Vec3::new(0.0, -6.0, 0.0),
            compact_breakpoint: 768.0,
        }
    }

    /// Cube-shaped cloud with a single pink hue
    pub fn cube() -> Self {
        Self {
            volume: RestVolume::Cube,
            palette: GlowPalette {
                hue: 0.9,
                hue_jitter: 0.0,
                falloff: 0.7,
                ..GlowPalette::default()
            },
            anchor: Vec3::new(10.0, 0.0, 0.0),
            ..Self::sphere()
        }
    }

    /// Push radius and force for a given smoothed pointer speed
    pub fn interaction(&self, smoothed_speed: f32) -> Interaction {
        if smoothed_speed > self.explosion_threshold {
            return Interaction {
                radius: self.cluster_size * 2.0,
                force: EXPLOSION_FORCE,
                exploding: true,
            };
        }

        Interaction {
            radius: self.base_mouse_radius + smoothed_speed * self.speed_multiplier,
            force: self.base_repel_force + smoothed_speed * FORCE_PER_SPEED,
            exploding: false,
        }
    }

    /// Color for a particle resting `distance` from the center
    pub fn glow_color(&self, distance: f32, hue_offset: f32) -> Rgb {
        let palette = &self.palette;
        let falloff = (self.cluster_size * palette.falloff).max(f32::EPSILON);
        let intensity = 1.0 - distance / falloff;
        Rgb::from_hsl(
            palette.hue + hue_offset,
            palette.saturation,
            palette.lightness * intensity,
        )
    }

    /// Where the cloud sits for a viewport of the given width
    pub fn anchor_for(&self, viewport: Viewport) -> Vec3 {
        if viewport.width <= self.compact_breakpoint {
            self.compact_anchor
        } else {
            self.anchor
        }
    }

    fn sample_rest_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        match self.volume {
            RestVolume::Sphere => {
                let radius = self.cluster_size / 2.0 * rng.r#gen::<f32>().cbrt();
                let theta = rng.r#gen::<f32>() * TAU;
                let phi = (2.0 * rng.r#gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
                Vec3::new(
                    radius * phi.sin() * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                    radius * phi.cos(),
                )
            }
            RestVolume::Cube => {
                let mut coord = || (rng.r#gen::<f32>() - 0.5) * self.cluster_size;
                Vec3::new(coord(), coord(), coord())
            }
        }
    }
}

/// Named starting configurations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    Sphere,
    Cube,
}

impl Preset {
    pub fn config(self) -> ParticleFieldConfig {
        match self {
            Preset::Sphere => ParticleFieldConfig::sphere(),
            Preset::Cube => ParticleFieldConfig::cube(),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sphere" => Ok(Preset::Sphere),
            "cube" => Ok(Preset::Cube),
            other => Err(format!("unknown preset '{other}' (expected sphere or cube)")),
        }
    }
}

/// Push parameters in effect for one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    pub radius: f32,
    pub force: f32,
    /// Whether the explosion regime replaced the speed-scaled values
    pub exploding: bool,
}

/// One point mass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub rest_position: Vec3,
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Rgb,
}

impl Particle {
    /// Distance from the rest position
    pub fn displacement(&self) -> f32 {
        self.position.distance(self.rest_position)
    }
}

/// The simulated cloud, in its own local space (before rotation and anchor)
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub config: ParticleFieldConfig,
    pub particles: Vec<Particle>,
    pub pointer: PointerState,
    /// Accumulated cosmetic rotation (x, y) in radians
    pub rotation: Vec2,
    clock: FrameClock,
    interaction: Interaction,
    /// Set by `park_pointer`; the next sample re-anchors instead of moving
    parked: bool,
}

impl ParticleField {
    /// Sample a fresh cloud
    pub fn new<R: Rng + ?Sized>(config: ParticleFieldConfig, rng: &mut R) -> Self {
        let interaction = config.interaction(0.0);
        let mut field = Self {
            config,
            particles: Vec::new(),
            pointer: PointerState::default(),
            rotation: Vec2::ZERO,
            clock: FrameClock::default(),
            interaction,
            parked: false,
        };
        field.regenerate(rng);
        field
    }

    /// Replace every particle with a newly sampled one
    ///
    /// Used on viewport resize; no position or velocity state survives.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let config = &self.config;
        self.particles = (0..config.particle_count)
            .map(|_| {
                let rest = config.sample_rest_position(rng);
                let hue_offset = rng.r#gen::<f32>() * config.palette.hue_jitter;
                Particle {
                    rest_position: rest,
                    position: rest,
                    velocity: Vec3::ZERO,
                    color: config.glow_color(rest.length(), hue_offset),
                }
            })
            .collect();
        self.clock.reset();

        tracing::debug!(count = self.particles.len(), "regenerated particle field");
    }

    /// Record a pointer sample in the field's local space
    ///
    /// The first sample after `park_pointer` places the pointer without any
    /// travel, so entering the field never counts as a fast move.
    pub fn set_pointer(&mut self, position: Vec3) {
        if self.parked {
            if position.is_finite() {
                self.pointer = PointerState::at(position);
                self.parked = false;
            }
        } else {
            self.pointer.set_position(position);
        }
    }

    /// Move the pointer without registering any speed
    pub fn park_pointer(&mut self, position: Vec3) {
        self.pointer = PointerState::at(position);
        self.parked = true;
    }

    /// Whether the pointer is parked outside the field
    pub fn is_parked(&self) -> bool {
        self.parked
    }

    /// Interaction used by the most recent step
    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Advance by wall-clock `dt` seconds; returns the number of steps taken
    pub fn tick(&mut self, dt: f32) -> u32 {
        let mut clock = std::mem::take(&mut self.clock);
        let steps = clock.drive(dt, self);
        self.clock = clock;
        steps
    }

    /// Rotation applied when rendering
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }

    /// Mean distance of particles from their rest positions
    pub fn mean_displacement(&self) -> f32 {
        if self.particles.is_empty() {
            return 0.0;
        }
        let total: f32 = self.particles.iter().map(Particle::displacement).sum();
        total / self.particles.len() as f32
    }

    pub fn max_displacement(&self) -> f32 {
        self.particles
            .iter()
            .map(Particle::displacement)
            .fold(0.0, f32::max)
    }

    pub fn max_speed(&self) -> f32 {
        self.particles
            .iter()
            .map(|p| p.velocity.length())
            .fold(0.0, f32::max)
    }
}

impl Animated for ParticleField {
    fn step(&mut self) {
        self.pointer.advance();
        let interaction = self.config.interaction(self.pointer.smoothed_speed);
        self.interaction = interaction;

        let pointer = self.pointer.position;
        let return_force = self.config.return_force;
        let damping = self.config.damping;

        for particle in &mut self.particles {
            let mut velocity =
                particle.velocity + (particle.rest_position - particle.position) * return_force;

            let away = particle.position - pointer;
            let distance = away.length();
            if distance < interaction.radius {
                let strength = (interaction.radius - distance) / interaction.radius;
                velocity += away.normalize_or_zero() * (strength * interaction.force);
            }

            velocity *= damping;
            particle.velocity = velocity;
            particle.position += velocity;
        }

        self.rotation += self.config.rotation_rate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn small(config: ParticleFieldConfig) -> ParticleField {
        let mut rng = StdRng::seed_from_u64(7);
        ParticleField::new(
            ParticleFieldConfig {
                particle_count: 500,
                ..config
            },
            &mut rng,
        )
    }

    const FAR: Vec3 = Vec3::new(1000.0, 1000.0, 0.0);

    fn enter_at(field: &mut ParticleField, position: Vec3) {
        field.park_pointer(FAR);
        field.set_pointer(position);
    }

    #[test]
    fn creates_requested_count_at_rest() {
        let field = small(ParticleFieldConfig::sphere());
        assert_eq!(field.particles.len(), 500);
        for p in &field.particles {
            assert_eq!(p.position, p.rest_position);
            assert_eq!(p.velocity, Vec3::ZERO);
        }
    }

    #[test]
    fn sphere_preset_stays_inside_ball() {
        let field = small(ParticleFieldConfig::sphere());
        for p in &field.particles {
            assert!(p.rest_position.length() <= 7.5 + 1e-4);
        }
    }

    #[test]
    fn cube_preset_stays_inside_cube() {
        let field = small(ParticleFieldConfig::cube());
        for p in &field.particles {
            assert!(p.rest_position.abs().max_element() <= 7.5);
        }
        // Corners exist in a cube but not in the inscribed ball
        assert!(field.particles.iter().any(|p| p.rest_position.length() > 7.5));
    }

    #[test]
    fn same_seed_same_cloud() {
        let a = small(ParticleFieldConfig::sphere());
        let b = small(ParticleFieldConfig::sphere());
        assert_eq!(a.particles, b.particles);
    }

    #[test]
    fn core_glows_brighter_than_edge() {
        let config = ParticleFieldConfig::cube();
        let brightness = |d: f32| {
            let c = config.glow_color(d, 0.0);
            c.r + c.g + c.b
        };
        assert!(brightness(0.0) > brightness(2.0));
        assert!(brightness(2.0) > brightness(5.0));
        assert!(brightness(5.0) > brightness(9.0));
        assert_eq!(config.glow_color(12.0, 0.0), Rgb::BLACK);
    }

    #[test]
    fn continuous_interaction_scales_with_speed() {
        let config = ParticleFieldConfig::sphere();
        let slow = config.interaction(0.01);
        assert!(!slow.exploding);
        assert!((slow.radius - 1.9).abs() < 1e-5);
        assert!((slow.force - 0.102).abs() < 1e-6);

        let still = config.interaction(0.0);
        assert_eq!(still.radius, 1.5);
        assert_eq!(still.force, 0.1);
    }

    #[test]
    fn explosion_overrides_continuous_formula() {
        let config = ParticleFieldConfig::sphere();
        let hit = config.interaction(1.0);
        assert!(hit.exploding);
        assert_eq!(hit.radius, 30.0);
        assert_eq!(hit.force, 1.0);

        // The threshold itself is still continuous
        let edge = config.interaction(0.8);
        assert!(!edge.exploding);
        assert!((edge.radius - 33.5).abs() < 1e-4);
    }

    #[test]
    fn explosion_pushes_every_particle() {
        let mut field = small(ParticleFieldConfig::sphere());
        enter_at(&mut field, Vec3::new(0.0, 0.0, -10.0));
        // A jump of 10 units gives a smoothed speed of 2.0
        field.set_pointer(Vec3::new(0.0, 0.0, 0.0));
        let before: Vec<Vec3> = field.particles.iter().map(|p| p.position).collect();

        field.step();

        let interaction = field.interaction();
        assert!(interaction.exploding);
        assert_eq!(interaction.radius, field.config.cluster_size * 2.0);

        for (p, old) in field.particles.iter().zip(before) {
            let moved = p.position - old;
            if old.length() > 1e-3 {
                assert!(moved.dot(old) > 0.0, "particle at {old:?} was not pushed out");
            }
        }
    }

    #[test]
    fn far_pointer_leaves_cloud_untouched() {
        let mut field = small(ParticleFieldConfig::sphere());
        field.park_pointer(FAR);
        for _ in 0..10 {
            field.step();
        }
        assert_eq!(field.max_displacement(), 0.0);
    }

    #[test]
    fn slow_pointer_only_pushes_nearby_particles() {
        let mut field = small(ParticleFieldConfig::sphere());
        let pointer = field.particles[0].rest_position + Vec3::new(0.5, 0.0, 0.0);
        field.park_pointer(pointer);
        field.step();

        let radius = field.interaction().radius;
        assert_eq!(radius, 1.5);
        for p in &field.particles {
            if p.rest_position.distance(pointer) >= radius {
                assert_eq!(p.velocity, Vec3::ZERO);
            }
        }
        assert_ne!(field.particles[0].velocity, Vec3::ZERO);
    }

    #[test]
    fn repel_falls_off_linearly() {
        let config = ParticleFieldConfig {
            particle_count: 0,
            ..ParticleFieldConfig::sphere()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = ParticleField::new(config, &mut rng);
        let particle_at = |x: f32| Particle {
            rest_position: Vec3::new(x, 0.0, 0.0),
            position: Vec3::new(x, 0.0, 0.0),
            velocity: Vec3::ZERO,
            color: Rgb::WHITE,
        };
        field.particles = vec![particle_at(0.375), particle_at(0.75), particle_at(1.5)];
        field.park_pointer(Vec3::ZERO);
        field.step();

        // radius 1.5, force 0.1, damping 0.95
        let v: Vec<f32> = field.particles.iter().map(|p| p.velocity.x).collect();
        assert!((v[0] - 0.75 * 0.1 * 0.95).abs() < 1e-6);
        assert!((v[1] - 0.5 * 0.1 * 0.95).abs() < 1e-6);
        assert_eq!(v[2], 0.0);
    }

    #[test]
    fn pointer_on_particle_stays_finite() {
        let mut field = small(ParticleFieldConfig::sphere());
        let target = field.particles[0].position;
        field.park_pointer(target);
        field.step();
        assert!(field.particles.iter().all(|p| p.position.is_finite()));
    }

    #[test]
    fn restoring_steps_converge_to_rest() {
        let mut field = small(ParticleFieldConfig::sphere());

        // Blow the cloud apart, then park the pointer far away
        enter_at(&mut field, Vec3::new(0.0, 0.0, -10.0));
        field.set_pointer(Vec3::ZERO);
        for _ in 0..5 {
            field.step();
        }
        field.park_pointer(FAR);
        let disturbed = field.max_displacement();
        assert!(disturbed > 1.0);

        // The spring overshoots, so compare peak displacement per window
        let mut previous_peak = f32::INFINITY;
        for _ in 0..4 {
            let mut peak = 0.0f32;
            for _ in 0..100 {
                field.step();
                peak = peak.max(field.max_displacement());
            }
            assert!(peak < previous_peak, "envelope grew: {peak} >= {previous_peak}");
            previous_peak = peak;
        }

        for _ in 0..2000 {
            field.step();
        }
        assert!(field.max_displacement() < 1e-3);
        assert!(field.max_speed() < 1e-3);
    }

    #[test]
    fn entering_after_park_does_not_explode() {
        let mut field = small(ParticleFieldConfig::sphere());
        field.park_pointer(Vec3::new(1.0e4, 1.0e4, 0.0));
        for _ in 0..10 {
            field.step();
        }
        assert!(field.is_parked());

        field.set_pointer(Vec3::new(2.0, 0.0, 0.0));
        assert!(!field.is_parked());
        for _ in 0..120 {
            field.step();
            assert!(!field.interaction().exploding);
        }
        assert_eq!(field.pointer.smoothed_speed, 0.0);
    }

    #[test]
    fn moves_after_entry_register_speed() {
        let mut field = small(ParticleFieldConfig::sphere());
        field.park_pointer(FAR);
        field.set_pointer(Vec3::ZERO);
        field.step();
        field.set_pointer(Vec3::new(1.0, 0.0, 0.0));
        field.step();
        assert!((field.pointer.smoothed_speed - 0.2).abs() < 1e-6);
    }

    #[test]
    fn tick_runs_fixed_steps() {
        let mut field = small(ParticleFieldConfig::sphere());
        field.park_pointer(FAR);
        assert_eq!(field.tick(1.0 / 30.0 + 1e-4), 2);
        assert_eq!(field.rotation, field.config.rotation_rate * 2.0);
        assert_eq!(field.tick(-1.0), 0);
    }

    #[test]
    fn regenerate_resets_motion() {
        let mut field = small(ParticleFieldConfig::sphere());
        enter_at(&mut field, Vec3::new(0.0, 0.0, -10.0));
        field.set_pointer(Vec3::ZERO);
        field.step();
        assert!(field.max_speed() > 0.0);

        let mut rng = StdRng::seed_from_u64(99);
        field.regenerate(&mut rng);
        assert_eq!(field.particles.len(), 500);
        assert_eq!(field.max_speed(), 0.0);
        assert_eq!(field.max_displacement(), 0.0);
    }

    #[test]
    fn anchor_switches_on_narrow_viewports() {
        let config = ParticleFieldConfig::sphere();
        assert_eq!(config.anchor_for(Viewport::new(1280.0, 720.0)), Vec3::new(9.0, 0.0, 0.0));
        assert_eq!(config.anchor_for(Viewport::new(768.0, 900.0)), Vec3::new(0.0, -6.0, 0.0));
    }

    #[test]
    fn empty_field_steps_quietly() {
        let config = ParticleFieldConfig {
            particle_count: 0,
            ..ParticleFieldConfig::cube()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = ParticleField::new(config, &mut rng);
        field.step();
        assert_eq!(field.mean_displacement(), 0.0);
    }

    #[test]
    fn presets_parse_by_name() {
        assert_eq!("cube".parse::<Preset>(), Ok(Preset::Cube));
        assert_eq!("Sphere".parse::<Preset>(), Ok(Preset::Sphere));
        assert!("torus".parse::<Preset>().is_err());
        assert_eq!(Preset::Cube.config(), ParticleFieldConfig::cube());
        assert_eq!(Preset::default().config(), ParticleFieldConfig::default());
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config: ParticleFieldConfig =
            serde_json::from_str(r#"{"particle_count": 10, "volume": "cube"}"#).unwrap();
        assert_eq!(config.particle_count, 10);
        assert_eq!(config.volume, RestVolume::Cube);
        assert_eq!(config.damping, 0.95);
    }
}
