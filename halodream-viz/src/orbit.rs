//! Bodies arranged on circles around a canvas center
//!
//! Two effects share the ring layout: the companion swarm, whose sprites
//! look at and drift toward the pointer, and the planet system, whose bodies
//! travel concentric orbits at speeds falling off with distance.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::{Rgb, palette};
use crate::frame::{Animated, Viewport};

const WARM_COLORS: [&str; 7] = [
    "#FFC300", "#FF5733", "#C70039", "#F9D423", "#F8A51B", "#E87A00", "#FF8D1A",
];
const PLANET_COLORS: [&str; 6] = [
    "#FFB7C5", "#C3AED6", "#A7D8DE", "#F9D423", "#FF8D1A", "#E0E0F0",
];

/// Evenly spaced angles `2πi/n` for `i in 0..n`
pub fn base_angles(n: usize) -> Vec<f32> {
    (0..n).map(|i| i as f32 / n as f32 * TAU).collect()
}

/// Wrap an angle difference into `[-π, π]`
pub fn wrap_angle(delta: f32) -> f32 {
    if !delta.is_finite() {
        return 0.0;
    }
    (delta + PI).rem_euclid(TAU) - PI
}

/// Translation for a layer that leans toward the pointer
///
/// `(pointer - center) / center * strength`; a degenerate center gives no
/// offset.
pub fn parallax_offset(pointer: Vec2, center: Vec2, strength: f32) -> Vec2 {
    if center.x <= 0.0 || center.y <= 0.0 {
        return Vec2::ZERO;
    }
    (pointer - center) / center * strength
}

/// Parallax strengths for the companion heading, subheading and button
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxStrengths {
    pub title: f32,
    pub subtitle: f32,
    pub button: f32,
}

impl Default for ParallaxStrengths {
    fn default() -> Self {
        Self {
            title: 15.0,
            subtitle: 10.0,
            button: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub sprite_count: usize,
    /// Ring radius as a fraction of the shorter canvas side
    pub ring_fraction: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub colors: Vec<Rgb>,
    /// Fraction of the wrapped angle difference closed per step
    pub turn_rate: f32,
    /// Spring toward the ring position
    pub home_pull: f32,
    /// Pull toward the center at full attraction
    pub center_pull: f32,
    /// Pointer-to-center distance of zero attraction, as a divisor of width
    pub attraction_divisor: f32,
    /// Pointer distance under which a sprite flares
    pub glow_distance: f32,
    pub glow_flare: f32,
    pub glow_rest: f32,
    pub glow_decay: f32,
    /// Alpha of the black wash applied before every frame
    pub ghost_alpha: f32,
    pub parallax: ParallaxStrengths,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            sprite_count: 15,
            ring_fraction: 0.30,
            min_radius: 8.0,
            max_radius: 14.0,
            colors: palette(&WARM_COLORS),
            turn_rate: 0.08,
            home_pull: 0.05,
            center_pull: 0.02,
            attraction_divisor: 3.5,
            glow_distance: 80.0,
            glow_flare: 45.0,
            glow_rest: 15.0,
            glow_decay: 0.05,
            ghost_alpha: 0.3,
            parallax: ParallaxStrengths::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwarmSprite {
    pub position: Vec2,
    /// Ring position the sprite springs back to
    pub base: Vec2,
    pub radius: f32,
    pub color: Rgb,
    /// Facing direction in radians
    pub heading: f32,
    /// Shadow blur in pixels
    pub glow: f32,
}

/// Companion-section swarm
#[derive(Debug, Clone)]
pub struct SpriteSwarm {
    pub config: SwarmConfig,
    pub sprites: Vec<SwarmSprite>,
    pub pointer: Vec2,
    viewport: Viewport,
}

impl SpriteSwarm {
    pub fn new(config: SwarmConfig) -> Self {
        Self {
            config,
            sprites: Vec::new(),
            pointer: Vec2::ZERO,
            viewport: Viewport::new(0.0, 0.0),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn center(&self) -> Vec2 {
        let (x, y) = self.viewport.center();
        Vec2::new(x, y)
    }

    /// Place sprites on the ring for a new canvas size
    pub fn layout<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        self.viewport = viewport;
        let center = self.center();
        let ring = viewport.min_side() * self.config.ring_fraction;
        let config = &self.config;
        let span = (config.max_radius - config.min_radius).max(0.0);

        self.sprites = base_angles(config.sprite_count)
            .into_iter()
            .enumerate()
            .map(|(i, angle)| {
                let base = center + Vec2::from_angle(angle) * ring;
                let toward_center = center - base;
                SwarmSprite {
                    position: base,
                    base,
                    radius: config.min_radius + rng.r#gen::<f32>() * span,
                    color: config
                        .colors
                        .get(i % config.colors.len().max(1))
                        .copied()
                        .unwrap_or(Rgb::WHITE),
                    heading: toward_center.y.atan2(toward_center.x),
                    glow: config.glow_rest,
                }
            })
            .collect();

        tracing::debug!(count = self.sprites.len(), ring, "laid out sprite swarm");
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.pointer = Vec2::new(x, y);
        }
    }

    /// How strongly sprites are drawn inward for the current pointer
    pub fn attraction(&self) -> f32 {
        let reach = self.viewport.width / self.config.attraction_divisor;
        if !(reach > 0.0) {
            return 0.0;
        }
        let distance = self.pointer.distance(self.center());
        1.0 - (distance / reach).min(1.0)
    }

    /// Offsets for the heading, subheading and button layers
    pub fn parallax(&self) -> [Vec2; 3] {
        let center = self.center();
        let strengths = self.config.parallax;
        [strengths.title, strengths.subtitle, strengths.button]
            .map(|s| parallax_offset(self.pointer, center, s))
    }
}

impl Animated for SpriteSwarm {
    fn step(&mut self) {
        let center = self.center();
        let attraction = self.attraction();
        let pointer = self.pointer;
        let config = &self.config;

        for sprite in &mut self.sprites {
            let to_pointer = pointer - sprite.position;
            let target = to_pointer.y.atan2(to_pointer.x);
            sprite.heading += wrap_angle(target - sprite.heading) * config.turn_rate;

            sprite.position += (sprite.base - sprite.position) * config.home_pull
                + (center - sprite.position) * (config.center_pull * attraction);

            if sprite.position.distance(pointer) < config.glow_distance {
                sprite.glow = config.glow_flare;
            } else {
                sprite.glow -= (sprite.glow - config.glow_rest) * config.glow_decay;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub planet_count: usize,
    /// Innermost orbit as a fraction of the shorter canvas side
    pub inner_fraction: f32,
    /// Outermost orbit as a fraction of the shorter canvas side
    pub outer_fraction: f32,
    /// Angular velocity of the innermost planet, radians per step
    pub base_speed: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// Chance that a planet carries a ring
    pub ring_chance: f32,
    /// Maximum self-rotation per step in radians, either direction
    pub max_spin_rate: f32,
    pub colors: Vec<Rgb>,
    pub ghost_alpha: f32,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            planet_count: 6,
            inner_fraction: 0.12,
            outer_fraction: 0.42,
            base_speed: 0.01,
            min_size: 4.0,
            max_size: 12.0,
            ring_chance: 0.3,
            max_spin_rate: 0.02,
            colors: palette(&PLANET_COLORS),
            ghost_alpha: 0.15,
        }
    }
}

impl PlanetConfig {
    /// Orbit radii evenly spaced between the inner and outer fractions
    pub fn orbit_radii(&self, viewport: Viewport) -> Vec<f32> {
        let side = viewport.min_side();
        let inner = self.inner_fraction * side;
        let outer = self.outer_fraction * side;
        match self.planet_count {
            0 => Vec::new(),
            1 => vec![inner],
            n => (0..n)
                .map(|i| inner + (outer - inner) * i as f32 / (n - 1) as f32)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Planet {
    pub orbit_radius: f32,
    /// Current angle along the orbit
    pub phase: f32,
    pub angular_velocity: f32,
    pub size: f32,
    pub color: Rgb,
    pub ring: bool,
    /// Self-rotation angle
    pub spin: f32,
    pub spin_rate: f32,
}

#[derive(Debug, Clone)]
pub struct PlanetSystem {
    pub config: PlanetConfig,
    pub planets: Vec<Planet>,
    viewport: Viewport,
}

impl PlanetSystem {
    pub fn new(config: PlanetConfig) -> Self {
        Self {
            config,
            planets: Vec::new(),
            viewport: Viewport::new(0.0, 0.0),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn center(&self) -> Vec2 {
        let (x, y) = self.viewport.center();
        Vec2::new(x, y)
    }

    /// Rebuild every planet for a new canvas size
    pub fn layout<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        self.viewport = viewport;
        let config = &self.config;
        let radii = config.orbit_radii(viewport);
        let inner = radii.first().copied().unwrap_or(0.0);
        let phases = base_angles(radii.len());

        self.planets = radii
            .into_iter()
            .zip(phases)
            .map(|(orbit_radius, phase)| {
                // Kepler-like falloff; a collapsed viewport keeps everything still
                let angular_velocity = if orbit_radius > 0.0 {
                    config.base_speed * (inner / orbit_radius).powf(1.5)
                } else {
                    0.0
                };
                let color = if config.colors.is_empty() {
                    Rgb::WHITE
                } else {
                    config.colors[rng.gen_range(0..config.colors.len())]
                };
                Planet {
                    orbit_radius,
                    phase,
                    angular_velocity,
                    size: config.min_size
                        + rng.r#gen::<f32>() * (config.max_size - config.min_size).max(0.0),
                    color,
                    ring: rng.r#gen::<f32>() < config.ring_chance,
                    spin: 0.0,
                    spin_rate: (rng.r#gen::<f32>() * 2.0 - 1.0) * config.max_spin_rate,
                }
            })
            .collect();

        tracing::debug!(count = self.planets.len(), "laid out planet system");
    }

    /// Canvas position of a planet
    pub fn position_of(&self, planet: &Planet) -> Vec2 {
        self.center() + Vec2::from_angle(planet.phase) * planet.orbit_radius
    }
}

impl Animated for PlanetSystem {
    fn step(&mut self) {
        for planet in &mut self.planets {
            planet.phase = (planet.phase + planet.angular_velocity).rem_euclid(TAU);
            planet.spin = (planet.spin + planet.spin_rate).rem_euclid(TAU);
        }
    }
}
