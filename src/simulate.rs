//! Headless particle field runs
//!
//! Drives a seeded field with a scripted pointer and records what the
//! interaction did on every step. The pointer enters at the left edge of the
//! cloud, sweeps across at a constant speed, then leaves, after which the
//! cloud settles.

use glam::Vec3;
use halodream_viz::particle_field::{ParticleField, ParticleFieldConfig, Preset, RestVolume};
use halodream_viz::Animated;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

/// Pointer position once the sweep has left the cloud
const PARKED: Vec3 = Vec3::new(1.0e4, 1.0e4, 0.0);

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub preset: Preset,
    /// Replaces the preset when given
    pub config: Option<ParticleFieldConfig>,
    pub frames: usize,
    pub seed: u64,
    /// Overrides the configured particle count
    pub count: Option<usize>,
    /// Pointer travel per step in world units
    pub sweep: f32,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            config: None,
            frames: 240,
            seed: 42,
            count: Some(2_000),
            sweep: 0.5,
        }
    }
}

impl SimulationOptions {
    fn field_config(&self) -> ParticleFieldConfig {
        let mut config = self
            .config
            .clone()
            .unwrap_or_else(|| self.preset.config());
        if let Some(count) = self.count {
            config.particle_count = count;
        }
        config
    }
}

/// State after one step
#[derive(Debug, Clone, Serialize)]
pub struct FrameSample {
    pub frame: usize,
    /// Pointer x in field space, `None` once it has left
    pub pointer_x: Option<f32>,
    pub smoothed_speed: f32,
    pub radius: f32,
    pub force: f32,
    pub exploding: bool,
    pub mean_displacement: f32,
    pub max_displacement: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub explosion_frames: usize,
    pub peak_max_displacement: f32,
    pub final_mean_displacement: f32,
    /// First frame after which the pointer had left the cloud
    pub left_at: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Rest volume of the field that was run
    pub volume: RestVolume,
    pub particle_count: usize,
    pub seed: u64,
    pub sweep: f32,
    pub frames: Vec<FrameSample>,
    pub summary: SimulationSummary,
}

/// Pointer x for `frame`, or `None` once the sweep has passed the far edge
///
/// The path runs along the x axis from `-extent` to `extent`.
pub fn sweep_position(frame: usize, sweep: f32, extent: f32) -> Option<f32> {
    let x = -extent + sweep * frame as f32;
    (x <= extent).then_some(x)
}

/// Run the scripted sweep
pub fn run(options: &SimulationOptions) -> SimulationReport {
    let config = options.field_config();
    let extent = config.cluster_size;
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut field = ParticleField::new(config, &mut rng);

    tracing::info!(
        volume = ?field.config.volume,
        particles = field.particles.len(),
        frames = options.frames,
        sweep = options.sweep,
        "starting simulation"
    );

    field.park_pointer(Vec3::new(-extent, 0.0, 0.0));

    let mut frames = Vec::with_capacity(options.frames);
    let mut left_at = None;
    for frame in 0..options.frames {
        let pointer_x = sweep_position(frame, options.sweep, extent);
        match pointer_x {
            Some(x) => field.set_pointer(Vec3::new(x, 0.0, 0.0)),
            None if left_at.is_none() => {
                field.park_pointer(PARKED);
                left_at = Some(frame);
            }
            None => {}
        }

        field.step();

        let interaction = field.interaction();
        frames.push(FrameSample {
            frame,
            pointer_x,
            smoothed_speed: field.pointer.smoothed_speed,
            radius: interaction.radius,
            force: interaction.force,
            exploding: interaction.exploding,
            mean_displacement: field.mean_displacement(),
            max_displacement: field.max_displacement(),
        });
    }

    let summary = SimulationSummary {
        explosion_frames: frames.iter().filter(|f| f.exploding).count(),
        peak_max_displacement: frames.iter().map(|f| f.max_displacement).fold(0.0, f32::max),
        final_mean_displacement: frames.last().map_or(0.0, |f| f.mean_displacement),
        left_at,
    };

    tracing::info!(
        explosion_frames = summary.explosion_frames,
        peak = summary.peak_max_displacement,
        "simulation finished"
    );

    SimulationReport {
        volume: field.config.volume,
        particle_count: field.particles.len(),
        seed: options.seed,
        sweep: options.sweep,
        frames,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(sweep: f32, frames: usize) -> SimulationOptions {
        SimulationOptions {
            frames,
            count: Some(300),
            sweep,
            ..SimulationOptions::default()
        }
    }

    #[test]
    fn sweep_crosses_then_leaves() {
        assert_eq!(sweep_position(0, 0.5, 15.0), Some(-15.0));
        assert_eq!(sweep_position(30, 0.5, 15.0), Some(0.0));
        assert_eq!(sweep_position(60, 0.5, 15.0), Some(15.0));
        assert_eq!(sweep_position(61, 0.5, 15.0), None);
    }

    #[test]
    fn still_pointer_never_leaves() {
        assert_eq!(sweep_position(10_000, 0.0, 15.0), Some(-15.0));
    }

    #[test]
    fn report_has_one_sample_per_frame() {
        let report = run(&options(0.5, 50));
        assert_eq!(report.frames.len(), 50);
        assert_eq!(report.particle_count, 300);
        assert_eq!(report.frames[49].frame, 49);
    }

    #[test]
    fn slow_sweep_stays_continuous() {
        let report = run(&options(0.5, 100));
        assert_eq!(report.summary.explosion_frames, 0);
        // Smoothed speed approaches the sweep speed but never passes it
        for sample in &report.frames {
            assert!(sample.smoothed_speed <= 0.5 + 1e-5);
        }
        assert!(report.summary.peak_max_displacement > 0.0);
    }

    #[test]
    fn fast_sweep_explodes() {
        let report = run(&options(2.0, 40));
        assert!(report.summary.explosion_frames > 0);
        let hit = report.frames.iter().find(|f| f.exploding).unwrap();
        assert_eq!(hit.radius, 30.0);
        assert_eq!(hit.force, 1.0);
    }

    #[test]
    fn cloud_settles_after_pointer_leaves() {
        let report = run(&options(2.0, 1500));
        let left_at = report.summary.left_at.unwrap();
        assert_eq!(left_at, 16);
        assert!(report.summary.final_mean_displacement < 1e-2);
        assert!(report.summary.final_mean_displacement < report.summary.peak_max_displacement);
    }

    #[test]
    fn same_seed_same_report() {
        let a = run(&options(1.0, 60));
        let b = run(&options(1.0, 60));
        let json = |r: &SimulationReport| serde_json::to_string(r).unwrap();
        assert_eq!(json(&a), json(&b));
    }

    #[test]
    fn explicit_config_and_count_override_preset() {
        let report = run(&SimulationOptions {
            preset: Preset::Cube,
            config: Some(ParticleFieldConfig {
                particle_count: 7,
                ..ParticleFieldConfig::sphere()
            }),
            count: None,
            frames: 3,
            ..SimulationOptions::default()
        });
        assert_eq!(report.particle_count, 7);
        assert_eq!(report.volume, RestVolume::Sphere);
    }

    #[test]
    fn preset_count_is_kept_without_override() {
        let report = run(&SimulationOptions {
            preset: Preset::Cube,
            config: Some(ParticleFieldConfig {
                particle_count: 12,
                ..ParticleFieldConfig::cube()
            }),
            count: None,
            frames: 1,
            ..SimulationOptions::default()
        });
        assert_eq!(report.particle_count, 12);
        assert_eq!(report.volume, RestVolume::Cube);
    }
}
