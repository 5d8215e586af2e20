//! Particle field for Plexus Studio RS
//! Owns the 3D particle set: integration, toroidal wrap, cached projection state

use crate::config::PlexusConfig;
use crate::projection::Projector;
use rand::Rng;
use rayon::prelude::*;
use std::f32::consts::TAU;

/// Individual particle data.
///
/// Position, velocity and the visual traits are the source of truth; the
/// screen-space fields are a cache recomputed wholesale on every update.
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
    pub base_size: f32,
    pub brightness: f32,
    pub pulse_phase: f32,
    pub pulse_speed: f32,
    // Cached 2D projection, refreshed each frame
    pub screen_x: f32,
    pub screen_y: f32,
    pub screen_size: f32,
    pub blur_radius: u32,
    pub visible: bool,
    pub depth_alpha: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            base_size: 2.0,
            brightness: 1.0,
            pulse_phase: 0.0,
            pulse_speed: 1.0,
            screen_x: 0.0,
            screen_y: 0.0,
            screen_size: 0.0,
            blur_radius: 0,
            visible: false,
            depth_alpha: 1.0,
        }
    }
}

/// The particle set and the space it lives in.
pub struct PlexusField {
    pub particles: Vec<Particle>,
    space_width: f32,
    space_height: f32,
    space_depth: f32,
    animation_speed: f32,
}

impl PlexusField {
    pub fn new(config: &PlexusConfig) -> Self {
        Self::with_rng(config, &mut rand::thread_rng())
    }

    /// Build the field from an explicit RNG. Tests seed this for
    /// reproducible layouts.
    pub fn with_rng(config: &PlexusConfig, rng: &mut impl Rng) -> Self {
        let particles = (0..config.particle_count)
            .map(|_| Self::spawn_particle(config, rng))
            .collect();

        Self {
            particles,
            space_width: config.space_width,
            space_height: config.space_height,
            space_depth: config.space_depth,
            animation_speed: config.animation_speed,
        }
    }

    fn spawn_particle(config: &PlexusConfig, rng: &mut impl Rng) -> Particle {
        let half_w = config.space_width / 2.0;
        let half_h = config.space_height / 2.0;
        let half_d = config.space_depth / 2.0;

        Particle {
            x: rng.gen_range(-half_w..half_w),
            y: rng.gen_range(-half_h..half_h),
            z: rng.gen_range(-half_d..half_d),
            vx: rng.gen_range(-15.0..15.0),
            vy: rng.gen_range(-15.0..15.0),
            vz: rng.gen_range(-10.0..10.0),
            base_size: rng.gen_range(2.0..6.0),
            brightness: rng.gen_range(0.6..1.0),
            pulse_phase: rng.gen_range(0.0..TAU),
            pulse_speed: rng.gen_range(0.5..1.5),
            ..Default::default()
        }
    }

    /// Advance every particle by `dt` seconds and refresh its cached screen
    /// state through the projector.
    ///
    /// Wrapping is a hard snap to the opposite boundary, not a modulo: a
    /// particle overshooting an edge re-enters exactly at the far edge.
    pub fn update(&mut self, dt: f32, projector: &Projector) {
        let sim_dt = dt * self.animation_speed;
        let half_w = self.space_width / 2.0;
        let half_h = self.space_height / 2.0;
        let half_d = self.space_depth / 2.0;

        self.particles.par_iter_mut().for_each(|p| {
            p.x = wrap_axis(p.x + p.vx * sim_dt, half_w);
            p.y = wrap_axis(p.y + p.vy * sim_dt, half_h);
            p.z = wrap_axis(p.z + p.vz * sim_dt, half_d);

            // Only ever read through sin(), so no explicit modulo
            p.pulse_phase += p.pulse_speed * sim_dt;

            match projector.project(p.x, p.y, p.z) {
                Some(proj) => {
                    p.screen_x = proj.screen_x;
                    p.screen_y = proj.screen_y;
                    p.screen_size = p.base_size * proj.scale;
                    p.blur_radius = projector.blur_radius(p.z);
                    p.visible = projector.in_viewport(proj.screen_x, proj.screen_y);
                    p.depth_alpha = projector.depth_alpha(p.z);
                }
                None => p.visible = false,
            }
        });
    }

    /// Adopt new space and speed parameters and grow or truncate the set to
    /// the configured count. Surviving particles keep their state; positions
    /// left outside a shrunken space snap back on the next update.
    pub fn reconfigure(&mut self, config: &PlexusConfig) {
        self.reconfigure_with_rng(config, &mut rand::thread_rng())
    }

    pub fn reconfigure_with_rng(&mut self, config: &PlexusConfig, rng: &mut impl Rng) {
        self.space_width = config.space_width;
        self.space_height = config.space_height;
        self.space_depth = config.space_depth;
        self.animation_speed = config.animation_speed;

        if self.particles.len() > config.particle_count {
            self.particles.truncate(config.particle_count);
        }
        while self.particles.len() < config.particle_count {
            self.particles.push(Self::spawn_particle(config, rng));
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Release the particle set.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

fn wrap_axis(v: f32, half_extent: f32) -> f32 {
    if v < -half_extent {
        half_extent
    } else if v > half_extent {
        -half_extent
    } else {
        v
    }
}
