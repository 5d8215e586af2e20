//! Driver facade for Plexus Studio RS
//! One object per effect instance: update(dt), render(), resize, cleanup

use crate::config::{ColorPalette, ParamSpec, PlexusConfig, PARAM_SCHEMA};
use crate::particles::PlexusField;
use crate::projection::Projector;
use crate::renderer::PlexusRenderer;
use crate::surface::Surface;
use rand::Rng;

/// The complete plexus effect: configuration, particle field, camera and
/// renderer, driven once per frame by the host.
pub struct PlexusEffect {
    config: PlexusConfig,
    palette: ColorPalette,
    projector: Projector,
    field: PlexusField,
    renderer: PlexusRenderer,
    width: f32,
    height: f32,
}

impl PlexusEffect {
    pub fn new(config: PlexusConfig, width: f32, height: f32) -> Self {
        Self::with_rng(config, width, height, &mut rand::thread_rng())
    }

    pub fn with_rng(config: PlexusConfig, width: f32, height: f32, rng: &mut impl Rng) -> Self {
        let config = config.sanitize();
        let palette = ColorPalette::default();
        let projector = Projector::new(&config, width, height);
        let field = PlexusField::with_rng(&config, rng);
        let renderer = PlexusRenderer::new(&config, palette.clone());

        Self {
            config,
            palette,
            projector,
            field,
            renderer,
            width,
            height,
        }
    }

    pub fn config(&self) -> &PlexusConfig {
        &self.config
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Declared parameter schema for the host's configuration UI.
    pub fn config_schema() -> &'static [ParamSpec] {
        PARAM_SCHEMA
    }

    /// Swap in a new configuration. The particle set is grown or truncated to
    /// the new count with surviving particles untouched; the sprite cache is
    /// kept.
    pub fn set_config(&mut self, config: PlexusConfig) {
        let config = config.sanitize();
        if config == self.config {
            return;
        }

        self.field.reconfigure(&config);
        self.projector = Projector::new(&config, self.width, self.height);
        self.renderer.reconfigure(&config);
        self.config = config;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.projector.set_viewport(width, height);
        }
    }

    /// Advance the simulation and refresh every particle's cached screen
    /// state. `dt` is wall-clock seconds since the previous frame.
    pub fn update(&mut self, dt: f32) {
        self.field.update(dt, &self.projector);
    }

    /// Draw the current frame. Pure with respect to effect state; rendering
    /// twice without an update produces identical draw sequences.
    pub fn render(&self, surface: &mut dyn Surface) {
        self.renderer.render(&self.field, surface);
    }

    /// Release the particle set and the blur sprite cache.
    pub fn cleanup(&mut self) {
        self.field.clear();
        self.renderer.cleanup();
    }

    pub fn particle_count(&self) -> usize {
        self.field.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::FrameSurface;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn effect() -> PlexusEffect {
        PlexusEffect::with_rng(
            PlexusConfig::default(),
            1280.0,
            720.0,
            &mut StdRng::seed_from_u64(3),
        )
    }

    #[test]
    fn update_then_render_runs_end_to_end() {
        let mut fx = effect();
        fx.update(0.016);
        let mut surface = FrameSurface::new(64, 36);
        fx.render(&mut surface);
        assert_eq!(fx.particle_count(), 200);
    }

    #[test]
    fn set_config_regrows_particle_set() {
        let mut fx = effect();
        let mut config = fx.config().clone();
        config.particle_count = 64;
        fx.set_config(config);
        assert_eq!(fx.particle_count(), 64);
    }

    #[test]
    fn out_of_range_config_is_clamped_at_the_boundary() {
        let fx = PlexusEffect::with_rng(
            PlexusConfig {
                particle_count: 9_999,
                aperture: 0.0,
                ..Default::default()
            },
            640.0,
            480.0,
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(fx.config().particle_count, 500);
        assert_eq!(fx.config().aperture, 1.4);
    }

    #[test]
    fn cleanup_releases_particles() {
        let mut fx = effect();
        fx.cleanup();
        assert_eq!(fx.particle_count(), 0);
        // rendering after cleanup is still well-defined
        let mut surface = FrameSurface::new(8, 8);
        fx.render(&mut surface);
    }

    #[test]
    fn schema_is_exposed_to_the_host() {
        assert_eq!(PlexusEffect::config_schema().len(), 5);
    }
}
