//! Frame renderer for Plexus Studio RS
//! Depth-sorted two-pass draw: connections behind particles, atmosphere on top

use crate::blur::BlurKernelCache;
use crate::config::{ColorPalette, PlexusConfig};
use crate::connections::{Connection, ConnectionSelector};
use crate::particles::{Particle, PlexusField};
use crate::shading::{alpha_byte, Rgb, Shader};
use crate::surface::Surface;

pub struct PlexusRenderer {
    shader: Shader,
    selector: ConnectionSelector,
    blur_cache: BlurKernelCache,
    max_connection_distance: f32,
}

impl PlexusRenderer {
    pub fn new(config: &PlexusConfig, palette: ColorPalette) -> Self {
        Self {
            shader: Shader::new(palette),
            selector: ConnectionSelector::new(config),
            blur_cache: BlurKernelCache::build(),
            max_connection_distance: config.max_connection_distance,
        }
    }

    /// Apply new connection parameters without rebuilding the sprite cache.
    pub fn reconfigure(&mut self, config: &PlexusConfig) {
        self.selector = ConnectionSelector::new(config);
        self.max_connection_distance = config.max_connection_distance;
    }

    /// Release the sprite cache.
    pub fn cleanup(&mut self) {
        self.blur_cache.clear();
    }

    /// Draw one frame. Deterministic for a fixed field state: rendering twice
    /// without an intervening update issues the identical draw sequence.
    pub fn render(&self, field: &PlexusField, surface: &mut dyn Surface) {
        surface.fill(self.shader.palette.background.into());

        // Larger z is nearer the camera, so ascending z is back-to-front.
        // The sort is stable: equal depths keep particle index order.
        let mut order: Vec<usize> = (0..field.particles.len())
            .filter(|&i| field.particles[i].visible)
            .collect();
        order.sort_by(|&a, &b| {
            field.particles[a]
                .z
                .partial_cmp(&field.particles[b].z)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for connection in self.selector.select(&field.particles, &order) {
            self.draw_connection(field, connection, surface);
        }

        for &i in &order {
            self.draw_particle(&field.particles[i], surface);
        }

        surface.overlay(self.shader.palette.atmosphere.into(), 15);
    }

    fn draw_connection(&self, field: &PlexusField, conn: Connection, surface: &mut dyn Surface) {
        let p1 = &field.particles[conn.particle_a];
        let p2 = &field.particles[conn.particle_b];

        let Some(style) =
            self.shader
                .connection_appearance(p1, p2, conn.distance, self.max_connection_distance)
        else {
            return;
        };

        let (x1, y1) = (p1.screen_x, p1.screen_y);
        let (x2, y2) = (p2.screen_x, p2.screen_y);

        if style.avg_blur <= 5.0 {
            // Sharp connection: concentric glow strokes, widest first
            let glow: Rgb = self.shader.palette.glow_blue.into();
            let mut width = style.line_width + 4.0;
            while width >= 1.0 {
                let glow_alpha =
                    style.alpha * 255.0 * 0.2 * (1.0 - (width - style.line_width) / 5.0);
                if glow_alpha > 5.0 {
                    surface.line(x1, y1, x2, y2, width, glow, glow_alpha as u8);
                }
                width -= 1.0;
            }

            surface.line(x1, y1, x2, y2, style.line_width, style.color, 255);

            if style.alpha > 0.6 {
                let center = style.color.scaled(1.2);
                let center_width = (style.line_width / 2.0).floor().max(1.0);
                surface.line(x1, y1, x2, y2, center_width, center, 255);
            }
        } else {
            // Blurred connection: one wider translucent stroke
            let blur_width = (style.line_width + style.avg_blur / 3.0).floor().max(1.0);
            let blur_alpha = alpha_byte(style.alpha * 0.4);
            surface.line(x1, y1, x2, y2, blur_width, style.color, blur_alpha);
        }
    }

    fn draw_particle(&self, p: &Particle, surface: &mut dyn Surface) {
        if !p.visible {
            return;
        }

        let style = self.shader.particle_appearance(p);
        let size = p.screen_size.floor().max(1.0);

        if p.blur_radius <= 2 {
            // Sharp particle: radial glow, optional star burst, solid core
            let glow: Rgb = self.shader.palette.glow_blue.into();
            let glow_size = (size * 3.0) as u32;
            for r in (1..=glow_size).rev() {
                let falloff = 1.0 - r as f32 / glow_size as f32;
                let glow_alpha = style.alpha as f32 * 0.3 * falloff * falloff;
                if glow_alpha >= 1.0 {
                    surface.fill_circle(p.screen_x, p.screen_y, r as f32, glow, glow_alpha as u8);
                }
            }

            if style.alpha > 200 {
                self.draw_star_burst(p, size, style.alpha, surface);
            }

            surface.fill_circle(p.screen_x, p.screen_y, size, style.color, 255);
        } else if let Some(sprite) = self.blur_cache.get(p.blur_radius) {
            surface.blit_sprite(sprite, p.screen_x, p.screen_y, style.color, style.alpha);
        }
    }

    /// Four half-rays at 45-degree steps, fading quadratically outward.
    fn draw_star_burst(&self, p: &Particle, size: f32, alpha: u8, surface: &mut dyn Surface) {
        let white: Rgb = self.shader.palette.glow_white.into();
        let star_length = (size * 4.0) as u32;
        let star_alpha = alpha as f32 * 0.6;
        let ray_radius = (size / 2.0).max(1.0);

        for angle in [0.0_f32, 45.0, 90.0, 135.0] {
            let rad = angle.to_radians();
            let (dir_x, dir_y) = (rad.cos(), rad.sin());
            for i in 0..star_length {
                let falloff = 1.0 - i as f32 / star_length as f32;
                let ray_alpha = star_alpha * falloff * falloff;
                if ray_alpha >= 1.0 {
                    surface.fill_circle(
                        p.screen_x + dir_x * i as f32,
                        p.screen_y + dir_y * i as f32,
                        ray_radius,
                        white,
                        ray_alpha as u8,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::FrameSurface;

    fn empty_field() -> PlexusField {
        use rand::rngs::StdRng;
        use rand::SeedableRng;
        let config = PlexusConfig {
            particle_count: 0,
            ..Default::default()
        };
        PlexusField::with_rng(&config, &mut StdRng::seed_from_u64(0))
    }

    fn renderer() -> PlexusRenderer {
        PlexusRenderer::new(&PlexusConfig::default(), ColorPalette::default())
    }

    #[test]
    fn empty_field_paints_background_with_atmosphere_wash() {
        let field = empty_field();
        let mut surface = FrameSurface::new(16, 16);
        renderer().render(&field, &mut surface);

        let px = surface.to_image().get_pixel(8, 8).0;
        // background [4,8,16] washed by atmosphere [20,40,80] at 15/255
        assert!(px[0] >= 4 && px[0] <= 6, "r = {}", px[0]);
        assert!(px[1] >= 8 && px[1] <= 10, "g = {}", px[1]);
        assert!(px[2] >= 16 && px[2] <= 20, "b = {}", px[2]);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn sharp_particle_draws_a_bright_core() {
        let mut field = empty_field();
        field.particles.push(Particle {
            visible: true,
            screen_x: 32.0,
            screen_y: 32.0,
            screen_size: 4.0,
            blur_radius: 0,
            brightness: 1.0,
            depth_alpha: 1.0,
            pulse_phase: std::f32::consts::FRAC_PI_2,
            ..Default::default()
        });

        let mut surface = FrameSurface::new(64, 64);
        renderer().render(&field, &mut surface);

        let center = surface.to_image().get_pixel(32, 32).0;
        assert!(center[0] > 200 && center[2] > 200, "core missing: {:?}", center);
    }

    #[test]
    fn blurred_particle_stamps_a_soft_disc() {
        let mut field = empty_field();
        field.particles.push(Particle {
            visible: true,
            screen_x: 32.0,
            screen_y: 32.0,
            screen_size: 4.0,
            blur_radius: 20,
            brightness: 1.0,
            depth_alpha: 1.0,
            pulse_phase: std::f32::consts::FRAC_PI_2,
            ..Default::default()
        });

        let mut surface = FrameSurface::new(64, 64);
        renderer().render(&field, &mut surface);
        let image = surface.to_image();

        let center = image.get_pixel(32, 32).0;
        let edge = image.get_pixel(32, 50).0;
        assert!(center[2] > edge[2], "stamp must fade outward");
        assert!(center[2] > 16, "stamp center must rise above background");
    }

    #[test]
    fn invisible_particles_are_skipped() {
        let mut field = empty_field();
        field.particles.push(Particle {
            visible: false,
            screen_x: 8.0,
            screen_y: 8.0,
            screen_size: 6.0,
            blur_radius: 0,
            ..Default::default()
        });

        let mut blank = FrameSurface::new(16, 16);
        renderer().render(&empty_field(), &mut blank);
        let mut drawn = FrameSurface::new(16, 16);
        renderer().render(&field, &mut drawn);

        assert_eq!(
            blank.to_image().as_raw(),
            drawn.to_image().as_raw(),
            "invisible particle must not change the frame"
        );
    }
}
