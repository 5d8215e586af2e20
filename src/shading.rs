//! Shading for Plexus Studio RS
//! Maps depth, blur and pulse state to concrete draw colors and alphas

use crate::config::ColorPalette;
use crate::particles::Particle;

// ============================================================================
// Color value type
// ============================================================================

/// RGB triple with saturating componentwise arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale each component by `factor`, rounding and saturating to [0, 255].
    pub fn scaled(self, factor: f32) -> Self {
        let scale = |c: u8| ((c as f32 * factor).round().clamp(0.0, 255.0)) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

/// Scale an alpha fraction in [0, 1] to a saturating byte.
pub fn alpha_byte(alpha: f32) -> u8 {
    (alpha * 255.0).round().clamp(0.0, 255.0) as u8
}

// ============================================================================
// Appearance policies
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleStyle {
    pub color: Rgb,
    pub alpha: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectionStyle {
    pub color: Rgb,
    /// Combined opacity in [0, 1]; the renderer derives stroke alphas from it.
    pub alpha: f32,
    pub line_width: f32,
    pub avg_blur: f32,
}

/// Appearance policy shared by particles and connection segments.
pub struct Shader {
    pub palette: ColorPalette,
}

impl Shader {
    pub fn new(palette: ColorPalette) -> Self {
        Self { palette }
    }

    /// Color and alpha for one particle from its depth, blur and pulse state.
    pub fn particle_appearance(&self, p: &Particle) -> ParticleStyle {
        let pulse_factor = 0.8 + 0.2 * p.pulse_phase.sin();
        let final_brightness = p.brightness * pulse_factor * p.depth_alpha;

        let base: Rgb = if p.blur_radius < 3 && final_brightness > 0.8 {
            self.palette.particle_sharp.into()
        } else if p.blur_radius < 10 {
            self.palette.particle_medium.into()
        } else {
            self.palette.particle_soft.into()
        };

        ParticleStyle {
            color: base.scaled(final_brightness),
            alpha: alpha_byte(final_brightness),
        }
    }

    /// Appearance of the segment between two particles, or `None` when the
    /// pair is too far apart or too faint to draw.
    pub fn connection_appearance(
        &self,
        p1: &Particle,
        p2: &Particle,
        distance: f32,
        max_distance: f32,
    ) -> Option<ConnectionStyle> {
        let distance_factor = 1.0 - distance / max_distance;
        if distance_factor <= 0.0 {
            return None;
        }

        let avg_blur = (p1.blur_radius + p2.blur_radius) as f32 / 2.0;
        let avg_alpha = (p1.depth_alpha + p2.depth_alpha) / 2.0;

        let connection_alpha = distance_factor * avg_alpha * 0.8;
        if connection_alpha < 0.1 {
            return None;
        }

        let base: Rgb = if avg_blur < 5.0 {
            self.palette.connection_bright.into()
        } else if avg_blur < 15.0 {
            self.palette.connection_medium.into()
        } else {
            self.palette.connection_soft.into()
        };

        Some(ConnectionStyle {
            color: base.scaled(connection_alpha),
            alpha: connection_alpha,
            line_width: (3.0 * connection_alpha).round().max(1.0),
            avg_blur,
        })
    }
}
