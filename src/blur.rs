//! Blur sprite cache for Plexus Studio RS
//! Prerendered radial alpha gradients used to stamp out-of-focus particles

use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use std::collections::HashMap;

/// One prerendered blur sprite: a white disc whose alpha falls off radially.
///
/// Carries both the ring-alpha table (replayed as layered circles by vector
/// surfaces) and a rasterized `4r x 4r` image (blitted by pixel surfaces).
pub struct BlurSprite {
    radius: u32,
    rings: Vec<u8>,
    image: RgbaImage,
}

impl BlurSprite {
    fn build(radius: u32) -> Self {
        let rings: Vec<u8> = (1..=radius).map(|d| ring_alpha(d, radius)).collect();

        let size = radius * 4;
        let center = (radius * 2) as f32;
        let mut image = RgbaImage::new(size, size);
        for (x, y, px) in image.enumerate_pixels_mut() {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            let dist = (dx * dx + dy * dy).sqrt();
            let ring = (dist.ceil() as u32).max(1);
            let alpha = if ring <= radius {
                rings[(ring - 1) as usize]
            } else {
                0
            };
            *px = Rgba([255, 255, 255, alpha]);
        }

        Self {
            radius,
            rings,
            image,
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn size(&self) -> u32 {
        self.radius * 4
    }

    /// Alpha of the concentric ring at distance `d` from the center is
    /// `rings()[d - 1]`; innermost ring first.
    pub fn rings(&self) -> &[u8] {
        &self.rings
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

fn ring_alpha(d: u32, radius: u32) -> u8 {
    (120.0 * (1.0 - d as f32 / radius as f32).powf(1.5)) as u8
}

/// Cache of blur sprites for every odd radius in [1, 49].
///
/// Built once at construction, read-only afterwards.
pub struct BlurKernelCache {
    sprites: HashMap<u32, BlurSprite>,
}

impl BlurKernelCache {
    pub fn build() -> Self {
        let sprites = (0..25u32)
            .into_par_iter()
            .map(|i| {
                let radius = 2 * i + 1;
                (radius, BlurSprite::build(radius))
            })
            .collect();

        Self { sprites }
    }

    /// Sprite for a blur radius. Radii are clamped to [1, 49]; even radii
    /// fall back to the next lower odd sprite.
    pub fn get(&self, blur_radius: u32) -> Option<&BlurSprite> {
        let clamped = blur_radius.clamp(1, 49);
        let key = if clamped % 2 == 0 { clamped - 1 } else { clamped };
        self.sprites.get(&key)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Release every sprite.
    pub fn clear(&mut self) {
        self.sprites.clear();
    }
}
