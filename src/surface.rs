//! Drawing surfaces for Plexus Studio RS
//! Write-only draw ops behind one trait: egui painter preview and CPU raster

use crate::blur::BlurSprite;
use crate::shading::Rgb;
use egui::{Color32, CornerRadius, Painter, Pos2, Rect, Stroke};
use image::{Rgba, RgbaImage};

/// The draw operations the renderer needs. The core only writes; no
/// implementation exposes pixel readback.
pub trait Surface {
    /// Fill the whole frame with an opaque color.
    fn fill(&mut self, color: Rgb);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: u8);
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Rgb, alpha: u8);
    /// Stamp a blur sprite centered at (x, y), its alpha multiplied by the
    /// tint color and alpha.
    fn blit_sprite(&mut self, sprite: &BlurSprite, x: f32, y: f32, tint: Rgb, alpha: u8);
    /// Composite a semi-transparent wash over the whole frame.
    fn overlay(&mut self, color: Rgb, alpha: u8);
}

// ============================================================================
// egui painter surface (preview path)
// ============================================================================

/// Preview surface drawing into an egui painter clipped to `rect`.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    fn pos(&self, x: f32, y: f32) -> Pos2 {
        Pos2::new(self.rect.min.x + x, self.rect.min.y + y)
    }
}

fn color32(color: Rgb, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, alpha)
}

impl Surface for PainterSurface<'_> {
    fn fill(&mut self, color: Rgb) {
        self.painter.rect_filled(
            self.rect,
            CornerRadius::ZERO,
            Color32::from_rgb(color.r, color.g, color.b),
        );
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: u8) {
        self.painter
            .circle_filled(self.pos(x, y), radius, color32(color, alpha));
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Rgb, alpha: u8) {
        self.painter.line_segment(
            [self.pos(x1, y1), self.pos(x2, y2)],
            Stroke::new(width, color32(color, alpha)),
        );
    }

    fn blit_sprite(&mut self, sprite: &BlurSprite, x: f32, y: f32, tint: Rgb, alpha: u8) {
        // The painter has no pixel blit; replay the sprite's ring table as
        // layered circle fills, outermost first.
        let center = self.pos(x, y);
        let rings = sprite.rings();
        for d in (1..=sprite.radius()).rev() {
            let ring = rings[(d - 1) as usize] as u16;
            let a = (ring * alpha as u16 / 255) as u8;
            if a > 0 {
                self.painter
                    .circle_filled(center, d as f32, color32(tint, a));
            }
        }
    }

    fn overlay(&mut self, color: Rgb, alpha: u8) {
        self.painter
            .rect_filled(self.rect, CornerRadius::ZERO, color32(color, alpha));
    }
}

// ============================================================================
// CPU raster surface (headless / snapshot path)
// ============================================================================

/// Headless raster surface: float RGB plus coverage alpha, straight-alpha
/// OVER compositing, quantized to RGBA8 on demand.
pub struct FrameSurface {
    width: u32,
    height: u32,
    rgb: Vec<f32>,
    alpha: Vec<f32>,
}

impl FrameSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let px = (width * height) as usize;
        Self {
            width,
            height,
            rgb: vec![0.0; px * 3],
            alpha: vec![0.0; px],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn blend_over(&mut self, px: i64, py: i64, color: Rgb, a: f32) {
        if a <= 0.0 || px < 0 || py < 0 || px >= self.width as i64 || py >= self.height as i64 {
            return;
        }
        let idx = (py as u32 * self.width + px as u32) as usize;
        let base = idx * 3;
        self.rgb[base] = self.rgb[base] * (1.0 - a) + color.r as f32 * a;
        self.rgb[base + 1] = self.rgb[base + 1] * (1.0 - a) + color.g as f32 * a;
        self.rgb[base + 2] = self.rgb[base + 2] * (1.0 - a) + color.b as f32 * a;
        self.alpha[idx] = a + self.alpha[idx] * (1.0 - a);
    }

    /// Quantize to a straight-alpha RGBA image.
    pub fn to_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width, self.height);
        for (i, px) in image.pixels_mut().enumerate() {
            let base = i * 3;
            *px = Rgba([
                self.rgb[base].clamp(0.0, 255.0) as u8,
                self.rgb[base + 1].clamp(0.0, 255.0) as u8,
                self.rgb[base + 2].clamp(0.0, 255.0) as u8,
                (self.alpha[i].clamp(0.0, 1.0) * 255.0) as u8,
            ]);
        }
        image
    }
}

impl Surface for FrameSurface {
    fn fill(&mut self, color: Rgb) {
        let px = (self.width * self.height) as usize;
        for i in 0..px {
            let base = i * 3;
            self.rgb[base] = color.r as f32;
            self.rgb[base + 1] = color.g as f32;
            self.rgb[base + 2] = color.b as f32;
            self.alpha[i] = 1.0;
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: u8) {
        if radius <= 0.0 || alpha == 0 {
            return;
        }
        let a = alpha as f32 / 255.0;
        let min_x = (cx - radius).floor() as i64;
        let max_x = (cx + radius).ceil() as i64;
        let min_y = (cy - radius).floor() as i64;
        let max_y = (cy + radius).ceil() as i64;
        let radius_sq = radius * radius;

        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= radius_sq {
                    self.blend_over(px, py, color, a);
                }
            }
        }
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Rgb, alpha: u8) {
        if alpha == 0 {
            return;
        }
        let a = alpha as f32 / 255.0;
        let half = (width / 2.0).max(0.5);

        let min_x = (x1.min(x2) - half).floor() as i64;
        let max_x = (x1.max(x2) + half).ceil() as i64;
        let min_y = (y1.min(y2) - half).floor() as i64;
        let max_y = (y1.max(y2) + half).ceil() as i64;

        let seg_x = x2 - x1;
        let seg_y = y2 - y1;
        let len_sq = seg_x * seg_x + seg_y * seg_y;

        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let dx = px as f32 + 0.5 - x1;
                let dy = py as f32 + 0.5 - y1;
                // closest point on segment
                let t = if len_sq > 0.0 {
                    ((dx * seg_x + dy * seg_y) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let ex = dx - t * seg_x;
                let ey = dy - t * seg_y;
                if ex * ex + ey * ey <= half * half {
                    self.blend_over(px, py, color, a);
                }
            }
        }
    }

    fn blit_sprite(&mut self, sprite: &BlurSprite, x: f32, y: f32, tint: Rgb, alpha: u8) {
        let size = sprite.size() as i64;
        let origin_x = x as i64 - size / 2;
        let origin_y = y as i64 - size / 2;

        for (sx, sy, px) in sprite.image().enumerate_pixels() {
            let sprite_alpha = px[3] as u32;
            if sprite_alpha == 0 {
                continue;
            }
            let a = (sprite_alpha * alpha as u32) as f32 / (255.0 * 255.0);
            self.blend_over(origin_x + sx as i64, origin_y + sy as i64, tint, a);
        }
    }

    fn overlay(&mut self, color: Rgb, alpha: u8) {
        let a = alpha as f32 / 255.0;
        for py in 0..self.height as i64 {
            for px in 0..self.width as i64 {
                self.blend_over(px, py, color, a);
            }
        }
    }
}
