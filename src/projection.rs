//! Perspective projection and depth grading for the plexus camera
//! Pure scalar math over an immutable camera description

use crate::config::PlexusConfig;

/// Fixed camera focal length in world units.
pub const FOCAL_LENGTH: f32 = 600.0;

/// Points closer than this to the camera plane fail projection.
pub const NEAR_MARGIN: f32 = 50.0;

/// Largest blur radius the depth-of-field mapping can produce.
pub const MAX_BLUR_RADIUS: u32 = 50;

/// A 3D point projected onto the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub screen_x: f32,
    pub screen_y: f32,
    pub scale: f32,
}

/// Pinhole camera looking down the z axis. Larger z is nearer the camera;
/// the focus plane sits at z = 0.
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    camera_distance: f32,
    aperture: f32,
    space_depth: f32,
    width: f32,
    height: f32,
    center_x: f32,
    center_y: f32,
}

impl Projector {
    pub fn new(config: &PlexusConfig, width: f32, height: f32) -> Self {
        Self {
            camera_distance: config.camera_distance,
            aperture: config.aperture,
            space_depth: config.space_depth,
            width,
            height,
            center_x: width / 2.0,
            center_y: height / 2.0,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.center_x = width / 2.0;
        self.center_y = height / 2.0;
    }

    /// Project a 3D point to screen space. Returns `None` when the point is
    /// behind or within [`NEAR_MARGIN`] of the camera plane; this is the
    /// normal not-visible outcome, not an error.
    pub fn project(&self, x: f32, y: f32, z: f32) -> Option<Projection> {
        if z >= self.camera_distance - NEAR_MARGIN {
            return None;
        }

        let distance = self.camera_distance - z;
        let scale = FOCAL_LENGTH / distance;

        Some(Projection {
            screen_x: self.center_x + x * scale,
            screen_y: self.center_y + y * scale,
            scale,
        })
    }

    /// Viewport containment test for a projected point, bounds inclusive.
    pub fn in_viewport(&self, screen_x: f32, screen_y: f32) -> bool {
        screen_x >= 0.0 && screen_x <= self.width && screen_y >= 0.0 && screen_y <= self.height
    }

    /// Stylized circle-of-confusion blur radius for a depth.
    ///
    /// A non-positive denominator (point as far from the focus plane as the
    /// camera itself, or an extreme aperture) means the formula degenerates;
    /// that case clamps to maximal blur rather than dividing.
    pub fn blur_radius(&self, z: f32) -> u32 {
        let focus_dist = z.abs();
        let denominator = self.aperture * (self.camera_distance - focus_dist);
        if denominator <= f32::EPSILON {
            return MAX_BLUR_RADIUS;
        }

        let coc = focus_dist * FOCAL_LENGTH / denominator;
        let radius = (coc * 0.1).round();
        (radius.max(0.0) as u32).min(MAX_BLUR_RADIUS)
    }

    /// Atmospheric-perspective alpha for a depth, in [0.3, 1.0].
    ///
    /// Shares the projection's convention: larger z is nearer the camera,
    /// so near particles are opaque and distant ones fade toward 0.3.
    pub fn depth_alpha(&self, z: f32) -> f32 {
        let depth_factor = ((z + self.space_depth / 2.0) / self.space_depth).clamp(0.0, 1.0);
        0.3 + 0.7 * depth_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlexusConfig;

    fn projector() -> Projector {
        Projector::new(&PlexusConfig::default(), 1280.0, 720.0)
    }

    #[test]
    fn origin_projects_to_screen_center_with_expected_scale() {
        let p = projector().project(0.0, 0.0, 0.0).unwrap();
        assert_eq!(p.screen_x, 640.0);
        assert_eq!(p.screen_y, 360.0);
        assert_eq!(p.scale, 0.75);
    }

    #[test]
    fn points_at_or_past_near_plane_fail_projection() {
        let proj = projector();
        // camera_distance 800 => near plane at z = 750
        assert!(proj.project(0.0, 0.0, 750.0).is_none());
        assert!(proj.project(100.0, -50.0, 751.0).is_none());
        assert!(proj.project(0.0, 0.0, 749.0).is_some());
    }

    #[test]
    fn projection_scales_offsets_from_center() {
        let p = projector().project(100.0, -100.0, 0.0).unwrap();
        assert_eq!(p.screen_x, 640.0 + 75.0);
        assert_eq!(p.screen_y, 360.0 - 75.0);
    }

    #[test]
    fn blur_radius_stays_in_range_over_depth_sweep() {
        let proj = projector();
        let mut z = -1000.0;
        while z <= 749.0 {
            let r = proj.blur_radius(z);
            assert!(r <= MAX_BLUR_RADIUS, "blur {} out of range at z={}", r, z);
            z += 13.0;
        }
    }

    #[test]
    fn focus_plane_is_sharp() {
        assert_eq!(projector().blur_radius(0.0), 0);
    }

    #[test]
    fn degenerate_denominator_clamps_to_max_blur() {
        // |z| equal to the camera distance zeroes the denominator
        assert_eq!(projector().blur_radius(-800.0), MAX_BLUR_RADIUS);
        assert_eq!(projector().blur_radius(-2000.0), MAX_BLUR_RADIUS);
    }

    #[test]
    fn depth_alpha_spans_declared_range_and_favors_near() {
        let proj = projector();
        // space_depth 1000 => z in [-500, 500]
        assert!((proj.depth_alpha(-500.0) - 0.3).abs() < 1e-6);
        assert!((proj.depth_alpha(500.0) - 1.0).abs() < 1e-6);
        assert!(proj.depth_alpha(400.0) > proj.depth_alpha(-400.0));

        let mut z = -500.0;
        while z <= 500.0 {
            let a = proj.depth_alpha(z);
            assert!((0.3..=1.0).contains(&a));
            z += 50.0;
        }
    }

    #[test]
    fn depth_alpha_clamps_outside_space_bounds() {
        let proj = projector();
        assert!((proj.depth_alpha(-10_000.0) - 0.3).abs() < 1e-6);
        assert!((proj.depth_alpha(10_000.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn viewport_bounds_are_inclusive() {
        let proj = projector();
        assert!(proj.in_viewport(0.0, 0.0));
        assert!(proj.in_viewport(1280.0, 720.0));
        assert!(!proj.in_viewport(-0.1, 10.0));
        assert!(!proj.in_viewport(10.0, 720.1));
    }
}
