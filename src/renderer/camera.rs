//! Perspective camera and pointer picking
//!
//! Fixed camera on the +z axis looking at the origin. The visible rectangle
//! at z = 0 is the simulation [`Region`], so wrapping happens just off screen
//! whatever the window aspect.

use glam::{Vec2, Vec3};

use crate::consts::{CAMERA_FOV_Y_DEG, CAMERA_Z};
use crate::sim::{AsteroidField, Region};

/// A point projected to the screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Pixels, origin top-left, y down
    pub pos: Vec2,
    /// Screen pixels per world unit at the point's depth
    pub scale: f32,
    /// Distance from the camera along the view axis
    pub depth: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub z: f32,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    /// Viewport size in CSS pixels
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(width_px: f32, height_px: f32) -> Self {
        Self {
            z: CAMERA_Z,
            fov_y: CAMERA_FOV_Y_DEG.to_radians(),
            viewport: Vec2::new(width_px.max(1.0), height_px.max(1.0)),
        }
    }

    pub fn resize(&mut self, width_px: f32, height_px: f32) {
        self.viewport = Vec2::new(width_px.max(1.0), height_px.max(1.0));
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y
    }

    /// Half the visible height at distance `depth` from the camera
    #[inline]
    fn half_height(&self, depth: f32) -> f32 {
        depth * (self.fov_y / 2.0).tan()
    }

    /// Visible world rectangle on the z = 0 plane
    pub fn region(&self) -> Region {
        let height = 2.0 * self.half_height(self.z);
        Region::new(height * self.aspect(), height)
    }

    /// World point to screen pixels. `None` behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Projected> {
        let depth = self.z - world.z;
        if depth <= f32::EPSILON {
            return None;
        }
        let half_h = self.half_height(depth);
        let half_w = half_h * self.aspect();
        let ndc = Vec2::new(world.x / half_w, world.y / half_h);
        Some(Projected {
            pos: Vec2::new(
                (ndc.x + 1.0) * 0.5 * self.viewport.x,
                (1.0 - ndc.y) * 0.5 * self.viewport.y,
            ),
            scale: self.viewport.y / (2.0 * half_h),
            depth,
        })
    }

    /// Screen percent (as used by overlay decorations) to pixels
    pub fn percent_to_px(&self, percent: Vec2) -> Vec2 {
        percent / 100.0 * self.viewport
    }

    /// Drifting asteroid under the pointer, nearest to the camera first.
    /// Asteroids are treated as spheres of radius `scale * scale_factor`.
    pub fn pick(&self, field: &AsteroidField, pointer: Vec2, scale_factor: f32) -> Option<u32> {
        field
            .asteroids
            .iter()
            .filter(|a| a.is_drifting())
            .filter_map(|a| {
                let p = self.project(a.position)?;
                let radius = a.scale * scale_factor * p.scale;
                (p.pos.distance(pointer) <= radius).then_some((a.id, p.depth))
            })
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(id, _)| id)
    }
}
