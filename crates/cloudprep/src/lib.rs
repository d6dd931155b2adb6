//! Render preparation for decoded point clouds: translate to the origin,
//! scale the longest axis to a fixed span, and assign per-point colors.
//!
//! [`normalize`] is total: it never fails and never emits NaN or infinity,
//! including for coincident-point clouds (scale falls back to 1) and empty
//! clouds (a deterministic placeholder cube is substituted so the renderer
//! always has something to draw).

use cloudfmt::{Aabb, Point3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

/// Extent of the longest axis after normalization, in scene units.
pub const TARGET_SPAN: f32 = 10.0;

/// Color used for every point in [`ColorMode::Flat`].
pub const FLAT_COLOR: [f32; 3] = [0.0, 0.0, 1.0];

/// Size of the placeholder cloud substituted for empty input.
pub const PLACEHOLDER_POINTS: usize = 1000;

// Fixed seed so the placeholder cloud is identical across runs.
const PLACEHOLDER_SEED: u64 = 0x636c6f75_64707265;

/// Per-point color policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Every point gets [`FLAT_COLOR`].
    Flat,
    /// Blue-to-red linear ramp over the transformed z range.
    Altitude,
}

/// Two index-aligned `3 * n` arrays: `positions[3i..3i+3]` and
/// `colors[3i..3i+3]` describe point `i`. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderBuffer {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl RenderBuffer {
    pub fn num_points(&self) -> usize {
        self.positions.len() / 3
    }
}

#[inline]
fn color_for(z: f32, mode: ColorMode) -> [f32; 3] {
    match mode {
        ColorMode::Flat => FLAT_COLOR,
        ColorMode::Altitude => {
            // Transformed clouds span roughly [-TARGET_SPAN/2, TARGET_SPAN/2];
            // clamp so outliers cannot push channels out of [0, 1].
            let t = ((z + TARGET_SPAN * 0.5) / TARGET_SPAN).clamp(0.0, 1.0);
            [t, 0.0, 1.0 - t]
        }
    }
}

/// Center `points` on the origin, scale the longest axis of `bounds` to
/// [`TARGET_SPAN`], and assign a color per point.
///
/// `bounds` must describe the source coordinates of `points`; if an empty box
/// is passed alongside a non-empty cloud, the bounds are recomputed rather
/// than letting the sentinel infinities reach the output.
pub fn normalize(points: &[Point3], bounds: &Aabb, mode: ColorMode) -> RenderBuffer {
    if points.is_empty() {
        log::debug!("normalize: empty cloud, substituting placeholder");
        return placeholder_cloud(mode);
    }

    let bounds = if bounds.is_empty() {
        Aabb::of_points(points)
    } else {
        *bounds
    };
    // Non-empty box, so the accessors cannot return None.
    let center = bounds.center().unwrap_or([0.0; 3]);
    let max_dim = bounds.max_dim().unwrap_or(0.0);
    // Coincident points have no extent to scale; leave them at unit scale.
    let scale = if max_dim > 0.0 {
        TARGET_SPAN / max_dim
    } else {
        1.0
    };

    let transformed: Vec<(Point3, [f32; 3])> = points
        .par_iter()
        .map(|p| {
            let q = [
                (p[0] - center[0]) * scale,
                (p[1] - center[1]) * scale,
                (p[2] - center[2]) * scale,
            ];
            (q, color_for(q[2], mode))
        })
        .collect();

    let mut positions = Vec::with_capacity(points.len() * 3);
    let mut colors = Vec::with_capacity(points.len() * 3);
    for (q, c) in transformed {
        positions.extend_from_slice(&q);
        colors.extend_from_slice(&c);
    }

    log::debug!(
        "normalize: {} points, scale {:.6}, center ({:.3}, {:.3}, {:.3})",
        points.len(),
        scale,
        center[0],
        center[1],
        center[2]
    );

    RenderBuffer { positions, colors }
}

/// Deterministic stand-in cloud spanning the target cube, used when a file
/// decodes to zero points.
fn placeholder_cloud(mode: ColorMode) -> RenderBuffer {
    let mut rng = StdRng::seed_from_u64(PLACEHOLDER_SEED);
    let half = TARGET_SPAN * 0.5;
    let mut positions = Vec::with_capacity(PLACEHOLDER_POINTS * 3);
    let mut colors = Vec::with_capacity(PLACEHOLDER_POINTS * 3);
    for _ in 0..PLACEHOLDER_POINTS {
        let p: [f32; 3] = [
            rng.gen_range(-half..half),
            rng.gen_range(-half..half),
            rng.gen_range(-half..half),
        ];
        positions.extend_from_slice(&p);
        colors.extend_from_slice(&color_for(p[2], mode));
    }
    RenderBuffer { positions, colors }
}
