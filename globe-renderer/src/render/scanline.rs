use glam::Vec3;
use globe_common::Position;
use itertools::Itertools;

use super::{data::SegmentBuffer, geometry::project};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationParams {
    pub outline_radius: f32,
    pub grid_radius: f32,
    /// Spacing of the interior scanlines, in degrees of latitude.
    pub grid_step: f32,
    pub outline_intensity: f32,
    pub interior_intensity: f32,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            outline_radius: 1.003,
            grid_radius: 1.002,
            grid_step: 2.0,
            outline_intensity: 1.0,
            interior_intensity: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingBounds {
    pub min_longitude: f32,
    pub max_longitude: f32,
    pub min_latitude: f32,
    pub max_latitude: f32,
}

impl RingBounds {
    /// `None` for rings with fewer than two vertices.
    pub fn of(ring: &[Position]) -> Option<Self> {
        if ring.len() < 2 {
            return None;
        }

        let first = ring[0];
        let initial = Self {
            min_longitude: first.longitude,
            max_longitude: first.longitude,
            min_latitude: first.latitude,
            max_latitude: first.latitude,
        };

        Some(ring[1..].iter().fold(initial, |bounds, p| Self {
            min_longitude: bounds.min_longitude.min(p.longitude),
            max_longitude: bounds.max_longitude.max(p.longitude),
            min_latitude: bounds.min_latitude.min(p.latitude),
            max_latitude: bounds.max_latitude.max(p.latitude),
        }))
    }
}

pub const MAX_GRID_LINES: usize = 100_000;

/// Multiples of `step` within `[min_latitude, max_latitude]`, ascending.
/// At most `MAX_GRID_LINES` of them, starting from the lowest.
pub fn grid_latitudes(min_latitude: f32, max_latitude: f32, step: f32) -> Vec<f32> {
    if !(step > 0.0) || !min_latitude.is_finite() || !max_latitude.is_finite() {
        return vec![];
    }

    let first = (min_latitude / step).ceil();
    let last = (max_latitude / step).floor();
    if !(last >= first) {
        return vec![];
    }

    let count = last - first + 1.0;
    if count > MAX_GRID_LINES as f32 {
        log::warn!(
            "Grid step {step} needs {count} lines within [{min_latitude}, {max_latitude}], keeping the first {MAX_GRID_LINES}"
        );
    }

    (0..(count.min(MAX_GRID_LINES as f32) as u32))
        .map(|i| (first + i as f32) * step)
        .filter(|latitude| *latitude >= min_latitude && *latitude <= max_latitude)
        .collect()
}

/// Longitudes where the ring's edges cross the given latitude, sorted ascending.
///
/// Edges run from vertex `i` to `i + 1` with no closing edge back to the first vertex.
/// An edge crosses when one endpoint is strictly below the line and the other is on
/// or above it, so a vertex lying on the line is counted once.
pub fn crossings(ring: &[Position], latitude: f32) -> Vec<f32> {
    ring.iter()
        .tuple_windows()
        .filter(|(a, b)| {
            (a.latitude < latitude && b.latitude >= latitude)
                || (b.latitude < latitude && a.latitude >= latitude)
        })
        .map(|(a, b)| {
            let t = (latitude - a.latitude) / (b.latitude - a.latitude);
            a.longitude + t * (b.longitude - a.longitude)
        })
        .sorted_by(f32::total_cmp)
        .collect()
}

/// Outline segments of the ring followed by its interior scanline chords.
pub fn tessellate(ring: &[Position], color: Vec3, params: &TessellationParams) -> SegmentBuffer {
    let mut buffer = SegmentBuffer::with_capacity(ring.len().saturating_sub(1));

    let outline_color = color * params.outline_intensity;
    ring.iter().tuple_windows().for_each(|(a, b)| {
        buffer.push_segment(
            project(a.latitude, a.longitude, params.outline_radius),
            project(b.latitude, b.longitude, params.outline_radius),
            outline_color,
        )
    });

    let Some(bounds) = RingBounds::of(ring) else {
        return buffer;
    };

    let interior_color = color * params.interior_intensity;
    for latitude in grid_latitudes(bounds.min_latitude, bounds.max_latitude, params.grid_step) {
        // pairs by even-odd parity, a trailing unpaired crossing is dropped
        crossings(ring, latitude)
            .chunks_exact(2)
            .for_each(|pair| {
                buffer.push_segment(
                    project(latitude, pair[0], params.grid_radius),
                    project(latitude, pair[1], params.grid_radius),
                    interior_color,
                )
            });
    }

    buffer
}
