use std::f32::consts::TAU;

use glam::Vec3;
use globe_common::GeoCoord;

use super::data::{SegmentBuffer, ShellVertex};

pub const GLOBE_RADIUS: f32 = 1.0;

pub struct Mesh {
    pub vertices: Vec<ShellVertex>,
    pub indices: Vec<u32>,
}

/// Maps latitude/longitude in degrees onto a sphere of the given radius, y is up.
/// Inputs are not clamped.
pub fn project(latitude: f32, longitude: f32, radius: f32) -> Vec3 {
    let phi = (90.0 - latitude).to_radians();
    let theta = (longitude + 180.0).to_radians();
    let x = -radius * phi.sin() * theta.cos();
    let y = radius * phi.cos();
    let z = radius * phi.sin() * theta.sin();
    Vec3::new(x, y, z)
}

pub fn project_coord(coord: GeoCoord, radius: f32) -> Vec3 {
    project(coord.latitude, coord.longitude, radius)
}

/// Latitude/longitude sphere with counter-clockwise faces seen from outside.
pub fn generate_sphere(radius: f32, stacks: u32, slices: u32) -> Mesh {
    let vertices = (0..=stacks)
        .flat_map(|i| {
            let latitude = 90.0 - 180.0 * i as f32 / stacks as f32;
            (0..=slices).map(move |j| {
                let longitude = -180.0 + 360.0 * j as f32 / slices as f32;
                let position = project(latitude, longitude, radius);
                ShellVertex::new(position, position.normalize_or_zero())
            })
        })
        .collect();

    let row = slices + 1;
    let indices = (0..stacks)
        .flat_map(|i| {
            (0..slices).flat_map(move |j| {
                let a = i * row + j;
                let b = a + row;
                let c = a + 1;
                let d = b + 1;
                [a, b, c, c, b, d]
            })
        })
        .collect();

    Mesh { vertices, indices }
}

/// Circle of segments in the equatorial plane.
pub fn generate_data_ring(radius: f32, segments: u32, color: Vec3) -> SegmentBuffer {
    let mut buffer = SegmentBuffer::default();
    for i in 0..segments {
        let start = -180.0 + 360.0 * i as f32 / segments as f32;
        let end = -180.0 + 360.0 * (i + 1) as f32 / segments as f32;
        buffer.push_segment(project(0.0, start, radius), project(0.0, end, radius), color);
    }
    buffer
}

/// Highlight for the selected position: a small circle tangent to the globe
/// and a spike pointing away from the centre.
pub fn generate_marker(
    coord: GeoCoord,
    radius: f32,
    size: f32,
    segments: u32,
    color: Vec3,
) -> SegmentBuffer {
    let center = project_coord(coord, radius);
    let normal = center.normalize_or_zero();
    let tangent = normal.any_orthonormal_vector();
    let bitangent = normal.cross(tangent);

    let point_at = |i: u32| {
        let angle = TAU * i as f32 / segments as f32;
        center + size * (angle.cos() * tangent + angle.sin() * bitangent)
    };

    let mut buffer = SegmentBuffer::default();
    for i in 0..segments {
        buffer.push_segment(point_at(i), point_at(i + 1), color);
    }
    buffer.push_segment(center, center + normal * size * 3.0, color);
    buffer
}
