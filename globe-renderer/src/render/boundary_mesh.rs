use globe_common::GeoFeature;

use crate::data::palette::ContinentPalette;

use super::{
    data::SegmentBuffer,
    scanline::{TessellationParams, tessellate},
};

/// Turns the boundary dataset into one line list: borders and interior scanlines
/// of every ring, coloured by continent.
#[derive(Debug, Clone, Default)]
pub struct BoundaryMeshBuilder {
    palette: ContinentPalette,
    params: TessellationParams,
}

impl BoundaryMeshBuilder {
    pub fn new(palette: ContinentPalette, params: TessellationParams) -> Self {
        Self { palette, params }
    }

    /// Segments are concatenated in feature, then polygon, then ring order.
    pub fn build(&self, features: &[GeoFeature]) -> SegmentBuffer {
        let mut buffer = SegmentBuffer::default();
        for feature in features {
            let color = self.palette.color_of(feature.continent.as_deref());
            feature
                .rings()
                .for_each(|ring| buffer.extend(tessellate(ring, color, &self.params)));
        }

        log::debug!(
            "Built boundary mesh: {} features, {} segments",
            features.len(),
            buffer.segment_count()
        );

        buffer
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use globe_common::{FeatureCollection, Geometry, Position, Ring};

    use super::*;
    use crate::data::palette::{Continent, FALLBACK_COLOR};

    fn ring(points: &[(f32, f32)]) -> Ring {
        points.iter().copied().map(Position::from).collect()
    }

    fn params() -> TessellationParams {
        TessellationParams {
            grid_step: 5.0,
            ..TessellationParams::default()
        }
    }

    #[test]
    fn unknown_continent_two_point_ring() {
        let feature = GeoFeature::new(
            None,
            Geometry::Polygon(vec![ring(&[(1.0, 3.0), (6.0, 3.0)])]),
        );
        let builder = BoundaryMeshBuilder::new(ContinentPalette::default(), params());
        let buffer = builder.build(&[feature]);

        assert_eq!(buffer.segment_count(), 1);
        assert!(buffer.colors().iter().all(|color| *color == FALLBACK_COLOR));
    }

    #[test]
    fn multi_polygon_keeps_polygon_order() {
        let first = ring(&[(0.0, 0.0), (4.0, 1.0), (2.0, 3.0)]);
        let second = ring(&[(30.0, 30.0), (31.0, 31.0)]);
        let feature = GeoFeature::new(
            Some("Europe"),
            Geometry::MultiPolygon(vec![vec![first.clone()], vec![second.clone()]]),
        );
        let builder = BoundaryMeshBuilder::new(ContinentPalette::default(), params());
        let color = Continent::Europe.color();

        let mut expected = tessellate(&first, color, &params());
        expected.extend(tessellate(&second, color, &params()));

        let buffer = builder.build(&[feature]);
        assert_eq!(buffer, expected);
        assert_eq!(buffer.segment_count(), 3);
    }

    #[test]
    fn features_concatenate_in_input_order() {
        let a = GeoFeature::new(
            Some("Africa"),
            Geometry::Polygon(vec![
                ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
                ring(&[(2.0, 2.0), (4.0, 2.0)]),
            ]),
        );
        let b = GeoFeature::new(
            Some("Asia"),
            Geometry::Polygon(vec![ring(&[(50.0, 20.0), (60.0, 25.0)])]),
        );
        let palette = ContinentPalette::new(
            [
                ("Africa".to_owned(), Vec3::X),
                ("Asia".to_owned(), Vec3::Y),
            ],
            Vec3::Z,
        );
        let builder = BoundaryMeshBuilder::new(palette, params());

        let forward = builder.build(&[a.clone(), b.clone()]);
        let backward = builder.build(&[b, a]);

        assert_eq!(forward.segment_count(), backward.segment_count());
        assert_ne!(forward, backward);
        assert_eq!(forward.colors().first(), Some(&Vec3::X));
        assert_eq!(forward.colors().last(), Some(&Vec3::Y));
        assert_eq!(backward.colors().first(), Some(&Vec3::Y));
    }

    #[test]
    fn builds_from_parsed_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"properties": {"CONTINENT": "Oceania"}, "geometry": {"type": "Polygon", "coordinates": [[[110, -40], [155, -40], [155, -10], [110, -10], [110, -40]]]}},
                {"properties": {"CONTINENT": "Oceania"}},
                {"properties": {"continent": "South America"}, "geometry": {"type": "MultiPolygon", "coordinates": [[[[-70, -50], [-60, -50], [-65, -40]]], [[[-80, 0], [-75, 5]]]]}}
            ]
        }"#;
        let features = FeatureCollection::from_slice(json.as_bytes()).unwrap();
        let buffer = BoundaryMeshBuilder::new(ContinentPalette::default(), params())
            .build(&features);

        assert!(!buffer.is_empty());
        assert_eq!(buffer.points().len() % 2, 0);
        assert_eq!(buffer.points().len(), buffer.colors().len());
    }

    #[test]
    fn empty_dataset_builds_empty_mesh() {
        let buffer = BoundaryMeshBuilder::default().build(&[]);
        assert!(buffer.is_empty());
    }
}
