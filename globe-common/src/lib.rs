use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A point on the globe selected by the user, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
pub struct GeoCoord {
    pub latitude: f32,
    pub longitude: f32,
}

impl GeoCoord {
    pub fn new(latitude: f32, longitude: f32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single ring vertex. GeoJSON stores positions as `[longitude, latitude, ...]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Position {
    pub longitude: f32,
    pub latitude: f32,
}

impl Position {
    pub fn new(longitude: f32, latitude: f32) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl From<(f32, f32)> for Position {
    fn from((longitude, latitude): (f32, f32)) -> Self {
        Self::new(longitude, latitude)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = Vec::<f32>::deserialize(deserializer)?;
        // altitude and any further members are ignored
        match values.as_slice() {
            &[longitude, latitude, ..] => Ok(Position::new(longitude, latitude)),
            _ => Err(D::Error::custom(format!(
                "position needs longitude and latitude, got {} values",
                values.len()
            ))),
        }
    }
}

pub type Ring = Vec<Position>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

/// One boundary entity (a country) of the dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawFeature")]
pub struct GeoFeature {
    pub continent: Option<String>,
    pub geometry: Geometry,
}

impl GeoFeature {
    pub fn new(continent: Option<&str>, geometry: Geometry) -> Self {
        Self {
            continent: continent.map(str::to_owned),
            geometry,
        }
    }

    /// Polygons of the feature; a `Polygon` geometry is a single one.
    pub fn polygons(&self) -> &[Vec<Ring>] {
        match &self.geometry {
            Geometry::Polygon(rings) => std::slice::from_ref(rings),
            Geometry::MultiPolygon(polygons) => polygons.as_slice(),
        }
    }

    /// All rings in polygon-then-ring order. Holes are not told apart from outer rings.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons().iter().flatten()
    }
}

#[derive(Deserialize)]
struct RawFeature {
    geometry: Geometry,
    #[serde(default)]
    properties: Option<Value>,
}

impl From<RawFeature> for GeoFeature {
    fn from(raw: RawFeature) -> Self {
        let continent = raw.properties.as_ref().and_then(|properties| {
            ["CONTINENT", "continent"]
                .into_iter()
                .filter_map(|key| properties.get(key).and_then(Value::as_str))
                .find(|name| !name.is_empty())
                .map(str::to_owned)
        });

        Self {
            continent,
            geometry: raw.geometry,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    features: Vec<Value>,
}

impl FeatureCollection {
    /// Parses a GeoJSON feature collection. Only a malformed document is an error;
    /// features that can't be read are skipped.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Vec<GeoFeature>> {
        let collection: FeatureCollection = serde_json::from_slice(bytes)?;
        Ok(collection.into_features())
    }

    pub fn into_features(self) -> Vec<GeoFeature> {
        let total = self.features.len();
        let features = self
            .features
            .into_iter()
            .enumerate()
            .filter_map(
                |(i, value)| match serde_json::from_value::<GeoFeature>(value) {
                    Ok(feature) => Some(feature),
                    Err(err) => {
                        log::debug!("Skipping feature {i}: {err}");
                        None
                    }
                },
            )
            .collect::<Vec<_>>();

        log::info!(
            "Read {} boundary features ({} skipped)",
            features.len(),
            total - features.len()
        );

        features
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn deserialize_polygon_feature() {
        let json = r#"{
            "type": "Feature",
            "properties": {"NAME": "Square", "CONTINENT": "Africa"},
            "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [10, 0], [10, 10]]]}
        }"#;
        let feature: GeoFeature = serde_json::from_str(json).unwrap();
        assert_eq!(
            feature,
            GeoFeature::new(
                Some("Africa"),
                Geometry::Polygon(vec![vec![
                    Position::new(0.0, 0.0),
                    Position::new(10.0, 0.0),
                    Position::new(10.0, 10.0),
                ]]),
            )
        );
    }

    #[rstest]
    #[case(r#"{"continent": "Asia"}"#, Some("Asia"))]
    #[case(r#"{"CONTINENT": "Europe", "continent": "Asia"}"#, Some("Europe"))]
    #[case(r#"{"CONTINENT": "", "continent": "Asia"}"#, Some("Asia"))]
    #[case(r#"{"CONTINENT": 7}"#, None)]
    #[case(r#"{}"#, None)]
    #[case(r#"null"#, None)]
    fn continent_label(#[case] properties: &str, #[case] expected: Option<&str>) {
        let json = format!(
            r#"{{"properties": {properties}, "geometry": {{"type": "Polygon", "coordinates": []}}}}"#
        );
        let feature: GeoFeature = serde_json::from_str(&json).unwrap();
        assert_eq!(feature.continent.as_deref(), expected);
    }

    #[test]
    fn position_keeps_first_two_members() {
        let position: Position = serde_json::from_str("[12.5, -3.25, 100.0]").unwrap();
        assert_eq!(position, Position::new(12.5, -3.25));
        assert!(serde_json::from_str::<Position>("[12.5]").is_err());
    }

    #[test]
    fn rings_of_multi_polygon_in_order() {
        let first = vec![Position::new(0.0, 0.0), Position::new(1.0, 1.0)];
        let hole = vec![Position::new(0.2, 0.2), Position::new(0.4, 0.4)];
        let second = vec![Position::new(5.0, 5.0), Position::new(6.0, 6.0)];
        let feature = GeoFeature::new(
            None,
            Geometry::MultiPolygon(vec![
                vec![first.clone(), hole.clone()],
                vec![second.clone()],
            ]),
        );

        assert_eq!(feature.polygons().len(), 2);
        assert_eq!(
            feature.rings().collect::<Vec<_>>(),
            vec![&first, &hole, &second]
        );
    }

    #[test]
    fn collection_skips_malformed_features() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"properties": {"CONTINENT": "Asia"}, "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 1]]]}},
                {"properties": {"CONTINENT": "Asia"}},
                {"properties": {}, "geometry": {"type": "Polygon"}},
                {"properties": {}, "geometry": {"type": "Point", "coordinates": [1, 2]}},
                {"properties": {}, "geometry": null},
                {"properties": {}, "geometry": {"type": "MultiPolygon", "coordinates": [[[[2, 2], [3, 3], [4, 2]]]]}}
            ]
        }"#;

        let features = FeatureCollection::from_slice(json.as_bytes()).unwrap();

        assert_eq!(features.len(), 2);
        assert_eq!(features[0].continent.as_deref(), Some("Asia"));
        assert!(matches!(features[1].geometry, Geometry::MultiPolygon(_)));
    }

    #[test]
    fn collection_without_features_is_an_error() {
        assert!(FeatureCollection::from_slice(br#"{"type": "FeatureCollection"}"#).is_err());
        assert!(FeatureCollection::from_slice(b"not json").is_err());
    }
}
