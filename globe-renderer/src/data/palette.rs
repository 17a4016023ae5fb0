use std::collections::HashMap;

use glam::{Vec3, vec3};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display)]
pub enum Continent {
    Africa,
    Asia,
    Europe,
    #[strum(serialize = "North America")]
    NorthAmerica,
    #[strum(serialize = "South America")]
    SouthAmerica,
    Oceania,
    Antarctica,
}

impl Continent {
    pub fn color(&self) -> Vec3 {
        use Continent::*;
        match self {
            Africa => vec3(1.0, 0.70, 0.28),
            Asia => vec3(1.0, 0.42, 0.42),
            Europe => vec3(0.30, 0.67, 0.97),
            NorthAmerica => vec3(0.32, 0.81, 0.40),
            SouthAmerica => vec3(0.99, 0.77, 0.10),
            Oceania => vec3(0.80, 0.36, 0.91),
            Antarctica => vec3(0.91, 0.93, 0.94),
        }
    }
}

pub const FALLBACK_COLOR: Vec3 = vec3(0.5, 0.5, 0.5);

/// Immutable continent name to colour mapping with a single fallback colour.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinentPalette {
    colors: HashMap<String, Vec3>,
    fallback: Vec3,
}

impl Default for ContinentPalette {
    fn default() -> Self {
        Self::new(
            Continent::iter().map(|continent| (continent.to_string(), continent.color())),
            FALLBACK_COLOR,
        )
    }
}

impl ContinentPalette {
    pub fn new(entries: impl IntoIterator<Item = (String, Vec3)>, fallback: Vec3) -> Self {
        Self {
            colors: entries.into_iter().collect(),
            fallback,
        }
    }

    /// Exact, case sensitive lookup.
    pub fn color_of(&self, name: Option<&str>) -> Vec3 {
        name.and_then(|name| self.colors.get(name))
            .copied()
            .unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[test]
    fn every_continent_has_its_color() {
        let palette = ContinentPalette::default();
        for continent in Continent::iter() {
            let name = continent.to_string();
            assert_eq!(palette.color_of(Some(&name)), continent.color());
            assert_ne!(palette.color_of(Some(&name)), FALLBACK_COLOR);
            assert_eq!(Continent::from_str(&name).ok(), Some(continent));
        }
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("Unknown"))]
    #[case(Some("Seven seas (open ocean)"))]
    #[case(Some("europe"))]
    #[case(Some("NorthAmerica"))]
    #[case(Some(" Asia"))]
    fn unmapped_names_use_fallback(#[case] name: Option<&str>) {
        assert_eq!(ContinentPalette::default().color_of(name), FALLBACK_COLOR);
    }

    #[test]
    fn substitute_palette() {
        let palette = ContinentPalette::new([("Mars".to_owned(), Vec3::X)], Vec3::Z);
        assert_eq!(palette.color_of(Some("Mars")), Vec3::X);
        assert_eq!(palette.color_of(Some("Africa")), Vec3::Z);
        assert_eq!(palette.color_of(None), Vec3::Z);
    }
}
