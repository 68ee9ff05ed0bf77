use serde::{Deserialize, Serialize};

/// How point locations are resolved on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationMode {
    CountryNames,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ColorValue {
    Category(String),
    Number(f64),
}

impl ColorValue {
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::Category(category) => Some(category),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Category(_) => None,
            Self::Number(value) => Some(*value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub location: String,
    pub color: ColorValue,
    pub hover: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryColor {
    pub category: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColorMapping {
    /// Category → color, in legend order.
    Discrete { colors: Vec<CategoryColor> },
    /// Numeric values on `[min, max]`, stops at positions 0.0..=1.0.
    Continuous {
        min: f64,
        max: f64,
        stops: Vec<(f64, String)>,
    },
}

impl ColorMapping {
    pub fn color_for(&self, category: &str) -> Option<&str> {
        match self {
            Self::Discrete { colors } => colors
                .iter()
                .find(|entry| entry.category == category)
                .map(|entry| entry.color.as_str()),
            Self::Continuous { .. } => None,
        }
    }
}

/// Declarative description of one map. Built fresh by a projection and never
/// mutated once published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: Option<String>,
    pub location_mode: LocationMode,
    pub points: Vec<ChartPoint>,
    pub color_mapping: ColorMapping,
    /// Legend title for discrete maps, color-bar title for continuous ones.
    pub color_title: Option<String>,
}

impl ChartSpec {
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|point| point.location.as_str())
    }
}
