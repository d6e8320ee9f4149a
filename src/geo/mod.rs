//! Geography key mapping and choropleth coloring.
//!
//! Maps internal category keys (regions, countries) to the names used by an
//! external geography dataset and colors each geography by value. A geography
//! that cannot be mapped is drawn in the neutral color; it is never an error.

pub mod tables;

use crate::error::{StatsError, StatsResult};
use crate::models::CategoryValues;
use crate::schema::CategorySchema;
use serde::{Deserialize, Serialize};

/// Which alias table a dataset uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeographyKind {
    PhilippineRegions,
    Countries,
}

/// Result of translating an internal key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoLookup<'a> {
    Mapped(&'a str),
    Unmapped,
}

/// Static many-to-one alias table between category keys and geographies.
#[derive(Debug, Clone)]
pub struct GeoMapper {
    entries: &'static [(&'static str, &'static str)],
}

impl GeoMapper {
    pub fn for_kind(kind: GeographyKind) -> Self {
        let entries = match kind {
            GeographyKind::PhilippineRegions => tables::PHILIPPINE_REGIONS,
            GeographyKind::Countries => tables::COUNTRIES,
        };
        Self { entries }
    }

    /// Primary external name of an internal key.
    pub fn to_external(&self, key: &str) -> GeoLookup<'static> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(GeoLookup::Unmapped, |&(_, name)| GeoLookup::Mapped(name))
    }

    /// Internal key of `schema` that an external geography name stands for.
    ///
    /// Table entries are matched exactly, then case-insensitively. A schema key
    /// equal to the name (ignoring case) is the last resort.
    pub fn resolve<'s>(&self, name: &str, schema: &'s CategorySchema) -> Option<&'s str> {
        let in_schema = |key: &str| schema.keys().find(|k| *k == key);
        let name = name.trim();

        self.entries
            .iter()
            .filter(|(_, external)| *external == name)
            .find_map(|&(key, _)| in_schema(key))
            .or_else(|| {
                self.entries
                    .iter()
                    .filter(|(_, external)| external.eq_ignore_ascii_case(name))
                    .find_map(|&(key, _)| in_schema(key))
            })
            .or_else(|| schema.keys().find(|k| k.eq_ignore_ascii_case(name)))
    }
}

/// An `#RRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn parse(hex: &str) -> StatsResult<Self> {
        let invalid = || StatsError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

/// Linear color scale over `[0, max]`.
#[derive(Debug, Clone)]
pub struct ColorScale {
    low: Rgb,
    high: Rgb,
    no_data: Rgb,
    max: f64,
}

impl ColorScale {
    /// `max_value` below 1 is raised to 1 so the scale never divides by zero.
    pub fn new(low: &str, high: &str, no_data: &str, max_value: f64) -> StatsResult<Self> {
        Ok(Self {
            low: Rgb::parse(low)?,
            high: Rgb::parse(high)?,
            no_data: Rgb::parse(no_data)?,
            max: max_value.max(1.0),
        })
    }

    /// Fill for a value; missing or non-positive values get the neutral color.
    pub fn color(&self, value: Option<f64>) -> String {
        match value {
            Some(v) if v > 0.0 => {
                let t = (v / self.max).clamp(0.0, 1.0);
                self.low.lerp(self.high, t).to_hex()
            }
            _ => self.no_data.to_hex(),
        }
    }
}

/// Colors for the choropleth view.
#[derive(Debug, Clone)]
pub struct Palette {
    pub low: String,
    pub high: String,
    pub no_data: String,
}

/// One colored geography.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethCell {
    /// External geography name, or the category label when unmapped.
    pub geography: String,
    /// Category key the geography stands for.
    pub key: Option<String>,
    pub value: Option<f64>,
    pub mapped: bool,
    pub color: String,
}

/// Color each category, or each supplied geography name, by its total.
pub fn choropleth(
    totals: &CategoryValues,
    schema: &CategorySchema,
    mapper: &GeoMapper,
    palette: &Palette,
    geographies: Option<&[String]>,
) -> StatsResult<Vec<ChoroplethCell>> {
    let max_mapped = schema
        .keys()
        .filter(|key| matches!(mapper.to_external(key), GeoLookup::Mapped(_)))
        .filter_map(|key| totals.get(key))
        .fold(0.0_f64, f64::max);
    let scale = ColorScale::new(&palette.low, &palette.high, &palette.no_data, max_mapped)?;

    let cells = match geographies {
        Some(names) => names
            .iter()
            .map(|name| {
                let key = mapper.resolve(name, schema);
                let value = key.and_then(|k| totals.get(k));
                ChoroplethCell {
                    geography: name.clone(),
                    key: key.map(str::to_string),
                    value,
                    mapped: key.is_some(),
                    color: scale.color(value),
                }
            })
            .collect(),
        None => schema
            .categories
            .iter()
            .map(|category| {
                let value = totals.get(&category.key);
                match mapper.to_external(&category.key) {
                    GeoLookup::Mapped(name) => ChoroplethCell {
                        geography: name.to_string(),
                        key: Some(category.key.clone()),
                        value,
                        mapped: true,
                        color: scale.color(value),
                    },
                    GeoLookup::Unmapped => ChoroplethCell {
                        geography: category.label.clone(),
                        key: Some(category.key.clone()),
                        value,
                        mapped: false,
                        color: scale.color(None),
                    },
                }
            })
            .collect(),
    };

    Ok(cells)
}
