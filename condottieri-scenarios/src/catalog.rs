//! Reference data shared by scenarios: countries, religions and special units.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::{COLOR_HEX_LEN, COUNTRY_SLUG_MAX_LEN, RELIGION_SLUG_MAX_LEN};
use crate::slug::slugify;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("color '{0}' must be a hexadecimal RGB color such as FF0000")]
    InvalidColor(String),
    #[error("'{0}' does not produce a usable static name")]
    EmptyName(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Religion {
    pub slug: String,
    pub name: String,
}

impl Religion {
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyName`] when the name has no slug characters.
    pub fn new(name: impl Into<String>) -> Result<Self, CatalogError> {
        let name = name.into();
        let slug = slugify(&name, RELIGION_SLUG_MAX_LEN);
        if slug.is_empty() {
            return Err(CatalogError::EmptyName(name));
        }
        Ok(Self { slug, name })
    }
}

impl fmt::Display for Religion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A unit that costs more ducats than usual and may be stronger or more loyal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialUnit {
    pub static_title: String,
    pub title: String,
    pub cost: u32,
    pub power: u32,
    pub loyalty: u32,
}

impl SpecialUnit {
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "Costs {}; Strength {}; Loyalty {}",
            self.cost, self.power, self.loyalty
        )
    }
}

impl fmt::Display for SpecialUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}d)", self.title, self.cost)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub static_name: String,
    pub name: String,
    /// Hexadecimal RGB, e.g. `FF0000`.
    pub color: String,
    #[serde(default)]
    pub can_excommunicate: bool,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub special_units: Vec<SpecialUnit>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub protected: bool,
}

impl Country {
    /// Create a country, deriving its static name from `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidColor`] unless `color` is six hex digits
    /// and [`CatalogError::EmptyName`] when the name cannot produce a slug.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Result<Self, CatalogError> {
        let name = name.into();
        let color = color.into();
        if !is_hex_color(&color) {
            return Err(CatalogError::InvalidColor(color));
        }
        let static_name = slugify(&name, COUNTRY_SLUG_MAX_LEN);
        if static_name.is_empty() {
            return Err(CatalogError::EmptyName(name));
        }
        Ok(Self {
            static_name,
            name,
            color: color.to_ascii_uppercase(),
            can_excommunicate: false,
            religion: None,
            special_units: Vec::new(),
            enabled: false,
            protected: false,
        })
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn is_hex_color(color: &str) -> bool {
    color.len() == COLOR_HEX_LEN && color.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_derives_static_name() {
        let country = Country::new("Papal States", "ffcc00").unwrap();
        assert_eq!(country.static_name, "papal-states");
        assert_eq!(country.color, "FFCC00");
        assert!(!country.enabled);
        assert_eq!(country.to_string(), "Papal States");
    }

    #[test]
    fn country_rejects_bad_colors_and_names() {
        assert_eq!(
            Country::new("Milan", "red"),
            Err(CatalogError::InvalidColor("red".to_string()))
        );
        assert!(Country::new("Milan", "GG0000").is_err());
        assert!(matches!(
            Country::new("!!!", "000000"),
            Err(CatalogError::EmptyName(_))
        ));
    }

    #[test]
    fn special_unit_rendering() {
        let unit = SpecialUnit {
            static_title: "swiss".to_string(),
            title: "Swiss Pikemen".to_string(),
            cost: 6,
            power: 2,
            loyalty: 1,
        };
        assert_eq!(unit.to_string(), "Swiss Pikemen (6d)");
        assert_eq!(unit.describe(), "Costs 6; Strength 2; Loyalty 1");
    }

    #[test]
    fn religion_slug() {
        let religion = Religion::new("Orthodox Church").unwrap();
        assert_eq!(religion.slug, "orthodox-church");
    }
}
