use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProvinceId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u32);

/// Store-assigned quote identifier: epoch milliseconds at creation, as a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(pub String);

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar year used for asset-age factors (construction, vehicle, motorcycle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Year(pub i32);

impl Year {
    /// Whole years elapsed from `built` to `self`. Negative for future years.
    pub fn since(self, built: i64) -> i64 {
        i64::from(self.0).saturating_sub(built)
    }
}

/// The four insurance lines. Serialized with the storage tags of the quote history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "CASA")]
    Home,
    #[serde(rename = "AUTO")]
    Auto,
    #[serde(rename = "MOTO")]
    Motorcycle,
    #[serde(rename = "VIDA")]
    Life,
}

impl Category {
    pub const ALL: [Category; 4] =
        [Category::Home, Category::Auto, Category::Motorcycle, Category::Life];

    pub fn tag(self) -> &'static str {
        match self {
            Category::Home => "CASA",
            Category::Auto => "AUTO",
            Category::Motorcycle => "MOTO",
            Category::Life => "VIDA",
        }
    }

    /// Multiplier applied to twelve monthly payments when paying annually.
    pub fn annual_discount_rate(self) -> f64 {
        match self {
            Category::Life => 0.85,
            Category::Home | Category::Auto | Category::Motorcycle => 0.9,
        }
    }

    /// Base price used when the requested plan is not in the category's catalog.
    pub fn default_base_price(self) -> u64 {
        match self {
            Category::Home => 500,
            Category::Auto => 1000,
            Category::Motorcycle => 600,
            Category::Life => 1000,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown insurance category '{}' (expected CASA, AUTO, MOTO or VIDA)", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the storage tags and the lowercase English names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CASA" | "HOME" => Ok(Category::Home),
            "AUTO" | "CAR" => Ok(Category::Auto),
            "MOTO" | "MOTORCYCLE" => Ok(Category::Motorcycle),
            "VIDA" | "LIFE" => Ok(Category::Life),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_as_storage_tag() {
        let json = serde_json::to_string(&Category::Motorcycle).unwrap();
        assert_eq!(json, r#""MOTO""#);
        let back: Category = serde_json::from_str(r#""VIDA""#).unwrap();
        assert_eq!(back, Category::Life);
    }

    #[test]
    fn life_has_steeper_annual_discount() {
        assert_eq!(Category::Life.annual_discount_rate(), 0.85);
        for c in [Category::Home, Category::Auto, Category::Motorcycle] {
            assert_eq!(c.annual_discount_rate(), 0.9, "{c}");
        }
    }

    #[test]
    fn category_parses_tags_and_names() {
        assert_eq!("casa".parse::<Category>().unwrap(), Category::Home);
        assert_eq!("MOTORCYCLE".parse::<Category>().unwrap(), Category::Motorcycle);
        assert_eq!(" vida ".parse::<Category>().unwrap(), Category::Life);
        let err = "boat".parse::<Category>().unwrap_err();
        assert!(err.to_string().contains("boat"));
    }

    #[test]
    fn year_since_can_be_negative() {
        assert_eq!(Year(2026).since(2015), 11);
        assert_eq!(Year(2026).since(2030), -4);
    }

    #[test]
    fn quote_id_serializes_transparently() {
        let id = QuoteId("1700000000000".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""1700000000000""#);
    }
}
