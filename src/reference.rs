use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReferenceDataError;
use crate::types::{Category, LocationId, ProvinceId};

/// Risk index assumed for a location name that is not in the hierarchy.
/// Maps to a neutral location factor of 1.0.
pub const DEFAULT_RISK_INDEX: u8 = 5;

pub const MIN_RISK_INDEX: u8 = 1;
pub const MAX_RISK_INDEX: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    /// 1 = very safe, 10 = very risky.
    pub risk_index: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub id: ProvinceId,
    pub name: String,
    pub locations: Vec<Location>,
}

/// Maximum payout of a plan. Serialized as a plain number where `0` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub enum CoverageLimit {
    Limited(u64),
    Unlimited,
}

impl From<u64> for CoverageLimit {
    fn from(raw: u64) -> Self {
        if raw == 0 { CoverageLimit::Unlimited } else { CoverageLimit::Limited(raw) }
    }
}

impl From<CoverageLimit> for u64 {
    fn from(limit: CoverageLimit) -> Self {
        match limit {
            CoverageLimit::Limited(amount) => amount,
            CoverageLimit::Unlimited => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsurancePlan {
    /// Catalog key, matched against `coveragePlan` in applicant input.
    pub value: String,
    pub label: String,
    pub description: String,
    pub details: Vec<String>,
    pub base_price: u64,
    pub coverage_limit: CoverageLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanCatalogs {
    pub home: Vec<InsurancePlan>,
    pub auto: Vec<InsurancePlan>,
    pub motorcycle: Vec<InsurancePlan>,
    pub life: Vec<InsurancePlan>,
}

/// Read-only catalogs that parameterize rating. Loaded once and shared by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub provinces: Vec<Province>,
    pub plans: PlanCatalogs,
}

impl ReferenceData {
    /// Load catalogs from a JSON file with the same shape as the serialized form.
    pub fn from_path(path: &Path) -> Result<Self, ReferenceDataError> {
        let content = std::fs::read_to_string(path).map_err(|e| ReferenceDataError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let data = Self::from_json_str(&content)?;
        tracing::info!(
            path = %path.display(),
            provinces = data.provinces.len(),
            "loaded reference data"
        );
        Ok(data)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ReferenceDataError> {
        let data: ReferenceData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    /// Check the invariants rating relies on.
    pub fn validate(&self) -> Result<(), ReferenceDataError> {
        let mut province_ids = HashSet::new();
        for province in &self.provinces {
            if !province_ids.insert(province.id) {
                return Err(ReferenceDataError::Validation(format!(
                    "duplicate province id {}",
                    province.id.0
                )));
            }
            for location in &province.locations {
                if !(MIN_RISK_INDEX..=MAX_RISK_INDEX).contains(&location.risk_index) {
                    return Err(ReferenceDataError::Validation(format!(
                        "location '{}' has risk index {}; must be between {MIN_RISK_INDEX} and {MAX_RISK_INDEX}",
                        location.name, location.risk_index
                    )));
                }
            }
        }

        for category in Category::ALL {
            let mut values = HashSet::new();
            for plan in self.plans(category) {
                if plan.value.trim().is_empty() {
                    return Err(ReferenceDataError::Validation(format!(
                        "{category} catalog has a plan with an empty value"
                    )));
                }
                if plan.base_price == 0 {
                    return Err(ReferenceDataError::Validation(format!(
                        "{category} plan '{}' has a zero base price",
                        plan.value
                    )));
                }
                if !values.insert(plan.value.as_str()) {
                    return Err(ReferenceDataError::Validation(format!(
                        "duplicate {category} plan value '{}'",
                        plan.value
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    pub fn plans(&self, category: Category) -> &[InsurancePlan] {
        match category {
            Category::Home => &self.plans.home,
            Category::Auto => &self.plans.auto,
            Category::Motorcycle => &self.plans.motorcycle,
            Category::Life => &self.plans.life,
        }
    }

    pub fn plan(&self, category: Category, value: &str) -> Option<&InsurancePlan> {
        self.plans(category).iter().find(|p| p.value == value)
    }

    /// Locations of a province in catalog order; empty for an unknown id.
    pub fn locations_of(&self, province_id: ProvinceId) -> &[Location] {
        self.provinces
            .iter()
            .find(|p| p.id == province_id)
            .map(|p| p.locations.as_slice())
            .unwrap_or(&[])
    }

    /// First location with this exact name, searching provinces in order.
    pub fn find_location(&self, name: &str) -> Option<&Location> {
        self.provinces
            .iter()
            .flat_map(|p| p.locations.iter())
            .find(|loc| loc.name == name)
    }

    pub fn risk_index_of(&self, location_name: &str) -> u8 {
        self.find_location(location_name)
            .map(|loc| loc.risk_index)
            .unwrap_or(DEFAULT_RISK_INDEX)
    }

    /// Display label for a plan value, searching every catalog. Unknown values echo back.
    pub fn plan_label<'a>(&'a self, value: &'a str) -> &'a str {
        Category::ALL
            .iter()
            .flat_map(|&c| self.plans(c).iter())
            .find(|p| p.value == value)
            .map(|p| p.label.as_str())
            .unwrap_or(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> ReferenceData {
        ReferenceData {
            provinces: vec![Province {
                id: ProvinceId(1),
                name: "Test".to_string(),
                locations: vec![
                    Location { id: LocationId(1), name: "Quiet".to_string(), risk_index: 1 },
                    Location { id: LocationId(2), name: "Rough".to_string(), risk_index: 10 },
                ],
            }],
            plans: PlanCatalogs {
                home: vec![InsurancePlan {
                    value: "basico".to_string(),
                    label: "Basic".to_string(),
                    description: String::new(),
                    details: vec![],
                    base_price: 100,
                    coverage_limit: CoverageLimit::Unlimited,
                }],
                auto: vec![],
                motorcycle: vec![],
                life: vec![],
            },
        }
    }

    #[test]
    fn canonical_catalog_validates() {
        ReferenceData::canonical().validate().unwrap();
    }

    #[test]
    fn canonical_catalog_sizes() {
        let data = ReferenceData::canonical();
        assert_eq!(data.provinces().len(), 10);
        let locations: usize = data.provinces().iter().map(|p| p.locations.len()).sum();
        assert_eq!(locations, 62);
        assert_eq!(data.plans(Category::Home).len(), 4);
        assert_eq!(data.plans(Category::Auto).len(), 4);
        assert_eq!(data.plans(Category::Motorcycle).len(), 3);
        assert_eq!(data.plans(Category::Life).len(), 4);
    }

    #[test]
    fn risk_index_of_known_location() {
        let data = ReferenceData::canonical();
        assert_eq!(data.risk_index_of("CABA"), 3);
        assert_eq!(data.risk_index_of("Zona Sur (GBA)"), 6);
        assert_eq!(data.risk_index_of("San Martín de los Andes"), 1);
    }

    #[test]
    fn risk_index_of_unknown_location_defaults_to_five() {
        let data = ReferenceData::canonical();
        assert_eq!(data.risk_index_of("Nonexistent Place"), DEFAULT_RISK_INDEX);
        assert_eq!(data.risk_index_of(""), 5);
        // lookup is exact, case-sensitive
        assert_eq!(data.risk_index_of("caba"), 5);
    }

    #[test]
    fn locations_of_unknown_province_is_empty() {
        let data = ReferenceData::canonical();
        assert!(data.locations_of(ProvinceId(99)).is_empty());
        let cordoba = data.locations_of(ProvinceId(2));
        assert_eq!(cordoba.first().map(|l| l.name.as_str()), Some("Córdoba Capital"));
        assert_eq!(cordoba.len(), 8);
    }

    #[test]
    fn plan_lookup_is_per_catalog() {
        let data = ReferenceData::canonical();
        assert_eq!(data.plan(Category::Home, "estandar").map(|p| p.base_price), Some(500));
        assert!(data.plan(Category::Auto, "estandar").is_none());
        assert_eq!(data.plan(Category::Life, "estandar_vida").map(|p| p.base_price), Some(800));
    }

    #[test]
    fn plan_label_searches_all_catalogs_and_echoes_unknown() {
        let data = ReferenceData::canonical();
        assert_eq!(data.plan_label("todo_riesgo_moto"), "Todo Riesgo Moto");
        assert_eq!(data.plan_label("vip"), "Plan VIP");
        assert_eq!(data.plan_label("no_such_plan"), "no_such_plan");
    }

    #[test]
    fn coverage_limit_zero_means_unlimited() {
        let data = ReferenceData::canonical();
        let vip = data.plan(Category::Home, "vip").unwrap();
        assert_eq!(vip.coverage_limit, CoverageLimit::Unlimited);
        let basico = data.plan(Category::Home, "basico").unwrap();
        assert_eq!(basico.coverage_limit, CoverageLimit::Limited(50_000));

        let json = serde_json::to_value(vip).unwrap();
        assert_eq!(json["coverageLimit"], 0);
        assert_eq!(json["basePrice"], 1200);
    }

    #[test]
    fn json_round_trip_preserves_catalogs() {
        let data = ReferenceData::canonical();
        let json = serde_json::to_string(&data).unwrap();
        let back = ReferenceData::from_json_str(&json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn validate_rejects_out_of_range_risk_index() {
        let mut data = tiny();
        data.provinces[0].locations[0].risk_index = 0;
        let err = data.validate().unwrap_err();
        assert!(err.to_string().contains("risk index 0"), "{err}");

        data.provinces[0].locations[0].risk_index = 11;
        assert!(data.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_base_price() {
        let mut data = tiny();
        data.plans.home[0].base_price = 0;
        let err = data.validate().unwrap_err();
        assert!(err.to_string().contains("zero base price"), "{err}");
    }

    #[test]
    fn validate_rejects_duplicate_plan_value_within_catalog() {
        let mut data = tiny();
        let dup = data.plans.home[0].clone();
        data.plans.home.push(dup);
        let err = data.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate CASA plan value 'basico'"), "{err}");
    }

    #[test]
    fn same_plan_value_in_two_catalogs_is_allowed() {
        let mut data = tiny();
        let shared = data.plans.home[0].clone();
        data.plans.life.push(shared);
        data.validate().unwrap();
    }

    #[test]
    fn validate_rejects_duplicate_province_id() {
        let mut data = tiny();
        let dup = data.provinces[0].clone();
        data.provinces.push(dup);
        assert!(matches!(data.validate(), Err(ReferenceDataError::Validation(_))));
    }

    #[test]
    fn from_json_str_reports_parse_errors() {
        let err = ReferenceData::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ReferenceDataError::Parse(_)));
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reference.json");
        std::fs::write(&path, serde_json::to_string(&tiny()).unwrap()).unwrap();
        let data = ReferenceData::from_path(&path).unwrap();
        assert_eq!(data.risk_index_of("Rough"), 10);

        let missing = ReferenceData::from_path(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, ReferenceDataError::Io { .. }));
    }
}
