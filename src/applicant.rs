//! Applicant input records as submitted by the quote forms.
//!
//! Numeric answers arrive as strings and are only interpreted at rating time,
//! so a record always round-trips exactly what the applicant typed.

use serde::{Deserialize, Serialize};

use crate::types::Category;

/// Fields shared by every category's form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Applicant {
    pub full_name: String,
    pub age: String,
    pub email: String,
    pub phone: String,
    /// Location name as listed in the reference hierarchy.
    pub location: String,
    /// Plan `value` from the category's catalog.
    pub coverage_plan: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeApplicant {
    #[serde(flatten)]
    pub applicant: Applicant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub square_meters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub construction_year: Option<String>,
    pub has_alarm: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoApplicant {
    #[serde(flatten)]
    pub applicant: Applicant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    pub has_anti_theft: bool,
    /// Main driver's age when different from the applicant's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_age: Option<String>,
    /// `particular` or `profesional`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MotorcycleApplicant {
    #[serde(flatten)]
    pub applicant: Applicant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motorcycle_type: Option<String>,
    #[serde(rename = "motorcycleCC", skip_serializing_if = "Option::is_none")]
    pub motorcycle_cc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motorcycle_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motorcycle_license_plate: Option<String>,
    pub has_motorcycle_anti_theft: bool,
    /// Years riding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_experience: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifeApplicant {
    #[serde(flatten)]
    pub applicant: Applicant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiaries: Option<String>,
    pub has_medical_conditions: bool,
    pub smoker: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
}

/// One applicant record tagged with its category: `{"type": "CASA", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum QuoteRequest {
    #[serde(rename = "CASA")]
    Home(HomeApplicant),
    #[serde(rename = "AUTO")]
    Auto(AutoApplicant),
    #[serde(rename = "MOTO")]
    Motorcycle(MotorcycleApplicant),
    #[serde(rename = "VIDA")]
    Life(LifeApplicant),
}

impl QuoteRequest {
    pub fn category(&self) -> Category {
        match self {
            QuoteRequest::Home(_) => Category::Home,
            QuoteRequest::Auto(_) => Category::Auto,
            QuoteRequest::Motorcycle(_) => Category::Motorcycle,
            QuoteRequest::Life(_) => Category::Life,
        }
    }

    pub fn applicant(&self) -> &Applicant {
        match self {
            QuoteRequest::Home(a) => &a.applicant,
            QuoteRequest::Auto(a) => &a.applicant,
            QuoteRequest::Motorcycle(a) => &a.applicant,
            QuoteRequest::Life(a) => &a.applicant,
        }
    }
}

/// Lenient integer read of a form answer.
///
/// Skips leading whitespace, accepts one optional sign, then takes the longest
/// run of ASCII digits and ignores the rest (`"42abc"` → 42, `"3.9"` → 3).
/// Returns `None` when no digit follows. Values outside `i64` saturate.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        let d = i64::from(b - b'0');
        value = value.saturating_mul(10).saturating_add(d);
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Parse an optional answer, substituting `default` when it is absent, blank or
/// unparseable. `field` names the answer in the fallback log line.
pub fn int_or(raw: Option<&str>, default: i64, field: &'static str) -> i64 {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => default,
        Some(s) => parse_int(s).unwrap_or_else(|| {
            tracing::debug!(field, raw = s, default, "unparseable numeric answer; using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_int_plain_and_signed() {
        assert_eq!(parse_int("30"), Some(30));
        assert_eq!(parse_int("-4"), Some(-4));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("   12"), Some(12));
    }

    #[test]
    fn parse_int_stops_at_first_non_digit() {
        assert_eq!(parse_int("42abc"), Some(42));
        assert_eq!(parse_int("3.9"), Some(3));
        assert_eq!(parse_int("2015 "), Some(2015));
    }

    #[test]
    fn parse_int_rejects_garbage() {
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int(".5"), None);
    }

    #[test]
    fn parse_int_saturates_instead_of_overflowing() {
        assert_eq!(parse_int("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn int_or_uses_default_for_missing_blank_and_garbage() {
        assert_eq!(int_or(None, 150, "motorcycleCC"), 150);
        assert_eq!(int_or(Some(""), 150, "motorcycleCC"), 150);
        assert_eq!(int_or(Some("   "), 150, "motorcycleCC"), 150);
        assert_eq!(int_or(Some("lots"), 150, "motorcycleCC"), 150);
        assert_eq!(int_or(Some("650cc"), 150, "motorcycleCC"), 650);
    }

    #[test]
    fn home_applicant_reads_camel_case_json() {
        let json = r#"{
            "fullName": "Ana Pérez",
            "age": "30",
            "location": "CABA",
            "coveragePlan": "estandar",
            "houseType": "casa",
            "squareMeters": "80",
            "constructionYear": "2015",
            "hasAlarm": true
        }"#;
        let home: HomeApplicant = serde_json::from_str(json).unwrap();
        assert_eq!(home.applicant.full_name, "Ana Pérez");
        assert_eq!(home.applicant.coverage_plan, "estandar");
        assert_eq!(home.square_meters.as_deref(), Some("80"));
        assert!(home.has_alarm);
        assert_eq!(home.applicant.email, "", "missing strings default to empty");
    }

    #[test]
    fn motorcycle_cc_serializes_with_upper_case_cc() {
        let moto = MotorcycleApplicant {
            motorcycle_cc: Some("250".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&moto).unwrap();
        assert_eq!(value["motorcycleCC"], "250");
    }

    #[test]
    fn quote_request_is_adjacently_tagged() {
        let json = r#"{"type":"VIDA","data":{"age":"45","smoker":true,"beneficiaries":"2","coveragePlan":"estandar_vida"}}"#;
        let req: QuoteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.category(), Category::Life);
        assert_eq!(req.applicant().age, "45");
        match req {
            QuoteRequest::Life(life) => {
                assert!(life.smoker);
                assert!(!life.has_medical_conditions);
                assert_eq!(life.beneficiaries.as_deref(), Some("2"));
            }
            other => panic!("expected Life, got {other:?}"),
        }
    }

    #[test]
    fn quote_request_serializes_type_and_data() {
        let req = QuoteRequest::Auto(AutoApplicant {
            vehicle_type: Some("suv".to_string()),
            ..Default::default()
        });
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["type"], "AUTO");
        assert_eq!(value["data"]["vehicleType"], "suv");
        assert!(value["data"].get("carYear").is_none(), "absent answers are omitted");
    }
}
