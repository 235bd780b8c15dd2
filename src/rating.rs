//! Deterministic multiplicative rating for the four insurance lines.
//!
//! Every rating is `base price × factor₁ × … × factorₙ`, multiplied left to right,
//! rounded to whole currency units. Rating never fails: unknown plans, unknown
//! locations and unreadable numeric answers fall back to documented defaults.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::applicant::{
    AutoApplicant, HomeApplicant, LifeApplicant, MotorcycleApplicant, QuoteRequest, int_or,
    parse_int,
};
use crate::reference::{DEFAULT_RISK_INDEX, ReferenceData};
use crate::types::{Category, Year};

/// Twelve monthly payments make one annual payment, before discount.
pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeFactors {
    pub age: f64,
    pub location: f64,
    pub property: f64,
    pub coverage: f64,
    pub square_meters: f64,
    pub construction_year: f64,
    pub alarm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoFactors {
    pub driver_age: f64,
    pub location: f64,
    pub vehicle_type: f64,
    pub coverage: f64,
    pub vehicle_age: f64,
    pub use_type: f64,
    pub anti_theft: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotorcycleFactors {
    pub experience: f64,
    pub location: f64,
    pub motorcycle_type: f64,
    pub coverage: f64,
    pub cc: f64,
    pub motorcycle_age: f64,
    pub anti_theft: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeFactors {
    pub age: f64,
    pub medical_conditions: f64,
    pub smoker: f64,
    pub coverage: f64,
    pub beneficiaries: f64,
}

/// Per-category factor breakdown of one rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum Factors {
    #[serde(rename = "CASA")]
    Home(HomeFactors),
    #[serde(rename = "AUTO")]
    Auto(AutoFactors),
    #[serde(rename = "MOTO")]
    Motorcycle(MotorcycleFactors),
    #[serde(rename = "VIDA")]
    Life(LifeFactors),
}

/// Category-agnostic factor table used by generic displays. Slots carry different
/// meanings per category; see [`Factors::generic`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationFactors {
    pub base_price: u64,
    pub age_factor: f64,
    pub location_factor: f64,
    pub property_factor: f64,
    pub coverage_factor: f64,
    pub square_meters_factor: f64,
    pub construction_year_factor: f64,
    pub has_alarm_factor: f64,
}

impl Factors {
    pub fn category(&self) -> Category {
        match self {
            Factors::Home(_) => Category::Home,
            Factors::Auto(_) => Category::Auto,
            Factors::Motorcycle(_) => Category::Motorcycle,
            Factors::Life(_) => Category::Life,
        }
    }

    /// Unrounded price: `base` times every factor, in the category's rating order.
    pub fn apply(&self, base: f64) -> f64 {
        match self {
            Factors::Home(f) => {
                base * f.age
                    * f.location
                    * f.property
                    * f.coverage
                    * f.square_meters
                    * f.construction_year
                    * f.alarm
            }
            Factors::Auto(f) => {
                base * f.driver_age
                    * f.location
                    * f.vehicle_type
                    * f.coverage
                    * f.vehicle_age
                    * f.use_type
                    * f.anti_theft
            }
            Factors::Motorcycle(f) => {
                base * f.experience
                    * f.location
                    * f.motorcycle_type
                    * f.coverage
                    * f.cc
                    * f.motorcycle_age
                    * f.anti_theft
            }
            Factors::Life(f) => {
                base * f.age * f.medical_conditions * f.smoker * f.coverage * f.beneficiaries
            }
        }
    }

    /// Project into the shared generic table.
    ///
    /// Auto: property = vehicle type, square meters = vehicle age, construction
    /// year = use type, alarm = anti-theft. Motorcycle: age = experience, property
    /// = type, square meters = cc, construction year = motorcycle age, alarm =
    /// anti-theft. Life: location = medical conditions, property = smoker, square
    /// meters = beneficiaries; construction year and alarm are neutral.
    pub fn generic(&self, base_price: u64) -> CalculationFactors {
        match *self {
            Factors::Home(f) => CalculationFactors {
                base_price,
                age_factor: f.age,
                location_factor: f.location,
                property_factor: f.property,
                coverage_factor: f.coverage,
                square_meters_factor: f.square_meters,
                construction_year_factor: f.construction_year,
                has_alarm_factor: f.alarm,
            },
            Factors::Auto(f) => CalculationFactors {
                base_price,
                age_factor: f.driver_age,
                location_factor: f.location,
                property_factor: f.vehicle_type,
                coverage_factor: f.coverage,
                square_meters_factor: f.vehicle_age,
                construction_year_factor: f.use_type,
                has_alarm_factor: f.anti_theft,
            },
            Factors::Motorcycle(f) => CalculationFactors {
                base_price,
                age_factor: f.experience,
                location_factor: f.location,
                property_factor: f.motorcycle_type,
                coverage_factor: f.coverage,
                square_meters_factor: f.cc,
                construction_year_factor: f.motorcycle_age,
                has_alarm_factor: f.anti_theft,
            },
            Factors::Life(f) => CalculationFactors {
                base_price,
                age_factor: f.age,
                location_factor: f.medical_conditions,
                property_factor: f.smoker,
                coverage_factor: f.coverage,
                square_meters_factor: f.beneficiaries,
                construction_year_factor: 1.0,
                has_alarm_factor: 1.0,
            },
        }
    }
}

/// Priced outcome of one rating call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub base_price: u64,
    pub final_price: u64,
    pub factors: Factors,
    /// Always equal to `final_price`.
    pub monthly_price: u64,
    /// `final_price × 12 × discount`, rounded.
    pub annual_price: u64,
}

impl CalculationResult {
    fn price(base_price: u64, factors: Factors) -> Self {
        let final_price = factors.apply(base_price as f64).round() as u64;
        let discount = factors.category().annual_discount_rate();
        let annual_price = (final_price as f64 * MONTHS_PER_YEAR * discount).round() as u64;
        CalculationResult {
            base_price,
            final_price,
            factors,
            monthly_price: final_price,
            annual_price,
        }
    }

    pub fn category(&self) -> Category {
        self.factors.category()
    }

    pub fn generic_factors(&self) -> CalculationFactors {
        self.factors.generic(self.base_price)
    }
}

// ── Factor bands ─────────────────────────────────────────────────────────────
// `None` ages come from unparseable answers and take the last band.

pub fn location_factor(risk_index: u8) -> f64 {
    f64::from(risk_index) * 0.1 + 0.5
}

pub fn home_age_factor(age: Option<i64>) -> f64 {
    match age {
        Some(a) if a < 25 => 1.3,
        Some(a) if a < 40 => 1.0,
        Some(a) if a < 60 => 0.9,
        _ => 1.2,
    }
}

pub fn house_type_factor(house_type: Option<&str>) -> f64 {
    match house_type {
        Some("casa") => 1.0,
        Some("departamento") => 0.8,
        Some("ph") => 0.9,
        Some("casa_quinta") => 1.3,
        _ => 1.0,
    }
}

pub fn home_coverage_factor(plan: &str) -> f64 {
    match plan {
        "basico" => 0.7,
        "estandar" => 0.9,
        "full" => 1.2,
        _ => 1.5,
    }
}

pub fn square_meters_factor(square_meters: i64) -> f64 {
    match square_meters {
        m if m < 50 => 0.8,
        m if m < 100 => 1.0,
        m if m < 200 => 1.3,
        _ => 1.6,
    }
}

pub fn property_age_factor(property_age: i64) -> f64 {
    match property_age {
        a if a < 10 => 0.9,
        a if a < 20 => 1.0,
        a if a < 30 => 1.2,
        _ => 1.4,
    }
}

pub fn driver_age_factor(age: Option<i64>) -> f64 {
    match age {
        Some(a) if a < 25 => 1.5,
        Some(a) if a < 30 => 1.2,
        Some(a) if a < 50 => 1.0,
        _ => 1.3,
    }
}

pub fn vehicle_type_factor(vehicle_type: Option<&str>) -> f64 {
    match vehicle_type {
        Some("auto") => 1.0,
        Some("suv") => 1.2,
        Some("camioneta") => 1.3,
        Some("deportivo") => 1.8,
        Some("utilitario") => 1.1,
        _ => 1.0,
    }
}

/// Shared by cars and motorcycles: brand-new and old vehicles cost more.
pub fn vehicle_age_factor(vehicle_age: i64) -> f64 {
    match vehicle_age {
        a if a < 3 => 1.2,
        a if a < 5 => 1.0,
        a if a < 10 => 0.9,
        _ => 1.1,
    }
}

pub fn auto_coverage_factor(plan: &str) -> f64 {
    match plan {
        "responsabilidad_civil" => 0.6,
        "todo_riesgo_terceros" => 1.0,
        "todo_riesgo_completo" => 1.4,
        _ => 1.8,
    }
}

pub fn use_type_factor(use_type: Option<&str>) -> f64 {
    match use_type {
        Some("particular") => 1.0,
        Some("profesional") => 1.3,
        _ => 1.5,
    }
}

pub fn experience_factor(years: i64) -> f64 {
    match years {
        y if y < 2 => 1.5,
        y if y < 5 => 1.2,
        y if y < 10 => 1.0,
        _ => 0.9,
    }
}

pub fn cc_factor(cc: i64) -> f64 {
    match cc {
        c if c < 150 => 0.8,
        c if c < 300 => 1.0,
        c if c < 600 => 1.3,
        _ => 1.8,
    }
}

pub fn motorcycle_type_factor(motorcycle_type: Option<&str>) -> f64 {
    match motorcycle_type {
        Some("scooter") => 0.9,
        Some("calle") => 1.0,
        Some("deportiva") => 1.4,
        Some("custom") => 1.2,
        _ => 1.0,
    }
}

pub fn motorcycle_coverage_factor(plan: &str) -> f64 {
    match plan {
        "responsabilidad_civil_moto" => 0.6,
        "todo_riesgo_moto" => 1.0,
        _ => 1.4,
    }
}

pub fn life_age_factor(age: Option<i64>) -> f64 {
    match age {
        Some(a) if a < 30 => 0.8,
        Some(a) if a < 40 => 1.0,
        Some(a) if a < 50 => 1.3,
        Some(a) if a < 60 => 1.8,
        _ => 2.5,
    }
}

pub fn beneficiaries_factor(beneficiaries: i64) -> f64 {
    match beneficiaries {
        1 => 1.0,
        2 => 1.1,
        3 => 1.2,
        _ => 1.3,
    }
}

pub fn life_coverage_factor(plan: &str) -> f64 {
    match plan {
        "basico_vida" => 0.7,
        "estandar_vida" => 1.0,
        "completo_vida" => 1.5,
        _ => 2.0,
    }
}

fn flag(set: bool, when_set: f64) -> f64 {
    if set { when_set } else { 1.0 }
}

pub fn current_year() -> Year {
    Year(chrono::Local::now().year())
}

/// Prices applicant records against a borrowed, read-only [`ReferenceData`].
///
/// The rating year drives asset-age factors; pin it with [`RatingEngine::for_year`]
/// for reproducible output.
#[derive(Debug, Clone, Copy)]
pub struct RatingEngine<'a> {
    reference: &'a ReferenceData,
    year: Year,
}

impl<'a> RatingEngine<'a> {
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self::for_year(reference, current_year())
    }

    pub fn for_year(reference: &'a ReferenceData, year: Year) -> Self {
        RatingEngine { reference, year }
    }

    pub fn year(&self) -> Year {
        self.year
    }

    pub fn rate(&self, request: &QuoteRequest) -> CalculationResult {
        match request {
            QuoteRequest::Home(a) => self.rate_home(a),
            QuoteRequest::Auto(a) => self.rate_auto(a),
            QuoteRequest::Motorcycle(a) => self.rate_motorcycle(a),
            QuoteRequest::Life(a) => self.rate_life(a),
        }
    }

    pub fn rate_home(&self, input: &HomeApplicant) -> CalculationResult {
        let plan = input.applicant.coverage_plan.as_str();
        let base_price = self.base_price(Category::Home, plan);
        let square_meters = int_or(input.square_meters.as_deref(), 0, "squareMeters");
        let built = int_or(input.construction_year.as_deref(), 2000, "constructionYear");

        let factors = HomeFactors {
            age: home_age_factor(parse_int(&input.applicant.age)),
            location: self.location_factor(&input.applicant.location),
            property: house_type_factor(input.house_type.as_deref()),
            coverage: home_coverage_factor(plan),
            square_meters: square_meters_factor(square_meters),
            construction_year: property_age_factor(self.year.since(built)),
            alarm: flag(input.has_alarm, 0.8),
        };
        self.finish(base_price, Factors::Home(factors))
    }

    pub fn rate_auto(&self, input: &AutoApplicant) -> CalculationResult {
        let plan = input.applicant.coverage_plan.as_str();
        let base_price = self.base_price(Category::Auto, plan);
        // A blank driver age means the applicant drives.
        let driver_age = match input.driver_age.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_int(raw),
            _ => parse_int(&input.applicant.age),
        };
        let car_year = int_or(input.car_year.as_deref(), 2020, "carYear");

        let factors = AutoFactors {
            driver_age: driver_age_factor(driver_age),
            location: self.location_factor(&input.applicant.location),
            vehicle_type: vehicle_type_factor(input.vehicle_type.as_deref()),
            coverage: auto_coverage_factor(plan),
            vehicle_age: vehicle_age_factor(self.year.since(car_year)),
            use_type: use_type_factor(input.use_type.as_deref()),
            anti_theft: flag(input.has_anti_theft, 0.9),
        };
        self.finish(base_price, Factors::Auto(factors))
    }

    pub fn rate_motorcycle(&self, input: &MotorcycleApplicant) -> CalculationResult {
        let plan = input.applicant.coverage_plan.as_str();
        let base_price = self.base_price(Category::Motorcycle, plan);
        let experience = int_or(input.driver_experience.as_deref(), 1, "driverExperience");
        let cc = int_or(input.motorcycle_cc.as_deref(), 150, "motorcycleCC");
        let model_year = int_or(input.motorcycle_year.as_deref(), 2020, "motorcycleYear");

        let factors = MotorcycleFactors {
            experience: experience_factor(experience),
            location: self.location_factor(&input.applicant.location),
            motorcycle_type: motorcycle_type_factor(input.motorcycle_type.as_deref()),
            coverage: motorcycle_coverage_factor(plan),
            cc: cc_factor(cc),
            motorcycle_age: vehicle_age_factor(self.year.since(model_year)),
            anti_theft: flag(input.has_motorcycle_anti_theft, 0.8),
        };
        self.finish(base_price, Factors::Motorcycle(factors))
    }

    pub fn rate_life(&self, input: &LifeApplicant) -> CalculationResult {
        let plan = input.applicant.coverage_plan.as_str();
        let base_price = self.base_price(Category::Life, plan);
        let beneficiaries = int_or(input.beneficiaries.as_deref(), 1, "beneficiaries");

        let factors = LifeFactors {
            age: life_age_factor(parse_int(&input.applicant.age)),
            medical_conditions: flag(input.has_medical_conditions, 1.5),
            smoker: flag(input.smoker, 1.8),
            coverage: life_coverage_factor(plan),
            beneficiaries: beneficiaries_factor(beneficiaries),
        };
        self.finish(base_price, Factors::Life(factors))
    }

    fn base_price(&self, category: Category, plan: &str) -> u64 {
        match self.reference.plan(category, plan) {
            Some(p) => p.base_price,
            None => {
                let fallback = category.default_base_price();
                tracing::debug!(%category, plan, fallback, "unknown plan; using default base price");
                fallback
            }
        }
    }

    fn location_factor(&self, name: &str) -> f64 {
        let risk_index = match self.reference.find_location(name) {
            Some(location) => location.risk_index,
            None => {
                tracing::debug!(location = name, "unknown location; using default risk index");
                DEFAULT_RISK_INDEX
            }
        };
        location_factor(risk_index)
    }

    fn finish(&self, base_price: u64, factors: Factors) -> CalculationResult {
        let result = CalculationResult::price(base_price, factors);
        tracing::debug!(
            category = %result.category(),
            base_price,
            monthly = result.monthly_price,
            annual = result.annual_price,
            "rated quote"
        );
        result
    }
}
