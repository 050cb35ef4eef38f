use std::sync::Mutex;

use crate::projinterop::experimental;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitType {
    Angular,
    Linear,
    Scale,
    Time,
    Parametric,
    Unknown,
}

impl UnitType {
    /// Maps the category strings of the engine's unit database.
    pub(crate) fn from_category(category: &str) -> UnitType {
        match category {
            "angular" => UnitType::Angular,
            "linear" => UnitType::Linear,
            "scale" => UnitType::Scale,
            "time" => UnitType::Time,
            "parametric" => UnitType::Parametric,
            _ => UnitType::Unknown,
        }
    }

    pub(crate) fn engine_unit_type(self) -> Option<experimental::PJ_UNIT_TYPE> {
        match self {
            UnitType::Angular => Some(experimental::PJ_UT_ANGULAR),
            UnitType::Linear => Some(experimental::PJ_UT_LINEAR),
            UnitType::Scale => Some(experimental::PJ_UT_SCALE),
            UnitType::Time => Some(experimental::PJ_UT_TIME),
            UnitType::Parametric => Some(experimental::PJ_UT_PARAMETRIC),
            UnitType::Unknown => None,
        }
    }
}

/// A unit of measure, reported by value through the engine interface.
///
/// The identifiers 0..=9 are the predefined units, user defined units get
/// identifiers from 10 upward through [`UnitOfMeasure::user_defined`].
#[derive(Debug, Clone, PartialEq)]
pub struct UnitOfMeasure {
    pub identifier: i32,
    pub name: String,
    /// Factor to the system unit of its type (radian, metre, unity or second).
    pub to_base: f64,
    pub unit_type: UnitType,
}

pub const SCALE_UNITY: i32 = 0;
pub const PARTS_PER_MILLION: i32 = 1;
pub const METRE: i32 = 2;
pub const RADIAN: i32 = 3;
pub const MICRORADIAN: i32 = 4;
pub const DEGREE: i32 = 5;
pub const ARC_SECOND: i32 = 6;
pub const GRAD: i32 = 7;
pub const SECOND: i32 = 8;
pub const YEAR: i32 = 9;

const FIRST_USER_IDENTIFIER: i32 = 10;

static USER_UNITS: Mutex<Vec<UnitOfMeasure>> = Mutex::new(Vec::new());

impl UnitOfMeasure {
    fn new(identifier: i32, name: &str, to_base: f64, unit_type: UnitType) -> Self {
        UnitOfMeasure {
            identifier,
            name: String::from(name),
            to_base,
            unit_type,
        }
    }

    /// The unit behind one of the predefined identifiers.
    pub fn predefined(identifier: i32) -> Option<UnitOfMeasure> {
        // conversion factors as the engine defines them
        Some(match identifier {
            SCALE_UNITY => Self::new(identifier, "unity", 1.0, UnitType::Scale),
            PARTS_PER_MILLION => Self::new(identifier, "parts per million", 1e-6, UnitType::Scale),
            METRE => Self::new(identifier, "metre", 1.0, UnitType::Linear),
            RADIAN => Self::new(identifier, "radian", 1.0, UnitType::Angular),
            MICRORADIAN => Self::new(identifier, "microradian", 1e-6, UnitType::Angular),
            DEGREE => Self::new(identifier, "degree", 0.017453292519943295, UnitType::Angular),
            ARC_SECOND => Self::new(identifier, "arc-second", 4.84813681109536e-6, UnitType::Angular),
            GRAD => Self::new(identifier, "grad", 0.015707963267948967, UnitType::Angular),
            SECOND => Self::new(identifier, "second", 1.0, UnitType::Time),
            YEAR => Self::new(identifier, "year", 31556925.445, UnitType::Time),
            _ => return None,
        })
    }

    /// Interns a user defined unit and returns it with a stable identifier.
    ///
    /// Asking twice for the same type and factor yields the same identifier.
    pub fn user_defined(unit_type: UnitType, to_base: f64) -> UnitOfMeasure {
        let mut registry = USER_UNITS.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(existing) = registry
            .iter()
            .find(|unit| unit.unit_type == unit_type && unit.to_base == to_base)
        {
            return existing.clone();
        }

        let identifier = FIRST_USER_IDENTIFIER + registry.len() as i32;
        let unit = UnitOfMeasure {
            identifier,
            name: format!("user-defined unit ({to_base})"),
            to_base,
            unit_type,
        };
        registry.push(unit.clone());
        unit
    }

    /// Resolves a unit identifier, predefined or user defined.
    pub fn resolve(identifier: i32) -> Option<UnitOfMeasure> {
        if identifier < FIRST_USER_IDENTIFIER {
            return Self::predefined(identifier);
        }

        let registry = USER_UNITS.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        registry.iter().find(|unit| unit.identifier == identifier).cloned()
    }

    /// Builds a unit from what the engine reports about it.
    ///
    /// Database conversion factors carry fewer digits than the predefined
    /// constants, the identifier match allows for that. Axis units come
    /// without a category string, those match predefined units by name.
    pub(crate) fn from_engine(name: Option<String>, to_base: f64, unit_type: UnitType) -> UnitOfMeasure {
        let matched = (0..FIRST_USER_IDENTIFIER).filter_map(UnitOfMeasure::predefined).find(|unit| {
            let type_fits = match unit_type {
                UnitType::Unknown => name.as_deref() == Some(unit.name.as_str()),
                _ => unit.unit_type == unit_type,
            };
            type_fits && close_factor(unit.to_base, to_base)
        });

        match matched {
            Some(unit) => UnitOfMeasure {
                identifier: unit.identifier,
                name: name.unwrap_or(unit.name),
                to_base,
                unit_type: unit.unit_type,
            },
            None => UnitOfMeasure {
                identifier: -1,
                name: name.unwrap_or_else(|| String::from("unknown")),
                to_base,
                unit_type,
            },
        }
    }
}

fn close_factor(a: f64, b: f64) -> bool {
    (a - b).abs() <= a.abs() * 1e-10
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn predefined_units() {
        let degree = UnitOfMeasure::predefined(DEGREE).expect("predefined");
        assert_eq!(degree.name, "degree");
        assert_eq!(degree.unit_type, UnitType::Angular);
        assert_relative_eq!(degree.to_base, std::f64::consts::PI / 180.0, epsilon = 1e-15);

        let year = UnitOfMeasure::predefined(YEAR).expect("predefined");
        assert_eq!(year.unit_type, UnitType::Time);
        assert!(UnitOfMeasure::predefined(99).is_none());
    }

    #[test]
    fn user_defined_units_are_interned() {
        let first = UnitOfMeasure::user_defined(UnitType::Linear, 0.3048);
        let second = UnitOfMeasure::user_defined(UnitType::Linear, 0.3048);
        assert_eq!(first.identifier, second.identifier);
        assert!(first.identifier >= 10);

        let resolved = UnitOfMeasure::resolve(first.identifier).expect("registered");
        assert_eq!(resolved.to_base, 0.3048);

        let other = UnitOfMeasure::user_defined(UnitType::Angular, 0.3048);
        assert_ne!(other.identifier, first.identifier);
    }

    #[test]
    fn category_mapping() {
        assert_eq!(UnitType::from_category("linear"), UnitType::Linear);
        assert_eq!(UnitType::from_category("angular"), UnitType::Angular);
        assert_eq!(UnitType::from_category("linear_per_time"), UnitType::Unknown);
    }

    #[test]
    fn engine_units_match_predefined_identifiers() {
        // factor of EPSG unit 9122, stored with fewer digits than pi / 180
        let degree = UnitOfMeasure::from_engine(Some(String::from("degree")), 0.0174532925199433, UnitType::Angular);
        assert_eq!(degree.identifier, DEGREE);

        let chain = UnitOfMeasure::from_engine(Some(String::from("chain")), 20.1168, UnitType::Linear);
        assert_eq!(chain.identifier, -1);
        assert_eq!(chain.name, "chain");
    }

    #[test]
    fn uncategorized_units_match_by_name() {
        let degree = UnitOfMeasure::from_engine(Some(String::from("degree")), 0.0174532925199433, UnitType::Unknown);
        assert_eq!(degree.identifier, DEGREE);
        assert_eq!(degree.unit_type, UnitType::Angular);

        let foot = UnitOfMeasure::from_engine(Some(String::from("US survey foot")), 0.3048006, UnitType::Unknown);
        assert_eq!(foot.identifier, -1);
        assert_eq!(foot.unit_type, UnitType::Unknown);
    }
}
