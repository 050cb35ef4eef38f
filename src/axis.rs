use crate::UnitOfMeasure;

/// A coordinate system axis, reported by value through the engine interface.
///
/// The direction is the engine's lowercase direction string ("north", "east",
/// "up", "future", ...). It is kept verbatim so it can round trip into the
/// object factory.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub name: String,
    pub abbreviation: String,
    pub direction: String,
    pub unit: UnitOfMeasure,
}

impl Axis {
    pub fn new(name: &str, abbreviation: &str, direction: &str, unit: UnitOfMeasure) -> Self {
        Axis {
            name: String::from(name),
            abbreviation: String::from(abbreviation),
            direction: String::from(direction),
            unit,
        }
    }
}
