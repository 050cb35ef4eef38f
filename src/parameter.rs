use crate::{Error, Result, UnitOfMeasure};

/// The value kinds an operation parameter can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Measure,
    Integer,
    Boolean,
    String,
    Filename,
}

/// A parameter value of a coordinate operation.
///
/// The engine interface reports parameters by value: either a number with its
/// unit or a text. Accessors check the declared kind before extracting, a
/// mismatch names the parameter in the error instead of coercing.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub authority: Option<String>,
    pub code: Option<String>,
    pub kind: ParameterKind,
    /// NaN when the kind is textual.
    pub numeric_value: f64,
    pub text_value: Option<String>,
    pub unit: Option<UnitOfMeasure>,
}

impl Parameter {
    fn require(&self, requested: ParameterKind) -> Result<()> {
        if self.kind == requested {
            Ok(())
        } else {
            Err(Error::InvalidParameterType {
                name: self.name.clone(),
                requested,
            })
        }
    }

    pub fn value(&self) -> Result<f64> {
        self.require(ParameterKind::Measure)?;
        Ok(self.numeric_value)
    }

    pub fn int_value(&self) -> Result<i32> {
        self.require(ParameterKind::Integer)?;
        Ok(self.numeric_value as i32)
    }

    pub fn bool_value(&self) -> Result<bool> {
        self.require(ParameterKind::Boolean)?;
        Ok(self.numeric_value != 0.0)
    }

    pub fn string_value(&self) -> Result<&str> {
        self.require(ParameterKind::String)?;
        self.text_value.as_deref().ok_or(Error::NullHandle)
    }

    pub fn file_value(&self) -> Result<&str> {
        self.require(ParameterKind::Filename)?;
        self.text_value.as_deref().ok_or(Error::NullHandle)
    }
}

/// The method of a coordinate operation, reported by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationMethod {
    pub name: String,
    pub authority: Option<String>,
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measure(name: &str, value: f64) -> Parameter {
        Parameter {
            name: String::from(name),
            authority: Some(String::from("EPSG")),
            code: None,
            kind: ParameterKind::Measure,
            numeric_value: value,
            text_value: None,
            unit: UnitOfMeasure::predefined(crate::units::DEGREE),
        }
    }

    #[test]
    fn kind_checked_access() {
        let latitude = measure("Latitude of natural origin", 45.0);
        assert_eq!(latitude.value().expect("measure kind"), 45.0);

        match latitude.int_value() {
            Err(Error::InvalidParameterType { name, requested }) => {
                assert_eq!(name, "Latitude of natural origin");
                assert_eq!(requested, ParameterKind::Integer);
            }
            other => panic!("expected a parameter type error, got {other:?}"),
        }
    }

    #[test]
    fn textual_parameter() {
        let grid = Parameter {
            name: String::from("Geoid (height correction) model file"),
            authority: None,
            code: None,
            kind: ParameterKind::String,
            numeric_value: f64::NAN,
            text_value: Some(String::from("egm96_15.gtx")),
            unit: None,
        };

        assert_eq!(grid.string_value().expect("string kind"), "egm96_15.gtx");
        assert!(matches!(grid.value(), Err(Error::InvalidParameterType { .. })));
        assert!(matches!(grid.file_value(), Err(Error::InvalidParameterType { .. })));
    }
}
