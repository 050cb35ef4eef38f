use proj_sys::{PJ, PJ_CONTEXT};

/// The interface taxonomy of the referencing object model.
///
/// Wrappers always carry the most specific kind the engine reports, probing
/// happens once when the wrapper is built. Some kinds (identifiers, units,
/// axes, parameters, operation methods) cross the engine interface by value
/// and never back a wrapper; they appear here so factories and lookups can
/// name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Any,
    Identifier,
    UnitOfMeasure,
    Axis,
    Parameter,
    OperationMethod,
    CoordinateSystem,
    CartesianCs,
    SphericalCs,
    EllipsoidalCs,
    VerticalCs,
    TemporalCs,
    Ellipsoid,
    PrimeMeridian,
    Datum,
    DatumEnsemble,
    GeodeticReferenceFrame,
    VerticalReferenceFrame,
    TemporalDatum,
    EngineeringDatum,
    ParametricDatum,
    Crs,
    GeodeticCrs,
    GeographicCrs,
    GeocentricCrs,
    ProjectedCrs,
    VerticalCrs,
    TemporalCrs,
    EngineeringCrs,
    CompoundCrs,
    BoundCrs,
    CoordinateOperation,
    Conversion,
    Transformation,
    ConcatenatedOperation,
}

impl ObjectType {
    pub fn is_crs(self) -> bool {
        matches!(
            self,
            ObjectType::Crs
                | ObjectType::GeodeticCrs
                | ObjectType::GeographicCrs
                | ObjectType::GeocentricCrs
                | ObjectType::ProjectedCrs
                | ObjectType::VerticalCrs
                | ObjectType::TemporalCrs
                | ObjectType::EngineeringCrs
                | ObjectType::CompoundCrs
                | ObjectType::BoundCrs
        )
    }

    pub fn is_coordinate_system(self) -> bool {
        matches!(
            self,
            ObjectType::CoordinateSystem
                | ObjectType::CartesianCs
                | ObjectType::SphericalCs
                | ObjectType::EllipsoidalCs
                | ObjectType::VerticalCs
                | ObjectType::TemporalCs
        )
    }

    pub fn is_datum(self) -> bool {
        matches!(
            self,
            ObjectType::Datum
                | ObjectType::DatumEnsemble
                | ObjectType::GeodeticReferenceFrame
                | ObjectType::VerticalReferenceFrame
                | ObjectType::TemporalDatum
                | ObjectType::EngineeringDatum
                | ObjectType::ParametricDatum
        )
    }

    pub fn is_operation(self) -> bool {
        matches!(
            self,
            ObjectType::CoordinateOperation
                | ObjectType::Conversion
                | ObjectType::Transformation
                | ObjectType::ConcatenatedOperation
        )
    }

    /// Kinds that have no native object behind them in the engine interface.
    pub fn is_value_kind(self) -> bool {
        matches!(
            self,
            ObjectType::Identifier
                | ObjectType::UnitOfMeasure
                | ObjectType::Axis
                | ObjectType::Parameter
                | ObjectType::OperationMethod
        )
    }

    fn from_engine_tag(tag: proj_sys::PJ_TYPE) -> Option<ObjectType> {
        use proj_sys::*;
        Some(match tag {
            PJ_TYPE_PJ_TYPE_ELLIPSOID => ObjectType::Ellipsoid,
            PJ_TYPE_PJ_TYPE_PRIME_MERIDIAN => ObjectType::PrimeMeridian,
            PJ_TYPE_PJ_TYPE_GEODETIC_REFERENCE_FRAME | PJ_TYPE_PJ_TYPE_DYNAMIC_GEODETIC_REFERENCE_FRAME => {
                ObjectType::GeodeticReferenceFrame
            }
            PJ_TYPE_PJ_TYPE_VERTICAL_REFERENCE_FRAME | PJ_TYPE_PJ_TYPE_DYNAMIC_VERTICAL_REFERENCE_FRAME => {
                ObjectType::VerticalReferenceFrame
            }
            PJ_TYPE_PJ_TYPE_DATUM_ENSEMBLE => ObjectType::DatumEnsemble,
            PJ_TYPE_PJ_TYPE_TEMPORAL_DATUM => ObjectType::TemporalDatum,
            PJ_TYPE_PJ_TYPE_ENGINEERING_DATUM => ObjectType::EngineeringDatum,
            PJ_TYPE_PJ_TYPE_PARAMETRIC_DATUM => ObjectType::ParametricDatum,
            PJ_TYPE_PJ_TYPE_CRS | PJ_TYPE_PJ_TYPE_OTHER_CRS => ObjectType::Crs,
            PJ_TYPE_PJ_TYPE_GEODETIC_CRS => ObjectType::GeodeticCrs,
            PJ_TYPE_PJ_TYPE_GEOCENTRIC_CRS => ObjectType::GeocentricCrs,
            PJ_TYPE_PJ_TYPE_GEOGRAPHIC_CRS | PJ_TYPE_PJ_TYPE_GEOGRAPHIC_2D_CRS | PJ_TYPE_PJ_TYPE_GEOGRAPHIC_3D_CRS => {
                ObjectType::GeographicCrs
            }
            PJ_TYPE_PJ_TYPE_VERTICAL_CRS => ObjectType::VerticalCrs,
            PJ_TYPE_PJ_TYPE_PROJECTED_CRS => ObjectType::ProjectedCrs,
            PJ_TYPE_PJ_TYPE_COMPOUND_CRS => ObjectType::CompoundCrs,
            PJ_TYPE_PJ_TYPE_TEMPORAL_CRS => ObjectType::TemporalCrs,
            PJ_TYPE_PJ_TYPE_ENGINEERING_CRS => ObjectType::EngineeringCrs,
            PJ_TYPE_PJ_TYPE_BOUND_CRS => ObjectType::BoundCrs,
            PJ_TYPE_PJ_TYPE_CONVERSION => ObjectType::Conversion,
            PJ_TYPE_PJ_TYPE_TRANSFORMATION => ObjectType::Transformation,
            PJ_TYPE_PJ_TYPE_CONCATENATED_OPERATION => ObjectType::ConcatenatedOperation,
            PJ_TYPE_PJ_TYPE_OTHER_COORDINATE_OPERATION => ObjectType::CoordinateOperation,
            _ => return None,
        })
    }

    fn from_cs_tag(tag: proj_sys::PJ_COORDINATE_SYSTEM_TYPE) -> Option<ObjectType> {
        use proj_sys::*;
        Some(match tag {
            PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_CARTESIAN => ObjectType::CartesianCs,
            PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_ELLIPSOIDAL => ObjectType::EllipsoidalCs,
            PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_VERTICAL => ObjectType::VerticalCs,
            PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_SPHERICAL => ObjectType::SphericalCs,
            PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_DATETIMETEMPORAL
            | PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_TEMPORALCOUNT
            | PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_TEMPORALMEASURE => ObjectType::TemporalCs,
            PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_ORDINAL | PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_PARAMETRIC => {
                ObjectType::CoordinateSystem
            }
            _ => return None,
        })
    }
}

/// Resolves the most specific runtime kind of a native object.
///
/// The engine's type tag covers everything except coordinate systems, which
/// need their own probe. Objects the engine cannot classify keep the caller's
/// declared kind.
pub(crate) fn refine(ctx: *mut PJ_CONTEXT, ptr: *mut PJ, declared: ObjectType) -> ObjectType {
    let tag = unsafe { proj_sys::proj_get_type(ptr) };
    if let Some(specific) = ObjectType::from_engine_tag(tag) {
        return specific;
    }

    if declared == ObjectType::Any || declared.is_coordinate_system() {
        let cs_tag = unsafe { proj_sys::proj_cs_get_type(ctx, ptr) };
        if let Some(specific) = ObjectType::from_cs_tag(cs_tag) {
            return specific;
        }
    }

    declared
}
