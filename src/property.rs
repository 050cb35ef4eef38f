//! Property access on wrapped referencing objects.
//!
//! Every getter funnels through one dispatcher per return shape, keyed by
//! [`Property`]. Values that the engine interface reports by value
//! (identifiers, axes, parameters, units) come back as plain structs, nested
//! objects come back as wrappers built through the regular dispatch protocol.

use std::os::raw::{c_char, c_int};

use proj_sys::{PJ, PJ_CONTEXT};

use crate::axis::Axis;
use crate::handle::RawObject;
use crate::identifiedobject::IdentifiedObject;
use crate::identifier::Identifier;
use crate::objecttype::ObjectType;
use crate::parameter::{OperationMethod, Parameter, ParameterKind};
use crate::projinterop;
use crate::units::{self, UnitOfMeasure, UnitType};
use crate::{Error, Result};

/// The properties of referencing objects, grouped by return shape.
///
/// The discriminant ranges follow the shape grouping: nested objects below
/// 100, vectors in the 100 range, strings in 200, numbers in 300, the extent
/// at 400, integers in 500, booleans in 600 and units in 700.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    // object shaped
    CoordinateSystem = 1,
    Datum = 2,
    DatumEnsemble = 3,
    HorizontalDatum = 4,
    Ellipsoid = 5,
    PrimeMeridian = 6,
    BaseCrs = 7,
    ConvertFromBase = 8,
    GeodeticCrs = 9,
    // vector shaped
    Identifier = 100,
    Axis = 101,
    CrsComponent = 102,
    OperationParameter = 103,
    OperationStep = 104,
    /// Pseudo vector of fixed size two: index 0 is the source CRS, index 1
    /// the target CRS.
    SourceTargetCrs = 105,
    // string shaped
    NameString = 200,
    IdentifierString = 201,
    Codespace = 202,
    Code = 203,
    CitationTitle = 204,
    Remarks = 205,
    Scope = 206,
    CelestialBody = 207,
    // numeric shaped
    SemiMajor = 300,
    SemiMinor = 301,
    InverseFlattening = 302,
    Greenwich = 303,
    PositionalAccuracy = 304,
    // extent shaped
    DomainOfValidity = 400,
    // integer shaped
    GridUseCount = 500,
    // boolean shaped
    HasName = 600,
    IsSphere = 601,
    IvfDefinitive = 602,
    Deprecated = 603,
    IsCrsDerived = 604,
    IsInstantiable = 605,
    HasBallparkTransformation = 606,
    // unit shaped
    MeridianUnit = 700,
    EllipsoidUnit = 701,
}

/// An element of a vector shaped property.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Object(IdentifiedObject),
    Identifier(Identifier),
    Axis(Axis),
    Parameter(Parameter),
}

/// Compound CRS components may themselves be compound, the flattening stops
/// descending at this depth.
const MAX_COMPONENT_NESTING: usize = 10;

impl IdentifiedObject {
    /// A nested object of the receiver, `None` when the relationship is
    /// absent (a CRS backed by a datum ensemble has no plain datum, a root
    /// CRS has no base).
    pub fn object_property(&self, property: Property) -> Result<Option<IdentifiedObject>> {
        let ctx = self.ctx_ptr()?;
        let ptr = self.ptr()?;
        let kind = self.kind();

        let (value, declared) = match property {
            Property::CoordinateSystem => {
                self.check_applicable(property, kind.is_crs())?;
                (
                    unsafe { proj_sys::proj_crs_get_coordinate_system(ctx, ptr) },
                    ObjectType::CoordinateSystem,
                )
            }
            Property::Datum => {
                self.check_applicable(property, kind.is_crs())?;
                (unsafe { proj_sys::proj_crs_get_datum(ctx, ptr) }, ObjectType::Datum)
            }
            Property::DatumEnsemble => {
                self.check_applicable(property, kind.is_crs())?;
                (
                    unsafe { proj_sys::proj_crs_get_datum_ensemble(ctx, ptr) },
                    ObjectType::DatumEnsemble,
                )
            }
            Property::HorizontalDatum => {
                self.check_applicable(property, kind.is_crs())?;
                (
                    unsafe { proj_sys::proj_crs_get_horizontal_datum(ctx, ptr) },
                    ObjectType::Datum,
                )
            }
            Property::Ellipsoid => {
                self.check_applicable(property, kind.is_crs() || kind.is_datum())?;
                (unsafe { proj_sys::proj_get_ellipsoid(ctx, ptr) }, ObjectType::Ellipsoid)
            }
            Property::PrimeMeridian => {
                self.check_applicable(property, kind.is_crs() || kind.is_datum())?;
                (
                    unsafe { proj_sys::proj_get_prime_meridian(ctx, ptr) },
                    ObjectType::PrimeMeridian,
                )
            }
            Property::BaseCrs => {
                self.check_applicable(property, kind.is_crs())?;
                (unsafe { proj_sys::proj_get_source_crs(ctx, ptr) }, ObjectType::Crs)
            }
            Property::ConvertFromBase => {
                self.check_applicable(property, kind.is_crs())?;
                (
                    unsafe { proj_sys::proj_crs_get_coordoperation(ctx, ptr) },
                    ObjectType::Conversion,
                )
            }
            Property::GeodeticCrs => {
                self.check_applicable(property, kind.is_crs())?;
                (
                    unsafe { proj_sys::proj_crs_get_geodetic_crs(ctx, ptr) },
                    ObjectType::GeodeticCrs,
                )
            }
            _ => {
                return Err(Error::PropertyMismatch {
                    property,
                    shape: "object",
                });
            }
        };

        if value.is_null() {
            return Ok(None);
        }

        IdentifiedObject::from_owned_ptr(self.ctx(), value, declared).map(Some)
    }

    /// A textual property, `None` when the engine reports nothing.
    pub fn string_property(&self, property: Property) -> Result<Option<String>> {
        let ctx = self.ctx_ptr()?;
        let ptr = self.ptr()?;

        match property {
            Property::NameString => Ok(projinterop::opt_string(unsafe { proj_sys::proj_get_name(ptr) })),
            Property::IdentifierString => {
                let authority = projinterop::opt_string(unsafe { proj_sys::proj_get_id_auth_name(ptr, 0) });
                let code = projinterop::opt_string(unsafe { proj_sys::proj_get_id_code(ptr, 0) });
                Ok(match (authority, code) {
                    (Some(authority), Some(code)) => Some(format!("{authority}:{code}")),
                    (None, Some(code)) => Some(code),
                    _ => None,
                })
            }
            // the authority title the engine records is the codespace itself
            Property::Codespace | Property::CitationTitle => {
                Ok(projinterop::opt_string(unsafe { proj_sys::proj_get_id_auth_name(ptr, 0) }))
            }
            Property::Code => Ok(projinterop::opt_string(unsafe { proj_sys::proj_get_id_code(ptr, 0) })),
            Property::Remarks => Ok(projinterop::opt_string(unsafe { proj_sys::proj_get_remarks(ptr) })),
            Property::Scope => Ok(projinterop::opt_string(unsafe { proj_sys::proj_get_scope(ptr) })),
            Property::CelestialBody => {
                Ok(projinterop::opt_string(unsafe { proj_sys::proj_get_celestial_body_name(ctx, ptr) }))
            }
            _ => Err(Error::PropertyMismatch {
                property,
                shape: "string",
            }),
        }
    }

    /// A numeric property, NaN when the value is unknown to the engine.
    pub fn numeric_property(&self, property: Property) -> Result<f64> {
        match property {
            Property::SemiMajor => {
                self.check_applicable(property, self.kind() == ObjectType::Ellipsoid)?;
                Ok(self.ellipsoid_parameters()?.0)
            }
            Property::SemiMinor => {
                self.check_applicable(property, self.kind() == ObjectType::Ellipsoid)?;
                Ok(self.ellipsoid_parameters()?.1)
            }
            Property::InverseFlattening => {
                self.check_applicable(property, self.kind() == ObjectType::Ellipsoid)?;
                Ok(self.ellipsoid_parameters()?.3)
            }
            Property::Greenwich => {
                self.check_applicable(property, self.kind() == ObjectType::PrimeMeridian)?;
                Ok(self.prime_meridian_parameters()?.0)
            }
            Property::PositionalAccuracy => {
                self.check_applicable(property, self.kind().is_operation())?;
                let ctx = self.ctx_ptr()?;
                let accuracy = unsafe { proj_sys::proj_coordoperation_get_accuracy(ctx, self.ptr()?) };
                Ok(if accuracy < 0.0 { f64::NAN } else { accuracy })
            }
            _ => Err(Error::PropertyMismatch {
                property,
                shape: "numeric",
            }),
        }
    }

    /// The unit a property of the receiver is expressed in.
    pub fn unit_property(&self, property: Property) -> Result<Option<UnitOfMeasure>> {
        match property {
            Property::MeridianUnit => {
                self.check_applicable(property, self.kind() == ObjectType::PrimeMeridian)?;
                let (_, factor, name) = self.prime_meridian_parameters()?;
                Ok(Some(UnitOfMeasure::from_engine(name, factor, UnitType::Angular)))
            }
            // the engine reports ellipsoid figures in metres
            Property::EllipsoidUnit => {
                self.check_applicable(property, self.kind() == ObjectType::Ellipsoid)?;
                Ok(UnitOfMeasure::predefined(units::METRE))
            }
            _ => Err(Error::PropertyMismatch { property, shape: "unit" }),
        }
    }

    /// The domain of validity as `[west, south, east, north]` in degrees.
    pub fn extent_property(&self, property: Property) -> Result<Option<[f64; 4]>> {
        if property != Property::DomainOfValidity {
            return Err(Error::PropertyMismatch {
                property,
                shape: "extent",
            });
        }

        let ctx = self.ctx_ptr()?;
        let ptr = self.ptr()?;
        let mut west = 0.0;
        let mut south = 0.0;
        let mut east = 0.0;
        let mut north = 0.0;
        let mut area_name: *const c_char = std::ptr::null();
        let known = unsafe {
            proj_sys::proj_get_area_of_use(ctx, ptr, &mut west, &mut south, &mut east, &mut north, &mut area_name)
        };

        // the engine reports -1000 for each bound it does not know
        if known == 0 || west <= -1000.0 {
            return Ok(None);
        }
        Ok(Some([west, south, east, north]))
    }

    pub fn domain_of_validity(&self) -> Result<Option<[f64; 4]>> {
        self.extent_property(Property::DomainOfValidity)
    }

    pub fn integer_property(&self, property: Property) -> Result<i32> {
        match property {
            Property::GridUseCount => {
                self.check_applicable(property, self.kind().is_operation())?;
                let ctx = self.ctx_ptr()?;
                Ok(unsafe { proj_sys::proj_coordoperation_get_grid_used_count(ctx, self.ptr()?) })
            }
            _ => Err(Error::PropertyMismatch {
                property,
                shape: "integer",
            }),
        }
    }

    pub fn boolean_property(&self, property: Property) -> Result<bool> {
        let kind = self.kind();
        match property {
            Property::HasName => Ok(self.string_property(Property::NameString)?.is_some()),
            Property::IsSphere => {
                self.check_applicable(property, kind == ObjectType::Ellipsoid)?;
                let (semi_major, semi_minor, _, inverse_flattening) = self.ellipsoid_parameters()?;
                Ok(inverse_flattening == 0.0 || semi_major == semi_minor)
            }
            Property::IvfDefinitive => {
                self.check_applicable(property, kind == ObjectType::Ellipsoid)?;
                Ok(self.ellipsoid_parameters()?.2)
            }
            Property::Deprecated => Ok(unsafe { proj_sys::proj_is_deprecated(self.ptr()?) } != 0),
            Property::IsCrsDerived => {
                self.check_applicable(property, kind.is_crs())?;
                let ctx = self.ctx_ptr()?;
                Ok(unsafe { proj_sys::proj_crs_is_derived(ctx, self.ptr()?) } != 0)
            }
            Property::IsInstantiable => {
                self.check_applicable(property, kind.is_operation())?;
                let ctx = self.ctx_ptr()?;
                Ok(unsafe { proj_sys::proj_coordoperation_is_instantiable(ctx, self.ptr()?) } != 0)
            }
            Property::HasBallparkTransformation => {
                self.check_applicable(property, kind.is_operation())?;
                let ctx = self.ctx_ptr()?;
                Ok(unsafe { proj_sys::proj_coordoperation_has_ballpark_transformation(ctx, self.ptr()?) } != 0)
            }
            _ => Err(Error::PropertyMismatch {
                property,
                shape: "boolean",
            }),
        }
    }

    /// The number of elements behind a vector shaped property.
    ///
    /// [`Property::SourceTargetCrs`] is intentionally absent here, its size
    /// is fixed at two.
    pub fn vector_size(&self, property: Property) -> Result<usize> {
        match property {
            Property::Identifier => self.identifier_count(),
            Property::Axis => self.axis_count(),
            Property::CrsComponent => self.component_count(),
            Property::OperationParameter => self.parameter_count(),
            Property::OperationStep => self.step_count(),
            _ => Err(Error::PropertyMismatch {
                property,
                shape: "sized vector",
            }),
        }
    }

    /// An element of a vector shaped property. Indices at or past the size
    /// fail with [`Error::OutOfBounds`].
    pub fn vector_element(&self, property: Property, index: usize) -> Result<Option<PropertyValue>> {
        match property {
            Property::Identifier => self.identifier(index).map(|value| Some(PropertyValue::Identifier(value))),
            Property::Axis => self.axis(index).map(|value| Some(PropertyValue::Axis(value))),
            Property::CrsComponent => self.component(index).map(|value| Some(PropertyValue::Object(value))),
            Property::OperationParameter => self.parameter(index).map(|value| Some(PropertyValue::Parameter(value))),
            Property::OperationStep => self.step(index).map(|value| Some(PropertyValue::Object(value))),
            Property::SourceTargetCrs => match index {
                0 => Ok(self.source_crs()?.map(PropertyValue::Object)),
                1 => Ok(self.target_crs()?.map(PropertyValue::Object)),
                _ => Err(Error::OutOfBounds { index, size: 2 }),
            },
            _ => Err(Error::PropertyMismatch {
                property,
                shape: "vector",
            }),
        }
    }

    pub fn name_string(&self) -> Result<Option<String>> {
        self.string_property(Property::NameString)
    }

    pub fn identifier_string(&self) -> Result<Option<String>> {
        self.string_property(Property::IdentifierString)
    }

    pub fn identifier_count(&self) -> Result<usize> {
        let ptr = self.ptr()?;
        let mut count: c_int = 0;
        while !unsafe { proj_sys::proj_get_id_code(ptr, count) }.is_null() {
            count += 1;
        }
        Ok(count as usize)
    }

    pub fn identifier(&self, index: usize) -> Result<Identifier> {
        let ptr = self.ptr()?;
        let code = projinterop::opt_string(unsafe { proj_sys::proj_get_id_code(ptr, index as c_int) });
        match code {
            Some(code) => Ok(Identifier {
                codespace: projinterop::opt_string(unsafe { proj_sys::proj_get_id_auth_name(ptr, index as c_int) }),
                code,
            }),
            None => Err(Error::OutOfBounds {
                index,
                size: self.identifier_count()?,
            }),
        }
    }

    /// The number of axes. On a compound CRS this counts across all
    /// components, so the compound presents one flat axis list.
    pub fn axis_count(&self) -> Result<usize> {
        Ok(self.axis_vector()?.len())
    }

    pub fn axis(&self, index: usize) -> Result<Axis> {
        let axes = self.axis_vector()?;
        let size = axes.len();
        axes.into_iter()
            .nth(index)
            .ok_or(Error::OutOfBounds { index, size })
    }

    pub fn component_count(&self) -> Result<usize> {
        self.check_applicable(Property::CrsComponent, self.kind() == ObjectType::CompoundCrs)?;
        let ctx = self.ctx_ptr()?;
        let ptr = self.ptr()?;

        let mut count: c_int = 0;
        loop {
            let component = unsafe { proj_sys::proj_crs_get_sub_crs(ctx, ptr, count) };
            if component.is_null() {
                return Ok(count as usize);
            }
            drop(RawObject::adopt(component));
            count += 1;
        }
    }

    pub fn component(&self, index: usize) -> Result<IdentifiedObject> {
        self.check_applicable(Property::CrsComponent, self.kind() == ObjectType::CompoundCrs)?;
        let ctx = self.ctx_ptr()?;
        let component = unsafe { proj_sys::proj_crs_get_sub_crs(ctx, self.ptr()?, index as c_int) };
        if component.is_null() {
            return Err(Error::OutOfBounds {
                index,
                size: self.component_count()?,
            });
        }

        IdentifiedObject::from_owned_ptr(self.ctx(), component, ObjectType::Crs)
    }

    pub fn parameter_count(&self) -> Result<usize> {
        self.check_applicable(Property::OperationParameter, self.kind().is_operation())?;
        let ctx = self.ctx_ptr()?;
        let count = unsafe { proj_sys::proj_coordoperation_get_param_count(ctx, self.ptr()?) };
        Ok(count.max(0) as usize)
    }

    pub fn parameter(&self, index: usize) -> Result<Parameter> {
        let size = self.parameter_count()?;
        if index >= size {
            return Err(Error::OutOfBounds { index, size });
        }

        let ctx = self.ctx_ptr()?;
        let ptr = self.ptr()?;
        let mut name: *const c_char = std::ptr::null();
        let mut auth_name: *const c_char = std::ptr::null();
        let mut code: *const c_char = std::ptr::null();
        let mut value = 0.0;
        let mut value_string: *const c_char = std::ptr::null();
        let mut unit_factor = 0.0;
        let mut unit_name: *const c_char = std::ptr::null();
        let mut unit_auth_name: *const c_char = std::ptr::null();
        let mut unit_code: *const c_char = std::ptr::null();
        let mut unit_category: *const c_char = std::ptr::null();
        let ok = unsafe {
            proj_sys::proj_coordoperation_get_param(
                ctx,
                ptr,
                index as c_int,
                &mut name,
                &mut auth_name,
                &mut code,
                &mut value,
                &mut value_string,
                &mut unit_factor,
                &mut unit_name,
                &mut unit_auth_name,
                &mut unit_code,
                &mut unit_category,
            )
        };
        if ok == 0 {
            return Err(Error::Runtime(format!(
                "proj_coordoperation_get_param: {}",
                projinterop::last_error_message(ctx)
            )));
        }

        let text = projinterop::opt_string(value_string);
        let unit_name = projinterop::opt_string(unit_name);
        let unit = if unit_name.is_some() || unit_factor != 0.0 {
            let category = projinterop::opt_string(unit_category);
            Some(UnitOfMeasure::from_engine(
                unit_name,
                unit_factor,
                UnitType::from_category(category.as_deref().unwrap_or("unknown")),
            ))
        } else {
            None
        };

        Ok(Parameter {
            name: projinterop::opt_string(name).unwrap_or_default(),
            authority: projinterop::opt_string(auth_name),
            code: projinterop::opt_string(code),
            kind: if text.is_some() {
                ParameterKind::String
            } else {
                ParameterKind::Measure
            },
            numeric_value: if text.is_some() { f64::NAN } else { value },
            text_value: text,
            unit,
        })
    }

    /// Finds an operation parameter by case insensitive name.
    pub fn search_parameter(&self, name: &str) -> Result<Option<Parameter>> {
        for index in 0..self.parameter_count()? {
            let parameter = self.parameter(index)?;
            if parameter.name.eq_ignore_ascii_case(name) {
                return Ok(Some(parameter));
            }
        }
        Ok(None)
    }

    pub fn step_count(&self) -> Result<usize> {
        self.check_applicable(Property::OperationStep, self.kind() == ObjectType::ConcatenatedOperation)?;
        let ctx = self.ctx_ptr()?;
        let count = unsafe { proj_sys::proj_concatoperation_get_step_count(ctx, self.ptr()?) };
        Ok(count.max(0) as usize)
    }

    pub fn step(&self, index: usize) -> Result<IdentifiedObject> {
        let size = self.step_count()?;
        if index >= size {
            return Err(Error::OutOfBounds { index, size });
        }

        let ctx = self.ctx_ptr()?;
        let step = unsafe { proj_sys::proj_concatoperation_get_step(ctx, self.ptr()?, index as c_int) };
        let step = projinterop::check_pointer(ctx, step, "proj_concatoperation_get_step")?;
        IdentifiedObject::from_owned_ptr(self.ctx(), step, ObjectType::CoordinateOperation)
    }

    pub fn source_crs(&self) -> Result<Option<IdentifiedObject>> {
        self.check_applicable(Property::SourceTargetCrs, self.kind().is_operation())?;
        let ctx = self.ctx_ptr()?;
        let value = unsafe { proj_sys::proj_get_source_crs(ctx, self.ptr()?) };
        if value.is_null() {
            return Ok(None);
        }
        IdentifiedObject::from_owned_ptr(self.ctx(), value, ObjectType::Crs).map(Some)
    }

    pub fn target_crs(&self) -> Result<Option<IdentifiedObject>> {
        self.check_applicable(Property::SourceTargetCrs, self.kind().is_operation())?;
        let ctx = self.ctx_ptr()?;
        let value = unsafe { proj_sys::proj_get_target_crs(ctx, self.ptr()?) };
        if value.is_null() {
            return Ok(None);
        }
        IdentifiedObject::from_owned_ptr(self.ctx(), value, ObjectType::Crs).map(Some)
    }

    /// The method of a coordinate operation, `None` when the engine does not
    /// report one (concatenated operations).
    pub fn method(&self) -> Result<Option<OperationMethod>> {
        if !self.kind().is_operation() {
            return Err(Error::Runtime(format!(
                "the operation method is not defined for {:?}",
                self.kind()
            )));
        }

        let ctx = self.ctx_ptr()?;
        let mut name: *const c_char = std::ptr::null();
        let mut auth_name: *const c_char = std::ptr::null();
        let mut code: *const c_char = std::ptr::null();
        let ok = unsafe {
            proj_sys::proj_coordoperation_get_method_info(ctx, self.ptr()?, &mut name, &mut auth_name, &mut code)
        };
        if ok == 0 {
            return Ok(None);
        }

        Ok(Some(OperationMethod {
            name: projinterop::opt_string(name).unwrap_or_default(),
            authority: projinterop::opt_string(auth_name),
            code: projinterop::opt_string(code),
        }))
    }

    fn check_applicable(&self, property: Property, applicable: bool) -> Result<()> {
        if applicable {
            Ok(())
        } else {
            Err(Error::Runtime(format!(
                "{property:?} is not defined for {:?}",
                self.kind()
            )))
        }
    }

    fn axis_vector(&self) -> Result<Vec<Axis>> {
        let kind = self.kind();
        self.check_applicable(Property::Axis, kind.is_coordinate_system() || kind.is_crs())?;

        let ctx = self.ctx_ptr()?;
        let ptr = self.ptr()?;
        if kind.is_coordinate_system() {
            cs_axes(ctx, ptr)
        } else {
            crs_axes(ctx, ptr, 0)
        }
    }

    /// Semi major, semi minor, whether the semi minor axis is derived, and
    /// the inverse flattening, all straight from the engine.
    pub(crate) fn ellipsoid_parameters(&self) -> Result<(f64, f64, bool, f64)> {
        let ctx = self.ctx_ptr()?;
        let ptr = self.ptr()?;
        let mut semi_major = 0.0;
        let mut semi_minor = 0.0;
        let mut semi_minor_computed: c_int = 0;
        let mut inverse_flattening = 0.0;
        let ok = unsafe {
            proj_sys::proj_ellipsoid_get_parameters(
                ctx,
                ptr,
                &mut semi_major,
                &mut semi_minor,
                &mut semi_minor_computed,
                &mut inverse_flattening,
            )
        };
        if ok == 0 {
            return Err(Error::Runtime(format!(
                "proj_ellipsoid_get_parameters: {}",
                projinterop::last_error_message(ctx)
            )));
        }
        Ok((semi_major, semi_minor, semi_minor_computed != 0, inverse_flattening))
    }

    pub(crate) fn prime_meridian_parameters(&self) -> Result<(f64, f64, Option<String>)> {
        let ctx = self.ctx_ptr()?;
        let ptr = self.ptr()?;
        let mut longitude = 0.0;
        let mut unit_factor = 0.0;
        let mut unit_name: *const c_char = std::ptr::null();
        let ok = unsafe {
            proj_sys::proj_prime_meridian_get_parameters(ctx, ptr, &mut longitude, &mut unit_factor, &mut unit_name)
        };
        if ok == 0 {
            return Err(Error::Runtime(format!(
                "proj_prime_meridian_get_parameters: {}",
                projinterop::last_error_message(ctx)
            )));
        }
        Ok((longitude, unit_factor, projinterop::opt_string(unit_name)))
    }
}

fn cs_axes(ctx: *mut PJ_CONTEXT, cs: *mut PJ) -> Result<Vec<Axis>> {
    let count = unsafe { proj_sys::proj_cs_get_axis_count(ctx, cs) };
    if count < 0 {
        return Err(Error::Runtime(format!(
            "proj_cs_get_axis_count: {}",
            projinterop::last_error_message(ctx)
        )));
    }

    let mut axes = Vec::with_capacity(count as usize);
    for index in 0..count {
        let mut name: *const c_char = std::ptr::null();
        let mut abbreviation: *const c_char = std::ptr::null();
        let mut direction: *const c_char = std::ptr::null();
        let mut unit_factor = 0.0;
        let mut unit_name: *const c_char = std::ptr::null();
        let ok = unsafe {
            proj_sys::proj_cs_get_axis_info(
                ctx,
                cs,
                index,
                &mut name,
                &mut abbreviation,
                &mut direction,
                &mut unit_factor,
                &mut unit_name,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            )
        };
        if ok == 0 {
            return Err(Error::Runtime(format!(
                "proj_cs_get_axis_info: {}",
                projinterop::last_error_message(ctx)
            )));
        }

        // axis units come without a category, from_engine matches by name
        let unit = UnitOfMeasure::from_engine(projinterop::opt_string(unit_name), unit_factor, UnitType::Unknown);
        axes.push(Axis {
            name: projinterop::opt_string(name).unwrap_or_default(),
            abbreviation: projinterop::opt_string(abbreviation).unwrap_or_default(),
            direction: projinterop::opt_string(direction).unwrap_or_default(),
            unit,
        });
    }

    Ok(axes)
}

fn crs_axes(ctx: *mut PJ_CONTEXT, crs: *mut PJ, depth: usize) -> Result<Vec<Axis>> {
    if depth >= MAX_COMPONENT_NESTING {
        return Err(Error::Runtime(String::from("compound CRS components nest too deeply")));
    }

    if unsafe { proj_sys::proj_get_type(crs) } == proj_sys::PJ_TYPE_PJ_TYPE_COMPOUND_CRS {
        let mut axes = Vec::new();
        let mut index: c_int = 0;
        loop {
            let component = unsafe { proj_sys::proj_crs_get_sub_crs(ctx, crs, index) };
            if component.is_null() {
                return Ok(axes);
            }
            let component = RawObject::adopt(component);
            axes.extend(crs_axes(ctx, component.get()?, depth + 1)?);
            index += 1;
        }
    }

    let cs = unsafe { proj_sys::proj_crs_get_coordinate_system(ctx, crs) };
    let cs = RawObject::adopt(projinterop::check_pointer(ctx, cs, "proj_crs_get_coordinate_system")?);
    cs_axes(ctx, cs.get()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Context;

    fn wgs84() -> (Context, IdentifiedObject) {
        let context = Context::new().expect("context");
        let crs = context.create_from_user_input("EPSG:4326").expect("known code");
        (context, crs)
    }

    #[test]
    fn axes_of_a_geographic_crs() {
        let (_context, crs) = wgs84();
        assert_eq!(crs.axis_count().expect("axis count"), 2);

        let latitude = crs.axis(0).expect("first axis");
        assert_eq!(latitude.abbreviation, "Lat");
        assert_eq!(latitude.direction, "north");
        assert_eq!(latitude.unit.identifier, units::DEGREE);
    }

    #[test]
    fn axis_index_is_bounds_checked() {
        let (_context, crs) = wgs84();
        match crs.axis(5) {
            Err(Error::OutOfBounds { index, size }) => {
                assert_eq!(index, 5);
                assert_eq!(size, 2);
            }
            other => panic!("expected an out of bounds error, got {other:?}"),
        }
    }

    #[test]
    fn string_properties_of_a_known_crs() {
        let (_context, crs) = wgs84();
        assert_eq!(crs.name_string().expect("name").as_deref(), Some("WGS 84"));
        assert_eq!(crs.identifier_string().expect("identifier").as_deref(), Some("EPSG:4326"));
        assert_eq!(crs.string_property(Property::Code).expect("code").as_deref(), Some("4326"));
        assert_eq!(
            crs.string_property(Property::Codespace).expect("codespace").as_deref(),
            Some("EPSG")
        );
        assert!(crs.boolean_property(Property::HasName).expect("has name"));
    }

    #[test]
    fn ellipsoid_figures() {
        let (_context, crs) = wgs84();
        let ellipsoid = crs
            .object_property(Property::Ellipsoid)
            .expect("accessible")
            .expect("present");
        assert_eq!(ellipsoid.kind(), ObjectType::Ellipsoid);

        let semi_major = ellipsoid.numeric_property(Property::SemiMajor).expect("semi major");
        assert_eq!(semi_major, 6378137.0);
        assert!(!ellipsoid.boolean_property(Property::IsSphere).expect("sphere flag"));
        assert!(ellipsoid.boolean_property(Property::IvfDefinitive).expect("ivf flag"));

        let unit = ellipsoid
            .unit_property(Property::EllipsoidUnit)
            .expect("accessible")
            .expect("present");
        assert_eq!(unit.identifier, units::METRE);
    }

    #[test]
    fn shape_and_type_checks_are_distinct() {
        let (_context, crs) = wgs84();
        assert!(matches!(
            crs.string_property(Property::SemiMajor),
            Err(Error::PropertyMismatch {
                property: Property::SemiMajor,
                shape: "string",
            })
        ));
        // right shape, wrong runtime type
        assert!(matches!(
            crs.numeric_property(Property::SemiMajor),
            Err(Error::Runtime(_))
        ));
    }

    #[test]
    fn identifiers_of_a_known_crs() {
        let (_context, crs) = wgs84();
        assert_eq!(crs.identifier_count().expect("count"), 1);

        let identifier = crs.identifier(0).expect("first identifier");
        assert_eq!(identifier.codespace.as_deref(), Some("EPSG"));
        assert_eq!(identifier.code, "4326");
        assert!(matches!(crs.identifier(1), Err(Error::OutOfBounds { index: 1, size: 1 })));
    }

    #[test]
    fn domain_of_validity_is_world_wide_for_wgs84() {
        let (_context, crs) = wgs84();
        let extent = crs.domain_of_validity().expect("accessible").expect("present");
        assert_eq!(extent[0], -180.0);
        assert_eq!(extent[2], 180.0);
    }

    #[test]
    fn source_target_pseudo_vector_has_fixed_bounds() {
        let (_context, crs) = wgs84();
        // not an operation at all
        assert!(crs.source_crs().is_err());
        assert!(matches!(
            crs.vector_size(Property::SourceTargetCrs),
            Err(Error::PropertyMismatch { .. })
        ));
    }
}
