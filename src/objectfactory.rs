//! Free standing construction of referencing objects.
//!
//! The factory builds objects from flattened inputs: a fixed slot property
//! record, already wrapped component objects, axis descriptions, plain
//! numbers and a unit identifier. One closed switch in
//! [`ObjectFactory::create`] selects the construction from the requested
//! [`ObjectType`], each arm reads exactly the slots it needs.
//!
//! The engine has no standalone constructor for datums and prime meridians.
//! Those arms build a throwaway CRS around the requested object and extract
//! it, the scaffolding is destroyed before the call returns.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::rc::Rc;

use proj_sys::{PJ, PJ_CONTEXT};

use crate::context::{Context, ContextInner};
use crate::handle::RawObject;
use crate::projinterop::{self, experimental};
use crate::units::{self, UnitOfMeasure, UnitType};
use crate::{Axis, Error, IdentifiedObject, ObjectType, OperationMethod, Parameter, ParameterKind, Result};

const UNNAMED: &str = "unnamed";

// placeholder figures for scaffolding that is discarded after extraction
const SCRATCH_SEMI_MAJOR: f64 = 6378137.0;
const SCRATCH_INVERSE_FLATTENING: f64 = 298.257223563;

const DEGREE_TO_RADIAN: f64 = 0.017453292519943295;

/// Construction properties in fixed slots.
///
/// A construction reads only the slots it consumes, the rest are ignored. The
/// engine's creation interface carries the name through every construction;
/// identifier, codespace and the remaining slots reach only the kinds whose
/// constructor accepts them.
#[derive(Debug, Clone, Default)]
pub struct ObjectProperties {
    pub name: Option<String>,
    pub identifier: Option<String>,
    pub codespace: Option<String>,
    pub alias: Option<String>,
    pub remarks: Option<String>,
    pub deprecated: bool,
    pub anchor: Option<String>,
    pub scope: Option<String>,
}

impl ObjectProperties {
    /// Properties carrying only a name.
    pub fn named(name: &str) -> ObjectProperties {
        ObjectProperties {
            name: Some(String::from(name)),
            ..ObjectProperties::default()
        }
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED)
    }
}

/// Builds referencing objects that are not backed by any authority.
pub struct ObjectFactory {
    ctx: Rc<ContextInner>,
}

impl ObjectFactory {
    pub fn new(context: &Context) -> ObjectFactory {
        ObjectFactory {
            ctx: context.inner().clone(),
        }
    }

    /// Builds an object of the requested kind from flattened inputs.
    ///
    /// The switch over `kind` is closed:
    ///
    /// * `PrimeMeridian`: `doubles[0]` is the longitude, `unit` an angular
    ///   unit identifier.
    /// * `Ellipsoid`: `doubles[0]` is the semi major axis and `doubles[1]`
    ///   the semi minor axis, both in the linear `unit`. A third element
    ///   switches to the flattened sphere form where `doubles[2]` is the
    ///   definitive inverse flattening and `doubles[1]` is ignored.
    /// * coordinate system kinds: built from `axes`, the accepted axis count
    ///   depends on the kind (cartesian and ellipsoidal 2 or 3, spherical 3,
    ///   vertical and temporal 1).
    /// * `GeodeticReferenceFrame`: components are the ellipsoid and the
    ///   prime meridian.
    /// * `VerticalReferenceFrame`, `EngineeringDatum`: built from the name.
    /// * CRS kinds: components per arm, see the errors they raise.
    /// * axes and conversions have their own entry points,
    ///   [`ObjectFactory::create_axis`] and
    ///   [`ObjectFactory::create_conversion`], because the engine interface
    ///   reports both by value.
    ///
    /// Kinds the engine interface cannot instantiate fail with
    /// [`Error::Factory`] naming the kind.
    pub fn create(
        &self,
        kind: ObjectType,
        properties: &ObjectProperties,
        components: &[&IdentifiedObject],
        axes: &[Axis],
        doubles: &[f64],
        unit: i32,
    ) -> Result<IdentifiedObject> {
        match kind {
            ObjectType::PrimeMeridian => self.prime_meridian(properties, doubles, unit),
            ObjectType::Ellipsoid => self.ellipsoid(properties, doubles, unit),
            ObjectType::CartesianCs => self.coordinate_system(
                kind,
                proj_sys::PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_CARTESIAN,
                &[2, 3],
                axes,
            ),
            ObjectType::SphericalCs => self.coordinate_system(
                kind,
                proj_sys::PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_SPHERICAL,
                &[3],
                axes,
            ),
            ObjectType::EllipsoidalCs => self.coordinate_system(
                kind,
                proj_sys::PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_ELLIPSOIDAL,
                &[2, 3],
                axes,
            ),
            ObjectType::VerticalCs => self.coordinate_system(
                kind,
                proj_sys::PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_VERTICAL,
                &[1],
                axes,
            ),
            ObjectType::TemporalCs => self.coordinate_system(
                kind,
                proj_sys::PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_TEMPORALMEASURE,
                &[1],
                axes,
            ),
            ObjectType::GeodeticReferenceFrame => self.geodetic_reference_frame(properties, components),
            ObjectType::VerticalReferenceFrame => self.vertical_reference_frame(properties),
            ObjectType::EngineeringDatum => self.engineering_datum(properties),
            ObjectType::GeographicCrs => self.geographic_crs(properties, components),
            ObjectType::GeodeticCrs | ObjectType::GeocentricCrs => self.geocentric_crs(kind, properties, components),
            ObjectType::VerticalCrs => self.vertical_crs(properties, components),
            ObjectType::EngineeringCrs => self.engineering_crs(properties, components),
            ObjectType::ProjectedCrs => self.projected_crs(properties, components),
            ObjectType::CompoundCrs => self.compound_crs(properties, components),
            ObjectType::Axis => Err(Error::Factory(String::from(
                "axes are values, construction goes through create_axis",
            ))),
            ObjectType::Conversion => Err(Error::Factory(String::from(
                "conversion construction goes through create_conversion with a method and parameters",
            ))),
            ObjectType::TemporalDatum | ObjectType::ParametricDatum | ObjectType::TemporalCrs => Err(Error::Factory(
                format!("the engine interface cannot build {kind:?} objects"),
            )),
            other => Err(Error::Factory(format!("{other:?} is not a constructible kind"))),
        }
    }

    /// Builds a coordinate system axis value.
    ///
    /// The direction string is kept verbatim, the engine rejects an unknown
    /// direction when the axis enters a coordinate system.
    pub fn create_axis(&self, name: &str, abbreviation: &str, direction: &str, unit: i32) -> Result<Axis> {
        let unit = resolve_unit(unit, UnitType::Unknown, ObjectType::Axis)?;
        Ok(Axis::new(name, abbreviation, direction, unit))
    }

    /// Builds a defining conversion from a method and its parameter values.
    ///
    /// The codespace and identifier slots of `properties` become the
    /// conversion's authority and code when present, the method carries its
    /// own. The engine constructor takes measures only, a parameter of any
    /// other kind is a factory error.
    pub fn create_conversion(
        &self,
        properties: &ObjectProperties,
        method: &OperationMethod,
        parameters: &[Parameter],
    ) -> Result<IdentifiedObject> {
        let name = CString::new(properties.display_name())?;
        let authority = optional_cstring(properties.codespace.as_deref())?;
        let code = optional_cstring(properties.identifier.as_deref())?;
        let method_name = CString::new(method.name.as_str())?;
        let method_authority = optional_cstring(method.authority.as_deref())?;
        let method_code = optional_cstring(method.code.as_deref())?;
        let marshalled = ParamDescriptions::new(parameters)?;
        self.build(ObjectType::Conversion, |ctx| unsafe {
            experimental::proj_create_conversion(
                ctx,
                name.as_ptr(),
                ptr_or_null(&authority),
                ptr_or_null(&code),
                method_name.as_ptr(),
                ptr_or_null(&method_authority),
                ptr_or_null(&method_code),
                parameters.len() as c_int,
                marshalled.as_ptr(),
            )
        })
    }

    fn prime_meridian(&self, properties: &ObjectProperties, doubles: &[f64], unit: i32) -> Result<IdentifiedObject> {
        let longitude = double(doubles, 0, ObjectType::PrimeMeridian, "longitude")?;
        let unit = resolve_unit(unit, UnitType::Angular, ObjectType::PrimeMeridian)?;
        let scaffold = self.scratch_geographic_crs(&ScratchFrame {
            datum_name: UNNAMED,
            ellipsoid_name: UNNAMED,
            semi_major_metre: SCRATCH_SEMI_MAJOR,
            inverse_flattening: SCRATCH_INVERSE_FLATTENING,
            meridian_name: properties.display_name(),
            meridian_longitude: longitude,
            meridian_unit_name: &unit.name,
            meridian_to_radian: unit.to_base,
        })?;
        let source = scaffold.get()?;
        self.build(ObjectType::PrimeMeridian, |ctx| unsafe {
            proj_sys::proj_get_prime_meridian(ctx, source)
        })
    }

    fn ellipsoid(&self, properties: &ObjectProperties, doubles: &[f64], unit: i32) -> Result<IdentifiedObject> {
        let unit = resolve_unit(unit, UnitType::Linear, ObjectType::Ellipsoid)?;
        let semi_major = double(doubles, 0, ObjectType::Ellipsoid, "semi major axis")? * unit.to_base;
        let inverse_flattening = if doubles.len() >= 3 {
            double(doubles, 2, ObjectType::Ellipsoid, "inverse flattening")?
        } else {
            let semi_minor = double(doubles, 1, ObjectType::Ellipsoid, "semi minor axis")? * unit.to_base;
            if semi_minor == semi_major {
                0.0
            } else {
                semi_major / (semi_major - semi_minor)
            }
        };
        let scaffold = self.scratch_geographic_crs(&ScratchFrame {
            datum_name: UNNAMED,
            ellipsoid_name: properties.display_name(),
            semi_major_metre: semi_major,
            inverse_flattening,
            meridian_name: "Greenwich",
            meridian_longitude: 0.0,
            meridian_unit_name: "degree",
            meridian_to_radian: DEGREE_TO_RADIAN,
        })?;
        let source = scaffold.get()?;
        self.build(ObjectType::Ellipsoid, |ctx| unsafe {
            proj_sys::proj_get_ellipsoid(ctx, source)
        })
    }

    fn coordinate_system(
        &self,
        kind: ObjectType,
        cs_type: proj_sys::PJ_COORDINATE_SYSTEM_TYPE,
        accepted: &[usize],
        axes: &[Axis],
    ) -> Result<IdentifiedObject> {
        if !accepted.contains(&axes.len()) {
            let wanted = accepted.iter().map(usize::to_string).collect::<Vec<_>>().join(" or ");
            return Err(Error::Factory(format!(
                "{kind:?} construction takes {wanted} axes, got {}",
                axes.len()
            )));
        }
        let marshalled = AxisDescriptions::new(axes)?;
        self.build(kind, |ctx| unsafe {
            experimental::proj_create_cs(ctx, cs_type, axes.len() as c_int, marshalled.as_ptr())
        })
    }

    fn geodetic_reference_frame(
        &self,
        properties: &ObjectProperties,
        components: &[&IdentifiedObject],
    ) -> Result<IdentifiedObject> {
        let kind = ObjectType::GeodeticReferenceFrame;
        let ellipsoid = component(components, 0, kind, |k| k == ObjectType::Ellipsoid, "ellipsoid")?;
        let meridian = component(components, 1, kind, |k| k == ObjectType::PrimeMeridian, "prime meridian")?;
        let (semi_major, _, _, inverse_flattening) = ellipsoid.ellipsoid_parameters()?;
        let (longitude, to_radian, unit_name) = meridian.prime_meridian_parameters()?;
        let ellipsoid_name = ellipsoid.name_string()?.unwrap_or_else(|| String::from(UNNAMED));
        let meridian_name = meridian.name_string()?.unwrap_or_else(|| String::from(UNNAMED));
        let scaffold = self.scratch_geographic_crs(&ScratchFrame {
            datum_name: properties.display_name(),
            ellipsoid_name: &ellipsoid_name,
            semi_major_metre: semi_major,
            inverse_flattening,
            meridian_name: &meridian_name,
            meridian_longitude: longitude,
            meridian_unit_name: unit_name.as_deref().unwrap_or("degree"),
            meridian_to_radian: to_radian,
        })?;
        let source = scaffold.get()?;
        self.build(kind, |ctx| unsafe { proj_sys::proj_crs_get_datum(ctx, source) })
    }

    fn vertical_reference_frame(&self, properties: &ObjectProperties) -> Result<IdentifiedObject> {
        let name = CString::new(properties.display_name())?;
        let scaffold = self.raw_build(ObjectType::VerticalReferenceFrame, |ctx| unsafe {
            experimental::proj_create_vertical_crs(ctx, name.as_ptr(), name.as_ptr(), std::ptr::null(), 0.0)
        })?;
        let source = scaffold.get()?;
        self.build(ObjectType::VerticalReferenceFrame, |ctx| unsafe {
            proj_sys::proj_crs_get_datum(ctx, source)
        })
    }

    fn engineering_datum(&self, properties: &ObjectProperties) -> Result<IdentifiedObject> {
        let name = CString::new(properties.display_name())?;
        let scaffold = self.raw_build(ObjectType::EngineeringDatum, |ctx| unsafe {
            experimental::proj_create_engineering_crs(ctx, name.as_ptr())
        })?;
        let source = scaffold.get()?;
        self.build(ObjectType::EngineeringDatum, |ctx| unsafe {
            proj_sys::proj_crs_get_datum(ctx, source)
        })
    }

    fn geographic_crs(&self, properties: &ObjectProperties, components: &[&IdentifiedObject]) -> Result<IdentifiedObject> {
        let kind = ObjectType::GeographicCrs;
        let datum = component(components, 0, kind, ObjectType::is_datum, "geodetic reference frame")?;
        let cs = component(
            components,
            1,
            kind,
            |k| k == ObjectType::EllipsoidalCs,
            "ellipsoidal coordinate system",
        )?;
        let name = CString::new(properties.display_name())?;
        let datum_ptr = datum.ptr()?;
        let cs_ptr = cs.ptr()?;
        self.build(kind, |ctx| unsafe {
            experimental::proj_create_geographic_crs_from_datum(ctx, name.as_ptr(), datum_ptr, cs_ptr)
        })
    }

    fn geocentric_crs(
        &self,
        kind: ObjectType,
        properties: &ObjectProperties,
        components: &[&IdentifiedObject],
    ) -> Result<IdentifiedObject> {
        let datum = component(components, 0, kind, ObjectType::is_datum, "geodetic reference frame")?;
        let cs = component(
            components,
            1,
            kind,
            |k| k == ObjectType::CartesianCs,
            "cartesian coordinate system",
        )?;
        let unit = linear_axis_unit(cs, kind)?;
        let name = CString::new(properties.display_name())?;
        let unit_name = CString::new(unit.name.as_str())?;
        let datum_ptr = datum.ptr()?;
        self.build(kind, |ctx| unsafe {
            experimental::proj_create_geocentric_crs_from_datum(ctx, name.as_ptr(), datum_ptr, unit_name.as_ptr(), unit.to_base)
        })
    }

    // The engine rebuilds the reference frame from its name through this
    // entry point, the datum component contributes the name only.
    fn vertical_crs(&self, properties: &ObjectProperties, components: &[&IdentifiedObject]) -> Result<IdentifiedObject> {
        let kind = ObjectType::VerticalCrs;
        let datum = component(
            components,
            0,
            kind,
            |k| k == ObjectType::VerticalReferenceFrame,
            "vertical reference frame",
        )?;
        let cs = component(
            components,
            1,
            kind,
            |k| k == ObjectType::VerticalCs,
            "vertical coordinate system",
        )?;
        let unit = linear_axis_unit(cs, kind)?;
        let name = CString::new(properties.display_name())?;
        let datum_name = CString::new(datum.name_string()?.unwrap_or_else(|| String::from(UNNAMED)))?;
        let unit_name = CString::new(unit.name.as_str())?;
        self.build(kind, |ctx| unsafe {
            experimental::proj_create_vertical_crs(ctx, name.as_ptr(), datum_name.as_ptr(), unit_name.as_ptr(), unit.to_base)
        })
    }

    fn engineering_crs(&self, properties: &ObjectProperties, components: &[&IdentifiedObject]) -> Result<IdentifiedObject> {
        if !components.is_empty() {
            return Err(Error::Factory(String::from(
                "EngineeringCrs construction takes no components, the engine derives datum and coordinate system from the name",
            )));
        }
        let name = CString::new(properties.display_name())?;
        self.build(ObjectType::EngineeringCrs, |ctx| unsafe {
            experimental::proj_create_engineering_crs(ctx, name.as_ptr())
        })
    }

    fn projected_crs(&self, properties: &ObjectProperties, components: &[&IdentifiedObject]) -> Result<IdentifiedObject> {
        let kind = ObjectType::ProjectedCrs;
        let base = component(
            components,
            0,
            kind,
            |k| matches!(k, ObjectType::GeographicCrs | ObjectType::GeodeticCrs | ObjectType::GeocentricCrs),
            "base geodetic CRS",
        )?;
        let conversion = component(components, 1, kind, |k| k == ObjectType::Conversion, "defining conversion")?;
        let cs = component(
            components,
            2,
            kind,
            |k| k == ObjectType::CartesianCs,
            "cartesian coordinate system",
        )?;
        let name = CString::new(properties.display_name())?;
        let base_ptr = base.ptr()?;
        let conversion_ptr = conversion.ptr()?;
        let cs_ptr = cs.ptr()?;
        self.build(kind, |ctx| unsafe {
            experimental::proj_create_projected_crs(ctx, name.as_ptr(), base_ptr, conversion_ptr, cs_ptr)
        })
    }

    fn compound_crs(&self, properties: &ObjectProperties, components: &[&IdentifiedObject]) -> Result<IdentifiedObject> {
        let kind = ObjectType::CompoundCrs;
        if components.len() < 2 {
            return Err(Error::Factory(format!(
                "{kind:?} construction takes at least two components, got {}",
                components.len()
            )));
        }
        let mut pointers = Vec::with_capacity(components.len());
        for (index, part) in components.iter().enumerate() {
            if !part.kind().is_crs() {
                return Err(Error::Factory(format!(
                    "{kind:?} construction expects a CRS at component {index}, got {:?}",
                    part.kind()
                )));
            }
            pointers.push(part.ptr()?);
        }
        let name = CString::new(properties.display_name())?;
        // pairwise fold, intermediates drop as soon as they are merged
        let mut merged = self.raw_build(kind, |ctx| unsafe {
            experimental::proj_create_compound_crs(ctx, name.as_ptr(), pointers[0], pointers[1])
        })?;
        for &next in &pointers[2..] {
            let head = merged.get()?;
            merged = self.raw_build(kind, |ctx| unsafe {
                experimental::proj_create_compound_crs(ctx, name.as_ptr(), head, next)
            })?;
        }
        IdentifiedObject::from_owned_ptr(&self.ctx, merged.take(), kind)
    }

    fn scratch_geographic_crs(&self, frame: &ScratchFrame<'_>) -> Result<RawObject> {
        let cs = self.standard_ellipsoidal_cs()?;
        let datum_name = CString::new(frame.datum_name)?;
        let ellipsoid_name = CString::new(frame.ellipsoid_name)?;
        let meridian_name = CString::new(frame.meridian_name)?;
        let meridian_unit = CString::new(frame.meridian_unit_name)?;
        let cs_ptr = cs.get()?;
        self.raw_build(ObjectType::GeographicCrs, |ctx| unsafe {
            experimental::proj_create_geographic_crs(
                ctx,
                // the scaffold CRS itself is discarded, its name is irrelevant
                datum_name.as_ptr(),
                datum_name.as_ptr(),
                ellipsoid_name.as_ptr(),
                frame.semi_major_metre,
                frame.inverse_flattening,
                meridian_name.as_ptr(),
                frame.meridian_longitude,
                meridian_unit.as_ptr(),
                frame.meridian_to_radian,
                cs_ptr,
            )
        })
    }

    fn standard_ellipsoidal_cs(&self) -> Result<RawObject> {
        let degree = resolve_unit(units::DEGREE, UnitType::Angular, ObjectType::EllipsoidalCs)?;
        let axes = [
            Axis::new("Latitude", "lat", "north", degree.clone()),
            Axis::new("Longitude", "lon", "east", degree),
        ];
        let marshalled = AxisDescriptions::new(&axes)?;
        self.raw_build(ObjectType::EllipsoidalCs, |ctx| unsafe {
            experimental::proj_create_cs(
                ctx,
                proj_sys::PJ_COORDINATE_SYSTEM_TYPE_PJ_CS_TYPE_ELLIPSOIDAL,
                2,
                marshalled.as_ptr(),
            )
        })
    }

    fn raw_build(&self, kind: ObjectType, f: impl FnOnce(*mut PJ_CONTEXT) -> *mut PJ) -> Result<RawObject> {
        let ctx = self.ctx.ptr()?;
        let (ptr, diagnostics) = self.ctx.capture_diagnostics(|| f(ctx));
        if ptr.is_null() {
            let detail = if diagnostics.is_empty() {
                projinterop::last_error_message(ctx)
            } else {
                diagnostics.join("; ")
            };
            Err(Error::Factory(format!("{kind:?}: {detail}")))
        } else {
            Ok(RawObject::adopt(ptr))
        }
    }

    fn build(&self, kind: ObjectType, f: impl FnOnce(*mut PJ_CONTEXT) -> *mut PJ) -> Result<IdentifiedObject> {
        let raw = self.raw_build(kind, f)?;
        IdentifiedObject::from_owned_ptr(&self.ctx, raw.take(), kind)
    }
}

struct ScratchFrame<'a> {
    datum_name: &'a str,
    ellipsoid_name: &'a str,
    semi_major_metre: f64,
    inverse_flattening: f64,
    meridian_name: &'a str,
    meridian_longitude: f64,
    meridian_unit_name: &'a str,
    meridian_to_radian: f64,
}

fn resolve_unit(unit: i32, expected: UnitType, kind: ObjectType) -> Result<UnitOfMeasure> {
    let resolved =
        UnitOfMeasure::resolve(unit).ok_or_else(|| Error::Factory(format!("unknown unit identifier {unit}")))?;
    if expected != UnitType::Unknown && resolved.unit_type != expected {
        return Err(Error::Factory(format!(
            "{kind:?} construction needs a {expected:?} unit, \"{}\" is {:?}",
            resolved.name, resolved.unit_type
        )));
    }
    Ok(resolved)
}

fn component<'a>(
    components: &[&'a IdentifiedObject],
    index: usize,
    kind: ObjectType,
    accepts: fn(ObjectType) -> bool,
    role: &str,
) -> Result<&'a IdentifiedObject> {
    let object = components
        .get(index)
        .ok_or_else(|| Error::Factory(format!("{kind:?} construction is missing the {role} component")))?;
    if !accepts(object.kind()) {
        return Err(Error::Factory(format!(
            "{kind:?} construction expects a {role} at component {index}, got {:?}",
            object.kind()
        )));
    }
    Ok(object)
}

fn double(doubles: &[f64], index: usize, kind: ObjectType, role: &str) -> Result<f64> {
    doubles
        .get(index)
        .copied()
        .ok_or_else(|| Error::Factory(format!("{kind:?} construction is missing the {role} value")))
}

fn linear_axis_unit(cs: &IdentifiedObject, kind: ObjectType) -> Result<UnitOfMeasure> {
    let unit = cs.axis(0)?.unit;
    if unit.unit_type != UnitType::Linear {
        return Err(Error::Factory(format!(
            "{kind:?} construction needs a coordinate system with linear axes, \"{}\" is {:?}",
            unit.name, unit.unit_type
        )));
    }
    Ok(unit)
}

fn optional_cstring(text: Option<&str>) -> Result<Option<CString>> {
    Ok(text.map(CString::new).transpose()?)
}

fn ptr_or_null(text: &Option<CString>) -> *const c_char {
    text.as_ref().map_or(std::ptr::null(), |t| t.as_ptr())
}

/// Axis descriptions in the engine's layout, the C strings stay alive in
/// `texts` while the engine reads the entries.
struct AxisDescriptions {
    #[allow(dead_code)]
    texts: Vec<CString>,
    entries: Vec<experimental::PJ_AXIS_DESCRIPTION>,
}

impl AxisDescriptions {
    fn new(axes: &[Axis]) -> Result<AxisDescriptions> {
        let mut texts = Vec::with_capacity(axes.len() * 4);
        for axis in axes {
            texts.push(CString::new(axis.name.as_str())?);
            texts.push(CString::new(axis.abbreviation.as_str())?);
            texts.push(CString::new(axis.direction.as_str())?);
            texts.push(CString::new(axis.unit.name.as_str())?);
        }
        let mut entries = Vec::with_capacity(axes.len());
        for (index, axis) in axes.iter().enumerate() {
            let unit_type = axis.unit.unit_type.engine_unit_type().ok_or_else(|| {
                Error::Factory(format!(
                    "axis \"{}\" carries a unit without a known kind",
                    axis.abbreviation
                ))
            })?;
            entries.push(experimental::PJ_AXIS_DESCRIPTION {
                name: texts[index * 4].as_ptr().cast_mut(),
                abbreviation: texts[index * 4 + 1].as_ptr().cast_mut(),
                direction: texts[index * 4 + 2].as_ptr().cast_mut(),
                unit_name: texts[index * 4 + 3].as_ptr().cast_mut(),
                unit_conv_factor: axis.unit.to_base,
                unit_type,
            });
        }
        Ok(AxisDescriptions { texts, entries })
    }

    fn as_ptr(&self) -> *const experimental::PJ_AXIS_DESCRIPTION {
        self.entries.as_ptr()
    }
}

/// Parameter descriptions for the conversion constructor, same keep alive
/// scheme as [`AxisDescriptions`].
struct ParamDescriptions {
    #[allow(dead_code)]
    texts: Vec<ParamText>,
    entries: Vec<experimental::PJ_PARAM_DESCRIPTION>,
}

struct ParamText {
    name: CString,
    authority: Option<CString>,
    code: Option<CString>,
    unit_name: Option<CString>,
}

impl ParamDescriptions {
    fn new(parameters: &[Parameter]) -> Result<ParamDescriptions> {
        let mut texts = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            if parameter.kind != ParameterKind::Measure {
                return Err(Error::Factory(format!(
                    "conversion parameter \"{}\" has kind {:?}, the engine constructor takes measures only",
                    parameter.name, parameter.kind
                )));
            }
            texts.push(ParamText {
                name: CString::new(parameter.name.as_str())?,
                authority: optional_cstring(parameter.authority.as_deref())?,
                code: optional_cstring(parameter.code.as_deref())?,
                unit_name: match &parameter.unit {
                    Some(unit) => Some(CString::new(unit.name.as_str())?),
                    None => None,
                },
            });
        }
        let mut entries = Vec::with_capacity(parameters.len());
        for (parameter, text) in parameters.iter().zip(&texts) {
            let (unit_conv_factor, unit_type) = match &parameter.unit {
                Some(unit) => (
                    unit.to_base,
                    unit.unit_type.engine_unit_type().ok_or_else(|| {
                        Error::Factory(format!(
                            "conversion parameter \"{}\" carries a unit without a known kind",
                            parameter.name
                        ))
                    })?,
                ),
                // unitless parameters cross as scale unity
                None => (1.0, experimental::PJ_UT_SCALE),
            };
            entries.push(experimental::PJ_PARAM_DESCRIPTION {
                name: text.name.as_ptr(),
                auth_name: ptr_or_null(&text.authority),
                code: ptr_or_null(&text.code),
                value: parameter.numeric_value,
                unit_name: text.unit_name.as_ref().map_or(c"unity".as_ptr(), |unit| unit.as_ptr()),
                unit_conv_factor,
                unit_type,
            });
        }
        Ok(ParamDescriptions { texts, entries })
    }

    fn as_ptr(&self) -> *const experimental::PJ_PARAM_DESCRIPTION {
        self.entries.as_ptr()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::Property;

    fn factory() -> (Context, ObjectFactory) {
        let context = Context::new().expect("context creation");
        let factory = ObjectFactory::new(&context);
        (context, factory)
    }

    fn degree_axis(name: &str, abbreviation: &str, direction: &str) -> Axis {
        let degree = UnitOfMeasure::predefined(units::DEGREE).expect("predefined degree");
        Axis::new(name, abbreviation, direction, degree)
    }

    fn metre_axis(name: &str, abbreviation: &str, direction: &str) -> Axis {
        let metre = UnitOfMeasure::predefined(units::METRE).expect("predefined metre");
        Axis::new(name, abbreviation, direction, metre)
    }

    #[test]
    fn prime_meridian_in_its_own_unit() {
        let (_context, factory) = factory();
        let paris = factory
            .create(
                ObjectType::PrimeMeridian,
                &ObjectProperties::named("Paris"),
                &[],
                &[],
                &[2.5969213],
                units::GRAD,
            )
            .expect("prime meridian construction");

        assert_eq!(paris.kind(), ObjectType::PrimeMeridian);
        assert_eq!(paris.name_string().expect("name access"), Some(String::from("Paris")));
        let longitude = paris.numeric_property(Property::Greenwich).expect("longitude access");
        assert_relative_eq!(longitude, 2.5969213);
    }

    #[test]
    fn ellipsoid_from_inverse_flattening() {
        let (_context, factory) = factory();
        let ellipsoid = factory
            .create(
                ObjectType::Ellipsoid,
                &ObjectProperties::named("WGS 84"),
                &[],
                &[],
                &[6378137.0, 0.0, 298.257223563],
                units::METRE,
            )
            .expect("ellipsoid construction");

        assert_eq!(ellipsoid.kind(), ObjectType::Ellipsoid);
        assert_eq!(ellipsoid.numeric_property(Property::SemiMajor).expect("semi major"), 6378137.0);
        assert_relative_eq!(
            ellipsoid.numeric_property(Property::InverseFlattening).expect("flattening"),
            298.257223563
        );
        assert!(ellipsoid.boolean_property(Property::IvfDefinitive).expect("definitive flag"));
    }

    #[test]
    fn ellipsoid_from_two_axes() {
        let (_context, factory) = factory();
        let ellipsoid = factory
            .create(
                ObjectType::Ellipsoid,
                &ObjectProperties::named("two axis"),
                &[],
                &[],
                &[6378137.0, 6356752.314245179],
                units::METRE,
            )
            .expect("ellipsoid construction");

        let semi_minor = ellipsoid.numeric_property(Property::SemiMinor).expect("semi minor");
        assert_relative_eq!(semi_minor, 6356752.314245179, max_relative = 1e-12);
        assert!(!ellipsoid.boolean_property(Property::IsSphere).expect("sphere probe"));
    }

    #[test]
    fn sphere_from_equal_axes() {
        let (_context, factory) = factory();
        let sphere = factory
            .create(
                ObjectType::Ellipsoid,
                &ObjectProperties::named("sphere"),
                &[],
                &[],
                &[6371000.0, 6371000.0],
                units::METRE,
            )
            .expect("sphere construction");

        assert!(sphere.boolean_property(Property::IsSphere).expect("sphere probe"));
    }

    #[test]
    fn cartesian_cs_checks_the_axis_count() {
        let (_context, factory) = factory();
        let one_axis = [metre_axis("Easting", "E", "east")];
        let result = factory.create(ObjectType::CartesianCs, &ObjectProperties::default(), &[], &one_axis, &[], 0);
        match result {
            Err(Error::Factory(message)) => {
                assert!(message.contains("2 or 3 axes"), "unexpected message: {message}")
            }
            other => panic!("expected a factory error, got {other:?}"),
        }

        let plane = [metre_axis("Easting", "E", "east"), metre_axis("Northing", "N", "north")];
        let cs = factory
            .create(ObjectType::CartesianCs, &ObjectProperties::default(), &[], &plane, &[], 0)
            .expect("cartesian construction");
        assert_eq!(cs.kind(), ObjectType::CartesianCs);
        assert_eq!(cs.axis_count().expect("axis count"), 2);
    }

    #[test]
    fn geodetic_frame_from_components() {
        let (_context, factory) = factory();
        let ellipsoid = factory
            .create(
                ObjectType::Ellipsoid,
                &ObjectProperties::named("WGS 84"),
                &[],
                &[],
                &[6378137.0, 0.0, 298.257223563],
                units::METRE,
            )
            .expect("ellipsoid construction");
        let greenwich = factory
            .create(
                ObjectType::PrimeMeridian,
                &ObjectProperties::named("Greenwich"),
                &[],
                &[],
                &[0.0],
                units::DEGREE,
            )
            .expect("prime meridian construction");

        let frame = factory
            .create(
                ObjectType::GeodeticReferenceFrame,
                &ObjectProperties::named("World Geodetic System 1984"),
                &[&ellipsoid, &greenwich],
                &[],
                &[],
                0,
            )
            .expect("frame construction");

        assert_eq!(frame.kind(), ObjectType::GeodeticReferenceFrame);
        assert_eq!(
            frame.name_string().expect("name access"),
            Some(String::from("World Geodetic System 1984"))
        );
        let carried = frame.object_property(Property::Ellipsoid).expect("ellipsoid access");
        let carried = carried.expect("frame carries its ellipsoid");
        assert_eq!(carried.numeric_property(Property::SemiMajor).expect("semi major"), 6378137.0);
    }

    #[test]
    fn component_mismatch_is_a_factory_error() {
        let (_context, factory) = factory();
        let greenwich = factory
            .create(
                ObjectType::PrimeMeridian,
                &ObjectProperties::named("Greenwich"),
                &[],
                &[],
                &[0.0],
                units::DEGREE,
            )
            .expect("prime meridian construction");

        // components swapped, the meridian sits in the ellipsoid slot
        let result = factory.create(
            ObjectType::GeodeticReferenceFrame,
            &ObjectProperties::named("broken"),
            &[&greenwich, &greenwich],
            &[],
            &[],
            0,
        );
        match result {
            Err(Error::Factory(message)) => {
                assert!(message.contains("ellipsoid"), "unexpected message: {message}")
            }
            other => panic!("expected a factory error, got {other:?}"),
        }
    }

    #[test]
    fn angular_unit_required_for_meridians() {
        let (_context, factory) = factory();
        let result = factory.create(
            ObjectType::PrimeMeridian,
            &ObjectProperties::named("broken"),
            &[],
            &[],
            &[0.0],
            units::METRE,
        );
        assert!(matches!(result, Err(Error::Factory(message)) if message.contains("Angular")));

        let unknown = factory.create(
            ObjectType::PrimeMeridian,
            &ObjectProperties::named("broken"),
            &[],
            &[],
            &[0.0],
            9999,
        );
        assert!(matches!(unknown, Err(Error::Factory(message)) if message.contains("9999")));
    }

    #[test]
    fn unsupported_kinds_are_named() {
        let (_context, factory) = factory();
        let properties = ObjectProperties::named("nope");
        let temporal = factory.create(ObjectType::TemporalDatum, &properties, &[], &[], &[], 0);
        assert!(matches!(temporal, Err(Error::Factory(message)) if message.contains("TemporalDatum")));

        let transformation = factory.create(ObjectType::Transformation, &properties, &[], &[], &[], 0);
        assert!(matches!(transformation, Err(Error::Factory(message)) if message.contains("Transformation")));
    }

    #[test]
    fn defining_conversion_carries_its_parameters() {
        let (_context, factory) = factory();
        let degree = UnitOfMeasure::predefined(units::DEGREE).expect("predefined degree");
        let metre = UnitOfMeasure::predefined(units::METRE).expect("predefined metre");
        let unity = UnitOfMeasure::predefined(units::SCALE_UNITY).expect("predefined unity");
        let measure = |name: &str, value: f64, unit: &UnitOfMeasure| Parameter {
            name: String::from(name),
            authority: None,
            code: None,
            kind: ParameterKind::Measure,
            numeric_value: value,
            text_value: None,
            unit: Some(unit.clone()),
        };

        let method = OperationMethod {
            name: String::from("Transverse Mercator"),
            authority: Some(String::from("EPSG")),
            code: Some(String::from("9807")),
        };
        let parameters = [
            measure("Latitude of natural origin", 0.0, &degree),
            measure("Longitude of natural origin", 9.0, &degree),
            measure("Scale factor at natural origin", 0.9996, &unity),
            measure("False easting", 500000.0, &metre),
            measure("False northing", 0.0, &metre),
        ];

        let conversion = factory
            .create_conversion(&ObjectProperties::named("UTM zone 32N"), &method, &parameters)
            .expect("conversion construction");

        assert_eq!(conversion.kind(), ObjectType::Conversion);
        assert_eq!(conversion.parameter_count().expect("parameter count"), 5);
        let scale = conversion
            .search_parameter("scale factor at natural origin")
            .expect("parameter search")
            .expect("scale parameter present");
        assert_relative_eq!(scale.value().expect("measure kind"), 0.9996);

        let method = conversion.method().expect("method access").expect("method present");
        assert_eq!(method.name, "Transverse Mercator");
    }

    #[test]
    fn axis_values_resolve_their_unit() {
        let (_context, factory) = factory();
        let axis = factory
            .create_axis("Gravity-related height", "H", "up", units::METRE)
            .expect("axis construction");
        assert_eq!(axis.unit.name, "metre");
        assert_eq!(axis.direction, "up");

        let unknown = factory.create_axis("Gravity-related height", "H", "up", 1234);
        assert!(matches!(unknown, Err(Error::Factory(message)) if message.contains("1234")));
    }
}
