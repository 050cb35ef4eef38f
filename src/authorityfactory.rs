//! Lookups against the authority database and operation candidate search.
//!
//! An [`AuthorityFactory`] is bound to one authority name and the context it
//! was created under. Lookups go through the most specific database category
//! the engine offers for the requested kind, results pass through subclass
//! refinement and register in the context's wrapper registry so repeated
//! lookups of one code share a wrapper.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::rc::Rc;

use proj_sys::{PJ, PJ_CONTEXT};

use crate::context::{Context, ContextInner};
use crate::projinterop;
use crate::units::{UnitOfMeasure, UnitType};
use crate::{Error, IdentifiedObject, ObjectType, Result};

/// How the extents of the source and target CRS enter candidate filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrsExtentUse {
    None,
    Both,
    Intersection,
    Smallest,
}

impl CrsExtentUse {
    fn engine_value(self) -> proj_sys::PROJ_CRS_EXTENT_USE {
        match self {
            CrsExtentUse::None => proj_sys::PROJ_CRS_EXTENT_USE_PROJ_CRS_EXTENT_NONE,
            CrsExtentUse::Both => proj_sys::PROJ_CRS_EXTENT_USE_PROJ_CRS_EXTENT_BOTH,
            CrsExtentUse::Intersection => proj_sys::PROJ_CRS_EXTENT_USE_PROJ_CRS_EXTENT_INTERSECTION,
            CrsExtentUse::Smallest => proj_sys::PROJ_CRS_EXTENT_USE_PROJ_CRS_EXTENT_SMALLEST,
        }
    }
}

/// How candidate areas are compared against the area of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialCriterion {
    StrictContainment,
    PartialIntersection,
}

impl SpatialCriterion {
    fn engine_value(self) -> proj_sys::PROJ_SPATIAL_CRITERION {
        match self {
            SpatialCriterion::StrictContainment => {
                proj_sys::PROJ_SPATIAL_CRITERION_PROJ_SPATIAL_CRITERION_STRICT_CONTAINMENT
            }
            SpatialCriterion::PartialIntersection => {
                proj_sys::PROJ_SPATIAL_CRITERION_PROJ_SPATIAL_CRITERION_PARTIAL_INTERSECTION
            }
        }
    }
}

/// How the presence of datum shift grids affects candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAvailabilityUse {
    UsedForSorting,
    DiscardOperationIfMissingGrid,
    Ignored,
    KnownAvailable,
}

impl GridAvailabilityUse {
    fn engine_value(self) -> proj_sys::PROJ_GRID_AVAILABILITY_USE {
        match self {
            GridAvailabilityUse::UsedForSorting => {
                proj_sys::PROJ_GRID_AVAILABILITY_USE_PROJ_GRID_AVAILABILITY_USED_FOR_SORTING
            }
            GridAvailabilityUse::DiscardOperationIfMissingGrid => {
                proj_sys::PROJ_GRID_AVAILABILITY_USE_PROJ_GRID_AVAILABILITY_DISCARD_OPERATION_IF_MISSING_GRID
            }
            GridAvailabilityUse::Ignored => {
                proj_sys::PROJ_GRID_AVAILABILITY_USE_PROJ_GRID_AVAILABILITY_IGNORED
            }
            GridAvailabilityUse::KnownAvailable => {
                proj_sys::PROJ_GRID_AVAILABILITY_USE_PROJ_GRID_AVAILABILITY_KNOWN_AVAILABLE
            }
        }
    }
}

/// Whether a pivot CRS may be inserted between source and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntermediateCrsUse {
    Always,
    IfNoDirectTransformation,
    Never,
}

impl IntermediateCrsUse {
    fn engine_value(self) -> proj_sys::PROJ_INTERMEDIATE_CRS_USE {
        match self {
            IntermediateCrsUse::Always => proj_sys::PROJ_INTERMEDIATE_CRS_USE_PROJ_INTERMEDIATE_CRS_USE_ALWAYS,
            IntermediateCrsUse::IfNoDirectTransformation => {
                proj_sys::PROJ_INTERMEDIATE_CRS_USE_PROJ_INTERMEDIATE_CRS_USE_IF_NO_DIRECT_TRANSFORMATION
            }
            IntermediateCrsUse::Never => proj_sys::PROJ_INTERMEDIATE_CRS_USE_PROJ_INTERMEDIATE_CRS_USE_NEVER,
        }
    }
}

/// Policies for the operation candidate search. Unset fields keep the
/// engine's defaults.
///
/// The candidate ranking is the engine's: descending overlap with the area
/// of interest, then ascending accuracy, operations of unknown accuracy
/// last.
#[derive(Debug, Clone, Default)]
pub struct OperationSearch {
    /// Desired accuracy in metres, 0.0 accepts the best available.
    pub desired_accuracy: Option<f64>,
    /// [west, south, east, north] in degrees. A degenerate box (no extent in
    /// either direction) is ignored.
    pub area_of_interest: Option<[f64; 4]>,
    pub crs_extent_use: Option<CrsExtentUse>,
    pub spatial_criterion: Option<SpatialCriterion>,
    pub grid_availability: Option<GridAvailabilityUse>,
    pub intermediate_crs_use: Option<IntermediateCrsUse>,
    pub allow_ballpark: Option<bool>,
    pub discard_superseded: Option<bool>,
}

/// Builds referencing objects from authority codes.
pub struct AuthorityFactory {
    authority: String,
    ctx: Rc<ContextInner>,
}

impl AuthorityFactory {
    /// Binds a factory to one authority of the context's database.
    ///
    /// The database is opened on the spot when this is the first use.
    pub fn new(context: &Context, authority: &str) -> Result<AuthorityFactory> {
        context.inner().ensure_database()?;
        log::debug!(
            "authority factory for \"{}\", context shared {} times",
            authority,
            context.inner().share_count()
        );
        Ok(AuthorityFactory {
            authority: String::from(authority),
            ctx: context.inner().clone(),
        })
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Looks up the object behind a code.
    ///
    /// The requested kind selects the database category (CRS kinds search
    /// the CRS tables, datum kinds the datum tables, and so on);
    /// [`ObjectType::Any`] probes the categories in turn. The wrapper carries
    /// the kind the engine reports, and a result that does not satisfy the
    /// requested kind is a factory error. A code the authority does not know
    /// is [`Error::NoSuchAuthorityCode`] with both fields preserved.
    pub fn create_object(&self, kind: ObjectType, code: &str) -> Result<IdentifiedObject> {
        if kind == ObjectType::UnitOfMeasure {
            return Err(Error::Factory(String::from(
                "units are values, lookup goes through unit_of_measure",
            )));
        }
        if kind.is_value_kind() {
            return Err(Error::Factory(format!(
                "{kind:?} objects cross the engine interface by value and cannot be looked up",
            )));
        }
        if kind.is_coordinate_system() {
            return Err(Error::Factory(String::from(
                "the engine interface cannot look up coordinate systems by code",
            )));
        }

        let ptr = self.lookup(kind, code)?;
        let object = IdentifiedObject::from_authority(&self.ctx, ptr, kind, &self.authority, code)?;
        if !satisfies(kind, object.kind()) {
            return Err(Error::Factory(format!(
                "{}:{code} is a {:?}, not a {kind:?}",
                self.authority,
                object.kind()
            )));
        }
        Ok(object)
    }

    /// The display name of the object behind a code, `None` when the object
    /// exists but carries no name.
    pub fn description(&self, code: &str) -> Result<Option<String>> {
        let object = self.create_object(ObjectType::Any, code)?;
        object.name_string()
    }

    /// Looks up a unit of measure, reported by value.
    ///
    /// The identifier of the returned unit is the predefined one when the
    /// database entry matches a predefined unit, -1 otherwise.
    pub fn unit_of_measure(&self, code: &str) -> Result<UnitOfMeasure> {
        self.ctx.ensure_database()?;
        let ctx = self.ctx.ptr()?;
        let authority = CString::new(self.authority.as_str())?;
        let code_text = CString::new(code)?;
        let mut name: *const c_char = std::ptr::null();
        let mut to_base = 0.0;
        let mut category: *const c_char = std::ptr::null();
        let ok = unsafe {
            proj_sys::proj_uom_get_info_from_database(
                ctx,
                authority.as_ptr(),
                code_text.as_ptr(),
                &mut name,
                &mut to_base,
                &mut category,
            )
        };
        if ok == 0 {
            return Err(Error::NoSuchAuthorityCode {
                authority: self.authority.clone(),
                code: String::from(code),
            });
        }
        let unit_type = match projinterop::opt_string(category) {
            Some(category) => UnitType::from_category(&category),
            None => UnitType::Unknown,
        };
        Ok(UnitOfMeasure::from_engine(projinterop::opt_string(name), to_base, unit_type))
    }

    /// All operation candidates between two CRS, in the engine's ranking.
    pub fn find_operations(
        &self,
        source: &IdentifiedObject,
        target: &IdentifiedObject,
        search: &OperationSearch,
    ) -> Result<Vec<IdentifiedObject>> {
        if !source.kind().is_crs() || !target.kind().is_crs() {
            return Err(Error::InvalidArgument(format!(
                "operation search goes between two CRS, got {:?} and {:?}",
                source.kind(),
                target.kind()
            )));
        }
        self.ctx.ensure_database()?;
        let ctx = self.ctx.ptr()?;
        let source_ptr = source.ptr()?;
        let target_ptr = target.ptr()?;

        let authority = CString::new(self.authority.as_str())?;
        let factory_ctx = unsafe { proj_sys::proj_create_operation_factory_context(ctx, authority.as_ptr()) };
        if factory_ctx.is_null() {
            return Err(Error::Factory(format!(
                "operation search context: {}",
                projinterop::last_error_message(ctx)
            )));
        }
        unsafe {
            if let Some(accuracy) = search.desired_accuracy {
                proj_sys::proj_operation_factory_context_set_desired_accuracy(ctx, factory_ctx, accuracy);
            }
            if let Some([west, south, east, north]) = search.area_of_interest
                && (north > south || east > west)
            {
                proj_sys::proj_operation_factory_context_set_area_of_interest(
                    ctx,
                    factory_ctx,
                    west,
                    south,
                    east,
                    north,
                );
            }
            if let Some(extent_use) = search.crs_extent_use {
                proj_sys::proj_operation_factory_context_set_crs_extent_use(
                    ctx,
                    factory_ctx,
                    extent_use.engine_value(),
                );
            }
            if let Some(criterion) = search.spatial_criterion {
                proj_sys::proj_operation_factory_context_set_spatial_criterion(
                    ctx,
                    factory_ctx,
                    criterion.engine_value(),
                );
            }
            if let Some(grids) = search.grid_availability {
                proj_sys::proj_operation_factory_context_set_grid_availability_use(
                    ctx,
                    factory_ctx,
                    grids.engine_value(),
                );
            }
            if let Some(pivot) = search.intermediate_crs_use {
                proj_sys::proj_operation_factory_context_set_allow_use_intermediate_crs(
                    ctx,
                    factory_ctx,
                    pivot.engine_value(),
                );
            }
            if let Some(ballpark) = search.allow_ballpark {
                proj_sys::proj_operation_factory_context_set_allow_ballpark_transformations(
                    ctx,
                    factory_ctx,
                    c_int::from(ballpark),
                );
            }
            if let Some(superseded) = search.discard_superseded {
                proj_sys::proj_operation_factory_context_set_discard_superseded(
                    ctx,
                    factory_ctx,
                    c_int::from(superseded),
                );
            }
        }

        let list = unsafe { proj_sys::proj_create_operations(ctx, source_ptr, target_ptr, factory_ctx) };
        unsafe { proj_sys::proj_operation_factory_context_destroy(factory_ctx) };
        if list.is_null() {
            return Err(Error::Factory(format!(
                "operation search: {}",
                projinterop::last_error_message(ctx)
            )));
        }
        let list = ObjList { ptr: list };

        let count = list.count().max(0);
        let mut operations = Vec::with_capacity(count as usize);
        for index in 0..count {
            let ptr = list.get(ctx, index);
            let ptr = projinterop::check_pointer(ctx, ptr, "proj_list_get")?;
            operations.push(IdentifiedObject::from_owned_ptr(
                &self.ctx,
                ptr,
                ObjectType::CoordinateOperation,
            )?);
        }
        Ok(operations)
    }

    /// The highest ranked operation candidate between two CRS.
    pub fn create_operation(
        &self,
        source: &IdentifiedObject,
        target: &IdentifiedObject,
        search: &OperationSearch,
    ) -> Result<IdentifiedObject> {
        let mut operations = self.find_operations(source, target, search)?;
        if operations.is_empty() {
            let from = source.name_string()?.unwrap_or_else(|| String::from("unnamed"));
            let to = target.name_string()?.unwrap_or_else(|| String::from("unnamed"));
            return Err(Error::Factory(format!(
                "no coordinate operation found from \"{from}\" to \"{to}\""
            )));
        }
        Ok(operations.remove(0))
    }

    fn lookup(&self, kind: ObjectType, code: &str) -> Result<*mut PJ> {
        self.ctx.ensure_database()?;
        let ctx = self.ctx.ptr()?;
        let authority = CString::new(self.authority.as_str())?;
        let code_text = CString::new(code)?;

        let not_found = || Error::NoSuchAuthorityCode {
            authority: self.authority.clone(),
            code: String::from(code),
        };

        if kind == ObjectType::Any {
            for category in PROBE_SEQUENCE {
                let ptr = from_database(ctx, &authority, &code_text, *category);
                if !ptr.is_null() {
                    return Ok(ptr);
                }
            }
            return Err(not_found());
        }

        let category = category_for(kind).ok_or_else(|| {
            Error::Factory(format!("{kind:?} has no lookup category in the authority database"))
        })?;
        let ptr = from_database(ctx, &authority, &code_text, category);
        if ptr.is_null() { Err(not_found()) } else { Ok(ptr) }
    }
}

struct ObjList {
    ptr: *mut proj_sys::PJ_OBJ_LIST,
}

impl ObjList {
    fn count(&self) -> c_int {
        unsafe { proj_sys::proj_list_get_count(self.ptr) }
    }

    fn get(&self, ctx: *mut PJ_CONTEXT, index: c_int) -> *mut PJ {
        unsafe { proj_sys::proj_list_get(ctx, self.ptr, index) }
    }
}

impl Drop for ObjList {
    fn drop(&mut self) {
        unsafe { proj_sys::proj_list_destroy(self.ptr) };
    }
}

// categories probed for ObjectType::Any, CRS first because codes are looked
// up as a CRS far more often than as anything else
const PROBE_SEQUENCE: &[proj_sys::PJ_CATEGORY] = &[
    proj_sys::PJ_CATEGORY_PJ_CATEGORY_CRS,
    proj_sys::PJ_CATEGORY_PJ_CATEGORY_COORDINATE_OPERATION,
    proj_sys::PJ_CATEGORY_PJ_CATEGORY_DATUM,
    proj_sys::PJ_CATEGORY_PJ_CATEGORY_DATUM_ENSEMBLE,
    proj_sys::PJ_CATEGORY_PJ_CATEGORY_ELLIPSOID,
    proj_sys::PJ_CATEGORY_PJ_CATEGORY_PRIME_MERIDIAN,
];

fn category_for(kind: ObjectType) -> Option<proj_sys::PJ_CATEGORY> {
    match kind {
        k if k.is_crs() => Some(proj_sys::PJ_CATEGORY_PJ_CATEGORY_CRS),
        ObjectType::DatumEnsemble => Some(proj_sys::PJ_CATEGORY_PJ_CATEGORY_DATUM_ENSEMBLE),
        k if k.is_datum() => Some(proj_sys::PJ_CATEGORY_PJ_CATEGORY_DATUM),
        k if k.is_operation() => Some(proj_sys::PJ_CATEGORY_PJ_CATEGORY_COORDINATE_OPERATION),
        ObjectType::Ellipsoid => Some(proj_sys::PJ_CATEGORY_PJ_CATEGORY_ELLIPSOID),
        ObjectType::PrimeMeridian => Some(proj_sys::PJ_CATEGORY_PJ_CATEGORY_PRIME_MERIDIAN),
        _ => None,
    }
}

fn from_database(ctx: *mut PJ_CONTEXT, authority: &CString, code: &CString, category: proj_sys::PJ_CATEGORY) -> *mut PJ {
    unsafe {
        proj_sys::proj_create_from_database(
            ctx,
            authority.as_ptr(),
            code.as_ptr(),
            category,
            0,
            std::ptr::null(),
        )
    }
}

/// Whether the kind the engine reports satisfies the requested one.
fn satisfies(requested: ObjectType, actual: ObjectType) -> bool {
    if requested == actual {
        return true;
    }
    match requested {
        ObjectType::Any => true,
        ObjectType::Crs => actual.is_crs(),
        ObjectType::Datum => actual.is_datum(),
        ObjectType::CoordinateOperation => actual.is_operation(),
        ObjectType::GeodeticCrs => matches!(
            actual,
            ObjectType::GeographicCrs | ObjectType::GeocentricCrs | ObjectType::GeodeticCrs
        ),
        _ => false,
    }
}
