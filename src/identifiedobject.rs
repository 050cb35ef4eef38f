use std::rc::Rc;

use proj_sys::{PJ, PJ_CONTEXT};

use crate::context::ContextInner;
use crate::handle::RawObject;
use crate::objectcache::RegistryKey;
use crate::objecttype::{self, ObjectType};
use crate::projinterop;
use crate::{Error, Result};

/// How strictly [`IdentifiedObject::is_equivalent_to`] compares two objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonCriterion {
    Strict,
    Equivalent,
    EquivalentExceptAxisOrder,
}

impl ComparisonCriterion {
    fn engine_criterion(self) -> proj_sys::PJ_COMPARISON_CRITERION {
        match self {
            ComparisonCriterion::Strict => proj_sys::PJ_COMPARISON_CRITERION_PJ_COMP_STRICT,
            ComparisonCriterion::Equivalent => proj_sys::PJ_COMPARISON_CRITERION_PJ_COMP_EQUIVALENT,
            ComparisonCriterion::EquivalentExceptAxisOrder => {
                proj_sys::PJ_COMPARISON_CRITERION_PJ_COMP_EQUIVALENT_EXCEPT_AXIS_ORDER_GEOGCRS
            }
        }
    }
}

pub(crate) struct ObjectInner {
    // declared before the context so the native reference is destroyed while
    // its context is still alive
    pub(crate) handle: RawObject,
    pub(crate) kind: ObjectType,
    pub(crate) ctx: Rc<ContextInner>,
}

/// A referencing object of the engine: a CRS, datum, ellipsoid, prime
/// meridian, coordinate system or coordinate operation.
///
/// Cloning shares the wrapper; the native reference is destroyed when the
/// last clone drops or when [`IdentifiedObject::release`] is called
/// explicitly, whichever comes first. After a release every native access
/// reports [`Error::NullHandle`], the cached [`ObjectType`] stays readable.
#[derive(Clone)]
pub struct IdentifiedObject {
    inner: Rc<ObjectInner>,
}

impl IdentifiedObject {
    /// Wraps a pointer the engine handed over, refining the declared kind to
    /// the most specific one the engine reports.
    ///
    /// Ownership transfers immediately, so the reference is destroyed and not
    /// leaked when wrapper construction fails.
    pub(crate) fn from_owned_ptr(ctx: &Rc<ContextInner>, ptr: *mut PJ, declared: ObjectType) -> Result<IdentifiedObject> {
        let handle = RawObject::adopt(ptr);
        let ctx_ptr = ctx.ptr()?;
        let kind = objecttype::refine(ctx_ptr, ptr, declared);
        Ok(IdentifiedObject {
            inner: Rc::new(ObjectInner {
                handle,
                kind,
                ctx: Rc::clone(ctx),
            }),
        })
    }

    /// Wraps an authority lookup result, going through the context's wrapper
    /// registry so one code resolves to one shared wrapper.
    pub(crate) fn from_authority(
        ctx: &Rc<ContextInner>,
        ptr: *mut PJ,
        declared: ObjectType,
        authority: &str,
        code: &str,
    ) -> Result<IdentifiedObject> {
        let handle = RawObject::adopt(ptr);
        let ctx_ptr = ctx.ptr()?;
        let kind = objecttype::refine(ctx_ptr, ptr, declared);
        let key = RegistryKey {
            authority: String::from(authority),
            code: String::from(code),
            kind,
        };

        if let Some(existing) = ctx.registry.find(&key) {
            // this code already has a live wrapper, the fresh native
            // reference is redundant
            drop(handle);
            return Ok(IdentifiedObject { inner: existing });
        }

        let inner = Rc::new(ObjectInner {
            handle,
            kind,
            ctx: Rc::clone(ctx),
        });
        ctx.registry.register(key, &inner);
        Ok(IdentifiedObject { inner })
    }

    /// The runtime kind resolved when the wrapper was built.
    pub fn kind(&self) -> ObjectType {
        self.inner.kind
    }

    /// The native pointer value for identity probes and diagnostics, 0 after
    /// release.
    pub fn raw_address(&self) -> usize {
        self.inner.handle.address()
    }

    /// Whether two values are handles to the same wrapper.
    pub fn same_wrapper(&self, other: &IdentifiedObject) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Destroys the native reference now instead of at drop time, including
    /// for all clones of this wrapper. Releasing twice is a no-op.
    pub fn release(&self) {
        self.inner.handle.release();
    }

    pub fn is_equivalent_to(&self, other: &IdentifiedObject, criterion: ComparisonCriterion) -> Result<bool> {
        let ctx = self.inner.ctx.ptr()?;
        let this = self.inner.handle.get()?;
        let that = other.inner.handle.get()?;
        let equivalent =
            unsafe { proj_sys::proj_is_equivalent_to_with_ctx(ctx, this, that, criterion.engine_criterion()) };
        Ok(equivalent != 0)
    }

    /// The inverse of a coordinate operation.
    pub fn inverse(&self) -> Result<IdentifiedObject> {
        if !self.inner.kind.is_operation() {
            return Err(Error::InvalidArgument(format!(
                "{:?} is not a coordinate operation",
                self.inner.kind
            )));
        }

        let ctx = self.inner.ctx.ptr()?;
        let ptr = self.inner.handle.get()?;
        let inverse = unsafe { proj_sys::proj_coordoperation_create_inverse(ctx, ptr) };
        if inverse.is_null() {
            return Err(Error::NonInvertible(projinterop::last_error_message(ctx)));
        }

        IdentifiedObject::from_owned_ptr(&self.inner.ctx, inverse, ObjectType::CoordinateOperation)
    }

    /// The variant of a CRS or operation with axes in visualization order
    /// (longitude before latitude, east before north).
    pub fn normalize_for_visualization(&self) -> Result<IdentifiedObject> {
        let ctx = self.inner.ctx.ptr()?;
        let ptr = self.inner.handle.get()?;
        let normalized = unsafe { proj_sys::proj_normalize_for_visualization(ctx, ptr) };
        if normalized.is_null() {
            return Err(Error::InvalidArgument(projinterop::last_error_message(ctx)));
        }

        IdentifiedObject::from_owned_ptr(&self.inner.ctx, normalized, self.inner.kind)
    }

    pub(crate) fn ptr(&self) -> Result<*mut PJ> {
        self.inner.handle.get()
    }

    pub(crate) fn ctx_ptr(&self) -> Result<*mut PJ_CONTEXT> {
        self.inner.ctx.ptr()
    }

    pub(crate) fn ctx(&self) -> &Rc<ContextInner> {
        &self.inner.ctx
    }
}

impl std::fmt::Debug for IdentifiedObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifiedObject")
            .field("kind", &self.inner.kind)
            .field("address", &format_args!("{:#x}", self.raw_address()))
            .finish()
    }
}
