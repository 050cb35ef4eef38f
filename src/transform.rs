//! Executes coordinate operations over interleaved coordinate buffers.

use std::ffi::CString;
use std::rc::Rc;

use crate::context::{self, Context, ContextInner};
use crate::handle::RawObject;
use crate::projinterop;
use crate::{Error, IdentifiedObject, Result};

/// A coordinate operation compiled into an executable pipeline.
///
/// Compiling is costly, callers keep one value per operation and thread.
/// The pipeline stays bound to the context it was compiled under;
/// [`assign`](CompiledTransform::assign) rebinds it before use under
/// another context.
pub struct CompiledTransform {
    pj: RawObject,
    ctx: Rc<ContextInner>,
}

impl CompiledTransform {
    /// Compiles a coordinate operation into a pipeline.
    ///
    /// The operation is exported as a PROJ pipeline definition first; an
    /// operation the engine cannot express that way is
    /// [`Error::Unformattable`], a definition it cannot compile is
    /// [`Error::Transform`].
    pub fn new(context: &Context, operation: &IdentifiedObject) -> Result<CompiledTransform> {
        if !operation.kind().is_operation() {
            return Err(Error::InvalidArgument(format!(
                "{:?} is not a coordinate operation",
                operation.kind()
            )));
        }
        let inner = context.inner();
        inner.ensure_database()?;
        let ctx = inner.ptr()?;
        let operation_ptr = operation.ptr()?;

        let (text, diagnostics) = inner.capture_diagnostics(|| unsafe {
            proj_sys::proj_as_proj_string(
                ctx,
                operation_ptr,
                proj_sys::PJ_PROJ_STRING_TYPE_PJ_PROJ_5,
                std::ptr::null(),
            )
        });
        let definition = match projinterop::opt_string(text) {
            Some(text) => text,
            None => return Err(Error::Unformattable(context::diagnostic_text(inner, diagnostics))),
        };

        let name = operation.name_string()?.unwrap_or_else(|| String::from("unnamed operation"));
        let definition = CString::new(definition)?;
        let (pj, diagnostics) =
            inner.capture_diagnostics(|| unsafe { proj_sys::proj_create(ctx, definition.as_ptr()) });
        if pj.is_null() {
            return Err(Error::Transform(context::diagnostic_text(inner, diagnostics)));
        }

        log::debug!("compiled \"{name}\" into a transform pipeline");
        Ok(CompiledTransform {
            pj: RawObject::adopt(pj),
            ctx: Rc::clone(inner),
        })
    }

    /// Rebinds the pipeline to another context. Required before transforming
    /// under a context other than the one it was compiled under.
    pub fn assign(&mut self, context: &Context) -> Result<()> {
        let pj = self.pj.get()?;
        let ctx = context.inner().ptr()?;
        unsafe { proj_sys::proj_assign_context(pj, ctx) };
        self.ctx = Rc::clone(context.inner());
        Ok(())
    }

    /// Transforms `point_count` coordinate tuples in place.
    ///
    /// The buffer holds interleaved tuples of `dimension` values starting at
    /// `offset`. The first four values of each tuple drive the engine's
    /// x, y, z and t channels as far as the dimension reaches, values beyond
    /// the fourth pass through untouched. Bounds are validated before any
    /// native call; transforming zero points is a no-op.
    pub fn transform(
        &self,
        dimension: usize,
        coordinates: &mut [f64],
        offset: usize,
        point_count: usize,
    ) -> Result<()> {
        if dimension == 0 {
            return Err(Error::InvalidArgument(String::from("dimension must be at least 1")));
        }
        let end = offset.saturating_add(point_count.saturating_mul(dimension));
        if end > coordinates.len() {
            return Err(Error::OutOfBounds {
                index: end,
                size: coordinates.len(),
            });
        }
        if point_count == 0 {
            return Ok(());
        }

        let pj = self.pj.get()?;
        let stride = dimension * std::mem::size_of::<f64>();
        let x = unsafe { coordinates.as_mut_ptr().add(offset) };
        let y = if dimension >= 2 { unsafe { x.add(1) } } else { std::ptr::null_mut() };
        let z = if dimension >= 3 { unsafe { x.add(2) } } else { std::ptr::null_mut() };
        let t = if dimension >= 4 { unsafe { x.add(3) } } else { std::ptr::null_mut() };

        // an errno left behind by an earlier call must not fail this one
        unsafe { proj_sys::proj_errno_reset(pj) };
        let _ = unsafe {
            proj_sys::proj_trans_generic(
                pj,
                proj_sys::PJ_DIRECTION_PJ_FWD,
                x,
                stride,
                point_count,
                y,
                stride,
                point_count,
                z,
                stride,
                point_count,
                t,
                stride,
                point_count,
            )
        };

        let errno = unsafe { proj_sys::proj_errno(pj) };
        if errno != 0 {
            unsafe { proj_sys::proj_errno_reset(pj) };
            let ctx = self.ctx.ptr()?;
            let message = projinterop::opt_string(unsafe { proj_sys::proj_context_errno_string(ctx, errno) })
                .unwrap_or_else(|| format!("engine error code {errno}"));
            return Err(Error::Transform(message));
        }
        Ok(())
    }

    /// Releases the pipeline now instead of at drop time. A second release
    /// is a no-op; transforming afterwards reports the stale handle.
    pub fn destroy(&self) {
        self.pj.release();
    }
}
