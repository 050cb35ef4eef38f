use std::cell::{Cell, RefCell};
use std::os::raw::{c_char, c_int, c_void};
use std::rc::Rc;
use std::sync::Once;

use proj_sys::PJ_CONTEXT;

use crate::identifiedobject::IdentifiedObject;
use crate::objectcache::WrapperRegistry;
use crate::objecttype::ObjectType;
use crate::projinterop;
use crate::runtimeconfiguration::RuntimeConfiguration;
use crate::{Error, Result};

/// A native engine context plus the state scoped to it: the lazily opened
/// authority database, the wrapper registry and the diagnostics sink.
pub(crate) struct ContextInner {
    handle: Cell<*mut PJ_CONTEXT>,
    database: RefCell<Option<Database>>,
    pub(crate) registry: WrapperRegistry,
    diagnostics: RefCell<Option<Vec<String>>>,
}

struct Database {
    path: String,
}

/// An engine thread context.
///
/// A context belongs to the thread that created it and everything created
/// through it stays bound to that thread; the type is neither `Send` nor
/// `Sync`, so the single thread rule is enforced at compile time. Objects
/// share ownership of their context, dropping the `Context` value while
/// objects are alive keeps the native state valid until the last of them
/// goes away.
#[derive(Clone)]
pub struct Context {
    inner: Rc<ContextInner>,
}

thread_local! {
    static THREAD_CONTEXT: RefCell<Option<Context>> = const { RefCell::new(None) };
}

static ENGINE_INFO: Once = Once::new();

impl Context {
    pub fn new() -> Result<Context> {
        ENGINE_INFO.call_once(|| {
            log::debug!("PROJ engine {}", projinterop::engine_version());
        });

        let handle = unsafe { proj_sys::proj_context_create() };
        if handle.is_null() {
            return Err(Error::Runtime(String::from("could not create an engine context")));
        }

        let inner = Rc::new(ContextInner {
            handle: Cell::new(handle),
            database: RefCell::new(None),
            registry: WrapperRegistry::new(),
            diagnostics: RefCell::new(None),
        });

        unsafe {
            proj_sys::proj_log_level(handle, proj_sys::PJ_LOG_LEVEL_PJ_LOG_ERROR);
            proj_sys::proj_log_func(handle, Rc::as_ptr(&inner) as *mut c_void, Some(forward_engine_log));
        }

        log::debug!("Created PROJ context");
        Ok(Context { inner })
    }

    pub fn with_config(config: &RuntimeConfiguration) -> Result<Context> {
        let context = Context::new()?;
        config.apply_to(&context)?;
        Ok(context)
    }

    /// The calling thread's shared context, created on first use.
    ///
    /// Repeated calls on one thread hand out the same instance until it is
    /// closed, after which a fresh one takes its place.
    pub fn acquire() -> Result<Context> {
        THREAD_CONTEXT.with(|slot| {
            let mut slot = slot.borrow_mut();
            if let Some(context) = slot.as_ref()
                && !context.is_closed()
            {
                return Ok(context.clone());
            }

            let fresh = Context::new()?;
            *slot = Some(fresh.clone());
            Ok(fresh)
        })
    }

    pub fn is_closed(&self) -> bool {
        self.inner.handle.get().is_null()
    }

    /// Releases the native context now instead of at drop time.
    ///
    /// The database record goes first, then the context itself. Every later
    /// operation through this context or an object bound to it reports
    /// [`Error::NullHandle`]. Closing twice is a no-op.
    pub fn close(&self) {
        self.inner.close_native();
    }

    /// Resolves any definition the engine recognizes: an authority code like
    /// "EPSG:4326", WKT, a PROJ string, PROJJSON or an OGC URN.
    pub fn create_from_user_input(&self, text: &str) -> Result<IdentifiedObject> {
        self.inner.ensure_database()?;
        let ctx = self.inner.ptr()?;
        let definition = std::ffi::CString::new(text)?;

        let (ptr, diagnostics) = self
            .inner
            .capture_diagnostics(|| unsafe { proj_sys::proj_create(ctx, definition.as_ptr()) });
        if ptr.is_null() {
            return Err(Error::Unparsable(diagnostic_text(&self.inner, diagnostics)));
        }

        IdentifiedObject::from_owned_ptr(&self.inner, ptr, ObjectType::Any)
    }

    /// The authority names of the database, e.g. EPSG, ESRI, OGC.
    pub fn authorities(&self) -> Result<Vec<String>> {
        self.inner.ensure_database()?;
        let ctx = self.inner.ptr()?;
        let list = unsafe { proj_sys::proj_get_authorities_from_database(ctx) };
        if list.is_null() {
            return Err(Error::Database(projinterop::last_error_message(ctx)));
        }

        Ok(projinterop::string_list_to_vec(list))
    }

    pub(crate) fn inner(&self) -> &Rc<ContextInner> {
        &self.inner
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").field("closed", &self.is_closed()).finish()
    }
}

impl ContextInner {
    pub(crate) fn ptr(&self) -> Result<*mut PJ_CONTEXT> {
        let handle = self.handle.get();
        if handle.is_null() { Err(Error::NullHandle) } else { Ok(handle) }
    }

    /// Opens the authority database on first use and caches that it is open.
    ///
    /// A failed open leaves the cache empty so the next caller retries.
    pub(crate) fn ensure_database(&self) -> Result<()> {
        if self.database.borrow().is_some() {
            return Ok(());
        }

        let ctx = self.ptr()?;
        log::debug!("Creating PROJ database context");
        let rc = unsafe { proj_sys::proj_context_set_database_path(ctx, std::ptr::null(), std::ptr::null(), std::ptr::null()) };
        if rc == 0 {
            return Err(Error::Database(projinterop::last_error_message(ctx)));
        }

        let path = projinterop::opt_string(unsafe { proj_sys::proj_context_get_database_path(ctx) }).unwrap_or_default();
        *self.database.borrow_mut() = Some(Database { path });
        Ok(())
    }

    /// Opens a specific database file instead of the default lookup.
    pub(crate) fn open_database(&self, path: &str) -> Result<()> {
        let ctx = self.ptr()?;
        let c_path = std::ffi::CString::new(path)?;
        let rc = unsafe { proj_sys::proj_context_set_database_path(ctx, c_path.as_ptr(), std::ptr::null(), std::ptr::null()) };
        if rc == 0 {
            return Err(Error::Database(projinterop::last_error_message(ctx)));
        }

        *self.database.borrow_mut() = Some(Database {
            path: String::from(path),
        });
        Ok(())
    }

    pub(crate) fn set_search_paths(&self, paths: &[String]) -> Result<()> {
        let ctx = self.ptr()?;
        let list = projinterop::StringList::new(paths)?;
        unsafe { proj_sys::proj_context_set_search_paths(ctx, paths.len() as c_int, list.as_ptr()) };
        Ok(())
    }

    pub(crate) fn set_debug_logging(&self, enabled: bool) -> Result<()> {
        let ctx = self.ptr()?;
        let level = if enabled {
            proj_sys::PJ_LOG_LEVEL_PJ_LOG_DEBUG
        } else {
            proj_sys::PJ_LOG_LEVEL_PJ_LOG_ERROR
        };
        unsafe { proj_sys::proj_log_level(ctx, level) };
        Ok(())
    }

    /// Number of live owners of this context: the `Context` values plus every
    /// object bound to it.
    pub(crate) fn share_count(self: &Rc<Self>) -> usize {
        Rc::strong_count(self)
    }

    /// Runs `f` while collecting the engine's diagnostics for this context.
    pub(crate) fn capture_diagnostics<T>(&self, f: impl FnOnce() -> T) -> (T, Vec<String>) {
        *self.diagnostics.borrow_mut() = Some(Vec::new());
        let result = f();
        let captured = self.diagnostics.borrow_mut().take().unwrap_or_default();
        (result, captured)
    }

    fn note_diagnostic(&self, text: &str) {
        if let Some(sink) = self.diagnostics.borrow_mut().as_mut() {
            sink.push(String::from(text));
        }
    }

    fn close_native(&self) {
        if let Some(database) = self.database.borrow_mut().take() {
            log::debug!("Releasing PROJ database context ({})", database.path);
        }

        let handle = self.handle.replace(std::ptr::null_mut());
        if !handle.is_null() {
            unsafe {
                let _ = proj_sys::proj_context_destroy(handle);
            }
            log::debug!("Closed PROJ context");
        }
    }
}

impl Drop for ContextInner {
    fn drop(&mut self) {
        self.close_native();
    }
}

pub(crate) fn diagnostic_text(inner: &ContextInner, diagnostics: Vec<String>) -> String {
    if diagnostics.is_empty() {
        match inner.ptr() {
            Ok(ctx) => projinterop::last_error_message(ctx),
            Err(_) => String::from("context already closed"),
        }
    } else {
        diagnostics.join("; ")
    }
}

unsafe extern "C" fn forward_engine_log(app_data: *mut c_void, level: c_int, msg: *const c_char) {
    if msg.is_null() {
        return;
    }

    let text = projinterop::raw_string_to_string(msg);
    if !app_data.is_null() && level == proj_sys::PJ_LOG_LEVEL_PJ_LOG_ERROR as c_int {
        let inner = unsafe { &*(app_data as *const ContextInner) };
        inner.note_diagnostic(&text);
    }

    match level as u32 {
        proj_sys::PJ_LOG_LEVEL_PJ_LOG_ERROR => log::error!("PROJ: {text}"),
        proj_sys::PJ_LOG_LEVEL_PJ_LOG_DEBUG => log::debug!("PROJ: {text}"),
        _ => log::trace!("PROJ: {text}"),
    }
}
