//! Text forms of referencing objects: WKT, PROJ strings and PROJJSON.
//!
//! A [`ReferencingFormat`] is bound to a context and keeps the layout options
//! and the warnings of its most recent call. Parsing detects WKT and routes
//! it through the grammar aware reader so non fatal defects surface as
//! warnings instead of being silently repaired; every other text (PROJ
//! string, PROJJSON, authority code) goes through the engine's general
//! resolver.

use std::ffi::CString;
use std::rc::Rc;

use proj_sys::PROJ_STRING_LIST;

use crate::context::{self, Context, ContextInner};
use crate::projinterop::{self, StringList};
use crate::{Error, IdentifiedObject, ObjectType, Result};

/// The text form written by [`ReferencingFormat::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    Wkt2_2019,
    Wkt2_2015,
    Wkt2_2019Simplified,
    Wkt2_2015Simplified,
    Wkt1Gdal,
    Wkt1Esri,
    Proj5,
    Proj4,
    Json,
}

impl Convention {
    /// The latest supported WKT 2 version.
    pub const WKT: Convention = Convention::Wkt2_2019;
    /// The latest supported WKT 2 version without the optional elements.
    pub const WKT_SIMPLIFIED: Convention = Convention::Wkt2_2019Simplified;

    fn wkt_type(self) -> Option<proj_sys::PJ_WKT_TYPE> {
        match self {
            Convention::Wkt2_2019 => Some(proj_sys::PJ_WKT_TYPE_PJ_WKT2_2019),
            Convention::Wkt2_2015 => Some(proj_sys::PJ_WKT_TYPE_PJ_WKT2_2015),
            Convention::Wkt2_2019Simplified => Some(proj_sys::PJ_WKT_TYPE_PJ_WKT2_2019_SIMPLIFIED),
            Convention::Wkt2_2015Simplified => Some(proj_sys::PJ_WKT_TYPE_PJ_WKT2_2015_SIMPLIFIED),
            Convention::Wkt1Gdal => Some(proj_sys::PJ_WKT_TYPE_PJ_WKT1_GDAL),
            Convention::Wkt1Esri => Some(proj_sys::PJ_WKT_TYPE_PJ_WKT1_ESRI),
            _ => None,
        }
    }

    fn proj_string_type(self) -> Option<proj_sys::PJ_PROJ_STRING_TYPE> {
        match self {
            Convention::Proj5 => Some(proj_sys::PJ_PROJ_STRING_TYPE_PJ_PROJ_5),
            Convention::Proj4 => Some(proj_sys::PJ_PROJ_STRING_TYPE_PJ_PROJ_4),
            _ => None,
        }
    }
}

/// Reads and writes the text forms of referencing objects.
pub struct ReferencingFormat {
    ctx: Rc<ContextInner>,
    convention: Convention,
    multiline: bool,
    indentation: u32,
    strict: bool,
    warnings: Vec<String>,
}

impl ReferencingFormat {
    pub fn new(context: &Context, convention: Convention) -> ReferencingFormat {
        ReferencingFormat {
            ctx: context.inner().clone(),
            convention,
            multiline: true,
            indentation: 4,
            strict: false,
            warnings: Vec::new(),
        }
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    /// Whether the output spreads over multiple lines, on by default.
    pub fn set_multiline(&mut self, multiline: bool) {
        self.multiline = multiline;
    }

    /// Number of spaces per indentation level in multiline output.
    pub fn set_indentation(&mut self, spaces: u32) {
        self.indentation = spaces;
    }

    /// Whether to enforce strictly standard texts when writing and when
    /// reading, off by default.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Warnings from the most recent format or parse call.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Writes the text form of an object under this format's convention.
    ///
    /// An object the chosen writer cannot express is
    /// [`Error::Unformattable`] carrying the engine's diagnostic.
    pub fn format(&mut self, object: &IdentifiedObject) -> Result<String> {
        self.warnings.clear();
        self.ctx.ensure_database()?;
        let ctx = self.ctx.ptr()?;
        let ptr = object.ptr()?;

        if let Some(wkt) = self.convention.wkt_type() {
            let options = StringList::new(&[
                String::from(if self.multiline { "MULTILINE=YES" } else { "MULTILINE=NO" }),
                format!("INDENTATION_WIDTH={}", self.indentation),
                String::from(if self.strict { "STRICT=YES" } else { "STRICT=NO" }),
            ])?;
            let (raw, diagnostics) = self
                .ctx
                .capture_diagnostics(|| unsafe { proj_sys::proj_as_wkt(ctx, ptr, wkt, options.as_ptr()) });
            self.written(raw, diagnostics)
        } else if let Some(style) = self.convention.proj_string_type() {
            let (raw, diagnostics) = self.ctx.capture_diagnostics(|| unsafe {
                proj_sys::proj_as_proj_string(ctx, ptr, style, std::ptr::null())
            });
            self.written(raw, diagnostics)
        } else {
            let options = StringList::new(&[
                String::from(if self.multiline { "MULTILINE=YES" } else { "MULTILINE=NO" }),
                format!("INDENTATION_WIDTH={}", self.indentation),
            ])?;
            let (raw, diagnostics) = self
                .ctx
                .capture_diagnostics(|| unsafe { proj_sys::proj_as_projjson(ctx, ptr, options.as_ptr()) });
            self.written(raw, diagnostics)
        }
    }

    /// Parses a text into a referencing object.
    ///
    /// WKT goes through the grammar aware reader; in lenient mode (the
    /// default) recoverable grammar defects become [`warnings`], in strict
    /// mode they fail the parse. Any other recognized text, PROJ strings,
    /// PROJJSON and `AUTHORITY:CODE` references included, goes through the
    /// general resolver.
    ///
    /// [`warnings`]: ReferencingFormat::warnings
    pub fn parse(&mut self, text: &str) -> Result<IdentifiedObject> {
        self.warnings.clear();
        self.ctx.ensure_database()?;
        let ctx = self.ctx.ptr()?;
        let definition = CString::new(text)?;

        let dialect = unsafe { proj_sys::proj_context_guess_wkt_dialect(ctx, definition.as_ptr()) };
        let ptr = if dialect == proj_sys::PJ_GUESSED_WKT_DIALECT_PJ_GUESSED_NOT_WKT {
            let (raw, diagnostics) =
                self.ctx.capture_diagnostics(|| unsafe { proj_sys::proj_create(ctx, definition.as_ptr()) });
            if raw.is_null() {
                return Err(Error::Unparsable(context::diagnostic_text(&self.ctx, diagnostics)));
            }
            self.warnings = diagnostics;
            raw
        } else {
            let options =
                StringList::new(&[String::from(if self.strict { "STRICT=YES" } else { "STRICT=NO" })])?;
            let mut notes: PROJ_STRING_LIST = std::ptr::null_mut();
            let mut grammar_errors: PROJ_STRING_LIST = std::ptr::null_mut();
            let raw = unsafe {
                proj_sys::proj_create_from_wkt(
                    ctx,
                    definition.as_ptr(),
                    options.as_ptr(),
                    &mut notes,
                    &mut grammar_errors,
                )
            };
            let mut notes = projinterop::string_list_to_vec(notes);
            let grammar_errors = projinterop::string_list_to_vec(grammar_errors);
            if raw.is_null() {
                return Err(Error::Unparsable(if grammar_errors.is_empty() {
                    projinterop::last_error_message(ctx)
                } else {
                    grammar_errors.join("; ")
                }));
            }
            notes.extend(grammar_errors);
            self.warnings = notes;
            raw
        };

        IdentifiedObject::from_owned_ptr(&self.ctx, ptr, ObjectType::Any)
    }

    fn written(&mut self, raw: *const std::os::raw::c_char, diagnostics: Vec<String>) -> Result<String> {
        match projinterop::opt_string(raw) {
            Some(text) => {
                self.warnings = diagnostics;
                Ok(text)
            }
            None => Err(Error::Unformattable(context::diagnostic_text(&self.ctx, diagnostics))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // WKT1 requires a UNIT in GEOGCS, leaving it out is recoverable
    const UNIT_LESS_WKT: &str = concat!(
        "GEOGCS[\"lenient\",",
        "DATUM[\"North_American_Datum_1927\",",
        "SPHEROID[\"Clarke 1866\",6378206.4,294.978698213898]],",
        "PRIMEM[\"Greenwich\",0]]"
    );

    fn formatter(convention: Convention) -> ReferencingFormat {
        let context = Context::new().expect("context creation");
        ReferencingFormat::new(&context, convention)
    }

    #[test]
    fn authority_codes_resolve_through_the_general_path() {
        let mut format = formatter(Convention::WKT);
        let crs = format.parse("EPSG:4326").expect("EPSG:4326 parse");
        assert_eq!(crs.kind(), ObjectType::GeographicCrs);
        assert!(format.warnings().is_empty());
    }

    #[test]
    fn wkt2_is_the_default_flavour() {
        let mut format = formatter(Convention::WKT);
        let crs = format.parse("EPSG:4326").expect("EPSG:4326 parse");
        let text = format.format(&crs).expect("WKT export");
        assert!(text.starts_with("GEOGCRS["), "unexpected WKT start: {text}");
        assert!(text.contains("WGS 84"));
        assert!(text.contains('\n'));
    }

    #[test]
    fn single_line_output() {
        let mut format = formatter(Convention::WKT);
        let crs = format.parse("EPSG:4326").expect("EPSG:4326 parse");
        format.set_multiline(false);
        let text = format.format(&crs).expect("WKT export");
        assert!(!text.contains('\n'));
    }

    #[test]
    fn proj4_strings_carry_the_projection() {
        let mut format = formatter(Convention::Proj4);
        let crs = format.parse("EPSG:32632").expect("EPSG:32632 parse");
        let text = format.format(&crs).expect("PROJ export");
        assert!(text.contains("+proj=utm"), "unexpected string: {text}");
        assert!(text.contains("+zone=32"));
    }

    #[test]
    fn json_output_is_projjson() {
        let mut format = formatter(Convention::Json);
        let crs = format.parse("EPSG:4326").expect("EPSG:4326 parse");
        let text = format.format(&crs).expect("JSON export");
        assert!(text.starts_with('{'));
        assert!(text.contains("\"GeographicCRS\""));
    }

    #[test]
    fn lenient_parsing_reports_grammar_defects_as_warnings() {
        let mut format = formatter(Convention::WKT);
        let crs = format.parse(UNIT_LESS_WKT).expect("lenient parse");
        assert!(crs.kind().is_crs());
        assert!(!format.warnings().is_empty());

        // the next call starts from a clean list
        format.parse("EPSG:4326").expect("EPSG:4326 parse");
        assert!(format.warnings().is_empty());
    }

    #[test]
    fn strict_parsing_rejects_grammar_defects() {
        let mut format = formatter(Convention::WKT);
        format.set_strict(true);
        assert!(matches!(format.parse(UNIT_LESS_WKT), Err(Error::Unparsable(_))));
    }

    #[test]
    fn gibberish_is_unparsable() {
        let mut format = formatter(Convention::WKT);
        assert!(matches!(format.parse("certainly not a CRS"), Err(Error::Unparsable(_))));
    }

    #[test]
    fn wkt1_cannot_express_every_crs() {
        let mut format = formatter(Convention::Wkt1Gdal);
        let geographic_3d = format.parse("EPSG:4979").expect("EPSG:4979 parse");
        assert!(matches!(format.format(&geographic_3d), Err(Error::Unformattable(_))));
    }
}
