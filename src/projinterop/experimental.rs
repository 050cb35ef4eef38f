//! Declarations for the engine's object creation entry points.
//!
//! These live in `proj_experimental.h`, which the generated bindings of
//! `proj-sys` do not cover. The symbols are part of the same shared library,
//! so declaring them here links against the library `proj-sys` already set up.

#![allow(non_camel_case_types)]

use std::os::raw::{c_char, c_int, c_uint};

use proj_sys::{PJ, PJ_CONTEXT, PJ_COORDINATE_SYSTEM_TYPE};

pub(crate) type PJ_UNIT_TYPE = c_uint;
pub(crate) const PJ_UT_ANGULAR: PJ_UNIT_TYPE = 0;
pub(crate) const PJ_UT_LINEAR: PJ_UNIT_TYPE = 1;
pub(crate) const PJ_UT_SCALE: PJ_UNIT_TYPE = 2;
pub(crate) const PJ_UT_TIME: PJ_UNIT_TYPE = 3;
#[allow(dead_code)]
pub(crate) const PJ_UT_PARAMETRIC: PJ_UNIT_TYPE = 4;

#[repr(C)]
pub(crate) struct PJ_AXIS_DESCRIPTION {
    pub name: *mut c_char,
    pub abbreviation: *mut c_char,
    pub direction: *mut c_char,
    pub unit_name: *mut c_char,
    pub unit_conv_factor: f64,
    pub unit_type: PJ_UNIT_TYPE,
}

#[repr(C)]
pub(crate) struct PJ_PARAM_DESCRIPTION {
    pub name: *const c_char,
    pub auth_name: *const c_char,
    pub code: *const c_char,
    pub value: f64,
    pub unit_name: *const c_char,
    pub unit_conv_factor: f64,
    pub unit_type: PJ_UNIT_TYPE,
}

unsafe extern "C" {
    pub(crate) fn proj_create_cs(
        ctx: *mut PJ_CONTEXT,
        cs_type: PJ_COORDINATE_SYSTEM_TYPE,
        axis_count: c_int,
        axis: *const PJ_AXIS_DESCRIPTION,
    ) -> *mut PJ;

    pub(crate) fn proj_create_geographic_crs(
        ctx: *mut PJ_CONTEXT,
        crs_name: *const c_char,
        datum_name: *const c_char,
        ellps_name: *const c_char,
        semi_major_metre: f64,
        inv_flattening: f64,
        prime_meridian_name: *const c_char,
        prime_meridian_offset: f64,
        pm_angular_units: *const c_char,
        pm_units_conv: f64,
        ellipsoidal_cs: *mut PJ,
    ) -> *mut PJ;

    pub(crate) fn proj_create_geographic_crs_from_datum(
        ctx: *mut PJ_CONTEXT,
        crs_name: *const c_char,
        datum_or_datum_ensemble: *mut PJ,
        ellipsoidal_cs: *mut PJ,
    ) -> *mut PJ;

    pub(crate) fn proj_create_geocentric_crs_from_datum(
        ctx: *mut PJ_CONTEXT,
        crs_name: *const c_char,
        datum: *const PJ,
        linear_units: *const c_char,
        linear_units_conv: f64,
    ) -> *mut PJ;

    pub(crate) fn proj_create_vertical_crs(
        ctx: *mut PJ_CONTEXT,
        crs_name: *const c_char,
        datum_name: *const c_char,
        linear_units: *const c_char,
        linear_units_conv: f64,
    ) -> *mut PJ;

    pub(crate) fn proj_create_compound_crs(
        ctx: *mut PJ_CONTEXT,
        crs_name: *const c_char,
        horiz_crs: *mut PJ,
        vert_crs: *mut PJ,
    ) -> *mut PJ;

    pub(crate) fn proj_create_engineering_crs(ctx: *mut PJ_CONTEXT, crs_name: *const c_char) -> *mut PJ;

    pub(crate) fn proj_create_conversion(
        ctx: *mut PJ_CONTEXT,
        name: *const c_char,
        auth_name: *const c_char,
        code: *const c_char,
        method_name: *const c_char,
        method_auth_name: *const c_char,
        method_code: *const c_char,
        param_count: c_int,
        params: *const PJ_PARAM_DESCRIPTION,
    ) -> *mut PJ;

    pub(crate) fn proj_create_projected_crs(
        ctx: *mut PJ_CONTEXT,
        crs_name: *const c_char,
        geodetic_crs: *const PJ,
        conversion: *const PJ,
        coordinate_system: *const PJ,
    ) -> *mut PJ;
}
