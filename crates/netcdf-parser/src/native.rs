//! Thin helpers over the native netcdf library.

use std::sync::Once;

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// Only the first call does anything. Call it before any file is opened.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
pub(crate) fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Numeric attribute as f64.
pub(crate) fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

/// Numeric attribute that may hold several values (`missing_value = 1e20, -999`).
pub(crate) fn get_f64_list_attr(var: &netcdf::Variable, name: &str) -> Vec<f64> {
    if !has_attr(var, name) {
        return Vec::new();
    }
    match var.attribute_value(name) {
        Some(Ok(netcdf::AttributeValue::Doubles(v))) => v,
        Some(Ok(netcdf::AttributeValue::Floats(v))) => v.into_iter().map(f64::from).collect(),
        Some(Ok(netcdf::AttributeValue::Shorts(v))) => v.into_iter().map(f64::from).collect(),
        Some(Ok(netcdf::AttributeValue::Ints(v))) => v.into_iter().map(f64::from).collect(),
        Some(Ok(value)) => f64::try_from(value).ok().into_iter().collect(),
        _ => Vec::new(),
    }
}

/// Text attribute.
pub(crate) fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
