//! C FFI bindings for csvmap-core
//!
//! Exposes an editing session to a UI host (desktop shell, web view bridge).
//! The host owns the file picker and table rendering; it hands CSV text and
//! mapping JSON across this boundary and reads back mapped rows.

use csvmap_core::{encode_json, MappingConfig, Session};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

/// Opaque handle to an editing session
pub struct FfiSession {
    inner: Session,
}

unsafe fn to_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    CStr::from_ptr(s).to_str().ok()
}

fn into_c_string(s: String) -> *mut c_char {
    CString::new(s)
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}

/// Create a new empty session
///
/// Caller must free the session with `csvmap_session_free`.
#[no_mangle]
pub extern "C" fn csvmap_session_new() -> *mut FfiSession {
    Box::into_raw(Box::new(FfiSession {
        inner: Session::new(),
    }))
}

/// Free a session
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvmap_session_new` or null
#[no_mangle]
pub unsafe extern "C" fn csvmap_session_free(session: *mut FfiSession) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Load CSV text into the session; returns false on parse error
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvmap_session_new`
/// - `content` must be a valid UTF-8 C string
#[no_mangle]
pub unsafe extern "C" fn csvmap_session_load_csv(
    session: *mut FfiSession,
    content: *const c_char,
) -> bool {
    if session.is_null() {
        return false;
    }
    let Some(content) = to_str(content) else {
        return false;
    };

    match (*session).inner.load_csv_str(content, "upload.csv") {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load CSV");
            false
        }
    }
}

/// Set the target schema from comma-separated text; resets the rules
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvmap_session_new`
/// - `schema` must be a valid UTF-8 C string
#[no_mangle]
pub unsafe extern "C" fn csvmap_session_set_schema(
    session: *mut FfiSession,
    schema: *const c_char,
) -> bool {
    if session.is_null() {
        return false;
    }
    match to_str(schema) {
        Some(schema) => {
            (*session).inner.set_schema(schema);
            true
        }
        None => false,
    }
}

/// Replace the mapping config from mapping-file JSON; returns false when the
/// JSON is invalid or names an unknown action
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvmap_session_new`
/// - `json` must be a valid UTF-8 C string
#[no_mangle]
pub unsafe extern "C" fn csvmap_session_set_mapping_json(
    session: *mut FfiSession,
    json: *const c_char,
) -> bool {
    if session.is_null() {
        return false;
    }
    let Some(json) = to_str(json) else {
        return false;
    };

    match MappingConfig::from_json(json) {
        Ok(config) => {
            (*session).inner.set_config(config);
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "rejected mapping JSON");
            false
        }
    }
}

/// Get the mapping config as JSON
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvmap_session_new`
/// - Caller must free the returned string with `csvmap_free_string`
#[no_mangle]
pub unsafe extern "C" fn csvmap_session_mapping_json(session: *const FfiSession) -> *mut c_char {
    if session.is_null() {
        return ptr::null_mut();
    }
    serde_json::to_string(&(*session).inner.config())
        .map(into_c_string)
        .unwrap_or(ptr::null_mut())
}

/// Recompute the preview; returns the number of mapped rows, or -1 when no
/// CSV is loaded
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvmap_session_new`
#[no_mangle]
pub unsafe extern "C" fn csvmap_session_preview(session: *mut FfiSession) -> i64 {
    if session.is_null() {
        return -1;
    }
    match (*session).inner.run_preview() {
        Ok(rows) => rows.len() as i64,
        Err(_) => -1,
    }
}

/// Get the last preview as a JSON array of objects
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvmap_session_new`
/// - Caller must free the returned string with `csvmap_free_string`
#[no_mangle]
pub unsafe extern "C" fn csvmap_session_preview_json(session: *const FfiSession) -> *mut c_char {
    if session.is_null() {
        return ptr::null_mut();
    }
    encode_json((*session).inner.preview())
        .map(into_c_string)
        .unwrap_or(ptr::null_mut())
}

/// Get the last preview encoded as CSV
///
/// # Safety
/// - `session` must be a valid pointer returned by `csvmap_session_new`
/// - Caller must free the returned string with `csvmap_free_string`
#[no_mangle]
pub unsafe extern "C" fn csvmap_session_export_csv(session: *const FfiSession) -> *mut c_char {
    if session.is_null() {
        return ptr::null_mut();
    }
    (*session)
        .inner
        .export_csv()
        .map(into_c_string)
        .unwrap_or(ptr::null_mut())
}

/// Free a string returned by other FFI functions
///
/// # Safety
/// - `s` must be a valid pointer returned by a csvmap_* function or null
#[no_mangle]
pub unsafe extern "C" fn csvmap_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
