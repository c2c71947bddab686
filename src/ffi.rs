//! C ABI over [`solve`] with JSON in and JSON out.
//!
//! The request is a [`SolverInput<Cost>`] document. The response is either
//! `{"ok": <SolveReport>}` or `{"error": "<message>"}`. Every string returned
//! by this module must be released with [`evopath_free_string`].

use std::ffi::{CStr, CString};
use std::ptr;

use libc::c_char;
use serde::Serialize;

use crate::models::Cost;
use crate::solver::{solve, SolveReport, SolverInput};

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Response {
    Ok(SolveReport<Cost>),
    Error(String),
}

/// Solves the JSON-encoded problem at `input`.
///
/// Returns a newly allocated NUL-terminated JSON string, or null if the
/// response could not be encoded.
///
/// # Safety
///
/// `input` must be null or point to a valid NUL-terminated string that stays
/// alive for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn evopath_solve_json(input: *const c_char) -> *mut c_char {
    let response = if input.is_null() {
        Response::Error("input pointer is null".into())
    } else {
        // Turn the unsafe ptr into a safe reference.
        let raw = CStr::from_ptr(input);
        run(raw)
    };

    match serde_json::to_string(&response)
        .ok()
        .and_then(|s| CString::new(s).ok())
    {
        Some(s) => s.into_raw(),
        None => ptr::null_mut(),
    }
}

/// Releases a string returned by [`evopath_solve_json`].
///
/// # Safety
///
/// `s` must be null or a pointer obtained from [`evopath_solve_json`] that
/// has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn evopath_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

fn run(raw: &CStr) -> Response {
    let text = match raw.to_str() {
        Ok(t) => t,
        Err(e) => return Response::Error(format!("input is not UTF-8: {e}")),
    };
    let input: SolverInput<Cost> = match serde_json::from_str(text) {
        Ok(i) => i,
        Err(e) => return Response::Error(format!("invalid input JSON: {e}")),
    };
    match solve(&input) {
        Ok(report) => Response::Ok(report),
        Err(e) => Response::Error(e.to_string()),
    }
}
