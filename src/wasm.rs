//! WebAssembly bindings.
//!
//! A thin wrapper around [`solve`](crate::solver::solve) for browser
//! environments; problems and reports cross the boundary as plain JS objects.

use wasm_bindgen::prelude::*;

use crate::algorithm::AlgorithmConfig;
use crate::models::Cost;
use crate::solver::{self, SolverInput};

/// Solves a problem given as a JS object shaped like `SolverInput<Cost>`.
///
/// Rejects with a JS `Error` when the input cannot be decoded or the search
/// fails.
#[wasm_bindgen]
pub fn solve(input: JsValue) -> Result<JsValue, JsValue> {
    let input: SolverInput<Cost> = serde_wasm_bindgen::from_value(input)
        .map_err(|e| js_error(&format!("Invalid input: {e}")))?;

    let report = solver::solve(&input).map_err(|e| js_error(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&report)
        .map_err(|e| js_error(&format!("Serialization error: {e}")))
}

/// Default algorithm parameters as a JS object.
#[wasm_bindgen(js_name = defaultConfig)]
pub fn default_config() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&AlgorithmConfig::default())
        .map_err(|e| js_error(&format!("Serialization error: {e}")))
}

fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}
