//! WASM bindings for the transportation solver
//!
//! This module exposes the JSON request schema of the original web
//! service to JavaScript callers.

use wasm_bindgen::prelude::*;

use crate::problem::SolveRequest;
use crate::solver::Solver;

/// Solve a request of the form `{costs, supply, demand, method}` and
/// return the full solution, including the padded allocation matrix.
#[wasm_bindgen]
pub fn solve(request: JsValue) -> Result<JsValue, JsValue> {
    let request: SolveRequest =
        serde_wasm_bindgen::from_value(request).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let method = request.method;
    let problem = request
        .into_problem()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let solution = Solver::new()
        .solve(problem, method)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&solution).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Solve a request and return only the allocation matrix, the shape the
/// original service responded with.
#[wasm_bindgen]
pub fn solve_allocation(request: JsValue) -> Result<JsValue, JsValue> {
    let request: SolveRequest =
        serde_wasm_bindgen::from_value(request).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let method = request.method;
    let problem = request
        .into_problem()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let solution = Solver::new()
        .solve(problem, method)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&solution.allocation).map_err(|e| JsValue::from_str(&e.to_string()))
}
