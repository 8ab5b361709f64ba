/// Loading of pre-computed prediction results.
///
/// Submodules:
/// - `results_csv` — typed CSV decoding and the load-once `ResultStore`.

pub mod results_csv;
