/// Data-shaping layer for the rainfall dashboard.
///
/// Everything here is a pure transform of an in-memory dataset. The
/// forecasting itself happened upstream (ConvLSTM); these helpers only
/// bucket, count and slice its output for display.
///
/// Submodules:
/// - `categories` — rainfall value → Low/Medium/High, and label text lookup.
/// - `aggregate` — category counts, contingency table, forecast slice.

pub mod aggregate;
pub mod categories;
