//! JSON export of a planned algorithm.
//!
//! Every grid is written as a list of row strings using the glyph contract
//! of [`Grid`](crate::Grid):
//!
//! ```json
//! {
//!   "bits": 4,
//!   "state": 0,
//!   "matrix": ["____0000", "___0000_", "__0000__", "_0000___"],
//!   "algorithm": {
//!     "0": { "template": [...], "pseudo": [...], "map": ["00", "00", "00", "FF"] }
//!   }
//! }
//! ```

use serde_json::{json, Map as JsonMap, Value};

use crate::algorithm::Algorithm;
use crate::error::{Error, Result};

/// Serialize the plan and live state of `algorithm`.
#[must_use]
pub fn export_algorithm(algorithm: &Algorithm) -> Value {
    let stages: JsonMap<String, Value> = algorithm
        .stages()
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            (
                i.to_string(),
                json!({
                    "template": stage.template().grid().render_rows(),
                    "pseudo": stage.pseudo().grid().render_rows(),
                    "map": stage.map().render_rows(),
                }),
            )
        })
        .collect();

    json!({
        "bits": algorithm.bits().bits(),
        "state": algorithm.state(),
        "matrix": algorithm.matrix().grid().render_rows(),
        "algorithm": stages,
    })
}

/// [`export_algorithm`] rendered as indented JSON text.
#[must_use]
pub fn to_json_string(algorithm: &Algorithm) -> String {
    format!("{:#}", export_algorithm(algorithm))
}

/// Rebuild an algorithm from its export.
///
/// # Errors
///
/// Always returns [`Error::NotImplemented`]: exported plans cannot be read
/// back yet.
pub fn import_algorithm(_payload: &Value) -> Result<Algorithm> {
    Err(Error::NotImplemented("algorithm import"))
}
