//! Python (PySpark) model submission.

use dbt_common::AdapterResult;

mod fabricspark;
pub use fabricspark::{FabricSparkPythonJobHelper, PythonModelConfig};

/// Runs the compiled code of one Python model.
pub trait PythonJobHelper {
    fn submit(&self, compiled_code: &str) -> AdapterResult<()>;
}
