//! The FabricSpark adapter layer: Python model submission over Livy sessions
//! and Spark relation naming.

pub mod connection;
pub mod livy;
pub mod python;
pub mod relation;

pub use connection::{Connection, ConnectionState};
pub use dbt_common::{AdapterError, AdapterErrorKind, AdapterResult};
pub use livy::{Cursor, Row, SessionHandle, SessionProvider, StatementKind};
pub use python::{FabricSparkPythonJobHelper, PythonJobHelper, PythonModelConfig};
pub use relation::{
    ComponentName, FabricSparkRelation, FabricSparkRelationType, Policy, QualifiedNameRenderer,
    RelationObject, RelationPath, RelationType,
};
