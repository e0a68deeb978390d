//! Contracts for the Livy session collaborator.
//!
//! Session creation, reuse, polling and teardown live behind
//! [SessionProvider]; this crate only borrows handles and cursors from it.

use std::fmt::Debug;
use std::sync::Arc;

use dbt_auth::FabricSparkCredentials;
use dbt_common::AdapterResult;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// One output row returned by a Livy statement.
pub type Row = serde_json::Value;

/// The Livy statement `kind`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    PySpark,
}

/// Resolves an open Livy session for a set of credentials.
///
/// Implementations own session pooling; calling `connect` twice with the same
/// credentials may return the same session.
pub trait SessionProvider: Send + Sync {
    fn connect(&self, credentials: &FabricSparkCredentials) -> AdapterResult<Arc<dyn SessionHandle>>;
}

/// An open remote execution context.
pub trait SessionHandle: Debug + Send + Sync {
    fn cursor(&self) -> AdapterResult<Box<dyn Cursor>>;

    /// The Livy session id, when the backend exposes one.
    fn session_id(&self) -> Option<String> {
        None
    }
}

/// A cursor over one session.
///
/// `execute` blocks until the statement finishes. Backend failures are
/// reported with [dbt_common::AdapterErrorKind::Driver].
pub trait Cursor {
    fn execute(&mut self, code: &str, kind: StatementKind) -> AdapterResult<()>;

    /// All rows produced by the last `execute`, in backend order.
    fn fetchall(&mut self) -> AdapterResult<Vec<Row>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_statement_kind_tags() {
        assert_eq!(StatementKind::PySpark.as_ref(), "pyspark");
        assert_eq!(StatementKind::PySpark.to_string(), "pyspark");
        assert_eq!(
            StatementKind::from_str("pyspark").unwrap(),
            StatementKind::PySpark
        );
        assert_eq!(
            serde_json::to_string(&StatementKind::PySpark).unwrap(),
            "\"pyspark\""
        );
    }
}
