//! Test doubles shared by the adapter integration tests.

mod fake_livy;
mod shared_buffer;

pub use fake_livy::{ExecutedStatement, FakeSession, FakeSessionProvider};
pub use shared_buffer::SharedBuffer;

use dbt_auth::{AdapterConfig, FabricSparkCredentials};

/// Valid credentials for a lakehouse named `dbt_lakehouse`.
pub fn test_credentials() -> FabricSparkCredentials {
    let config = AdapterConfig::from_json(serde_json::json!({
        "type": "fabricspark",
        "workspaceid": "1de8390c-9aca-4790-bee8-72049109c0f4",
        "lakehouseid": "8c5bc260-bc3a-4898-9ada-01e433d461ba",
        "lakehouse": "dbt_lakehouse",
        "schema": "dbt_lakehouse",
    }))
    .expect("static profile is a mapping");
    FabricSparkCredentials::try_from_config(&config).expect("static profile is valid")
}
