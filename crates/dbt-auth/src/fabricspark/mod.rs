//! Credentials for reaching a Microsoft Fabric lakehouse through Livy.

use std::fmt;

use dbt_common::{
    AdapterError, AdapterErrorKind, AdapterResult, AdapterType, ErrorCode, FsResult, fs_err,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::AdapterConfig;

pub const DEFAULT_ENDPOINT: &str = "https://api.fabric.microsoft.com/v1";
const DEFAULT_CONNECT_RETRIES: u64 = 1;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SESSION_IDLE_TIMEOUT: &str = "30m";

/// How statements reach the cluster.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, AsRefStr, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMethod {
    #[default]
    Livy,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, AsRefStr, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationMethod {
    /// Token obtained from the local Azure CLI login
    #[default]
    Cli,
    ServicePrincipal,
    /// Running inside a Fabric notebook, which provides its own token
    FabricNotebook,
}

/// The `fabricspark` profile output.
///
/// A lakehouse has no database namespace separate from its schema, so
/// `database` is accepted only when it repeats `schema`.
#[derive(Clone, PartialEq, Serialize)]
pub struct FabricSparkCredentials {
    /// Transport used to reach the cluster
    pub method: ConnectionMethod,
    /// How a bearer token for the Fabric API is obtained
    pub authentication: AuthenticationMethod,
    /// Base URL of the Fabric REST API
    pub endpoint: String,
    /// Fabric workspace id
    pub workspaceid: String,
    /// Lakehouse id inside the workspace
    pub lakehouseid: String,
    /// Lakehouse name, used as the schema models land in
    pub lakehouse: String,
    pub schema: String,
    /// Accepted only when equal to `schema`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Service principal application id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Service principal tenant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Service principal secret; never serialized
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
    /// Attempts made when opening a Livy session
    pub connect_retries: u64,
    /// Seconds to wait between connection attempts
    pub connect_timeout: u64,
    /// Idle time after which Livy reclaims the session, e.g. `30m`
    pub session_idle_timeout: String,
    /// Keep one Livy session across invocations instead of one per run
    pub reuse_session: bool,
    /// Extra Spark settings passed when the session is created
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub spark_config: IndexMap<String, serde_json::Value>,
}

impl FabricSparkCredentials {
    /// Builds credentials from a profile output and validates them.
    pub fn try_from_config(config: &AdapterConfig) -> AdapterResult<Self> {
        if let Some(tag) = config.get_string("type")
            && !tag.eq_ignore_ascii_case(AdapterType::FabricSpark.as_ref())
        {
            return Err(AdapterError::new(
                AdapterErrorKind::Configuration,
                format!("Expected a profile of type 'fabricspark', got '{tag}'"),
            ));
        }

        let credentials = Self::from_config_unchecked(config)?;
        credentials.validate()?;
        Ok(credentials)
    }

    fn from_config_unchecked(config: &AdapterConfig) -> FsResult<Self> {
        let method = match config.get_string("method") {
            Some(method) => method.parse::<ConnectionMethod>().map_err(|_| {
                fs_err!(
                    ErrorCode::InvalidConfig,
                    "Unsupported connection method '{method}', expected 'livy'"
                )
            })?,
            None => ConnectionMethod::default(),
        };
        let authentication = match config.get_string("authentication") {
            Some(auth) => auth.parse::<AuthenticationMethod>().map_err(|_| {
                fs_err!(
                    ErrorCode::InvalidConfig,
                    "Unsupported authentication '{auth}', expected one of 'cli', 'service_principal', 'fabric_notebook'"
                )
            })?,
            None => AuthenticationMethod::default(),
        };
        let spark_config = match config.get("spark_config") {
            None => IndexMap::new(),
            Some(serde_json::Value::Object(map)) => {
                map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
            }
            Some(other) => {
                return Err(fs_err!(
                    ErrorCode::InvalidConfig,
                    "Profile key 'spark_config' must be a mapping, got {other}"
                ));
            }
        };

        Ok(Self {
            method,
            authentication,
            endpoint: config
                .get_string("endpoint")
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            workspaceid: config.require_string("workspaceid")?,
            lakehouseid: config.require_string("lakehouseid")?,
            lakehouse: config.require_string("lakehouse")?,
            schema: config.require_string("schema")?,
            database: config.get_string("database"),
            client_id: config.get_string("client_id"),
            tenant_id: config.get_string("tenant_id"),
            client_secret: config.get_string("client_secret"),
            connect_retries: config
                .get_u64("connect_retries")?
                .unwrap_or(DEFAULT_CONNECT_RETRIES),
            connect_timeout: config
                .get_u64("connect_timeout")?
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            session_idle_timeout: config
                .get_string("session_idle_timeout")
                .unwrap_or_else(|| DEFAULT_SESSION_IDLE_TIMEOUT.to_string()),
            reuse_session: config.get_bool("reuse_session")?.unwrap_or(true),
            spark_config,
        })
    }

    pub fn validate(&self) -> AdapterResult<()> {
        for (key, value) in [
            ("workspaceid", &self.workspaceid),
            ("lakehouseid", &self.lakehouseid),
            ("lakehouse", &self.lakehouse),
            ("schema", &self.schema),
        ] {
            if value.trim().is_empty() {
                return Err(AdapterError::new(
                    AdapterErrorKind::Configuration,
                    format!("The fabricspark profile requires a non-empty '{key}'"),
                ));
            }
        }

        if let Some(database) = &self.database
            && database != &self.schema
        {
            return Err(AdapterError::new(
                AdapterErrorKind::Configuration,
                format!(
                    "    schema: {} \n    database: {} \nOn Spark, database must be omitted or have the same value as schema.",
                    self.schema, database
                ),
            ));
        }

        if self.authentication == AuthenticationMethod::ServicePrincipal {
            for (key, value) in [
                ("client_id", &self.client_id),
                ("tenant_id", &self.tenant_id),
                ("client_secret", &self.client_secret),
            ] {
                if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
                    return Err(AdapterError::new(
                        AdapterErrorKind::Configuration,
                        format!("Service principal authentication requires '{key}'"),
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn type_tag(&self) -> AdapterType {
        AdapterType::FabricSpark
    }

    /// The key that identifies one target across invocations.
    pub fn unique_field(&self) -> &str {
        &self.lakehouseid
    }
}

impl fmt::Debug for FabricSparkCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FabricSparkCredentials")
            .field("method", &self.method)
            .field("authentication", &self.authentication)
            .field("endpoint", &self.endpoint)
            .field("workspaceid", &self.workspaceid)
            .field("lakehouseid", &self.lakehouseid)
            .field("lakehouse", &self.lakehouse)
            .field("schema", &self.schema)
            .field("database", &self.database)
            .field("client_id", &self.client_id)
            .field("tenant_id", &self.tenant_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("connect_retries", &self.connect_retries)
            .field("connect_timeout", &self.connect_timeout)
            .field("session_idle_timeout", &self.session_idle_timeout)
            .field("reuse_session", &self.reuse_session)
            .field("spark_config", &self.spark_config)
            .finish()
    }
}
