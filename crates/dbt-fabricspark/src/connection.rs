use std::sync::Arc;

use dbt_auth::FabricSparkCredentials;
use dbt_common::{AdapterResult, AdapterType};
use strum::{AsRefStr, Display};

use crate::livy::{Cursor, SessionHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionState {
    Open,
}

/// A named connection wrapping a borrowed Livy session.
#[derive(Debug, Clone)]
pub struct Connection {
    /// The adapter type tag, always `fabricspark`
    pub adapter_type: AdapterType,
    /// The connection name
    pub name: String,
    /// The lifecycle state
    pub state: ConnectionState,
    /// The credentials the session was resolved with
    pub credentials: FabricSparkCredentials,
    /// The borrowed Livy session
    pub handle: Arc<dyn SessionHandle>,
}

impl Connection {
    /// Wraps an already open session.
    pub fn open(
        name: impl Into<String>,
        credentials: FabricSparkCredentials,
        handle: Arc<dyn SessionHandle>,
    ) -> Self {
        Self {
            adapter_type: credentials.type_tag(),
            name: name.into(),
            state: ConnectionState::Open,
            credentials,
            handle,
        }
    }

    pub fn cursor(&self) -> AdapterResult<Box<dyn Cursor>> {
        self.handle.cursor()
    }
}
