//! Profile configuration and credentials for the FabricSpark adapter.

mod config;
pub mod fabricspark;

pub use config::AdapterConfig;
pub use fabricspark::{AuthenticationMethod, ConnectionMethod, FabricSparkCredentials};
