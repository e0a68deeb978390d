use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// The type of the adapter.
///
/// Used as the `type` tag of connections and profiles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, Deserialize, Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum AdapterType {
    /// Microsoft Fabric Spark, reached through a Livy endpoint
    FabricSpark,
}
