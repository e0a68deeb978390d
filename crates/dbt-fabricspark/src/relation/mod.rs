//! Relation naming for the FabricSpark adapter.

mod base;
pub use base::{ComponentName, Policy, QualifiedNameRenderer, RelationPath};

mod fabricspark;
pub use fabricspark::{DEFAULT_QUOTE_CHARACTER, FabricSparkRelation, RelationType};

mod relation_object;
pub use relation_object::{FabricSparkRelationType, RelationObject};
