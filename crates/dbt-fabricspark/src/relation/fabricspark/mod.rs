mod relation;
pub use relation::{DEFAULT_QUOTE_CHARACTER, FabricSparkRelation, RelationType};
