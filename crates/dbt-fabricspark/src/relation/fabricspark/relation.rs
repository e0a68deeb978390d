use dbt_common::tracing::emit::emit_debug_log_message;
use dbt_common::{AdapterError, AdapterErrorKind, AdapterResult};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::relation::base::{Policy, PolicyPatch, QualifiedNameRenderer, RelationPath};

pub const DEFAULT_QUOTE_CHARACTER: char = '`';

/// The kinds of relation a Spark model can produce.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[allow(clippy::upper_case_acronyms)]
pub enum RelationType {
    #[default]
    Table,
    View,
    CTE,
}

fn config_error(message: &str) -> AdapterError {
    emit_debug_log_message(format!("Rejected spark relation: {message}"));
    AdapterError::new(AdapterErrorKind::Configuration, message)
}

/// A table, view or CTE name in a Fabric lakehouse.
///
/// Spark has no database namespace apart from the schema: a relation may
/// carry a database only if it repeats the schema, and at most one of the
/// two is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFabricSparkRelation")]
pub struct FabricSparkRelation {
    /// The database, schema, and identifier of the relation
    pub path: RelationPath,
    /// The relation type
    #[serde(rename = "type")]
    pub relation_type: RelationType,
    /// Quote policy
    pub quote_policy: Policy,
    /// Include policy
    pub include_policy: Policy,
    /// Character wrapped around quoted components
    pub quote_character: char,
    /// Whether the table is stored as Delta, when known
    pub is_delta: Option<bool>,
    /// Free-form description from `show table extended`
    pub information: Option<String>,
}

impl FabricSparkRelation {
    pub const fn default_quote_policy() -> Policy {
        Policy::disabled()
    }

    pub const fn default_include_policy() -> Policy {
        Policy::new(false, true, true)
    }

    /// Creates a relation with the default policies.
    ///
    /// A missing `relation_type` means a table.
    pub fn try_new(
        database: Option<String>,
        schema: Option<String>,
        identifier: Option<String>,
        relation_type: Option<RelationType>,
    ) -> AdapterResult<Self> {
        Self::try_new_with_policy(
            RelationPath {
                database,
                schema,
                identifier,
            },
            relation_type,
            Self::default_include_policy(),
            Self::default_quote_policy(),
        )
    }

    pub fn try_new_with_policy(
        path: RelationPath,
        relation_type: Option<RelationType>,
        include_policy: Policy,
        quote_policy: Policy,
    ) -> AdapterResult<Self> {
        let relation = Self {
            path,
            relation_type: relation_type.unwrap_or_default(),
            quote_policy,
            include_policy,
            quote_character: DEFAULT_QUOTE_CHARACTER,
            is_delta: None,
            information: None,
        };
        relation.validate()?;
        Ok(relation)
    }

    fn validate(&self) -> AdapterResult<()> {
        let database = self.path.database.as_deref().filter(|db| !db.is_empty());
        match database {
            Some(db) if Some(db) != self.path.schema.as_deref() => {
                Err(config_error("Cannot set database in spark!"))
            }
            _ => Ok(()),
        }
    }

    pub fn with_quote_character(self, quote_character: char) -> Self {
        Self {
            quote_character,
            ..self
        }
    }

    pub fn with_is_delta(self, is_delta: Option<bool>) -> Self {
        Self { is_delta, ..self }
    }

    pub fn with_information(self, information: Option<String>) -> Self {
        Self {
            information,
            ..self
        }
    }

    /// Returns a copy that renders the components selected by `include_policy`.
    pub fn include(&self, include_policy: Policy) -> Self {
        Self {
            include_policy,
            ..self.clone()
        }
    }

    /// Returns a copy that quotes the components selected by `quote_policy`.
    pub fn quote(&self, quote_policy: Policy) -> Self {
        Self {
            quote_policy,
            ..self.clone()
        }
    }

    pub fn database(&self) -> Option<&str> {
        self.path.database.as_deref()
    }

    pub fn schema(&self) -> Option<&str> {
        self.path.schema.as_deref()
    }

    pub fn identifier(&self) -> Option<&str> {
        self.path.identifier.as_deref()
    }

    pub fn is_table(&self) -> bool {
        self.relation_type == RelationType::Table
    }

    pub fn is_view(&self) -> bool {
        self.relation_type == RelationType::View
    }

    pub fn is_cte(&self) -> bool {
        self.relation_type == RelationType::CTE
    }

    pub fn is_delta(&self) -> Option<bool> {
        self.is_delta
    }

    pub fn information(&self) -> Option<&str> {
        self.information.as_deref()
    }

    pub fn renderer(&self) -> QualifiedNameRenderer {
        QualifiedNameRenderer {
            include_policy: self.include_policy,
            quote_policy: self.quote_policy,
            quote_character: self.quote_character,
        }
    }

    /// Renders the qualified name.
    pub fn render(&self) -> AdapterResult<String> {
        if self.include_policy.database && self.include_policy.schema {
            return Err(config_error(
                "Got a spark relation with schema and database set to include, but only one can be set",
            ));
        }
        Ok(self.renderer().render(&self.path))
    }
}

/// The accepted serialized form: either a nested `path` or flat
/// `database`/`schema`/`identifier` keys, with every other field optional.
#[derive(Debug, Default, Deserialize)]
struct RawFabricSparkRelation {
    #[serde(default)]
    path: Option<RelationPath>,
    #[serde(default)]
    database: Option<String>,
    #[serde(default)]
    schema: Option<String>,
    #[serde(default)]
    identifier: Option<String>,
    #[serde(default, rename = "type")]
    relation_type: Option<RelationType>,
    #[serde(default)]
    quote_policy: Option<PolicyPatch>,
    #[serde(default)]
    include_policy: Option<PolicyPatch>,
    #[serde(default)]
    quote_character: Option<char>,
    #[serde(default)]
    is_delta: Option<bool>,
    #[serde(default)]
    information: Option<String>,
}

impl TryFrom<RawFabricSparkRelation> for FabricSparkRelation {
    type Error = AdapterError;

    fn try_from(raw: RawFabricSparkRelation) -> Result<Self, Self::Error> {
        let mut path = raw.path.unwrap_or_default();
        if raw.database.is_some() {
            path.database = raw.database;
        }
        if raw.schema.is_some() {
            path.schema = raw.schema;
        }
        if raw.identifier.is_some() {
            path.identifier = raw.identifier;
        }

        let include_policy = raw
            .include_policy
            .unwrap_or_default()
            .apply_to(Self::default_include_policy());
        let quote_policy = raw
            .quote_policy
            .unwrap_or_default()
            .apply_to(Self::default_quote_policy());

        // A missing or null type means a table
        let relation = Self::try_new_with_policy(
            path,
            raw.relation_type,
            include_policy,
            quote_policy,
        )?;

        Ok(relation
            .with_quote_character(raw.quote_character.unwrap_or(DEFAULT_QUOTE_CHARACTER))
            .with_is_delta(raw.is_delta)
            .with_information(raw.information))
    }
}
