//! Policy objects and the generic qualified-name renderer shared by relations.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// The parts of a qualified relation name, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ComponentName {
    Database,
    Schema,
    Identifier,
}

/// One flag per name component, used both for quoting and for inclusion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Policy {
    pub database: bool,
    pub schema: bool,
    pub identifier: bool,
}

impl Policy {
    pub const fn new(database: bool, schema: bool, identifier: bool) -> Self {
        Self {
            database,
            schema,
            identifier,
        }
    }

    pub const fn enabled() -> Self {
        Self::new(true, true, true)
    }

    pub const fn disabled() -> Self {
        Self::new(false, false, false)
    }

    pub fn get(&self, component: ComponentName) -> bool {
        match component {
            ComponentName::Database => self.database,
            ComponentName::Schema => self.schema,
            ComponentName::Identifier => self.identifier,
        }
    }

    /// Returns a copy with the given flags overridden.
    pub fn replace(
        self,
        database: Option<bool>,
        schema: Option<bool>,
        identifier: Option<bool>,
    ) -> Self {
        Self {
            database: database.unwrap_or(self.database),
            schema: schema.unwrap_or(self.schema),
            identifier: identifier.unwrap_or(self.identifier),
        }
    }
}

/// A policy given with some flags left out; missing flags keep their defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct PolicyPatch {
    #[serde(default)]
    database: Option<bool>,
    #[serde(default)]
    schema: Option<bool>,
    #[serde(default)]
    identifier: Option<bool>,
}

impl PolicyPatch {
    pub(crate) fn apply_to(self, base: Policy) -> Policy {
        base.replace(self.database, self.schema, self.identifier)
    }
}

/// The database, schema and identifier of a relation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationPath {
    pub database: Option<String>,
    pub schema: Option<String>,
    pub identifier: Option<String>,
}

impl RelationPath {
    pub fn get(&self, component: ComponentName) -> Option<&str> {
        match component {
            ComponentName::Database => self.database.as_deref(),
            ComponentName::Schema => self.schema.as_deref(),
            ComponentName::Identifier => self.identifier.as_deref(),
        }
    }
}

/// Renders a [RelationPath] as `part.part.part`.
///
/// Components that are excluded by `include_policy`, or absent from the path,
/// are dropped; the rest are wrapped in `quote_character` when
/// `quote_policy` asks for it. No escaping is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedNameRenderer {
    pub include_policy: Policy,
    pub quote_policy: Policy,
    pub quote_character: char,
}

impl QualifiedNameRenderer {
    pub const SEPARATOR: &'static str = ".";

    pub fn quoted(&self, part: &str) -> String {
        format!("{q}{part}{q}", q = self.quote_character)
    }

    pub fn render(&self, path: &RelationPath) -> String {
        use strum::IntoEnumIterator;

        ComponentName::iter()
            .filter(|component| self.include_policy.get(*component))
            .filter_map(|component| {
                path.get(component).map(|part| {
                    if self.quote_policy.get(component) {
                        self.quoted(part)
                    } else {
                        part.to_string()
                    }
                })
            })
            .collect::<Vec<_>>()
            .join(Self::SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(database: Option<&str>, schema: Option<&str>, identifier: Option<&str>) -> RelationPath {
        RelationPath {
            database: database.map(String::from),
            schema: schema.map(String::from),
            identifier: identifier.map(String::from),
        }
    }

    #[test]
    fn test_render_all_parts_quoted() {
        let renderer = QualifiedNameRenderer {
            include_policy: Policy::enabled(),
            quote_policy: Policy::enabled(),
            quote_character: '"',
        };
        assert_eq!(
            renderer.render(&path(Some("db"), Some("main"), Some("t"))),
            "\"db\".\"main\".\"t\""
        );
    }

    #[test]
    fn test_render_skips_excluded_and_missing_parts() {
        let renderer = QualifiedNameRenderer {
            include_policy: Policy::new(false, true, true),
            quote_policy: Policy::new(false, false, true),
            quote_character: '`',
        };
        assert_eq!(
            renderer.render(&path(Some("db"), Some("lh"), Some("t"))),
            "lh.`t`"
        );
        assert_eq!(renderer.render(&path(None, None, Some("t"))), "`t`");
        assert_eq!(renderer.render(&path(Some("db"), None, None)), "");
    }

    #[test]
    fn test_policy_replace_and_get() {
        let policy = Policy::disabled().replace(None, Some(true), None);
        assert!(!policy.get(ComponentName::Database));
        assert!(policy.get(ComponentName::Schema));
        assert!(!policy.get(ComponentName::Identifier));
    }

    #[test]
    fn test_policy_patch_keeps_unset_flags() {
        let patch: PolicyPatch = serde_json::from_str(r#"{"identifier": false}"#).unwrap();
        assert_eq!(
            patch.apply_to(Policy::new(false, true, true)),
            Policy::new(false, true, false)
        );
    }

    #[test]
    fn test_component_name_order_and_tags() {
        use strum::IntoEnumIterator;
        let names: Vec<_> = ComponentName::iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["database", "schema", "identifier"]);
    }
}
