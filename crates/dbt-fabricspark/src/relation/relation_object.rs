//! Jinja exposure of relations: `{{ relation }}` and `api.Relation.create(...)`.

use std::fmt;
use std::sync::Arc;

use dbt_common::AdapterError;
use minijinja::value::{Kwargs, Object, from_args};
use minijinja::{Error as MinijinjaError, ErrorKind, State, Value};

use super::{FabricSparkRelation, RelationType};

fn to_minijinja_error(err: AdapterError) -> MinijinjaError {
    MinijinjaError::new(ErrorKind::InvalidOperation, err.to_string())
}

/// A relation as seen from templates.
#[derive(Debug, Clone)]
pub struct RelationObject(Arc<FabricSparkRelation>);

impl RelationObject {
    pub fn new(relation: Arc<FabricSparkRelation>) -> Self {
        Self(relation)
    }

    pub fn inner(&self) -> &FabricSparkRelation {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::from_object(self)
    }
}

impl From<FabricSparkRelation> for RelationObject {
    fn from(relation: FabricSparkRelation) -> Self {
        Self::new(Arc::new(relation))
    }
}

impl Object for RelationObject {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let relation = self.inner();
        let value = match key.as_str()? {
            "database" => Value::from(relation.database()),
            "schema" => Value::from(relation.schema()),
            "identifier" | "name" | "table" => Value::from(relation.identifier()),
            "type" => Value::from(relation.relation_type.as_ref()),
            "is_table" => Value::from(relation.is_table()),
            "is_view" => Value::from(relation.is_view()),
            "is_cte" => Value::from(relation.is_cte()),
            "is_delta" => Value::from(relation.is_delta()),
            "information" => Value::from(relation.information()),
            "quote_character" => Value::from(relation.quote_character.to_string()),
            _ => return None,
        };
        Some(value)
    }

    fn call_method(
        self: &Arc<Self>,
        _state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> Result<Value, MinijinjaError> {
        match method {
            "render" => {
                if !args.is_empty() {
                    return Err(MinijinjaError::new(
                        ErrorKind::TooManyArguments,
                        "render() takes no arguments",
                    ));
                }
                self.inner()
                    .render()
                    .map(Value::from)
                    .map_err(to_minijinja_error)
            }
            _ => Err(MinijinjaError::new(
                ErrorKind::InvalidOperation,
                format!("relation has no method named {method}"),
            )),
        }
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        Self: Sized + 'static,
    {
        // A policy violation surfaces as a template error
        let rendered = self.inner().render().map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

/// The static relation factory, exposed to templates as `api.Relation`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FabricSparkRelationType;

impl FabricSparkRelationType {
    pub fn create(
        &self,
        database: Option<String>,
        schema: Option<String>,
        identifier: Option<String>,
        relation_type: Option<RelationType>,
    ) -> Result<Value, MinijinjaError> {
        let relation = FabricSparkRelation::try_new(database, schema, identifier, relation_type)
            .map_err(to_minijinja_error)?;
        Ok(RelationObject::from(relation).into_value())
    }

    pub fn get_adapter_type(&self) -> String {
        "fabricspark".to_string()
    }

    pub fn into_value(self) -> Value {
        Value::from_object(self)
    }
}

impl Object for FabricSparkRelationType {
    fn call_method(
        self: &Arc<Self>,
        _state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> Result<Value, MinijinjaError> {
        match method {
            "create" => {
                let (kwargs,): (Kwargs,) = from_args(args)?;
                let database = kwargs.get::<Option<String>>("database")?;
                let schema = kwargs.get::<Option<String>>("schema")?;
                let identifier = kwargs.get::<Option<String>>("identifier")?;
                let relation_type = kwargs
                    .get::<Option<String>>("type")?
                    .map(|t| {
                        t.parse::<RelationType>().map_err(|_| {
                            MinijinjaError::new(
                                ErrorKind::InvalidOperation,
                                format!("unknown relation type '{t}'"),
                            )
                        })
                    })
                    .transpose()?;
                kwargs.assert_all_used()?;
                self.create(database, schema, identifier, relation_type)
            }
            _ => Err(MinijinjaError::new(
                ErrorKind::InvalidOperation,
                format!("api.Relation has no method named {method}"),
            )),
        }
    }
}
