use std::io::{self, Write};
use std::sync::Mutex;

use dbt_auth::FabricSparkCredentials;
use dbt_common::tracing::emit::{
    emit_debug_log_message, emit_info_log_message, emit_warn_log_message,
};
use dbt_common::{AdapterError, AdapterErrorKind, AdapterResult, ErrorCode};
use serde_json::Value;

use super::PythonJobHelper;
use crate::connection::Connection;
use crate::livy::{Cursor, Row, SessionProvider, StatementKind};

const CONNECTION_NAME: &str = "python_submission";

/// The parts of a parsed model the submission helper reads.
///
/// Every field is optional; a model without them still submits, and the
/// missing values print as `None` in error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PythonModelConfig {
    pub relation_name: Option<String>,
    pub original_file_path: Option<String>,
    /// Read from `config.submission_method`
    pub submission_method: Option<String>,
}

impl PythonModelConfig {
    pub fn from_parsed_model(parsed_model: &Value) -> Self {
        // Non-string values keep their JSON text, null counts as unset
        let string_attr = |value: Option<&Value>| match value? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        };

        Self {
            relation_name: string_attr(parsed_model.get("relation_name")),
            original_file_path: string_attr(parsed_model.get("original_file_path")),
            submission_method: string_attr(
                parsed_model
                    .get("config")
                    .and_then(|config| config.get("submission_method")),
            ),
        }
    }
}

fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or("None")
}

/// Submits Python models to a Livy session.
pub struct FabricSparkPythonJobHelper {
    config: PythonModelConfig,
    connection: Connection,
    output: Mutex<Box<dyn Write + Send>>,
}

impl FabricSparkPythonJobHelper {
    /// Resolves a session through `provider` right away; a failure to connect
    /// is returned as the provider reported it.
    pub fn try_new(
        parsed_model: &Value,
        credentials: FabricSparkCredentials,
        provider: &dyn SessionProvider,
    ) -> AdapterResult<Self> {
        let config = PythonModelConfig::from_parsed_model(parsed_model);
        let handle = provider.connect(&credentials)?;

        emit_debug_log_message(format!(
            "Prepared python submission for {} using {} (session: {})",
            or_none(config.relation_name.as_deref()),
            or_none(config.submission_method.as_deref()),
            or_none(handle.session_id().as_deref()),
        ));

        Ok(Self {
            config,
            connection: Connection::open(CONNECTION_NAME, credentials, handle),
            output: Mutex::new(Box::new(io::stdout())),
        })
    }

    /// Redirects result rows to `writer` instead of stdout.
    pub fn with_output(self, writer: impl Write + Send + 'static) -> Self {
        Self {
            output: Mutex::new(Box::new(writer)),
            ..self
        }
    }

    pub fn relation_name(&self) -> Option<&str> {
        self.config.relation_name.as_deref()
    }

    pub fn original_file_path(&self) -> Option<&str> {
        self.config.original_file_path.as_deref()
    }

    pub fn submission_method(&self) -> Option<&str> {
        self.config.submission_method.as_deref()
    }

    pub fn config(&self) -> &PythonModelConfig {
        &self.config
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    fn run(cursor: &mut dyn Cursor, compiled_code: &str) -> AdapterResult<Vec<Row>> {
        cursor.execute(compiled_code, StatementKind::PySpark)?;
        cursor.fetchall()
    }

    fn write_rows(&self, rows: &[Row]) -> AdapterResult<()> {
        let mut output = self.output.lock().map_err(|_| {
            AdapterError::new(
                AdapterErrorKind::Internal,
                "python submission output channel is poisoned",
            )
        })?;

        let result = rows
            .iter()
            .try_for_each(|row| match row {
                Value::String(line) => writeln!(output, "{line}"),
                other => writeln!(output, "{other}"),
            })
            .and_then(|_| output.flush());

        result.map_err(|e| {
            AdapterError::new(
                AdapterErrorKind::Internal,
                format!("Failed to write python model output: {e}"),
            )
        })
    }

    fn contextualize(&self, err: AdapterError) -> AdapterError {
        AdapterError::new(
            AdapterErrorKind::Runtime,
            format!(
                "Unable to create model {} (file: {}) with a {} type submission. Caused by:\n{}",
                or_none(self.relation_name()),
                or_none(self.original_file_path()),
                or_none(self.submission_method()),
                err.message()
            ),
        )
    }
}

impl PythonJobHelper for FabricSparkPythonJobHelper {
    #[tracing::instrument(skip_all, level = "trace")]
    fn submit(&self, compiled_code: &str) -> AdapterResult<()> {
        emit_debug_log_message(format!(
            "Submitting {} bytes of pyspark code for {}",
            compiled_code.len(),
            or_none(self.relation_name()),
        ));

        let mut cursor = self.connection.cursor()?;
        let rows = match Self::run(cursor.as_mut(), compiled_code) {
            Ok(rows) => rows,
            Err(err) if err.kind() == AdapterErrorKind::Driver => {
                let err = self.contextualize(err);
                emit_warn_log_message(ErrorCode::RemoteError, err.message());
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        self.write_rows(&rows)?;
        emit_info_log_message(format!(
            "Python model {} returned {} output rows",
            or_none(self.relation_name()),
            rows.len()
        ));
        Ok(())
    }
}
