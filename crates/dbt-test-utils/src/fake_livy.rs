use std::sync::{Arc, Mutex, MutexGuard};

use dbt_auth::FabricSparkCredentials;
use dbt_common::{AdapterError, AdapterResult};
use dbt_fabricspark::{Cursor, Row, SessionHandle, SessionProvider, StatementKind};

/// A statement received by a [FakeSession] cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedStatement {
    pub code: String,
    pub kind: StatementKind,
}

#[derive(Debug, Default)]
struct Script {
    rows: Vec<Row>,
    cursor_error: Option<AdapterError>,
    execute_error: Option<AdapterError>,
    fetch_error: Option<AdapterError>,
    executed: Vec<ExecutedStatement>,
    fetch_calls: usize,
}

/// An in-memory Livy session answering every statement from a script.
#[derive(Debug, Clone, Default)]
pub struct FakeSession {
    script: Arc<Mutex<Script>>,
}

impl FakeSession {
    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().expect("fake session lock")
    }

    pub fn executed(&self) -> Vec<ExecutedStatement> {
        self.script().executed.clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.script().fetch_calls
    }
}

impl SessionHandle for FakeSession {
    fn cursor(&self) -> AdapterResult<Box<dyn Cursor>> {
        if let Some(err) = self.script().cursor_error.clone() {
            return Err(err);
        }
        Ok(Box::new(FakeCursor {
            session: self.clone(),
        }))
    }

    fn session_id(&self) -> Option<String> {
        Some("fake-0".to_string())
    }
}

struct FakeCursor {
    session: FakeSession,
}

impl Cursor for FakeCursor {
    fn execute(&mut self, code: &str, kind: StatementKind) -> AdapterResult<()> {
        let mut script = self.session.script();
        script.executed.push(ExecutedStatement {
            code: code.to_string(),
            kind,
        });
        match script.execute_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fetchall(&mut self) -> AdapterResult<Vec<Row>> {
        let mut script = self.session.script();
        script.fetch_calls += 1;
        match script.fetch_error.clone() {
            Some(err) => Err(err),
            None => Ok(script.rows.clone()),
        }
    }
}

/// A session provider handing out one shared [FakeSession].
#[derive(Debug, Default)]
pub struct FakeSessionProvider {
    session: FakeSession,
    connect_error: Option<AdapterError>,
    connected_with: Mutex<Vec<String>>,
}

impl FakeSessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        self.session.script().rows = rows;
        self
    }

    pub fn with_cursor_error(self, err: AdapterError) -> Self {
        self.session.script().cursor_error = Some(err);
        self
    }

    pub fn with_execute_error(self, err: AdapterError) -> Self {
        self.session.script().execute_error = Some(err);
        self
    }

    pub fn with_fetch_error(self, err: AdapterError) -> Self {
        self.session.script().fetch_error = Some(err);
        self
    }

    pub fn with_connect_error(self, err: AdapterError) -> Self {
        Self {
            connect_error: Some(err),
            ..self
        }
    }

    pub fn session(&self) -> &FakeSession {
        &self.session
    }

    /// The `lakehouseid` of every `connect` call, in order.
    pub fn connected_with(&self) -> Vec<String> {
        self.connected_with.lock().expect("provider lock").clone()
    }
}

impl SessionProvider for FakeSessionProvider {
    fn connect(&self, credentials: &FabricSparkCredentials) -> AdapterResult<Arc<dyn SessionHandle>> {
        self.connected_with
            .lock()
            .expect("provider lock")
            .push(credentials.unique_field().to_string());
        match &self.connect_error {
            Some(err) => Err(err.clone()),
            None => Ok(Arc::new(self.session.clone())),
        }
    }
}
