//! Python model submission against an in-memory Livy session.

use dbt_common::tracing::init::init_tracing;
use dbt_common::{AdapterError, AdapterErrorKind};
use dbt_fabricspark::{
    ConnectionState, FabricSparkPythonJobHelper, PythonJobHelper, StatementKind,
};
use dbt_test_utils::{FakeSessionProvider, SharedBuffer, test_credentials};
use serde_json::json;
use tracing::level_filters::LevelFilter;

fn my_model() -> serde_json::Value {
    json!({
        "relation_name": "my_model",
        "original_file_path": "models/my_model.py",
        "config": {"submission_method": "all_purpose_cluster"},
    })
}

#[test]
fn construction_connects_once_and_opens_connection() {
    let provider = FakeSessionProvider::new();
    let helper =
        FabricSparkPythonJobHelper::try_new(&my_model(), test_credentials(), &provider).unwrap();

    assert_eq!(
        provider.connected_with(),
        vec!["8c5bc260-bc3a-4898-9ada-01e433d461ba".to_string()]
    );
    let connection = helper.connection();
    assert_eq!(connection.name, "python_submission");
    assert_eq!(connection.state, ConnectionState::Open);
    assert_eq!(connection.adapter_type.to_string(), "fabricspark");
    assert_eq!(connection.credentials.lakehouse, "dbt_lakehouse");
    assert_eq!(connection.handle.session_id().as_deref(), Some("fake-0"));

    assert_eq!(helper.relation_name(), Some("my_model"));
    assert_eq!(helper.original_file_path(), Some("models/my_model.py"));
    assert_eq!(helper.submission_method(), Some("all_purpose_cluster"));
}

#[test]
fn construction_tolerates_missing_model_attributes() {
    for model in [
        json!({}),
        json!({"relation_name": "m"}),
        json!({"original_file_path": "models/m.py", "config": {}}),
        json!({"config": null}),
    ] {
        let provider = FakeSessionProvider::new();
        let helper =
            FabricSparkPythonJobHelper::try_new(&model, test_credentials(), &provider).unwrap();
        assert_eq!(helper.submission_method(), None);
    }

    let provider = FakeSessionProvider::new();
    let helper =
        FabricSparkPythonJobHelper::try_new(&json!({}), test_credentials(), &provider).unwrap();
    assert_eq!(helper.relation_name(), None);
    assert_eq!(helper.original_file_path(), None);
}

#[test]
fn construction_propagates_connect_errors_unchanged() {
    let provider = FakeSessionProvider::new().with_connect_error(AdapterError::new(
        AdapterErrorKind::Authentication,
        "token expired",
    ));
    let err = FabricSparkPythonJobHelper::try_new(&my_model(), test_credentials(), &provider)
        .err()
        .unwrap();
    assert_eq!(err.kind(), AdapterErrorKind::Authentication);
    assert_eq!(err.message(), "token expired");
}

#[test]
fn submit_executes_as_pyspark_and_prints_rows_in_order() {
    let provider = FakeSessionProvider::new().with_rows(vec![
        json!("first line"),
        json!({"count": 3}),
        json!("last line"),
    ]);
    let output = SharedBuffer::new();
    let helper = FabricSparkPythonJobHelper::try_new(&my_model(), test_credentials(), &provider)
        .unwrap()
        .with_output(output.clone());

    let code = "def model(dbt, session):\n    return session.range(3)\n";
    helper.submit(code).unwrap();

    let executed = provider.session().executed();
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0].code, code);
    assert_eq!(executed[0].kind, StatementKind::PySpark);
    assert_eq!(executed[0].kind.as_ref(), "pyspark");
    assert_eq!(provider.session().fetch_calls(), 1);
    assert_eq!(
        output.lines(),
        vec!["first line", r#"{"count":3}"#, "last line"]
    );
}

#[test]
fn submit_uses_pyspark_tag_for_any_code() {
    let provider = FakeSessionProvider::new();
    let helper = FabricSparkPythonJobHelper::try_new(&json!({}), test_credentials(), &provider)
        .unwrap()
        .with_output(SharedBuffer::new());

    for code in ["", "select 1", "%%sql\nselect 1"] {
        helper.submit(code).unwrap();
    }
    assert!(
        provider
            .session()
            .executed()
            .iter()
            .all(|statement| statement.kind == StatementKind::PySpark)
    );
}

#[test]
fn submit_wraps_driver_errors_with_model_context() {
    init_tracing(LevelFilter::DEBUG);
    let provider = FakeSessionProvider::new()
        .with_execute_error(AdapterError::new(AdapterErrorKind::Driver, "syntax error"));
    let output = SharedBuffer::new();
    let helper = FabricSparkPythonJobHelper::try_new(&my_model(), test_credentials(), &provider)
        .unwrap()
        .with_output(output.clone());

    let err = helper.submit("this is not python").unwrap_err();
    assert_eq!(err.kind(), AdapterErrorKind::Runtime);
    for needle in [
        "my_model",
        "models/my_model.py",
        "all_purpose_cluster",
        "syntax error",
    ] {
        assert!(err.message().contains(needle), "missing {needle}: {err}");
    }
    assert_eq!(
        err.message(),
        "Unable to create model my_model (file: models/my_model.py) with a all_purpose_cluster type submission. Caused by:\nsyntax error"
    );
    assert_eq!(provider.session().fetch_calls(), 0);
    assert!(output.contents().is_empty());
}

#[test]
fn submit_wraps_driver_errors_from_fetch() {
    let provider = FakeSessionProvider::new()
        .with_fetch_error(AdapterError::new(AdapterErrorKind::Driver, "statement failed"));
    let helper = FabricSparkPythonJobHelper::try_new(&json!({}), test_credentials(), &provider)
        .unwrap()
        .with_output(SharedBuffer::new());

    let err = helper.submit("x = 1").unwrap_err();
    assert_eq!(err.kind(), AdapterErrorKind::Runtime);
    assert_eq!(
        err.message(),
        "Unable to create model None (file: None) with a None type submission. Caused by:\nstatement failed"
    );
}

#[test]
fn submit_passes_other_errors_through() {
    for kind in [
        AdapterErrorKind::Internal,
        AdapterErrorKind::Authentication,
        AdapterErrorKind::UnexpectedResult,
    ] {
        let provider = FakeSessionProvider::new()
            .with_execute_error(AdapterError::new(kind, "session vanished"));
        let helper =
            FabricSparkPythonJobHelper::try_new(&my_model(), test_credentials(), &provider)
                .unwrap()
                .with_output(SharedBuffer::new());

        let err = helper.submit("x = 1").unwrap_err();
        assert_eq!(err.kind(), kind);
        assert_eq!(err.message(), "session vanished");
    }
}

#[test]
fn submit_does_not_wrap_errors_from_opening_the_cursor() {
    let provider = FakeSessionProvider::new()
        .with_cursor_error(AdapterError::new(AdapterErrorKind::Driver, "session is dead"));
    let helper = FabricSparkPythonJobHelper::try_new(&my_model(), test_credentials(), &provider)
        .unwrap()
        .with_output(SharedBuffer::new());

    let err = helper.submit("x = 1").unwrap_err();
    assert_eq!(err.kind(), AdapterErrorKind::Driver);
    assert_eq!(err.message(), "session is dead");
    assert!(provider.session().executed().is_empty());
}

#[test]
fn submit_error_message_shows_non_string_model_attributes() {
    let provider = FakeSessionProvider::new()
        .with_execute_error(AdapterError::new(AdapterErrorKind::Driver, "boom"));
    let model = json!({"relation_name": 7, "config": {"submission_method": null}});
    let helper = FabricSparkPythonJobHelper::try_new(&model, test_credentials(), &provider)
        .unwrap()
        .with_output(SharedBuffer::new());

    let err = helper.submit("x = 1").unwrap_err();
    assert_eq!(
        err.message(),
        "Unable to create model 7 (file: None) with a None type submission. Caused by:\nboom"
    );
}
