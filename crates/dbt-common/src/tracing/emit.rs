//! Thin wrappers that emit log records with a consistent set of fields.
//!
//! Every record carries a `code` field when an [ErrorCode] applies, so
//! subscribers can filter adapter warnings without parsing messages.

use crate::errors::ErrorCode;

pub fn emit_debug_log_message(message: impl AsRef<str>) {
    tracing::debug!(target: "dbt", "{}", message.as_ref());
}

pub fn emit_info_log_message(message: impl AsRef<str>) {
    tracing::info!(target: "dbt", "{}", message.as_ref());
}

pub fn emit_warn_log_message(code: ErrorCode, message: impl AsRef<str>) {
    tracing::warn!(
        target: "dbt",
        code = code.as_ref(),
        code_num = code.code(),
        "{}",
        message.as_ref()
    );
}
