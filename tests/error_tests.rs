// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use racetrack_session::error::{ApiOperation, AppError};
use racetrack_session::services::LoginForm;
use racetrack_session::store::StoreError;
use validator::Validate;

#[test]
fn test_server_messages_are_shown() {
    let err = AppError::Network("Email not verified".to_string());
    assert_eq!(err.user_message(ApiOperation::Login), "Email not verified");

    let err = AppError::BadRequest("Invalid email".to_string());
    assert_eq!(
        err.user_message(ApiOperation::RequestPasswordReset),
        "Invalid email"
    );
}

#[test]
fn test_each_operation_has_its_own_default() {
    let ops = [
        ApiOperation::Login,
        ApiOperation::RequestPasswordReset,
        ApiOperation::ResetPassword,
    ];

    for op in ops {
        let err = AppError::Network(String::new());
        assert_eq!(err.user_message(op), op.default_message());
        assert!(!op.default_message().is_empty());
    }

    assert_ne!(
        ApiOperation::Login.default_message(),
        ApiOperation::ResetPassword.default_message()
    );
}

#[test]
fn test_storage_errors_use_default_message() {
    let err = AppError::from(StoreError::Unavailable("disk full".to_string()));
    let msg = err.user_message(ApiOperation::Login);
    assert!(!msg.contains("disk"));
    assert_eq!(msg, ApiOperation::Login.default_message());
}

#[test]
fn test_validation_errors_name_fields() {
    let form = LoginForm {
        email: "nope".to_string(),
        password: String::new(),
    };
    let err = AppError::from(form.validate().unwrap_err());

    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(err.user_message(ApiOperation::Login), "Invalid email, password");
}

#[test]
fn test_pending_request_message() {
    let msg = AppError::RequestPending.user_message(ApiOperation::Login);
    assert_eq!(msg, "A request is already in progress");
}
