use super::*;

#[test]
fn validate_login_input_trims_email() {
    assert_eq!(
        validate_login_input("  dora@salukivet.com.br ", "s3cret"),
        Ok(("dora@salukivet.com.br".to_owned(), "s3cret".to_owned()))
    );
}

#[test]
fn validate_login_input_keeps_password_whitespace() {
    assert_eq!(validate_login_input("a@b.com", " pw "), Ok(("a@b.com".to_owned(), " pw ".to_owned())));
}

#[test]
fn validate_login_input_requires_both_fields() {
    assert_eq!(validate_login_input("   ", "pw"), Err("Enter both email and password."));
    assert_eq!(validate_login_input("a@b.com", ""), Err("Enter both email and password."));
}

#[test]
fn login_error_message_distinguishes_failures() {
    assert_eq!(login_error_message(&ApiError::Unauthorized), "Invalid email or password.");
    assert_eq!(
        login_error_message(&ApiError::Status { status: 422, body: String::new() }),
        "Sign-in failed (422)."
    );
    assert_eq!(
        login_error_message(&ApiError::Status { status: 502, body: String::new() }),
        "The server is unavailable. Try again shortly."
    );
    assert_eq!(
        login_error_message(&ApiError::Transport("refused".to_owned())),
        "Could not reach the server."
    );
}
