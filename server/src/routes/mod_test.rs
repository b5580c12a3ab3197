use super::*;

#[test]
fn leptos_config_error_names_its_source() {
    let err = RouterError::LeptosConfig("missing output-name".to_owned());
    assert_eq!(err.to_string(), "leptos configuration: missing output-name");
}

#[tokio::test]
async fn healthz_is_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}
