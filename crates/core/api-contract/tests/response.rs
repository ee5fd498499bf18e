use api_contract::ApiResponse;

#[test]
fn api_response_success() {
    let response = ApiResponse::success("ok");
    assert!(response.success);
    assert!(response.data.is_some());
    assert!(response.error.is_none());
}

#[test]
fn api_response_error() {
    let response = ApiResponse::<()>::error("AUTH.UNAUTHORIZED", "unauthorized");
    assert!(!response.success);
    assert!(response.data.is_none());
    assert!(response.error.is_some());
}

#[test]
fn api_response_unavailable() {
    let response = ApiResponse::<()>::unavailable("catalog not loaded");
    assert!(response.success);
    assert!(response.data.is_none());
    let error = response.error.expect("diagnostic");
    assert_eq!(error.code, api_contract::DATA_UNAVAILABLE);
}
