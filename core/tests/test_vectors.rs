//! Verify request building and result conversion against the JSON vectors in
//! `test-vectors/`.
//!
//! Each case gives an action input, then either the expected validation
//! error, or the expected request plus a simulated response and the expected
//! typed outcome. Bodies are compared as parsed JSON so key order does not
//! matter.

use hybrid_sdk::{
    Action, AddOssBucketFromRemoteAction, AddOssBucketFromRemoteResult, ClientConfig, HttpMethod,
    HttpResponse, Response, SdkClient,
};

fn client() -> SdkClient {
    SdkClient::new(ClientConfig::default())
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

#[test]
fn add_oss_bucket_test_vectors() {
    let raw = include_str!("../../test-vectors/add_oss_bucket.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();

    let c = client();
    assert_eq!(c.config().base_url(), base_url);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let action: AddOssBucketFromRemoteAction =
            serde_json::from_value(case["input"].clone()).unwrap();

        if let Some(expected) = case.get("expected_validation_error") {
            let err = c.build_request(&action).unwrap_err();
            assert_eq!(err.to_string(), expected.as_str().unwrap(), "{name}: validation error");
            continue;
        }

        // Verify build
        let expected_req = &case["expected_request"];
        let req = c.build_request(&action).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{base_url}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let req_body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let generic = match c.parse_response(response) {
            Response::Done(generic) => generic,
            Response::Poll(location) => panic!("{name}: unexpected job handle {location}"),
        };
        let result = AddOssBucketFromRemoteAction::make_result(&generic);

        if let Some(expected_error) = case.get("expected_error") {
            assert!(result.value.is_none(), "{name}: value must be unset on error");
            let error = result.error.clone().unwrap();
            assert_eq!(error.code, expected_error["code"].as_str().unwrap(), "{name}: code");
            let exception = result.throw_exception_if_error().unwrap_err();
            assert_eq!(
                exception.to_string(),
                expected_error["message"].as_str().unwrap(),
                "{name}: exception message"
            );
        } else {
            assert!(result.error.is_none(), "{name}: unexpected error {:?}", result.error);
            let expected: AddOssBucketFromRemoteResult =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.value, Some(expected), "{name}: parsed result");
        }
    }
}
