use httpmock::prelude::*;
use route_etl::utils::error::EtlError;
use route_etl::{EtlEngine, LocalStorage, RoutePipeline, TomlConfig};
use serde_json::{json, Value};
use tempfile::TempDir;

const AUTHORIZATION_PATH: &str = "/site/content/jca/cometa/pt-br/jcr:content.authorization.json";

fn mock_operator_auth(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/site/");
        then.status(200)
            .body(r#"<html><body><input type="hidden" id="clientId" value="client-42"/></body></html>"#);
    });
    server.mock(|when, then| {
        when.method(GET).path(AUTHORIZATION_PATH);
        then.status(200)
            .json_body(json!({"isSuccess": true, "result": {"authorizationId": "auth-7"}}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/oauth/v3/login");
        then.status(200).json_body(json!({"access_token": "token-xyz"}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/place/v1/searchOrigin")
            .header("access_token", "token-xyz");
        then.status(200).json_body(json!({
            "success": true,
            "result": [
                {"id": 10, "city": "Curitiba"},
                {"id": 20, "city": "Campinas"}
            ]
        }));
    });
}

fn config(server: &MockServer, output_path: &str, trips: &[(&str, &str)]) -> TomlConfig {
    let mut content = format!(
        r#"
[pipeline]
name = "pipeline-test"

[source]
site_url = "{}"
api_url = "{}"
timeout_seconds = 5

[extract]
start_date = "2024-01-01"
days = 2

[load]
output_path = "{}"
"#,
        server.url("/site/"),
        server.url("/api/"),
        output_path
    );
    for (origin, destination) in trips {
        content.push_str(&format!(
            "\n[[extract.trips]]\norigin = \"{}\"\ndestination = \"{}\"\n",
            origin, destination
        ));
    }
    TomlConfig::from_toml_str(&content).unwrap()
}

fn read_json(path: &std::path::Path) -> Vec<Value> {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_end_to_end_route_collection() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    mock_operator_auth(&server);

    let routes_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/route/v1/getRoutes")
            .header("client_id", "client-42")
            .json_body_partial(r#"{"origin": 10, "destination": 20}"#);
        then.status(200).json_body(json!({
            "success": true,
            "result": {"servicesList": [{"price": 129.9, "departure": "08:00"}]}
        }));
    });
    let unavailable_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/route/v1/getRoutes")
            .json_body_partial(r#"{"origin": 20, "destination": 10}"#);
        then.status(200)
            .json_body(json!({"success": false, "message": "no services"}));
    });

    let config = config(
        &server,
        &output_path,
        &[("Curitiba", "Campinas"), ("Campinas", "Curitiba")],
    );
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = RoutePipeline::new(storage, config).unwrap();
    let engine = EtlEngine::new_with_monitoring(pipeline, false);

    let summary = engine.run().await.unwrap();

    routes_mock.assert_hits(2);
    unavailable_mock.assert_hits(2);
    assert_eq!(summary.route_count, 2);
    assert_eq!(summary.failure_count, 2);

    let routes = read_json(&temp_dir.path().join("result_api.json"));
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0]["success"], json!(true));
    assert_eq!(routes[0]["result"]["servicesList"][0]["price"], json!(129.9));
    assert_eq!(routes[0]["collect_at"]["timezone"], json!("UTC"));
    // Every record of a run shares the same collection stamp.
    assert_eq!(routes[0]["collect_at"], routes[1]["collect_at"]);

    let failures = read_json(&temp_dir.path().join("result_api_invalid.json"));
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0]["response.code"], json!(200));
    let body: Value = serde_json::from_str(failures[0]["response.body"].as_str().unwrap()).unwrap();
    assert_eq!(body["message"], json!("no services"));
}

#[tokio::test]
async fn test_unknown_city_aborts_before_fetching() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    mock_operator_auth(&server);
    let routes_mock = server.mock(|when, then| {
        when.method(POST).path("/api/route/v1/getRoutes");
        then.status(200);
    });

    let config = config(
        &server,
        &output_path,
        &[("Curitiba", "Campinas"), ("Curitiba", "Atlantis")],
    );
    let pipeline = RoutePipeline::new(LocalStorage::new(output_path), config).unwrap();
    let result = EtlEngine::new(pipeline).run().await;

    assert!(matches!(
        result,
        Err(EtlError::LocaleNotFound { city }) if city == "Atlantis"
    ));
    routes_mock.assert_hits(0);
    assert!(!temp_dir.path().join("result_api.json").exists());
    assert!(!temp_dir.path().join("result_api_invalid.json").exists());
}

#[tokio::test]
async fn test_failed_bootstrap_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/site/");
        then.status(200).body("<html><body></body></html>");
    });

    let config = config(&server, &output_path, &[("Curitiba", "Campinas")]);
    let pipeline = RoutePipeline::new(LocalStorage::new(output_path), config).unwrap();
    let result = EtlEngine::new(pipeline).run().await;

    assert!(matches!(result, Err(EtlError::Auth { .. })));
    assert!(!temp_dir.path().join("result_api.json").exists());
}
