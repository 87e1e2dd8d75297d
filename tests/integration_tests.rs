use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;
use vault_env::fetch::BasicClient;
use vault_env::fetch::auth::{NAMESPACE_HEADER, TOKEN_HEADER, VaultAuth};
use vault_env::infra::vault::{VaultConfig, VaultStore};
use vault_env::payload::{SecretPayload, SecretValue, payload_from_json};
use vault_env::{ResolutionMode, ResolveError, Resolver, SecretStore};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves fixed payloads and counts reads per path.
#[derive(Default)]
struct StubStore {
    paths: HashMap<String, SecretPayload>,
    reads: Mutex<HashMap<String, usize>>,
}

impl StubStore {
    fn with(mut self, path: &str, data: serde_json::Value) -> Self {
        self.paths.insert(path.to_string(), payload_from_json(data));
        self
    }

    fn reads_of(&self, path: &str) -> usize {
        self.reads.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl SecretStore for StubStore {
    async fn read(&self, path: &str) -> anyhow::Result<SecretPayload> {
        *self.reads.lock().unwrap().entry(path.to_string()).or_default() += 1;
        self.paths
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("NOT FOUND"))
    }
}

fn environment(entries: &[&str], sep: &str) -> ResolutionMode {
    ResolutionMode::Environment {
        environ: entries.iter().map(|s| s.to_string()).collect(),
        key_separator: Some(sep.to_string()),
    }
}

#[tokio::test]
async fn test_end_to_end_shared_path() {
    let store = StubStore::default().with(
        "aws/creds/role",
        json!({"access_key": "abc", "secret_key": "mysecret"}),
    );

    let result = Resolver::new(&store)
        .resolve(environment(
            &[
                "AWS_ACCESS_KEY_ID=vault:aws/creds/role:access_key",
                "AWS_SECRET_ACCESS_KEY=vault:aws/creds/role:secret_key",
            ],
            ":",
        ))
        .await
        .unwrap();

    let expected: HashMap<&str, &str> = [
        ("AWS_ACCESS_KEY_ID", "abc"),
        ("AWS_SECRET_ACCESS_KEY", "mysecret"),
    ]
    .into_iter()
    .collect();
    assert_eq!(result.len(), expected.len());
    for (name, value) in expected {
        assert_eq!(result[name], value);
    }
    assert_eq!(store.reads_of("aws/creds/role"), 1);
}

#[tokio::test]
async fn test_many_references_one_read_per_path() {
    let store = StubStore::default()
        .with("db/creds", json!({"user": "u", "password": "p"}))
        .with("api/key", json!({"value": "k"}));

    let result = Resolver::new(&store)
        .resolve(environment(
            &[
                "DB_USER=vault:db/creds#user",
                "DB_PASSWORD=vault:db/creds#password",
                "DB_USER_AGAIN=vault:db/creds#user",
                "API_KEY=vault:api/key",
                "API_KEY_2=vault:api/key",
            ],
            "#",
        ))
        .await
        .unwrap();

    assert_eq!(result.len(), 5);
    assert_eq!(result["API_KEY_2"], "k");
    assert_eq!(store.reads_of("db/creds"), 1);
    assert_eq!(store.reads_of("api/key"), 1);
}

#[tokio::test]
async fn test_missing_path_wrapped_with_variable() {
    let store = StubStore::default();
    let err = Resolver::new(&store)
        .resolve(environment(&["SECRET=vault:does/not/exist"], ":"))
        .await
        .unwrap_err();

    assert!(matches!(err.root(), ResolveError::Store(_)));
    let msg = err.to_string();
    assert!(msg.starts_with("SECRET ("));
    assert!(msg.contains("does/not/exist"));
    assert!(msg.ends_with("NOT FOUND"));
}

#[tokio::test]
async fn test_ambiguous_payload_names_all_keys() {
    let store = StubStore::default().with("multi", json!({"b": "y", "a": "x"}));
    let err = Resolver::new(&store)
        .resolve(environment(&["V=vault:multi"], ":"))
        .await
        .unwrap_err();

    assert!(matches!(err.root(), ResolveError::AmbiguousKey { .. }));
    assert!(err.to_string().contains("Keys were: 'a,b'"));
}

#[tokio::test]
async fn test_vault_store_reads_data_with_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/aws/creds/role"))
        .and(header(TOKEN_HEADER, "s.token"))
        .and(header(NAMESPACE_HEADER, "team-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lease_id": "aws/creds/role/abcd",
            "lease_duration": 3600,
            "data": {
                "access_key": "AKIA",
                "secret_key": "shh",
                "security_token": null
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = VaultConfig {
        address: server.uri(),
        token: Some("s.token".to_string()),
        namespace: Some("team-a".to_string()),
        timeout: Duration::from_secs(5),
        ..VaultConfig::default()
    };
    let store = VaultStore::from_config(&config).unwrap();

    let result = Resolver::new(&store)
        .resolve(ResolutionMode::FixedPath {
            path: "aws/creds/role".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(result["AWS_ACCESS_KEY_ID"], "AKIA");
    assert_eq!(result["AWS_SECRET_ACCESS_KEY"], "shh");
    assert_eq!(result["AWS_SESSION_TOKEN"], "");
}

#[tokio::test]
async fn test_vault_store_missing_data_is_empty_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let client = VaultAuth::new(BasicClient::new(Duration::from_secs(5)).unwrap(), None, None)
        .unwrap();
    let store = VaultStore::new(client, &server.uri()).unwrap();

    assert!(store.read("secret/empty").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_vault_store_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errors": []})))
        .mount(&server)
        .await;

    let client = BasicClient::new(Duration::from_secs(5)).unwrap();
    let store = VaultStore::new(client, &server.uri()).unwrap();

    let err = store.read("secret/missing").await.unwrap_err();
    assert_eq!(err.to_string(), "No secret found at path 'secret/missing'");
}

#[tokio::test]
async fn test_vault_store_permission_denied_aborts_resolution() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/locked"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"errors": ["permission denied"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = BasicClient::new(Duration::from_secs(5)).unwrap();
    let store = VaultStore::new(client, &server.uri()).unwrap();

    let err = Resolver::new(&store)
        .resolve(environment(&["LOCKED=vault:secret/locked"], ":"))
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.starts_with("LOCKED (path=secret/locked key=): Error making API request."));
    assert!(msg.contains("Code: 403."));
    assert!(msg.contains("* permission denied"));
}

#[tokio::test]
async fn test_vault_store_non_string_value_is_wrong_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/data/app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"data": {"password": "hunter2"}, "metadata": {"version": 3}}
        })))
        .mount(&server)
        .await;

    let client = BasicClient::new(Duration::from_secs(5)).unwrap();
    let store = VaultStore::new(client, &server.uri()).unwrap();

    let err = Resolver::new(&store)
        .resolve(environment(&["APP=vault:secret/data/app:data"], ":"))
        .await
        .unwrap_err();

    assert!(err.to_string().ends_with("Invalid type for key 'data' at path 'secret/data/app' (object)"));
    assert!(matches!(
        store.read("secret/data/app").await.unwrap().get("data"),
        Some(SecretValue::Other(_))
    ));
}

#[tokio::test]
async fn test_vault_store_escapes_reserved_path_characters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/app%23prod"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"password": "prod-pw"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/app"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"password": "wrong"}})),
        )
        .expect(0)
        .mount(&server)
        .await;

    let client = BasicClient::new(Duration::from_secs(5)).unwrap();
    let store = VaultStore::new(client, &server.uri()).unwrap();

    let result = Resolver::new(&store)
        .resolve(ResolutionMode::Environment {
            environ: vec!["DB_PASSWORD=vault:secret/app#prod".to_string()],
            key_separator: None,
        })
        .await
        .unwrap();

    assert_eq!(result["DB_PASSWORD"], "prod-pw");
}
