/*!
 * Common test utilities for the deepl-bridge test suite
 */

use std::sync::Arc;
use std::time::Duration;

use deepl_bridge::app_config::Config;
use deepl_bridge::database::Repository;
use deepl_bridge::notifications::MemoryNotifier;
use deepl_bridge::providers::{CapabilityEntry, DeeplClient};
use deepl_bridge::Controller;

pub mod stub_server;

pub use stub_server::StubServer;

pub const TEST_API_KEY: &str = "test-key:fx";

/// Configuration pointing at `api_url` with short timeouts
pub fn test_config(api_url: &str) -> Config {
    Config {
        api_url: api_url.to_string(),
        api_key: TEST_API_KEY.to_string(),
        timeout_secs: 5,
        retry_count: 0,
        retry_backoff_ms: 1,
        ..Config::default()
    }
}

/// Route library logs through the test harness; repeated calls are no-ops
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// reqwest client against the stub server
pub fn stub_client(server: &StubServer) -> DeeplClient {
    init_test_logger();
    DeeplClient::new(&server.translate_url(), TEST_API_KEY, Duration::from_secs(5))
        .expect("Failed to create client")
}

/// Controller using the real HTTP client against the stub, with in-memory storage
pub fn stub_controller(server: &StubServer, formality: &str) -> (Controller, Arc<MemoryNotifier>, Repository) {
    init_test_logger();
    let mut config = test_config(&server.translate_url());
    config.formality = formality.to_string();

    let notifier = Arc::new(MemoryNotifier::new());
    let repository = Repository::new_in_memory().expect("Failed to create repository");
    let controller = Controller::with_parts(
        config,
        Arc::new(stub_client(server)),
        repository.clone(),
        notifier.clone(),
    );
    (controller, notifier, repository)
}

/// JSON body of `/v2/languages`
pub fn languages_body(entries: &[CapabilityEntry]) -> String {
    serde_json::to_string(entries).expect("Failed to serialize languages")
}

/// Route both language lists with a typical DeepL answer
pub fn route_default_languages(server: &StubServer) {
    server.route(
        "GET",
        "/v2/languages?type=source",
        200,
        &languages_body(&[CapabilityEntry::new("EN", false), CapabilityEntry::new("DE", false)]),
    );
    server.route(
        "GET",
        "/v2/languages?type=target",
        200,
        &languages_body(&[
            CapabilityEntry::new("DE", true),
            CapabilityEntry::new("EN-GB", false),
            CapabilityEntry::new("JA", false),
        ]),
    );
}

/// JSON body of a translate answer
pub fn translation_body(text: &str, detected: &str) -> String {
    serde_json::json!({
        "translations": [{ "detected_source_language": detected, "text": text }]
    })
    .to_string()
}

/// Decode a form body into ordered pairs
pub fn form_fields(body: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
