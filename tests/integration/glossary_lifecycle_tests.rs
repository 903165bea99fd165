/*!
 * Integration tests for glossary purge and provisioning over HTTP
 */

use deepl_bridge::database::GlossaryRecord;
use deepl_bridge::errors::LifecycleError;
use deepl_bridge::language_utils::LanguagePair;
use deepl_bridge::translation::GlossaryRegistry;

use crate::common::{stub_controller, StubServer};

const LISTING: &str = r#"{"glossaries":[
    {"glossary_id":"g-1","name":"Product","ready":true,"source_lang":"en","target_lang":"de","creation_time":"2024-03-01T10:00:00.000Z","entry_count":12},
    {"glossary_id":"g-2","name":"Legal","ready":true,"source_lang":"en","target_lang":"fr","creation_time":"2024-03-02T10:00:00.000Z","entry_count":3}
]}"#;

async fn seed_registry(registry: &GlossaryRegistry) {
    registry
        .register(&GlossaryRecord::new(&LanguagePair::new("EN", "DE"), "g-1", "Product"))
        .await
        .unwrap();
    registry
        .register(&GlossaryRecord::new(&LanguagePair::new("EN", "FR"), "g-2", "Legal"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_purge_shouldDeleteEachListedGlossaryThenTruncate() {
    let server = StubServer::start().await;
    server.route("GET", "/v2/glossaries", 200, LISTING);
    server.route("DELETE", "/v2/glossaries/g-1", 204, "");
    server.route("DELETE", "/v2/glossaries/g-2", 204, "");
    let (controller, _, repository) = stub_controller(&server, "");
    let registry = GlossaryRegistry::new(repository);
    seed_registry(&registry).await;

    let report = controller.purge_glossaries().await.unwrap();

    assert_eq!(report.found(), 2);
    assert_eq!(report.deleted, vec!["g-1", "g-2"]);
    assert!(report.registry_truncated);
    assert_eq!(registry.len().await.unwrap(), 0);

    let methods: Vec<String> = server
        .requests()
        .iter()
        .map(|r| format!("{} {}", r.method, r.path))
        .collect();
    assert_eq!(
        methods,
        vec![
            "GET /v2/glossaries",
            "DELETE /v2/glossaries/g-1",
            "DELETE /v2/glossaries/g-2"
        ]
    );
}

#[tokio::test]
async fn test_purge_withListingFailure_shouldLeaveRegistryUntouched() {
    let server = StubServer::start().await;
    server.route("GET", "/v2/glossaries", 403, "Wrong key");
    let (controller, _, repository) = stub_controller(&server, "");
    let registry = GlossaryRegistry::new(repository);
    seed_registry(&registry).await;

    let result = controller.purge_glossaries().await;

    assert!(matches!(result, Err(LifecycleError::Listing(_))));
    assert_eq!(registry.len().await.unwrap(), 2);
    assert!(server.requests().iter().all(|r| r.method == "GET"));
}

#[tokio::test]
async fn test_purge_withFailedDelete_shouldKeepRegistry() {
    let server = StubServer::start().await;
    server.route("GET", "/v2/glossaries", 200, LISTING);
    server.route("DELETE", "/v2/glossaries/g-1", 204, "");
    server.route("DELETE", "/v2/glossaries/g-2", 404, "Glossary not found");
    let (controller, _, repository) = stub_controller(&server, "");
    let registry = GlossaryRegistry::new(repository);
    seed_registry(&registry).await;

    let report = controller.purge_glossaries().await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert!(!report.registry_truncated);
    assert_eq!(registry.len().await.unwrap(), 2);
}

#[tokio::test]
async fn test_createGlossary_shouldPostTsvAndRegister() {
    let server = StubServer::start().await;
    server.route(
        "POST",
        "/v2/glossaries",
        201,
        r#"{"glossary_id":"new-1","name":"Terms","ready":true,"source_lang":"en","target_lang":"de","creation_time":"2024-03-03T10:00:00.000Z","entry_count":2}"#,
    );
    let (controller, _, _) = stub_controller(&server, "");
    let pair = LanguagePair::new("en", "de");

    let record = controller
        .create_glossary(&pair, "Terms", "Hello\tHallo\nWorld\tWelt")
        .await
        .unwrap();

    assert_eq!(record.glossary_id, "new-1");
    assert_eq!(controller.local_glossaries().await.unwrap().len(), 1);

    let request = &server.requests_to("POST", "/v2/glossaries")[0];
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["entries_format"], "tsv");
    assert_eq!(body["source_lang"], "EN");
    assert_eq!(body["entries"], "Hello\tHallo\nWorld\tWelt");
}
