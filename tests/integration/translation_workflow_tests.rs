/*!
 * End-to-end translation tests through the controller and the HTTP client
 */

use deepl_bridge::database::GlossaryRecord;
use deepl_bridge::language_utils::{Direction, LanguagePair};
use deepl_bridge::translation::GlossaryRegistry;
use deepl_bridge::{SkipReason, TranslationOutcome};

use crate::common::{
    form_fields, route_default_languages, stub_controller, translation_body, StubServer,
    TEST_API_KEY,
};

#[tokio::test]
async fn test_translate_englishToGerman_shouldReturnProviderText() {
    let server = StubServer::start().await;
    route_default_languages(&server);
    server.route(
        "POST",
        "/v2/translate",
        200,
        &translation_body("Hallo, ich möchte übersetzt werden", "EN"),
    );
    let (controller, notifier, _) = stub_controller(&server, "");

    let outcome = controller
        .translate("Hello I would like to be translated", "DE", "EN")
        .await;

    assert_eq!(
        outcome,
        TranslationOutcome::Translated {
            text: "Hallo, ich möchte übersetzt werden".to_string(),
            detected_source_language: Some("EN".to_string()),
        }
    );

    let request = &server.requests_to("POST", "/v2/translate")[0];
    let fields = form_fields(&request.body);
    let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["auth_key", "text", "source_lang", "target_lang", "tag_handling"]);
    assert_eq!(fields[0].1, TEST_API_KEY);
    assert_eq!(fields[1].1, "Hello I would like to be translated");
    assert_eq!(fields[4].1, "xml");
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn test_translate_toUnsupportedTarget_shouldReturnOriginalWithoutRequest() {
    let server = StubServer::start().await;
    route_default_languages(&server);
    let (controller, _, _) = stub_controller(&server, "");

    let outcome = controller.translate("Dobar dan", "BS", "EN").await;

    assert_eq!(outcome.text(), "Dobar dan");
    assert!(matches!(
        outcome,
        TranslationOutcome::Skipped {
            reason: SkipReason::UnsupportedTargetLanguage(_),
            ..
        }
    ));
    assert!(server.requests_to("POST", "/v2/translate").is_empty());
    assert!(!controller
        .languages(Direction::Target)
        .await
        .iter()
        .any(|e| e.language == "BS"));
}

#[tokio::test]
async fn test_translate_withGlossaryAndFormality_shouldSendBothFields() {
    let server = StubServer::start().await;
    route_default_languages(&server);
    server.route("POST", "/v2/translate", 200, &translation_body("Guten Tag", "EN"));
    let (controller, _, repository) = stub_controller(&server, "prefer_more");
    GlossaryRegistry::new(repository)
        .register(&GlossaryRecord::new(&LanguagePair::new("EN", "DE"), "g-7", "Terms"))
        .await
        .unwrap();

    controller.translate("Good day", "DE", "EN").await;

    let request = &server.requests_to("POST", "/v2/translate")[0];
    let fields = form_fields(&request.body);
    assert!(fields.contains(&("glossary_id".to_string(), "g-7".to_string())));
    assert!(fields.contains(&("formality".to_string(), "prefer_more".to_string())));
}

#[tokio::test]
async fn test_translate_withFormalityForUnsupportedTarget_shouldOmitField() {
    let server = StubServer::start().await;
    route_default_languages(&server);
    server.route("POST", "/v2/translate", 200, &translation_body("こんにちは", "EN"));
    let (controller, _, _) = stub_controller(&server, "more");

    controller.translate("Hello", "JA", "EN").await;

    let request = &server.requests_to("POST", "/v2/translate")[0];
    assert!(!form_fields(&request.body).iter().any(|(k, _)| k == "formality"));
}

#[tokio::test]
async fn test_languages_shouldBeFetchedOncePerDirection() {
    let server = StubServer::start().await;
    route_default_languages(&server);
    server.route("POST", "/v2/translate", 200, &translation_body("Hallo", "EN"));
    let (controller, _, _) = stub_controller(&server, "more");

    for _ in 0..3 {
        controller.translate("Hello", "DE", "EN").await;
    }

    assert_eq!(server.requests_to("GET", "/v2/languages?type=target").len(), 1);
    assert_eq!(server.requests_to("GET", "/v2/languages?type=source").len(), 1);
}

#[tokio::test]
async fn test_languages_withFailingEndpoint_shouldSkipAndRetryNextTime() {
    let server = StubServer::start().await;
    server.route("GET", "/v2/languages?type=target", 500, "down");
    let (controller, _, _) = stub_controller(&server, "");

    let outcome = controller.translate("Hello", "DE", "EN").await;
    assert!(!outcome.is_translated());

    controller.translate("Hello", "DE", "EN").await;
    assert_eq!(server.requests_to("GET", "/v2/languages?type=target").len(), 2);
}

#[tokio::test]
async fn test_translateMany_shouldTranslateEveryFragment() {
    let server = StubServer::start().await;
    route_default_languages(&server);
    server.route("POST", "/v2/translate", 200, &translation_body("Hallo", "EN"));
    let (controller, _, _) = stub_controller(&server, "");
    let fragments = vec!["Hello".to_string(), "Hi".to_string(), "Hey".to_string()];

    let outcomes = controller.translate_many(&fragments, "DE", "EN").await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.is_translated()));
    assert_eq!(server.requests_to("POST", "/v2/translate").len(), 3);
}
