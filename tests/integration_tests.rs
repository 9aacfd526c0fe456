//! Integration tests for the localized page
//!
//! These tests drive a `Site` end to end against a mocked content server:
//! language resolution, bundle loading with fallback, full-page binding and
//! switching.

use tempfile::TempDir;
use url::Url;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use landing_i18n::binding::BindingTable;
use landing_i18n::loader::ContentLoader;
use landing_i18n::page::{MemoryPage, Page, ACTIVE_CLASS, LANGUAGE_ATTRIBUTE};
use landing_i18n::preference::{FilePreferenceStore, PreferenceStore};
use landing_i18n::switcher::DEFAULT_SWITCHER_ID;
use landing_i18n::{Language, Site};

// ==================== Test Helpers ====================

fn spanish_bundle() -> serde_json::Value {
    serde_json::json!({
        "lang": "es",
        "meta": {
            "title": "Acme | Automatización",
            "description": "Automatizamos tu operación",
            "keywords": "automatización, ia"
        },
        "nav": { "features": "Funciones", "faq": "Preguntas" },
        "hero": {
            "tag": "Nuevo",
            "title": "Trabaja menos",
            "subtitle": "Logra más",
            "trustedBy": "Confían en nosotros",
            "buttons": [{ "text": "Empezar" }, { "text": "Ver demo" }]
        },
        "sections": {
            "solution": {
                "title": "La solución",
                "statement": "Somos <strong>rápidos</strong>"
            },
            "testimonials": {
                "items": [{ "quote": "Excelente", "author": "Ana" }]
            },
            "cases": {
                "items": [{ "client": "Globex", "results": ["+20%", "-30%", "2x"] }]
            }
        },
        "footer": { "copyright": "© Acme" }
    })
}

fn english_bundle() -> serde_json::Value {
    serde_json::json!({
        "lang": "en",
        "meta": {
            "title": "Acme | Automation",
            "description": "We automate your operation",
            "keywords": "automation, ai"
        },
        "nav": { "features": "Features", "faq": "FAQ" },
        "hero": {
            "tag": "New",
            "title": "Work less",
            "subtitle": "Achieve more",
            "trustedBy": "Trusted by",
            "buttons": [{ "text": "Get started" }, { "text": "<b>Demo</b>" }]
        },
        "sections": {
            "solution": {
                "title": "The solution",
                "statement": "We are <strong>fast</strong>"
            },
            "testimonials": {
                "items": [{ "quote": "Excellent", "author": "Ana" }]
            },
            "cases": {
                "items": [{ "client": "Globex", "results": ["+20%", "-30%", "2x"] }]
            }
        },
        "footer": { "copyright": "© Acme" }
    })
}

async fn mount(server: &MockServer, lang: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/content/{}.json", lang)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// A page authored like the real landing page: template text in every
/// location and five placeholder results.
fn landing_page() -> MemoryPage {
    let mut page = MemoryPage::new();
    page.add_meta("description");
    page.add_meta("keywords");
    page.add_field("a", "nav.features", "Features");
    page.add_field("a", "nav.faq", "FAQ");
    page.add_field("h1", "hero.title", "Template hero");
    page.add_field("a", "hero.buttons.0.text", "Button 1");
    page.add_field("a", "hero.buttons.1.text", "Button 2");
    page.add_field("div", "sections.solution.statement", "");
    page.add_field("blockquote", "sections.testimonials.items.0.quote", "");
    page.add_list("sections.cases.items.0.results", 5);
    page.add_field("h2", "sections.metrics.title", "Template metrics");
    page.add_switcher(DEFAULT_SWITCHER_ID, &[Language::SPANISH, Language::ENGLISH]);
    page
}

fn new_site(server: &MockServer, prefs: &std::path::Path) -> Site<MemoryPage, FilePreferenceStore> {
    let base = Url::parse(&format!("{}/content/", server.uri())).expect("valid base url");
    Site::new(
        ContentLoader::new(base),
        FilePreferenceStore::new(prefs),
        landing_page(),
    )
}

fn text_at(site: &Site<MemoryPage, FilePreferenceStore>, address: &str) -> String {
    let node = site.page().find(address).expect("location should exist");
    site.page().text(node)
}

fn control(site: &Site<MemoryPage, FilePreferenceStore>, code: &str) -> landing_i18n::page::NodeId {
    let page = site.page();
    let container = page.element_by_id(DEFAULT_SWITCHER_ID).expect("switcher");
    page.descendants_with_attribute(container, LANGUAGE_ATTRIBUTE)
        .into_iter()
        .find(|node| page.attribute(*node, LANGUAGE_ATTRIBUTE) == Some(code))
        .expect("control should exist")
}

// ==================== End-to-End Tests ====================

#[tokio::test]
async fn test_path_beats_query_end_to_end() {
    let server = MockServer::start().await;
    mount(&server, "en", english_bundle()).await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut site = new_site(&server, &temp_dir.path().join("prefs.json"));
    let url = Url::parse("https://acme.example/en/?lang=es").unwrap();
    let loaded = site.start(&url, Some("es-PE")).await.expect("start");

    assert_eq!(loaded, Language::ENGLISH);
    assert_eq!(site.page().document_lang(), "en");
    assert_eq!(text_at(&site, "hero.title"), "Work less");
}

#[tokio::test]
async fn test_full_page_bind() {
    let server = MockServer::start().await;
    mount(&server, "es", spanish_bundle()).await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut site = new_site(&server, &temp_dir.path().join("prefs.json"));
    site.start(&Url::parse("https://acme.example/").unwrap(), None)
        .await
        .expect("start");

    let page = site.page();
    assert_eq!(page.title(), "Acme | Automatización");
    assert_eq!(page.meta("description"), Some("Automatizamos tu operación"));
    assert_eq!(page.meta("keywords"), Some("automatización, ia"));
    assert_eq!(text_at(&site, "nav.faq"), "Preguntas");
    assert_eq!(text_at(&site, "hero.buttons.1.text"), "Ver demo");
    assert_eq!(text_at(&site, "sections.testimonials.items.0.quote"), "\"Excelente\"");

    let statement = page.find("sections.solution.statement").unwrap();
    assert_eq!(page.inner_html(statement), "Somos <strong>rápidos</strong>");

    let results = page.find("sections.cases.items.0.results").unwrap();
    assert_eq!(page.children(results).len(), 3);

    // Absent section keeps its template
    assert_eq!(text_at(&site, "sections.metrics.title"), "Template metrics");
}

#[tokio::test]
async fn test_text_fields_are_escaped_in_output() {
    let server = MockServer::start().await;
    mount(&server, "en", english_bundle()).await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut site = new_site(&server, &temp_dir.path().join("prefs.json"));
    site.start(&Url::parse("https://acme.example/?lang=en").unwrap(), None)
        .await
        .expect("start");

    let html = site.page().to_html();
    assert!(html.contains("&lt;b&gt;Demo&lt;/b&gt;"));
    assert!(html.contains("We are <strong>fast</strong>"));
}

#[tokio::test]
async fn test_switch_updates_lang_and_active_control() {
    let server = MockServer::start().await;
    mount(&server, "es", spanish_bundle()).await;
    mount(&server, "en", english_bundle()).await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut site = new_site(&server, &temp_dir.path().join("prefs.json"));
    site.start(&Url::parse("https://acme.example/").unwrap(), None)
        .await
        .expect("start");
    assert_eq!(site.page().document_lang(), "es");

    let en = control(&site, "en");
    assert!(site.handle_click(en).await.expect("switch"));

    let page = site.page();
    assert_eq!(page.document_lang(), "en");
    assert_eq!(page.title(), "Acme | Automation");
    assert!(page.has_class(control(&site, "en"), ACTIVE_CLASS));
    assert!(!page.has_class(control(&site, "es"), ACTIVE_CLASS));
    assert_eq!(site.store().load().as_deref(), Some("en"));
}

#[tokio::test]
async fn test_switch_to_same_language_performs_no_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/content/en.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(english_bundle()))
        .expect(1)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut site = new_site(&server, &temp_dir.path().join("prefs.json"));
    site.start(&Url::parse("https://acme.example/en/").unwrap(), None)
        .await
        .expect("start");

    assert!(!site.switch_language(Language::ENGLISH).await.expect("no-op"));
}

#[tokio::test]
async fn test_preference_survives_sessions() {
    let server = MockServer::start().await;
    mount(&server, "es", spanish_bundle()).await;
    mount(&server, "en", english_bundle()).await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let prefs = temp_dir.path().join("prefs.json");

    {
        let mut first = new_site(&server, &prefs);
        first
            .start(&Url::parse("https://acme.example/?lang=en").unwrap(), None)
            .await
            .expect("start");
    }

    let mut second = new_site(&server, &prefs);
    let loaded = second
        .start(&Url::parse("https://acme.example/").unwrap(), Some("es-ES"))
        .await
        .expect("start");

    assert_eq!(loaded, Language::ENGLISH);
}

#[tokio::test]
async fn test_missing_english_bundle_falls_back_to_spanish() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/content/en.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/content/es.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(spanish_bundle()))
        .expect(1)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut site = new_site(&server, &temp_dir.path().join("prefs.json"));
    let loaded = site
        .start(&Url::parse("https://acme.example/en/").unwrap(), None)
        .await
        .expect("fallback should succeed");

    assert_eq!(loaded, Language::SPANISH);
    assert_eq!(site.page().document_lang(), "es");
    assert!(site.page().has_class(control(&site, "es"), ACTIVE_CLASS));
    assert_eq!(site.store().load().as_deref(), Some("es"));
}

#[tokio::test]
async fn test_scaffolded_page_binds_every_field() {
    let server = MockServer::start().await;
    mount(&server, "es", spanish_bundle()).await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut site = new_site(&server, &temp_dir.path().join("prefs.json"));
    site.load(Language::SPANISH).await.expect("load");

    let tree = site.content().expect("content").tree().clone();
    *site.page_mut() = MemoryPage::scaffold(BindingTable::standard(), &tree, DEFAULT_SWITCHER_ID);

    let report = site.render_all();
    assert_eq!(report.skipped, 0);
    assert!(report.bound > 15);
    assert_eq!(site.refresh_switcher(), 1);
}
