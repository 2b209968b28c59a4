//! Integration tests for the translation service.

use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::BoxFuture;
use lingo::{
    Dictionary, LoadError, LoadState, Loader, Navigator, StaticLoader, TranslateConfig,
    TranslateError, TranslateService, Vars, vars,
};

// =============================================================================
// Fixtures
// =============================================================================

type LoadOutcome = Result<Dictionary, LoadError>;

/// Records every language the service asks for.
#[derive(Default)]
struct Requests {
    requested: Mutex<Vec<String>>,
}

impl Requests {
    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

/// A loader whose single load settles when the test says so.
struct ControlledLoader {
    requests: Arc<Requests>,
    receiver: Mutex<Option<oneshot::Receiver<LoadOutcome>>>,
}

impl Loader for ControlledLoader {
    fn load(&self, language: &str) -> BoxFuture<'static, LoadOutcome> {
        self.requests.requested.lock().unwrap().push(language.to_string());
        let receiver = self.receiver.lock().unwrap().take();
        async move {
            let Some(receiver) = receiver else {
                return Err(LoadError::Other {
                    message: "loaded more than once".to_string(),
                });
            };
            receiver.await.unwrap_or_else(|_| {
                Err(LoadError::Other {
                    message: "load abandoned".to_string(),
                })
            })
        }
        .boxed()
    }
}

fn config(langs: &[&str]) -> TranslateConfig {
    TranslateConfig::builder()
        .default_lang(langs[0])
        .provided_langs(langs.iter().map(|l| (*l).to_string()).collect())
        .build()
}

fn controlled(
    config: TranslateConfig,
) -> (TranslateService, Arc<Requests>, oneshot::Sender<LoadOutcome>) {
    let (sender, receiver) = oneshot::channel();
    let requests = Arc::new(Requests::default());
    let loader = ControlledLoader {
        requests: Arc::clone(&requests),
        receiver: Mutex::new(Some(receiver)),
    };
    (TranslateService::new(config, loader), requests, sender)
}

fn english() -> Dictionary {
    [
        ("TEXT", "This is a text"),
        ("INTERPOLATION", "The sum from 1+2 is {{1+2}}"),
        (
            "VARIABLES_TEST",
            r#"This {{count > 5 ? "is interesting" : "is boring"}}"#,
        ),
        (
            "VARIABLES_OUT",
            r#"Hello {{name.first}} {{name.title ? name.title + " " : ""}}{{name.last}}"#,
        ),
        ("BROKEN", r#"This "{{notExisting.func()}}" is empty string"#),
        (
            "SALUTATION",
            r#"{{name.title ? name.title + " " : (name.gender === "w" ? "Ms." : "Mr.")}}{{name.first}} {{name.last}}"#,
        ),
        (
            "WELCOME",
            r#"Welcome{{lastLogin ? " back" : ""}} [[SALUTATION:name]]!{{lastLogin ? " Your last login was on " + lastLogin : ""}}"#,
        ),
        ("HACK", "{{privateVar}}{{givenVar}}"),
        ("CALL", "You don't know {{privateVar}} but [[HACK:givenVar]]"),
    ]
    .into_iter()
    .collect()
}

async fn loaded_service() -> TranslateService {
    let service = TranslateService::new(
        TranslateConfig::default(),
        StaticLoader::new().with("en", english()),
    );
    service.wait_for_translation(None).await.unwrap();
    service
}

// =============================================================================
// Construction and language selection
// =============================================================================

#[test]
fn current_lang_starts_as_default_lang() {
    let service = TranslateService::new(TranslateConfig::default(), StaticLoader::new());
    assert_eq!(service.current_lang(), "en");
}

#[test]
fn use_lang_returns_configured_spelling() {
    let service = TranslateService::new(config(&["de/de"]), StaticLoader::new());
    assert_eq!(service.use_lang("de-DE").as_deref(), Some("de/de"));
    assert_eq!(service.current_lang(), "de/de");
}

#[test]
fn use_lang_rejects_unprovided_language() {
    let service = TranslateService::new(config(&["de/de"]), StaticLoader::new());
    assert_eq!(service.use_lang("de"), None);
    assert_eq!(service.current_lang(), "de/de");
}

#[tokio::test]
async fn subscribers_see_language_changes() {
    let service = TranslateService::new(config(&["en", "de"]), StaticLoader::new());
    let mut receiver = service.subscribe();

    service.use_lang("de");
    receiver.changed().await.unwrap();
    assert_eq!(*receiver.borrow(), "de");
}

// =============================================================================
// Detection
// =============================================================================

#[test]
fn detects_preferred_language() {
    let service = TranslateService::new(config(&["bm", "en"]), StaticLoader::new());
    assert_eq!(service.detect_lang(&Navigator::new("bm")).as_deref(), Some("bm"));
}

#[test]
fn detects_only_provided_languages() {
    let service = TranslateService::new(config(&["en"]), StaticLoader::new());
    assert_eq!(service.detect_lang(&Navigator::new("bm")), None);
}

#[test]
fn detection_falls_back_to_language_list() {
    let service = TranslateService::new(config(&["de-DE", "de-AT"]), StaticLoader::new());
    let navigator = Navigator::new("de-CH").with_languages(["de-CH", "de-AT"]);
    assert_eq!(service.detect_lang(&navigator).as_deref(), Some("de-AT"));
}

#[test]
fn detection_folds_bare_language() {
    let service = TranslateService::new(config(&["en", "de-DE"]), StaticLoader::new());
    assert_eq!(service.detect_lang(&Navigator::new("de")).as_deref(), Some("de-DE"));
}

// =============================================================================
// Waiting for translations
// =============================================================================

#[tokio::test]
async fn loads_current_language() {
    let (service, requests, sender) = controlled(TranslateConfig::default());
    let pending = service.wait_for_translation(None);
    assert_eq!(requests.requested(), ["en"]);
    assert_eq!(service.cache().state("en"), Some(LoadState::Pending));

    sender.send(Ok(english())).unwrap();
    let dictionary = pending.await.unwrap();
    assert!(dictionary.contains_key("TEXT"));
    assert_eq!(service.cache().state("en"), Some(LoadState::Resolved));
}

#[tokio::test]
async fn concurrent_waiters_share_one_load() {
    let (service, requests, sender) = controlled(TranslateConfig::default());
    let first = service.wait_for_translation(None);
    let second = service.wait_for_translation(None);

    sender.send(Ok(english())).unwrap();
    let (first, second) = futures::join!(first, second);
    assert!(Arc::ptr_eq(&first.unwrap(), &second.unwrap()));
    assert_eq!(requests.requested().len(), 1);
}

#[tokio::test]
async fn later_waiters_get_resolved_dictionary() {
    let (service, requests, sender) = controlled(TranslateConfig::default());
    sender.send(Ok(english())).unwrap();
    let first = service.wait_for_translation(None).await.unwrap();

    let second = service.wait_for_translation(Some("en")).now_or_never();
    let second = second.expect("already resolved").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(requests.requested().len(), 1);
}

#[tokio::test]
async fn rejection_reaches_every_waiter() {
    let (service, requests, sender) = controlled(TranslateConfig::default());
    let first = service.wait_for_translation(None);
    let second = service.wait_for_translation(None);

    sender
        .send(Err(LoadError::NotFound {
            language: "en".to_string(),
        }))
        .unwrap();
    let (first, second) = futures::join!(first, second);
    assert!(matches!(first, Err(TranslateError::Load(LoadError::NotFound { .. }))));
    assert!(matches!(second, Err(TranslateError::Load(LoadError::NotFound { .. }))));
    assert_eq!(service.cache().state("en"), Some(LoadState::Rejected));
    assert_eq!(requests.requested().len(), 1);
}

#[tokio::test]
async fn loads_given_language() {
    let (service, requests, _sender) = controlled(config(&["en", "de"]));
    drop(service.wait_for_translation(Some("de")));
    assert_eq!(requests.requested(), ["de"]);
}

#[tokio::test]
async fn dropped_waiter_does_not_stall_the_load() {
    let (service, _requests, sender) = controlled(TranslateConfig::default());
    drop(service.wait_for_translation(None));

    sender.send(Ok(english())).unwrap();
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert_eq!(service.cache().state("en"), Some(LoadState::Resolved));
    let no_vars = Vars::new();
    assert_eq!(service.instant("TEXT", &no_vars, None), "This is a text");
}

#[tokio::test]
async fn unprovided_language_is_rejected_without_loading() {
    let (service, requests, _sender) = controlled(TranslateConfig::default());
    let error = service.wait_for_translation(Some("de")).await.unwrap_err();
    assert_eq!(error.to_string(), "Language not provided");
    assert!(requests.requested().is_empty());
    assert!(service.cache().languages().is_empty());
}

// =============================================================================
// translate
// =============================================================================

#[tokio::test]
async fn translate_resolves_rendered_text() {
    let (service, _requests, sender) = controlled(TranslateConfig::default());
    let no_vars = Vars::new();
    let pending = service.translate("TEXT", &no_vars, None);
    sender.send(Ok(english())).unwrap();
    assert_eq!(pending.await, "This is a text");
}

#[tokio::test]
async fn translate_resolves_keys_for_unprovided_language() {
    let (service, requests, _sender) = controlled(TranslateConfig::default());
    assert_eq!(service.translate("TEXT", &vars! {}, Some("de")).await, "TEXT");
    assert!(requests.requested().is_empty());
}

#[tokio::test]
async fn translate_resolves_keys_when_load_fails() {
    let (service, _requests, sender) = controlled(TranslateConfig::default());
    sender
        .send(Err(LoadError::Other {
            message: "offline".to_string(),
        }))
        .unwrap();
    let translation = service
        .translate(["TEXT", "OTHER_TEXT"], &vars! {}, None)
        .await;
    assert_eq!(translation, ["TEXT", "OTHER_TEXT"]);
}

#[tokio::test]
async fn translate_loads_once_across_calls() {
    let (service, requests, sender) = controlled(TranslateConfig::default());
    sender.send(Ok(english())).unwrap();
    let no_vars = Vars::new();
    let (a, b) = futures::join!(
        service.translate("TEXT", &no_vars, None),
        service.translate("INTERPOLATION", &no_vars, None),
    );
    assert_eq!(a, "This is a text");
    assert_eq!(b, "The sum from 1+2 is 3");
    assert_eq!(requests.requested().len(), 1);
}

// =============================================================================
// instant
// =============================================================================

#[tokio::test]
async fn instant_returns_keys_while_loading() {
    let (service, _requests, _sender) = controlled(TranslateConfig::default());
    let _pending = service.wait_for_translation(None);
    assert_eq!(service.instant("TEXT", &vars! {}, None), "TEXT");
}

#[tokio::test]
async fn instant_returns_keys_for_language_not_loaded() {
    let service = loaded_service().await;
    assert_eq!(service.instant("TEXT", &vars! {}, Some("de")), "TEXT");
}

#[tokio::test]
async fn instant_returns_keys_for_missing_translations() {
    let service = loaded_service().await;
    assert_eq!(
        service.instant(["SOME_TEXT", "OTHER_TEXT"], &vars! {}, None),
        ["SOME_TEXT", "OTHER_TEXT"]
    );
}

#[tokio::test]
async fn instant_interpolates() {
    let service = loaded_service().await;
    let translation = service.instant(
        ["INTERPOLATION", "VARIABLES_TEST", "VARIABLES_OUT"],
        &vars! {
            "count" => 6,
            "name" => vars! { "first" => "John", "last" => "Doe" },
        },
        None,
    );
    assert_eq!(
        translation,
        [
            "The sum from 1+2 is 3",
            "This is interesting",
            "Hello John Doe",
        ]
    );
}

#[tokio::test]
async fn instant_renders_failed_expressions_empty() {
    let service = loaded_service().await;
    assert_eq!(
        service.instant("BROKEN", &vars! {}, None),
        r#"This "" is empty string"#
    );
}

#[tokio::test]
async fn instant_translates_nested_markers() {
    let service = loaded_service().await;
    let translation = service.instant(
        "WELCOME",
        &vars! {
            "lastLogin" => "24th of February, 2016",
            "name" => vars! {
                "gender" => "w",
                "first" => "Jane",
                "title" => "Dr.",
                "last" => "Doe",
            },
        },
        None,
    );
    assert_eq!(
        translation,
        "Welcome back Dr. Jane Doe! Your last login was on 24th of February, 2016"
    );
}

#[tokio::test]
async fn nested_markers_fall_back_on_gender() {
    let service = loaded_service().await;
    let translation = service.instant(
        "SALUTATION",
        &vars! { "name" => vars! { "gender" => "m", "first" => "John", "last" => "Doe" } },
        None,
    );
    assert_eq!(translation, "Mr.John Doe");
}

#[tokio::test]
async fn nested_markers_only_see_named_variables() {
    let service = loaded_service().await;
    let translation = service.instant(
        "CALL",
        &vars! { "privateVar" => "private", "givenVar" => "given" },
        None,
    );
    assert_eq!(translation, "You don't know private but given");
}
