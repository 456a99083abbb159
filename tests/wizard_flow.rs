use contentgen::cli::ProviderKind;
use contentgen::clipboard::BufferClipboard;
use contentgen::config::Config;
use contentgen::form::{ApiSettings, FormPatch, FormStore, Niche};
use contentgen::session::{Reply, Session, UserCommand};
use contentgen::settings::{CustomApi, ProviderSettings};
use contentgen::storage::{FileStore, PersistenceService};
use contentgen::wizard::{Flow, StepId, WizardController};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn file_storage(root: &std::path::Path) -> Arc<dyn PersistenceService> {
    Arc::new(FileStore::in_root(root).unwrap())
}

fn cmd(line: &str) -> UserCommand {
    UserCommand::parse(line).unwrap()
}

#[test]
fn form_data_survives_reopen() {
    let root = tempfile::tempdir().unwrap();
    {
        let mut store = FormStore::open(file_storage(root.path()), Flow::Blog.storage_key()).unwrap();
        store
            .update(FormPatch {
                focus_keyword: Some("budget travel".into()),
                niche: Some(Niche::Travel),
                ..Default::default()
            })
            .unwrap();
    }
    let store = FormStore::open(file_storage(root.path()), Flow::Blog.storage_key()).unwrap();
    assert_eq!(store.data().focus_keyword, "budget travel");
    assert_eq!(store.data().niche, Niche::Travel);

    let other = FormStore::open(file_storage(root.path()), Flow::Article.storage_key()).unwrap();
    assert_eq!(other.data().focus_keyword, "");
}

#[test]
fn reopened_wizard_starts_at_first_step_with_completion_restored() {
    let root = tempfile::tempdir().unwrap();
    let mut store = FormStore::open(file_storage(root.path()), Flow::Article.storage_key()).unwrap();
    store
        .update(FormPatch {
            focus_keyword: Some("k".into()),
            meta_title: Some("T".into()),
            ..Default::default()
        })
        .unwrap();

    let wizard = WizardController::new(Flow::Article, store.data());
    assert_eq!(wizard.current_index(), 0);
    assert!(wizard.is_completed(0));
    assert!(wizard.is_completed(1));
    assert!(!wizard.is_completed(2));
}

#[tokio::test]
async fn blog_flow_with_custom_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("SEO-optimised blog post titles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "1. Easy Vegan Pasta\n2. \"Creamy Vegan Pasta\"\n"}}]
        })))
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let storage = file_storage(root.path());
    let settings = ProviderSettings::new(storage.clone());
    settings
        .set_custom(&CustomApi {
            endpoint: format!("{}/v1/chat/completions", server.uri()),
            api_key: String::new(),
            model: "local-model".into(),
            verify_ssl: true,
        })
        .unwrap();
    settings
        .set_preferred(&ApiSettings { provider: ProviderKind::Custom, model: String::new() })
        .unwrap();

    let mut cfg = Config::default();
    cfg.root = root.path().display().to_string();
    let mut session = Session::open(Flow::Blog, cfg, storage.clone(), Box::new(BufferClipboard::default())).unwrap();

    session.handle(cmd("set keyword vegan pasta")).await.unwrap();
    assert_eq!(session.handle(cmd("next")).await.unwrap(), Reply::Moved);
    assert_eq!(session.step(), StepId::Title);

    let reply = session.handle(cmd("gen")).await.unwrap();
    assert_eq!(
        reply,
        Reply::Candidates(vec!["Easy Vegan Pasta".into(), "Creamy Vegan Pasta".into()])
    );
    session.handle(cmd("pick 2")).await.unwrap();
    assert_eq!(session.data().meta_title, "Creamy Vegan Pasta");
    assert!(session.wizard().is_completed(1));

    session.handle(cmd("copy")).await.unwrap();
    assert_eq!(session.handle(cmd("goto 1")).await.unwrap(), Reply::Moved);
    assert_eq!(session.step(), StepId::Keyword);

    drop(session);
    let reopened = FormStore::open(storage, Flow::Blog.storage_key()).unwrap();
    assert_eq!(reopened.data().meta_title, "Creamy Vegan Pasta");
    assert_eq!(reopened.data().generated_titles.len(), 2);
}

#[tokio::test]
async fn prompt_flow_finishes_without_a_provider() {
    let root = tempfile::tempdir().unwrap();
    let mut session = Session::open(
        Flow::Prompt,
        Config::default(),
        file_storage(root.path()),
        Box::new(BufferClipboard::default()),
    )
    .unwrap();

    session.handle(cmd("set keyword home workouts")).await.unwrap();
    session.handle(cmd("set niche fitness")).await.unwrap();
    session.handle(cmd("next")).await.unwrap();
    session.handle(cmd("next")).await.unwrap();
    assert_eq!(session.step(), StepId::Prompt);

    let Reply::Text(prompt) = session.handle(cmd("gen")).await.unwrap() else {
        panic!("expected prompt text");
    };
    assert!(prompt.contains("home workouts"));
    assert_eq!(session.current_output(), prompt);
    assert_eq!(session.handle(cmd("next")).await.unwrap(), Reply::Finished);
}
