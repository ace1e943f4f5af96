//! Repositories over the persistent sled backend

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use vocab_admin_store::{
    Backend, Config, Repositories, SledStore, UserPatch, UserSettings, Word, World,
};

fn config_in(dir: &TempDir) -> Config {
    Config {
        backend: Backend::Sled,
        data_dir: dir.path().join("data"),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_word_pages_over_sled() {
    let dir = TempDir::new().unwrap();
    let repos = Repositories::new(config_in(&dir).open_store().unwrap());

    for n in (0..30).rev() {
        let title = format!("word-{:02}", n);
        repos.words.create(&Word::new(title, "")).await.unwrap();
    }

    let first = repos.words.list_page(25, None).await.unwrap();
    assert_eq!(first.items.len(), 25);
    assert_eq!(first.items[0].title_en, "word-00");

    let second = repos
        .words
        .list_page(25, first.last_id.as_deref())
        .await
        .unwrap();
    assert_eq!(second.items.len(), 5);
    assert_eq!(second.items[4].title_en, "word-29");
    assert_eq!(second.last_id, None);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let world_id = {
        let repos = Repositories::new(config.open_store().unwrap());
        let id = repos
            .worlds
            .create(&World::new("sea", "ים", 3))
            .await
            .unwrap();
        let patch = UserPatch {
            settings: Some(UserSettings {
                language: "he".into(),
                music_on_bg: false,
                notifications: true,
            }),
            ..Default::default()
        };
        repos.users.upsert("u1", &patch).await.unwrap();
        id
    };

    let repos = Repositories::new(Arc::new(SledStore::open(config.store_path()).unwrap()));
    let world = repos.worlds.get(&world_id).await.unwrap().unwrap();
    assert_eq!(world.title_he, "ים");
    assert_eq!(world.order_id, 3);

    let user = repos.users.get("u1").await.unwrap().unwrap();
    assert_eq!(user.settings.language, "he");
    assert!(user.settings.notifications);
}

#[tokio::test]
async fn test_generic_documents_over_sled() {
    let dir = TempDir::new().unwrap();
    let repos = Repositories::new(config_in(&dir).open_store().unwrap());
    let games = ["worlds", "w1", "games"];

    repos
        .docs
        .create_with_id(&games, "custom-1", json!({ "a": 1, "b": 2 }).as_object().unwrap().clone())
        .await
        .unwrap();
    repos
        .docs
        .create_with_id(&games, "custom-1", json!({ "a": 2 }).as_object().unwrap().clone())
        .await
        .unwrap();

    let record = repos.docs.get(&games, "custom-1").await.unwrap().unwrap();
    assert_eq!(record.get("a"), Some(&json!(2)));
    assert_eq!(record.get("b"), None);

    repos.docs.remove(&games, "custom-1").await.unwrap();
    repos.docs.remove(&games, "custom-1").await.unwrap();
    assert!(repos.docs.list(&games).await.unwrap().is_empty());
}
