use serde_json::{json, Value};

use omi_manager::models::{ActionItem, Chat, ChatStatus, Memory};
use omi_manager::store::Store;
use omi_manager::sync::{RemoteSource, Resource, Syncer};

struct SnapshotSource {
    conversations: Vec<Value>,
    memories: Vec<Value>,
    action_items: Vec<Value>,
}

impl RemoteSource for SnapshotSource {
    fn fetch_page(&self, resource: Resource, limit: usize, offset: usize) -> anyhow::Result<Vec<Value>> {
        let items = match resource {
            Resource::Conversations => &self.conversations,
            Resource::Memories => &self.memories,
            Resource::ActionItems => &self.action_items,
        };
        Ok(items.iter().skip(offset).take(limit).cloned().collect())
    }
}

fn seeded_chat() -> Chat {
    Chat {
        id: "c1".to_string(),
        title: "Old".to_string(),
        summary: "old summary".to_string(),
        preview_text: "old summary".to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
        updated_at: "2024-01-01T00:00:00Z".to_string(),
        tags: vec!["x".to_string()],
        folder_id: Some("f1".to_string()),
        is_favorite: true,
        status: ChatStatus::Active,
        participants: Vec::new(),
        unread_count: 0,
        messages: Vec::new(),
        source: None,
        language: None,
        geolocation: None,
    }
}

#[test]
fn resync_updates_remote_fields_and_keeps_local_organization() {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let store = Store::open(&temp_dir.path().join("omi")).expect("open store");

    store.put(&seeded_chat()).expect("seed chat");

    let syncer = Syncer::new(SnapshotSource {
        conversations: vec![json!({
            "id": "c1",
            "started_at": "2024-02-01T08:00:00Z",
            "structured": { "title": "New Title", "overview": "new summary" },
        })],
        memories: Vec::new(),
        action_items: Vec::new(),
    });
    syncer.sync_all(&store).expect("not coalesced");

    let merged = store.get::<Chat>("c1").expect("get").expect("present");
    assert_eq!(merged.title, "New Title");
    assert_eq!(merged.summary, "new summary");
    assert_eq!(merged.created_at, "2024-02-01T08:00:00Z");
    assert_eq!(merged.folder_id.as_deref(), Some("f1"));
    assert!(merged.is_favorite);
    assert_eq!(merged.tags, vec!["x"]);
}

#[test]
fn archived_status_survives_resync() {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let store = Store::open(&temp_dir.path().join("omi")).expect("open store");

    let mut chat = seeded_chat();
    chat.status = ChatStatus::Archived;
    store.put(&chat).expect("seed chat");

    let syncer = Syncer::new(SnapshotSource {
        conversations: vec![json!({
            "id": "c1",
            "started_at": "2024-02-01T08:00:00Z",
        })],
        memories: Vec::new(),
        action_items: Vec::new(),
    });
    syncer.sync_all(&store).expect("not coalesced");

    let merged = store.get::<Chat>("c1").expect("get").expect("present");
    assert_eq!(merged.status, ChatStatus::Archived);
}

#[test]
fn memory_star_archive_folder_and_local_tags_survive_resync() {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let store = Store::open(&temp_dir.path().join("omi")).expect("open store");

    store
        .put(&Memory {
            id: "m1".to_string(),
            title: "old".to_string(),
            content: "old content".to_string(),
            category: "work".to_string(),
            visibility: "private".to_string(),
            tags: vec!["work".to_string(), "mine".to_string()],
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
            is_starred: true,
            is_archived: true,
            folder_id: Some("f2".to_string()),
        })
        .expect("seed memory");

    let syncer = Syncer::new(SnapshotSource {
        conversations: Vec::new(),
        memories: vec![json!({
            "id": "m1",
            "content": "fresh content",
            "category": "work",
            "tags": ["remote"],
            "created_at": "2024-01-01T00:00:00Z",
        })],
        action_items: Vec::new(),
    });
    syncer.sync_all(&store).expect("not coalesced");

    let merged = store.get::<Memory>("m1").expect("get").expect("present");
    assert_eq!(merged.content, "fresh content");
    assert!(merged.is_starred);
    assert!(merged.is_archived);
    assert_eq!(merged.folder_id.as_deref(), Some("f2"));
    assert_eq!(merged.tags, vec!["work", "remote", "mine"]);
}

#[test]
fn action_items_stay_local_owned_after_import() {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let store = Store::open(&temp_dir.path().join("omi")).expect("open store");

    store
        .put(&ActionItem {
            id: "a1".to_string(),
            description: "edited locally".to_string(),
            details: Some("my notes".to_string()),
            completed: true,
            due_date: None,
            conversation_id: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-05T00:00:00Z".to_string(),
            tags: vec!["home".to_string()],
            folder_id: Some("f3".to_string()),
        })
        .expect("seed action item");

    let syncer = Syncer::new(SnapshotSource {
        conversations: Vec::new(),
        memories: Vec::new(),
        action_items: vec![json!({
            "id": "a1",
            "description": "remote description",
            "completed": false,
            "due_at": "2024-03-01T00:00:00Z",
            "conversation_id": "c9",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-02-01T00:00:00Z",
        })],
    });
    syncer.sync_all(&store).expect("not coalesced");

    let merged = store.get::<ActionItem>("a1").expect("get").expect("present");
    assert_eq!(merged.description, "edited locally");
    assert!(merged.completed);
    assert_eq!(merged.due_date, None);
    assert_eq!(merged.tags, vec!["home"]);
    assert_eq!(merged.folder_id.as_deref(), Some("f3"));
    // Only the previously unset conversation link is taken from the remote.
    assert_eq!(merged.conversation_id.as_deref(), Some("c9"));
}
