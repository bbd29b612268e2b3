use anyhow::anyhow;
use serde_json::{json, Value};

use omi_manager::models::{ActionItem, Chat, Memory};
use omi_manager::store::Store;
use omi_manager::sync::{RemoteSource, Resource, SyncSummary, Syncer};

/// Memories always fail; the other resources serve a small snapshot.
struct MemoriesDown;

impl RemoteSource for MemoriesDown {
    fn fetch_page(&self, resource: Resource, limit: usize, offset: usize) -> anyhow::Result<Vec<Value>> {
        let items = match resource {
            Resource::Memories => return Err(anyhow!("HTTP 500 Internal Server Error")),
            Resource::Conversations => vec![
                json!({ "id": "c1", "started_at": "2024-02-01T08:00:00Z" }),
                json!({ "id": "c2", "started_at": "2024-02-02T08:00:00Z" }),
            ],
            Resource::ActionItems => vec![
                json!({ "id": "a1", "description": "task", "created_at": "2024-02-01T08:00:00Z" }),
            ],
        };
        Ok(items.into_iter().skip(offset).take(limit).collect())
    }
}

#[test]
fn one_failing_resource_does_not_abort_the_others() {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let store = Store::open(&temp_dir.path().join("omi")).expect("open store");

    let syncer = Syncer::new(MemoriesDown);
    let summary = syncer.sync_all(&store).expect("not coalesced");

    assert_eq!(
        summary,
        SyncSummary {
            conversations: 2,
            memories: 0,
            action_items: 1,
        }
    );
    assert_eq!(store.get_all::<Chat>().expect("chats").len(), 2);
    assert!(store.get_all::<Memory>().expect("memories").is_empty());
    assert_eq!(store.get_all::<ActionItem>().expect("items").len(), 1);
}
