use anyhow::Result;

use crate::models::ActionItem;
use crate::store::Store;
use crate::time::now_iso;

/// Partial update; `Some(None)` on an optional field clears it.
#[derive(Clone, Debug, Default)]
pub struct ActionItemUpdate {
    pub description: Option<String>,
    pub details: Option<Option<String>>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub folder_id: Option<Option<String>>,
}

pub fn list_action_items(store: &Store) -> Result<Vec<ActionItem>> {
    store.get_all()
}

/// Applies a partial update and refreshes `updatedAt`. A missing item is a
/// quiet no-op.
pub fn update_action_item(store: &Store, id: &str, updates: &ActionItemUpdate) -> Result<()> {
    let Some(mut item) = store.get::<ActionItem>(id)? else {
        return Ok(());
    };

    if let Some(description) = &updates.description {
        item.description = description.clone();
    }
    if let Some(details) = &updates.details {
        item.details = details.clone();
    }
    if let Some(completed) = updates.completed {
        item.completed = completed;
    }
    if let Some(due_date) = &updates.due_date {
        item.due_date = due_date.clone();
    }
    if let Some(tags) = &updates.tags {
        item.tags = tags.clone();
    }
    if let Some(folder_id) = &updates.folder_id {
        item.folder_id = folder_id.clone();
    }
    item.updated_at = now_iso();

    store.put(&item)
}

pub fn toggle_action_item_completed(store: &Store, id: &str) -> Result<()> {
    let Some(item) = store.get::<ActionItem>(id)? else {
        return Ok(());
    };
    update_action_item(
        store,
        id,
        &ActionItemUpdate {
            completed: Some(!item.completed),
            ..Default::default()
        },
    )
}

pub fn delete_action_items(store: &Store, ids: &[String]) -> Result<()> {
    store.bulk_delete::<ActionItem>(ids)
}
