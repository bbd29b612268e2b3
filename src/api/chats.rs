use anyhow::Result;

use crate::models::{Chat, ChatStatus};
use crate::store::Store;
use crate::time::now_iso;

/// Partial update; `folder_id: Some(None)` clears the folder.
#[derive(Clone, Debug, Default)]
pub struct ChatUpdate {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub tags: Option<Vec<String>>,
    pub folder_id: Option<Option<String>>,
    pub is_favorite: Option<bool>,
    pub status: Option<ChatStatus>,
}

pub fn list_chats(store: &Store) -> Result<Vec<Chat>> {
    store.get_all()
}

/// Applies a partial update and refreshes `updatedAt`. A missing chat is a
/// quiet no-op.
pub fn update_chat(store: &Store, id: &str, updates: &ChatUpdate) -> Result<()> {
    let Some(mut chat) = store.get::<Chat>(id)? else {
        return Ok(());
    };

    if let Some(title) = &updates.title {
        chat.title = title.clone();
    }
    if let Some(summary) = &updates.summary {
        chat.summary = summary.clone();
    }
    if let Some(tags) = &updates.tags {
        chat.tags = tags.clone();
    }
    if let Some(folder_id) = &updates.folder_id {
        chat.folder_id = folder_id.clone();
    }
    if let Some(is_favorite) = updates.is_favorite {
        chat.is_favorite = is_favorite;
    }
    if let Some(status) = updates.status {
        chat.status = status;
    }
    chat.updated_at = now_iso();

    store.put(&chat)
}

pub fn batch_update_chats(store: &Store, ids: &[String], updates: &ChatUpdate) -> Result<()> {
    for id in ids {
        update_chat(store, id, updates)?;
    }
    Ok(())
}

pub fn delete_chats(store: &Store, ids: &[String]) -> Result<()> {
    store.bulk_delete::<Chat>(ids)
}

pub fn move_chats_to_folder(store: &Store, ids: &[String], folder_id: Option<&str>) -> Result<()> {
    batch_update_chats(
        store,
        ids,
        &ChatUpdate {
            folder_id: Some(folder_id.map(str::to_string)),
            ..Default::default()
        },
    )
}

pub fn toggle_chat_favorite(store: &Store, id: &str) -> Result<()> {
    let Some(chat) = store.get::<Chat>(id)? else {
        return Ok(());
    };
    update_chat(
        store,
        id,
        &ChatUpdate {
            is_favorite: Some(!chat.is_favorite),
            ..Default::default()
        },
    )
}
