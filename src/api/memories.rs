use anyhow::Result;

use crate::models::Memory;
use crate::store::Store;

/// Partial update; `folder_id: Some(None)` clears the folder.
#[derive(Clone, Debug, Default)]
pub struct MemoryUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub folder_id: Option<Option<String>>,
    pub is_starred: Option<bool>,
    pub is_archived: Option<bool>,
}

pub fn list_memories(store: &Store) -> Result<Vec<Memory>> {
    store.get_all()
}

/// Applies a partial update. A missing memory is a quiet no-op.
pub fn update_memory(store: &Store, id: &str, updates: &MemoryUpdate) -> Result<()> {
    let Some(mut memory) = store.get::<Memory>(id)? else {
        return Ok(());
    };

    if let Some(title) = &updates.title {
        memory.title = title.clone();
    }
    if let Some(content) = &updates.content {
        memory.content = content.clone();
    }
    if let Some(tags) = &updates.tags {
        memory.tags = tags.clone();
    }
    if let Some(folder_id) = &updates.folder_id {
        memory.folder_id = folder_id.clone();
    }
    if let Some(is_starred) = updates.is_starred {
        memory.is_starred = is_starred;
    }
    if let Some(is_archived) = updates.is_archived {
        memory.is_archived = is_archived;
    }

    store.put(&memory)
}

pub fn toggle_memory_star(store: &Store, id: &str) -> Result<()> {
    let Some(memory) = store.get::<Memory>(id)? else {
        return Ok(());
    };
    update_memory(
        store,
        id,
        &MemoryUpdate {
            is_starred: Some(!memory.is_starred),
            ..Default::default()
        },
    )
}

pub fn move_memories_to_folder(
    store: &Store,
    ids: &[String],
    folder_id: Option<&str>,
) -> Result<()> {
    for id in ids {
        update_memory(
            store,
            id,
            &MemoryUpdate {
                folder_id: Some(folder_id.map(str::to_string)),
                ..Default::default()
            },
        )?;
    }
    Ok(())
}

pub fn delete_memories(store: &Store, ids: &[String]) -> Result<()> {
    store.bulk_delete::<Memory>(ids)
}
