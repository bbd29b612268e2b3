//! Field-precedence merge between an existing local record and a freshly
//! normalized remote record with the same id. One explicit function per
//! record kind; the local-authority fields are named, never spread.

use crate::models::{ActionItem, Chat, Memory};

/// Remote fields refresh; folder, favorite flag, tags and archive status
/// stay local.
pub fn chat(existing: &Chat, fresh: &Chat) -> Chat {
    Chat {
        folder_id: existing.folder_id.clone(),
        is_favorite: existing.is_favorite,
        tags: existing.tags.clone(),
        status: existing.status,
        ..fresh.clone()
    }
}

/// Remote fields refresh; star, folder and archive flags stay local, and
/// the tag list is the remote seeds plus any local additions.
pub fn memory(existing: &Memory, fresh: &Memory) -> Memory {
    let mut tags = fresh.tags.clone();
    for tag in &existing.tags {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    Memory {
        tags,
        is_starred: existing.is_starred,
        is_archived: existing.is_archived,
        folder_id: existing.folder_id.clone(),
        ..fresh.clone()
    }
}

/// Tasks are local-owned once imported: the entire existing record wins,
/// and only an unset conversation link is filled from the remote side.
pub fn action_item(existing: &ActionItem, fresh: &ActionItem) -> ActionItem {
    ActionItem {
        conversation_id: existing
            .conversation_id
            .clone()
            .or_else(|| fresh.conversation_id.clone()),
        ..existing.clone()
    }
}
