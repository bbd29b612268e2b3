use anyhow::Result;

use crate::models::{ActionItem, Chat, ChatMessage, ChatStatus, Folder, Memory};
use crate::store::Store;
use crate::time::now_iso;

/// Seeds a handful of locally-generated records so the app is usable
/// without a remote account.
pub fn generate_demo_data(store: &Store) -> Result<()> {
    let now = now_iso();

    let chats: Vec<Chat> = (1..=5)
        .map(|i| Chat {
            id: uuid::Uuid::new_v4().to_string(),
            title: format!("Demo Conversation {i}"),
            summary: "This is a demo conversation generated locally.".to_string(),
            preview_text: "Demo preview...".to_string(),
            created_at: now.clone(),
            updated_at: now.clone(),
            tags: vec!["demo".to_string()],
            folder_id: None,
            is_favorite: false,
            status: ChatStatus::Active,
            participants: vec!["User".to_string(), "Omi".to_string()],
            unread_count: 0,
            messages: vec![
                ChatMessage {
                    id: "1".to_string(),
                    role: "user".to_string(),
                    content: "Hello, this is a demo message.".to_string(),
                    timestamp: now.clone(),
                    speaker_id: None,
                    start: None,
                    end: None,
                },
                ChatMessage {
                    id: "2".to_string(),
                    role: "assistant".to_string(),
                    content: "Hi! This is a demo response from Omi.".to_string(),
                    timestamp: now.clone(),
                    speaker_id: None,
                    start: None,
                    end: None,
                },
            ],
            source: None,
            language: None,
            geolocation: None,
        })
        .collect();
    store.bulk_put(&chats)?;

    let memories: Vec<Memory> = (1..=5)
        .map(|i| Memory {
            id: uuid::Uuid::new_v4().to_string(),
            title: format!("Memory {i}"),
            content: format!("This is a demo memory {i}. Omi is great!"),
            category: "interesting".to_string(),
            visibility: "private".to_string(),
            tags: vec!["demo".to_string(), "omi".to_string()],
            created_at: now.clone(),
            updated_at: now.clone(),
            is_starred: false,
            is_archived: false,
            folder_id: None,
        })
        .collect();
    store.bulk_put(&memories)?;

    let action_items: Vec<ActionItem> = (1..=5)
        .map(|i| ActionItem {
            id: uuid::Uuid::new_v4().to_string(),
            description: format!("Follow up on demo item {i}"),
            details: None,
            completed: false,
            due_date: None,
            conversation_id: None,
            created_at: now.clone(),
            updated_at: now.clone(),
            tags: Vec::new(),
            folder_id: None,
        })
        .collect();
    store.bulk_put(&action_items)?;

    Ok(())
}

/// Full local reset: empties every collection, synced and local alike.
pub fn clear_all_data(store: &Store) -> Result<()> {
    store.clear::<Chat>()?;
    store.clear::<Memory>()?;
    store.clear::<ActionItem>()?;
    store.clear::<Folder>()?;
    Ok(())
}
