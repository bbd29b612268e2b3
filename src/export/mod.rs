//! Pure formatting over a full store snapshot: a JSON bundle and a Markdown
//! rendering. Writing the output anywhere is the caller's business.

use anyhow::Result;
use serde::Serialize;

use crate::models::{ActionItem, Chat, Folder, Memory};
use crate::store::Store;
use crate::time::{calendar_day, now_iso, sort_key_ms};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub conversations: Vec<Chat>,
    pub memories: Vec<Memory>,
    pub action_items: Vec<ActionItem>,
    pub folders: Vec<Folder>,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    pub total_conversations: usize,
    pub total_memories: usize,
    pub total_action_items: usize,
    pub total_folders: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub export_date: String,
    pub version: &'static str,
    pub data: ExportData,
    pub stats: ExportStats,
}

pub fn collect(store: &Store) -> Result<ExportBundle> {
    let conversations: Vec<Chat> = store.get_all()?;
    let memories: Vec<Memory> = store.get_all()?;
    let action_items: Vec<ActionItem> = store.get_all()?;
    let folders: Vec<Folder> = store.get_all()?;

    let stats = ExportStats {
        total_conversations: conversations.len(),
        total_memories: memories.len(),
        total_action_items: action_items.len(),
        total_folders: folders.len(),
    };

    Ok(ExportBundle {
        export_date: now_iso(),
        version: "1.0",
        data: ExportData {
            conversations,
            memories,
            action_items,
            folders,
        },
        stats,
    })
}

pub fn as_json(store: &Store) -> Result<String> {
    let bundle = collect(store)?;
    Ok(serde_json::to_string_pretty(&bundle)?)
}

fn display_day(timestamp: &str) -> String {
    calendar_day(timestamp)
        .map(|day| day.to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

pub fn as_markdown(store: &Store) -> Result<String> {
    let bundle = collect(store)?;
    let ExportData {
        mut conversations,
        mut memories,
        action_items,
        folders,
    } = bundle.data;
    let stats = bundle.stats;

    let mut md = String::new();
    md.push_str("# Omi Data Export\n\n");
    md.push_str(&format!("**Exported:** {}\n\n", bundle.export_date));
    md.push_str("## Summary\n\n");
    md.push_str(&format!(
        "- **Conversations:** {}\n",
        stats.total_conversations
    ));
    md.push_str(&format!("- **Memories:** {}\n", stats.total_memories));
    md.push_str(&format!(
        "- **Action Items:** {}\n",
        stats.total_action_items
    ));
    md.push_str(&format!("- **Folders:** {}\n\n", stats.total_folders));
    md.push_str("---\n\n");

    if !folders.is_empty() {
        md.push_str("## Folders\n\n");
        for folder in &folders {
            md.push_str(&format!(
                "- **{}** ({})\n",
                folder.name,
                folder.folder_type.as_str()
            ));
        }
        md.push_str("\n---\n\n");
    }

    if !conversations.is_empty() {
        md.push_str("## Conversations\n\n");
        conversations.sort_by_key(|c| std::cmp::Reverse(sort_key_ms(&c.created_at)));

        for chat in &conversations {
            md.push_str(&format!("### {}\n\n", chat.title));
            md.push_str(&format!("**Date:** {}", display_day(&chat.created_at)));
            if !chat.tags.is_empty() {
                md.push_str(&format!(" | **Tags:** {}", chat.tags.join(", ")));
            }
            if chat.is_favorite {
                md.push_str(" | ⭐ Favorite");
            }
            md.push_str("\n\n");

            if !chat.summary.is_empty() {
                md.push_str(&format!("> {}\n\n", chat.summary));
            }

            if !chat.messages.is_empty() {
                md.push_str("#### Transcript\n\n");
                for message in &chat.messages {
                    let speaker = if message.role == "user" {
                        "**You:**"
                    } else {
                        "**Omi:**"
                    };
                    md.push_str(&format!("{speaker} {}\n\n", message.content));
                }
            }
            md.push_str("---\n\n");
        }
    }

    if !memories.is_empty() {
        md.push_str("## Memories\n\n");
        memories.sort_by_key(|m| std::cmp::Reverse(sort_key_ms(&m.created_at)));

        for memory in &memories {
            let title = if memory.title.is_empty() {
                "Untitled Memory"
            } else {
                &memory.title
            };
            md.push_str(&format!("### {title}\n\n"));
            md.push_str(&format!("**Date:** {}", display_day(&memory.created_at)));
            if !memory.category.is_empty() {
                md.push_str(&format!(" | **Category:** {}", memory.category));
            }
            if !memory.tags.is_empty() {
                md.push_str(&format!(" | **Tags:** {}", memory.tags.join(", ")));
            }
            if memory.is_starred {
                md.push_str(" | ⭐ Starred");
            }
            md.push_str("\n\n");
            md.push_str(&format!("{}\n\n", memory.content));
            md.push_str("---\n\n");
        }
    }

    if !action_items.is_empty() {
        md.push_str("## Action Items\n\n");

        let (completed, pending): (Vec<&ActionItem>, Vec<&ActionItem>) =
            action_items.iter().partition(|item| item.completed);

        if !pending.is_empty() {
            md.push_str("### Pending Tasks\n\n");
            for item in &pending {
                let due = item
                    .due_date
                    .as_deref()
                    .map(|d| format!(" (Due: {})", display_day(d)))
                    .unwrap_or_default();
                md.push_str(&format!("- [ ] {}{due}\n", item.description));
                if let Some(details) = &item.details {
                    md.push_str(&format!("  - {details}\n"));
                }
            }
            md.push('\n');
        }

        if !completed.is_empty() {
            md.push_str("### Completed Tasks\n\n");
            for item in &completed {
                md.push_str(&format!("- [x] {}\n", item.description));
                if let Some(details) = &item.details {
                    md.push_str(&format!("  - {details}\n"));
                }
            }
            md.push('\n');
        }
    }

    Ok(md)
}
