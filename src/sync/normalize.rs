//! Maps raw remote items into local record shapes. Best-effort: missing
//! fields get safe fallbacks, and only a missing id drops an item.

use serde_json::Value;

use crate::models::{ActionItem, Chat, ChatMessage, ChatStatus, Geolocation, Memory};
use crate::time::{calendar_day, now_iso};

/// String-valued field; empty strings count as absent, numbers stringify.
fn str_field(raw: &Value, key: &str) -> Option<String> {
    match raw.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn take_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn geolocation(raw: &Value) -> Option<Geolocation> {
    let geo = raw.get("geolocation")?;
    if !geo.is_object() {
        return None;
    }
    Some(Geolocation {
        latitude: geo.get("latitude").and_then(Value::as_f64),
        longitude: geo.get("longitude").and_then(Value::as_f64),
        locality: str_field(geo, "locality"),
        address: str_field(geo, "address"),
        google_place_id: str_field(geo, "google_place_id"),
    })
}

pub fn conversation(raw: &Value) -> Option<Chat> {
    let id = str_field(raw, "id")?;

    let structured = raw.get("structured").cloned().unwrap_or(Value::Null);
    let started_at = str_field(raw, "started_at");
    let created_at = started_at
        .clone()
        .or_else(|| str_field(raw, "created_at"))
        .unwrap_or_else(now_iso);

    let title = str_field(&structured, "title")
        .or_else(|| {
            started_at
                .as_deref()
                .and_then(calendar_day)
                .map(|day| format!("Conversation {day}"))
        })
        .unwrap_or_else(|| "Untitled Conversation".to_string());

    let mut messages = Vec::new();
    if let Some(segments) = raw.get("transcript_segments").and_then(Value::as_array) {
        for (index, seg) in segments.iter().enumerate() {
            let is_user = seg.get("is_user").and_then(Value::as_bool) == Some(true)
                || seg.get("speaker_id").and_then(Value::as_i64) == Some(0)
                || seg.get("speaker").and_then(Value::as_str) == Some("SPEAKER_00");
            messages.push(ChatMessage {
                id: str_field(seg, "id").unwrap_or_else(|| format!("seg_{index}")),
                role: if is_user { "user" } else { "assistant" }.to_string(),
                content: str_field(seg, "text").unwrap_or_default(),
                timestamp: created_at.clone(),
                speaker_id: str_field(seg, "speaker_id").or_else(|| str_field(seg, "speaker")),
                start: seg.get("start").and_then(Value::as_f64),
                end: seg.get("end").and_then(Value::as_f64),
            });
        }
    }

    let mut summary = str_field(&structured, "overview").unwrap_or_default();
    if summary.is_empty() && !messages.is_empty() {
        let joined = messages
            .iter()
            .take(3)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        summary = take_chars(&joined, 300);
        if summary.chars().count() >= 300 {
            summary.push_str("...");
        }
    }
    if summary.is_empty() {
        summary = "No summary available".to_string();
    }

    let tags = str_field(&structured, "category")
        .map(|category| vec![category])
        .unwrap_or_default();

    let updated_at = str_field(raw, "finished_at")
        .or_else(|| started_at.clone())
        .or_else(|| str_field(raw, "created_at"))
        .unwrap_or_else(|| created_at.clone());

    Some(Chat {
        id,
        title,
        preview_text: summary.clone(),
        summary,
        created_at,
        updated_at,
        tags,
        folder_id: None,
        is_favorite: false,
        status: ChatStatus::Active,
        participants: Vec::new(),
        unread_count: 0,
        messages,
        source: str_field(raw, "source"),
        language: str_field(raw, "language"),
        geolocation: geolocation(raw),
    })
}

pub fn memory(raw: &Value) -> Option<Memory> {
    let id = str_field(raw, "id")?;

    let content =
        str_field(raw, "content").unwrap_or_else(|| "_No content available_".to_string());

    let first_line = content.lines().next().unwrap_or("");
    let mut title = take_chars(first_line, 60);
    if first_line.chars().count() >= 60 {
        title = take_chars(first_line, 57);
        title.push_str("...");
    }
    if title.is_empty() {
        title = "Untitled Memory".to_string();
    }

    // Category seeds the tag list; remote tags follow, deduplicated.
    let mut tags = Vec::new();
    if let Some(category) = str_field(raw, "category") {
        tags.push(category);
    }
    if let Some(remote_tags) = raw.get("tags").and_then(Value::as_array) {
        for tag in remote_tags {
            if let Some(tag) = tag.as_str() {
                if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                    tags.push(tag.to_string());
                }
            }
        }
    }

    // The remote API does not reliably supply a creation timestamp for
    // memories; the import time is the fallback of last resort.
    let mut date = str_field(raw, "created_at")
        .or_else(|| str_field(raw, "started_at"))
        .or_else(|| str_field(raw, "date"));
    if date.is_none() {
        if let Some(structured) = raw.get("structured") {
            date = str_field(structured, "date")
                .or_else(|| str_field(structured, "created_at"))
                .or_else(|| str_field(structured, "started_at"));
        }
    }
    let created_at = date.unwrap_or_else(now_iso);
    let updated_at = str_field(raw, "updated_at").unwrap_or_else(|| created_at.clone());

    Some(Memory {
        id,
        title,
        content,
        category: str_field(raw, "category").unwrap_or_else(|| "manual".to_string()),
        visibility: str_field(raw, "visibility").unwrap_or_else(|| "private".to_string()),
        tags,
        created_at,
        updated_at,
        is_starred: false,
        is_archived: false,
        folder_id: None,
    })
}

pub fn action_item(raw: &Value) -> Option<ActionItem> {
    let id = str_field(raw, "id")?;

    let completed_at = str_field(raw, "completed_at");
    let completed =
        raw.get("completed").and_then(Value::as_bool) == Some(true) || completed_at.is_some();

    let created_at = str_field(raw, "created_at").unwrap_or_else(now_iso);
    let updated_at = str_field(raw, "updated_at")
        .or(completed_at)
        .unwrap_or_else(now_iso);

    Some(ActionItem {
        id,
        description: str_field(raw, "description").unwrap_or_else(|| "Action Item".to_string()),
        details: None,
        completed,
        due_date: str_field(raw, "due_at"),
        conversation_id: str_field(raw, "conversation_id"),
        created_at,
        updated_at,
        tags: Vec::new(),
        folder_id: None,
    })
}
