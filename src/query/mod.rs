//! Stateless predicate and sort evaluation over full collection snapshots.
//! Every view recomputes from the current snapshot; nothing here persists.

use std::cmp::Reverse;

use chrono::NaiveDate;

use crate::models::{ActionItem, Chat, ChatStatus, Memory};
use crate::time::{calendar_day, sort_key_ms};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

/// `All` shows active chats only; archived chats live behind their own scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChatScope {
    #[default]
    All,
    Favorites,
    Archived,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemoryScope {
    #[default]
    All,
    Starred,
    Archived,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompletionScope {
    #[default]
    All,
    Pending,
    Completed,
}

#[derive(Clone, Debug, Default)]
pub struct ChatFilter {
    pub scope: ChatScope,
    pub folder_id: Option<String>,
    pub tag: Option<String>,
    pub query: Option<String>,
    /// Inclusive calendar-day range on `createdAt`.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: SortOrder,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryFilter {
    pub scope: MemoryScope,
    pub folder_id: Option<String>,
    pub tag: Option<String>,
    pub query: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: SortOrder,
}

#[derive(Clone, Debug, Default)]
pub struct ActionItemFilter {
    pub scope: CompletionScope,
    pub folder_id: Option<String>,
    pub tag: Option<String>,
    pub query: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: SortOrder,
}

fn active_query(query: &Option<String>) -> Option<String> {
    let q = query.as_deref()?.trim().to_lowercase();
    if q.is_empty() {
        None
    } else {
        Some(q)
    }
}

fn matches_text(q: &str, fields: &[&str], tags: &[String]) -> bool {
    fields.iter().any(|field| field.to_lowercase().contains(q))
        || tags.iter().any(|tag| tag.to_lowercase().contains(q))
}

fn matches_folder(folder_id: &Option<String>, record_folder: Option<&str>) -> bool {
    match folder_id {
        Some(wanted) => record_folder == Some(wanted.as_str()),
        None => true,
    }
}

fn matches_tag(tag: &Option<String>, tags: &[String]) -> bool {
    match tag {
        Some(wanted) => tags.contains(wanted),
        None => true,
    }
}

fn within_range(created_at: &str, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }
    let Some(day) = calendar_day(created_at) else {
        return false;
    };
    if let Some(from) = from {
        if day < from {
            return false;
        }
    }
    if let Some(to) = to {
        if day > to {
            return false;
        }
    }
    true
}

fn sort_records<T>(records: &mut [T], sort: SortOrder, key: impl Fn(&T) -> i64) {
    match sort {
        SortOrder::Newest => records.sort_by_key(|r| Reverse(key(r))),
        SortOrder::Oldest => records.sort_by_key(|r| key(r)),
    }
}

pub fn filter_chats(chats: &[Chat], filter: &ChatFilter) -> Vec<Chat> {
    let q = active_query(&filter.query);
    let mut result: Vec<Chat> = chats
        .iter()
        .filter(|c| match filter.scope {
            ChatScope::All => c.status == ChatStatus::Active,
            ChatScope::Favorites => c.status == ChatStatus::Active && c.is_favorite,
            ChatScope::Archived => c.status == ChatStatus::Archived,
        })
        .filter(|c| matches_folder(&filter.folder_id, c.folder_id.as_deref()))
        .filter(|c| matches_tag(&filter.tag, &c.tags))
        .filter(|c| {
            q.as_deref()
                .map_or(true, |q| matches_text(q, &[&c.title, &c.summary], &c.tags))
        })
        .filter(|c| within_range(&c.created_at, filter.from, filter.to))
        .cloned()
        .collect();
    sort_records(&mut result, filter.sort, |c| sort_key_ms(&c.created_at));
    result
}

pub fn filter_memories(memories: &[Memory], filter: &MemoryFilter) -> Vec<Memory> {
    let q = active_query(&filter.query);
    let mut result: Vec<Memory> = memories
        .iter()
        .filter(|m| match filter.scope {
            MemoryScope::All => !m.is_archived,
            MemoryScope::Starred => m.is_starred && !m.is_archived,
            MemoryScope::Archived => m.is_archived,
        })
        .filter(|m| matches_folder(&filter.folder_id, m.folder_id.as_deref()))
        .filter(|m| matches_tag(&filter.tag, &m.tags))
        .filter(|m| {
            q.as_deref()
                .map_or(true, |q| matches_text(q, &[&m.title, &m.content], &m.tags))
        })
        .filter(|m| within_range(&m.created_at, filter.from, filter.to))
        .cloned()
        .collect();
    sort_records(&mut result, filter.sort, |m| sort_key_ms(&m.created_at));
    result
}

pub fn filter_action_items(items: &[ActionItem], filter: &ActionItemFilter) -> Vec<ActionItem> {
    let q = active_query(&filter.query);
    let mut result: Vec<ActionItem> = items
        .iter()
        .filter(|item| match filter.scope {
            CompletionScope::All => true,
            CompletionScope::Pending => !item.completed,
            CompletionScope::Completed => item.completed,
        })
        .filter(|item| matches_folder(&filter.folder_id, item.folder_id.as_deref()))
        .filter(|item| matches_tag(&filter.tag, &item.tags))
        .filter(|item| {
            q.as_deref()
                .map_or(true, |q| matches_text(q, &[&item.description], &item.tags))
        })
        .filter(|item| within_range(&item.created_at, filter.from, filter.to))
        .cloned()
        .collect();
    sort_records(&mut result, filter.sort, |item| {
        sort_key_ms(&item.created_at)
    });
    result
}
