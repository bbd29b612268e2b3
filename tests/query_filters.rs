use chrono::NaiveDate;

use omi_manager::models::{ActionItem, Chat, ChatStatus, Memory};
use omi_manager::query::{
    filter_action_items, filter_chats, filter_memories, ActionItemFilter, ChatFilter, ChatScope,
    CompletionScope, MemoryFilter, MemoryScope, SortOrder,
};

fn chat(id: &str, title: &str, created_at: &str) -> Chat {
    Chat {
        id: id.to_string(),
        title: title.to_string(),
        summary: String::new(),
        preview_text: String::new(),
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
        tags: Vec::new(),
        folder_id: None,
        is_favorite: false,
        status: ChatStatus::Active,
        participants: Vec::new(),
        unread_count: 0,
        messages: Vec::new(),
        source: None,
        language: None,
        geolocation: None,
    }
}

fn memory(id: &str, title: &str, created_at: &str) -> Memory {
    Memory {
        id: id.to_string(),
        title: title.to_string(),
        content: String::new(),
        category: "manual".to_string(),
        visibility: "private".to_string(),
        tags: Vec::new(),
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
        is_starred: false,
        is_archived: false,
        folder_id: None,
    }
}

fn action_item(id: &str, description: &str, created_at: &str) -> ActionItem {
    ActionItem {
        id: id.to_string(),
        description: description.to_string(),
        details: None,
        completed: false,
        due_date: None,
        conversation_id: None,
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
        tags: Vec::new(),
        folder_id: None,
    }
}

fn ids_of_chats(chats: &[Chat]) -> Vec<&str> {
    chats.iter().map(|c| c.id.as_str()).collect()
}

#[test]
fn criteria_combine_as_a_conjunction() {
    let mut favorite_work = chat("c1", "Standup", "2024-03-01T09:00:00Z");
    favorite_work.is_favorite = true;
    favorite_work.tags = vec!["work".to_string()];

    let mut favorite_only = chat("c2", "Birthday plans", "2024-03-02T09:00:00Z");
    favorite_only.is_favorite = true;

    let mut work_only = chat("c3", "Retro", "2024-03-03T09:00:00Z");
    work_only.tags = vec!["work".to_string()];

    let chats = vec![favorite_work, favorite_only, work_only];
    let result = filter_chats(
        &chats,
        &ChatFilter {
            scope: ChatScope::Favorites,
            tag: Some("work".to_string()),
            ..Default::default()
        },
    );
    assert_eq!(ids_of_chats(&result), vec!["c1"]);
}

#[test]
fn default_chat_scope_hides_archived_and_deleted() {
    let active = chat("c1", "Active", "2024-03-01T09:00:00Z");
    let mut archived = chat("c2", "Archived", "2024-03-02T09:00:00Z");
    archived.status = ChatStatus::Archived;

    let chats = vec![active, archived];
    let all = filter_chats(&chats, &ChatFilter::default());
    assert_eq!(ids_of_chats(&all), vec!["c1"]);

    let archived_view = filter_chats(
        &chats,
        &ChatFilter {
            scope: ChatScope::Archived,
            ..Default::default()
        },
    );
    assert_eq!(ids_of_chats(&archived_view), vec!["c2"]);
}

#[test]
fn text_search_is_case_insensitive_over_fields_and_tags() {
    let mut by_title = chat("c1", "Project Phoenix kickoff", "2024-03-01T09:00:00Z");
    by_title.summary = "notes".to_string();
    let mut by_tag = chat("c2", "Lunch", "2024-03-02T09:00:00Z");
    by_tag.tags = vec!["phoenix".to_string()];
    let unrelated = chat("c3", "Dentist", "2024-03-03T09:00:00Z");

    let chats = vec![by_title, by_tag, unrelated];
    let result = filter_chats(
        &chats,
        &ChatFilter {
            query: Some("PHOENIX".to_string()),
            ..Default::default()
        },
    );
    assert_eq!(ids_of_chats(&result), vec!["c2", "c1"]);
}

#[test]
fn blank_query_matches_everything() {
    let chats = vec![chat("c1", "One", "2024-03-01T09:00:00Z")];
    let result = filter_chats(
        &chats,
        &ChatFilter {
            query: Some("   ".to_string()),
            ..Default::default()
        },
    );
    assert_eq!(result.len(), 1);
}

#[test]
fn date_range_is_inclusive_on_both_ends() {
    let chats = vec![
        chat("c1", "Before", "2024-02-28T23:59:59Z"),
        chat("c2", "First day", "2024-03-01T00:00:00Z"),
        chat("c3", "Last day", "2024-03-05T23:00:00Z"),
        chat("c4", "After", "2024-03-06T00:00:00Z"),
    ];
    let result = filter_chats(
        &chats,
        &ChatFilter {
            from: NaiveDate::from_ymd_opt(2024, 3, 1),
            to: NaiveDate::from_ymd_opt(2024, 3, 5),
            sort: SortOrder::Oldest,
            ..Default::default()
        },
    );
    assert_eq!(ids_of_chats(&result), vec!["c2", "c3"]);
}

#[test]
fn unparseable_timestamps_are_excluded_from_ranged_views_only() {
    let chats = vec![
        chat("c1", "Dated", "2024-03-01T09:00:00Z"),
        chat("c2", "Undated", "not a timestamp"),
    ];

    let ranged = filter_chats(
        &chats,
        &ChatFilter {
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        },
    );
    assert_eq!(ids_of_chats(&ranged), vec!["c1"]);

    let unranged = filter_chats(&chats, &ChatFilter::default());
    assert_eq!(unranged.len(), 2);
}

#[test]
fn newest_first_is_the_default_sort() {
    let chats = vec![
        chat("c1", "Oldest", "2024-03-01T09:00:00Z"),
        chat("c3", "Newest", "2024-03-03T09:00:00Z"),
        chat("c2", "Middle", "2024-03-02T09:00:00Z"),
    ];
    let newest = filter_chats(&chats, &ChatFilter::default());
    assert_eq!(ids_of_chats(&newest), vec!["c3", "c2", "c1"]);

    let oldest = filter_chats(
        &chats,
        &ChatFilter {
            sort: SortOrder::Oldest,
            ..Default::default()
        },
    );
    assert_eq!(ids_of_chats(&oldest), vec!["c1", "c2", "c3"]);
}

#[test]
fn memory_scopes_exclude_archived_unless_asked_for() {
    let plain = memory("m1", "plain", "2024-03-01T09:00:00Z");
    let mut starred = memory("m2", "starred", "2024-03-02T09:00:00Z");
    starred.is_starred = true;
    let mut starred_archived = memory("m3", "starred archived", "2024-03-03T09:00:00Z");
    starred_archived.is_starred = true;
    starred_archived.is_archived = true;

    let memories = vec![plain, starred, starred_archived];

    let all = filter_memories(&memories, &MemoryFilter::default());
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|m| !m.is_archived));

    let starred_view = filter_memories(
        &memories,
        &MemoryFilter {
            scope: MemoryScope::Starred,
            ..Default::default()
        },
    );
    assert_eq!(starred_view.len(), 1);
    assert_eq!(starred_view[0].id, "m2");

    let archived_view = filter_memories(
        &memories,
        &MemoryFilter {
            scope: MemoryScope::Archived,
            ..Default::default()
        },
    );
    assert_eq!(archived_view.len(), 1);
    assert_eq!(archived_view[0].id, "m3");
}

#[test]
fn action_items_split_by_completion() {
    let pending = action_item("a1", "call plumber", "2024-03-01T09:00:00Z");
    let mut done = action_item("a2", "send invoice", "2024-03-02T09:00:00Z");
    done.completed = true;

    let items = vec![pending, done];

    let all = filter_action_items(&items, &ActionItemFilter::default());
    assert_eq!(all.len(), 2);

    let open = filter_action_items(
        &items,
        &ActionItemFilter {
            scope: CompletionScope::Pending,
            ..Default::default()
        },
    );
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, "a1");

    let closed = filter_action_items(
        &items,
        &ActionItemFilter {
            scope: CompletionScope::Completed,
            ..Default::default()
        },
    );
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].id, "a2");
}

#[test]
fn folder_filter_applies_to_every_collection() {
    let mut filed = memory("m1", "filed", "2024-03-01T09:00:00Z");
    filed.folder_id = Some("f1".to_string());
    let loose = memory("m2", "loose", "2024-03-02T09:00:00Z");

    let memories = vec![filed, loose];
    let result = filter_memories(
        &memories,
        &MemoryFilter {
            folder_id: Some("f1".to_string()),
            ..Default::default()
        },
    );
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, "m1");
}
