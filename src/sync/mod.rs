pub mod merge;
pub mod normalize;

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{anyhow, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;

use crate::models::{ActionItem, Chat, Memory};
use crate::store::Store;

pub const PAGE_SIZE: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Conversations,
    Memories,
    ActionItems,
}

impl Resource {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Resource::Conversations => "/user/conversations",
            Resource::Memories => "/user/memories",
            Resource::ActionItems => "/user/action-items",
        }
    }

    fn extra_query(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Resource::Conversations => &[("include_transcript", "true")],
            Resource::Memories | Resource::ActionItems => &[],
        }
    }
}

#[derive(Debug)]
pub struct Unauthorized;

impl std::fmt::Display for Unauthorized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unauthorized: check the API token")
    }
}

impl std::error::Error for Unauthorized {}

#[derive(Debug)]
pub struct NotFound {
    pub endpoint: String,
}

impl std::fmt::Display for NotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "not found: {}", self.endpoint)
    }
}

impl std::error::Error for NotFound {}

#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub base_url: String,
    pub token: String,
    /// IANA timezone of the account, supplied by the settings surface.
    /// The current remote API does not consume it.
    pub timezone: String,
}

/// Seam between the orchestrator and the remote service; tests substitute
/// in-memory sources.
pub trait RemoteSource {
    fn fetch_page(&self, resource: Resource, limit: usize, offset: usize) -> Result<Vec<Value>>;
}

pub struct HttpRemoteSource {
    client: Client,
    config: SyncConfig,
}

impl HttpRemoteSource {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

impl RemoteSource for HttpRemoteSource {
    fn fetch_page(&self, resource: Resource, limit: usize, offset: usize) -> Result<Vec<Value>> {
        if self.config.token.trim().is_empty() {
            return Err(anyhow::Error::new(Unauthorized));
        }

        let url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            resource.endpoint()
        );
        let mut request = self
            .client
            .get(url)
            .bearer_auth(&self.config.token)
            .query(&[("limit", limit.to_string()), ("offset", offset.to_string())]);
        for (key, value) in resource.extra_query() {
            request = request.query(&[(key, value)]);
        }

        let resp = request.send()?;
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(anyhow::Error::new(Unauthorized));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(anyhow::Error::new(NotFound {
                endpoint: resource.endpoint().to_string(),
            }));
        }
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(anyhow!(
                "{} page request failed: HTTP {status} {body}",
                resource.endpoint()
            ));
        }

        let page: Vec<Value> = resp.json()?;
        Ok(page)
    }
}

/// Paginates a resource to exhaustion: fixed-size pages at increasing
/// offsets, stopping on the first short (or empty) page.
pub fn fetch_all_pages(source: &dyn RemoteSource, resource: Resource) -> Result<Vec<Value>> {
    let mut all = Vec::new();
    let mut offset = 0;
    loop {
        let page = source.fetch_page(resource, PAGE_SIZE, offset)?;
        let len = page.len();
        all.extend(page);
        if len < PAGE_SIZE {
            break;
        }
        offset += PAGE_SIZE;
    }
    Ok(all)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub conversations: usize,
    pub memories: usize,
    pub action_items: usize,
}

/// Pulls the full remote snapshot and merges it into the store, one resource
/// type at a time. A failure in one resource is logged and does not abort
/// the others.
pub struct Syncer<S: RemoteSource> {
    source: S,
    in_flight: AtomicBool,
}

impl<S: RemoteSource> Syncer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Returns `None` when a sync on this syncer is already in flight; the
    /// second trigger is coalesced into a no-op.
    pub fn sync_all(&self, store: &Store) -> Option<SyncSummary> {
        self.sync_all_with_progress(store, &mut |_message, _percent| {})
    }

    pub fn sync_all_with_progress(
        &self,
        store: &Store,
        on_progress: &mut dyn FnMut(&str, u8),
    ) -> Option<SyncSummary> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }

        let summary = self.run(store, on_progress);
        self.in_flight.store(false, Ordering::SeqCst);
        Some(summary)
    }

    fn run(&self, store: &Store, on_progress: &mut dyn FnMut(&str, u8)) -> SyncSummary {
        let mut summary = SyncSummary::default();

        on_progress("Syncing conversations...", 10);
        match self.sync_conversations(store) {
            Ok(count) => summary.conversations = count,
            Err(e) => log::error!("conversation sync failed: {e:#}"),
        }

        on_progress("Syncing memories...", 40);
        match self.sync_memories(store) {
            Ok(count) => summary.memories = count,
            Err(e) => log::error!("memory sync failed: {e:#}"),
        }

        on_progress("Syncing action items...", 70);
        match self.sync_action_items(store) {
            Ok(count) => summary.action_items = count,
            Err(e) => log::error!("action item sync failed: {e:#}"),
        }

        on_progress("Sync complete!", 100);
        summary
    }

    fn sync_conversations(&self, store: &Store) -> Result<usize> {
        let raw = fetch_all_pages(&self.source, Resource::Conversations)?;
        for item in &raw {
            let Some(fresh) = normalize::conversation(item) else {
                log::warn!("skipping conversation without id");
                continue;
            };
            let merged = match store.get::<Chat>(&fresh.id)? {
                Some(existing) => merge::chat(&existing, &fresh),
                None => fresh,
            };
            store.put(&merged)?;
        }
        Ok(raw.len())
    }

    fn sync_memories(&self, store: &Store) -> Result<usize> {
        let raw = fetch_all_pages(&self.source, Resource::Memories)?;
        for item in &raw {
            let Some(fresh) = normalize::memory(item) else {
                log::warn!("skipping memory without id");
                continue;
            };
            let merged = match store.get::<Memory>(&fresh.id)? {
                Some(existing) => merge::memory(&existing, &fresh),
                None => fresh,
            };
            store.put(&merged)?;
        }
        Ok(raw.len())
    }

    fn sync_action_items(&self, store: &Store) -> Result<usize> {
        let raw = fetch_all_pages(&self.source, Resource::ActionItems)?;
        for item in &raw {
            let Some(fresh) = normalize::action_item(item) else {
                log::warn!("skipping action item without id");
                continue;
            };
            let merged = match store.get::<ActionItem>(&fresh.id)? {
                Some(existing) => merge::action_item(&existing, &fresh),
                None => fresh,
            };
            store.put(&merged)?;
        }
        Ok(raw.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_rejected_before_any_request() {
        let source = HttpRemoteSource::new(SyncConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            token: "  ".to_string(),
            timezone: "UTC".to_string(),
        });
        let err = source
            .fetch_page(Resource::Conversations, PAGE_SIZE, 0)
            .expect_err("must fail");
        assert!(err.downcast_ref::<Unauthorized>().is_some());
    }
}
