use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::{
    error::{Result, SyncError},
    form::FormTarget,
    http::{HttpMethod, HttpResourceClient},
    resource::{Fields, Resource, ResourceId, ResourceKind},
};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(SyncError),
}

#[derive(Debug, Default)]
struct ListState {
    items: Vec<Resource>,
    status: ListStatus,
    /// Generation of the most recently started load.
    issued: u64,
    /// Generation of the load whose outcome `items`/`status` reflect.
    applied: u64,
}

/// In-memory ordered list of one resource type, kept in sync with the server.
///
/// Clones share the same list, so a clone can be moved into a spawned task
/// (focus refresh) while the owner keeps reading from it. Overlapping loads
/// resolve to the most recently started one; responses of older loads that
/// arrive afterwards are dropped.
#[derive(Clone, Debug)]
pub struct ResourceListController {
    kind: &'static ResourceKind,
    client: HttpResourceClient,
    scope: Vec<(&'static str, String)>,
    state: Arc<Mutex<ListState>>,
}

impl ResourceListController {
    pub fn new(kind: &'static ResourceKind, client: HttpResourceClient) -> Self {
        Self {
            kind,
            client,
            scope: Vec::new(),
            state: Arc::new(Mutex::new(ListState::default())),
        }
    }

    /// Adds a query parameter sent with every `load()`, e.g. `usuario_id`.
    pub fn with_scope(mut self, name: &'static str, value: impl ToString) -> Self {
        self.scope.push((name, value.to_string()));
        self
    }

    pub fn kind(&self) -> &'static ResourceKind {
        self.kind
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn items(&self) -> Vec<Resource> {
        self.lock().items.clone()
    }

    pub fn status(&self) -> ListStatus {
        self.lock().status.clone()
    }

    pub fn find(&self, id: &ResourceId) -> Option<Resource> {
        self.lock()
            .items
            .iter()
            .find(|item| item.id() == Some(id))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Replaces the whole list with the server's collection.
    ///
    /// On failure the previous items are kept and the error is retained in
    /// [`ListStatus::Error`].
    pub async fn load(&self) -> Result<()> {
        let generation = {
            let mut state = self.lock();
            state.issued += 1;
            state.status = ListStatus::Loading;
            state.issued
        };
        tracing::debug!(resource = self.kind.name, generation, "loading list");

        let res = self
            .client
            .request_with_query(
                HttpMethod::Get,
                self.kind.collection_path,
                &self.scope,
                None,
            )
            .await
            .and_then(Resource::list_from_json);

        let mut state = self.lock();
        if generation <= state.applied {
            tracing::debug!(
                resource = self.kind.name,
                generation,
                applied = state.applied,
                "dropping stale list response"
            );
            return res.map(|_| ());
        }
        state.applied = generation;
        let latest = generation == state.issued;

        match res {
            Ok(items) => {
                tracing::debug!(resource = self.kind.name, count = items.len(), "list loaded");
                state.items = items;
                if latest {
                    state.status = ListStatus::Ready;
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(resource = self.kind.name, "list load failed: {err}");
                if latest {
                    state.status = ListStatus::Error(err.clone());
                }
                Err(err)
            }
        }
    }

    /// Starts a `load()` on the current runtime without waiting for it.
    pub fn reload_in_background(&self) -> JoinHandle<Result<()>> {
        let controller = self.clone();
        tokio::spawn(async move { controller.load().await })
    }

    /// POSTs `fields` and appends the created resource once the server
    /// confirms it.
    pub async fn create(&self, fields: Fields) -> Result<Resource> {
        tracing::debug!(resource = self.kind.name, "creating");
        let body = Value::Object(fields);
        let created = self
            .client
            .request(HttpMethod::Post, self.kind.collection_path, Some(&body))
            .await
            .and_then(Resource::from_json)
            .inspect_err(|err| tracing::warn!(resource = self.kind.name, "create failed: {err}"))?;

        if created.id().is_none() {
            return Err(SyncError::Decode(format!(
                "created {} carries no id",
                self.kind.name
            )));
        }

        upsert(&mut self.lock().items, created.clone());
        Ok(created)
    }

    /// PUTs `fields` to the item path and swaps the local copy.
    ///
    /// When no local item has `id` the server's answer is not inserted.
    pub async fn update(&self, id: &ResourceId, fields: Fields) -> Result<Resource> {
        tracing::debug!(resource = self.kind.name, %id, "updating");
        let body = Value::Object(fields.clone());
        let answer = self
            .client
            .request(HttpMethod::Put, &self.kind.item_path(id), Some(&body))
            .await
            .inspect_err(|err| tracing::warn!(resource = self.kind.name, %id, "update failed: {err}"))?;

        let updated = confirmed(id, answer, fields)?;
        if !replace_by_id(&mut self.lock().items, id, updated.clone()) {
            tracing::debug!(resource = self.kind.name, %id, "updated item not in local list");
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: &ResourceId) -> Result<()> {
        tracing::debug!(resource = self.kind.name, %id, "deleting");
        self.client
            .request(HttpMethod::Delete, &self.kind.item_path(id), None)
            .await
            .inspect_err(|err| tracing::warn!(resource = self.kind.name, %id, "delete failed: {err}"))?;

        remove_by_id(&mut self.lock().items, id);
        Ok(())
    }
}

impl FormTarget for ResourceListController {
    fn kind(&self) -> &'static ResourceKind {
        self.kind
    }

    async fn submit_create(&self, fields: Fields) -> Result<Resource> {
        self.create(fields).await
    }

    async fn submit_update(&self, id: &ResourceId, fields: Fields) -> Result<Resource> {
        self.update(id, fields).await
    }
}

/// Builds the resource the server confirmed for `id`. An empty answer means
/// the server accepted `sent` as is.
pub(crate) fn confirmed(id: &ResourceId, answer: Value, sent: Fields) -> Result<Resource> {
    if answer.is_null() {
        return Ok(Resource::with_id(id.clone(), sent));
    }
    let resource = Resource::from_json(answer)?;
    if resource.id().is_some() {
        return Ok(resource);
    }
    Ok(Resource::with_id(id.clone(), resource.fields))
}

fn upsert(items: &mut Vec<Resource>, resource: Resource) {
    let id = resource.id().cloned();
    match items.iter_mut().find(|item| item.id() == id.as_ref()) {
        Some(slot) => *slot = resource,
        None => items.push(resource),
    }
}

fn replace_by_id(items: &mut [Resource], id: &ResourceId, resource: Resource) -> bool {
    match items.iter_mut().find(|item| item.id() == Some(id)) {
        Some(slot) => {
            *slot = resource;
            true
        }
        None => false,
    }
}

fn remove_by_id(items: &mut Vec<Resource>, id: &ResourceId) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != Some(id));
    items.len() != before
}
