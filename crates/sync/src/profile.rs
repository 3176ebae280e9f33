use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::{
    error::{Result, SyncError},
    form::FormTarget,
    http::{HttpMethod, HttpResourceClient},
    list::confirmed,
    resource::{Fields, Resource, ResourceId, ResourceKind},
};

/// The logged-in user's own record, `/usuarios/{id}`.
#[derive(Clone, Debug)]
pub struct ProfileController {
    client: HttpResourceClient,
    usuario_id: ResourceId,
    state: Arc<Mutex<Option<Resource>>>,
}

impl ProfileController {
    pub fn new(client: HttpResourceClient, usuario_id: impl Into<ResourceId>) -> Self {
        Self {
            client,
            usuario_id: usuario_id.into(),
            state: Arc::new(Mutex::new(None)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Resource>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn path(&self) -> String {
        ResourceKind::USUARIOS.item_path(&self.usuario_id)
    }

    pub fn usuario_id(&self) -> &ResourceId {
        &self.usuario_id
    }

    pub fn profile(&self) -> Option<Resource> {
        self.lock().clone()
    }

    pub async fn load(&self) -> Result<Resource> {
        let answer = self
            .client
            .request(HttpMethod::Get, &self.path(), None)
            .await
            .inspect_err(|err| tracing::warn!(usuario_id = %self.usuario_id, "profile load failed: {err}"))?;
        let profile = Resource::from_json(answer)?;
        *self.lock() = Some(profile.clone());
        Ok(profile)
    }

    pub async fn update(&self, fields: Fields) -> Result<Resource> {
        let answer: Value = self
            .client
            .put(&self.path(), &fields)
            .await
            .inspect_err(|err| tracing::warn!(usuario_id = %self.usuario_id, "profile update failed: {err}"))?;
        let profile = confirmed(&self.usuario_id, answer, fields)?;
        *self.lock() = Some(profile.clone());
        Ok(profile)
    }
}

impl FormTarget for ProfileController {
    fn kind(&self) -> &'static ResourceKind {
        &ResourceKind::USUARIOS
    }

    async fn submit_create(&self, _fields: Fields) -> Result<Resource> {
        Err(SyncError::Unsupported("profiles are created through registration"))
    }

    async fn submit_update(&self, id: &ResourceId, fields: Fields) -> Result<Resource> {
        if id != &self.usuario_id {
            return Err(SyncError::Unsupported("editing another user's profile"));
        }
        self.update(fields).await
    }
}
