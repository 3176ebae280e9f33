//! Draft state behind the add/edit modals.
//!
//! A session is `Idle` until [`FormSessionController::begin_create`] or
//! [`FormSessionController::begin_edit`] opens it, and goes back to `Idle` on
//! [`cancel`](FormSessionController::cancel) or after a successful
//! [`submit`](FormSessionController::submit). A failed submit leaves the
//! draft open so the user can fix it and retry.
//!
//! `submit` borrows the session mutably until the server answers, so the same
//! session cannot send a second write while one is in flight.
use std::future::Future;

use serde_json::Value;

use crate::{
    error::{Result, SyncError},
    resource::{Fields, Resource, ResourceId, ResourceKind},
};

/// Where a submitted draft goes.
pub trait FormTarget {
    fn kind(&self) -> &'static ResourceKind;

    fn submit_create(&self, fields: Fields) -> impl Future<Output = Result<Resource>> + Send;

    fn submit_update(
        &self,
        id: &ResourceId,
        fields: Fields,
    ) -> impl Future<Output = Result<Resource>> + Send;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Idle,
    Creating,
    Editing(ResourceId),
}

#[derive(Debug)]
pub struct FormSessionController {
    kind: &'static ResourceKind,
    mode: FormMode,
    draft: Fields,
    baseline: Fields,
    fixed: Fields,
}

impl FormSessionController {
    pub fn new(kind: &'static ResourceKind) -> Self {
        Self {
            kind,
            mode: FormMode::Idle,
            draft: Fields::new(),
            baseline: Fields::new(),
            fixed: Fields::new(),
        }
    }

    /// Field merged into every new draft, e.g. the logged-in `usuario_id`.
    pub fn with_fixed_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fixed.insert(name.to_string(), value.into());
        self
    }

    pub fn kind(&self) -> &'static ResourceKind {
        self.kind
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn target_id(&self) -> Option<&ResourceId> {
        match &self.mode {
            FormMode::Editing(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Idle
    }

    pub fn draft(&self) -> &Fields {
        &self.draft
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.draft.get(name)
    }

    /// True once the draft differs from what the session was opened with.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.baseline
    }

    pub fn begin_create(&mut self) {
        self.reset();
        let mut draft = self.kind.default_fields();
        draft.extend(self.fixed.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.mode = FormMode::Creating;
        self.baseline = draft.clone();
        self.draft = draft;
    }

    /// Opens the session on a copy of `resource`'s fields.
    ///
    /// Fails when the resource has no server id yet.
    pub fn begin_edit(&mut self, resource: &Resource) -> Result<()> {
        self.reset();
        let id = resource
            .id()
            .cloned()
            .ok_or(SyncError::Unsupported("editing a record without id"))?;
        self.mode = FormMode::Editing(id);
        self.baseline = resource.fields.clone();
        self.draft = resource.fields.clone();
        Ok(())
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) {
        self.draft.insert(name.to_string(), value.into());
    }

    pub fn remove_field(&mut self, name: &str) {
        self.draft.remove(name);
    }

    pub fn validate(&self) -> Result<()> {
        let missing_fields = self.kind.missing_fields(&self.draft);
        if missing_fields.is_empty() {
            return Ok(());
        }
        Err(SyncError::Validation { missing_fields })
    }

    pub async fn submit<T: FormTarget>(&mut self, target: &T) -> Result<Resource> {
        let res = match self.mode.clone() {
            FormMode::Idle => return Err(SyncError::Unsupported("submit without an open form")),
            FormMode::Creating => {
                self.validate()?;
                target.submit_create(self.draft.clone()).await
            }
            FormMode::Editing(id) => {
                self.validate()?;
                target.submit_update(&id, self.draft.clone()).await
            }
        };

        match res {
            Ok(resource) => {
                tracing::debug!(resource = target.kind().name, "form submitted");
                self.reset();
                Ok(resource)
            }
            Err(err) => {
                tracing::debug!(resource = target.kind().name, "form kept open: {err}");
                Err(err)
            }
        }
    }

    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.mode = FormMode::Idle;
        self.draft.clear();
        self.baseline.clear();
    }
}
