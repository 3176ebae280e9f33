use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SessionState {
    usuario_id: Option<i64>,
}

/// Device-local record of who is logged in.
///
/// The stored `usuario_id` is only a login flag; it grants nothing on the
/// server. A missing file reads as logged out.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    state: SessionState,
}

impl SessionStore {
    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => SessionState::default(),
            Err(err) => return Err(err),
        };
        Ok(Self { path, state })
    }

    pub fn save(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.path, payload)
    }

    pub fn usuario_id(&self) -> Option<i64> {
        self.state.usuario_id
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.usuario_id.is_some()
    }

    pub fn login(&mut self, usuario_id: i64) -> std::io::Result<()> {
        self.state.usuario_id = Some(usuario_id);
        self.save()
    }

    pub fn logout(&mut self) -> std::io::Result<()> {
        self.state.usuario_id = None;
        self.save()
    }
}
