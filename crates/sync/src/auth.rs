use api_types::usuario::{Login, LoginRespuesta, Usuario, UsuarioNuevo};

use crate::{
    error::{Result, SyncError},
    http::HttpResourceClient,
};

/// Shortest password `register` accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug)]
pub struct AuthApi {
    client: HttpResourceClient,
}

impl AuthApi {
    pub fn new(client: HttpResourceClient) -> Self {
        Self { client }
    }

    /// Checks credentials. A wrong password comes back as `Http { status: 401 }`.
    ///
    /// Blank credentials fail locally with [`SyncError::Validation`].
    pub async fn login(&self, correo: &str, password: &str) -> Result<LoginRespuesta> {
        let mut missing = Vec::new();
        require(&mut missing, "correo", correo);
        require(&mut missing, "contraseña", password);
        validated(missing)?;

        let payload = Login {
            correo: correo.trim().to_string(),
            contrasena_hash: password.to_string(),
        };
        let res: LoginRespuesta = self.client.post("/login", &payload).await?;
        tracing::debug!(usuario_id = res.usuario_id, "logged in");
        Ok(res)
    }

    /// Creates an account. A password shorter than [`MIN_PASSWORD_LEN`]
    /// is reported as a missing `contraseña`, like a blank one.
    pub async fn register(&self, usuario: &UsuarioNuevo) -> Result<Usuario> {
        let mut missing = Vec::new();
        require(&mut missing, "nombre_usuario", &usuario.nombre_usuario);
        require(&mut missing, "correo", &usuario.correo);
        if usuario.contrasena.chars().count() < MIN_PASSWORD_LEN {
            missing.push("contraseña".to_string());
        }
        validated(missing)?;

        let created: Usuario = self.client.post("/register", usuario).await?;
        tracing::debug!(usuario_id = created.id, "registered");
        Ok(created)
    }
}

fn require(missing: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        missing.push(name.to_string());
    }
}

fn validated(missing_fields: Vec<String>) -> Result<()> {
    if missing_fields.is_empty() {
        return Ok(());
    }
    tracing::debug!(?missing_fields, "credentials rejected locally");
    Err(SyncError::Validation { missing_fields })
}
