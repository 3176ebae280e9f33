mod fields;
mod render;

use std::time::Duration;

use api_types::{categoria::TipoCategoria, transaccion::TipoTransaccion, usuario::UsuarioNuevo};
use isay_sync::{
    AuthApi, CategoryCatalog, DashboardApi, FocusEvent, FocusRefreshPolicy,
    FormSessionController, HttpResourceClient, MIN_PASSWORD_LEN, ProfileController, ResourceId,
    ResourceKind, ResourceListController, SessionStore, SyncError,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    config::{AppConfig, Command, Recurso, TipoCategoriaArg},
    error::{AppError, Result},
};

pub struct App {
    client: HttpResourceClient,
    session: SessionStore,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = HttpResourceClient::with_timeout(
            &config.base_url,
            Duration::from_millis(config.timeout_ms),
        )?;
        let session = SessionStore::load(&config.session_path)?;
        tracing::debug!(
            base_url = client.base_url(),
            logged_in = session.is_logged_in(),
            "client ready"
        );
        Ok(Self { client, session })
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { correo, password } => self.login(&correo, &password).await,
            Command::Logout => {
                self.session.logout()?;
                println!("Sesión cerrada.");
                Ok(())
            }
            Command::Register {
                nombre_usuario,
                correo,
                password,
                telefono,
            } => {
                let usuario = AuthApi::new(self.client.clone())
                    .register(&UsuarioNuevo {
                        nombre_usuario,
                        correo,
                        contrasena: password,
                        telefono,
                    })
                    .await?;
                println!(
                    "Usuario {} registrado (id {}). Ya puedes iniciar sesión.",
                    usuario.nombre_usuario, usuario.id
                );
                Ok(())
            }
            Command::List { recurso } => {
                let list = self.list(recurso)?;
                list.load().await?;
                println!("{}", render::resource_lines(&list.items()));
                Ok(())
            }
            Command::Add { recurso, campos } => self.add(recurso, &campos).await,
            Command::Edit {
                recurso,
                id,
                campos,
            } => self.edit(recurso, ResourceId::from(id.as_str()), &campos).await,
            Command::Delete { recurso, id } => {
                let list = self.list(recurso)?;
                let id = ResourceId::from(id.as_str());
                list.delete(&id).await?;
                println!("Registro {id} eliminado.");
                list.load().await?;
                println!("{}", render::resource_lines(&list.items()));
                Ok(())
            }
            Command::Categorias { tipo } => {
                let mut catalog = CategoryCatalog::new(self.client.clone());
                catalog.load(tipo.map(TipoCategoria::from)).await?;
                for categoria in catalog.all() {
                    println!("{}", render::categoria_line(categoria));
                }
                Ok(())
            }
            Command::Perfil { campos } => self.perfil(&campos).await,
            Command::Resumen { financiero } => self.resumen(financiero).await,
            Command::Watch { recurso } => self.watch(recurso).await,
        }
    }

    fn usuario_id(&self) -> Result<i64> {
        self.session.usuario_id().ok_or(AppError::NotLoggedIn)
    }

    /// The list a screen for `recurso` owns, scoped to the logged-in user.
    fn list(&self, recurso: Recurso) -> Result<ResourceListController> {
        let usuario_id = self.usuario_id()?;
        Ok(ResourceListController::new(recurso.kind(), self.client.clone())
            .with_scope("usuario_id", usuario_id))
    }

    async fn login(&mut self, correo: &str, password: &str) -> Result<()> {
        let res = AuthApi::new(self.client.clone())
            .login(correo, password)
            .await?;
        self.session.login(res.usuario_id)?;
        let nombre = res.usuario.as_deref().unwrap_or(correo);
        println!("Bienvenido, {nombre}.");
        Ok(())
    }

    async fn add(&self, recurso: Recurso, campos: &[String]) -> Result<()> {
        let usuario_id = self.usuario_id()?;
        let list = self.list(recurso)?;
        let mut form = FormSessionController::new(recurso.kind())
            .with_fixed_field("usuario_id", usuario_id);

        form.begin_create();
        for (name, value) in fields::parse_assignments(campos)? {
            form.set_field(&name, value);
        }
        let created = form.submit(&list).await?;
        println!("Creado: {}", render::resource_line(&created));

        list.load().await?;
        println!("{}", render::resource_lines(&list.items()));
        Ok(())
    }

    async fn edit(&self, recurso: Recurso, id: ResourceId, campos: &[String]) -> Result<()> {
        let list = self.list(recurso)?;
        list.load().await?;
        let item = list.find(&id).ok_or(AppError::NotFound(id))?;

        let mut form = FormSessionController::new(recurso.kind());
        form.begin_edit(&item)?;
        for (name, value) in fields::parse_assignments(campos)? {
            form.set_field(&name, value);
        }
        if !form.is_dirty() {
            tracing::info!(resource = recurso.kind().name, "saving without changes");
        }
        let updated = form.submit(&list).await?;
        println!("Actualizado: {}", render::resource_line(&updated));

        list.load().await?;
        println!("{}", render::resource_lines(&list.items()));
        Ok(())
    }

    async fn perfil(&self, campos: &[String]) -> Result<()> {
        let profile = ProfileController::new(self.client.clone(), self.usuario_id()?);
        let loaded = profile.load().await?;
        if campos.is_empty() {
            println!("{}", render::resource_line(&loaded));
            return Ok(());
        }

        let mut form = FormSessionController::new(&ResourceKind::USUARIOS);
        form.begin_edit(&loaded)?;
        for (name, value) in fields::parse_assignments(campos)? {
            form.set_field(&name, value);
        }
        let updated = form.submit(&profile).await?;
        println!("Perfil actualizado: {}", render::resource_line(&updated));
        Ok(())
    }

    async fn resumen(&self, financiero: bool) -> Result<()> {
        let usuario_id = self.usuario_id()?;
        let dashboard = DashboardApi::new(self.client.clone());

        let resumen = if financiero {
            dashboard.resumen_financiero(usuario_id).await?
        } else {
            dashboard.resumen(usuario_id).await?
        };
        println!("{}", render::resumen(&resumen));

        let gastos = dashboard
            .categorias(TipoTransaccion::Egreso, usuario_id)
            .await?;
        if !gastos.is_empty() {
            println!("Egresos por categoría:");
            println!("{}", render::categoria_totales(&gastos));
        }

        // Older servers do not expose the fixed-payment alert.
        match dashboard.balance_alerta(usuario_id).await {
            Ok(alerta) => {
                if let Some(line) = render::balance_alerta(&alerta) {
                    println!("{line}");
                }
            }
            Err(err) => tracing::debug!("balance alert unavailable: {err}"),
        }
        Ok(())
    }

    /// Each stdin line is the screen being shown again. `blur` hides it,
    /// `salir` (or end of input) closes it.
    async fn watch(&self, recurso: Recurso) -> Result<()> {
        let list = self.list(recurso)?;
        let policy = FocusRefreshPolicy::new(list.clone());
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut event = Some(FocusEvent::Focused);

        loop {
            if let Some(handle) = event.and_then(|event| policy.on_event(event)) {
                match handle.await {
                    Ok(Ok(())) => println!("{}", render::resource_lines(&list.items())),
                    Ok(Err(err)) => eprintln!("{}", message_for_error(&AppError::Sync(err))),
                    Err(err) => tracing::warn!("refresh task failed: {err}"),
                }
            }

            let Some(line) = lines.next_line().await? else {
                break;
            };
            event = match line.trim() {
                "salir" => break,
                "blur" => Some(FocusEvent::Blurred),
                _ => Some(FocusEvent::Focused),
            };
        }
        Ok(())
    }
}

impl From<TipoCategoriaArg> for TipoCategoria {
    fn from(value: TipoCategoriaArg) -> Self {
        match value {
            TipoCategoriaArg::Ingreso => Self::Ingreso,
            TipoCategoriaArg::Gasto => Self::Gasto,
        }
    }
}

pub fn message_for_error(err: &AppError) -> String {
    match err {
        AppError::Sync(err) => sync_message(err),
        AppError::NotLoggedIn => "No hay una sesión iniciada. Usa `isay login`.".to_string(),
        AppError::NotFound(id) => format!("No existe el registro {id}."),
        AppError::Field(raw) => format!("Campo inválido `{raw}`, se espera campo=valor."),
        AppError::Config(err) => format!("Error de configuración: {err}"),
        AppError::Io(err) => format!("Error de archivo: {err}"),
    }
}

fn sync_message(err: &SyncError) -> String {
    match err {
        SyncError::Validation { missing_fields } => {
            let mut message =
                format!("Faltan campos obligatorios: {}.", missing_fields.join(", "));
            if missing_fields.iter().any(|f| f == "contraseña") {
                message.push_str(&format!(
                    " La contraseña necesita al menos {MIN_PASSWORD_LEN} caracteres."
                ));
            }
            message
        }
        SyncError::Http { status: 401, .. } => "Correo o contraseña incorrectos.".to_string(),
        SyncError::Http { status, .. } => match err.detail() {
            Some(detail) => format!("Error del servidor ({status}): {detail}"),
            None => format!("Error del servidor ({status})."),
        },
        SyncError::Network { timeout: true, .. } => {
            "El servidor no respondió a tiempo.".to_string()
        }
        SyncError::Network { message, .. } => format!("Servidor no disponible: {message}"),
        SyncError::Decode(message) => format!("Respuesta inesperada del servidor: {message}"),
        SyncError::InvalidBaseUrl(url) => format!("URL del servidor inválida: {url}"),
        SyncError::Unsupported(what) => format!("Operación no permitida: {what}"),
    }
}
