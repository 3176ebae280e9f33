use clap::{Parser, Subcommand, ValueEnum};
use isay_sync::ResourceKind;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/isay.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub session_path: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_ms: 5000,
            session_path: ".isay/session.json".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "isay", about = "Cliente de finanzas personales", disable_version_flag = true)]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override request timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start a session on this device.
    Login {
        #[arg(long)]
        correo: String,
        #[arg(long, env = "ISAY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Register {
        #[arg(long)]
        nombre_usuario: String,
        #[arg(long)]
        correo: String,
        #[arg(long, env = "ISAY_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        telefono: Option<String>,
    },
    List {
        recurso: Recurso,
    },
    /// Create a record from `campo=valor` pairs.
    Add {
        recurso: Recurso,
        campos: Vec<String>,
    },
    /// Change some fields of an existing record.
    Edit {
        recurso: Recurso,
        id: String,
        campos: Vec<String>,
    },
    Delete {
        recurso: Recurso,
        id: String,
    },
    Categorias {
        #[arg(long)]
        tipo: Option<TipoCategoriaArg>,
    },
    /// Show the profile, or update it when `campo=valor` pairs are given.
    Perfil {
        campos: Vec<String>,
    },
    /// Income, expenses and balance. `--financiero` asks for the extended
    /// summary that includes savings.
    Resumen {
        #[arg(long)]
        financiero: bool,
    },
    /// Reload the list on every line read from stdin (`blur` hides it, `salir` quits).
    Watch {
        recurso: Recurso,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Recurso {
    Transacciones,
    Presupuestos,
    PagosFijos,
}

impl Recurso {
    pub fn kind(self) -> &'static ResourceKind {
        match self {
            Self::Transacciones => &ResourceKind::TRANSACCIONES,
            Self::Presupuestos => &ResourceKind::PRESUPUESTOS,
            Self::PagosFijos => &ResourceKind::PAGOS_FIJOS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TipoCategoriaArg {
    Ingreso,
    Gasto,
}

pub fn load() -> Result<(AppConfig, Command)> {
    from_args(Args::parse())
}

fn from_args(args: Args) -> Result<(AppConfig, Command)> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("ISAY"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        settings.timeout_ms = timeout_ms;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok((settings, args.command))
}
