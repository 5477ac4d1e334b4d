//! rxscan-ui configuration
//!
//! Same resolution order as the backend: CLI, then environment, then the
//! `[ui]`/`[smtp]` sections of the TOML file, then compiled defaults.

use clap::Parser;
use rxscan_common::config::{resolve, resolve_optional, TomlConfig, CONFIG_ENV_VAR};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILTER: &str = "rxscan_ui=info,tower_http=info";

/// Command-line arguments for rxscan-ui
#[derive(Parser, Debug, Default)]
#[command(name = "rxscan-ui")]
#[command(about = "Prescription intelligence web gateway")]
#[command(version)]
pub struct CliArgs {
    /// Path to the TOML config file
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "RXSCAN_UI_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "RXSCAN_UI_PORT")]
    pub port: Option<u16>,

    /// Base URL of rxscan-api
    #[arg(long, env = "BACKEND_API_URL")]
    pub backend_url: Option<String>,

    #[arg(long, env = "SMTP_SERVER")]
    pub smtp_server: Option<String>,

    #[arg(long, env = "SMTP_PORT")]
    pub smtp_port: Option<u16>,

    /// Sender address (also the SMTP login)
    #[arg(long, env = "SENDER_EMAIL")]
    pub sender_email: Option<String>,

    #[arg(long, env = "SENDER_PASSWORD", hide_env_values = true)]
    pub sender_password: Option<String>,
}

/// SMTP notification settings
#[derive(Debug, Clone, PartialEq)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub timeout: Duration,
}

/// Fully resolved gateway settings
#[derive(Debug, Clone, PartialEq)]
pub struct UiSettings {
    pub host: String,
    pub port: u16,
    pub backend_url: String,
    pub backend_timeout: Duration,
    pub max_upload_bytes: usize,
    pub smtp: SmtpSettings,
}

impl UiSettings {
    pub fn resolve(args: &CliArgs, toml: &TomlConfig) -> Self {
        let backend_url = resolve(
            args.backend_url.clone(),
            toml.ui.backend_url.clone(),
            DEFAULT_BACKEND_URL.to_string(),
        );

        let smtp = SmtpSettings {
            server: resolve(
                args.smtp_server.clone(),
                toml.smtp.server.clone(),
                DEFAULT_SMTP_SERVER.to_string(),
            ),
            port: resolve(args.smtp_port, toml.smtp.port, DEFAULT_SMTP_PORT),
            sender_email: resolve_optional(args.sender_email.clone(), toml.smtp.sender_email.clone()),
            sender_password: resolve_optional(
                args.sender_password.clone(),
                toml.smtp.sender_password.clone(),
            ),
            timeout: Duration::from_secs(resolve(
                None,
                toml.smtp.timeout_secs,
                DEFAULT_SMTP_TIMEOUT_SECS,
            )),
        };

        Self {
            host: resolve(args.host.clone(), toml.ui.host.clone(), DEFAULT_HOST.to_string()),
            port: resolve(args.port, toml.ui.port, DEFAULT_PORT),
            backend_url: backend_url.trim_end_matches('/').to_string(),
            backend_timeout: Duration::from_secs(resolve(
                None,
                toml.ui.backend_timeout_secs,
                DEFAULT_BACKEND_TIMEOUT_SECS,
            )),
            max_upload_bytes: resolve(None, toml.ui.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES),
            smtp,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: &[&str] = &[
        CONFIG_ENV_VAR,
        "RXSCAN_UI_HOST",
        "RXSCAN_UI_PORT",
        "BACKEND_API_URL",
        "SMTP_SERVER",
        "SMTP_PORT",
        "SENDER_EMAIL",
        "SENDER_PASSWORD",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let settings = UiSettings::resolve(&CliArgs::default(), &TomlConfig::default());

        assert_eq!(settings.port, 3000);
        assert_eq!(settings.backend_url, "http://localhost:5000");
        assert_eq!(settings.backend_timeout, Duration::from_secs(300));
        assert_eq!(settings.smtp.server, "smtp.gmail.com");
        assert_eq!(settings.smtp.port, 587);
        assert_eq!(settings.smtp.sender_email, None);
        assert_eq!(settings.smtp.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_backend_url_trailing_slash_trimmed() {
        let args = CliArgs {
            backend_url: Some("http://api.internal:5000/".to_string()),
            ..Default::default()
        };
        let settings = UiSettings::resolve(&args, &TomlConfig::default());
        assert_eq!(settings.backend_url, "http://api.internal:5000");
    }

    #[test]
    fn test_toml_smtp_section() {
        let toml: TomlConfig = toml::from_str(
            r#"
            [smtp]
            server = "mail.clinic.example"
            port = 2525
            sender_email = "alerts@clinic.example"
            "#,
        )
        .unwrap();

        let settings = UiSettings::resolve(&CliArgs::default(), &toml);
        assert_eq!(settings.smtp.server, "mail.clinic.example");
        assert_eq!(settings.smtp.port, 2525);
        assert_eq!(settings.smtp.sender_email.as_deref(), Some("alerts@clinic.example"));
        assert_eq!(settings.smtp.sender_password, None);
    }

    #[test]
    #[serial]
    fn test_env_vars_are_read() {
        clear_env();
        std::env::set_var("BACKEND_API_URL", "http://backend:5000");
        std::env::set_var("SMTP_PORT", "465");

        let args = CliArgs::try_parse_from(["rxscan-ui"]).unwrap();
        let settings = UiSettings::resolve(&args, &TomlConfig::default());

        assert_eq!(settings.backend_url, "http://backend:5000");
        assert_eq!(settings.smtp.port, 465);
        clear_env();
    }
}
