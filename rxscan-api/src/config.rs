//! rxscan-api configuration
//!
//! CLI flags and environment variables are merged by clap; the TOML file
//! and compiled defaults fill whatever is left.

use clap::Parser;
use rxscan_common::config::{resolve, resolve_optional, TomlConfig, CONFIG_ENV_VAR};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_AWS_REGION: &str = "ap-south-1";
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_NER_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_LOG_FILTER: &str = "rxscan_api=info,tower_http=info";

/// Command-line arguments for rxscan-api
#[derive(Parser, Debug, Default)]
#[command(name = "rxscan-api")]
#[command(about = "Prescription OCR and medication extraction API")]
#[command(version)]
pub struct CliArgs {
    /// Path to the TOML config file
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "RXSCAN_API_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "RXSCAN_API_PORT")]
    pub port: Option<u16>,

    /// AWS region for Textract
    #[arg(long, env = "AWS_REGION")]
    pub aws_region: Option<String>,

    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub aws_access_key_id: Option<String>,

    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub aws_secret_access_key: Option<String>,

    /// General NER inference endpoint
    #[arg(long, env = "RXSCAN_GENERAL_NER_URL")]
    pub general_ner_url: Option<String>,

    /// Biomedical NER inference endpoint
    #[arg(long, env = "RXSCAN_MEDICAL_NER_URL")]
    pub medical_ner_url: Option<String>,

    /// Bearer token for the inference endpoints
    #[arg(long, env = "RXSCAN_NER_TOKEN", hide_env_values = true)]
    pub ner_token: Option<String>,
}

/// Cloud OCR settings
#[derive(Debug, Clone, PartialEq)]
pub struct OcrSettings {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub timeout: Duration,
}

impl OcrSettings {
    /// Both halves of the credential pair are present
    pub fn has_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}

/// NER inference settings
#[derive(Debug, Clone, PartialEq)]
pub struct NerSettings {
    pub general_url: Option<String>,
    pub medical_url: Option<String>,
    pub api_token: Option<String>,
    pub timeout: Duration,
}

/// Fully resolved backend settings
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub ocr: OcrSettings,
    pub ner: NerSettings,
}

impl ApiSettings {
    pub fn resolve(args: &CliArgs, toml: &TomlConfig) -> Self {
        let ocr = OcrSettings {
            region: resolve(
                args.aws_region.clone(),
                toml.ocr.region.clone(),
                DEFAULT_AWS_REGION.to_string(),
            ),
            access_key_id: resolve_optional(
                args.aws_access_key_id.clone(),
                toml.ocr.access_key_id.clone(),
            ),
            secret_access_key: resolve_optional(
                args.aws_secret_access_key.clone(),
                toml.ocr.secret_access_key.clone(),
            ),
            timeout: Duration::from_secs(resolve(
                None,
                toml.ocr.timeout_secs,
                DEFAULT_OCR_TIMEOUT_SECS,
            )),
        };

        let ner = NerSettings {
            general_url: resolve_optional(args.general_ner_url.clone(), toml.ner.general_url.clone()),
            medical_url: resolve_optional(args.medical_ner_url.clone(), toml.ner.medical_url.clone()),
            api_token: resolve_optional(args.ner_token.clone(), toml.ner.api_token.clone()),
            timeout: Duration::from_secs(resolve(
                None,
                toml.ner.timeout_secs,
                DEFAULT_NER_TIMEOUT_SECS,
            )),
        };

        Self {
            host: resolve(args.host.clone(), toml.api.host.clone(), DEFAULT_HOST.to_string()),
            port: resolve(args.port, toml.api.port, DEFAULT_PORT),
            max_upload_bytes: resolve(None, toml.api.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES),
            ocr,
            ner,
        }
    }

    /// Socket address to bind; an unparseable host falls back to all interfaces
    pub fn bind_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.port)))
    }
}
