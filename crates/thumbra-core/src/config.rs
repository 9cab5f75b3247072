//! Configuration module
//!
//! Everything is read from the environment once at startup and stays fixed
//! for the process lifetime. The tunable surface is deliberately small: the
//! thumbnail size set, the accepted source types, and the storage backend.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::key::DerivativeSpec;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_THUMBNAIL_SIZES: &str = "100,500,1000";
const DEFAULT_ALLOWED_CONTENT_TYPES: &str = "image/jpeg,image/png";
const DEFAULT_ALLOWED_EXTENSIONS: &str = "jpg,jpeg,png";

/// Storage backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// How eligibility rule 1 classifies incoming objects. Chosen once per
/// deployment; the two variants are never mixed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityMode {
    /// Match the notification's media type against the allowed set.
    ContentType,
    /// Match the key's filename suffix, for deployments whose notifications
    /// omit content type.
    Extension,
}

impl FromStr for EligibilityMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "content-type" | "content_type" => Ok(EligibilityMode::ContentType),
            "extension" => Ok(EligibilityMode::Extension),
            _ => Err(anyhow::anyhow!("Invalid eligibility mode: {}", s)),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub storage_backend: StorageBackend,
    pub s3_region: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, Spaces, ...).
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
    /// Ordered thumbnail sizes, applied as square NxN. Order only affects
    /// log readability; each size is processed independently.
    pub thumbnail_sizes: Vec<u32>,
    pub eligibility_mode: EligibilityMode,
    pub allowed_content_types: Vec<String>,
    pub allowed_extensions: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .parse()?;

        let thumbnail_sizes = parse_sizes(
            &env::var("THUMBNAIL_SIZES").unwrap_or_else(|_| DEFAULT_THUMBNAIL_SIZES.to_string()),
        )?;

        let eligibility_mode = env::var("ELIGIBILITY_MODE")
            .unwrap_or_else(|_| "content-type".to_string())
            .parse()?;

        // Trimmed but not case-folded: the suffix check is case-sensitive.
        let allowed_content_types = parse_list(
            &env::var("ALLOWED_CONTENT_TYPES")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_CONTENT_TYPES.to_string()),
        );
        let allowed_extensions = parse_list(
            &env::var("ALLOWED_EXTENSIONS")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_EXTENSIONS.to_string()),
        );

        Ok(Config {
            server_port,
            environment,
            storage_backend,
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            thumbnail_sizes,
            eligibility_mode,
            allowed_content_types,
            allowed_extensions,
        })
    }

    /// The configured size set as square derivative specs, in order.
    pub fn derivative_specs(&self) -> Vec<DerivativeSpec> {
        self.thumbnail_sizes
            .iter()
            .map(|&s| DerivativeSpec::square(s))
            .collect()
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_sizes(raw: &str) -> Result<Vec<u32>, anyhow::Error> {
    let sizes = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            let size: u32 = s
                .parse()
                .map_err(|_| anyhow::anyhow!("THUMBNAIL_SIZES entry {:?} is not a number", s))?;
            if size == 0 {
                return Err(anyhow::anyhow!("THUMBNAIL_SIZES entries must be positive"));
            }
            Ok(size)
        })
        .collect::<Result<Vec<u32>, anyhow::Error>>()?;

    if sizes.is_empty() {
        return Err(anyhow::anyhow!("THUMBNAIL_SIZES must name at least one size"));
    }
    Ok(sizes)
}
