// src/config.rs
use crate::constants::{
    RESPONSE_CACHE_CAPACITY, WALL_API_BASE_URL, WALL_API_REQUESTS_PER_SECOND, WALL_API_VERSION,
};
use crate::error::AppError;
use crate::types::{AccessToken, BaseUrl, RequestRate};
use clap::Parser;
use std::path::PathBuf;

/// Environment variable holding the wall API access token.
pub const ACCESS_TOKEN_ENV: &str = "VK_ACCESS_TOKEN";

/// Environment variable holding the channel gateway base URL.
pub const CHANNEL_GATEWAY_ENV: &str = "MEMDEX_CHANNEL_GATEWAY";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Wall group short name to harvest (repeatable)
    #[arg(short = 'g', long = "group")]
    pub groups: Vec<String>,

    /// Channel to harvest (repeatable)
    #[arg(short = 'c', long = "channel")]
    pub channels: Vec<String>,

    /// Write the table to this file instead of stdout
    #[arg(short, long)]
    pub output_file: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Wall API version sent with every request
    #[arg(long, default_value = WALL_API_VERSION)]
    pub api_version: String,

    /// Maximum wall API requests per second
    #[arg(long, default_value_t = WALL_API_REQUESTS_PER_SECOND)]
    pub rate_limit: f64,

    /// Base URL of the wall API
    #[arg(long, default_value = WALL_API_BASE_URL)]
    pub wall_api_url: String,

    /// Base URL of the channel message gateway (or MEMDEX_CHANNEL_GATEWAY)
    #[arg(long)]
    pub channel_gateway_url: Option<String>,

    /// Disable the per-run response cache
    #[arg(long, default_value_t = false)]
    pub no_cache: bool,

    /// Hide progress bars
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

/// Everything a wall client needs, validated.
#[derive(Debug, Clone)]
pub struct WallApiConfig {
    pub access_token: AccessToken,
    pub api_version: String,
    pub base_url: BaseUrl,
    pub rate: RequestRate,
    /// Responses remembered per client; zero disables the cache.
    pub cache_capacity: usize,
}

impl WallApiConfig {
    /// Configuration with default version, endpoint and rate.
    pub fn with_token(access_token: AccessToken) -> Result<Self, AppError> {
        Ok(Self {
            access_token,
            api_version: WALL_API_VERSION.to_string(),
            base_url: BaseUrl::parse(WALL_API_BASE_URL)?,
            rate: RequestRate::new(WALL_API_REQUESTS_PER_SECOND)?,
            cache_capacity: RESPONSE_CACHE_CAPACITY,
        })
    }
}

/// Resolved harvest configuration, passed explicitly to every client.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub groups: Vec<String>,
    pub channels: Vec<String>,
    /// Present whenever `groups` is non-empty.
    pub wall: Option<WallApiConfig>,
    /// Present whenever `channels` is non-empty.
    pub channel_gateway: Option<BaseUrl>,
    pub output_file: Option<PathBuf>,
    pub verbose: bool,
    pub show_progress: bool,
}

impl HarvestConfig {
    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |name| std::env::var(name).ok())
    }

    /// Like [`HarvestConfig::resolve`], reading variables through `env`.
    pub fn resolve_with<F>(cli: CommandLineInput, env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let groups = clean_names(cli.groups);
        let channels = clean_names(cli.channels);

        if groups.is_empty() && channels.is_empty() {
            return Err(AppError::MissingConfiguration(
                "nothing to harvest: pass at least one --group or --channel".to_string(),
            ));
        }

        let wall = if groups.is_empty() {
            None
        } else {
            let token = env(ACCESS_TOKEN_ENV).ok_or_else(|| {
                AppError::MissingConfiguration(format!(
                    "{} environment variable not set",
                    ACCESS_TOKEN_ENV
                ))
            })?;
            Some(WallApiConfig {
                access_token: AccessToken::new(token)?,
                api_version: cli.api_version,
                base_url: BaseUrl::parse(&cli.wall_api_url)?,
                rate: RequestRate::new(cli.rate_limit)?,
                cache_capacity: if cli.no_cache {
                    0
                } else {
                    RESPONSE_CACHE_CAPACITY
                },
            })
        };

        let channel_gateway = if channels.is_empty() {
            None
        } else {
            let url = cli
                .channel_gateway_url
                .or_else(|| env(CHANNEL_GATEWAY_ENV))
                .ok_or_else(|| {
                    AppError::MissingConfiguration(format!(
                        "channels need --channel-gateway-url or {}",
                        CHANNEL_GATEWAY_ENV
                    ))
                })?;
            Some(BaseUrl::parse(&url)?)
        };

        Ok(HarvestConfig {
            groups,
            channels,
            wall,
            channel_gateway,
            output_file: cli.output_file.map(PathBuf::from),
            verbose: cli.verbose,
            show_progress: !cli.no_progress,
        })
    }
}

/// Trims names and drops empty and repeated ones, keeping first occurrence.
fn clean_names(names: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim().to_string();
        if !name.is_empty() && !cleaned.contains(&name) {
            cleaned.push(name);
        }
    }
    cleaned
}
