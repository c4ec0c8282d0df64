use std::env;

use cn_common::{helpers::parse_boolean_flag, Secret};
use group_order_engine::LockPolicy;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

const DEFAULT_CN_HOST: &str = "127.0.0.1";
const DEFAULT_CN_PORT: u16 = 8360;
/// How often the background sweep looks for abandoned lobbies, in seconds.
pub const EXPIRY_SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// When true, the creator cannot lock a lobby until every participant has marked their selections ready.
    /// The default mirrors the product behaviour: locking early is allowed, with a warning in the logs.
    pub require_all_ready: bool,
}

#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    /// The shared secret used to verify access-token HMACs. Token issuance lives with the identity service;
    /// this server only verifies.
    pub api_secret: Secret<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CN_HOST.to_string(),
            port: DEFAULT_CN_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            require_all_ready: false,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("CN_HOST").ok().unwrap_or_else(|| DEFAULT_CN_HOST.into());
        let port = env::var("CN_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for CN_PORT. {e} Using the default, {DEFAULT_CN_PORT}, instead.");
                    DEFAULT_CN_PORT
                })
            })
            .unwrap_or(DEFAULT_CN_PORT);
        let database_url = env::var("CN_DATABASE_URL").unwrap_or_else(|_| {
            info!("🪛️ CN_DATABASE_URL is not set. Using the engine default.");
            String::default()
        });
        let require_all_ready = parse_boolean_flag(env::var("CN_REQUIRE_ALL_READY").ok(), false);
        let auth = AuthConfig::from_env_or_default();
        Self { host, port, database_url, auth, require_all_ready }
    }

    pub fn lock_policy(&self) -> LockPolicy {
        if self.require_all_ready {
            LockPolicy::RequireAllReady
        } else {
            LockPolicy::CreatorDiscretion
        }
    }
}

impl AuthConfig {
    pub fn new(secret: &str) -> Self {
        Self { api_secret: Secret::new(secret.to_string()) }
    }

    pub fn from_env_or_default() -> Self {
        match env::var("CN_API_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => Self { api_secret: Secret::new(secret) },
            _ => {
                let secret: String = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect();
                warn!(
                    "🪛️ CN_API_SECRET is not set. A random secret has been generated for this run, which means all \
                     issued tokens will be rejected after a restart. Set CN_API_SECRET in production."
                );
                Self { api_secret: Secret::new(secret) }
            },
        }
    }
}
