use std::env;

use log::*;
use tinkoff_tools::GatewayConfig;
use tpay_engine::PaymentSettings;

const DEFAULT_TPAY_HOST: &str = "127.0.0.1";
const DEFAULT_TPAY_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/tpay_store.db";
const DEFAULT_MAX_DB_CONNECTIONS: u32 = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_db_connections: u32,
    /// Where and how to reach the payment gateway, and the terminal credentials to sign requests with.
    pub gateway: GatewayConfig,
    /// Description, tax regime and public URL used when building payment requests.
    pub payment: PaymentSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_TPAY_HOST.to_string(),
            port: DEFAULT_TPAY_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_db_connections: DEFAULT_MAX_DB_CONNECTIONS,
            gateway: GatewayConfig::default(),
            payment: PaymentSettings::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("TPAY_HOST").ok().unwrap_or_else(|| DEFAULT_TPAY_HOST.into());
        let port = env::var("TPAY_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for TPAY_PORT. {e} Using the default, {DEFAULT_TPAY_PORT}, instead."
                    );
                    DEFAULT_TPAY_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_TPAY_PORT);
        let database_url = env::var("TPAY_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ TPAY_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let gateway = GatewayConfig::new_from_env_or_default();
        let payment = PaymentSettings::new_from_env_or_default();
        Self { host, port, database_url, max_db_connections: DEFAULT_MAX_DB_CONNECTIONS, gateway, payment }
    }
}
