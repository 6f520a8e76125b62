//! Configuration: schema, file discovery, `${VAR}` substitution, environment
//! overlay and provider credential resolution.

pub mod credentials;
pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    credentials::{MailCredentials, Provider, TwilioCredentials, WhatsAppCredentials},
    loader::{clear_config_dir, config_dir, discover_and_load, load_config, set_config_dir},
    schema::SwitchboardConfig,
};
