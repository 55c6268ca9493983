// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Broker Configuration
//!
//! Connection, queue and dispatch settings used by
//! [`MessageBroker::from_configs`](crate::broker::MessageBroker::from_configs).
//! The struct deserializes from any serde source; [`RabbitMQConfigs::from_env`]
//! reads it from `RABBITMQ_*` environment variables.

use config::{Config, ConfigError, Environment};
use lapin::uri::{AMQPAuthority, AMQPScheme, AMQPUri, AMQPUserInfo};
use serde::Deserialize;

/// Prefix of the environment variables read by [`RabbitMQConfigs::from_env`].
pub const ENV_PREFIX: &str = "RABBITMQ";

/// Settings required to build a [`MessageBroker`](crate::broker::MessageBroker).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RabbitMQConfigs {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Empty means the default vhost `/`.
    pub vhost: String,
    /// Used as the AMQP connection name, shown in the management UI.
    pub app_name: String,
    pub queue: String,
    /// Maximum number of handlers running at once. `None` means unbounded.
    pub concurrency: Option<usize>,
}

impl Default for RabbitMQConfigs {
    fn default() -> Self {
        RabbitMQConfigs {
            host: "localhost".to_owned(),
            port: 5672,
            user: "guest".to_owned(),
            password: "guest".to_owned(),
            vhost: String::new(),
            app_name: "rabbit".to_owned(),
            queue: String::new(),
            concurrency: None,
        }
    }
}

impl RabbitMQConfigs {
    /// Builds the AMQP URI from the connection settings.
    ///
    /// The parts are kept as structured fields, so credentials and vhost may
    /// contain reserved characters such as `@`, `/` or `:`.
    pub fn amqp_uri(&self) -> AMQPUri {
        let vhost = if self.vhost.is_empty() {
            "/".to_owned()
        } else {
            self.vhost.clone()
        };

        AMQPUri {
            scheme: AMQPScheme::AMQP,
            authority: AMQPAuthority {
                userinfo: AMQPUserInfo {
                    username: self.user.clone(),
                    password: self.password.clone(),
                },
                host: self.host.clone(),
                port: self.port,
            },
            vhost,
            query: Default::default(),
        }
    }

    /// Reads the configuration from the environment.
    ///
    /// Every field maps to `RABBITMQ_<FIELD>`: `RABBITMQ_HOST`,
    /// `RABBITMQ_PORT`, `RABBITMQ_USER`, `RABBITMQ_PASSWORD`,
    /// `RABBITMQ_VHOST`, `RABBITMQ_APP_NAME`, `RABBITMQ_QUEUE` and
    /// `RABBITMQ_CONCURRENCY`. Unset variables keep their default; a value
    /// that does not parse is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    pub(crate) fn load(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}
