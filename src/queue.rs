// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Queue Declaration for RabbitMQ
//!
//! This module provides the queue definition builder and the declaration step
//! performed once when a [`MessageBroker`](crate::broker::MessageBroker) is built.

use crate::errors::AmqpError;
use lapin::{options::QueueDeclareOptions, types::FieldTable, Channel, Queue};
use tracing::{debug, error};

/// Definition of a RabbitMQ queue with its declaration flags.
///
/// This struct implements the builder pattern. Every flag starts out `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct QueueDefinition {
    name: String,
    durable: bool,
    no_wait: bool,
}

impl QueueDefinition {
    /// Creates a new queue definition with the given name.
    pub(crate) fn new(name: &str) -> QueueDefinition {
        QueueDefinition {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    /// The definition used by the message broker: durable, shared between
    /// connections, kept after the last consumer leaves, declared without
    /// waiting for the server's confirmation.
    pub(crate) fn listener(name: &str) -> QueueDefinition {
        QueueDefinition::new(name).durable().no_wait()
    }

    /// Makes the queue durable, so it survives a broker restart.
    pub(crate) fn durable(mut self) -> Self {
        self.durable = true;
        self
    }

    /// Does not wait for the server to confirm the declaration.
    ///
    /// The caller is then never told whether a queue of the same name
    /// already existed with different properties.
    pub(crate) fn no_wait(mut self) -> Self {
        self.no_wait = true;
        self
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Never exclusive, never auto-deleted, never passive.
    pub(crate) fn options(&self) -> QueueDeclareOptions {
        QueueDeclareOptions {
            passive: false,
            durable: self.durable,
            exclusive: false,
            auto_delete: false,
            nowait: self.no_wait,
        }
    }

    /// Declares the queue on the given channel.
    ///
    /// # Returns
    /// The broker's view of the queue, or `DeclareQueueError` naming the queue
    pub(crate) async fn declare(&self, channel: &Channel) -> Result<Queue, AmqpError> {
        debug!("creating queue: {}", self.name);

        match channel
            .queue_declare(&self.name, self.options(), FieldTable::default())
            .await
        {
            Err(err) => {
                error!(
                    error = err.to_string(),
                    name = %self.name,
                    "error to declare the queue"
                );
                Err(AmqpError::DeclareQueueError(self.name.clone()))
            }
            Ok(queue) => {
                debug!("queue: {} was created", self.name);
                Ok(queue)
            }
        }
    }
}
