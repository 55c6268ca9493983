// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Error Types for the Message Broker
//!
//! This module provides the error taxonomy surfaced by [`MessageBroker`](crate::broker::MessageBroker).
//! Each variant maps to exactly one step of the broker lifecycle: dialing,
//! opening the channel, declaring the queue, starting consumption and closing.
//! Errors raised inside a consumer handler are never converted into `AmqpError`.

use thiserror::Error;

/// Represents errors that can occur while talking to the RabbitMQ server.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AmqpError {
    /// Error establishing a connection to the RabbitMQ server
    #[error("failure to connect")]
    ConnectionError,

    /// Error creating a channel from an established connection
    #[error("failure to create a channel")]
    ChannelError,

    /// Error declaring a queue with the given name
    #[error("failure to declare a queue `{0}`")]
    DeclareQueueError(String),

    /// Error binding a consumer to the given queue
    #[error("failure to consume from queue `{0}`")]
    ConsumerError(String),

    /// Error releasing the channel and/or the connection
    #[error("failure to close: {0}")]
    CloseError(String),
}
