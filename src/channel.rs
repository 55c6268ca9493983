// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # AMQP Channel Management
//!
//! This module handles the creation and release of the AMQP connection and of
//! the single channel the broker handle issues its commands on.

use crate::errors::AmqpError;
use lapin::{types::LongString, uri::AMQPUri, Channel, Connection, ConnectionProperties};
use std::sync::Arc;
use tracing::{debug, error};

/// AMQP reply code used when closing a channel or connection on purpose.
pub(crate) const REPLY_SUCCESS: u16 = 200;

/// Dials the RabbitMQ server and opens one channel on the new connection.
///
/// The connection is named `connection_name` so it can be identified in the
/// management UI. If the channel cannot be opened the connection is closed
/// before the error is returned, so a failure never leaves a live connection
/// behind.
///
/// # Parameters
/// * `uri` - Parsed AMQP URI of the server
/// * `connection_name` - Client-provided connection name
///
/// # Returns
/// * `Result<(Arc<Connection>, Arc<Channel>), AmqpError>` -
///   `ConnectionError` when dialing fails, `ChannelError` when the channel
///   cannot be opened.
pub(crate) async fn new_amqp_channel(
    uri: AMQPUri,
    connection_name: &str,
) -> Result<(Arc<Connection>, Arc<Channel>), AmqpError> {
    debug!("creating amqp connection...");
    let options = ConnectionProperties::default()
        .with_connection_name(LongString::from(connection_name.to_owned()));

    let conn = match Connection::connect_uri(uri, options).await {
        Ok(c) => Ok(c),
        Err(err) => {
            error!(error = err.to_string(), "failure to connect");
            Err(AmqpError::ConnectionError)
        }
    }?;
    debug!("amqp connected");

    debug!("creating amqp channel...");
    match conn.create_channel().await {
        Ok(c) => {
            debug!("channel created");
            Ok((Arc::new(conn), Arc::new(c)))
        }
        Err(err) => {
            error!(error = err.to_string(), "error to create the channel");
            close_connection(&conn).await.ok();
            Err(AmqpError::ChannelError)
        }
    }
}

/// Closes the channel unless it is already closed.
pub(crate) async fn close_channel(channel: &Channel) -> Result<(), String> {
    if !channel.status().connected() {
        debug!("channel already closed");
        return Ok(());
    }

    channel
        .close(REPLY_SUCCESS, "OK")
        .await
        .map_err(|err| {
            error!(error = err.to_string(), "failure to close the channel");
            format!("channel: {}", err)
        })
}

/// Closes the connection unless it is already closed.
pub(crate) async fn close_connection(conn: &Connection) -> Result<(), String> {
    if !conn.status().connected() {
        debug!("connection already closed");
        return Ok(());
    }

    conn.close(REPLY_SUCCESS, "OK").await.map_err(|err| {
        error!(error = err.to_string(), "failure to close the connection");
        format!("connection: {}", err)
    })
}
