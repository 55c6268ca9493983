// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

mod channel;
mod dispatcher;
mod otel;
mod queue;

pub mod broker;
pub mod configs;
pub mod errors;
pub mod handler;

pub use lapin;
pub use otel::TraceCarrier;
pub use tokio_util::sync::CancellationToken;
