// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Consumer Handlers
//!
//! A handler receives every delivery consumed from the broker's queue, one
//! invocation per delivery, each on its own task.
//!
//! The handler alone decides whether and when a delivery is acked, nacked or
//! rejected. A delivery the handler never acknowledges stays unacked on the
//! broker and is redelivered once the channel closes.

use async_trait::async_trait;
use lapin::message::Delivery;
use opentelemetry::Context;
use std::future::Future;

/// Processes deliveries consumed by a [`MessageBroker`](crate::broker::MessageBroker).
///
/// Implement it on a struct when the handler carries state, or pass an async
/// closure `|ctx: Context, delivery: Delivery| async move { .. }` which
/// implements it through the blanket impl below.
///
/// `ctx` holds the consumer span opened for this delivery, parented to the
/// trace propagated in the delivery headers.
#[async_trait]
pub trait ConsumerHandler<D = Delivery>: Send + Sync + 'static
where
    D: Send + 'static,
{
    async fn exec(&self, ctx: &Context, delivery: D);
}

#[async_trait]
impl<D, F, Fut> ConsumerHandler<D> for F
where
    D: Send + 'static,
    F: Fn(Context, D) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn exec(&self, ctx: &Context, delivery: D) {
        (self)(ctx.clone(), delivery).await
    }
}
