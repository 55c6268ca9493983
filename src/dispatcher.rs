// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # RabbitMQ Message Dispatcher
//!
//! This module pulls deliveries from a consumer stream and hands each one to
//! the registered [`ConsumerHandler`] on a task of its own.
//!
//! The loop never awaits a handler. When a concurrency limit is configured a
//! delivery is only spawned once a permit is free, otherwise the fan-out is
//! unbounded. Every spawned task is tracked so the caller can wait for the
//! in-flight handlers before releasing the channel they ack on.

use crate::{
    handler::ConsumerHandler,
    otel::{self, TraceCarrier},
};
use futures_util::{Stream, StreamExt};
use opentelemetry::{
    global::{self, BoxedTracer},
    trace::TraceContextExt,
};
use std::{marker::PhantomData, sync::Arc};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, warn};

/// Why the dispatch loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEnd {
    /// The shutdown token was cancelled.
    Cancelled,
    /// The delivery stream ended, e.g. the broker closed the channel.
    Exhausted,
}

pub(crate) struct Dispatcher<H, D> {
    queue: String,
    handler: Arc<H>,
    limiter: Option<Arc<Semaphore>>,
    tracker: TaskTracker,
    tracer: BoxedTracer,
    _delivery: PhantomData<fn(D)>,
}

impl<H, D> Dispatcher<H, D>
where
    H: ConsumerHandler<D>,
    D: TraceCarrier + Send + 'static,
{
    /// Creates a dispatcher for `queue`. A `concurrency` of zero is treated as one.
    pub(crate) fn new(queue: &str, handler: H, concurrency: Option<usize>) -> Self {
        Dispatcher {
            queue: queue.to_owned(),
            handler: Arc::new(handler),
            limiter: concurrency.map(|limit| Arc::new(Semaphore::new(limit.max(1)))),
            tracker: TaskTracker::new(),
            tracer: global::tracer("amqp consumer"),
            _delivery: PhantomData,
        }
    }

    /// Dispatches deliveries until `shutdown` is cancelled or the stream ends.
    ///
    /// Error items yielded by the stream are logged and skipped.
    pub(crate) async fn run<S>(&self, mut deliveries: S, shutdown: &CancellationToken) -> DispatchEnd
    where
        S: Stream<Item = Result<D, lapin::Error>> + Unpin,
    {
        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown.cancelled() => return DispatchEnd::Cancelled,
                next = deliveries.next() => next,
            };

            let delivery = match next {
                None => {
                    debug!(queue = %self.queue, "delivery stream ended");
                    return DispatchEnd::Exhausted;
                }
                Some(Err(err)) => {
                    warn!(error = err.to_string(), "errors consume msg");
                    continue;
                }
                Some(Ok(delivery)) => delivery,
            };

            let permit = match &self.limiter {
                None => None,
                Some(limiter) => tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => {
                        debug!("shutdown while waiting for a free handler, delivery left unacked");
                        return DispatchEnd::Cancelled;
                    }
                    // the semaphore is owned here and never closed
                    permit = limiter.clone().acquire_owned() => permit.ok(),
                },
            };

            self.spawn(delivery, permit);
        }
    }

    fn spawn(&self, delivery: D, permit: Option<OwnedSemaphorePermit>) {
        let (ctx, span) = otel::new_span(delivery.headers(), &self.tracer, &self.queue);
        let ctx = ctx.with_span(span);
        let handler = self.handler.clone();

        self.tracker.spawn(async move {
            let _permit = permit;
            handler.exec(&ctx, delivery).await;
            ctx.span().end();
        });
    }

    /// Waits for every handler spawned so far to finish.
    pub(crate) async fn drain(&self) {
        self.tracker.close();
        debug!(in_flight = self.tracker.len(), "waiting for in-flight handlers");
        self.tracker.wait().await;
    }
}
