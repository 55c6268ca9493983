// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # OpenTelemetry Integration for RabbitMQ
//!
//! Extracts the upstream trace context carried in AMQP headers and opens a
//! consumer span around each handler invocation.

use lapin::{
    message::Delivery,
    types::{AMQPValue, FieldTable, ShortString},
};
use opentelemetry::{
    global::{BoxedSpan, BoxedTracer},
    propagation::Extractor,
    trace::{SpanKind, Tracer},
    Context,
};
use std::{borrow::Cow, collections::BTreeMap};
use tracing::error;

/// Anything received from the broker that may carry trace headers.
///
/// Implemented for [`Delivery`]; the dispatcher only needs the headers to
/// link the consumer span to the producer's trace.
pub trait TraceCarrier {
    fn headers(&self) -> Option<&FieldTable>;
}

impl TraceCarrier for Delivery {
    fn headers(&self) -> Option<&FieldTable> {
        self.properties.headers().as_ref()
    }
}

/// Read-only view over AMQP headers for the OpenTelemetry propagator.
pub(crate) struct RabbitMQTracePropagator<'a> {
    headers: &'a BTreeMap<ShortString, AMQPValue>,
}

impl<'a> RabbitMQTracePropagator<'a> {
    pub(crate) fn new(headers: &'a BTreeMap<ShortString, AMQPValue>) -> Self {
        Self { headers }
    }
}

impl Extractor for RabbitMQTracePropagator<'_> {
    /// Gets a trace context value from the headers. Only long-string values
    /// holding valid UTF-8 are considered.
    fn get(&self, key: &str) -> Option<&str> {
        self.headers.get(key).and_then(|header_value| {
            if let AMQPValue::LongString(header_value) = header_value {
                std::str::from_utf8(header_value.as_bytes())
                    .map_err(|e| error!("Error decoding header value {:?}", e))
                    .ok()
            } else {
                None
            }
        })
    }

    fn keys(&self) -> Vec<&str> {
        self.headers.keys().map(|header| header.as_str()).collect()
    }
}

/// Creates a consumer span for one delivery.
///
/// The parent context is extracted from `headers` with the globally
/// registered text-map propagator; without headers the span starts a new trace.
///
/// # Returns
/// A tuple containing the extracted context and the new span
pub fn new_span(
    headers: Option<&FieldTable>,
    tracer: &BoxedTracer,
    name: &str,
) -> (Context, BoxedSpan) {
    let empty = BTreeMap::new();
    let inner = headers.map(|h| h.inner()).unwrap_or(&empty);

    let ctx = opentelemetry::global::get_text_map_propagator(|propagator| {
        propagator.extract(&RabbitMQTracePropagator::new(inner))
    });

    let span = tracer
        .span_builder(Cow::from(name.to_owned()))
        .with_kind(SpanKind::Consumer)
        .start_with_context(tracer, &ctx);

    (ctx, span)
}
