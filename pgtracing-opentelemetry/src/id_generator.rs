// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Id generation for replayed spans
//!
//! The SDK picks the id of a new span through its [`IdGenerator`], and the generator is only
//! asked for "a new id", with no way of passing the id recorded by postgres. The replayer
//! stores the ids of the record it is about to emit in a [`PendingSpanIds`] slot, and the
//! [`ReplayIdGenerator`] installed in the provider hands them back when the SDK asks.
//!
//! The slot holds a single value: span emission must stay strictly sequential.

use std::{
    fmt::Debug,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use opentelemetry::{SpanId, TraceId};
use opentelemetry_sdk::trace::IdGenerator;

/// Widen a 64 bits trace id to the 128 bits otel address space.
///
/// The id lands in the low-order bytes, the high-order bytes are zeroes.
pub fn widen_trace_id(trace_id: u64) -> TraceId {
    TraceId::from_bytes(u128::from(trace_id).to_be_bytes())
}

pub fn widen_span_id(span_id: u64) -> SpanId {
    SpanId::from_bytes(span_id.to_be_bytes())
}

/// Low 64 bits of a trace id
pub fn narrow_trace_id(trace_id: TraceId) -> u64 {
    u128::from_be_bytes(trace_id.to_bytes()) as u64
}

pub fn narrow_span_id(span_id: SpanId) -> u64 {
    u64::from_be_bytes(span_id.to_bytes())
}

/// Capability handing out the ids of the span being created.
///
/// Implementations return the value most recently set by their owner.
pub trait SpanIdSource: Send + Sync + Debug {
    fn current_trace_id(&self) -> TraceId;

    fn current_span_id(&self) -> SpanId;
}

/// Ids of the next span to be emitted.
///
/// Written by the replayer right before starting a span, read by the [`ReplayIdGenerator`]
/// while the SDK starts it. Both happen on the same thread, one span at a time.
#[derive(Debug, Default)]
pub struct PendingSpanIds {
    trace_id: AtomicU64,
    span_id: AtomicU64,
}

impl PendingSpanIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, trace_id: u64, span_id: u64) {
        self.trace_id.store(trace_id, Ordering::Relaxed);
        self.span_id.store(span_id, Ordering::Relaxed);
    }
}

impl SpanIdSource for PendingSpanIds {
    fn current_trace_id(&self) -> TraceId {
        widen_trace_id(self.trace_id.load(Ordering::Relaxed))
    }

    fn current_span_id(&self) -> SpanId {
        widen_span_id(self.span_id.load(Ordering::Relaxed))
    }
}

/// [`IdGenerator`] returning the ids of a [`SpanIdSource`] instead of random ones.
///
/// Replayed spans always carry a parent context, so the SDK only asks for a trace id when the
/// recorded parent id is 0. The source trace id is returned in that case, keeping the
/// recorded trace id of root spans.
#[derive(Debug)]
pub struct ReplayIdGenerator<S> {
    source: Arc<S>,
}

impl<S: SpanIdSource> ReplayIdGenerator<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

impl<S: SpanIdSource> IdGenerator for ReplayIdGenerator<S> {
    fn new_trace_id(&self) -> TraceId {
        self.source.current_trace_id()
    }

    fn new_span_id(&self) -> SpanId {
        self.source.current_span_id()
    }
}
