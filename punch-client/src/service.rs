//! Trait definitions for the time-clock service.
//!
//! The kiosk runtime only talks to these traits, so it can run against the
//! HTTP client, an in-process backend or a test double.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{CallError, ConnectError};
use crate::types::{ClockDirection, ClockReply, MemberId, Record, RecordRange};

/// Remote calls offered by the time-clock service.
#[async_trait]
pub trait ClockService: Send + Sync + 'static {
    /// Submit a clock-in or clock-out for `member`.
    async fn clock(
        &self,
        member: MemberId,
        direction: ClockDirection,
    ) -> Result<ClockReply, CallError>;

    /// Fetch the clock history of `member` for `range`.
    async fn records(&self, member: MemberId, range: RecordRange)
        -> Result<Vec<Record>, CallError>;
}

/// Establishes a [`ClockService`] connection.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Service: ClockService;

    async fn connect(&self) -> Result<Self::Service, ConnectError>;
}

/// An optional, shareable connection to a [`ClockService`].
///
/// Starts empty, is filled once a connect attempt succeeds and is released by
/// [`Connection::close`]. Closing an empty connection does nothing.
#[derive(Debug)]
pub struct Connection<S> {
    service: Option<Arc<S>>,
}

impl<S: ClockService> Connection<S> {
    pub fn new() -> Self {
        Self { service: None }
    }

    pub fn establish(&mut self, service: S) {
        self.service = Some(Arc::new(service));
    }

    pub fn is_connected(&self) -> bool {
        self.service.is_some()
    }

    /// A handle for a background call. `None` until connected.
    pub fn service(&self) -> Option<Arc<S>> {
        self.service.clone()
    }

    /// Release the connection. Returns `true` if something was closed.
    pub fn close(&mut self) -> bool {
        match self.service.take() {
            Some(_) => {
                tracing::info!("client disconnected");
                true
            }
            None => false,
        }
    }
}

impl<S: ClockService> Default for Connection<S> {
    fn default() -> Self {
        Self::new()
    }
}
