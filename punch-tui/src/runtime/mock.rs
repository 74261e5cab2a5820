//! Scriptable connector and service for driver tests.

use async_trait::async_trait;
use punch_client::{
    CallError, ClockDirection, ClockReply, ClockService, ConnectError, Connector, MemberId,
    Record, RecordRange,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use time::macros::datetime;
use tokio::sync::Notify;

#[derive(Clone, Default)]
pub struct MockService {
    records: Vec<Record>,
    fail: bool,
    gate: Option<Arc<Notify>>,
    clock_calls: Arc<Mutex<Vec<(MemberId, ClockDirection)>>>,
    record_calls: Arc<Mutex<Vec<(MemberId, RecordRange)>>>,
}

impl MockService {
    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    /// Every call fails with a transport error.
    pub fn failing_calls(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Clock calls block until [`MockService::release_clock`].
    pub fn with_clock_delay(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    pub fn release_clock(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn clock_calls(&self) -> Vec<(MemberId, ClockDirection)> {
        self.clock_calls.lock().unwrap().clone()
    }

    pub fn record_calls(&self) -> Vec<(MemberId, RecordRange)> {
        self.record_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClockService for MockService {
    async fn clock(
        &self,
        member: MemberId,
        direction: ClockDirection,
    ) -> Result<ClockReply, CallError> {
        self.clock_calls.lock().unwrap().push((member, direction));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(CallError::Transport("mock failure".to_string()));
        }
        let result = match direction {
            ClockDirection::ClockIn => "上班打卡成功",
            ClockDirection::ClockOut => "下班打卡成功",
        };
        Ok(ClockReply {
            result: result.to_string(),
            time: datetime!(2024-01-01 01:00:00 UTC),
        })
    }

    async fn records(
        &self,
        member: MemberId,
        range: RecordRange,
    ) -> Result<Vec<Record>, CallError> {
        self.record_calls.lock().unwrap().push((member, range));
        if self.fail {
            return Err(CallError::Transport("mock failure".to_string()));
        }
        Ok(self.records.clone())
    }
}

#[derive(Clone)]
pub struct MockConnector {
    service: MockService,
    failures_left: Arc<AtomicUsize>,
    attempts: Arc<AtomicUsize>,
}

impl MockConnector {
    pub fn succeeding(service: MockService) -> Self {
        Self::failing_then_succeeding(0, service)
    }

    pub fn failing_then_succeeding(failures: usize, service: MockService) -> Self {
        Self {
            service,
            failures_left: Arc::new(AtomicUsize::new(failures)),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Service = MockService;

    async fn connect(&self) -> Result<MockService, ConnectError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(ConnectError::Timeout("mock:0".to_string()));
        }
        Ok(self.service.clone())
    }
}
