//! In-process stand-in for the time-clock service, used by `punch-tui dev`.

use async_trait::async_trait;
use punch_client::{
    CallError, ClockDirection, ClockReply, ClockService, ConnectError, Connector, MemberId,
    Record, RecordRange,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use time::{macros::format_description, Date, OffsetDateTime, Time, UtcOffset};

/// Days of history a "last seven days" query covers, today included.
const WEEK_DAYS: i64 = 7;

#[derive(Debug, Clone, Default)]
struct DevDay {
    clock_in: Option<Time>,
    clock_out: Option<Time>,
}

#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<BTreeMap<(MemberId, Date), DevDay>>>,
    offset: UtcOffset,
    latency: Duration,
}

impl DevBackend {
    pub fn new(offset: UtcOffset, latency: Duration) -> Self {
        Self {
            store: Arc::new(Mutex::new(BTreeMap::new())),
            offset,
            latency,
        }
    }

    /// Seed a few workdays of history for `member`, ending yesterday.
    pub fn seeded(offset: UtcOffset, latency: Duration, member: MemberId) -> Self {
        let backend = Self::new(offset, latency);
        let today = OffsetDateTime::now_utc().to_offset(offset).date();
        {
            let mut store = backend.store.lock().expect("dev store lock poisoned");
            for days_ago in 1..=4 {
                let date = today - time::Duration::days(days_ago);
                store.insert(
                    (member, date),
                    DevDay {
                        clock_in: Time::from_hms(9, days_ago as u8 * 3, 0).ok(),
                        clock_out: Time::from_hms(18, days_ago as u8 * 5, 0).ok(),
                    },
                );
            }
        }
        backend
    }

    fn punch(&self, member: MemberId, direction: ClockDirection, at: OffsetDateTime) {
        let local = at.to_offset(self.offset);
        let mut store = self.store.lock().expect("dev store lock poisoned");
        let day = store.entry((member, local.date())).or_default();
        match direction {
            ClockDirection::ClockIn => {
                day.clock_in.get_or_insert(local.time());
            }
            ClockDirection::ClockOut => day.clock_out = Some(local.time()),
        }
    }

    fn history(&self, member: MemberId, from: Date, to: Date) -> Vec<Record> {
        let store = self.store.lock().expect("dev store lock poisoned");
        store
            .range((member, from)..=(member, to))
            .map(|((_, date), day)| {
                Record::new(
                    format_date(*date),
                    format_time(day.clock_in),
                    format_time(day.clock_out),
                )
            })
            .collect()
    }
}

fn format_date(date: Date) -> String {
    date.format(format_description!("[year]/[month]/[day]"))
        .unwrap_or_else(|_| date.to_string())
}

fn format_time(time: Option<Time>) -> String {
    time.and_then(|t| t.format(format_description!("[hour]:[minute]")).ok())
        .unwrap_or_else(|| "--:--".to_string())
}

#[async_trait]
impl ClockService for DevBackend {
    async fn clock(
        &self,
        member: MemberId,
        direction: ClockDirection,
    ) -> Result<ClockReply, CallError> {
        tokio::time::sleep(self.latency).await;
        let now = OffsetDateTime::now_utc();
        self.punch(member, direction, now);
        let result = match direction {
            ClockDirection::ClockIn => "上班打卡成功",
            ClockDirection::ClockOut => "下班打卡成功",
        };
        Ok(ClockReply {
            result: result.to_string(),
            time: now,
        })
    }

    async fn records(
        &self,
        member: MemberId,
        range: RecordRange,
    ) -> Result<Vec<Record>, CallError> {
        tokio::time::sleep(self.latency).await;
        let today = OffsetDateTime::now_utc().to_offset(self.offset).date();
        let from = match range {
            RecordRange::Today => today,
            RecordRange::LastSevenDays => today - time::Duration::days(WEEK_DAYS - 1),
        };
        Ok(self.history(member, from, today))
    }
}

#[async_trait]
impl Connector for DevBackend {
    type Service = DevBackend;

    async fn connect(&self) -> Result<DevBackend, ConnectError> {
        tokio::time::sleep(self.latency).await;
        tracing::info!("connected to dev backend");
        Ok(self.clone())
    }
}
