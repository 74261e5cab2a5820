use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{ClockDirection, ClockReply, MemberId, Record, RecordRange};

#[derive(Debug, Serialize, Deserialize)]
pub struct MemberDto {
    pub id: i32,
}

impl From<MemberId> for MemberDto {
    fn from(member: MemberId) -> Self {
        Self { id: member.0 }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClockRequest {
    pub member: MemberDto,
    #[serde(rename = "type")]
    pub direction: ClockDirection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClockResponse {
    pub result: String,
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}

impl From<ClockResponse> for ClockReply {
    fn from(response: ClockResponse) -> Self {
        Self {
            result: response.result,
            time: response.time,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordsRequest {
    pub member: MemberDto,
    pub range: RecordRange,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordDto {
    pub date: String,
    #[serde(rename = "in")]
    pub clock_in: String,
    #[serde(rename = "out")]
    pub clock_out: String,
}

impl From<RecordDto> for Record {
    fn from(dto: RecordDto) -> Self {
        Self {
            date: dto.date,
            clock_in: dto.clock_in,
            clock_out: dto.clock_out,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RecordsResponse {
    #[serde(default)]
    pub records: Vec<RecordDto>,
}
