use time::{format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime, UtcOffset};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]/[month]/[day] [hour]:[minute]:[second]");

/// The local UTC offset, falling back to UTC when it cannot be determined.
///
/// Must be called before any other thread is spawned; the offset lookup
/// refuses to run in a multi-threaded process on some platforms.
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// `YYYY/MM/DD HH:MM:SS` in the given offset.
///
/// Times that cannot be shifted into `offset` without leaving the supported
/// date range are shown in UTC instead.
pub fn format_timestamp(dt: OffsetDateTime, offset: UtcOffset) -> String {
    let local = dt
        .checked_to_offset(offset)
        .or_else(|| dt.checked_to_offset(UtcOffset::UTC))
        .unwrap_or(dt);
    local
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| local.to_string())
}
