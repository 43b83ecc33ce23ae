use chrono::{DateTime, Duration, SubsecRound, Utc};

/// Provider timestamp format: UTC, whole seconds, trailing `Z`.
const PROVIDER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// The `[now - minutes, now]` interval a scan covers, truncated to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ScanWindow {
    #[must_use]
    pub fn ending_at(now: DateTime<Utc>, minutes: u32) -> Self {
        let end = now.trunc_subsecs(0);
        let start = end - Duration::minutes(i64::from(minutes));
        Self { start, end }
    }

    #[must_use]
    pub fn from_param(&self) -> String {
        format_provider_time(self.start)
    }

    #[must_use]
    pub fn to_param(&self) -> String {
        format_provider_time(self.end)
    }
}

fn format_provider_time(ts: DateTime<Utc>) -> String {
    ts.format(PROVIDER_TIME_FORMAT).to_string()
}
