use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::pipeline::PipelineConfig;

/// Offset of the civil calendar used for date keys (UTC+9).
const DATE_KEY_OFFSET_SECS: i32 = 9 * 3600;

/// Everything a stage needs to know about the current run.
///
/// Built once at process start and passed by reference into every stage so
/// the date and configuration can be injected in tests.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub date: NaiveDate,
    pub now: DateTime<Utc>,
    pub config: PipelineConfig,
    pub data_dir: PathBuf,
}

impl RunContext {
    /// Context for `now`, with the date key taken from the UTC+9 calendar.
    #[must_use]
    pub fn new(now: DateTime<Utc>, config: PipelineConfig, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            date: civil_date(now),
            now,
            config,
            data_dir: data_dir.into(),
        }
    }

    /// Replace the date key, e.g. to re-run a past day.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// The `YYYY-MM-DD` key used in every file name.
    #[must_use]
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    #[must_use]
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    #[must_use]
    pub fn digest_dir(&self) -> PathBuf {
        self.data_dir.join("digest")
    }

    /// `digest/{date}.md`
    #[must_use]
    pub fn digest_path(&self) -> PathBuf {
        self.digest_dir().join(format!("{}.md", self.date_key()))
    }

    /// `digest/{date}.summary.md`
    #[must_use]
    pub fn summary_path(&self) -> PathBuf {
        self.digest_dir().join(format!("{}.summary.md", self.date_key()))
    }

    /// `now` rendered as `YYYY-MM-DD HH:MM KST`.
    #[must_use]
    pub fn local_timestamp(&self) -> String {
        self.now
            .with_timezone(&date_key_offset())
            .format("%Y-%m-%d %H:%M KST")
            .to_string()
    }
}

/// Civil date of `now` in the fixed UTC+9 calendar.
#[must_use]
pub fn civil_date(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&date_key_offset()).date_naive()
}

fn date_key_offset() -> FixedOffset {
    FixedOffset::east_opt(DATE_KEY_OFFSET_SECS).expect("UTC+9 is within the valid offset range")
}
