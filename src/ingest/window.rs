use chrono::{DateTime, FixedOffset};

/// Bounds on a video's actual start time. Both ends are inclusive and optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_before: Option<DateTime<FixedOffset>>,
    pub start_after: Option<DateTime<FixedOffset>>,
}

impl TimeWindow {
    pub fn new(
        start_before: Option<DateTime<FixedOffset>>,
        start_after: Option<DateTime<FixedOffset>>,
    ) -> Self {
        Self {
            start_before,
            start_after,
        }
    }

    pub fn contains(&self, start: &DateTime<FixedOffset>) -> bool {
        if matches!(self.start_before, Some(before) if *start > before) {
            return false;
        }
        if matches!(self.start_after, Some(after) if *start < after) {
            return false;
        }
        true
    }
}
