use chrono::{DateTime, TimeDelta, Utc};

/// The lookup succeeded and had nothing to report.
pub const NOT_AVAILABLE: &str = "N/A";
/// The lookup itself failed.
pub const UNKNOWN: &str = "Unknown";

/// Lifecycle event as returned by the cluster API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRecord {
    pub event_type: Option<String>,
    pub reason: Option<String>,
    pub message: Option<String>,
    pub source: Option<String>,
    pub last_timestamp: Option<DateTime<Utc>>,
    pub event_time: Option<DateTime<Utc>>,
    pub first_timestamp: Option<DateTime<Utc>>,
}

impl EventRecord {
    /// First present of last observed, event time, first observed.
    pub fn resolved_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_timestamp
            .or(self.event_time)
            .or(self.first_timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub event_type: String,
    pub reason: String,
    pub age: TimeDelta,
    pub source: String,
    pub message: String,
}

/// Most recent event for a pod or node. The variant decides the placeholder
/// used by every field, so the five columns never mix outcome classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSummary {
    Found(EventDetails),
    NothingFound,
    LookupFailed,
}

impl EventSummary {
    /// Picks the newest event by resolved timestamp. Events without any
    /// timestamp are ignored; on a tie the earlier event in `events` wins.
    pub fn latest(events: impl IntoIterator<Item = EventRecord>, now: DateTime<Utc>) -> Self {
        let mut newest: Option<(DateTime<Utc>, EventRecord)> = None;
        for event in events {
            let Some(at) = event.resolved_timestamp() else {
                continue;
            };
            match &newest {
                Some((best, _)) if at <= *best => {}
                _ => newest = Some((at, event)),
            }
        }

        match newest {
            Some((at, event)) => EventSummary::Found(EventDetails {
                event_type: event.event_type.unwrap_or_default(),
                reason: event.reason.unwrap_or_default(),
                age: now - at,
                source: event.source.unwrap_or_default(),
                message: event.message.unwrap_or_default(),
            }),
            None => EventSummary::NothingFound,
        }
    }

    /// Field order: type, reason, age, source, message.
    pub fn fields(&self) -> [String; 5] {
        match self {
            EventSummary::Found(details) => [
                details.event_type.clone(),
                details.reason.clone(),
                format_age(details.age),
                details.source.clone(),
                details.message.clone(),
            ],
            EventSummary::NothingFound => std::array::from_fn(|_| NOT_AVAILABLE.to_string()),
            EventSummary::LookupFailed => std::array::from_fn(|_| UNKNOWN.to_string()),
        }
    }
}

/// Renders an age as `H:MM:SS`, prefixed with `N day(s), ` past 24 hours.
/// Sub-second precision is truncated and negative ages (clock skew) clamp to zero.
pub fn format_age(age: TimeDelta) -> String {
    let total = age.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    let clock = format!("{hours}:{minutes:02}:{seconds:02}");
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn event(reason: &str) -> EventRecord {
        EventRecord {
            event_type: Some("Normal".to_string()),
            reason: Some(reason.to_string()),
            message: Some(format!("{reason} happened")),
            source: Some("kubelet".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_timestamp_precedence() {
        let mut record = event("Pulled");
        record.first_timestamp = Some(at(1));
        assert_eq!(record.resolved_timestamp(), Some(at(1)));
        record.event_time = Some(at(2));
        assert_eq!(record.resolved_timestamp(), Some(at(2)));
        record.last_timestamp = Some(at(0));
        assert_eq!(record.resolved_timestamp(), Some(at(0)));
    }

    #[test]
    fn test_latest_picks_newest_resolved_timestamp() {
        let mut old = event("Scheduled");
        old.last_timestamp = Some(at(10));
        let mut micro = event("Started");
        micro.event_time = Some(at(40));
        let mut undated = event("Ghost");
        undated.message = None;

        let summary = EventSummary::latest(vec![old, undated, micro], at(100));
        let EventSummary::Found(details) = summary else {
            panic!("expected an event");
        };
        assert_eq!(details.reason, "Started");
        assert_eq!(format_age(details.age), "0:01:00");
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let mut first = event("First");
        first.last_timestamp = Some(at(5));
        let mut second = event("Second");
        second.last_timestamp = Some(at(5));
        let summary = EventSummary::latest(vec![first, second], at(5));
        assert_eq!(summary.fields()[1], "First");
    }

    #[test]
    fn test_no_dated_events_is_nothing_found() {
        let summary = EventSummary::latest(vec![event("Undated")], at(0));
        assert_eq!(summary, EventSummary::NothingFound);
        assert!(summary.fields().iter().all(|field| field == NOT_AVAILABLE));
    }

    #[test]
    fn test_lookup_failed_fields_are_unknown() {
        assert!(
            EventSummary::LookupFailed
                .fields()
                .iter()
                .all(|field| field == UNKNOWN)
        );
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(TimeDelta::milliseconds(59_999)), "0:00:59");
        assert_eq!(format_age(TimeDelta::seconds(3_725)), "1:02:05");
        assert_eq!(format_age(TimeDelta::seconds(86_400 + 61)), "1 day, 0:01:01");
        assert_eq!(format_age(TimeDelta::seconds(3 * 86_400)), "3 days, 0:00:00");
        assert_eq!(format_age(TimeDelta::seconds(-30)), "0:00:00");
    }
}
