// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Response headers and the `Retry-After` value.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Response headers with case-insensitive lookup.
///
/// Names are stored lowercased; values are kept verbatim. Repeated headers
/// keep every value in receipt order and [`ResponseHeaders::get`] returns the
/// first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: Vec<(String, String)>,
}

impl ResponseHeaders {
    /// Create an empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .push((name.as_ref().to_ascii_lowercase(), value.into()));
    }

    /// Builder form of [`ResponseHeaders::insert`].
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// First value of the named header.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value of the named header.
    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .filter(move |(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// `Location` header, typically a task-monitor URI on 202 responses.
    pub fn location(&self) -> Option<&str> {
        self.get("location").filter(|v| !v.is_empty())
    }

    /// `ETag` header.
    pub fn etag(&self) -> Option<&str> {
        self.get("etag").filter(|v| !v.is_empty())
    }

    /// Parsed `Retry-After` header. Unparseable values are ignored.
    pub fn retry_after(&self) -> Option<RetryAfter> {
        self.get("retry-after").and_then(RetryAfter::parse)
    }

    /// Number of header entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no headers were received.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Value of a `Retry-After` header (RFC 7231 §7.1.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAfter {
    /// `delay-seconds` form.
    Delay(Duration),
    /// `HTTP-date` form.
    At(DateTime<Utc>),
}

// Obsolete HTTP-date forms still accepted by RFC 7231 recipients.
const OBSOLETE_DATE_FORMATS: &[&str] = &[
    "%A, %d-%b-%y %H:%M:%S GMT", // RFC 850
    "%a %b %e %H:%M:%S %Y",      // asctime
];

impl RetryAfter {
    /// Parse either a non-negative integer number of seconds or an HTTP-date.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed
                .parse::<u64>()
                .ok()
                .map(|secs| RetryAfter::Delay(Duration::from_secs(secs)));
        }

        // IMF-fixdate, e.g. "Wed, 21 Oct 2015 07:28:00 GMT"
        if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
            return Some(RetryAfter::At(dt.with_timezone(&Utc)));
        }

        for fmt in OBSOLETE_DATE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Some(RetryAfter::At(Utc.from_utc_datetime(&naive)));
            }
        }

        None
    }

    /// Time to wait from `now` before the next request is permitted.
    ///
    /// Dates in the past yield a zero delay.
    pub fn delay_from(&self, now: DateTime<Utc>) -> Duration {
        match self {
            RetryAfter::Delay(delay) => *delay,
            RetryAfter::At(at) => (*at - now).to_std().unwrap_or(Duration::ZERO),
        }
    }

    /// Time to wait from the current wall-clock time.
    pub fn delay(&self) -> Duration {
        self.delay_from(Utc::now())
    }
}
