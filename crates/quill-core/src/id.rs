//! Entry id generation
//!
//! The store never invents ids itself; it asks an `IdGenerator`. This keeps
//! tests deterministic without mocking the wall clock.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source of fresh entry ids
pub trait IdGenerator: Send {
    /// Produce the next id
    fn next_id(&mut self) -> String;
}

/// Random UUID v4 ids (the default)
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Millisecond timestamp plus a random suffix: `entry-<millis>-<n>`
///
/// The suffix separates entries created within the same millisecond.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampIds;

impl IdGenerator for TimestampIds {
    fn next_id(&mut self) -> String {
        let millis = Utc::now().timestamp_millis();
        let suffix = Uuid::new_v4().as_u128() % 100_000;
        format!("entry-{}-{}", millis, suffix)
    }
}

/// Monotonic counter ids: `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("entry")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Configurable choice of id generator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Uuid,
    Timestamp,
}

impl IdStrategy {
    /// Build the generator for this strategy
    pub fn generator(self) -> Box<dyn IdGenerator> {
        match self {
            IdStrategy::Uuid => Box::new(UuidIds),
            IdStrategy::Timestamp => Box::new(TimestampIds),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Uuid => write!(f, "uuid"),
            IdStrategy::Timestamp => write!(f, "timestamp"),
        }
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uuid" => Ok(IdStrategy::Uuid),
            "timestamp" => Ok(IdStrategy::Timestamp),
            other => Err(format!(
                "Unknown id strategy '{}'. Use 'uuid' or 'timestamp'.",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::new("t");
        assert_eq!(ids.next_id(), "t-1");
        assert_eq!(ids.next_id(), "t-2");
        assert_eq!(ids.next_id(), "t-3");
    }

    #[test]
    fn test_uuid_ids_parse() {
        let id = UuidIds.next_id();
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_timestamp_ids_shape() {
        let id = TimestampIds.next_id();
        let parts: Vec<_> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "entry");
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(parts[2].parse::<u32>().unwrap() < 100_000);
    }

    #[test]
    fn test_uuid_ids_distinct_in_burst() {
        let mut generator = IdStrategy::Uuid.generator();
        let ids: HashSet<_> = (0..500).map(|_| generator.next_id()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("uuid".parse::<IdStrategy>().unwrap(), IdStrategy::Uuid);
        assert_eq!(
            " Timestamp ".parse::<IdStrategy>().unwrap(),
            IdStrategy::Timestamp
        );
        assert!("counter".parse::<IdStrategy>().is_err());
        assert_eq!(IdStrategy::Timestamp.to_string(), "timestamp");
    }
}
