// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Commands sent to the timeline service are optimistic: when they fail the
//! engine logs and moves on, and the next snapshot reconciles. These types are
//! what the seams report and what construction-time helpers return.

use thiserror::Error;

/// Any error surfaced by the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The timeline service failed a request.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The key-value store failed a request.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Engine configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A wire payload was not valid JSON for its shape.
    #[error("invalid wire payload: {0}")]
    Wire(#[from] serde_json::Error),
    /// A clock value could not be parsed.
    #[error(transparent)]
    Clock(#[from] ClockParseError),
    /// The service sent an event this engine does not know.
    #[error("unknown service event '{0}'")]
    UnknownEvent(String),
}

/// Errors reported by a [`TimelineService`](crate::service::TimelineService).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service could not be reached.
    #[error("timeline service is unavailable: {0}")]
    Unavailable(String),
    /// The service refused a command.
    #[error("'{command}' was rejected: {reason}")]
    Rejected {
        /// Command name as it appears on the wire.
        command: &'static str,
        /// Reason given by the service.
        reason: String,
    },
}

/// Errors reported by a [`KeyValueStore`](crate::storage::KeyValueStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// A scope was requested without one of its identifiers.
    #[error("{0} is required to open a location scope")]
    MissingScope(&'static str),
    /// The backing store failed.
    #[error("storage backend failed: {0}")]
    Backend(String),
    /// A stored value could not be encoded or decoded.
    #[error("stored value for '{key}' is invalid: {source}")]
    Value {
        /// Key that was read or written.
        key: String,
        /// Underlying encoding error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML text did not parse.
    #[error("failed to parse engine config: {source}")]
    ParseToml {
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
    /// A value parsed but makes no sense.
    #[error("engine config field '{field}' is invalid: {reason}")]
    Invalid {
        /// Dotted field path.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// A clock string that is not `HH:mm` or `HH:mm:ss`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockParseError {
    /// Not shaped like a clock value.
    #[error("'{0}' is not an HH:mm:ss time")]
    Malformed(String),
    /// Shaped correctly but past the end of the day.
    #[error("'{0}' is outside 00:00:00..=24:00:00")]
    OutOfRange(String),
}
