//! Per-region request state

use crate::error::ServiceError;
use crate::messages::Messages;
use log::{debug, warn};
use thiserror::Error;

/// Why a request could not be issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    MissingUpload,
    DescriptionTooShort,
}

/// Error shown in a workflow region.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Caught before any network call.
    #[error("{message}")]
    Validation { kind: ValidationKind, message: String },

    /// Transport failure or non-2xx response.
    #[error("{0}")]
    Remote(String),
}

impl RequestError {
    pub fn validation(kind: ValidationKind, message: &str) -> Self {
        RequestError::Validation {
            kind,
            message: message.to_string(),
        }
    }

    /// Server detail when present, otherwise the localized fallback.
    pub fn from_service(err: &ServiceError, messages: &Messages) -> Self {
        warn!("Request failed: {}", err);
        let message = err.detail().unwrap_or(messages.generic_failure);
        RequestError::Remote(message.to_string())
    }

    pub fn message(&self) -> &str {
        match self {
            RequestError::Validation { message, .. } => message,
            RequestError::Remote(message) => message,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RequestError::Validation { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome<T> {
    /// Nothing issued yet, or cleared by a newer request elsewhere.
    Idle,
    Pending,
    Succeeded(T),
    Failed(RequestError),
}

/// Identifies one issued request. Only the most recent ticket of a region settles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// A request that passed validation, ready to be sent.
#[derive(Debug, Clone)]
pub struct PendingRequest<R> {
    pub ticket: Ticket,
    pub request: R,
}

/// One workflow region: its outcome plus a generation counter so superseded
/// responses are dropped. Last request wins.
#[derive(Debug)]
pub struct Region<T> {
    name: &'static str,
    generation: u64,
    outcome: RequestOutcome<T>,
}

impl<T> Region<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            generation: 0,
            outcome: RequestOutcome::Idle,
        }
    }

    /// Discard prior state and mark a new request in flight.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.outcome = RequestOutcome::Pending;
        Ticket(self.generation)
    }

    /// Record a local failure; any in-flight response becomes stale.
    pub fn fail_local(&mut self, error: RequestError) {
        self.generation += 1;
        self.outcome = RequestOutcome::Failed(error);
    }

    /// Back to idle; any in-flight response becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.outcome = RequestOutcome::Idle;
    }

    /// Apply a response. Returns `false` when the ticket was superseded.
    pub fn settle(&mut self, ticket: Ticket, result: Result<T, RequestError>) -> bool {
        if ticket.0 != self.generation || !self.is_pending() {
            debug!(
                "Dropping stale {} response (ticket {}, current {})",
                self.name, ticket.0, self.generation
            );
            return false;
        }
        self.outcome = match result {
            Ok(value) => RequestOutcome::Succeeded(value),
            Err(error) => RequestOutcome::Failed(error),
        };
        true
    }

    pub fn outcome(&self) -> &RequestOutcome<T> {
        &self.outcome
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.outcome, RequestOutcome::Pending)
    }

    pub fn value(&self) -> Option<&T> {
        match &self.outcome {
            RequestOutcome::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RequestError> {
        match &self.outcome {
            RequestOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }
}
