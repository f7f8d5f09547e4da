//! Page-level interaction state machine.
//!
//! Phases: `Idle → Submitting → (Success | Empty | Error)`; any input edit
//! returns to `Idle`. A submit is split in two so the session is not locked
//! while the matcher runs: `begin_submit` raises the flag and hands out a
//! ticket, `finish_submit` applies the outcome only if that ticket is still
//! current. `abort_submit` clears the flag for a submit that never finished.

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::matching::resolver::no_matches_message;
use crate::models::role::MatchRecord;

pub const EMPTY_ROLE_MESSAGE: &str = "Please enter your current job role.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Submitting,
    Success,
    Empty,
    Error,
}

/// Identifies one in-flight submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub role: String,
    seq: u64,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubmitStart {
    /// The matcher should be called with `ticket.role`.
    Started(SubmitTicket),
    /// Nothing to resolve; the validation error is already set.
    Rejected,
    /// Another submit is still running.
    InFlight,
}

#[derive(Debug, Clone)]
pub struct PageState {
    pub query: String,
    pub selected_role: Option<String>,
    pub results: Option<Vec<MatchRecord>>,
    pub error: Option<String>,
    pub submitting: bool,
    settled: Phase,
    submit_seq: u64,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            query: String::new(),
            selected_role: None,
            results: None,
            error: None,
            submitting: false,
            settled: Phase::Idle,
            submit_seq: 0,
        }
    }
}

impl PageState {
    pub fn phase(&self) -> Phase {
        if self.submitting {
            Phase::Submitting
        } else {
            self.settled
        }
    }

    /// Free-text edit. Drops any explicit selection and prior outcome;
    /// a submit still in flight is discarded when it lands.
    pub fn edit_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.selected_role = None;
        self.reset_outcome();
    }

    pub fn choose_suggestion(&mut self, suggestion: impl Into<String>) {
        let suggestion = suggestion.into();
        self.query = suggestion.clone();
        self.selected_role = Some(suggestion);
        self.reset_outcome();
    }

    /// The explicit selection if any, else the trimmed query.
    pub fn resolved_role(&self) -> String {
        match &self.selected_role {
            Some(role) if !role.is_empty() => role.clone(),
            _ => self.query.trim().to_string(),
        }
    }

    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.submitting {
            return SubmitStart::InFlight;
        }
        self.reset_outcome();

        let role = self.resolved_role();
        if role.is_empty() {
            self.error = Some(EMPTY_ROLE_MESSAGE.to_string());
            self.settled = Phase::Error;
            return SubmitStart::Rejected;
        }

        self.submit_seq += 1;
        self.submitting = true;
        SubmitStart::Started(SubmitTicket {
            role,
            seq: self.submit_seq,
        })
    }

    /// Applies the matcher outcome. Returns false, leaving the page alone,
    /// when the ticket was superseded by an edit or aborted.
    pub fn finish_submit(
        &mut self,
        ticket: &SubmitTicket,
        outcome: Result<Vec<MatchRecord>, AppError>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(role = %ticket.role, "Discarding stale submit outcome");
            return false;
        }
        self.submitting = false;

        match outcome {
            Ok(records) if records.is_empty() => {
                self.error = Some(no_matches_message());
                self.settled = Phase::Empty;
            }
            Ok(records) => {
                self.results = Some(records);
                self.settled = Phase::Success;
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(if message.trim().is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_string()
                } else {
                    message
                });
                self.settled = Phase::Error;
            }
        }

        info!(role = %ticket.role, phase = ?self.settled, "Submit finished");
        true
    }

    /// Clears the flag for a submit whose outcome will never arrive.
    pub fn abort_submit(&mut self, ticket: &SubmitTicket) {
        if self.is_current(ticket) {
            self.submitting = false;
        }
    }

    fn is_current(&self, ticket: &SubmitTicket) -> bool {
        self.submitting && self.submit_seq == ticket.seq
    }

    fn reset_outcome(&mut self) {
        self.results = None;
        self.error = None;
        self.submitting = false;
        self.settled = Phase::Idle;
    }
}
