//! The single status line shared by every board action.
//!
//! Each action takes a [`Ticket`] before it suspends on the network. Tickets
//! are handed out in increasing order, and the slot only accepts a message
//! whose ticket is at least as new as the one it last accepted, so a slow
//! response can never replace the outcome of a request issued after it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct StatusSlot {
    issued: u64,
    accepted: Option<Ticket>,
    shown: Option<(Ticket, StatusMessage)>,
}

impl StatusSlot {
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Shows `message` unless a newer request already reported. Returns
    /// whether the message was accepted.
    pub fn publish(&mut self, ticket: Ticket, message: StatusMessage) -> bool {
        if matches!(self.accepted, Some(accepted) if ticket < accepted) {
            return false;
        }
        self.accepted = Some(ticket);
        self.shown = Some((ticket, message));
        true
    }

    /// Hides the message published under `ticket`, if it is still the one on
    /// screen.
    pub fn hide(&mut self, ticket: Ticket) -> bool {
        match &self.shown {
            Some((shown, _)) if *shown == ticket => {
                self.shown = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.shown.as_ref().map(|(_, message)| message)
    }
}
