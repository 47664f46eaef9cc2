use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::presenter::MessageKind;

/// One booking attempt. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingRequest {
    pub movie_id: String,
    pub showtime: String,
    /// Always greater than zero once validated.
    pub seats: u32,
}

/// Why a booking attempt stopped short of completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidSeats,
    SeatsUnavailable,
    BookingFailed,
}

/// Terminal state of the booking workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOutcome {
    /// Tickets are booked. `email_sent` reports the confirmation email but
    /// never changes the outcome.
    Completed { email_sent: bool },
    Rejected(RejectReason),
}

impl BookingOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, BookingOutcome::Completed { .. })
    }

    /// Short heading shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            BookingOutcome::Completed { .. } => "Booking Successful",
            BookingOutcome::Rejected(RejectReason::InvalidSeats) => "Invalid Seats",
            BookingOutcome::Rejected(_) => "Booking Failed",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            BookingOutcome::Completed { .. } => "Tickets booked successfully!",
            BookingOutcome::Rejected(RejectReason::InvalidSeats) => "Invalid number of seats.",
            BookingOutcome::Rejected(RejectReason::SeatsUnavailable) => "Seats not available.",
            BookingOutcome::Rejected(RejectReason::BookingFailed) => {
                "Booking failed. Please try again later."
            }
        }
    }

    /// Every outcome is informational; only transport-level problems are errors.
    pub fn kind(&self) -> MessageKind {
        MessageKind::Info
    }
}

/// Write access to the ticketing and email services.
///
/// All three calls return `false` on any failure, including transport errors.
/// For `check_availability` this makes "no seats" and "network down"
/// indistinguishable to callers.
#[async_trait]
pub trait TicketingService: Send + Sync {
    async fn check_availability(&self, request: &BookingRequest) -> bool;

    /// True only when the ticketing API reports a `"success"` status.
    async fn make_booking(&self, request: &BookingRequest) -> bool;

    /// True on any successful HTTP response from the email service.
    async fn send_confirmation_email(&self, request: &BookingRequest) -> bool;
}
