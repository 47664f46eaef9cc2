use maestro_core::{
    booking::{BookingOutcome, BookingRequest, RejectReason, TicketingService},
    validation::parse_seats,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Raw user input for one booking attempt; seats are validated by the workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingForm {
    pub movie_id: String,
    pub showtime: String,
    pub seats: String,
}

/// Steps of a single booking pass. Nothing is persisted between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStage {
    Validating,
    CheckingAvailability,
    Booking,
    NotifyingEmail,
    Completed,
    Rejected,
}

/// Sequences the ticketing calls for one booking: validate seats, check
/// availability, book, then send the confirmation email.
///
/// A failed check stops before booking and a failed booking stops before the
/// email. Email failure is reported but never undoes a booking. There is no
/// reservation between the availability check and the booking call.
pub struct BookingWorkflow<'a, T: TicketingService + ?Sized> {
    ticketing: &'a T,
}

impl<'a, T: TicketingService + ?Sized> BookingWorkflow<'a, T> {
    pub fn new(ticketing: &'a T) -> Self {
        Self { ticketing }
    }

    #[instrument(skip_all, fields(movie_id = %form.movie_id, showtime = %form.showtime))]
    pub async fn book(&self, form: &BookingForm) -> BookingOutcome {
        enter(BookingStage::Validating);
        let seats = match parse_seats(&form.seats) {
            Ok(seats) => seats,
            Err(err) => {
                warn!("{err}");
                return reject(RejectReason::InvalidSeats);
            }
        };
        let request = BookingRequest {
            movie_id: form.movie_id.clone(),
            showtime: form.showtime.clone(),
            seats,
        };

        enter(BookingStage::CheckingAvailability);
        if !self.ticketing.check_availability(&request).await {
            return reject(RejectReason::SeatsUnavailable);
        }

        enter(BookingStage::Booking);
        if !self.ticketing.make_booking(&request).await {
            return reject(RejectReason::BookingFailed);
        }

        enter(BookingStage::NotifyingEmail);
        let email_sent = self.ticketing.send_confirmation_email(&request).await;
        if !email_sent {
            warn!("booking kept although the confirmation email failed");
        }

        enter(BookingStage::Completed);
        info!(seats, "tickets booked");
        BookingOutcome::Completed { email_sent }
    }
}

fn enter(stage: BookingStage) {
    debug!(?stage, "booking stage");
}

fn reject(reason: RejectReason) -> BookingOutcome {
    enter(BookingStage::Rejected);
    info!(?reason, "booking rejected");
    BookingOutcome::Rejected(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{Call, FakeTicketing};

    fn form(seats: &str) -> BookingForm {
        BookingForm {
            movie_id: "m-1".into(),
            showtime: "18:00".into(),
            seats: seats.into(),
        }
    }

    #[tokio::test]
    async fn happy_path_calls_all_services_in_order() {
        let ticketing = FakeTicketing::new(true, true, true);
        let outcome = BookingWorkflow::new(&ticketing).book(&form("2")).await;

        assert_eq!(outcome, BookingOutcome::Completed { email_sent: true });
        assert_eq!(
            ticketing.calls(),
            vec![Call::CheckAvailability, Call::MakeBooking, Call::SendEmail]
        );
        assert_eq!(ticketing.last_request().map(|r| r.seats), Some(2));
    }

    #[tokio::test]
    async fn invalid_seats_reject_without_network_calls() {
        for seats in ["0", "-1", "abc", ""] {
            let ticketing = FakeTicketing::new(true, true, true);
            let outcome = BookingWorkflow::new(&ticketing).book(&form(seats)).await;
            assert_eq!(outcome, BookingOutcome::Rejected(RejectReason::InvalidSeats));
            assert!(ticketing.calls().is_empty(), "seats {seats:?}");
        }
    }

    #[tokio::test]
    async fn unavailable_seats_never_book() {
        let ticketing = FakeTicketing::new(false, true, true);
        let outcome = BookingWorkflow::new(&ticketing).book(&form("3")).await;

        assert_eq!(
            outcome,
            BookingOutcome::Rejected(RejectReason::SeatsUnavailable)
        );
        assert_eq!(ticketing.calls(), vec![Call::CheckAvailability]);
    }

    #[tokio::test]
    async fn failed_booking_skips_email() {
        let ticketing = FakeTicketing::new(true, false, true);
        let outcome = BookingWorkflow::new(&ticketing).book(&form("1")).await;

        assert_eq!(outcome, BookingOutcome::Rejected(RejectReason::BookingFailed));
        assert_eq!(
            ticketing.calls(),
            vec![Call::CheckAvailability, Call::MakeBooking]
        );
    }

    #[tokio::test]
    async fn email_failure_keeps_booking_completed() {
        let ticketing = FakeTicketing::new(true, true, false);
        let outcome = BookingWorkflow::new(&ticketing).book(&form("4")).await;

        assert_eq!(outcome, BookingOutcome::Completed { email_sent: false });
        assert!(outcome.is_completed());
        assert_eq!(ticketing.calls().len(), 3);
    }
}
