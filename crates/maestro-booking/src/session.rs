use maestro_core::{
    booking::{BookingOutcome, TicketingService},
    movies::{ScheduleListing, ScheduleService},
    presenter::{MessageKind, Presenter},
    validation::{parse_date, ValidationError},
};
use tracing::{info, instrument, warn};

use crate::workflow::{BookingForm, BookingWorkflow};

/// Why a schedule search produced nothing to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    InvalidDate(ValidationError),
    /// The request failed or returned no schedules; the API does not let us
    /// tell these apart.
    Unavailable,
}

impl SearchError {
    pub fn title(&self) -> &'static str {
        "Error"
    }

    pub fn message(&self) -> &'static str {
        match self {
            SearchError::InvalidDate(_) => "Invalid date format.",
            SearchError::Unavailable => "Failed to retrieve schedules.",
        }
    }
}

/// How an interactive session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    Cancelled,
    SearchFailed(SearchError),
    NoListings,
    /// The chosen schedule's movie details could not be fetched.
    MissingDetails,
    Finished(BookingOutcome),
}

/// Validates the date, fetches schedules, and joins each with its movie
/// details. Schedules whose details cannot be fetched are left out.
pub async fn search_listings<S: ScheduleService + ?Sized>(
    schedules: &S,
    location: &str,
    date: &str,
) -> Result<Vec<ScheduleListing>, SearchError> {
    collect_listings(schedules, location, date)
        .await
        .map(|found| found.listings)
}

struct Found {
    listings: Vec<ScheduleListing>,
    /// Schedules returned by the API, including those left out.
    total: usize,
}

#[instrument(skip(schedules))]
async fn collect_listings<S: ScheduleService + ?Sized>(
    schedules: &S,
    location: &str,
    date: &str,
) -> Result<Found, SearchError> {
    let date = parse_date(date).map_err(SearchError::InvalidDate)?;
    let fetched = match schedules.get_schedules(location, date).await {
        Some(fetched) if !fetched.is_empty() => fetched,
        _ => return Err(SearchError::Unavailable),
    };

    let total = fetched.len();
    let mut listings = Vec::with_capacity(total);
    for (index, schedule) in fetched.into_iter().enumerate() {
        match schedules.get_movie_details(&schedule.movie_id).await {
            Some(details) => listings.push(ScheduleListing {
                index,
                schedule,
                details,
            }),
            None => warn!(movie_id = %schedule.movie_id, "skipping schedule without details"),
        }
    }
    Ok(Found { listings, total })
}

/// One interactive pass: pick location and date, list schedules, choose a
/// movie and showtime, then book.
pub struct BookingSession<'a, S: ?Sized, T: ?Sized> {
    schedules: &'a S,
    ticketing: &'a T,
    locations: &'a [String],
}

impl<'a, S, T> BookingSession<'a, S, T>
where
    S: ScheduleService + ?Sized,
    T: TicketingService + ?Sized,
{
    pub fn new(schedules: &'a S, ticketing: &'a T, locations: &'a [String]) -> Self {
        Self {
            schedules,
            ticketing,
            locations,
        }
    }

    pub async fn run<P: Presenter + ?Sized>(&self, presenter: &mut P) -> SessionEnd {
        let Some(location) = presenter.select_location(self.locations) else {
            return SessionEnd::Cancelled;
        };
        let Some(date) = presenter.enter_date() else {
            return SessionEnd::Cancelled;
        };

        let Found { listings, total } =
            match collect_listings(self.schedules, &location, &date).await {
                Ok(found) => found,
                Err(err) => {
                    presenter.show_message(MessageKind::Error, err.title(), err.message());
                    return SessionEnd::SearchFailed(err);
                }
            };
        if listings.is_empty() {
            presenter.show_message(
                MessageKind::Info,
                "Movie Schedules",
                "No schedules available.",
            );
            return SessionEnd::NoListings;
        }
        presenter.show_listings(&listings);

        let Some(index) = presenter.choose_schedule_index(total) else {
            return SessionEnd::Cancelled;
        };
        if index >= total {
            info!(index, total, "chosen index out of range");
            return SessionEnd::Cancelled;
        }
        let Some(chosen) = listings.iter().find(|l| l.index == index) else {
            presenter.show_message(
                MessageKind::Error,
                "Error",
                "Failed to retrieve movie details.",
            );
            return SessionEnd::MissingDetails;
        };
        presenter.show_details(&chosen.schedule, &chosen.details);

        let showtime = match presenter.enter_showtime(&chosen.schedule.showtimes) {
            Some(showtime) if !showtime.trim().is_empty() => showtime.trim().to_string(),
            _ => return SessionEnd::Cancelled,
        };
        let Some(seats) = presenter.enter_seat_count() else {
            return SessionEnd::Cancelled;
        };

        let form = BookingForm {
            movie_id: chosen.schedule.movie_id.clone(),
            showtime,
            seats,
        };
        let outcome = BookingWorkflow::new(self.ticketing).book(&form).await;
        presenter.show_message(outcome.kind(), outcome.title(), outcome.message());
        SessionEnd::Finished(outcome)
    }
}

#[cfg(test)]
mod tests {
    use maestro_core::booking::RejectReason;

    use super::*;
    use crate::fakes::{Call, FakeSchedules, FakeTicketing, ScriptedPresenter};

    fn locations() -> Vec<String> {
        vec!["Location 1".into(), "Location 2".into()]
    }

    fn catalog() -> FakeSchedules {
        FakeSchedules::with_movies(&[
            ("m-1", "Heat", &["18:00", "21:00"][..]),
            ("m-2", "Arrival", &["20:15"][..]),
        ])
    }

    #[tokio::test]
    async fn search_joins_schedules_with_details() {
        let schedules = catalog();
        let listings = search_listings(&schedules, "Location 1", "2024-03-05")
            .await
            .expect("listings");
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[1].details.title, "Arrival");
        assert_eq!(listings[1].index, 1);
    }

    #[tokio::test]
    async fn search_skips_schedules_without_details() {
        let mut schedules = catalog();
        schedules.details.remove("m-1");

        let listings = search_listings(&schedules, "Location 1", "2024-03-05")
            .await
            .expect("listings");
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].index, 1);
        assert_eq!(listings[0].schedule.movie_id, "m-2");
    }

    #[tokio::test]
    async fn search_reports_invalid_date_and_failed_fetch() {
        let err = search_listings(&catalog(), "Location 1", "2024-3-5")
            .await
            .expect_err("bad date");
        assert!(matches!(err, SearchError::InvalidDate(_)));

        let err = search_listings(&FakeSchedules::default(), "Location 1", "2024-03-05")
            .await
            .expect_err("no data");
        assert_eq!(err, SearchError::Unavailable);
        assert_eq!(err.message(), "Failed to retrieve schedules.");
    }

    #[tokio::test]
    async fn full_session_books_chosen_showtime() {
        let schedules = catalog();
        let ticketing = FakeTicketing::new(true, true, true);
        let locations = locations();
        let session = BookingSession::new(&schedules, &ticketing, &locations);
        let mut presenter = ScriptedPresenter::answering("2024-03-05", 1, "20:15", "2");

        let end = session.run(&mut presenter).await;

        assert_eq!(
            end,
            SessionEnd::Finished(BookingOutcome::Completed { email_sent: true })
        );
        assert_eq!(presenter.listings.len(), 2);
        assert_eq!(presenter.details_shown, vec!["Arrival"]);
        assert_eq!(
            presenter.last_message(),
            Some((
                MessageKind::Info,
                "Booking Successful",
                "Tickets booked successfully!"
            ))
        );
        let request = ticketing.last_request().expect("request");
        assert_eq!(request.movie_id, "m-2");
        assert_eq!(request.showtime, "20:15");
        assert_eq!(request.seats, 2);
    }

    #[tokio::test]
    async fn invalid_date_stops_before_any_request() {
        let schedules = catalog();
        let ticketing = FakeTicketing::new(true, true, true);
        let locations = locations();
        let session = BookingSession::new(&schedules, &ticketing, &locations);
        let mut presenter = ScriptedPresenter::answering("abcd-ef-gh", 0, "18:00", "1");

        let end = session.run(&mut presenter).await;

        assert!(matches!(
            end,
            SessionEnd::SearchFailed(SearchError::InvalidDate(_))
        ));
        assert_eq!(
            presenter.last_message(),
            Some((MessageKind::Error, "Error", "Invalid date format."))
        );
        assert!(ticketing.calls().is_empty());
    }

    #[tokio::test]
    async fn unavailable_seats_are_reported() {
        let schedules = catalog();
        let ticketing = FakeTicketing::new(false, true, true);
        let locations = locations();
        let session = BookingSession::new(&schedules, &ticketing, &locations);
        let mut presenter = ScriptedPresenter::answering("2024-03-05", 0, "18:00", "3");

        let end = session.run(&mut presenter).await;

        assert_eq!(
            end,
            SessionEnd::Finished(BookingOutcome::Rejected(RejectReason::SeatsUnavailable))
        );
        assert_eq!(ticketing.calls(), vec![Call::CheckAvailability]);
        assert_eq!(
            presenter.last_message().map(|(_, _, text)| text),
            Some("Seats not available.")
        );
    }

    #[tokio::test]
    async fn out_of_range_index_or_blank_showtime_cancels() {
        let schedules = catalog();
        let ticketing = FakeTicketing::new(true, true, true);
        let locations = locations();
        let session = BookingSession::new(&schedules, &ticketing, &locations);

        let mut presenter = ScriptedPresenter::answering("2024-03-05", 7, "18:00", "1");
        assert_eq!(session.run(&mut presenter).await, SessionEnd::Cancelled);

        let mut presenter = ScriptedPresenter::answering("2024-03-05", 0, "  ", "1");
        assert_eq!(session.run(&mut presenter).await, SessionEnd::Cancelled);
        assert!(ticketing.calls().is_empty());
    }

    #[tokio::test]
    async fn chosen_schedule_without_details_reports_error() {
        let mut schedules = catalog();
        schedules.details.remove("m-1");
        let ticketing = FakeTicketing::new(true, true, true);
        let locations = locations();
        let session = BookingSession::new(&schedules, &ticketing, &locations);
        let mut presenter = ScriptedPresenter::answering("2024-03-05", 0, "18:00", "1");

        assert_eq!(session.run(&mut presenter).await, SessionEnd::MissingDetails);
        assert_eq!(
            presenter.last_message(),
            Some((MessageKind::Error, "Error", "Failed to retrieve movie details."))
        );
        assert!(presenter.details_shown.is_empty());
        assert!(ticketing.calls().is_empty());
    }

    #[tokio::test]
    async fn padded_date_is_rejected() {
        let schedules = catalog();
        let ticketing = FakeTicketing::new(true, true, true);
        let locations = locations();
        let session = BookingSession::new(&schedules, &ticketing, &locations);
        let mut presenter = ScriptedPresenter::answering(" 2024-03-05 ", 0, "18:00", "1");

        assert!(matches!(
            session.run(&mut presenter).await,
            SessionEnd::SearchFailed(SearchError::InvalidDate(_))
        ));
        assert!(presenter.listings.is_empty());
    }

    #[tokio::test]
    async fn empty_listing_shows_no_schedules() {
        let mut schedules = catalog();
        schedules.details.clear();
        let ticketing = FakeTicketing::new(true, true, true);
        let locations = locations();
        let session = BookingSession::new(&schedules, &ticketing, &locations);
        let mut presenter = ScriptedPresenter::answering("2024-03-05", 0, "18:00", "1");

        assert_eq!(session.run(&mut presenter).await, SessionEnd::NoListings);
        assert_eq!(
            presenter.last_message().map(|(_, _, text)| text),
            Some("No schedules available.")
        );
    }
}
