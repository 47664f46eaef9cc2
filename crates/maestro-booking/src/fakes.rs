use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use maestro_core::{
    booking::{BookingRequest, TicketingService},
    movies::{MovieDetails, Schedule, ScheduleListing, ScheduleService},
    presenter::{MessageKind, Presenter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    CheckAvailability,
    MakeBooking,
    SendEmail,
}

/// Ticketing double with fixed answers that records every call.
pub struct FakeTicketing {
    available: bool,
    booked: bool,
    emailed: bool,
    calls: Mutex<Vec<(Call, BookingRequest)>>,
}

impl FakeTicketing {
    pub fn new(available: bool, booked: bool, emailed: bool) -> Self {
        Self {
            available,
            booked,
            emailed,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(c, _)| *c).collect()
    }

    pub fn last_request(&self) -> Option<BookingRequest> {
        self.calls.lock().unwrap().last().map(|(_, r)| r.clone())
    }

    fn record(&self, call: Call, request: &BookingRequest) {
        self.calls.lock().unwrap().push((call, request.clone()));
    }
}

#[async_trait]
impl TicketingService for FakeTicketing {
    async fn check_availability(&self, request: &BookingRequest) -> bool {
        self.record(Call::CheckAvailability, request);
        self.available
    }

    async fn make_booking(&self, request: &BookingRequest) -> bool {
        self.record(Call::MakeBooking, request);
        self.booked
    }

    async fn send_confirmation_email(&self, request: &BookingRequest) -> bool {
        self.record(Call::SendEmail, request);
        self.emailed
    }
}

/// Schedule double. `schedules: None` simulates a failed request.
#[derive(Default)]
pub struct FakeSchedules {
    pub schedules: Option<Vec<Schedule>>,
    pub details: HashMap<String, MovieDetails>,
}

impl FakeSchedules {
    pub fn with_movies(movies: &[(&str, &str, &[&str])]) -> Self {
        let schedules = movies
            .iter()
            .map(|(id, _, times)| Schedule {
                movie_id: id.to_string(),
                showtimes: times.iter().map(|t| t.to_string()).collect(),
            })
            .collect();
        let details = movies
            .iter()
            .map(|(id, title, _)| {
                (
                    id.to_string(),
                    MovieDetails {
                        title: title.to_string(),
                        duration: 120,
                        synopsis: format!("About {title}."),
                    },
                )
            })
            .collect();
        Self {
            schedules: Some(schedules),
            details,
        }
    }
}

#[async_trait]
impl ScheduleService for FakeSchedules {
    async fn get_schedules(&self, _location: &str, _date: &str) -> Option<Vec<Schedule>> {
        self.schedules.clone()
    }

    async fn get_movie_details(&self, movie_id: &str) -> Option<MovieDetails> {
        self.details.get(movie_id).cloned()
    }
}

/// Presenter that answers prompts from a script and records output.
#[derive(Default)]
pub struct ScriptedPresenter {
    pub location: Option<String>,
    pub date: Option<String>,
    pub index: Option<usize>,
    pub showtime: Option<String>,
    pub seats: Option<String>,
    pub listings: Vec<ScheduleListing>,
    pub details_shown: Vec<String>,
    pub messages: Vec<(MessageKind, String, String)>,
}

impl ScriptedPresenter {
    pub fn answering(date: &str, index: usize, showtime: &str, seats: &str) -> Self {
        Self {
            location: Some("Location 1".into()),
            date: Some(date.into()),
            index: Some(index),
            showtime: Some(showtime.into()),
            seats: Some(seats.into()),
            ..Self::default()
        }
    }

    pub fn last_message(&self) -> Option<(MessageKind, &str, &str)> {
        self.messages
            .last()
            .map(|(k, t, m)| (*k, t.as_str(), m.as_str()))
    }
}

impl Presenter for ScriptedPresenter {
    fn select_location(&mut self, _locations: &[String]) -> Option<String> {
        self.location.clone()
    }

    fn enter_date(&mut self) -> Option<String> {
        self.date.clone()
    }

    fn choose_schedule_index(&mut self, _count: usize) -> Option<usize> {
        self.index
    }

    fn enter_showtime(&mut self, _showtimes: &[String]) -> Option<String> {
        self.showtime.clone()
    }

    fn enter_seat_count(&mut self) -> Option<String> {
        self.seats.clone()
    }

    fn show_listings(&mut self, listings: &[ScheduleListing]) {
        self.listings = listings.to_vec();
    }

    fn show_details(&mut self, _schedule: &Schedule, details: &MovieDetails) {
        self.details_shown.push(details.title.clone());
    }

    fn show_message(&mut self, kind: MessageKind, title: &str, text: &str) {
        self.messages.push((kind, title.to_string(), text.to_string()));
    }
}
