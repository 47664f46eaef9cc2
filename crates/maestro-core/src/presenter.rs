use crate::movies::{MovieDetails, Schedule, ScheduleListing};

/// Severity of a user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// Input and output surface the booking session talks to.
///
/// The core never renders anything itself; implementations decide how each
/// prompt is realized (console, test script, GUI). Input methods return `None`
/// when the user cancels.
pub trait Presenter {
    fn select_location(&mut self, locations: &[String]) -> Option<String>;

    /// Raw date text; validation happens in the caller.
    fn enter_date(&mut self) -> Option<String>;

    /// Pick a schedule by its listing index, `0..count`.
    fn choose_schedule_index(&mut self, count: usize) -> Option<usize>;

    fn enter_showtime(&mut self, showtimes: &[String]) -> Option<String>;

    /// Raw seat count text; validation happens in the booking workflow.
    fn enter_seat_count(&mut self) -> Option<String>;

    fn show_listings(&mut self, listings: &[ScheduleListing]);

    fn show_details(&mut self, schedule: &Schedule, details: &MovieDetails);

    fn show_message(&mut self, kind: MessageKind, title: &str, text: &str);
}
