//! HTTP clients for the movie schedule, ticketing, and email services.
//!
//! Every remote failure is logged and turned into a sentinel (`None` or
//! `false`) at this boundary; nothing here returns transport errors to callers.

pub mod booking;
mod error;
pub mod schedule;

pub use booking::{BookingClient, BookingClientConfig};
pub use schedule::ScheduleClient;

pub const DEFAULT_SCHEDULE_BASE: &str = "https://api.movies.com";
pub const DEFAULT_TICKETING_BASE: &str = "https://api.ticketing-system.com";
pub const DEFAULT_EMAIL_BASE: &str = "https://api.email-service.com";

pub(crate) const USER_AGENT: &str = concat!("movie-maestro/", env!("CARGO_PKG_VERSION"));

/// Test helper: a base URL nothing is listening on.
#[cfg(test)]
pub(crate) fn unreachable_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}
