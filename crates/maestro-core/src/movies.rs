use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Showtimes for one movie at one location on one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schedule {
    pub movie_id: String,
    /// Ordered as returned by the schedule API.
    pub showtimes: Vec<String>,
}

/// Descriptive data for a movie, keyed by its identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieDetails {
    pub title: String,
    /// Running time in minutes.
    pub duration: u32,
    pub synopsis: String,
}

/// A schedule joined with its movie details, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleListing {
    /// Position of the schedule in the list returned by the API.
    pub index: usize,
    pub schedule: Schedule,
    pub details: MovieDetails,
}

/// Read access to the remote schedule API.
///
/// Implementations swallow transport failures: they log and return `None`.
#[async_trait]
pub trait ScheduleService: Send + Sync {
    async fn get_schedules(&self, location: &str, date: &str) -> Option<Vec<Schedule>>;

    async fn get_movie_details(&self, movie_id: &str) -> Option<MovieDetails>;
}
