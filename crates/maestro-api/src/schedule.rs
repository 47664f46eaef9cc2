use async_trait::async_trait;
use maestro_core::movies::{MovieDetails, Schedule, ScheduleService};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::{error, instrument};

use crate::error::{check_status, endpoint, TransportError};

/// Client for the movie schedule API. The API key travels as a query parameter.
pub struct ScheduleClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ScheduleClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(crate::USER_AGENT));
        let url = endpoint(&self.base_url, segments)?;

        let response = self
            .client
            .get(url)
            .headers(headers)
            .query(query)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(TransportError::request)?;
        check_status(response)?
            .json()
            .await
            .map_err(TransportError::decode)
    }
}

#[async_trait]
impl ScheduleService for ScheduleClient {
    #[instrument(skip_all, fields(%location, %date))]
    async fn get_schedules(&self, location: &str, date: &str) -> Option<Vec<Schedule>> {
        self.fetch(&["schedules"], &[("location", location), ("date", date)])
            .await
            .map_err(|err| error!("error occurred while retrieving schedules: {err}"))
            .ok()
    }

    #[instrument(skip_all, fields(%movie_id))]
    async fn get_movie_details(&self, movie_id: &str) -> Option<MovieDetails> {
        self.fetch(&["movies", movie_id], &[])
            .await
            .map_err(|err| error!("error occurred while retrieving movie details: {err}"))
            .ok()
    }
}
