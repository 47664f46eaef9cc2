use async_trait::async_trait;
use maestro_core::booking::{BookingRequest, TicketingService};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, instrument, warn};

use crate::error::{check_status, endpoint, TransportError};

pub const DEFAULT_CUSTOMER_ID: &str = "CUSTOMER_ID";
pub const DEFAULT_CUSTOMER_EMAIL: &str = "customer@example.com";
const CONFIRMATION_SUBJECT: &str = "Booking Confirmation";

/// Endpoints, tokens, and customer identity for the ticketing and email APIs.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BookingClientConfig {
    pub ticketing_base: String,
    pub email_base: String,
    pub ticketing_token: String,
    pub email_token: String,
    pub customer_id: String,
    pub customer_email: String,
}

/// Client for seat checks, bookings, and confirmation emails.
pub struct BookingClient {
    cfg: BookingClientConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct AvailabilityResponse {
    #[serde(default)]
    availability: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct BookingResponse {
    #[serde(default)]
    status: Option<String>,
}

impl BookingClient {
    pub fn new(cfg: BookingClientConfig) -> Self {
        Self {
            cfg,
            client: reqwest::Client::new(),
        }
    }

    fn headers(token: &str) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(crate::USER_AGENT));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| TransportError::Token(e.to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    async fn post(
        &self,
        base: &str,
        segments: &[&str],
        token: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, TransportError> {
        let url = endpoint(base, segments)?;
        let response = self
            .client
            .post(url)
            .headers(Self::headers(token)?)
            .json(body)
            .send()
            .await
            .map_err(TransportError::request)?;
        check_status(response)
    }

    async fn availability(&self, request: &BookingRequest) -> Result<bool, TransportError> {
        let body = json!({
            "movie_id": request.movie_id,
            "showtime": request.showtime,
            "seats": request.seats,
        });
        let resp: AvailabilityResponse = self
            .post(
                &self.cfg.ticketing_base,
                &["seats", "check_availability"],
                &self.cfg.ticketing_token,
                &body,
            )
            .await?
            .json()
            .await
            .map_err(TransportError::decode)?;

        Ok(resp.availability.unwrap_or_else(|| {
            warn!("availability response had no availability flag");
            false
        }))
    }

    async fn booking(&self, request: &BookingRequest) -> Result<bool, TransportError> {
        let body = json!({
            "movie_id": request.movie_id,
            "showtime": request.showtime,
            "seats": request.seats,
            "customer_id": self.cfg.customer_id,
        });
        let resp: BookingResponse = self
            .post(
                &self.cfg.ticketing_base,
                &["bookings"],
                &self.cfg.ticketing_token,
                &body,
            )
            .await?
            .json()
            .await
            .map_err(TransportError::decode)?;

        Ok(resp.status.as_deref() == Some("success"))
    }

    async fn email(&self, request: &BookingRequest) -> Result<(), TransportError> {
        let body = json!({
            "to": self.cfg.customer_email,
            "subject": CONFIRMATION_SUBJECT,
            "body": confirmation_body(request),
        });
        self.post(&self.cfg.email_base, &["send"], &self.cfg.email_token, &body)
            .await?;
        Ok(())
    }
}

fn confirmation_body(request: &BookingRequest) -> String {
    format!(
        "Thank you for booking tickets!\n\nMovie ID: {}\nShowtime: {}\nSeats: {}",
        request.movie_id, request.showtime, request.seats
    )
}

#[async_trait]
impl TicketingService for BookingClient {
    #[instrument(skip_all, fields(movie_id = %request.movie_id, showtime = %request.showtime, seats = request.seats))]
    async fn check_availability(&self, request: &BookingRequest) -> bool {
        self.availability(request).await.unwrap_or_else(|err| {
            error!("error occurred while checking seat availability: {err}");
            false
        })
    }

    #[instrument(skip_all, fields(movie_id = %request.movie_id, showtime = %request.showtime, seats = request.seats))]
    async fn make_booking(&self, request: &BookingRequest) -> bool {
        self.booking(request).await.unwrap_or_else(|err| {
            error!("error occurred while making ticket booking: {err}");
            false
        })
    }

    #[instrument(skip_all, fields(movie_id = %request.movie_id))]
    async fn send_confirmation_email(&self, request: &BookingRequest) -> bool {
        match self.email(request).await {
            Ok(()) => true,
            Err(err) => {
                error!("error occurred while sending booking confirmation email: {err}");
                false
            }
        }
    }
}
