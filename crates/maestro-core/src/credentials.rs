use std::fmt;

use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_MOVIE_API_KEY: &str = "YOUR_MOVIE_API_KEY";
pub const PLACEHOLDER_TICKETING_TOKEN: &str = "YOUR_TICKETING_SYSTEM_AUTH_TOKEN";
pub const PLACEHOLDER_EMAIL_TOKEN: &str = "YOUR_EMAIL_SERVICE_AUTH_TOKEN";

/// Secrets needed to talk to the remote services. Stored encrypted at rest and
/// loaded once per process.
///
/// Field names on the wire match the JSON config file
/// (`MOVIE_API_KEY`, `TICKETING_SYSTEM_AUTH_TOKEN`, `EMAIL_SERVICE_AUTH_TOKEN`).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "MOVIE_API_KEY")]
    pub movie_api_key: String,
    #[serde(rename = "TICKETING_SYSTEM_AUTH_TOKEN")]
    pub ticketing_auth_token: String,
    #[serde(rename = "EMAIL_SERVICE_AUTH_TOKEN")]
    pub email_auth_token: String,
}

impl Default for Credentials {
    /// Placeholder values written on first run; the user replaces them.
    fn default() -> Self {
        Self {
            movie_api_key: PLACEHOLDER_MOVIE_API_KEY.to_string(),
            ticketing_auth_token: PLACEHOLDER_TICKETING_TOKEN.to_string(),
            email_auth_token: PLACEHOLDER_EMAIL_TOKEN.to_string(),
        }
    }
}

impl Credentials {
    /// True when any value is still one of the generated placeholders.
    pub fn has_placeholders(&self) -> bool {
        self.movie_api_key == PLACEHOLDER_MOVIE_API_KEY
            || self.ticketing_auth_token == PLACEHOLDER_TICKETING_TOKEN
            || self.email_auth_token == PLACEHOLDER_EMAIL_TOKEN
    }

    /// Named entries with values masked, for display.
    pub fn masked(&self) -> Vec<(&'static str, String)> {
        vec![
            ("MOVIE_API_KEY", mask(&self.movie_api_key)),
            ("TICKETING_SYSTEM_AUTH_TOKEN", mask(&self.ticketing_auth_token)),
            ("EMAIL_SERVICE_AUTH_TOKEN", mask(&self.email_auth_token)),
        ]
    }
}

// Never print secrets, even in debug logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("movie_api_key", &mask(&self.movie_api_key))
            .field("ticketing_auth_token", &mask(&self.ticketing_auth_token))
            .field("email_auth_token", &mask(&self.email_auth_token))
            .finish()
    }
}

fn mask(value: &str) -> String {
    let visible: String = value.chars().take(4).collect();
    if value.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
