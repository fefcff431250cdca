//! Checks run before anything is sent. A failure here never reaches the
//! network.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_SEARCH_LEN: usize = 2;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

static RELEASE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(19|20)\d\d-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$").expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.0.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

/// A star rating, 1 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: i64) -> Result<Self, ValidationErrors> {
        match u8::try_from(value) {
            Ok(v @ 1..=5) => Ok(Self(v)),
            _ => {
                let mut errors = ValidationErrors::default();
                errors.push("rating", "Please select a rating between 1 and 5.");
                Err(errors)
            }
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

pub fn login(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_email(&mut errors, email);
    if password.is_empty() {
        errors.push("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
    errors.into_result(())
}

pub fn registration(name: &str, email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = match login(email, password) {
        Ok(()) => ValidationErrors::default(),
        Err(errors) => errors,
    };
    if name.trim().is_empty() {
        errors.0.insert(
            0,
            FieldError {
                field: "name",
                message: "Name is required".into(),
            },
        );
    }
    errors.into_result(())
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.trim().is_empty() {
        errors.push("email", "Email is required");
    } else if !EMAIL.is_match(email.trim()) {
        errors.push("email", "Invalid email");
    }
}

/// The add-song form as typed: every field is raw text.
#[derive(Debug, Clone, Default)]
pub struct CustomSongForm {
    pub title: String,
    pub performers: String,
    pub album: String,
    pub length: String,
    pub genres: String,
    pub release_date: String,
}

/// Payload for `/song/addCustomSong`. Performers and genres stay as the
/// comma-separated text the user typed; the server splits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSong {
    pub title: String,
    pub performers: String,
    pub album: String,
    pub length: u64,
    pub genres: String,
    pub release_date: String,
}

impl CustomSongForm {
    pub fn validate(&self) -> Result<CustomSong, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let required = [
            ("title", &self.title, "Track Name is required"),
            ("performers", &self.performers, "Performer Name(s) is required"),
            ("album", &self.album, "Album Name is required"),
        ];
        for (field, value, message) in required {
            if value.trim().is_empty() {
                errors.push(field, message);
            }
        }

        let length = self.length.trim();
        let length = if length.is_empty() {
            errors.push("length", "Length (ms) is required");
            0
        } else {
            match length.parse::<i64>() {
                Ok(ms) if ms > 0 => ms as u64,
                Ok(_) => {
                    errors.push("length", "Length should be a positive number");
                    0
                }
                Err(_) => {
                    errors.push("length", "Length should be a number");
                    0
                }
            }
        };

        if self.genres.trim().is_empty() {
            errors.push("genres", "Genre(s) is required");
        }

        let release_date = self.release_date.trim();
        if release_date.is_empty() {
            errors.push("release_date", "Release Date is required");
        } else if !RELEASE_DATE.is_match(release_date) {
            errors.push(
                "release_date",
                "Release Date should be in the format YYYY-MM-DD",
            );
        }

        errors.into_result(CustomSong {
            title: self.title.trim().to_string(),
            performers: self.performers.trim().to_string(),
            album: self.album.trim().to_string(),
            length,
            genres: self.genres.trim().to_string(),
            release_date: release_date.to_string(),
        })
    }
}

/// What the Spotify search form sends.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotifyQuery {
    pub track_name: String,
    pub performer_name: String,
    pub album_name: String,
}

impl SpotifyQuery {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.track_name.trim().is_empty() {
            errors.push("track", "Please enter track name.");
        }
        errors.into_result(())
    }
}

/// Returns the trimmed query when it is long enough to send.
pub fn user_search(query: &str) -> Option<&str> {
    let query = query.trim();
    (query.chars().count() >= MIN_SEARCH_LEN).then_some(query)
}
