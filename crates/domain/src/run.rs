//! Run record types and the field rules enforced when a run is logged.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use myrun_core::{AppError, AppResult, FieldErrors, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Date format accepted for `run_date` inputs.
pub const RUN_DATE_FORMAT: &str = "%Y-%m-%d";

/// Placeholder shown for absent display values.
pub const MISSING_DISPLAY_VALUE: &str = "-";

/// Unique identifier for a persisted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Creates a new random run identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a run identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for RunId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid run id '{value}': {error}")))
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Run distance in kilometres. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct RunDistance(f64);

impl RunDistance {
    /// Creates a distance from a numeric value.
    pub fn new(value: f64) -> AppResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(AppError::Validation(
                "distance must be a number greater than 0".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Parses a distance typed into a form field.
    pub fn parse(value: &str) -> AppResult<Self> {
        let number = value.trim().parse::<f64>().map_err(|_| {
            AppError::Validation("distance must be a number greater than 0".to_owned())
        })?;

        Self::new(number)
    }

    /// Returns the distance in kilometres.
    #[must_use]
    pub fn kilometres(self) -> f64 {
        self.0
    }
}

/// Validated fields of a run that is about to be logged.
#[derive(Debug, Clone, PartialEq)]
pub struct RunFields {
    run_date: NaiveDate,
    run_distance: RunDistance,
    run_place: NonEmptyString,
}

impl RunFields {
    /// Validates raw form values, collecting one message per failing field.
    ///
    /// Field keys are `run_date`, `run_distance` and `run_place`.
    pub fn validate(
        run_date: Option<&str>,
        run_distance: Option<&str>,
        run_place: Option<&str>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let run_date = match run_date.map(str::trim).filter(|value| !value.is_empty()) {
            None => {
                errors.insert("run_date".to_owned(), "run date is required".to_owned());
                None
            }
            Some(value) => match NaiveDate::parse_from_str(value, RUN_DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.insert(
                        "run_date".to_owned(),
                        "run date must use the YYYY-MM-DD format".to_owned(),
                    );
                    None
                }
            },
        };

        let run_distance = match run_distance.filter(|value| !value.trim().is_empty()) {
            None => {
                errors.insert(
                    "run_distance".to_owned(),
                    "run distance is required".to_owned(),
                );
                None
            }
            Some(value) => match RunDistance::parse(value) {
                Ok(distance) => Some(distance),
                Err(_) => {
                    errors.insert(
                        "run_distance".to_owned(),
                        "run distance must be a number greater than 0".to_owned(),
                    );
                    None
                }
            },
        };

        let run_place = match run_place.map(NonEmptyString::new) {
            Some(Ok(place)) => Some(place),
            _ => {
                errors.insert("run_place".to_owned(), "run place is required".to_owned());
                None
            }
        };

        match (run_date, run_distance, run_place) {
            (Some(run_date), Some(run_distance), Some(run_place)) if errors.is_empty() => {
                Ok(Self {
                    run_date,
                    run_distance,
                    run_place,
                })
            }
            _ => Err(errors),
        }
    }

    /// Returns the day the run took place.
    #[must_use]
    pub fn run_date(&self) -> NaiveDate {
        self.run_date
    }

    /// Returns the distance covered.
    #[must_use]
    pub fn run_distance(&self) -> RunDistance {
        self.run_distance
    }

    /// Returns where the run took place.
    #[must_use]
    pub fn run_place(&self) -> &NonEmptyString {
        &self.run_place
    }
}

/// A run ready to be inserted, with the public URL of its photo if one was uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRun {
    /// Validated form fields.
    pub fields: RunFields,
    /// Full public URL of the uploaded photo.
    pub run_image_url: Option<String>,
}

/// Persisted run row.
///
/// Columns other than `id` and `created_at` are nullable in the table, so rows
/// read back are not re-validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    id: RunId,
    created_at: DateTime<Utc>,
    run_date: Option<NaiveDate>,
    run_distance: Option<f64>,
    run_place: Option<String>,
    run_image_url: Option<String>,
}

impl RunRecord {
    /// Rebuilds a record from stored column values.
    #[must_use]
    pub fn new(
        id: RunId,
        created_at: DateTime<Utc>,
        run_date: Option<NaiveDate>,
        run_distance: Option<f64>,
        run_place: Option<String>,
        run_image_url: Option<String>,
    ) -> Self {
        Self {
            id,
            created_at,
            run_date,
            run_distance,
            run_place,
            run_image_url,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Returns when the row was inserted.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the recorded run date.
    #[must_use]
    pub fn run_date(&self) -> Option<NaiveDate> {
        self.run_date
    }

    /// Returns the recorded distance in kilometres.
    #[must_use]
    pub fn run_distance(&self) -> Option<f64> {
        self.run_distance
    }

    /// Returns the recorded place.
    #[must_use]
    pub fn run_place(&self) -> Option<&str> {
        self.run_place.as_deref()
    }

    /// Returns the stored image reference.
    #[must_use]
    pub fn run_image_url(&self) -> Option<&str> {
        self.run_image_url.as_deref()
    }

    /// Day shown in listings: the run date, or the insertion day when absent.
    #[must_use]
    pub fn date_text(&self) -> String {
        self.run_date
            .unwrap_or_else(|| self.created_at.date_naive())
            .format(RUN_DATE_FORMAT)
            .to_string()
    }

    /// Distance with two decimals, or `-` when absent.
    #[must_use]
    pub fn distance_text(&self) -> String {
        self.run_distance
            .map(|distance| format!("{distance:.2}"))
            .unwrap_or_else(|| MISSING_DISPLAY_VALUE.to_owned())
    }

    /// Place, or `-` when absent.
    #[must_use]
    pub fn place_text(&self) -> &str {
        self.run_place.as_deref().unwrap_or(MISSING_DISPLAY_VALUE)
    }
}
