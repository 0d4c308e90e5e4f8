use myrun_application::RunListing;
use myrun_domain::{RUN_DATE_FORMAT, RunRecord};
use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of a stored run.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/run-response.ts"
)]
pub struct RunResponse {
    pub id: String,
    pub created_at: String,
    pub run_date: Option<String>,
    pub run_distance: Option<f64>,
    pub run_place: Option<String>,
    pub run_image_url: Option<String>,
}

impl From<&RunRecord> for RunResponse {
    fn from(record: &RunRecord) -> Self {
        Self {
            id: record.id().to_string(),
            created_at: record.created_at().to_rfc3339(),
            run_date: record
                .run_date()
                .map(|date| date.format(RUN_DATE_FORMAT).to_string()),
            run_distance: record.run_distance(),
            run_place: record.run_place().map(str::to_owned),
            run_image_url: record.run_image_url().map(str::to_owned),
        }
    }
}

impl From<RunRecord> for RunResponse {
    fn from(record: RunRecord) -> Self {
        Self::from(&record)
    }
}

/// One row of the run listing, with display-ready values.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/run-list-item-response.ts"
)]
pub struct RunListItemResponse {
    #[serde(flatten)]
    pub run: RunResponse,
    /// `YYYY-MM-DD` of the run, or of its creation when no run date was stored.
    pub date_text: String,
    /// Distance with two decimals, or `-`.
    pub distance_text: String,
    /// Place, or `-`.
    pub place_text: String,
    /// Signed photo URL, or `null` when there is nothing to show.
    pub display_image_url: Option<String>,
}

impl From<RunListing> for RunListItemResponse {
    fn from(listing: RunListing) -> Self {
        let record = &listing.record;
        Self {
            run: RunResponse::from(record),
            date_text: record.date_text(),
            distance_text: record.distance_text(),
            place_text: record.place_text().to_owned(),
            display_image_url: listing.display_image_url,
        }
    }
}
