use chrono::{DateTime, NaiveDate, Utc};
use myrun_domain::{NewRun, RunId, RunRecord};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One `myrun_tb` row as returned by Postgres or PostgREST.
#[derive(Debug, Deserialize, FromRow)]
pub(crate) struct RunRow {
    pub(crate) id: Uuid,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) run_date: Option<NaiveDate>,
    pub(crate) run_distance: Option<f64>,
    pub(crate) run_place: Option<String>,
    pub(crate) run_image_url: Option<String>,
}

impl From<RunRow> for RunRecord {
    fn from(row: RunRow) -> Self {
        RunRecord::new(
            RunId::from_uuid(row.id),
            row.created_at,
            row.run_date,
            row.run_distance,
            row.run_place,
            row.run_image_url,
        )
    }
}

/// Column values written when a run is inserted.
#[derive(Debug, Serialize)]
pub(crate) struct InsertRunRow {
    pub(crate) run_date: NaiveDate,
    pub(crate) run_distance: f64,
    pub(crate) run_place: String,
    pub(crate) run_image_url: Option<String>,
}

impl From<NewRun> for InsertRunRow {
    fn from(run: NewRun) -> Self {
        Self {
            run_date: run.fields.run_date(),
            run_distance: run.fields.run_distance().kilometres(),
            run_place: run.fields.run_place().as_str().to_owned(),
            run_image_url: run.run_image_url,
        }
    }
}
