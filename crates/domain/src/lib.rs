//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod image;
mod run;
mod storage_path;

pub use image::{ImageContentType, image_object_key};
pub use run::{
    MISSING_DISPLAY_VALUE, NewRun, RUN_DATE_FORMAT, RunDistance, RunFields, RunId, RunRecord,
};
pub use storage_path::{
    PUBLIC_OBJECT_PATH_PREFIX, SIGNED_OBJECT_PATH_PREFIX, bucket_relative_key,
    normalize_object_path, public_object_url,
};
