use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use myrun_application::{CreateRunInput, RunImageUpload};
use myrun_core::{AppError, AppResult};

/// Reads the create-run multipart form.
///
/// Text fields are `run_date`, `run_distance` and `run_place`; the optional
/// photo is the `image` file part. Unknown parts are ignored.
pub async fn read_create_run_form(mut multipart: Multipart) -> AppResult<CreateRunInput> {
    let mut input = CreateRunInput::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "run_date" => input.run_date = Some(field.text().await.map_err(multipart_error)?),
            "run_distance" => {
                input.run_distance = Some(field.text().await.map_err(multipart_error)?);
            }
            "run_place" => input.run_place = Some(field.text().await.map_err(multipart_error)?),
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field.content_type().unwrap_or_default().to_owned();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                input.image = Some(RunImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.into(),
                });
            }
            _ => {}
        }
    }

    Ok(input)
}

fn multipart_error(error: MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(format!("upload exceeds the size limit: {error}"));
    }

    AppError::Validation(format!("invalid multipart form: {error}"))
}
