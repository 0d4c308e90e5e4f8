use chrono::Utc;
use myrun_core::{AppError, AppResult};
use myrun_domain::{
    ImageContentType, NewRun, RunFields, RunRecord, image_object_key, public_object_url,
};
use tracing::{info, warn};

use super::{CreateRunInput, RunImageUpload, RunService, user_facing};

const FALLBACK_IMAGE_FILE_NAME: &str = "image";

struct ValidatedImage {
    file_name: String,
    content_type: ImageContentType,
    bytes: Vec<u8>,
}

impl RunService {
    /// Validates a submission, uploads its photo if present, then inserts the row.
    ///
    /// Upload or insert failure aborts the remaining steps. When the insert
    /// fails after an upload, the uploaded object is removed on a best-effort
    /// basis.
    pub async fn create_run(&self, input: CreateRunInput) -> AppResult<RunRecord> {
        let (fields, image) = validate_submission(input)?;

        let uploaded_key = match image {
            Some(image) => Some(self.upload_image(image).await?),
            None => None,
        };

        let run_image_url = uploaded_key.as_deref().map(|key| {
            public_object_url(
                self.config.public_base_url.as_str(),
                self.config.bucket.as_str(),
                key,
            )
        });

        let inserted = self
            .repository
            .insert_run(NewRun {
                fields,
                run_image_url,
            })
            .await;

        match inserted {
            Ok(record) => {
                info!(run_id = %record.id(), "run logged");
                Ok(record)
            }
            Err(error) => {
                warn!(error = %error, "run insert failed");
                if let Some(key) = uploaded_key.as_deref() {
                    self.discard_orphaned_image(key).await;
                }
                Err(user_facing(error, "failed to save run"))
            }
        }
    }

    async fn upload_image(&self, image: ValidatedImage) -> AppResult<String> {
        let key = image_object_key(image.file_name.as_str(), Utc::now().timestamp_millis());

        self.storage
            .upload_object(key.as_str(), image.bytes, image.content_type)
            .await
            .map_err(|error| {
                warn!(error = %error, object_key = %key, "run image upload failed");
                user_facing(error, "failed to upload run image")
            })?;

        Ok(key)
    }

    async fn discard_orphaned_image(&self, key: &str) {
        if let Err(error) = self.storage.remove_object(key).await {
            warn!(
                error = %error,
                object_key = %key,
                "failed to remove run image after insert failure"
            );
        }
    }
}

fn validate_submission(
    input: CreateRunInput,
) -> AppResult<(RunFields, Option<ValidatedImage>)> {
    let fields = RunFields::validate(
        input.run_date.as_deref(),
        input.run_distance.as_deref(),
        input.run_place.as_deref(),
    );
    let image = input
        .image
        .filter(|image| !image.bytes.is_empty())
        .map(validate_image)
        .transpose();

    match (fields, image) {
        (Ok(fields), Ok(image)) => Ok((fields, image)),
        (fields, image) => {
            let mut errors = fields.err().unwrap_or_default();
            if let Err(message) = image {
                errors.insert("image".to_owned(), message);
            }
            Err(AppError::InvalidFields(errors))
        }
    }
}

fn validate_image(image: RunImageUpload) -> Result<ValidatedImage, String> {
    let content_type = image
        .content_type
        .parse::<ImageContentType>()
        .map_err(|_| "image must be a PNG, JPG, WEBP or GIF file".to_owned())?;

    let file_name = if image.file_name.trim().is_empty() {
        FALLBACK_IMAGE_FILE_NAME.to_owned()
    } else {
        image.file_name
    };

    Ok(ValidatedImage {
        file_name,
        content_type,
        bytes: image.bytes,
    })
}
