use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use myrun_core::{AppError, AppResult};
use myrun_domain::{ImageContentType, NewRun, RunId, RunRecord};

use super::{
    CreateRunInput, DEFAULT_SIGNED_URL_TTL_SECONDS, RunImageUpload, RunService, RunServiceConfig,
};
use crate::{ObjectStorage, RunRepository};

const BASE_URL: &str = "https://h.supabase.co";
const BUCKET: &str = "myrun_bk";

fn lock<T>(mutex: &Mutex<T>) -> AppResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|error| AppError::Internal(format!("failed to lock test state: {error}")))
}

#[derive(Default)]
struct TestRunRepository {
    rows: Mutex<Vec<RunRecord>>,
    fail_insert: bool,
    fail_list: bool,
    fail_delete: bool,
}

#[async_trait]
impl RunRepository for TestRunRepository {
    async fn insert_run(&self, run: NewRun) -> AppResult<RunRecord> {
        if self.fail_insert {
            return Err(AppError::Upstream(
                "insert rejected with status 500".to_owned(),
            ));
        }

        let record = RunRecord::new(
            RunId::new(),
            Utc::now(),
            Some(run.fields.run_date()),
            Some(run.fields.run_distance().kilometres()),
            Some(run.fields.run_place().as_str().to_owned()),
            run.run_image_url,
        );
        lock(&self.rows)?.insert(0, record.clone());
        Ok(record)
    }

    async fn list_runs(&self) -> AppResult<Vec<RunRecord>> {
        if self.fail_list {
            return Err(AppError::Upstream("connection refused".to_owned()));
        }

        Ok(lock(&self.rows)?.clone())
    }

    async fn delete_run(&self, run_id: RunId) -> AppResult<()> {
        if self.fail_delete {
            return Err(AppError::Upstream("delete rejected with status 503".to_owned()));
        }

        let mut rows = lock(&self.rows)?;
        let before = rows.len();
        rows.retain(|row| row.id() != run_id);
        if rows.len() == before {
            return Err(AppError::NotFound(format!("run '{run_id}' does not exist")));
        }
        Ok(())
    }
}

#[derive(Default)]
struct TestObjectStorage {
    uploads: Mutex<Vec<(String, ImageContentType, usize)>>,
    signed: Mutex<Vec<(String, u64)>>,
    removed: Mutex<Vec<String>>,
    unsignable_keys: Vec<String>,
    fail_upload: bool,
    fail_remove: bool,
}

#[async_trait]
impl ObjectStorage for TestObjectStorage {
    async fn upload_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: ImageContentType,
    ) -> AppResult<()> {
        if self.fail_upload {
            return Err(AppError::Upstream("bucket not found".to_owned()));
        }

        lock(&self.uploads)?.push((key.to_owned(), content_type, bytes.len()));
        Ok(())
    }

    async fn create_signed_url(&self, key: &str, ttl_seconds: u64) -> AppResult<String> {
        lock(&self.signed)?.push((key.to_owned(), ttl_seconds));
        if self.unsignable_keys.iter().any(|unsignable| unsignable == key) {
            return Err(AppError::Upstream("object not found".to_owned()));
        }

        Ok(format!(
            "{BASE_URL}/storage/v1/object/sign/{BUCKET}/{key}?token=signed"
        ))
    }

    async fn remove_object(&self, key: &str) -> AppResult<()> {
        lock(&self.removed)?.push(key.to_owned());
        if self.fail_remove {
            return Err(AppError::Upstream("remove rejected with status 500".to_owned()));
        }

        Ok(())
    }
}

fn service(repository: Arc<TestRunRepository>, storage: Arc<TestObjectStorage>) -> RunService {
    RunService::new(
        repository,
        storage,
        RunServiceConfig {
            public_base_url: BASE_URL.to_owned(),
            bucket: BUCKET.to_owned(),
            signed_url_ttl_seconds: DEFAULT_SIGNED_URL_TTL_SECONDS,
        },
    )
}

fn complete_input(image: Option<RunImageUpload>) -> CreateRunInput {
    CreateRunInput {
        run_date: Some("2025-03-01".to_owned()),
        run_distance: Some("5.2".to_owned()),
        run_place: Some("Lumphini Park".to_owned()),
        image,
    }
}

fn png_upload(file_name: &str) -> RunImageUpload {
    RunImageUpload {
        file_name: file_name.to_owned(),
        content_type: "image/png".to_owned(),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    }
}

fn stored_row(image_url: Option<&str>, hour: u32) -> RunRecord {
    RunRecord::new(
        RunId::new(),
        Utc.with_ymd_and_hms(2025, 2, 1, hour, 0, 0)
            .single()
            .unwrap_or_default(),
        None,
        Some(3.0),
        Some("Track".to_owned()),
        image_url.map(str::to_owned),
    )
}

#[tokio::test]
async fn create_without_image_stores_null_reference_and_skips_upload() {
    let repository = Arc::new(TestRunRepository::default());
    let storage = Arc::new(TestObjectStorage::default());
    let service = service(repository.clone(), storage.clone());

    let record = service.create_run(complete_input(None)).await;

    let Ok(record) = record else {
        panic!("expected run to be created");
    };
    assert_eq!(record.run_image_url(), None);
    assert_eq!(record.run_distance(), Some(5.2));
    assert!(lock(&storage.uploads).map(|uploads| uploads.is_empty()).unwrap_or(false));
    assert_eq!(lock(&repository.rows).map(|rows| rows.len()).ok(), Some(1));
}

#[tokio::test]
async fn create_with_image_uploads_then_stores_public_url() {
    let repository = Arc::new(TestRunRepository::default());
    let storage = Arc::new(TestObjectStorage::default());
    let service = service(repository, storage.clone());

    let record = service
        .create_run(complete_input(Some(png_upload("sunday long run.png"))))
        .await;

    let Ok(record) = record else {
        panic!("expected run to be created");
    };
    let uploads = lock(&storage.uploads).map(|uploads| uploads.clone()).unwrap_or_default();
    assert_eq!(uploads.len(), 1);
    let (key, content_type, size) = &uploads[0];
    assert!(key.ends_with("-sunday-long-run.png"), "unexpected key {key}");
    assert!(
        key.split('-').next().is_some_and(|millis| millis.parse::<i64>().is_ok()),
        "key {key} must start with a millisecond timestamp"
    );
    assert_eq!(*content_type, ImageContentType::Png);
    assert_eq!(*size, 4);
    assert_eq!(
        record.run_image_url(),
        Some(format!("{BASE_URL}/storage/v1/object/public/{BUCKET}/{key}").as_str())
    );
}

#[tokio::test]
async fn create_treats_empty_file_part_as_no_image() {
    let storage = Arc::new(TestObjectStorage::default());
    let service = service(Arc::new(TestRunRepository::default()), storage.clone());

    let mut empty = png_upload("");
    empty.bytes.clear();
    let record = service.create_run(complete_input(Some(empty))).await;

    assert!(record.is_ok_and(|record| record.run_image_url().is_none()));
    assert!(lock(&storage.uploads).map(|uploads| uploads.is_empty()).unwrap_or(false));
}

#[tokio::test]
async fn create_reports_every_invalid_field_without_touching_ports() {
    let repository = Arc::new(TestRunRepository::default());
    let storage = Arc::new(TestObjectStorage::default());
    let service = service(repository.clone(), storage.clone());

    let result = service
        .create_run(CreateRunInput {
            run_date: None,
            run_distance: Some("0".to_owned()),
            run_place: Some("Track".to_owned()),
            image: Some(RunImageUpload {
                file_name: "notes.pdf".to_owned(),
                content_type: "application/pdf".to_owned(),
                bytes: vec![1, 2, 3],
            }),
        })
        .await;

    let Err(AppError::InvalidFields(errors)) = result else {
        panic!("expected field validation errors");
    };
    assert_eq!(
        errors.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["image", "run_date", "run_distance"]
    );
    assert!(lock(&storage.uploads).map(|uploads| uploads.is_empty()).unwrap_or(false));
    assert!(lock(&repository.rows).map(|rows| rows.is_empty()).unwrap_or(false));
}

#[tokio::test]
async fn create_aborts_when_upload_fails() {
    let repository = Arc::new(TestRunRepository::default());
    let storage = Arc::new(TestObjectStorage {
        fail_upload: true,
        ..TestObjectStorage::default()
    });
    let service = service(repository.clone(), storage);

    let result = service
        .create_run(complete_input(Some(png_upload("a.png"))))
        .await;

    assert!(matches!(
        result,
        Err(AppError::Upstream(message)) if message == "failed to upload run image"
    ));
    assert!(lock(&repository.rows).map(|rows| rows.is_empty()).unwrap_or(false));
}

#[tokio::test]
async fn insert_failure_removes_the_uploaded_image() {
    let repository = Arc::new(TestRunRepository {
        fail_insert: true,
        ..TestRunRepository::default()
    });
    let storage = Arc::new(TestObjectStorage::default());
    let service = service(repository, storage.clone());

    let result = service
        .create_run(complete_input(Some(png_upload("a.png"))))
        .await;

    assert!(matches!(
        result,
        Err(AppError::Upstream(message)) if message == "failed to save run"
    ));
    let uploaded = lock(&storage.uploads)
        .map(|uploads| uploads.iter().map(|(key, _, _)| key.clone()).collect::<Vec<_>>())
        .unwrap_or_default();
    let removed = lock(&storage.removed).map(|removed| removed.clone()).unwrap_or_default();
    assert_eq!(uploaded.len(), 1);
    assert_eq!(removed, uploaded);
}

#[tokio::test]
async fn failed_image_cleanup_keeps_the_insert_error() {
    let repository = Arc::new(TestRunRepository {
        fail_insert: true,
        ..TestRunRepository::default()
    });
    let storage = Arc::new(TestObjectStorage {
        fail_remove: true,
        ..TestObjectStorage::default()
    });
    let service = service(repository.clone(), storage.clone());

    let result = service
        .create_run(complete_input(Some(png_upload("a.png"))))
        .await;

    assert!(matches!(
        result,
        Err(AppError::Upstream(message)) if message == "failed to save run"
    ));
    assert_eq!(lock(&storage.removed).map(|removed| removed.len()).ok(), Some(1));
    assert!(lock(&repository.rows).map(|rows| rows.is_empty()).unwrap_or(false));
}

#[tokio::test]
async fn list_isolates_signing_failures_per_row() {
    let repository = Arc::new(TestRunRepository {
        rows: Mutex::new(vec![
            stored_row(
                Some("https://h.supabase.co/storage/v1/object/public/myrun_bk/1-a.png"),
                9,
            ),
            stored_row(
                Some("https://h.supabase.co/storage/v1/object/public/myrun_bk/2-missing.png"),
                8,
            ),
            stored_row(None, 7),
            stored_row(Some("3-c.webp"), 6),
        ]),
        ..TestRunRepository::default()
    });
    let storage = Arc::new(TestObjectStorage {
        unsignable_keys: vec!["2-missing.png".to_owned()],
        ..TestObjectStorage::default()
    });
    let service = service(repository, storage.clone());

    let listings = service.list_runs().await;

    let Ok(listings) = listings else {
        panic!("expected listing to succeed");
    };
    let display_urls = listings
        .iter()
        .map(|listing| listing.display_image_url.as_deref())
        .collect::<Vec<_>>();
    assert_eq!(
        display_urls,
        vec![
            Some("https://h.supabase.co/storage/v1/object/sign/myrun_bk/1-a.png?token=signed"),
            None,
            None,
            Some("https://h.supabase.co/storage/v1/object/sign/myrun_bk/3-c.webp?token=signed"),
        ]
    );
}

#[tokio::test]
async fn list_signs_bucket_relative_keys_with_configured_ttl() {
    let repository = Arc::new(TestRunRepository {
        rows: Mutex::new(vec![stored_row(
            Some("https://h.supabase.co/storage/v1/object/sign/myrun_bk/old.jpg?token=expired"),
            5,
        )]),
        ..TestRunRepository::default()
    });
    let storage = Arc::new(TestObjectStorage::default());
    let service = service(repository, storage.clone());

    assert!(service.list_runs().await.is_ok());

    let signed = lock(&storage.signed).map(|signed| signed.clone()).unwrap_or_default();
    assert_eq!(signed, vec![("old.jpg".to_owned(), 604_800)]);
}

#[tokio::test]
async fn list_signs_percent_encoded_urls_with_the_uploaded_key() {
    let repository = Arc::new(TestRunRepository {
        rows: Mutex::new(vec![stored_row(
            Some(
                "https://h.supabase.co/storage/v1/object/public/myrun_bk/1-%E0%B8%A7%E0%B8%B4%E0%B9%88%E0%B8%87.png",
            ),
            5,
        )]),
        ..TestRunRepository::default()
    });
    let storage = Arc::new(TestObjectStorage::default());
    let service = service(repository, storage.clone());

    assert!(service.list_runs().await.is_ok());

    let signed = lock(&storage.signed).map(|signed| signed.clone()).unwrap_or_default();
    assert_eq!(signed, vec![("1-วิ่ง.png".to_owned(), 604_800)]);
}

#[tokio::test]
async fn list_failure_surfaces_user_facing_message() {
    let repository = Arc::new(TestRunRepository {
        fail_list: true,
        ..TestRunRepository::default()
    });
    let service = service(repository, Arc::new(TestObjectStorage::default()));

    let result = service.list_runs().await;

    assert!(matches!(
        result,
        Err(AppError::Upstream(message)) if message == "failed to load runs"
    ));
}

#[tokio::test]
async fn delete_removes_row_and_reports_missing_rows() {
    let row = stored_row(None, 1);
    let run_id = row.id();
    let repository = Arc::new(TestRunRepository {
        rows: Mutex::new(vec![row]),
        ..TestRunRepository::default()
    });
    let service = service(repository.clone(), Arc::new(TestObjectStorage::default()));

    assert!(service.delete_run(run_id).await.is_ok());
    assert!(lock(&repository.rows).map(|rows| rows.is_empty()).unwrap_or(false));
    assert!(matches!(
        service.delete_run(run_id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn delete_failure_surfaces_user_facing_message() {
    let row = stored_row(None, 1);
    let run_id = row.id();
    let repository = Arc::new(TestRunRepository {
        rows: Mutex::new(vec![row]),
        fail_delete: true,
        ..TestRunRepository::default()
    });
    let service = service(repository.clone(), Arc::new(TestObjectStorage::default()));

    let result = service.delete_run(run_id).await;

    assert!(matches!(
        result,
        Err(AppError::Upstream(message)) if message == "failed to delete run"
    ));
    assert_eq!(lock(&repository.rows).map(|rows| rows.len()).ok(), Some(1));
}
