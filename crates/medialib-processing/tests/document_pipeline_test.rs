//! End-to-end document preview pipeline tests over local storage and a
//! scripted conversion service.

use medialib_core::{
    DocumentPreviewConfig, File, MediaType, ThumbConfig, TRANSFORMATION_PREVIEW,
};
use medialib_processing::test_helpers::{png_bytes, MockConversionService};
use medialib_processing::{
    DocumentPreviewTransformer, MemoryTransformationStore, TransformError, Transformer,
};
use medialib_storage::{DiskRegistry, LocalStorage, Storage};
use std::sync::Arc;
use uuid::Uuid;

struct Harness {
    transformer: DocumentPreviewTransformer,
    converter: Arc<MockConversionService>,
    storage: Arc<LocalStorage>,
    store: Arc<MemoryTransformationStore>,
    _dir: tempfile::TempDir,
}

async fn harness(config: DocumentPreviewConfig, converter: MockConversionService) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(
        LocalStorage::new(dir.path(), "http://localhost:3000/media".to_string())
            .await
            .unwrap(),
    );
    let mut disks = DiskRegistry::new();
    disks.register("media", storage.clone());

    let converter = Arc::new(converter);
    let store = Arc::new(MemoryTransformationStore::new());

    let transformer = DocumentPreviewTransformer::new(
        "thumb",
        config,
        converter.clone(),
        Arc::new(disks),
        store.clone(),
    )
    .unwrap();

    Harness {
        transformer,
        converter,
        storage,
        store,
        _dir: dir,
    }
}

fn document_file() -> File {
    File {
        id: Uuid::new_v4(),
        disk: "media".to_string(),
        extension: "docx".to_string(),
        media_type: MediaType::Document,
        download_url: "https://media.example.com/source.docx".to_string(),
    }
}

fn fit_config() -> DocumentPreviewConfig {
    DocumentPreviewConfig {
        thumb: ThumbConfig {
            fit: true,
            width: Some(200),
            height: Some(200),
            upsize: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_success_persists_preview_then_returns_thumb() {
    let h = harness(fit_config(), MockConversionService::succeed(png_bytes(800, 400))).await;
    let file = document_file();

    let thumb = h.transformer.transform(&file).await.unwrap().unwrap();

    assert_eq!(thumb.name, "thumb");
    assert!(thumb.completed);
    assert_eq!(thumb.media_type, MediaType::Image);
    assert_eq!(thumb.mime_type, "image/png");
    assert_eq!((thumb.width, thumb.height), (Some(200), Some(200)));

    // Preview persisted with the source dimensions.
    let saved = h.store.saved_for(file.id);
    assert_eq!(saved.len(), 1);
    let preview = &saved[0];
    assert_eq!(preview.name, TRANSFORMATION_PREVIEW);
    assert!(preview.completed);
    assert_eq!((preview.width, preview.height), (Some(800), Some(400)));

    // Both artifacts live at File-derived keys.
    assert!(h
        .storage
        .exists(&file.preview_key(&preview.extension))
        .await
        .unwrap());
    assert!(h.storage.exists(&file.path_for(&thumb)).await.unwrap());

    // Remote job released exactly once.
    assert_eq!(h.converter.delete_count(), 1);
}

#[tokio::test]
async fn test_output_format_override_sets_preview_extension() {
    let mut config = fit_config();
    config
        .output_formats
        .insert("docx".to_string(), "png".to_string());
    config.extension = "jpg".to_string();

    let h = harness(config, MockConversionService::succeed(png_bytes(100, 100))).await;
    let file = document_file();

    let thumb = h.transformer.transform(&file).await.unwrap().unwrap();
    assert_eq!(thumb.extension, "png");
    assert!(h.storage.exists(&file.preview_key("png")).await.unwrap());
}

#[tokio::test]
async fn test_content_failure_skips_without_side_effects() {
    let h = harness(
        fit_config(),
        MockConversionService::fail_content("password protected"),
    )
    .await;
    let file = document_file();

    let result = h.transformer.transform(&file).await.unwrap();
    assert!(result.is_none());

    assert!(h.store.saved_for(file.id).is_empty());
    assert!(!h.storage.exists(&file.preview_key("jpg")).await.unwrap());
    // No job existed, so nothing to release.
    assert_eq!(h.converter.delete_count(), 0);
}

#[tokio::test]
async fn test_service_failure_surfaces_retryable_error() {
    let h = harness(fit_config(), MockConversionService::fail_service()).await;
    let file = document_file();

    let err = h.transformer.transform(&file).await.unwrap_err();
    assert!(matches!(err, TransformError::Convert(_)));
    assert!(err.is_retryable());
    assert!(h.store.saved_for(file.id).is_empty());
}

#[tokio::test]
async fn test_fetch_failure_still_releases_remote_job() {
    let h = harness(
        fit_config(),
        MockConversionService::succeed(png_bytes(100, 100)).with_failing_fetch(),
    )
    .await;
    let file = document_file();

    let err = h.transformer.transform(&file).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(h.converter.delete_count(), 1);
    assert!(h.store.saved_for(file.id).is_empty());
}

#[tokio::test]
async fn test_delete_failure_does_not_affect_result() {
    let h = harness(
        fit_config(),
        MockConversionService::succeed(png_bytes(800, 400)).with_failing_delete(),
    )
    .await;
    let file = document_file();

    let thumb = h.transformer.transform(&file).await.unwrap().unwrap();
    assert!(thumb.completed);
    assert_eq!(h.converter.delete_count(), 1);
    assert_eq!(h.store.saved_for(file.id).len(), 1);
}

#[tokio::test]
async fn test_rerun_overwrites_with_identical_artifacts() {
    let h = harness(fit_config(), MockConversionService::succeed(png_bytes(800, 400))).await;
    let file = document_file();

    let first = h.transformer.transform(&file).await.unwrap().unwrap();
    let second = h.transformer.transform(&file).await.unwrap().unwrap();

    assert_eq!(first.name, second.name);
    assert_eq!(first.extension, second.extension);
    assert_eq!(first.mime_type, second.mime_type);
    assert_eq!((first.width, first.height), (second.width, second.height));

    // One preview record per run; same key both times.
    assert_eq!(h.store.saved_for(file.id).len(), 2);
    assert!(h.storage.exists(&file.path_for(&second)).await.unwrap());
}

#[tokio::test]
async fn test_proportional_resize_config() {
    let config = DocumentPreviewConfig {
        thumb: ThumbConfig {
            fit: false,
            width: Some(200),
            height: None,
            aspect: true,
            upsize: true,
        },
        ..Default::default()
    };

    let h = harness(config, MockConversionService::succeed(png_bytes(800, 400))).await;
    let file = document_file();

    let thumb = h.transformer.transform(&file).await.unwrap().unwrap();
    assert_eq!((thumb.width, thumb.height), (Some(200), Some(100)));
}
