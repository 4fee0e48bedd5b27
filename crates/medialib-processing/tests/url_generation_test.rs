//! URL generation across delivery policies.

use medialib_core::{File, MediaType, Transformation};
use medialib_processing::{
    LocalUrlGenerator, S3UrlConfig, S3UrlGenerator, UrlError, UrlGeneratorRegistry,
};
use std::sync::Arc;
use uuid::Uuid;

fn document_file() -> File {
    File {
        id: Uuid::new_v4(),
        disk: "media".to_string(),
        extension: "docx".to_string(),
        media_type: MediaType::Document,
        download_url: "https://media.example.com/source.docx".to_string(),
    }
}

fn registry() -> UrlGeneratorRegistry {
    let mut registry = UrlGeneratorRegistry::new();
    registry.register(
        "public",
        Arc::new(S3UrlGenerator::new(S3UrlConfig {
            region: "eu-west-1".to_string(),
            bucket: "media-bucket".to_string(),
        })),
    );
    registry.register(
        "local",
        Arc::new(LocalUrlGenerator::new("http://localhost:3000/media")),
    );
    registry
}

#[tokio::test]
async fn test_policies_resolve_the_same_target() {
    let registry = registry();
    let file = document_file();

    let public = registry
        .get("public")
        .unwrap()
        .url_for_transformation(&file, None, true, false)
        .await
        .unwrap();
    let local = registry
        .get("local")
        .unwrap()
        .url_for_transformation(&file, None, true, false)
        .await
        .unwrap();

    let suffix = format!("{}/preview.jpg", file.id);
    assert!(public.ends_with(&suffix));
    assert!(local.ends_with(&suffix));
}

#[tokio::test]
async fn test_transformation_addressing_is_uniform() {
    let registry = registry();
    let file = document_file();
    let thumb = Transformation {
        name: "thumb".to_string(),
        media_type: MediaType::Image,
        extension: "png".to_string(),
        mime_type: "image/png".to_string(),
        width: Some(200),
        height: Some(200),
        size: 2048,
        completed: true,
    };

    let url = registry
        .get("public")
        .unwrap()
        .url_for_transformation(&file, Some(&thumb), false, false)
        .await
        .unwrap();
    assert!(url.ends_with(&format!("{}/thumb.png", file.id)));
}

#[tokio::test]
async fn test_unsigned_policies_reject_forced_download() {
    let registry = registry();
    let file = document_file();

    for policy in ["public", "local"] {
        let generator = registry.get(policy).unwrap();
        assert!(!generator.supports_forced_download());

        let err = generator
            .url_for_transformation(&file, None, false, true)
            .await
            .unwrap_err();
        assert!(matches!(err, UrlError::UnsupportedOption(_)));
    }
}

#[tokio::test]
async fn test_unknown_policy_is_none() {
    assert!(registry().get("cdn").is_none());
}
