use pdf_resume::*;
use tempfile::TempDir;

#[test]
fn test_default_options_are_valid() {
    let options = GenerationOptions::default();
    options.validate().unwrap();
    assert_eq!(options.raster_scale, constants::DEFAULT_RASTER_SCALE);
    assert_eq!(options.single_page_placement, SinglePagePlacement::FillPage);
    assert_eq!(options.filename_suffix, constants::FILENAME_SUFFIX);

    let geometry = options.page_geometry().unwrap();
    assert_eq!(geometry.width_mm(), 210.0);
    assert_eq!(geometry.height_mm(), 297.0);
}

#[test]
fn test_invalid_options() {
    let mut options = GenerationOptions::default();
    options.fit.scale_ratio = 1.0;
    assert!(matches!(options.validate(), Err(ResumeError::Config(_))));

    let mut options = GenerationOptions::default();
    options.fit.min_scale = 1.5;
    assert!(options.validate().is_err());

    let mut options = GenerationOptions::default();
    options.filename_suffix.clear();
    assert!(options.validate().is_err());

    let options = GenerationOptions {
        paper_size: PaperSize::Custom {
            width_mm: 0.0,
            height_mm: 100.0,
        },
        ..Default::default()
    };
    assert!(matches!(
        options.validate(),
        Err(ResumeError::InvalidGeometry(_))
    ));
}

#[test]
fn test_landscape_swaps_dimensions() {
    let options = GenerationOptions {
        orientation: Orientation::Landscape,
        ..Default::default()
    };
    let geometry = options.page_geometry().unwrap();
    assert_eq!(geometry.width_mm(), 297.0);
    assert_eq!(geometry.height_mm(), 210.0);
}

#[tokio::test]
async fn test_options_json_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("options.json");

    let mut options = GenerationOptions {
        paper_size: PaperSize::Letter,
        raster_scale: 2.0,
        single_page_placement: SinglePagePlacement::FitWidth,
        ..Default::default()
    };
    options.fit.min_scale = 0.6;
    options.save(&path).await.unwrap();

    let loaded = GenerationOptions::load(&path).await.unwrap();
    assert_eq!(loaded, options);
}

#[tokio::test]
async fn test_partial_options_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("options.json");
    tokio::fs::write(&path, r#"{ "raster_scale": 2.5 }"#)
        .await
        .unwrap();

    let loaded = GenerationOptions::load(&path).await.unwrap();
    assert_eq!(loaded.raster_scale, 2.5);
    assert_eq!(loaded.fit, FitThresholds::default());
}

#[tokio::test]
async fn test_malformed_options_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("options.json");
    tokio::fs::write(&path, "not json").await.unwrap();

    assert!(matches!(
        GenerationOptions::load(&path).await,
        Err(ResumeError::Config(_))
    ));
}

#[tokio::test]
async fn test_resume_data_loads_from_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("resume.json");
    tokio::fs::write(
        &path,
        r#"{
            "personal": { "full_name": "Grace Hopper", "email": "grace@example.org" },
            "summary": "Compiler pioneer.",
            "skills": ["COBOL", "FLOW-MATIC"]
        }"#,
    )
    .await
    .unwrap();

    let data = ResumeData::load(&path).await.unwrap();
    assert_eq!(data.personal.full_name, "Grace Hopper");
    assert_eq!(data.skills.len(), 2);
    assert!(data.experience.is_empty());
    assert_eq!(data.file_name(), "Grace_Hopper_Resume.pdf");
}
