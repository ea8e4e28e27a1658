mod common;

use common::*;
use pdf_resume::*;
use tempfile::TempDir;

fn a4_surface(variant: TemplateVariant, data: ResumeData) -> TemplateSurface {
    TemplateSurface::for_page(variant, data, &PageGeometry::a4())
}

#[test]
fn test_hiding_sections_shrinks_content() {
    let mut surface = a4_surface(TemplateVariant::Modern, long_resume(4));
    let full = surface.content_height_px();

    surface.set_section_visible(Section::Experience, false);
    let without_experience = surface.content_height_px();
    assert!(without_experience < full);
    assert!(!surface.is_section_visible(Section::Experience));

    surface.set_section_visible(Section::Experience, true);
    assert_eq!(surface.content_height_px(), full);
}

#[test]
fn test_empty_sections_are_not_visible() {
    let surface = a4_surface(TemplateVariant::Classic, sample_resume());
    assert!(surface.is_section_visible(Section::Summary));
    assert!(!surface.is_section_visible(Section::Certifications));
    assert!(!surface.is_section_visible(Section::Photo));
}

#[test]
fn test_compaction_shrinks_content() {
    for variant in TemplateVariant::ALL {
        let mut surface = a4_surface(variant, long_resume(6));
        let natural = surface.content_height_px();

        surface.apply_compact_mode();
        let compact = surface.content_height_px();
        assert!(compact < natural, "{} compact", variant);

        surface.compact_blocks(constants::MIN_READABLE_FONT_PX, constants::COMPACT_PHOTO_PX);
        assert!(surface.content_height_px() <= compact, "{} blocks", variant);

        surface.reset_presentation();
        assert_eq!(surface.content_height_px(), natural);
    }
}

#[test]
fn test_visual_scale_widens_layout_and_scales_height() {
    let mut surface = a4_surface(TemplateVariant::Modern, long_resume(3));
    let width = surface.rendered_width_px();

    surface.apply_visual_scale(0.75);
    // Rendered width stays the page width; layout runs wider so it fills it
    assert_eq!(surface.rendered_width_px(), width);
    assert!((surface.logical_width_px() - width / 0.75).abs() < 1e-3);

    let layout_height = surface.layout().height_px;
    assert!((surface.content_height_px() - layout_height * 0.75).abs() < 1e-3);
}

#[test]
fn test_unknown_template_is_rejected() {
    assert!(matches!(
        TemplateVariant::from_key("baroque"),
        Err(ResumeError::TemplateNotFound(_))
    ));
    assert_eq!(
        "Creative".parse::<TemplateVariant>().unwrap(),
        TemplateVariant::Creative
    );
}

#[tokio::test]
async fn test_skia_end_to_end_paginates() {
    let dir = TempDir::new().unwrap();
    let options = GenerationOptions {
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let mut planned = a4_surface(TemplateVariant::Modern, long_resume(60));
    let plan = plan_generation(&mut planned, &options).await.unwrap();

    let assembler =
        DocumentAssembler::new(SkiaRasterizer, PrintPdfBuilder::new("Ada Lovelace"), options)
            .unwrap();
    let mut surface = a4_surface(TemplateVariant::Modern, long_resume(60));
    let owner = surface.data().personal.full_name.clone();
    let report = assembler.generate(&mut surface, &owner).await.unwrap();

    assert!(report.paginated);
    assert_eq!(report.page_count, plan.page_count);
    assert_eq!(report.bitmap_width, plan.bitmap_width);
    assert_eq!(report.bitmap_height, plan.bitmap_height);
    assert_eq!(report.fit.tier, CompactionTier::Aggressive);
    assert_eq!(surface.visibility(), Visibility::Hidden);

    let document = lopdf::Document::load(&report.path).unwrap();
    assert_eq!(document.get_pages().len(), report.page_count);
    assert_eq!(
        report.path.file_name().unwrap(),
        std::ffi::OsStr::new("Ada_Lovelace_Resume.pdf")
    );
}

#[tokio::test]
async fn test_skia_short_resume_single_page() {
    let dir = TempDir::new().unwrap();
    let options = GenerationOptions {
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let assembler =
        DocumentAssembler::new(SkiaRasterizer, PrintPdfBuilder::default(), options).unwrap();
    let mut surface = a4_surface(TemplateVariant::Creative, sample_resume());

    let report = assembler.generate(&mut surface, "Ada Lovelace").await.unwrap();
    assert!(!report.paginated);
    assert_eq!(report.page_count, 1);
    assert_eq!(report.fit.tier, CompactionTier::None);
}

#[tokio::test]
async fn test_missing_photo_does_not_block_generation() {
    let dir = TempDir::new().unwrap();
    let options = GenerationOptions {
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let assembler =
        DocumentAssembler::new(SkiaRasterizer, PrintPdfBuilder::default(), options).unwrap();
    let mut data = sample_resume();
    data.photo = Some(dir.path().join("missing.png"));
    let mut surface = a4_surface(TemplateVariant::Modern, data);

    let report = assembler.generate(&mut surface, "Ada").await.unwrap();
    assert_eq!(report.page_count, 1);
}

#[tokio::test]
async fn test_unreadable_photo_is_left_out() {
    let dir = TempDir::new().unwrap();
    let mut data = sample_resume();
    data.photo = Some(dir.path().join("missing.png"));
    let mut surface = a4_surface(TemplateVariant::Modern, data.clone());
    assert!(surface.is_section_visible(Section::Photo));

    surface.wait_until_ready().await;

    assert!(!surface.is_section_visible(Section::Photo));
    assert!(
        !surface
            .layout()
            .items
            .iter()
            .any(|item| matches!(item, DrawItem::Photo { .. }))
    );
    assert!(surface.scene().photo.is_none());

    // Same height as a resume that never had a photo
    let mut without = data;
    without.photo = None;
    let plain = a4_surface(TemplateVariant::Modern, without);
    assert_eq!(surface.content_height_px(), plain.content_height_px());
}

#[tokio::test]
async fn test_plan_matches_generation_with_unreadable_photo() {
    let dir = TempDir::new().unwrap();
    let options = GenerationOptions {
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let mut data = long_resume(10);
    data.photo = Some(dir.path().join("missing.png"));

    let mut planned = a4_surface(TemplateVariant::Classic, data.clone());
    let plan = plan_generation(&mut planned, &options).await.unwrap();
    assert!(!planned.is_section_visible(Section::Photo));

    let assembler =
        DocumentAssembler::new(SkiaRasterizer, PrintPdfBuilder::default(), options).unwrap();
    let mut surface = a4_surface(TemplateVariant::Classic, data);
    let report = assembler.generate(&mut surface, "Ada").await.unwrap();

    assert_eq!(report.bitmap_height, plan.bitmap_height);
    assert_eq!(report.page_count, plan.page_count);
}

#[test]
fn test_photo_is_painted_into_frame() {
    let photo = image::RgbaImage::from_pixel(40, 40, image::Rgba([200, 0, 0, 255]));
    let mut data = sample_resume();
    data.photo = Some("photo.png".into());
    let surface = a4_surface(TemplateVariant::Modern, data).with_photo(photo);
    assert!(surface.is_section_visible(Section::Photo));

    let scene = surface.scene();
    let options = RasterOptions {
        scale: 1.0,
        background: Rgb::WHITE,
        width_px: surface.rendered_width_px(),
        height_px: surface.content_height_px(),
    };
    let bitmap = paint_scene(&scene, &options).unwrap();

    let has_red = bitmap
        .as_image()
        .pixels()
        .any(|p| p.0[0] > 180 && p.0[1] < 40 && p.0[2] < 40);
    assert!(has_red);
}
