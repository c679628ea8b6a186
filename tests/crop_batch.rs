//! Feature-card cropping against generated screenshots

mod common;

use common::fixtures::{self, SCREENSHOT_H, SCREENSHOT_W};
use site_assets::config::CropConfig;
use site_assets::crop::{run_crop_batch, CropJob, CropOutcome, CropRect, Cropper, FEATURE_CARD_JOBS};
use site_assets::error::{ErrorSeverity, HasSeverity};
use tempfile::TempDir;

fn config_in(root: &TempDir) -> CropConfig {
    let source_dir = root.path().join("screens");
    std::fs::create_dir_all(&source_dir).unwrap();
    CropConfig {
        source_dir,
        output_dir: root.path().join("out/feat-cards"),
        ..CropConfig::default()
    }
}

#[test]
fn test_full_table_on_real_sized_screenshots() {
    let root = TempDir::new().unwrap();
    let config = config_in(&root);
    let screenshot = fixtures::gradient(SCREENSHOT_W, SCREENSHOT_H);
    for job in &FEATURE_CARD_JOBS {
        fixtures::write(&config.source_dir, job.source, &screenshot);
    }

    let summary = run_crop_batch(config.clone(), &FEATURE_CARD_JOBS).unwrap();
    assert_eq!(summary.written(), 6);
    assert!(summary.is_success());

    for job in &FEATURE_CARD_JOBS {
        let card = image::open(config.output_dir.join(job.output)).unwrap();
        // 1080x1270 regions scale to 540x635
        assert_eq!((card.width(), card.height()), (540, 635), "{}", job.output);
    }
}

#[test]
fn test_missing_sources_are_skipped() {
    let root = TempDir::new().unwrap();
    let config = config_in(&root);
    let present = &FEATURE_CARD_JOBS[2];
    fixtures::write(
        &config.source_dir,
        present.source,
        &fixtures::gradient(SCREENSHOT_W, SCREENSHOT_H),
    );

    let summary = run_crop_batch(config.clone(), &FEATURE_CARD_JOBS).unwrap();
    assert_eq!(summary.written(), 1);
    assert_eq!(summary.skipped(), 5);
    assert!(summary.is_success());

    let produced: Vec<_> = std::fs::read_dir(&config.output_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(produced, [present.output]);
}

#[test]
fn test_height_is_rounded() {
    let root = TempDir::new().unwrap();
    let config = config_in(&root);
    fixtures::write(&config.source_dir, "odd.png", &fixtures::gradient(400, 400));

    // 333x101 -> 540 x 163.78.. -> 164
    let jobs = [CropJob {
        source: "odd.png",
        rect: CropRect::new(10, 20, 343, 121),
        output: "odd.jpg",
    }];
    let summary = run_crop_batch(config.clone(), &jobs).unwrap();
    match &summary.records[0].outcome {
        CropOutcome::Written { size, path, .. } => {
            assert_eq!((size.w, size.h), (540, 164));
            let card = image::open(path).unwrap();
            assert_eq!(card.height(), 164);
        }
        other => panic!("expected a written card, got {:?}", other),
    }
}

#[test]
fn test_out_of_bounds_rect_fails_without_stopping_the_batch() {
    let root = TempDir::new().unwrap();
    let config = config_in(&root);
    fixtures::write(&config.source_dir, "small.jpg", &fixtures::gradient(800, 600));
    fixtures::write(&config.source_dir, "ok.jpg", &fixtures::gradient(800, 600));

    let jobs = [
        CropJob {
            source: "small.jpg",
            rect: CropRect::new(0, 80, 1080, 1350),
            output: "bad.jpg",
        },
        CropJob {
            source: "ok.jpg",
            rect: CropRect::new(0, 0, 800, 300),
            output: "good.jpg",
        },
    ];
    let summary = run_crop_batch(config.clone(), &jobs).unwrap();
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.written(), 1);
    assert!(!summary.is_success());
    assert!(!config.output_dir.join("bad.jpg").exists());

    match &summary.records[0].outcome {
        CropOutcome::Failed(err) => {
            assert_eq!(err.category(), "geometry");
            assert_eq!(err.severity(), ErrorSeverity::Error);
            assert!(err.to_string().starts_with("cropping bad.jpg: Geometry error for small.jpg"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn test_undecodable_source_fails() {
    let root = TempDir::new().unwrap();
    let config = config_in(&root);
    std::fs::write(config.source_dir.join("junk.jpg"), b"not a jpeg").unwrap();

    let jobs = [CropJob {
        source: "junk.jpg",
        rect: CropRect::new(0, 0, 10, 10),
        output: "junk-card.jpg",
    }];
    let summary = run_crop_batch(config, &jobs).unwrap();
    assert_eq!(summary.failed(), 1);
}

#[test]
fn test_rounded_variant_is_written() {
    let root = TempDir::new().unwrap();
    let mut config = config_in(&root);
    config.rounded_radius = Some(24);
    fixtures::write(&config.source_dir, "s.png", &fixtures::solid(1080, 1080, [200, 40, 40]));

    let jobs = [CropJob {
        source: "s.png",
        rect: CropRect::new(0, 0, 1080, 1080),
        output: "card.jpg",
    }];
    let mut cropper = Cropper::new(config.clone()).unwrap();
    let summary = cropper.run(&jobs);

    let CropOutcome::Written { rounded: Some(rounded), .. } = &summary.records[0].outcome else {
        panic!("expected rounded output");
    };
    assert_eq!(rounded, &config.output_dir.join("card-rounded.png"));

    let png = image::open(rounded).unwrap().to_rgba8();
    assert_eq!(png.dimensions(), (540, 540));
    assert_eq!(png.get_pixel(0, 0).0[3], 0);
    assert_eq!(png.get_pixel(270, 270).0[3], 255);
}

#[test]
fn test_invalid_config_is_rejected() {
    let root = TempDir::new().unwrap();
    let mut config = config_in(&root);
    config.target_width = 0;
    let err = run_crop_batch(config, &FEATURE_CARD_JOBS).unwrap_err();
    assert_eq!(err.category(), "config");
    assert_eq!(err.severity(), ErrorSeverity::Fatal);
    assert!(err.to_string().starts_with("Invalid configuration: target_width=\"0\""));
}
