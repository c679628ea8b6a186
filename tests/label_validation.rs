//! Label validation runs with a mock classifier, the pixel-statistics fallback and a
//! stub model API

mod common;

use common::fixtures;
use common::mock_classifier::MockClassifier;
use common::stub_server::{chat_reply, Reply, StubServer};
use site_assets::config::{ValidateConfig, VisionConfig};
use site_assets::labels::{
    list_images, run_validation, select_classifier, Classifier, ExpectedLabelTable, Label,
    PixelStatsClassifier, Status, Validator, VisionClassifier, DEFAULT_PASS_THRESHOLD,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

fn image_dir(names: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in names {
        fixtures::write(dir.path(), name, &fixtures::solid(16, 16, [120, 100, 90]));
    }
    dir
}

#[test]
fn test_listing_puts_jpg_before_png() {
    let dir = image_dir(&["b.png", "z.jpg", "a.png", "m.jpg"]);
    std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
    std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();

    let names: Vec<_> = list_images(dir.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["m.jpg", "z.jpg", "a.png", "b.png"]);
}

#[test]
fn test_listing_missing_dir_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = list_images(&dir.path().join("absent")).unwrap_err();
    assert_eq!(err.category(), "io");
}

#[test]
fn test_statuses_per_image() {
    let dir = image_dir(&["bus-commute.jpg", "city-skyline.jpg", "logo.png", "city-night.jpg"]);
    let classifier = MockClassifier::new()
        .with_labels("bus-commute.jpg", &[("Bus Stop", 0.9), ("Outdoor", 0.5)])
        .with_labels("city-skyline.jpg", &[("Forest", 0.8), ("Tree", 0.6)])
        .with_labels("logo.png", &[("Text", 0.9)])
        .failing_on("city-night.jpg");
    let table = ExpectedLabelTable::builtin();
    let images = list_images(dir.path()).unwrap();

    let report = Validator::new(&classifier, &table, DEFAULT_PASS_THRESHOLD).run(&images);

    // every image is classified exactly once
    assert_eq!(classifier.calls().len(), 4);

    let bus = &report.images["bus-commute.jpg"];
    assert_eq!(bus.status, Status::Pass);
    assert_eq!(bus.matched.as_deref(), Some(&["bus".to_string()][..]));
    assert_eq!(bus.match_ratio, Some(0.2));
    assert_eq!(bus.labels, ["Bus Stop (90.0%)", "Outdoor (50.0%)"]);

    assert_eq!(report.images["city-skyline.jpg"].status, Status::Fail);
    assert_eq!(report.images["logo.png"].status, Status::Skip);

    let night = &report.images["city-night.jpg"];
    assert_eq!(night.status, Status::Error);
    assert!(night.error.as_deref().unwrap().contains("timed out"));

    let tally = report.tally();
    assert_eq!((tally.pass, tally.fail, tally.skip, tally.error), (1, 1, 1, 1));
    assert_eq!(report.exit_code(false), 1);
}

#[test]
fn test_errors_only_fail_in_strict_mode() {
    let dir = image_dir(&["bus-commute.jpg", "city-night.jpg"]);
    let classifier = MockClassifier::new()
        .with_labels("bus-commute.jpg", &[("school bus", 0.9)])
        .failing_on("city-night.jpg");
    let table = ExpectedLabelTable::builtin();
    let images = list_images(dir.path()).unwrap();

    let report = Validator::new(&classifier, &table, DEFAULT_PASS_THRESHOLD).run(&images);
    assert_eq!(report.exit_code(false), 0);
    assert_eq!(report.exit_code(true), 1);
}

#[test]
fn test_pixel_stats_labels() {
    let dir = TempDir::new().unwrap();
    let dark = fixtures::write(dir.path(), "dark.png", &fixtures::solid(64, 32, [20, 20, 30]));
    let bright = fixtures::write(dir.path(), "bright.png", &fixtures::solid(64, 32, [240, 240, 230]));
    let mid = fixtures::write(dir.path(), "mid.png", &fixtures::solid(64, 32, [128, 128, 128]));

    let classifier = PixelStatsClassifier;
    let names = |path: &Path| -> Vec<String> {
        classifier
            .classify(path)
            .unwrap()
            .into_iter()
            .map(|l| l.label)
            .collect()
    };

    let dark_labels = names(&dark);
    assert!(dark_labels.contains(&"image_loaded".to_string()));
    assert!(dark_labels.contains(&"size_64x32".to_string()));
    assert!(dark_labels.contains(&"mode_rgb8".to_string()));
    assert!(dark_labels.contains(&"dark_scene".to_string()));

    assert!(names(&bright).contains(&"bright_scene".to_string()));

    let mid_labels = names(&mid);
    assert!(!mid_labels.iter().any(|l| l.ends_with("_scene")));
    assert!(mid_labels.contains(&"brightness_128".to_string()));
}

#[test]
fn test_run_validation_writes_report() {
    let root = TempDir::new().unwrap();
    let images_dir = root.path().join("images");
    std::fs::create_dir(&images_dir).unwrap();
    fixtures::write(&images_dir, "hero-city.jpg", &fixtures::solid(32, 32, [30, 30, 40]));
    fixtures::write(&images_dir, "extra.png", &fixtures::solid(32, 32, [30, 30, 40]));

    let config = ValidateConfig {
        images_dir,
        report_path: root.path().join("scripts/image_report.json"),
        vision: VisionConfig::default(),
        ..ValidateConfig::default()
    };
    let report = run_validation(&config).unwrap();
    assert_eq!(report.classifier, "pixel-stats");

    // fallback labels never carry the expected vocabulary
    assert_eq!(report.images["hero-city.jpg"].status, Status::Fail);
    assert_eq!(report.images["extra.png"].status, Status::Skip);
    assert_eq!(report.exit_code(config.strict), 1);

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config.report_path).unwrap()).unwrap();
    assert_eq!(written["hero-city.jpg"]["status"], "fail");
    assert_eq!(written["hero-city.jpg"]["match_ratio"], 0.0);
    assert_eq!(written["extra.png"]["status"], "skip");
}

#[test]
fn test_run_validation_uses_custom_table() {
    let root = TempDir::new().unwrap();
    let images_dir = root.path().join("images");
    std::fs::create_dir(&images_dir).unwrap();
    fixtures::write(&images_dir, "night.png", &fixtures::solid(32, 32, [10, 10, 10]));
    let table_path = root.path().join("labels.json");
    std::fs::write(&table_path, r#"{"night.png": ["dark"]}"#).unwrap();

    let config = ValidateConfig {
        images_dir,
        report_path: root.path().join("report.json"),
        expected_labels: Some(table_path),
        ..ValidateConfig::default()
    };
    let report = run_validation(&config).unwrap();
    assert_eq!(report.images["night.png"].status, Status::Pass);
    assert_eq!(report.exit_code(false), 0);
}

#[test]
fn test_empty_image_dir_is_an_error() {
    let root = TempDir::new().unwrap();
    let config = ValidateConfig {
        images_dir: root.path().to_path_buf(),
        report_path: root.path().join("report.json"),
        ..ValidateConfig::default()
    };
    assert!(run_validation(&config).is_err());
    assert!(!config.report_path.exists());
}

fn vision_config(server: &StubServer, timeout: Duration) -> VisionConfig {
    VisionConfig {
        endpoint: Some(server.base_url()),
        timeout,
        ..VisionConfig::default()
    }
}

#[test]
fn test_unreachable_model_list_falls_back_to_pixel_stats() {
    let server = StubServer::start(|path| match path {
        "/v1/models" => Reply::json(404, r#"{"error":"not found"}"#),
        _ => Reply::json(500, "{}"),
    });
    let classifier = select_classifier(&vision_config(&server, Duration::from_secs(5)));
    assert_eq!(classifier.name(), "pixel-stats");
}

#[test]
fn test_answering_model_list_selects_vision() {
    let server = StubServer::start(|_| Reply::json(200, r#"{"data":[{"id":"qwen3-vl"}]}"#));
    let classifier = select_classifier(&vision_config(&server, Duration::from_secs(5)));
    assert_eq!(classifier.name(), "vision");
}

#[test]
fn test_vision_reply_is_sorted_by_confidence() {
    let server = StubServer::start(|path| match path {
        "/v1/chat/completions" => Reply::json(
            200,
            chat_reply(r#"[{"label":"outdoor","confidence":0.5},{"label":"Bus Stop","confidence":0.9}]"#),
        ),
        _ => Reply::json(404, "{}"),
    });
    let dir = image_dir(&["bus-commute.jpg"]);

    let classifier = VisionClassifier::new(&vision_config(&server, Duration::from_secs(5))).unwrap();
    let labels = classifier.classify(&dir.path().join("bus-commute.jpg")).unwrap();
    assert_eq!(labels, vec![Label::new("Bus Stop", 0.9), Label::new("outdoor", 0.5)]);
}

#[test]
fn test_vision_error_status_is_a_classifier_error() {
    let server = StubServer::start(|_| Reply::json(503, r#"{"error":"loading model"}"#));
    let dir = image_dir(&["bus-commute.jpg"]);

    let classifier = VisionClassifier::new(&vision_config(&server, Duration::from_secs(5))).unwrap();
    let err = classifier.classify(&dir.path().join("bus-commute.jpg")).unwrap_err();
    assert_eq!(err.category(), "classifier");
    assert!(err.to_string().contains("loading model"));
}

#[test]
fn test_stalled_vision_reply_times_out() {
    let server = StubServer::start(|_| Reply::stalled(Duration::from_secs(3)));
    let dir = image_dir(&["bus-commute.jpg"]);

    let classifier = VisionClassifier::new(&vision_config(&server, Duration::from_millis(500))).unwrap();
    let err = classifier.classify(&dir.path().join("bus-commute.jpg")).unwrap_err();
    assert_eq!(err.category(), "timeout");
    assert!(err.to_string().contains("timed out after 500ms"));
}

#[test]
fn test_stalled_image_is_an_error_entry_only() {
    let chat_requests = AtomicUsize::new(0);
    let server = StubServer::start(move |path| {
        if path != "/v1/chat/completions" {
            return Reply::json(404, "{}");
        }
        // only the first image stalls
        if chat_requests.fetch_add(1, Ordering::SeqCst) == 0 {
            Reply::stalled(Duration::from_secs(3))
        } else {
            Reply::json(200, chat_reply(r#"[{"label":"city night lights","confidence":0.7}]"#))
        }
    });
    let dir = image_dir(&["bus-commute.jpg", "city-night.jpg"]);
    let classifier = VisionClassifier::new(&vision_config(&server, Duration::from_millis(500))).unwrap();
    let table = ExpectedLabelTable::builtin();
    let images = list_images(dir.path()).unwrap();

    let report = Validator::new(&classifier, &table, DEFAULT_PASS_THRESHOLD).run(&images);
    assert_eq!(report.classifier, "vision");

    let bus = &report.images["bus-commute.jpg"];
    assert_eq!(bus.status, Status::Error);
    assert!(bus.error.as_deref().unwrap().contains("timed out"));

    let night = &report.images["city-night.jpg"];
    assert_eq!(night.status, Status::Pass);
    assert_eq!(night.labels, ["city night lights (70.0%)"]);

    let tally = report.tally();
    assert_eq!((tally.pass, tally.error), (1, 1));
    assert_eq!(report.exit_code(false), 0);
    assert_eq!(report.exit_code(true), 1);
}

#[test]
fn test_invalid_endpoint_names_the_field() {
    let root = TempDir::new().unwrap();
    let config = ValidateConfig {
        images_dir: root.path().to_path_buf(),
        report_path: root.path().join("report.json"),
        vision: VisionConfig {
            endpoint: Some("localhost:8001".to_string()),
            ..VisionConfig::default()
        },
        ..ValidateConfig::default()
    };
    let err = run_validation(&config).unwrap_err();
    assert_eq!(err.category(), "config");
    assert!(err.to_string().starts_with("Invalid configuration: vision.endpoint=\"localhost:8001\""));
}
