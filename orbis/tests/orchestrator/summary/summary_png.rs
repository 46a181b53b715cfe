use std::sync::Arc;

use orbis::{PngSummaryRenderer, SummaryRenderer, SummarySnapshot};

use crate::helpers::{dt, harness};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

#[tokio::test]
async fn refresh_writes_a_600_by_400_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache").join("summary.png");
    let h = harness(|b| b.renderer(Arc::new(PngSummaryRenderer::new(&path))));

    let report = h.orbis.refresh().await.unwrap();
    assert!(report.summary_rendered, "{:?}", report.warnings);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes[..8], PNG_MAGIC);
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (600, 400));

    let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name() != "summary.png")
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn each_render_replaces_the_previous_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.png");
    let renderer = PngSummaryRenderer::new(&path);

    let empty = SummarySnapshot {
        total: 0,
        top: Vec::new(),
        last_refreshed_at: dt(2025, 1, 1, 0, 0, 0),
    };
    renderer.render(&empty).await.unwrap();
    let first = std::fs::read(&path).unwrap();

    let later = SummarySnapshot {
        total: 250,
        ..empty
    };
    renderer.render(&later).await.unwrap();
    let second = std::fs::read(&path).unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn unwritable_target_is_a_render_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();
    let renderer = PngSummaryRenderer::new(blocker.join("summary.png"));

    let snapshot = SummarySnapshot {
        total: 1,
        top: Vec::new(),
        last_refreshed_at: dt(2025, 1, 1, 0, 0, 0),
    };
    let err = renderer.render(&snapshot).await.unwrap_err();
    assert!(matches!(err, orbis::OrbisError::Render(_)));
}
