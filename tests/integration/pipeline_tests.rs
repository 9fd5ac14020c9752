//! End-to-end assembly tests.

use image::Rgba;

use dzi_assembler::{
    AssembleError, AssembleOptions, Assembler, ComposeError, Config, DescriptorError,
    FsTileSource, LayerStatus,
};

use super::test_utils::{descriptor_text, layer, read_rgba, EventFixture};

fn assembler(fixture: &EventFixture, enable_lower_layers: bool) -> Assembler<FsTileSource> {
    let options = AssembleOptions::new(fixture.event_dir()).with_lower_layers(enable_lower_layers);
    Assembler::from_dirs(options, fixture.tex_dir(), fixture.output_dir())
}

// =============================================================================
// Layer Skip Policy
// =============================================================================

#[tokio::test]
async fn test_lower_layers_disabled() {
    let fixture = EventFixture::new();
    fixture.write_tile("t", 4, 4, [255, 0, 0, 255]);
    fixture.write_file(
        "ev01.dzi",
        &descriptor_text(8, 8, &vec![layer(1, 1, &["t"]); 4]),
    );

    let summary = assembler(&fixture, false).run().await.unwrap();

    assert!(fixture.layer_output("ev01", 0).exists());
    assert!(fixture.layer_output("ev01", 1).exists());
    assert!(!fixture.layer_output("ev01", 2).exists());
    assert!(!fixture.layer_output("ev01", 3).exists());
    assert_eq!(summary.written(), 2);
    assert_eq!(summary.skipped(), 2);
}

#[tokio::test]
async fn test_lower_layers_enabled() {
    let fixture = EventFixture::new();
    fixture.write_tile("t", 4, 4, [255, 0, 0, 255]);
    fixture.write_file(
        "ev01.dzi",
        &descriptor_text(8, 8, &vec![layer(1, 1, &["t"]); 3]),
    );

    let summary = assembler(&fixture, true).run().await.unwrap();

    assert_eq!(summary.written(), 3);
    // layer 2 target is 4x4, layer 1 target is 8x8 but the canvas is only 4x4
    assert_eq!(read_rgba(&fixture.layer_output("ev01", 2)).dimensions(), (4, 4));
    assert_eq!(read_rgba(&fixture.layer_output("ev01", 1)).dimensions(), (4, 4));
}

// =============================================================================
// Composition
// =============================================================================

#[tokio::test]
async fn test_crop_takes_min_per_axis() {
    let fixture = EventFixture::new();
    fixture.write_tile("big", 100, 100, [0, 128, 0, 255]);
    // layer 1 is native scale, so the target is the descriptor size
    fixture.write_file(
        "cg.dzi",
        &descriptor_text(50, 200, &[layer(0, 0, &[]), layer(1, 1, &["big"])]),
    );

    let summary = assembler(&fixture, true).run().await.unwrap();

    let out = read_rgba(&fixture.layer_output("cg", 1));
    assert_eq!(out.dimensions(), (50, 100));
    assert_eq!(summary.count(LayerStatus::Empty), 1);
    assert!(!fixture.layer_output("cg", 0).exists());
}

#[tokio::test]
async fn test_sparse_grid_leaves_gap_transparent() {
    let fixture = EventFixture::new();
    fixture.write_tile("ev/a", 8, 8, [10, 20, 30, 255]);
    fixture.write_tile("ev/c", 8, 8, [40, 50, 60, 255]);
    fixture.write_file(
        "ev.dzi",
        &descriptor_text(24, 16, &[layer(0, 0, &[]), layer(3, 2, &["ev/a,,ev/c", ",,"])]),
    );

    assembler(&fixture, true).run().await.unwrap();

    let out = read_rgba(&fixture.layer_output("ev", 1));
    assert_eq!(out.dimensions(), (24, 16));
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(out.get_pixel(x, y), &Rgba([10, 20, 30, 255]));
            assert_eq!(out.get_pixel(x + 8, y)[3], 0);
            assert_eq!(out.get_pixel(x + 16, y), &Rgba([40, 50, 60, 255]));
            assert_eq!(out.get_pixel(x, y + 8)[3], 0);
        }
    }
}

#[tokio::test]
async fn test_double_scale_layer_zero() {
    let fixture = EventFixture::new();
    fixture.write_tile("h", 4, 4, [1, 2, 3, 255]);
    fixture.write_file(
        "ev.dzi",
        &descriptor_text(6, 3, &[layer(3, 2, &["h,h,h", "h,h,h"]), layer(2, 1, &["h,h"])]),
    );

    assembler(&fixture, true).run().await.unwrap();

    // layer 0 target 12x6 from a 12x8 canvas, layer 1 target 6x3 from 8x4
    assert_eq!(read_rgba(&fixture.layer_output("ev", 0)).dimensions(), (12, 6));
    assert_eq!(read_rgba(&fixture.layer_output("ev", 1)).dimensions(), (6, 3));
}

// =============================================================================
// Discovery and Output Lifecycle
// =============================================================================

#[tokio::test]
async fn test_non_descriptor_files_ignored() {
    let fixture = EventFixture::new();
    fixture.write_tile("t", 2, 2, [9, 9, 9, 255]);
    fixture.write_file("readme.txt", "not a descriptor");
    fixture.write_file("b.dzi", &descriptor_text(2, 2, &[layer(1, 1, &["t"])]));
    fixture.write_file("a.dzi", &descriptor_text(2, 2, &[layer(1, 1, &["t"])]));

    let summary = assembler(&fixture, true).run().await.unwrap();

    assert_eq!(summary.groups, vec!["a", "b"]);
    assert!(fixture.layer_output("a", 0).exists());
    assert!(fixture.layer_output("b", 0).exists());
}

#[tokio::test]
async fn test_rerun_is_idempotent_and_clears_stale_output() {
    let fixture = EventFixture::new();
    fixture.write_tile("x", 5, 3, [100, 0, 200, 255]);
    fixture.write_tile("y", 5, 3, [0, 100, 200, 128]);
    fixture.write_file(
        "ev.dzi",
        &descriptor_text(10, 6, &[layer(2, 2, &["x,y", "y,"]), layer(1, 1, &["x"])]),
    );

    let assembler = assembler(&fixture, true);
    assembler.run().await.unwrap();
    let first_0 = std::fs::read(fixture.layer_output("ev", 0)).unwrap();
    let first_1 = std::fs::read(fixture.layer_output("ev", 1)).unwrap();

    let stale = fixture.output_dir().join("old").join("layer_0.png");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, b"stale").unwrap();

    assembler.run().await.unwrap();
    assert_eq!(std::fs::read(fixture.layer_output("ev", 0)).unwrap(), first_0);
    assert_eq!(std::fs::read(fixture.layer_output("ev", 1)).unwrap(), first_1);
    assert!(!stale.exists());
}

// =============================================================================
// Failure Handling
// =============================================================================

#[tokio::test]
async fn test_truncated_descriptor_aborts_run() {
    let fixture = EventFixture::new();
    fixture.write_tile("t", 2, 2, [9, 9, 9, 255]);
    fixture.write_file("a.dzi", &descriptor_text(2, 2, &[layer(1, 1, &["t"])]));
    fixture.write_file(
        "b.dzi",
        &descriptor_text(2, 2, &[layer(1, 1, &["t"]), layer(2, 3, &["t,t", "t,t"])]),
    );
    fixture.write_file("c.dzi", &descriptor_text(2, 2, &[layer(1, 1, &["t"])]));

    let err = assembler(&fixture, true).run().await.unwrap_err();

    assert!(matches!(
        err,
        AssembleError::Descriptor(DescriptorError::TruncatedLayer { layer: 1, .. })
    ));
    assert!(fixture.layer_output("a", 0).exists());
    assert!(!fixture.output_dir().join("b").exists());
    assert!(!fixture.output_dir().join("c").exists());
}

#[tokio::test]
async fn test_missing_tile_aborts_with_path() {
    let fixture = EventFixture::new();
    fixture.write_tile("present", 2, 2, [9, 9, 9, 255]);
    fixture.write_file(
        "ev.dzi",
        &descriptor_text(4, 2, &[layer(2, 1, &["present,missing"])]),
    );

    let err = assembler(&fixture, true).run().await.unwrap_err();

    match &err {
        AssembleError::Compose(ComposeError::TileRead { path, .. }) => {
            assert_eq!(path, &fixture.tex_dir().join("missing.png"));
        }
        other => panic!("Expected TileRead, got {other:?}"),
    }
    assert!(err.to_string().contains("missing.png"));
}

#[tokio::test]
async fn test_missing_first_cell_aborts() {
    let fixture = EventFixture::new();
    fixture.write_tile("b", 2, 2, [9, 9, 9, 255]);
    fixture.write_file("ev.dzi", &descriptor_text(4, 2, &[layer(2, 1, &[",b"])]));

    let err = assembler(&fixture, true).run().await.unwrap_err();
    assert!(matches!(
        err,
        AssembleError::Compose(ComposeError::MissingFirstTile { layer: 0, .. })
    ));
}

#[tokio::test]
async fn test_missing_event_dir() {
    let fixture = EventFixture::new();
    let options = AssembleOptions::new(fixture.event_dir().join("nowhere"));
    let assembler = Assembler::from_dirs(options, fixture.tex_dir(), fixture.output_dir());

    assert!(matches!(
        assembler.run().await,
        Err(AssembleError::Io { .. })
    ));
}

// =============================================================================
// Config Entry Point
// =============================================================================

#[tokio::test]
async fn test_run_from_config_resolves_relative_dirs() {
    let fixture = EventFixture::new();
    fixture.write_tile("t", 3, 3, [7, 7, 7, 255]);
    fixture.write_file("ev.dzi", &descriptor_text(3, 3, &[layer(1, 1, &["t"])]));

    let event_dir = fixture.event_dir().to_string_lossy().into_owned();
    let config = <Config as clap::Parser>::try_parse_from([
        "dzi-assembler",
        "--event-dir",
        event_dir.as_str(),
        "--tex-dir",
        "tex",
        "--output-dir",
        "dist",
        "--enable-lower-layers",
        "false",
    ])
    .unwrap();
    assert!(config.validate().is_ok());

    let summary = dzi_assembler::run(&config).await.unwrap();
    assert_eq!(summary.written(), 1);
    assert!(fixture.layer_output("ev", 0).exists());
}
