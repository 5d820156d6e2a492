// Geometry unit tests
// Stretch and join sizes for awkward aspect ratios

use carousel::compose::{join_horizontal, joined_width, pad};
use carousel::engine::{stretched_width, Color, ImageEngineFactory, RasterEngine};
use rstest::rstest;

#[rstest]
#[case(1, 1, 100)]
#[case(7, 3, 100)]
#[case(3, 7, 100)]
#[case(1000, 1, 50)]
#[case(1, 1000, 50)]
#[case(333, 100, 50)]
#[case(640, 480, 123)]
fn test_stretch_is_aspect_preserving(#[case] width: u32, #[case] height: u32, #[case] target: u32) {
    let engine = RasterEngine::default();
    let mut handle = engine.canvas(width, height, Color::black());
    handle
        .resize_to_height(target, engine.resize_filter())
        .unwrap();

    let exact = width as f64 * target as f64 / height as f64;
    assert_eq!(handle.height(), target);
    assert_eq!(handle.width(), stretched_width(width, height, target));
    assert!(
        (handle.width() as f64 - exact).abs() <= 1.0 || handle.width() == 1,
        "{width}x{height} -> {}x{target}, exact {exact}",
        handle.width()
    );
}

#[test]
fn test_join_width_matches_formula() {
    let engine = RasterEngine::default();
    let widths = [13u32, 1, 250, 40];
    let tiles: Vec<_> = widths
        .iter()
        .map(|w| engine.canvas(*w, 30, Color::black()))
        .collect();

    for spacing in [1u32, 7, 25] {
        let joined = join_horizontal(&engine, &tiles, spacing, Color::white()).unwrap();
        let expected = widths.iter().sum::<u32>() + spacing * (widths.len() as u32 - 1);
        assert_eq!(joined.size(), (expected, 30));
        assert_eq!(joined_width(widths, spacing), expected);
    }
}

#[test]
fn test_stretched_tiles_share_height_after_join() {
    let engine = RasterEngine::default();
    let mut tiles = vec![
        engine.canvas(10, 10, Color::black()),
        engine.canvas(40, 20, Color::black()),
        engine.canvas(5, 80, Color::black()),
    ];
    for tile in &mut tiles {
        tile.resize_to_height(40, engine.resize_filter()).unwrap();
    }

    let joined = join_horizontal(&engine, &tiles, 3, Color::white()).unwrap();
    assert_eq!(joined.size(), (40 + 3 + 80 + 3 + 3, 40));
}

#[test]
fn test_pad_then_join() {
    let engine = RasterEngine::default();
    let framed = pad(&engine, &engine.canvas(20, 20, Color::black()), 5, 5, Color::white());

    let joined = join_horizontal(&engine, &[framed], 10, Color::white()).unwrap();
    assert_eq!(joined.size(), (30, 30));
    let pixels = joined.to_rgba8();
    assert_eq!(pixels.get_pixel(2, 2).0, [255, 255, 255, 255]);
    assert_eq!(pixels.get_pixel(15, 15).0, [0, 0, 0, 255]);
}
