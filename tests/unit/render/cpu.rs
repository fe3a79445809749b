use super::*;

const RED: Color = Color::from_rgba8(255, 0, 0, 255);
const BLUE: Color = Color::from_rgba8(0, 0, 255, 255);

fn pixel(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn is_solid(px: [u8; 4], color: Color) -> bool {
    px[3] == 255
        && px[0].abs_diff(color.r) <= 2
        && px[1].abs_diff(color.g) <= 2
        && px[2].abs_diff(color.b) <= 2
}

#[test]
fn new_rejects_bad_dimensions() {
    assert!(CpuCanvas::new(0, 10).is_err());
    assert!(CpuCanvas::new(10, 0).is_err());
    assert!(CpuCanvas::new(70_000, 10).is_err());

    let canvas = CpuCanvas::new(32, 16).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (32, 16));
}

#[test]
fn new_canvas_is_transparent() {
    let mut canvas = CpuCanvas::new(8, 8).unwrap();
    let frame = canvas.to_frame().unwrap();
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 8 * 8 * 4);
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn segment_is_drawn_around_surface_origin() {
    let mut canvas = CpuCanvas::new(40, 40).unwrap();
    canvas.draw_segment(Point::new(-10.0, 0.0), Point::new(10.0, 0.0), 4.0, RED);

    let frame = canvas.to_frame().unwrap();
    assert!(is_solid(pixel(&frame, 20, 20), RED));
    assert_eq!(pixel(&frame, 0, 0), [0, 0, 0, 0]);
    assert_eq!(pixel(&frame, 20, 30), [0, 0, 0, 0]);
}

#[test]
fn positive_y_is_up() {
    let mut canvas = CpuCanvas::new(40, 40).unwrap();
    canvas.draw_segment(Point::new(-5.0, 10.0), Point::new(5.0, 10.0), 2.0, RED);

    let frame = canvas.to_frame().unwrap();
    assert!(is_solid(pixel(&frame, 20, 9), RED));
    assert_eq!(pixel(&frame, 20, 30)[3], 0);
}

#[test]
fn degenerate_segment_draws_a_dot() {
    let mut canvas = CpuCanvas::new(20, 20).unwrap();
    canvas.draw_segment(Point::ORIGIN, Point::ORIGIN, 6.0, RED);
    let frame = canvas.to_frame().unwrap();
    assert!(is_solid(pixel(&frame, 10, 10), RED));
}

#[test]
fn zero_width_and_transparent_draws_are_skipped() {
    let mut canvas = CpuCanvas::new(20, 20).unwrap();
    canvas.draw_segment(Point::ORIGIN, Point::new(5.0, 0.0), 0.0, RED);
    canvas.draw_segment(Point::ORIGIN, Point::new(5.0, 0.0), 4.0, Color::TRANSPARENT);
    canvas.fill_polygon(&[Point::ORIGIN, Point::new(5.0, 0.0)], RED);

    let frame = canvas.to_frame().unwrap();
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn later_draws_cover_earlier_ones() {
    let mut canvas = CpuCanvas::new(40, 40).unwrap();
    let square = |h: f64| {
        [
            Point::new(-h, -h),
            Point::new(h, -h),
            Point::new(h, h),
            Point::new(-h, h),
        ]
    };
    canvas.fill_polygon(&square(10.0), RED);
    canvas.fill_polygon(&square(4.0), BLUE);

    let frame = canvas.to_frame().unwrap();
    assert!(is_solid(pixel(&frame, 20, 20), BLUE));
    assert!(is_solid(pixel(&frame, 12, 20), RED));
}

#[test]
fn drawing_persists_across_reads() {
    let mut canvas = CpuCanvas::new(40, 40).unwrap();
    canvas.draw_segment(Point::new(-10.0, 0.0), Point::new(10.0, 0.0), 4.0, RED);
    let _ = canvas.to_frame().unwrap();
    canvas.draw_segment(Point::new(0.0, -10.0), Point::new(0.0, 10.0), 4.0, BLUE);

    let frame = canvas.to_frame().unwrap();
    assert!(is_solid(pixel(&frame, 14, 20), RED));
    assert!(is_solid(pixel(&frame, 20, 14), BLUE));
}

#[test]
fn clear_region_zeroes_committed_and_pending_pixels() {
    let mut canvas = CpuCanvas::new(40, 40).unwrap();
    canvas.draw_segment(Point::new(-15.0, 0.0), Point::new(15.0, 0.0), 4.0, RED);
    canvas.clear_region(Rect::new(0.0, -20.0, 20.0, 20.0));

    let frame = canvas.to_frame().unwrap();
    assert!(is_solid(pixel(&frame, 10, 20), RED));
    assert_eq!(pixel(&frame, 30, 20), [0, 0, 0, 0]);

    canvas.clear_region(Rect::new(-1000.0, -1000.0, 1000.0, 1000.0));
    let frame = canvas.to_frame().unwrap();
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn flatten_stacks_layers_over_background() {
    let mut base = CpuCanvas::new(20, 20).unwrap();
    let mut top = CpuCanvas::new(20, 20).unwrap();
    base.fill_polygon(
        &[
            Point::new(-10.0, -10.0),
            Point::new(10.0, -10.0),
            Point::new(10.0, 10.0),
            Point::new(-10.0, 10.0),
        ],
        RED,
    );
    top.draw_segment(Point::ORIGIN, Point::ORIGIN, 4.0, BLUE);

    let frame = flatten(Color::WHITE, &mut [&mut base, &mut top]).unwrap();
    assert!(is_solid(pixel(&frame, 10, 10), BLUE));
    assert!(is_solid(pixel(&frame, 2, 2), RED));

    let mut empty = CpuCanvas::new(20, 20).unwrap();
    let frame = flatten(Color::WHITE, &mut [&mut empty]).unwrap();
    assert!(frame.data.iter().all(|&b| b == 255));
}

#[test]
fn flatten_rejects_bad_layers() {
    assert!(flatten(Color::WHITE, &mut []).is_err());

    let mut a = CpuCanvas::new(10, 10).unwrap();
    let mut b = CpuCanvas::new(12, 10).unwrap();
    assert!(flatten(Color::WHITE, &mut [&mut a, &mut b]).is_err());
}

#[test]
fn write_png_round_trips_dimensions() {
    let dir = std::env::temp_dir().join(format!("tortuga_cpu_png_{}", std::process::id()));
    let path = dir.join("nested").join("frame.png");

    let mut canvas = CpuCanvas::new(12, 7).unwrap();
    canvas.draw_segment(Point::new(-3.0, 0.0), Point::new(3.0, 0.0), 2.0, RED);
    let frame = flatten(Color::TRANSPARENT, &mut [&mut canvas]).unwrap();
    frame.write_png(&path).unwrap();

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (12, 7));
    let _ = std::fs::remove_dir_all(&dir);
}
