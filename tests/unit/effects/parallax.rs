use image::{Rgb, RgbImage};

use super::*;

fn ramp(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, _| {
        let v = (x * 10) as u8;
        Rgb([v, v, v])
    })
}

#[test]
fn reflect_mirrors_both_edges() {
    assert_eq!(reflect(0, 5), 0);
    assert_eq!(reflect(4, 5), 4);
    assert_eq!(reflect(5, 5), 4);
    assert_eq!(reflect(6, 5), 3);
    assert_eq!(reflect(-1, 5), 0);
    assert_eq!(reflect(-2, 5), 1);
    assert_eq!(reflect(1, 1), 0);
}

#[test]
fn depth_is_highest_at_center() {
    let d = depth_proxy(9, 9);
    assert_eq!(d[4 * 9 + 4], 1.0);
    assert!(d[0].abs() < 1e-6);
}

#[test]
fn first_frame_is_the_source() {
    let img = ramp(20, 8);
    let p = Parallax::new(&img, DEFAULT_PARALLAX_SHIFT_PX, 6).unwrap();
    assert_eq!(p.shift_at(0), 0.0);
    assert_eq!(p.render_frame(0), img);
    assert_eq!(p.shift_at(5), DEFAULT_PARALLAX_SHIFT_PX);
}

#[test]
fn frames_keep_dimensions() {
    let img = ramp(21, 11);
    let frames = synthesize_parallax(&img, 5, 4.0).unwrap();
    assert_eq!(frames.len(), 5);
    assert!(frames.iter().all(|f| f.dimensions() == (21, 11)));
}

#[test]
fn center_moves_more_than_corners() {
    let img = ramp(25, 25);
    let p = Parallax::new(&img, 4.0, 2).unwrap();
    let last = p.render_frame(1);

    // Center has depth 1: samples 4 px to the right on a 10-per-px ramp.
    assert_eq!(last.get_pixel(12, 12).0[0], 160);
    // Far corner has depth 0: unchanged.
    assert_eq!(last.get_pixel(0, 0).0[0], img.get_pixel(0, 0).0[0]);
}

#[test]
fn negative_or_non_finite_shift_is_rejected() {
    let img = ramp(4, 4);
    assert!(Parallax::new(&img, -1.0, 3).unwrap_err().is_configuration());
    assert!(Parallax::new(&img, f64::NAN, 3).unwrap_err().is_configuration());
}

#[test]
fn single_frame_is_unmodified() {
    let img = ramp(6, 3);
    let frames = synthesize_parallax(&img, 1, 10.0).unwrap();
    assert_eq!(frames, vec![img]);
}
