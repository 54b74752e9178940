use image::{Rgb, RgbImage};

use super::*;

fn noise_image(w: u32, h: u32) -> RgbImage {
    let mut rng = crate::foundation::math::Rng64::new(99);
    RgbImage::from_fn(w, h, |_, _| {
        let v = rng.next_u64();
        Rgb([v as u8, (v >> 8) as u8, (v >> 16) as u8])
    })
}

#[test]
fn parse_accepts_known_names_case_insensitively() {
    assert_eq!(ColorStyle::parse("warm").unwrap(), ColorStyle::Warm);
    assert_eq!(ColorStyle::parse(" COOL ").unwrap(), ColorStyle::Cool);
    assert_eq!(ColorStyle::parse("none").unwrap(), ColorStyle::Neutral);
    for style in ColorStyle::ALL {
        assert_eq!(ColorStyle::parse(style.name()).unwrap(), style);
    }
}

#[test]
fn parse_rejects_unknown_style() {
    let err = ColorStyle::parse("neon").unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("neon"));
    assert!(ColorStyle::parse("").unwrap_err().is_configuration());
}

#[test]
fn grade_preserves_dimensions() {
    let img = noise_image(17, 9);
    for style in ColorStyle::ALL {
        assert_eq!(grade(&img, style).dimensions(), (17, 9));
    }
}

#[test]
fn saturated_input_clamps_instead_of_wrapping() {
    let white = RgbImage::from_pixel(9, 9, Rgb([255, 255, 255]));
    let out = grade(&white, ColorStyle::Cyberpunk);
    // Center pixel: vignette 1.0, gains > 1 must clamp at 255 rather than wrap to small values.
    assert_eq!(out.get_pixel(4, 4).0, [255, 255, 255]);

    let out = grade(&white, ColorStyle::Warm);
    let c = out.get_pixel(4, 4).0;
    assert_eq!(c[0], 255);
    assert_eq!(c[1], 255);
    assert_eq!(c[2], (0.9f32 * 255.0) as u8);
}

#[test]
fn warm_gains_match_channel_names() {
    let img = RgbImage::from_pixel(1, 1, Rgb([100, 100, 100]));
    let out = grade(&img, ColorStyle::Warm);
    let [r, g, b] = out.get_pixel(0, 0).0;
    assert!(r > g);
    assert!(g > b);
    assert_eq!(r, ((100.0f32 / 255.0 * 1.1).clamp(0.0, 1.0) * 255.0) as u8);
}

#[test]
fn vintage_lifts_blacks() {
    let img = RgbImage::from_pixel(1, 1, Rgb([0, 0, 0]));
    let [r, g, b] = grade(&img, ColorStyle::Vintage).get_pixel(0, 0).0;
    assert_eq!(r, (0.2f32 * 255.0) as u8);
    assert_eq!(b, (0.2f32 * 255.0) as u8);
    assert!(g < r);
}

#[test]
fn vignette_darkens_from_center_to_corner() {
    let img = RgbImage::from_pixel(21, 21, Rgb([200, 200, 200]));
    let out = grade(&img, ColorStyle::Neutral);

    let center = out.get_pixel(10, 10).0[0];
    let mid = out.get_pixel(5, 5).0[0];
    let corner = out.get_pixel(0, 0).0[0];
    assert!(center > mid);
    assert!(mid > corner);
    assert_eq!(center, (200.0f32 / 255.0 * 255.0) as u8);
    assert_eq!(corner, ((200.0f32 / 255.0) * 0.7 * 255.0) as u8);
}

#[test]
fn vignette_is_style_independent() {
    let mask = vignette_mask(12, 8);
    assert_eq!(mask.len(), 96);
    assert!(mask.iter().all(|v| (0.7 - 1e-6..=1.0).contains(v)));
    let max = mask.iter().cloned().fold(f32::MIN, f32::max);
    assert_eq!(max, 1.0);
}

fn reference_tone(style: ColorStyle, [r, g, b]: [f32; 3]) -> [f32; 3] {
    match style {
        ColorStyle::Warm => [r * 1.1, g * 1.05, b * 0.9],
        ColorStyle::Cool => [r * 0.9, g, b * 1.2],
        ColorStyle::Vintage => [r * 0.8 + 0.2, (g * 0.8 + 0.2) * 0.95, b * 0.8 + 0.2],
        ColorStyle::Cyberpunk => [r.powf(1.2) * 1.2, g.powf(1.2), b.powf(1.2) * 1.3],
        ColorStyle::Neutral => [r, g, b],
    }
}

#[test]
fn arbitrary_input_clamps_to_reference_for_every_style() {
    let (w, h) = (33u32, 21u32);
    let img = noise_image(w, h);
    let mask = vignette_mask(w, h);
    for style in ColorStyle::ALL {
        let out = grade(&img, style);
        assert_eq!(out.dimensions(), (w, h));
        let mut saturated = 0;
        for (i, (src, dst)) in img.pixels().zip(out.pixels()).enumerate() {
            let rgb = src.0.map(|c| f32::from(c) / 255.0);
            let toned = reference_tone(style, rgb);
            for (c, &v) in toned.iter().enumerate() {
                let expected = ((v * mask[i]).clamp(0.0, 1.0) * 255.0) as u8;
                assert_eq!(dst.0[c], expected, "{style} pixel {i} channel {c}");
                if v * mask[i] >= 1.0 {
                    saturated += 1;
                }
            }
        }
        if matches!(style, ColorStyle::Warm | ColorStyle::Cool | ColorStyle::Cyberpunk) {
            assert!(saturated > 0, "{style} noise never reached the clamp");
        }
    }
}

#[test]
fn grading_twice_compounds() {
    let img = noise_image(16, 16);
    let once = grade(&img, ColorStyle::Warm);
    let twice = grade(&once, ColorStyle::Warm);
    assert_ne!(once.as_raw(), twice.as_raw());
}
