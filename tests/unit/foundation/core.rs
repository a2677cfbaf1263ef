use super::*;

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0).is_err());
    assert_eq!(Fps::new(25).unwrap().0, 25);
}

#[test]
fn frame_sec_is_reciprocal() {
    assert!(approx_eq(Fps::default().frame_sec(), 1.0 / 30.0));
}

#[test]
fn canvas_requires_even_non_zero_dims() {
    assert!(Canvas { width: 0, height: 720 }.validate().is_err());
    assert!(Canvas { width: 1281, height: 720 }.validate().is_err());
    assert!(Canvas::default().validate().is_ok());
}

#[test]
fn fmt_sec_trims_float_noise() {
    assert_eq!(fmt_sec(0.1 + 0.2), "0.3");
    assert_eq!(fmt_sec(2.0), "2");
    assert_eq!(fmt_sec(1.8), "1.8");
    assert_eq!(fmt_sec(-0.0), "0");
    assert_eq!(fmt_sec(1.0 / 30.0), "0.033333");
    assert_eq!(fmt_sec(1e-9), "0");
}
