use super::*;

const ALL: [CameraMove; 5] = [
    CameraMove::Dolly,
    CameraMove::Pan,
    CameraMove::Tilt,
    CameraMove::Arc,
    CameraMove::Push,
];

fn canvas() -> Canvas {
    Canvas::new(1920, 1080)
}

#[test]
fn every_move_starts_at_rest() {
    let params = CameraParams::default();
    for mv in ALL {
        let pose = mv.pose(0.0, 4.0, canvas(), &params);
        assert!(pose.offset.hypot() < 1e-9, "{mv:?} start offset");
        assert!((pose.zoom - 1.0).abs() < 1e-9, "{mv:?} start zoom");
    }
}

#[test]
fn displacement_moves_return_to_rest() {
    let params = CameraParams::default();
    for mv in [CameraMove::Pan, CameraMove::Tilt, CameraMove::Arc] {
        let pose = mv.pose(4.0, 4.0, canvas(), &params);
        assert!(pose.offset.hypot() < 1e-6, "{mv:?} end offset");
    }
}

#[test]
fn pan_peaks_at_fifteen_percent_of_width() {
    let params = CameraParams::default();
    let mid = CameraMove::Pan.pose(2.0, 4.0, canvas(), &params);
    assert!((mid.offset.x - 1920.0 * 0.15).abs() < 1e-6);
    assert_eq!(mid.offset.y, 0.0);

    let tilt = CameraMove::Tilt.pose(2.0, 4.0, canvas(), &params);
    assert!((tilt.offset.y - 1080.0 * 0.15).abs() < 1e-6);
}

#[test]
fn push_eases_to_configured_zoom() {
    let params = CameraParams::default();
    let end = CameraMove::Push.pose(3.0, 3.0, canvas(), &params);
    assert!((end.zoom - 1.2).abs() < 1e-9);
    let mid = CameraMove::Push.pose(1.5, 3.0, canvas(), &params);
    assert!((mid.zoom - 1.1).abs() < 1e-9);
    let dolly = CameraMove::Dolly.pose(3.0, 3.0, canvas(), &params);
    assert!((dolly.zoom - 1.15).abs() < 1e-9);
}

#[test]
fn arc_stays_within_its_radius() {
    let params = CameraParams::default();
    let c = canvas();
    let max_x = f64::from(c.width) * params.arc_fraction / 2.0;
    let max_y = f64::from(c.height) * params.arc_fraction;
    for i in 0..=40 {
        let pose = CameraMove::Arc.pose(f64::from(i) * 0.1, 4.0, c, &params);
        assert!(pose.offset.x.abs() <= max_x + 1e-9);
        assert!(pose.offset.y.abs() <= max_y + 1e-9);
    }
}
