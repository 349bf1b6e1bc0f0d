use std::fs;

use image::{Rgba, RgbaImage};

use crate::app::App;
use crate::config::Config;
use crate::config::tests::unique_temp_path;
use crate::presenter::PresenterKind;
use crate::scale::PixelPoint;
use crate::session::Action;

#[test]
fn new_with_config_seeds_scale_field_from_export_default() {
    let mut config = Config::default();
    config.export.default_scale = 2.5;

    let app = App::new_with_config(PresenterKind::RatatuiImage, config).expect("app init");

    assert_eq!(app.state.session.desired_scale_text(), "2.5");
    assert_eq!(app.state.session.physical_distance_text(), "");
    assert!(app.state.session.image().is_none());
}

#[test]
fn new_with_config_uses_configured_marker_color() {
    let mut config = Config::default();
    config.view.marker_color = [200, 10, 10];

    let mut app = App::new_with_config(PresenterKind::RatatuiImage, config).expect("app init");
    let path = unique_temp_path("marker_color").with_extension("png");
    RgbaImage::from_pixel(80, 80, Rgba([255, 255, 255, 255]))
        .save(&path)
        .expect("fixture image should be written");
    app.open_image(path.clone()).expect("open should not error");
    app.state.apply(Action::Mark(PixelPoint::new(40.0, 40.0)));

    let annotated = app.state.session.annotated().expect("annotated raster");
    assert_eq!(*annotated.get_pixel(40, 40), Rgba([200, 10, 10, 255]));
    fs::remove_file(&path).expect("fixture should be removed");
}

#[test]
fn open_image_failure_becomes_an_alert() {
    let mut app = App::new_with_config(PresenterKind::RatatuiImage, Config::default())
        .expect("app init");
    let missing = unique_temp_path("missing_image").with_extension("png");
    app.open_image(missing).expect("open should not error");
    assert!(app.state.session.alert().is_some());
    assert!(app.state.session.image().is_none());
}
