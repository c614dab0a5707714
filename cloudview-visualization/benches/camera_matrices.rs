use std::hint::black_box;

use cloudview_core::{Point2d, Point3d, UnitQuaterniond, Vector2d};
use cloudview_visualization::{CameraMode, CameraUniform, InteractiveCamera, Viewport};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const MODES: [CameraMode; 3] = [
    CameraMode::Trackball,
    CameraMode::Turntable,
    CameraMode::Navigation,
];

fn camera(mode: CameraMode) -> InteractiveCamera {
    let mut camera = InteractiveCamera::new();
    camera.set_viewport(Viewport::with_size(1920, 1080).unwrap());
    camera.set_rotation(UnitQuaterniond::from_euler_angles(0.3, -0.2, 1.1));
    camera.set_mode(mode);
    camera.set_position(Point3d::new(1.0, 2.0, 3.0));
    camera.set_yaw_pitch(40.0, -10.0);
    camera
}

fn matrices(c: &mut Criterion) {
    let mut g = c.benchmark_group("camera matrices");

    for mode in MODES {
        let camera = camera(mode);
        g.bench_with_input(BenchmarkId::new("view", format!("{mode:?}")), &camera, |b, camera| {
            b.iter(|| black_box(camera).view());
        });
        g.bench_with_input(BenchmarkId::new("uniform", format!("{mode:?}")), &camera, |b, camera| {
            b.iter(|| CameraUniform::from_camera(black_box(camera)));
        });
    }

    g.finish();
}

fn interaction(c: &mut Criterion) {
    let mut g = c.benchmark_group("camera interaction");

    for mode in [CameraMode::Trackball, CameraMode::Turntable] {
        let mut camera = camera(mode);
        g.bench_function(BenchmarkId::new("drag", format!("{mode:?}")), |b| {
            b.iter(|| {
                camera.mouse_drag(
                    black_box(Point2d::new(900.0, 500.0)),
                    black_box(Point2d::new(912.0, 497.0)),
                    false,
                )
            });
        });
    }

    let camera = camera(CameraMode::Turntable);
    let point = Point3d::new(0.5, 0.25, -0.5);
    g.bench_function("move point", |b| {
        let movement = Vector2d::new(8.0, -3.0);
        b.iter(|| camera.mouse_move_point(black_box(&point), black_box(&movement), false));
    });

    g.finish();
}

criterion_group!(benches, matrices, interaction);
criterion_main!(benches);
