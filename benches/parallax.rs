use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{IVec2, UVec2, Vec2};
use spacetouch::core::{DisplayContext, Framebuffer};
use spacetouch::plane::{PlaneDevice, PlaneId, PlaneState, SoftwarePlaneDevice};
use spacetouch::scene::{propose_move, DEFAULT_WEIGHTS};

fn bench_propose_move(c: &mut Criterion) {
    let bounds = DisplayContext::new(800, 480).drag_bounds();
    let snapshot = [Vec2::ZERO; 3];
    let sizes = [Vec2::new(800.0, 480.0); 3];

    let mut group = c.benchmark_group("propose_move");
    for (name, delta) in [("accepted", Vec2::new(40.0, -25.0)), ("rejected", Vec2::new(2000.0, 0.0))] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &delta, |b, &delta| {
            b.iter(|| {
                propose_move(
                    black_box(&snapshot),
                    black_box(&sizes),
                    black_box(delta),
                    &DEFAULT_WEIGHTS,
                    &bounds,
                )
            })
        });
    }
    group.finish();
}

/// Full software composite of three screen-sized layers per frame
fn bench_software_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("software_compose");
    for &(w, h) in &[(320u32, 240u32), (800, 480)] {
        let size = UVec2::new(w, h);
        let mut device = SoftwarePlaneDevice::new(size, 4);
        let layer = [200u8, 200, 255, 128].repeat((w * h) as usize);
        for i in 0..3 {
            device.claim(PlaneId(i), size).unwrap();
            device.upload(PlaneId(i), &layer).unwrap();
        }
        let primary = Framebuffer::new(w, h);

        group.bench_with_input(BenchmarkId::from_parameter(format!("{}x{}", w, h)), &size, |b, &size| {
            let mut x = 0;
            b.iter(|| {
                x = (x + 1) % 64;
                for i in 0..3 {
                    device.update(
                        PlaneId(i),
                        PlaneState {
                            position: IVec2::new(x * (i as i32 + 1), 0),
                            size,
                            z_order: i as i32,
                            enabled: true,
                        },
                    );
                }
                device.present(black_box(&primary)).unwrap();
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_propose_move, bench_software_compose);
criterion_main!(benches);
