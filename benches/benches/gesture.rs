// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size, Vec2};
use understory_gesture::{CanvasSession, CanvasSettings, InteractionId, InteractionInfo};

const A: InteractionId = InteractionId(1);
const B: InteractionId = InteractionId(2);

fn viewport() -> Size {
    Size::new(1_280.0, 800.0)
}

fn bench_pinch_moves(c: &mut Criterion) {
    c.bench_function("gesture/pinch_120_moves", |b| {
        b.iter_batched(
            || {
                let mut session = CanvasSession::new(viewport());
                session.pointer_down(A, Point::new(500.0, 400.0), InteractionInfo::touch(), 0);
                session.pointer_down(B, Point::new(700.0, 400.0), InteractionInfo::touch(), 0);
                session
            },
            |mut session| {
                for k in 1..=120_u32 {
                    let t = f64::from(k);
                    let spread = Vec2::from_angle(t * 0.01) * (100.0 + t);
                    let now = u64::from(k) * 8;
                    session.pointer_move(A, Point::new(600.0, 400.0) - spread, now);
                    session.pointer_move(B, Point::new(600.0, 400.0) + spread, now);
                }
                black_box(session.coordinate());
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_momentum(c: &mut Criterion) {
    c.bench_function("gesture/momentum_until_rest", |b| {
        b.iter_batched(
            || {
                let mut session = CanvasSession::with_settings(viewport(), CanvasSettings::default());
                session.pointer_down(A, Point::ZERO, InteractionInfo::touch(), 0);
                session.pointer_move(A, Point::new(25.0, 10.0), 16);
                session.pointer_up(A, 16);
                session
            },
            |mut session| {
                let mut now = 16;
                while session.needs_frame() {
                    now += 16;
                    session.frame(now);
                }
                black_box(session.coordinate());
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_pinch_moves, bench_momentum);
criterion_main!(benches);
