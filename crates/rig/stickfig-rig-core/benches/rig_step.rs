use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stickfig_rig_core::{
    engine::Engine,
    ik,
    inputs::{Inputs, PlaybackCommand},
    math::Vec2,
    skeleton::{BoneId, Skeleton},
    Config,
};

fn mk_chain(n: usize) -> (Skeleton, BoneId) {
    let mut sk = Skeleton::new();
    let root = sk.add_root("root");
    sk.bone_mut(root).length = 10.0;
    let mut last = root;
    for _ in 1..n {
        last = sk.add_child(last, 10.0, 0.05, 8.0, [0.0; 3]);
    }
    sk.bone_mut(last).ik_depth = (n - 1) as u32;
    (sk, last)
}

fn bench_solve_chain(c: &mut Criterion) {
    let (sk, effector) = mk_chain(12);
    let points = ik::chain_points(&sk, effector).expect("effector chain");
    let target = Vec2::new(40.0, 35.0);

    c.bench_function("fabrik_solve_chain_12", |b| {
        b.iter(|| {
            let mut pts = points.clone();
            ik::solve_chain(&mut pts, black_box(target));
            pts
        })
    });
}

fn bench_playback_step(c: &mut Criterion) {
    let (mut sk, _) = mk_chain(12);
    for id in sk.ids() {
        let bone = sk.bone_mut(id);
        bone.keyframes.insert(0, 0.0, 0.0, 0.0);
        bone.keyframes.insert(60, 1.0, 5.0, 5.0);
        bone.keyframes.insert(119, 0.0, 0.0, 0.0);
    }
    let mut eng = Engine::new(sk, Config::default());
    eng.update(
        0.0,
        Inputs {
            commands: vec![PlaybackCommand::Play],
            pointer: Vec::new(),
        },
    );
    let dt = 1.0 / eng.config().frame_rate;

    c.bench_function("playback_step_12_bones", |b| {
        b.iter(|| {
            eng.update(black_box(dt), Inputs::default());
        })
    });
}

criterion_group!(benches, bench_solve_chain, bench_playback_step);
criterion_main!(benches);
