use criterion::{black_box, criterion_group, criterion_main, Criterion};
use formsense_core::{Joint, JointDetection, JointPosition, Timestamp};
use formsense_engine::{FormAnalyzer, JointFrame};

fn squat_frame(theta_deg: f64) -> JointFrame {
    let theta = theta_deg.to_radians();
    let mut frame = JointFrame::new(Timestamp::from_nanos(0));

    for (x, hip, knee, ankle, shoulder) in [
        (
            -0.2,
            Joint::LeftHip,
            Joint::LeftKnee,
            Joint::LeftAnkle,
            Joint::LeftShoulder,
        ),
        (
            0.2,
            Joint::RightHip,
            Joint::RightKnee,
            Joint::RightAnkle,
            Joint::RightShoulder,
        ),
    ] {
        let knee_pos = JointPosition::new(x, 1.0, 0.0);
        let hip_pos =
            JointPosition::new(x + 0.5 * theta.sin(), 1.0 - 0.5 * theta.cos(), 0.0);
        frame.push(JointDetection::new(knee, knee_pos, 1.0));
        frame.push(JointDetection::new(hip, hip_pos, 1.0));
        frame.push(JointDetection::new(
            ankle,
            JointPosition::new(x, 0.5, 0.0),
            1.0,
        ));
        frame.push(JointDetection::new(
            shoulder,
            JointPosition::new(hip_pos.x, hip_pos.y + 0.5, 0.0),
            1.0,
        ));
    }
    frame
}

fn bench_analyze_frame(c: &mut Criterion) {
    let mut analyzer = FormAnalyzer::new();
    analyzer.set_exercise("squat");
    let frame = squat_frame(105.0);

    c.bench_function("analyze_single_frame", |b| {
        b.iter(|| analyzer.analyze(black_box(&frame)))
    });
}

fn bench_full_rep_cycle(c: &mut Criterion) {
    let frames: Vec<JointFrame> = [180.0, 105.0, 80.0, 105.0]
        .iter()
        .map(|&theta| squat_frame(theta))
        .collect();

    c.bench_function("analyze_rep_cycle", |b| {
        b.iter(|| {
            let mut analyzer = FormAnalyzer::new();
            analyzer.set_exercise("squat");
            for frame in &frames {
                black_box(analyzer.analyze(frame));
            }
        })
    });
}

criterion_group!(benches, bench_analyze_frame, bench_full_rep_cycle);
criterion_main!(benches);
