//! Benchmarks for the squat analysis pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use squat_core::{AnalysisConfig, FrameSeries, Keypoint, Side, TrackedObjectTrace};
use squat_metrics::SquatAnalyzer;
use squat_signal::{PeakFinder, SavitzkyGolayFilter};

const FRAMES: usize = 1800; // one minute at 30 fps

fn knee_angle(t: usize) -> f64 {
    // one rep every two seconds, bottoming out near 80 degrees
    let phase = (t % 60) as f64 / 60.0 * std::f64::consts::TAU;
    130.0 - 50.0 * phase.cos()
}

fn create_test_set() -> (FrameSeries, TrackedObjectTrace) {
    let knee = [300.0, 400.0];
    let mut xy = vec![[[f64::NAN; 2]; Keypoint::COUNT]; FRAMES];
    let mut conf = vec![[0.0; Keypoint::COUNT]; FRAMES];

    for t in 0..FRAMES {
        let theta = knee_angle(t).to_radians();
        let jitter = if t % 7 == 0 { 1.5 } else { -0.5 };
        xy[t][Side::Right.hip().index()] = [
            knee[0] - 100.0 * theta.sin() + jitter,
            knee[1] + 100.0 * theta.cos(),
        ];
        xy[t][Side::Right.knee().index()] = knee;
        xy[t][Side::Right.ankle().index()] = [knee[0], knee[1] + 100.0];
        for kp in Side::Right.joints() {
            conf[t][kp.index()] = if t % 50 == 0 { 0.1 } else { 0.9 };
        }
    }

    let bar: Vec<[f64; 2]> = (0..FRAMES)
        .map(|t| [480.0 + (t as f64 * 0.2).sin() * 3.0, 250.0])
        .collect();
    let bar_conf = vec![0.8; FRAMES];

    (
        FrameSeries::from_frames(&xy, &conf).unwrap(),
        TrackedObjectTrace::from_frames(&bar, &bar_conf).unwrap(),
    )
}

fn benchmark_smoothing(c: &mut Criterion) {
    let filter = SavitzkyGolayFilter::new(9, 2).unwrap();
    let signal: Vec<f64> = (0..FRAMES)
        .map(|i| (i as f64 * 0.1).sin() * 50.0 + if i % 3 == 0 { 2.0 } else { 0.0 })
        .collect();

    c.bench_function("savgol_1800", |b| {
        b.iter(|| filter.filter_signal(black_box(&signal)))
    });
}

fn benchmark_peaks(c: &mut Criterion) {
    let finder = PeakFinder::default();
    let signal: Vec<f64> = (0..FRAMES).map(|i| -knee_angle(i)).collect();

    c.bench_function("find_peaks_1800", |b| {
        b.iter(|| finder.find(black_box(&signal)))
    });
}

fn benchmark_analysis(c: &mut Criterion) {
    let analyzer = SquatAnalyzer::new(AnalysisConfig::default()).unwrap();
    let (frames, bar) = create_test_set();

    c.bench_function("analyze_1800_frames", |b| {
        b.iter(|| analyzer.analyze(black_box(&frames), black_box(&bar), 30))
    });
}

criterion_group!(
    benches,
    benchmark_smoothing,
    benchmark_peaks,
    benchmark_analysis
);
criterion_main!(benches);
