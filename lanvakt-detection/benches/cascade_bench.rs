#[macro_use]
extern crate criterion;

use std::time::Duration;

use criterion::Criterion;

use lanvakt_capture::ScriptedCapture;
use lanvakt_core::SamplingWindow;
use lanvakt_detection::RuleCascade;

fn bench_cascade_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade_evaluate");
    let cascade = RuleCascade::new("aa:bb:cc:dd:ee:fe".parse().unwrap());
    let window = SamplingWindow::new("eth0", Duration::ZERO);

    for depth in 0..=cascade.rules().len() {
        group.bench_function(format!("match_at_{}", depth), |b| {
            let mut capture = ScriptedCapture::new();
            if let Some(rule) = cascade.rules().get(depth) {
                capture = capture.matching(rule.filter());
            }
            b.iter(|| {
                capture.reset();
                cascade.evaluate(&capture, &window).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cascade_evaluate);
criterion_main!(benches);
