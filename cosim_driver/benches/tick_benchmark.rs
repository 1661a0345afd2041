//! Tick body benchmark.
//!
//! Measures one full tick (sample → integrate → set → step → get → emit)
//! against the echo and drone backends, without the pacing sleep.

use criterion::{Criterion, criterion_group, criterion_main};

use cosim_common::config::CosimConfig;
use cosim_common::types::ChannelId;
use cosim_driver::driver::CosimDriver;
use cosim_driver::sink::LogSink;
use cosim_model::builtin_registry;

fn bench_tick(c: &mut Criterion, backend: &str) {
    let mut config = CosimConfig::default();
    config.model.backend = backend.to_string();
    config.bindings.command_y = "ycoord".to_string();
    config.bindings.command_z = "zcoord".to_string();

    let registry = builtin_registry();
    let mut driver = CosimDriver::new(&config, registry.create(backend).unwrap());
    driver.start(0.0).unwrap();
    driver.channels().activate(ChannelId::XPos, 1.0);

    let mut sink = LogSink::new(u64::MAX);
    c.bench_function(&format!("tick_{backend}"), |b| {
        b.iter(|| {
            driver.tick(&mut sink).unwrap();
        })
    });
}

fn tick_benchmark(c: &mut Criterion) {
    bench_tick(c, "echo");
    bench_tick(c, "drone");
}

criterion_group!(benches, tick_benchmark);
criterion_main!(benches);
