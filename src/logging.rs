//! Stdout line logger: `timestamp, LEVEL, message, target`.

use std::io::Write;

use chrono::Local;
use env_logger::{Builder, Env, Target};

/// Install the global logger. Defaults to `debug`; `RUST_LOG` overrides.
pub fn init() {
    builder().init();
}

fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("debug"));
    builder
        .target(Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{}, {}, {}, {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.args(),
                record.target()
            )
        })
        // reqwest/hyper internals are noisy at debug.
        .filter_module("hyper_util", log::LevelFilter::Info)
        .filter_module("reqwest", log::LevelFilter::Info);
    builder
}
