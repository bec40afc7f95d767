// Example demonstrating the conlog console sink
//
// Run with: cargo run --example logging_demo

use anyhow::Result;
use conlog::{
    lcrit, ldebug, lerror, linfo, ltrace, lwarn, Channel, Color, LogConfig, Registry, Severity,
};

fn main() -> Result<()> {
    // Everything at trace and above, colorized when stderr is a terminal
    let registry = Registry::with_config(LogConfig {
        threshold: Severity::Trace,
        ..LogConfig::default()
    });

    linfo!(registry, "severity helpers:");
    ltrace!(registry, "trace line on the low channel");
    ldebug!(registry, "debug line on the low channel");
    linfo!(registry, "info line on the low channel");
    lwarn!(registry, "warn line on the high channel");
    lerror!(registry, "error line on the high channel");
    lcrit!(registry, "crit line on the high channel");

    // Per-channel colors can change at runtime
    registry.set_color(Channel::Low, Color::FG_CYAN);
    registry.set_color(Channel::High, Color::BG_MAGENTA | Color::FG_WHITE);
    linfo!(registry, "low channel, now cyan");
    lerror!(registry, "high channel, now magenta");

    // Threshold filtering is runtime-adjustable
    registry.set_threshold(Severity::Warn);
    linfo!(registry, "this info line is filtered out");
    lwarn!(registry, "warnings still get through");
    registry.set_threshold(Severity::Trace);

    // Redirect the low channel to a file; color is dropped automatically
    let log_dir = std::env::temp_dir().join("conlog_demo");
    std::fs::create_dir_all(&log_dir)?;
    let low_path = log_dir.join("low.log");
    registry.sink(Channel::Low).unwrap().redirect_path(&low_path)?;
    linfo!(registry, "this line lands in {}", low_path.display());
    lwarn!(registry, "low channel now writes to {}", low_path.display());

    // Installing makes the registry available process-wide; dropping the
    // guard restores whatever was installed before
    let _guard = conlog::install(registry);
    if let Some(active) = conlog::installed() {
        lerror!(active, "logged through the installed registry");
    }

    Ok(())
}
