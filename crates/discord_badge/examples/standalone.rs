//! Drives the badge measure outside a widget engine.
//!
//! Reads host variables from a TOML settings file and polls once per
//! second, printing the query hooks the overlay would consume:
//!
//! ```text
//! cargo run --example standalone -- settings.toml
//! ```
//!
//! where `settings.toml` contains:
//!
//! ```toml
//! DiscordPluginConfigPath = "plugin-config.json"
//! DiscordInstallDir = "C:/Users/me/AppData/Local/Discord"
//! ```

use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use tracing::level_filters::LevelFilter;

use discord_badge::BadgeMeasure;
use widget_core::{Measure, SettingsHost};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let settings = std::env::args()
        .nth(1)
        .context("usage: standalone <settings.toml>")?;
    let host = SettingsHost::load(Path::new(&settings))?;

    let mut measure = BadgeMeasure::new(&host);
    measure.reload(&host);
    println!("exe: {}", measure.app_exe(&[]));

    let mut last = String::new();
    loop {
        measure.update(&host);
        let status = measure.badge_status(&[]);
        if status != last {
            println!("badge: {status}");
            last = status.to_string();
        }
        thread::sleep(Duration::from_secs(1));
    }
}
