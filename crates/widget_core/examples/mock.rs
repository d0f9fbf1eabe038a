use std::path::PathBuf;

use widget_core::{Host, LogLevel, Measure, MeasureManager, API_VERSION};

struct Mock;

impl Measure for Mock {
    fn reload(&mut self, host: &dyn Host) {
        host.log(LogLevel::Notice, &format!("Mock reloaded with API {API_VERSION}"));
    }

    fn update(&mut self, host: &dyn Host) -> f64 {
        host.log(LogLevel::Debug, "Mock updated");
        0.0
    }
}

struct StdoutHost;

impl Host for StdoutHost {
    fn read_path(&self, _key: &str) -> Option<PathBuf> {
        None
    }

    fn log(&self, level: LogLevel, message: &str) {
        println!("[{level}] {message}");
    }
}

fn main() {
    let mut manager = MeasureManager::new();
    manager.register("mock", Mock);

    let host = StdoutHost;
    manager.reload_all(&host);
    manager.update_all(&host);
}
