//! Widget-engine measure that polls BetterDiscord's plugin config file for
//! the badge status value and exposes it, together with the resolved
//! Discord executable, to the hosting overlay.

mod badge;
mod discovery;

pub use badge::{extract, normalize};
pub use discovery::resolve_executable;

use std::fs;
use std::path::PathBuf;

use widget_core::{Host, LogLevel, Measure};

/// Status reported whenever a read, parse or configuration step fails.
/// The overlay renders its failure icon while this value is current.
pub const FAIL_STATUS: &str = "fail";

/// Host variable naming the BetterDiscord plugin config file.
const CONFIG_PATH_VAR: &str = "DiscordPluginConfigPath";

/// Host variable naming the Discord install directory.
const INSTALL_DIR_VAR: &str = "DiscordInstallDir";

/// State owned by one measure instance.
///
/// The two paths are populated by [`Measure::reload`]; only the badge
/// status mutates on poll ticks. Strings returned by the query hooks stay
/// valid until the next mutation of the same field.
pub struct BadgeMeasure {
    status_file: PathBuf,
    app_exe: PathBuf,
    badge_status: String,
}

impl BadgeMeasure {
    /// Creates an unconfigured measure and reports the startup notice to
    /// the host. The measure is inert until the first [`Measure::reload`].
    pub fn new(host: &dyn Host) -> Self {
        host.log(LogLevel::Notice, "Discord badge overlay has started");
        Self {
            status_file: PathBuf::new(),
            app_exe: PathBuf::new(),
            badge_status: String::new(),
        }
    }

    /// Resolved Discord executable path. Empty until a successful reload.
    ///
    /// The argument list is reserved by the host calling convention and is
    /// not consulted.
    pub fn app_exe(&self, _args: &[String]) -> &str {
        self.app_exe.to_str().unwrap_or_default()
    }

    /// Current badge status code, or [`FAIL_STATUS`].
    ///
    /// The argument list is reserved by the host calling convention and is
    /// not consulted.
    pub fn badge_status(&self, _args: &[String]) -> &str {
        &self.badge_status
    }

    fn mark_failed(&mut self) {
        self.badge_status = FAIL_STATUS.to_string();
    }
}

impl Measure for BadgeMeasure {
    /// Resolves both configured paths from the host.
    ///
    /// A failing load reports an error through the host's log, sets the
    /// badge status to [`FAIL_STATUS`] and leaves both paths empty; it is
    /// not retried until the host reloads the configuration again.
    fn reload(&mut self, host: &dyn Host) {
        // A failing load must not leave stale paths from an earlier
        // configuration generation behind.
        self.status_file = PathBuf::new();
        self.app_exe = PathBuf::new();

        let status_file = match host.read_path(CONFIG_PATH_VAR) {
            Some(p) => p,
            None => {
                host.log(
                    LogLevel::Error,
                    &format!("Failed to read {CONFIG_PATH_VAR} variable from config"),
                );
                self.mark_failed();
                return;
            }
        };
        host.log(
            LogLevel::Notice,
            &format!("Found {CONFIG_PATH_VAR} as \"{}\"", status_file.display()),
        );

        let install_dir = match host.read_path(INSTALL_DIR_VAR) {
            Some(p) => p,
            None => {
                host.log(
                    LogLevel::Error,
                    &format!("Failed to read {INSTALL_DIR_VAR} variable from config"),
                );
                self.mark_failed();
                return;
            }
        };
        host.log(
            LogLevel::Debug,
            &format!("Found {INSTALL_DIR_VAR} as \"{}\"", install_dir.display()),
        );

        let app_exe = match discovery::resolve_executable(&install_dir) {
            Ok(path) => path,
            Err(err) => {
                host.log(
                    LogLevel::Error,
                    &format!("Failed to find a valid Discord.exe: {err:#}"),
                );
                self.mark_failed();
                return;
            }
        };
        host.log(
            LogLevel::Debug,
            &format!("Found Discord exe \"{}\"", app_exe.display()),
        );

        self.status_file = status_file;
        self.app_exe = app_exe;
        // No notification observed yet.
        self.badge_status = "0".to_string();
    }

    /// Performs one poll tick against the configured status file.
    ///
    /// Read and parse failures set [`FAIL_STATUS`] without logging; the
    /// next tick retries naturally. The return value is reserved by the
    /// host calling convention.
    fn update(&mut self, host: &dyn Host) -> f64 {
        let contents = match fs::read_to_string(&self.status_file) {
            Ok(c) => c,
            Err(_) => {
                self.mark_failed();
                return 0.0;
            }
        };

        let raw = match badge::extract(&contents) {
            Some(n) => n,
            None => {
                self.mark_failed();
                return 0.0;
            }
        };

        let code = badge::normalize(raw).to_string();
        if code == self.badge_status {
            return 0.0;
        }

        self.badge_status = code;
        host.log(
            LogLevel::Debug,
            &format!("Setting badge status to {}", self.badge_status),
        );
        0.0
    }

    fn query(&self, name: &str, args: &[String]) -> Option<&str> {
        match name {
            "GetAppExe" => Some(self.app_exe(args)),
            "GetBadgeStatus" => Some(self.badge_status(args)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct NullHost;

    impl Host for NullHost {
        fn read_path(&self, _key: &str) -> Option<PathBuf> {
            None
        }

        fn log(&self, _level: LogLevel, _message: &str) {}
    }

    #[test]
    fn starts_unconfigured() {
        let host = NullHost;
        let measure = BadgeMeasure::new(&host);
        assert_eq!(measure.app_exe(&[]), "");
        assert_eq!(measure.badge_status(&[]), "");
    }

    #[test]
    fn unconfigured_tick_fails() {
        let host = NullHost;
        let mut measure = BadgeMeasure::new(&host);
        assert_eq!(measure.update(&host), 0.0);
        assert_eq!(measure.badge_status(&[]), FAIL_STATUS);
    }

    #[test]
    fn unknown_query_is_none() {
        let host = NullHost;
        let measure = BadgeMeasure::new(&host);
        assert_eq!(measure.query("GetSomethingElse", &[]), None);
    }
}
