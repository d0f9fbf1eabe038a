//! Simple measure manager.
//!
//! Provides a [`MeasureManager`] capable of registering measures and driving
//! their lifecycle hooks on behalf of a host. Emits structured logs at each
//! lifecycle stage to aid debugging and observability.
//!
//! A panicking measure is isolated with `catch_unwind` so one misbehaving
//! measure cannot take down the host's whole tick.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{error, info};

use crate::{Host, Measure, API_VERSION};

/// Owns the registered measures and drives their hooks.
pub struct MeasureManager {
    measures: Vec<(String, Box<dyn Measure>)>,
}

impl MeasureManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self {
            measures: Vec::new(),
        }
    }

    /// Registers a measure under `name` and logs the registration.
    pub fn register<M>(&mut self, name: impl Into<String>, measure: M)
    where
        M: Measure + 'static,
    {
        let name = name.into();
        info!(stage = "register", measure = %name, api_version = API_VERSION);
        self.measures.push((name, Box::new(measure)));
    }

    /// Runs the configuration load over all registered measures.
    ///
    /// Returns the indices of measures that panicked so the consumer can
    /// react or report the detected problems.
    pub fn reload_all(&mut self, host: &dyn Host) -> Vec<usize> {
        info!(stage = "reload", total = self.measures.len());
        self.dispatch(host, |measure, host| {
            measure.reload(host);
        })
    }

    /// Runs one poll tick over all registered measures.
    ///
    /// Returns the indices of measures that panicked.
    pub fn update_all(&mut self, host: &dyn Host) -> Vec<usize> {
        info!(stage = "update", total = self.measures.len());
        self.dispatch(host, |measure, host| {
            measure.update(host);
        })
    }

    fn dispatch<F>(&mut self, host: &dyn Host, mut hook: F) -> Vec<usize>
    where
        F: FnMut(&mut dyn Measure, &dyn Host),
    {
        let mut failed = Vec::new();
        for (idx, (name, measure)) in self.measures.iter_mut().enumerate() {
            if let Err(err) = catch_unwind(AssertUnwindSafe(|| {
                hook(measure.as_mut(), host);
            })) {
                let msg = if let Some(s) = err.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = err.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "panic without message".to_string()
                };
                error!(measure = %name, error = %msg, "Measure panicked");
                failed.push(idx);
            }
        }
        failed
    }

    /// Answers a string query addressed to the measure registered as
    /// `measure`. Returns `None` when the measure is unknown or does not
    /// answer the query.
    pub fn query(&self, measure: &str, name: &str, args: &[String]) -> Option<&str> {
        self.measures
            .iter()
            .find(|(n, _)| n == measure)
            .and_then(|(_, m)| m.query(name, args))
    }

    /// Names of the registered measures, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.measures.iter().map(|(n, _)| n.as_str()).collect()
    }
}

impl Default for MeasureManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogLevel;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    struct NullHost;

    impl Host for NullHost {
        fn read_path(&self, _key: &str) -> Option<PathBuf> {
            None
        }

        fn log(&self, _level: LogLevel, _message: &str) {}
    }

    struct Counting {
        reloads: Arc<Mutex<u32>>,
        updates: Arc<Mutex<u32>>,
    }

    impl Measure for Counting {
        fn reload(&mut self, _host: &dyn Host) {
            *self.reloads.lock().unwrap() += 1;
        }

        fn update(&mut self, _host: &dyn Host) -> f64 {
            *self.updates.lock().unwrap() += 1;
            0.0
        }

        fn query(&self, name: &str, _args: &[String]) -> Option<&str> {
            (name == "Ping").then_some("pong")
        }
    }

    #[test]
    fn register_and_dispatch() {
        let reloads = Arc::new(Mutex::new(0));
        let updates = Arc::new(Mutex::new(0));
        let mut manager = MeasureManager::new();
        manager.register(
            "counting",
            Counting {
                reloads: reloads.clone(),
                updates: updates.clone(),
            },
        );

        let host = NullHost;
        assert!(manager.reload_all(&host).is_empty());
        assert!(manager.update_all(&host).is_empty());
        assert!(manager.update_all(&host).is_empty());

        assert_eq!(*reloads.lock().unwrap(), 1);
        assert_eq!(*updates.lock().unwrap(), 2);
        assert_eq!(manager.names(), vec!["counting"]);
    }

    #[test]
    fn continues_after_panic() {
        struct PanicMeasure;

        impl Measure for PanicMeasure {
            fn reload(&mut self, _host: &dyn Host) {}

            fn update(&mut self, _host: &dyn Host) -> f64 {
                panic!("boom");
            }
        }

        let updates = Arc::new(Mutex::new(0));
        let mut manager = MeasureManager::new();
        manager.register("panicking", PanicMeasure);
        manager.register(
            "counting",
            Counting {
                reloads: Arc::new(Mutex::new(0)),
                updates: updates.clone(),
            },
        );

        let host = NullHost;
        let failed = manager.update_all(&host);

        assert_eq!(failed, vec![0]);
        assert_eq!(*updates.lock().unwrap(), 1);
    }

    #[test]
    fn query_routes_by_measure_name() {
        let mut manager = MeasureManager::new();
        manager.register(
            "counting",
            Counting {
                reloads: Arc::new(Mutex::new(0)),
                updates: Arc::new(Mutex::new(0)),
            },
        );

        assert_eq!(manager.query("counting", "Ping", &[]), Some("pong"));
        assert_eq!(manager.query("counting", "Other", &[]), None);
        assert_eq!(manager.query("missing", "Ping", &[]), None);
    }
}
