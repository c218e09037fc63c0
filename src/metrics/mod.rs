/*
 * Prometheus counters for user actions
 */

use prometheus::{Encoder, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use crate::models::{NvoError, Result};

pub struct Metrics {
    registry: Registry,
    actions: IntCounterVec,
    in_flight: IntGaugeVec,
    running: Mutex<HashMap<String, Arc<AtomicI64>>>,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let actions = IntCounterVec::new(
            Opts::new("nvo_actions_total", "User actions by outcome"),
            &["action", "outcome"],
        )
        .map_err(metrics_error)?;
        let in_flight = IntGaugeVec::new(
            Opts::new("nvo_actions_in_flight", "Actions currently awaiting the chain"),
            &["action"],
        )
        .map_err(metrics_error)?;

        registry.register(Box::new(actions.clone())).map_err(metrics_error)?;
        registry.register(Box::new(in_flight.clone())).map_err(metrics_error)?;

        Ok(Self {
            registry,
            actions,
            in_flight,
            running: Mutex::new(HashMap::new()),
        })
    }

    /// Marks an action as started and returns how many were already running.
    pub fn action_started(&self, action: &str) -> i64 {
        let previous = self.running_counter(action).fetch_add(1, Ordering::SeqCst);
        self.in_flight.with_label_values(&[action]).inc();
        previous
    }

    pub fn action_finished(&self, action: &str, outcome: &str) {
        self.running_counter(action).fetch_sub(1, Ordering::SeqCst);
        self.in_flight.with_label_values(&[action]).dec();
        self.actions.with_label_values(&[action, outcome]).inc();
    }

    fn running_counter(&self, action: &str) -> Arc<AtomicI64> {
        // A poisoned map still holds valid counters.
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        running.entry(action.to_string()).or_default().clone()
    }

    #[must_use]
    pub fn action_count(&self, action: &str, outcome: &str) -> u64 {
        self.actions.with_label_values(&[action, outcome]).get()
    }

    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(metrics_error)?;
        String::from_utf8(buffer).map_err(|e| NvoError::ConfigError(format!("Metrics are not UTF-8: {e}")))
    }
}

fn metrics_error(e: prometheus::Error) -> NvoError {
    NvoError::ConfigError(format!("Metrics error: {e}"))
}
