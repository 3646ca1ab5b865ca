use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, SubsecRound, Utc};

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::database::{Document, DocumentStore, Repository};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<AppConfig>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: Arc<AppConfig>, clock: Arc<dyn Clock>) -> Self {
        Self { store, config, clock }
    }

    pub fn repo<T: Document>(&self) -> Repository<T> {
        Repository::new(self.store.clone())
    }

    /// Current instant at whole-second precision
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(0)
    }

    /// Office time zone
    pub fn local_offset(&self) -> FixedOffset {
        crate::services::worktime::local_offset(self.config.worktime.utc_offset_minutes)
    }

    /// Calendar day in the office time zone
    pub fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.local_offset()).date_naive()
    }
}
