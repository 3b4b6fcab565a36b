//! Deterministic fixture shared by unit tests

use std::sync::Arc;
use std::time::Duration;

use crate::dispatch::{Clock, ManualClock};
use crate::platform::HeadlessPlatform;
use crate::runtime::Runtime;
use crate::settings::Settings;
use crate::task::ToastTask;
use crate::toast::{Toast, ToastEvent};

pub(crate) struct Harness {
    pub platform: Arc<HeadlessPlatform>,
    pub clock: Arc<ManualClock>,
    pub runtime: Arc<Runtime>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(&Settings::default())
    }

    pub fn with_settings(settings: &Settings) -> Self {
        let platform = Arc::new(HeadlessPlatform::phone());
        let clock = Arc::new(ManualClock::new());
        let runtime = Runtime::builder(platform.clone())
            .clock(clock.clone())
            .settings(settings)
            .build();
        Self {
            platform,
            clock,
            runtime,
        }
    }

    pub fn task(&self, toast: Toast) -> Arc<ToastTask> {
        ToastTask::new(Arc::clone(&self.runtime), toast)
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn run_pending(&self) -> usize {
        self.runtime.dispatcher().run_pending()
    }

    pub fn run_for(&self, span: Duration) -> usize {
        self.runtime.dispatcher().run_for(span)
    }

    pub fn run_until_idle(&self) -> usize {
        self.runtime.dispatcher().run_until_idle()
    }

    pub fn drain_events(&self) -> Vec<ToastEvent> {
        self.runtime.events().try_iter().collect()
    }
}
