use chrono::{DateTime, Local};
use contracts::dashboards::d400_sales_overview::{CategoryTab, DashboardFilter};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// App-wide UI state: header filters and the wall clock.
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub filter: RwSignal<DashboardFilter>,
    pub now: RwSignal<DateTime<Local>>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            filter: RwSignal::new(DashboardFilter::default()),
            now: RwSignal::new(Local::now()),
        }
    }

    pub fn select_category(&self, tab: CategoryTab) {
        self.filter.update(|f| f.select_category(tab));
    }

    pub fn toggle_state(&self, state: &str) {
        self.filter.update(|f| f.toggle_state(state));
    }

    pub fn clear_state(&self) {
        self.filter.update(|f| f.state = None);
    }

    /// Ticks `now` every second until the signal is disposed.
    pub fn start_clock(&self) {
        let now = self.now;
        spawn_local(async move {
            loop {
                TimeoutFuture::new(1_000).await;
                if now.try_set(Local::now()).is_some() {
                    break;
                }
            }
        });
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}
