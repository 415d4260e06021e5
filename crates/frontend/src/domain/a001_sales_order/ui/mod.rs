pub mod delete;
pub mod details;
pub mod list;

use crate::shared::channel::DashboardChannel;
use crate::shared::toast::Toasts;
use contracts::domain::a001_sales_order::OrderWorkflow;
use leptos::prelude::*;

pub use list::DealsPage;

pub type DashboardWorkflow = OrderWorkflow<DashboardChannel, Toasts>;

/// Workflow over the app channel and toast list; call during component setup.
pub fn use_order_workflow() -> DashboardWorkflow {
    OrderWorkflow::new(expect_context::<DashboardChannel>(), expect_context::<Toasts>())
}
