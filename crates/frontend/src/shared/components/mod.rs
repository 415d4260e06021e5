pub mod breakdown_list;
pub mod card_animated;
pub mod kpi_card;
pub mod status_badge;

pub use breakdown_list::BreakdownList;
pub use kpi_card::{KpiCard, KpiTone};
pub use status_badge::StatusBadge;
