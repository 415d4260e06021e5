//! Shared dashboard model: order records, metrics, filters, realtime channel
//! protocol and the order workflow. Free of browser dependencies.

pub mod dashboards;
pub mod domain;
pub mod shared;
