pub mod aggregate;
pub mod commands;
pub mod draft;
pub mod workflow;

pub use aggregate::{composite_key, OrderRecord, OrderStatus, SalesSnapshot, UNASSIGNED_PROFESSIONAL};
pub use commands::OrderCommand;
pub use draft::{OrderDraft, OrderPatch, CATEGORY_OPTIONS};
pub use workflow::{OrderChannel, OrderError, OrderWorkflow, DELETE_CONFIRMATION};
