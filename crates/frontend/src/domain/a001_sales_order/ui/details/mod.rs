pub mod view;
pub mod view_model;

pub use view::OrderFormModal;
pub use view_model::OrderFormVm;
