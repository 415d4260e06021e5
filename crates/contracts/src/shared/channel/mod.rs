pub mod error;
pub mod message;
pub mod session;
pub mod store;

pub use error::PushError;
pub use message::{ChannelMessage, FrameError};
pub use session::{ChannelSession, ConnectionState, SessionEvent, DASHBOARD_TOPIC};
pub use store::RowStore;
