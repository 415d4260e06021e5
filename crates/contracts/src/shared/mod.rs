pub mod br_states;
pub mod channel;
pub mod dates;
pub mod money;
pub mod notice;
