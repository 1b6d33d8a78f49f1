//! Chat command adapter for the TapCoin ledger engine
//!
//! Platform-agnostic: a transport feeds `(user_id, text)` pairs into
//! [`BotService::handle_message`] and sends the returned [`Reply`] back to
//! the user. All conversation state lives in the adapter's session map; the
//! engine itself stays stateless between calls.

pub mod command;
pub mod render;
pub mod service;
pub mod session;

pub use command::Command;
pub use render::{Keyboard, Reply};
pub use service::{BotConfig, BotService};
pub use session::{PendingInput, SessionStore};
