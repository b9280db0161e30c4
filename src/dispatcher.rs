//! Message dispatcher - decides whether a message is for the bot and answers it.

mod addressing;
mod decision;
mod handler;
#[cfg(test)]
mod testing;
mod typing;

pub use addressing::{name_matches, strip_address_prefix};
pub use decision::{
    COMMAND_PREFIX, DispatchDecision, DispatchSettings, IgnoreReason, PRIVATE_SESSION_MEMBERS,
    decide, screen,
};
pub use handler::{DENIAL_TEXT, Dispatcher, Outcome};
pub use typing::{TYPING_TIMEOUT, while_typing};
