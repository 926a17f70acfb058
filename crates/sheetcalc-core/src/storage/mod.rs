//! Session storage: the whole store state as a JSON document.

mod parser;
mod session;
mod writer;

pub use parser::{parse_session, parse_session_content};
pub use session::Session;
pub use writer::{write_session, write_session_content};
