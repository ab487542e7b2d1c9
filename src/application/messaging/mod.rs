//! Message handling - Event-driven message processing

pub mod dispatcher;
pub mod markup;
pub mod parser;

pub use dispatcher::{EventDispatcher, Outcome};
pub use markup::{escape_markup, new_nonce, strip_query};
pub use parser::{lowercase, tokenize, MessageParser};
