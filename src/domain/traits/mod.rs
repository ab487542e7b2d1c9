//! Domain traits - Abstractions for infrastructure implementations

pub mod session;
pub mod media;
pub mod clock;

pub use session::{EventSource, StanzaSink};
pub use media::MediaResolver;
pub use clock::{Clock, SystemClock};
