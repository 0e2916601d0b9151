pub mod correlator;
pub mod store;

pub use correlator::{Outcome, SessionCompleted, correlate};
pub use store::SessionStore;
