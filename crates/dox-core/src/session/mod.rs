//! Session domain module.
//!
//! - `model`: `Session`, `Turn` and `TurnRole`
//! - `store`: the per-terminal `SessionStore`

mod model;
mod store;

pub use model::{Session, Turn, TurnRole};
pub use store::{DEFAULT_SESSION_ID, SessionStore};
