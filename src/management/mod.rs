mod session;
mod store;

pub use session::{EXPIRY_MARGIN_SECS, SessionManager};
pub use store::{MemoryTokenStore, TokenStore};
