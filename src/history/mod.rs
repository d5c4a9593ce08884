mod identity;
mod storage;
mod types;

pub use identity::{HeaderIdentityResolver, Identity, IdentityResolver};
pub use storage::HistoryStorage;
pub use types::*;
