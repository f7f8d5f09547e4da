//! Page sessions: the interaction state machine of the RoleJump page, held
//! server-side per visitor and driven over HTTP.

pub mod handlers;
pub mod page;
pub mod store;

pub use store::SessionStore;
