mod backend;
mod gotrue;
mod memory;
mod service;
mod session;

pub use backend::{AuthBackend, SignUpOutcome};
pub use gotrue::GoTrueAuth;
pub use memory::InMemoryAuth;
pub use service::AuthService;
pub use session::{AuthEvent, AuthUser, Session, SessionState, Subscription};
