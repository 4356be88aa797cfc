//! Coordination core: per-exchange sessions, activation bookkeeping and the
//! refresh-driven runtime

pub mod coordinator;
pub mod dependency;
pub mod refresher;
pub mod runtime;
pub mod session;

pub use coordinator::*;
pub use dependency::*;
pub use refresher::*;
pub use runtime::*;
pub use session::*;
