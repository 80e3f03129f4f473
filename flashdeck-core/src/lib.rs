pub mod errors;
pub mod models;
pub mod session;
pub mod store;
pub mod workspace;

pub use errors::*;
pub use models::*;
pub use session::*;
pub use store::*;
pub use workspace::*;
