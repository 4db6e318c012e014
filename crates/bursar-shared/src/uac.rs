//! Shared items related to user account control

mod errors;
mod permissions;
mod responses;
mod role;
mod user;

pub use errors::{AuthError, PermissionsError};
pub use permissions::PermissionRule;
pub use responses::LoginResponse;
pub use role::{Role, GROUP_ACCOUNTANT, GROUP_ADMIN, GROUP_BACKEND_USER};
pub use user::{Identity, Username};
