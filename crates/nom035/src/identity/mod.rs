//! Accounts, bearer tokens and capability checks.

pub mod capability;
pub mod denylist;
pub mod domain;
pub mod extract;
pub mod password;
pub mod repository;
pub mod router;
pub mod service;
pub mod token;

#[cfg(test)]
mod tests;

pub use capability::{Capability, Forbidden};
pub use denylist::{spawn_sweeper, InMemoryTokenDenylist, TokenDenylist};
pub use domain::{
    LoginInput, LoginResponse, NewUser, RegisterInput, Role, User, UserId, UserView,
};
pub use extract::{AuthRejection, AuthenticatedUser};
pub use repository::{RepositoryError, UserRepository};
pub use router::identity_router;
pub use service::{IdentityError, IdentityService};
pub use token::{Authenticator, Claims, IssuedToken, TokenCodec, TokenError};
