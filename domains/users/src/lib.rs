//! Users domain: customers, translators, administrators and the
//! translator directory consulted by project assignment

pub mod api;
pub mod domain;
pub mod mock;
pub mod repository;
pub mod service;

pub use domain::directory::UserDirectory;
pub use domain::entities::User;
pub use mock::InMemoryUserDirectory;
pub use repository::{UserRepository, UsersRepositories};
pub use service::UserService;

pub use api::routes;
pub use api::UsersState;
