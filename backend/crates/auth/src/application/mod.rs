//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod change_password;
pub mod config;
pub mod delete_account;
pub mod login;
pub mod register;
pub mod token;
pub mod update_profile;

// Re-exports
pub use authenticate::AuthenticateUseCase;
pub use change_password::{ChangePasswordInput, ChangePasswordOutput, ChangePasswordUseCase};
pub use config::AuthConfig;
pub use delete_account::DeleteAccountUseCase;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use token::TokenService;
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};
