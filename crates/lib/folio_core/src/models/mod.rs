//! Domain models shared by the repository, the auth layer and the CLI.

pub mod auth;
pub mod blog;
