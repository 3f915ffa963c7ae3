//! Named git identity profiles, stored in `~/.gitprofiles.json` and applied
//! to the local config of the current repository.

pub mod cli;
pub mod commands;
pub mod engine;
pub mod error;
pub mod git;
pub mod menu;
pub mod profile;
pub mod storage;
pub mod validation;

pub use error::AppError;
pub use git::{ConfigGateway, GitCli};
pub use profile::{Profile, ProfileMap};
pub use storage::ProfileStore;
