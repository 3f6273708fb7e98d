//! Command implementations.

pub mod friend;
pub mod friendship;
pub mod init;

pub use self::friend::execute_friend;
pub use self::friendship::{
    execute_befriend, execute_check, execute_friendships, execute_redate, execute_unfriend,
};
pub use self::init::execute_init;

use crate::cli::Command;
use crate::context::Context;
use crate::error::{CliError, Result};

/// Run one parsed command against the context.
///
/// `init` never reaches a store; callers run it through [`execute_init`].
pub fn dispatch(command: Command, ctx: &mut Context) -> Result<()> {
    match command {
        Command::Friend(args) => execute_friend(args, ctx),
        Command::Befriend(args) => execute_befriend(args, ctx),
        Command::Check(args) => execute_check(args, ctx),
        Command::Redate(args) => execute_redate(args, ctx),
        Command::Unfriend(args) => execute_unfriend(args, ctx),
        Command::Friendships(args) => execute_friendships(args, ctx),
        Command::Init(_) => Err(CliError::Config("init runs before a database is opened".into())),
    }
}
