//! Friend (person) command implementation.

use crate::cli::{FriendAction, FriendArgs};
use crate::context::Context;
use crate::error::{CliError, Result};
use friendzone_domain::Person;
use friendzone_validator::ValidationResult;
use tracing::info;

/// Execute the friend command.
pub fn execute_friend(args: FriendArgs, ctx: &mut Context) -> Result<()> {
    match args.action {
        FriendAction::Add { name } => add(ctx, name),
        FriendAction::List => {
            let persons = ctx.store.list_persons()?;
            println!("{}", ctx.formatter.format_persons(&persons)?);
            Ok(())
        }
        FriendAction::Rename { name, new_name } => rename(ctx, &name, new_name),
        FriendAction::Remove { name } => {
            let person = ctx.resolve(&name)?;
            ctx.store.delete_person(person.id)?;
            info!("Removed {}", person.id);
            println!("{}", ctx.formatter.success(&format!("Removed {}", person)));
            Ok(())
        }
    }
}

fn add(ctx: &mut Context, name: String) -> Result<()> {
    let person = Person::new(name);
    if let ValidationResult::Invalid(errors) = ctx.persons.validate(&person, &ctx.store)? {
        return Err(CliError::Validation(errors));
    }

    ctx.store.insert_person(&person)?;
    println!("{}", ctx.formatter.success(&format!("Added {}", person)));
    Ok(())
}

fn rename(ctx: &mut Context, name: &str, new_name: String) -> Result<()> {
    let existing = ctx.resolve(name)?;
    let renamed = Person::with_id(existing.id, new_name);
    if let ValidationResult::Invalid(errors) = ctx.persons.validate(&renamed, &ctx.store)? {
        return Err(CliError::Validation(errors));
    }

    ctx.store.rename_person(renamed.id, &renamed.name)?;
    println!(
        "{}",
        ctx.formatter.success(&format!("Renamed {} to {}", existing, renamed))
    );
    Ok(())
}
