//! Friendship command implementations.

use crate::cli::{FriendshipArgs, FriendshipsArgs, PairArgs, RedateArgs};
use crate::context::Context;
use crate::error::{CliError, Result};
use friendzone_domain::Relationship;
use friendzone_validator::ValidationResult;
use tracing::debug;

/// Execute the befriend command: validate, then record.
pub fn execute_befriend(args: FriendshipArgs, ctx: &mut Context) -> Result<()> {
    let mut candidate = build_candidate(&args, ctx)?;
    clean(&candidate, ctx)?;

    let id = ctx.store.save_relationship(&mut candidate)?;
    debug!("Recorded friendship {}", id);
    println!("{}", ctx.formatter.success(&candidate.to_string()));
    Ok(())
}

/// Execute the check command: validate only, never write.
pub fn execute_check(args: FriendshipArgs, ctx: &mut Context) -> Result<()> {
    let candidate = build_candidate(&args, ctx)?;
    clean(&candidate, ctx)?;

    println!("{}", ctx.formatter.info(&format!("Valid: {}", candidate)));
    Ok(())
}

/// Execute the redate command: change the met-date and revalidate in place.
pub fn execute_redate(args: RedateArgs, ctx: &mut Context) -> Result<()> {
    let mut existing = find(&args.party_a, &args.party_b, ctx)?;
    existing.met_date = Some(args.met);
    clean(&existing, ctx)?;

    ctx.store.save_relationship(&mut existing)?;
    println!("{}", ctx.formatter.success(&existing.to_string()));
    Ok(())
}

/// Execute the unfriend command.
pub fn execute_unfriend(args: PairArgs, ctx: &mut Context) -> Result<()> {
    let existing = find(&args.party_a, &args.party_b, ctx)?;
    if let Some(id) = existing.id {
        ctx.store.delete_relationship(id)?;
    }
    println!(
        "{}",
        ctx.formatter
            .success(&format!("{} and {} are no longer friends", args.party_a, args.party_b))
    );
    Ok(())
}

/// Execute the friendships command.
pub fn execute_friendships(args: FriendshipsArgs, ctx: &mut Context) -> Result<()> {
    let relationships = select_friendships(&args, ctx)?;
    println!("{}", ctx.formatter.format_relationships(&relationships, ctx.today())?);
    Ok(())
}

/// Friendships matching the person and recency filters.
fn select_friendships(args: &FriendshipsArgs, ctx: &Context) -> Result<Vec<Relationship>> {
    let mut relationships = match &args.person {
        Some(name) => {
            let person = ctx.resolve(name)?;
            ctx.store.relationships_of(person.id)?
        }
        None => ctx.store.list_relationships()?,
    };
    if args.recent {
        let today = ctx.today();
        relationships.retain(|r| r.met_recently(today));
    }
    Ok(relationships)
}

fn build_candidate(args: &FriendshipArgs, ctx: &Context) -> Result<Relationship> {
    let party_a = ctx.resolve(&args.party_a)?;
    let party_b = ctx.resolve(&args.party_b)?;
    let introducer = args.via.as_deref().map(|name| ctx.resolve(name)).transpose()?;

    Ok(Relationship {
        id: None,
        party_a: Some(party_a),
        party_b: Some(party_b),
        met_date: args.met,
        introducer,
    })
}

fn find(party_a: &str, party_b: &str, ctx: &Context) -> Result<Relationship> {
    let a = ctx.resolve(party_a)?;
    let b = ctx.resolve(party_b)?;
    ctx.store
        .find_relationship(a.id, b.id)?
        .ok_or_else(|| CliError::NotFriends(a.name, b.name))
}

fn clean(candidate: &Relationship, ctx: &Context) -> Result<()> {
    match ctx.relationships.full_clean(candidate, &ctx.store)? {
        ValidationResult::Valid => Ok(()),
        ValidationResult::Invalid(errors) => Err(CliError::Validation(errors)),
    }
}
