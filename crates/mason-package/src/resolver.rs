//! Transitive dependency resolution against a repository of sdists
//!
//! Resolution is a depth-first walk. Each requirement is satisfied by the
//! highest available version its strength allows; every chosen sdist appears
//! once in the result, in discovery order.

use crate::dependency::Dependency;
use crate::repository::{Repository, Sdist};
use thiserror::Error;
use tracing::debug;

/// Name used as the requester of top-level dependencies
pub const ROOT_REQUESTER: &str = "<root>";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Unresolvable dependency: {requester} requires {constraint}, but no available distribution satisfies it")]
    Unresolvable {
        requester: String,
        constraint: Dependency,
    },

    #[error("Version conflict: {requester} requires {constraint}, but {selected} was already selected")]
    Conflict {
        requester: String,
        constraint: Dependency,
        selected: String,
    },
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Resolve one dependency and everything it transitively requires
pub fn find_dependencies<R>(repo: &R, dep: &Dependency) -> ResolveResult<Vec<Sdist>>
where
    R: Repository + ?Sized,
{
    find_all_dependencies(repo, std::slice::from_ref(dep))
}

/// Resolve a list of dependencies into one deduplicated sdist list
pub fn find_all_dependencies<'a, R, I>(repo: &R, deps: I) -> ResolveResult<Vec<Sdist>>
where
    R: Repository + ?Sized,
    I: IntoIterator<Item = &'a Dependency>,
{
    let mut acc = Vec::new();
    for dep in deps {
        do_find_deps(repo, ROOT_REQUESTER, dep, &mut acc)?;
    }
    Ok(acc)
}

fn do_find_deps<R>(
    repo: &R,
    requester: &str,
    dep: &Dependency,
    acc: &mut Vec<Sdist>,
) -> ResolveResult<()>
where
    R: Repository + ?Sized,
{
    // A version picked earlier wins as long as it still satisfies this requirement
    if let Some(selected) = acc.iter().find(|s| s.manifest.name == dep.name) {
        if dep.matches(&selected.manifest.version) {
            debug!("{} already satisfied by {}", dep, selected.id());
            return Ok(());
        }
        return Err(ResolveError::Conflict {
            requester: requester.to_string(),
            constraint: dep.clone(),
            selected: selected.id().to_string(),
        });
    }

    let chosen = repo
        .candidates(&dep.name)
        .into_iter()
        .filter(|s| dep.matches(&s.manifest.version))
        .max_by(|a, b| a.manifest.version.cmp(&b.manifest.version))
        .cloned()
        .ok_or_else(|| ResolveError::Unresolvable {
            requester: requester.to_string(),
            constraint: dep.clone(),
        })?;

    let chosen_id = chosen.id().to_string();
    debug!("Resolved {} to {}", dep, chosen_id);

    let transitive = chosen.manifest.depends.clone();
    acc.push(chosen);

    for next in &transitive {
        do_find_deps(repo, &chosen_id, next, acc)?;
    }
    Ok(())
}
