//! Cycle-safe recursive traversal
//!
//! Every composite runtype (dictionary, array, tuple, record) descends into
//! its members through [`traverse_members`], which threads one [`Traversal`]
//! through the whole call tree.
//!
//! # Algorithm
//!
//! - A container already in `visited` and not in `failed` is accepted
//!   immediately on re-entry. This breaks cycles: the first entry is still
//!   being checked further up the stack, and is optimistically assumed valid
//!   until one of its members proves otherwise.
//! - Otherwise the container is recorded in `visited` *before* any member is
//!   checked, then members are validated in enumeration order.
//! - The first failing member marks the container as `failed` and the
//!   failure is returned with the member key prepended to its path. The
//!   remaining members are not checked.
//! - A container re-entered while in `failed` is checked again. Its failed
//!   mark is dropped for the duration of that check, so a cycle running back
//!   into it is accepted rather than re-checked without end.
//!
//! Re-entry acceptance is an approximation for cyclic inputs, not a fixed
//! point: siblings already accepted are not revisited when a later member
//! fails.
//!
//! Both sets are keyed by node identity within a [`Scope`]. A node is
//! checked at most once per scope until it fails, which bounds the work on
//! cyclic input. Only intersections open scopes: each intersectee checks
//! the value in its own scope, so nodes accepted by one intersectee are not
//! taken as revisits by the next.

use crate::config::TraversalConfig;
use crate::errors::{Failure, FailureCode, ValidationResult};
use crate::runtype::Runtype;
use crate::value::{NodeId, Value};
use std::collections::HashSet;

// ============================================================================
// Traversal State
// ============================================================================

/// Outcome of entering a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// First entry (or re-entry of a known-failed node): check the members
    Fresh,
    /// Re-entry of a node not known to have failed: accept it as-is
    Revisit,
}

/// Namespace for visited/failed marks
///
/// The root scope is shared by everything outside an intersection. An
/// intersection opens one scope per intersectee, identified by the
/// intersection runtype and the intersectee's position, so a recursive
/// intersection reuses the same finite set of scopes at every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Scope {
    intersection: usize,
    branch: usize,
}

impl Scope {
    /// Scope of the `branch`-th intersectee of `intersection`
    pub fn branch(intersection: &Runtype, branch: usize) -> Self {
        Self {
            intersection: intersection.id(),
            branch,
        }
    }
}

/// Identity sets for one top-level validation call
///
/// Created fresh by `Runtype::validate` and passed by `&mut` to every nested
/// `Runtype::validate_with`. Never reuse one across independent calls.
#[derive(Debug, Clone, Default)]
pub struct Traversal {
    visited: HashSet<(NodeId, Scope)>,
    failed: HashSet<(NodeId, Scope)>,
    scope: Scope,
    depth: usize,
    config: TraversalConfig,
}

impl Traversal {
    /// Create empty traversal state with the default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty traversal state with a custom config
    pub fn with_config(config: TraversalConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    /// Enter a container node in the current scope
    pub fn enter(&mut self, node: NodeId) -> Visit {
        let key = (node, self.scope);
        if !self.visited.insert(key) {
            if !self.failed.remove(&key) {
                tracing::trace!(%node, "re-entered visited node, accepting");
                return Visit::Revisit;
            }
            tracing::trace!(%node, "re-entered failed node, checking again");
        }
        Visit::Fresh
    }

    /// Record that a node failed validation in the current scope
    pub fn mark_failed(&mut self, node: NodeId) {
        self.failed.insert((node, self.scope));
    }

    pub fn is_visited(&self, node: NodeId) -> bool {
        self.visited.contains(&(node, self.scope))
    }

    pub fn is_failed(&self, node: NodeId) -> bool {
        self.failed.contains(&(node, self.scope))
    }

    /// Visited entries across all scopes
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Failed entries across all scopes
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Current container nesting depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Switch to `scope`, returning the scope to restore afterwards
    pub fn enter_scope(&mut self, scope: Scope) -> Scope {
        std::mem::replace(&mut self.scope, scope)
    }

    /// Return to a scope saved by [`Traversal::enter_scope`]
    pub fn restore_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }
}

// ============================================================================
// Member Traversal
// ============================================================================

/// One member of a composite: its key, its value and the runtype to apply
#[derive(Debug, Clone)]
pub struct Member {
    pub key: String,
    pub value: Value,
    pub runtype: Runtype,
}

impl Member {
    pub fn new(key: impl Into<String>, value: Value, runtype: Runtype) -> Self {
        Self {
            key: key.into(),
            value,
            runtype,
        }
    }
}

/// Validate the members of `container` with cycle detection
///
/// `members` is only invoked when the container actually has to be checked
/// (not on a cycle short-circuit). `check_key` runs before each member's
/// value is validated; its failure is returned without a key path.
///
/// On success the container handle itself is returned.
pub fn traverse_members<M, I, K>(
    traversal: &mut Traversal,
    container: &Value,
    members: M,
    mut check_key: K,
) -> ValidationResult<Value>
where
    M: FnOnce() -> I,
    I: IntoIterator<Item = Member>,
    K: FnMut(&str) -> ValidationResult<()>,
{
    let node = container.node_id();

    if let Some(node) = node {
        if traversal.enter(node) == Visit::Revisit {
            return Ok(container.clone());
        }
    }

    if let Some(max) = traversal.config.max_depth {
        if traversal.depth >= max {
            tracing::warn!(max_depth = max, "validation depth cap reached");
            if let Some(node) = node {
                traversal.mark_failed(node);
            }
            return Err(Failure::new(
                FailureCode::DepthExceeded,
                format!("Maximum validation depth of {} exceeded", max),
            ));
        }
    }

    traversal.depth += 1;
    let result = check_members(traversal, members(), &mut check_key);
    traversal.depth -= 1;

    match result {
        Ok(()) => Ok(container.clone()),
        Err(failure) => {
            if let Some(node) = node {
                traversal.mark_failed(node);
            }
            Err(failure)
        }
    }
}

fn check_members<I, K>(traversal: &mut Traversal, members: I, check_key: &mut K) -> ValidationResult<()>
where
    I: IntoIterator<Item = Member>,
    K: FnMut(&str) -> ValidationResult<()>,
{
    for member in members {
        // A rejected key fails the container like a rejected value does, so a
        // later re-entry checks it again instead of accepting it
        check_key(&member.key)?;
        member
            .runtype
            .validate_with(&member.value, traversal)
            .map_err(|failure| failure.within(&member.key))?;
    }
    Ok(())
}
