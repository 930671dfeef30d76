//! Viewer/editor role gate for mutation operations.
//!
//! This is a UI-affordance gate, NOT a security boundary: the allow-list and
//! the check live on the client and are trivially bypassed by anyone with
//! access to the process or the stored data. Do not use it for
//! authentication or authorization.
//!
//! # Invariants
//! - A missing or blank identity is always `Viewer`.
//! - `AllowListPolicy` compares trimmed, case-insensitive identities.

use std::collections::HashSet;

/// Capability role derived from a caller identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Viewer,
    Editor,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
        }
    }

    pub fn can_mutate(self) -> bool {
        matches!(self, Self::Editor)
    }
}

/// Decides whether an identity may use mutation operations.
pub trait EditorPolicy {
    fn is_editor(&self, identity: &str) -> bool;
}

impl<F> EditorPolicy for F
where
    F: Fn(&str) -> bool,
{
    fn is_editor(&self, identity: &str) -> bool {
        self(identity)
    }
}

/// Fixed allow-list of editor identities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowListPolicy {
    editors: HashSet<String>,
}

impl AllowListPolicy {
    /// Builds a policy from identities; blank values are ignored.
    pub fn new<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let editors = identities
            .into_iter()
            .filter_map(|identity| normalize_identity(identity.as_ref()))
            .collect();
        Self { editors }
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }
}

impl EditorPolicy for AllowListPolicy {
    fn is_editor(&self, identity: &str) -> bool {
        normalize_identity(identity).is_some_and(|identity| self.editors.contains(&identity))
    }
}

/// Resolves the role of `identity` under `policy`.
pub fn role_for<P: EditorPolicy + ?Sized>(policy: &P, identity: Option<&str>) -> Role {
    match identity.and_then(normalize_identity) {
        Some(identity) if policy.is_editor(&identity) => Role::Editor,
        _ => Role::Viewer,
    }
}

fn normalize_identity(identity: &str) -> Option<String> {
    let trimmed = identity.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::{role_for, AllowListPolicy, EditorPolicy, Role};

    #[test]
    fn allow_list_is_case_insensitive() {
        let policy = AllowListPolicy::new(["Chief.Engineer@Plant.example"]);
        assert!(policy.is_editor("chief.engineer@plant.example"));
        assert!(policy.is_editor("  CHIEF.ENGINEER@PLANT.EXAMPLE "));
        assert!(!policy.is_editor("operator@plant.example"));
    }

    #[test]
    fn blank_entries_are_ignored() {
        let policy = AllowListPolicy::new(["", "  ", "a@b.example"]);
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn missing_identity_is_viewer() {
        let policy = AllowListPolicy::new(["a@b.example"]);
        assert_eq!(role_for(&policy, None), Role::Viewer);
        assert_eq!(role_for(&policy, Some("   ")), Role::Viewer);
        assert_eq!(role_for(&policy, Some("A@B.example")), Role::Editor);
    }

    #[test]
    fn closures_act_as_policies() {
        let everyone = |_: &str| true;
        assert_eq!(role_for(&everyone, Some("anyone")), Role::Editor);
        assert!(!Role::Viewer.can_mutate());
    }
}
