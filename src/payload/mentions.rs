//! Allowed-mentions policy
//!
//! Controls which mention categories in a message actually notify anyone.

use serde::{Deserialize, Serialize};

/// Flags the policy is derived from; everything is allowed by default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionOptions {
    pub allow_users: bool,
    pub allow_roles: bool,
    pub allow_everyone: bool,
    pub allow_replied_user: bool,
}

impl Default for MentionOptions {
    fn default() -> Self {
        Self {
            allow_users: true,
            allow_roles: true,
            allow_everyone: true,
            allow_replied_user: true,
        }
    }
}

impl MentionOptions {
    /// Suppress every mention, including the replied-to user
    pub fn none() -> Self {
        Self {
            allow_users: false,
            allow_roles: false,
            allow_everyone: false,
            allow_replied_user: false,
        }
    }
}

/// Mention category names on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionCategory {
    Users,
    Roles,
    Everyone,
}

/// Wire form: `{"parse": [...], "replied_user": bool}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionPolicy {
    parse: Vec<MentionCategory>,
    replied_user: bool,
}

impl MentionPolicy {
    /// Derive the category list in fixed `users, roles, everyone` order
    pub fn new(options: MentionOptions) -> Self {
        let parse = [
            (options.allow_users, MentionCategory::Users),
            (options.allow_roles, MentionCategory::Roles),
            (options.allow_everyone, MentionCategory::Everyone),
        ]
        .into_iter()
        .filter_map(|(allowed, category)| allowed.then_some(category))
        .collect();

        Self {
            parse,
            replied_user: options.allow_replied_user,
        }
    }

    pub fn categories(&self) -> &[MentionCategory] {
        &self.parse
    }

    pub fn replied_user(&self) -> bool {
        self.replied_user
    }
}

impl Default for MentionPolicy {
    fn default() -> Self {
        Self::new(MentionOptions::default())
    }
}

impl From<MentionOptions> for MentionPolicy {
    fn from(options: MentionOptions) -> Self {
        Self::new(options)
    }
}
