// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The profile domain entity and its mutation type.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// A user profile.
///
/// The durable store owns the authoritative instance; anything the cache
/// hands out is a disposable snapshot. The subject identifier produced by
/// authentication is the profile key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Subject identifier, unique across the store.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Role labels granted to this profile.
    pub roles: Vec<String>,
    /// When the durable store last wrote this profile.
    pub updated_at: SystemTime,
}

impl Profile {
    /// Creates a profile with no roles and an epoch timestamp.
    ///
    /// Timestamps are owned by the durable store; it overwrites `updated_at`
    /// on every write.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            roles: Vec::new(),
            updated_at: SystemTime::UNIX_EPOCH,
        }
    }
}

/// A partial update to a profile.
///
/// Unset fields are left untouched. The durable store applies the mutation
/// (read-modify-write or direct patch, per its own contract) and returns the
/// resulting profile.
///
/// # Examples
///
/// ```
/// use profilon::{Profile, ProfileMutation};
///
/// let mut profile = Profile::new("u1", "Ann", "ann@example.com");
/// ProfileMutation::new().with_name("Annie").apply(&mut profile);
///
/// assert_eq!(profile.name, "Annie");
/// assert_eq!(profile.email, "ann@example.com");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMutation {
    name: Option<String>,
    email: Option<String>,
    roles: Option<Vec<String>>,
}

impl ProfileMutation {
    /// Creates an empty mutation that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the contact address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Replaces the role labels.
    #[must_use]
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = Some(roles);
        self
    }

    /// The new display name, if the mutation sets one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The new contact address, if the mutation sets one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// The replacement role labels, if the mutation sets them.
    #[must_use]
    pub fn roles(&self) -> Option<&[String]> {
        self.roles.as_deref()
    }

    /// Applies the mutation to a profile in place.
    ///
    /// Convenience for read-modify-write store implementations; does not
    /// touch `updated_at`, which the store stamps itself.
    pub fn apply(&self, profile: &mut Profile) {
        if let Some(name) = &self.name {
            profile.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            profile.email.clone_from(email);
        }
        if let Some(roles) = &self.roles {
            profile.roles.clone_from(roles);
        }
    }
}
