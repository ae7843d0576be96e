//! # Identity Seam
//!
//! The identity provider is an external collaborator; this module defines
//! the trait the workflow consumes and the profile bootstrap that runs on
//! every successful sign-in.

use crate::model::{Identity, Profile, UserId};
use async_trait::async_trait;
use feed_store::{CollectionClient, StoreError};
use rand::Rng;
use tracing::{info, instrument, warn};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("sign-in failed: {0}")]
    SignInFailed(String),
    #[error("profile store unavailable: {0}")]
    Store(#[from] StoreError),
}

/// Interactive sign-in/sign-out boundary.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self) -> Result<Identity, AuthError>;
    async fn sign_out(&self);
}

/// Provider with one fixed identity, for the demo binary and tests.
#[derive(Debug, Clone)]
pub struct StaticAuth {
    identity: Identity,
}

impl StaticAuth {
    pub fn new(uid: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            identity: Identity {
                uid: UserId::new(uid),
                name: name.into(),
                email: email.into(),
            },
        }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn sign_in(&self) -> Result<Identity, AuthError> {
        Ok(self.identity.clone())
    }

    async fn sign_out(&self) {}
}

/// Read-or-create the profile for a signed-in identity.
///
/// The member code is generated exactly once: if a profile already exists it
/// is returned as stored, even when the provider now reports a different
/// display name.
#[instrument(skip(profiles, rng), fields(uid = %identity.uid))]
pub async fn ensure_profile<R: Rng>(
    profiles: &CollectionClient<Profile>,
    identity: &Identity,
    rng: &mut R,
) -> Result<Profile, AuthError> {
    if let Some(existing) = profiles.get(identity.uid.clone()).await? {
        info!(member_code = %existing.member_code, "Existing profile");
        return Ok(existing);
    }

    let profile = Profile::for_identity(identity, rng);
    match profiles.put(profile.clone()).await {
        Ok(()) => {
            info!(member_code = %profile.member_code, "Profile created");
            Ok(profile)
        }
        Err(e) => {
            warn!(error = %e, "Profile creation failed");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::profile::ShortCode;
    use feed_store::CollectionActor;

    fn identity() -> Identity {
        Identity {
            uid: UserId::new("uid-1"),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn first_sign_in_creates_a_profile_with_a_member_code() {
        let (actor, profiles) = CollectionActor::<Profile>::new(8);
        tokio::spawn(actor.run());

        let profile = ensure_profile(&profiles, &identity(), &mut rand::thread_rng())
            .await
            .unwrap();
        assert_eq!(profile.uid, UserId::new("uid-1"));
        assert_eq!(profile.email, "alice@example.com");

        let stored = profiles.get(UserId::new("uid-1")).await.unwrap();
        assert_eq!(stored, Some(profile));
    }

    #[tokio::test]
    async fn later_sign_ins_never_regenerate_the_member_code() {
        let (actor, profiles) = CollectionActor::<Profile>::new(8);
        tokio::spawn(actor.run());

        let mut rng = rand::thread_rng();
        let first = ensure_profile(&profiles, &identity(), &mut rng).await.unwrap();
        let second = ensure_profile(&profiles, &identity(), &mut rng).await.unwrap();
        assert_eq!(first.member_code, second.member_code);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn existing_profile_wins_over_fresh_identity_fields() {
        let (actor, profiles) = CollectionActor::<Profile>::new(8);
        tokio::spawn(actor.run());

        let stored = Profile {
            uid: UserId::new("uid-1"),
            name: "Old Name".to_string(),
            email: "old@example.com".to_string(),
            member_code: ShortCode::generate(&mut rand::thread_rng()),
        };
        profiles.put(stored.clone()).await.unwrap();

        let resolved = ensure_profile(&profiles, &identity(), &mut rand::thread_rng())
            .await
            .unwrap();
        assert_eq!(resolved, stored);
    }
}
