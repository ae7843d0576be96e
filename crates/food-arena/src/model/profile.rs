//! User profile document, created once at first sign-in.

use feed_store::{Document, DocumentFilter};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Opaque identity-provider id of a user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the identity provider hands us after a successful sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub uid: UserId,
    pub name: String,
    pub email: String,
}

const SHORT_CODE_LEN: usize = 6;
const SHORT_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Human-readable member code shown to canteen staff.
///
/// Six uppercase alphanumeric characters, generated once when the profile is
/// first created and never regenerated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let code = (0..SHORT_CODE_LEN)
            .map(|_| SHORT_CODE_CHARSET[rng.gen_range(0..SHORT_CODE_CHARSET.len())] as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_well_formed(&self) -> bool {
        self.0.len() == SHORT_CODE_LEN
            && self.0.bytes().all(|b| SHORT_CODE_CHARSET.contains(&b))
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user, keyed by the identity provider's uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub uid: UserId,
    pub name: String,
    pub email: String,
    pub member_code: ShortCode,
}

impl Profile {
    /// Builds the profile for a first-time sign-in.
    pub fn for_identity<R: Rng>(identity: &Identity, rng: &mut R) -> Self {
        Self {
            uid: identity.uid.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            member_code: ShortCode::generate(rng),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile uid must not be empty")]
    EmptyUid,
    #[error("malformed member code: {0}")]
    BadMemberCode(String),
}

/// Profiles are immutable once created; only out-of-band administrative
/// action could change one, and that path does not exist here.
#[derive(Debug, Clone)]
pub enum ProfilePatch {}

/// Subscription filter for the profile collection (unused live, present for
/// the store contract).
#[derive(Debug, Clone, Copy, Default)]
pub struct AllProfiles;

impl DocumentFilter<Profile> for AllProfiles {
    fn matches(&self, _doc: &Profile) -> bool {
        true
    }
}

impl Document for Profile {
    type Id = UserId;
    type Patch = ProfilePatch;
    type Filter = AllProfiles;
    type Error = ProfileError;

    fn id(&self) -> UserId {
        self.uid.clone()
    }

    fn validate(&self) -> Result<(), ProfileError> {
        if self.uid.0.is_empty() {
            return Err(ProfileError::EmptyUid);
        }
        if !self.member_code.is_well_formed() {
            return Err(ProfileError::BadMemberCode(self.member_code.0.clone()));
        }
        Ok(())
    }

    fn apply(&mut self, patch: ProfilePatch) -> Result<(), ProfileError> {
        match patch {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_codes_are_six_uppercase_alphanumerics() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let code = ShortCode::generate(&mut rng);
            assert!(code.is_well_formed(), "bad code: {code}");
        }
    }

    #[test]
    fn profile_rejects_tampered_member_code() {
        let mut profile = Profile {
            uid: UserId::new("uid-1"),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            member_code: ShortCode("AB12CD".to_string()),
        };
        assert!(profile.validate().is_ok());

        profile.member_code = ShortCode("ab12cd".to_string());
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::BadMemberCode(_))
        ));

        profile.member_code = ShortCode("AB12".to_string());
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::BadMemberCode(_))
        ));
    }
}
