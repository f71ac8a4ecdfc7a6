use std::fmt;

use models::user::UserStatus;
use rpc::contracts::user::{UserReply, UserState};

pub type User = models::user::Model;

/// Local create request. The password is plaintext until hashed.
#[derive(Clone)]
pub struct CreateUserInput {
    pub email: String,
    pub plaintext_password: String,
}

/// Email + plaintext pair for a credential lookup.
#[derive(Clone)]
pub struct CredentialLookup {
    pub email: String,
    pub plaintext_password: String,
}

impl fmt::Debug for CreateUserInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserInput")
            .field("email", &self.email)
            .field("plaintext_password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for CredentialLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialLookup")
            .field("email", &self.email)
            .field("plaintext_password", &"<redacted>")
            .finish()
    }
}

pub fn user_state(status: UserStatus) -> UserState {
    match status {
        UserStatus::Active => UserState::Active,
        UserStatus::Suspended => UserState::Suspended,
    }
}

/// Outbound view of a user; the credential hash stays behind.
pub fn user_reply(user: &User) -> UserReply {
    UserReply {
        id: user.id,
        email: user.email.clone(),
        status: user_state(user.status),
        created_at: user.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_the_password() {
        let input = CredentialLookup { email: "a@x.com".into(), plaintext_password: "hunter2".into() };
        let printed = format!("{input:?}");
        assert!(printed.contains("a@x.com"));
        assert!(!printed.contains("hunter2"));
    }
}
