use facegate_api::users::Role;

use crate::net::error::{Error, ApiErrorKind, AuthKind};

use super::authn::initiator::Initiator;

/// pure predicate over the already resolved user. no state is touched
pub fn require_role(initiator: &Initiator, role: Role) -> Result<(), Error> {
    if initiator.user.role != role {
        Err(Error::api(ApiErrorKind::Auth(AuthKind::PermissionDenied)))
    } else {
        Ok(())
    }
}

pub fn admin_only(initiator: &Initiator) -> Result<(), Error> {
    require_role(initiator, Role::Admin)
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::sec::authn::initiator::Mechanism;
    use crate::sec::authn::session::{Session, SESSION_TTL_DAYS};
    use crate::sec::authn::session::token::{SessionToken, SESSION_ID_BYTES};
    use crate::user::User;

    fn initiator_with_role(role: Role) -> Initiator {
        let now = chrono::Utc::now();

        Initiator {
            user: User {
                id: 1,
                name: String::from("tester"),
                email: Some(String::from("tester@example.com")),
                phone: None,
                picture: String::new(),
                role,
                deleted: false,
                created: now,
            },
            mechanism: Mechanism::Session(Session {
                token: SessionToken::from([0u8; SESSION_ID_BYTES]),
                user_id: 1,
                issued_on: now,
                expires: now + chrono::Duration::days(SESSION_TTL_DAYS),
            }),
        }
    }

    #[test]
    fn admin_check() {
        assert!(admin_only(&initiator_with_role(Role::Admin)).is_ok());
        assert!(admin_only(&initiator_with_role(Role::User)).is_err());
        assert!(admin_only(&initiator_with_role(Role::Manager)).is_err());
    }
}
