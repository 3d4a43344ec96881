use crate::api::{LogbookApi, Result, UserRecord};

/// Who the client is acting as, loaded once at startup and immutable for the
/// rest of the run
#[derive(Debug, Clone)]
pub struct Session {
    user: UserRecord,
    roster: Vec<String>,
}

impl Session {
    pub fn new(user: UserRecord, roster: Vec<String>) -> Self {
        Self { user, roster }
    }

    /// Fetches the current user, and for admins the usernames they may log
    /// flights for. The roster leaves the current user out, since they are
    /// always part of the selection anyway.
    pub async fn load(api: &dyn LogbookApi) -> Result<Self> {
        let user = api.me().await?;

        let roster = if user.is_admin {
            let mut usernames = api.usernames().await?;
            usernames.retain(|username| username != &user.username);
            usernames
        } else {
            Vec::new()
        };

        Ok(Self { user, roster })
    }

    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    /// Usernames selectable besides the current user. Empty for non-admins.
    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    /// Whether the username is known and may be selected alongside the
    /// current user
    pub fn in_roster(&self, username: &str) -> bool {
        self.roster.iter().any(|u| u == username)
    }
}

#[cfg(test)]
mod test {
    use async_trait::async_trait;

    use super::*;
    use crate::api::{Airline, Airport, ApiError, FlightIds, Result as ApiResult};
    use crate::form::FlightPayload;

    struct UsersApi {
        user: UserRecord,
        usernames: Vec<String>,
    }

    #[async_trait]
    impl LogbookApi for UsersApi {
        async fn me(&self) -> ApiResult<UserRecord> {
            Ok(self.user.clone())
        }

        async fn usernames(&self) -> ApiResult<Vec<String>> {
            if !self.user.is_admin {
                return Err(ApiError::Unauthorized);
            }

            Ok(self.usernames.clone())
        }

        async fn airport(&self, _icao: &str) -> ApiResult<Airport> {
            unreachable!("not used by session tests")
        }

        async fn airline(&self, _icao: &str) -> ApiResult<Airline> {
            unreachable!("not used by session tests")
        }

        async fn create_flights(
            &self,
            _payload: &FlightPayload,
            _local_airport_time: bool,
        ) -> ApiResult<FlightIds> {
            unreachable!("not used by session tests")
        }
    }

    #[tokio::test]
    async fn test_admin_roster_excludes_self() {
        let api = UsersApi {
            user: UserRecord {
                username: "bob".to_string(),
                is_admin: true,
            },
            usernames: vec!["alice".to_string(), "bob".to_string(), "carol".to_string()],
        };

        let session = Session::load(&api).await.unwrap();
        assert_eq!(session.roster(), ["alice", "carol"]);
        assert!(session.in_roster("carol"));
        assert!(!session.in_roster("bob"));
    }

    #[tokio::test]
    async fn test_plain_user_has_no_roster() {
        let api = UsersApi {
            user: UserRecord {
                username: "alice".to_string(),
                is_admin: false,
            },
            usernames: Vec::new(),
        };

        let session = Session::load(&api).await.unwrap();
        assert!(session.roster().is_empty());
        assert_eq!(session.user().username, "alice");
    }
}
