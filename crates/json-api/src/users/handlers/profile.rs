//! Profile Handler

use std::sync::Arc;

use kaiten_app::domain::users::models::User;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, state::State, users::errors::into_status_error};

/// A user account as the API presents it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    /// The account's unique identifier
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// Contact email
    pub email: String,

    /// Contact phone number
    pub phone: String,

    /// Current bonus-point balance
    pub bonus_points: i64,

    /// The account's own referral code, shareable with friends
    pub referral_code: String,

    /// When the account was created
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            uuid: user.uuid.into_uuid(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            bonus_points: user.bonus_points,
            referral_code: user.referral_code,
            created_at: user.created_at.to_string(),
        }
    }
}

/// Profile Handler
///
/// Returns the authenticated user's account.
#[endpoint(tags("users"), summary = "Get Profile", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let profile = state
        .users
        .profile(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(profile.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use kaiten_app::domain::users::{MockUsersService, UsersServiceError};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER_UUID, authed_service, state_with_users};

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        authed_service(
            state_with_users(users),
            Router::with_path("profile").get(handler),
        )
    }

    fn make_user() -> User {
        User {
            uuid: TEST_USER_UUID,
            name: "Aki".to_string(),
            email: "aki@example.com".to_string(),
            phone: "+4479460001".to_string(),
            bonus_points: 150,
            referral_code: "AB12CD34".to_string(),
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn test_profile_returns_account() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_profile()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| Ok(make_user()));

        let response: UserResponse = TestClient::get("http://example.com/profile")
            .send(&make_service(users))
            .await
            .take_json()
            .await?;

        assert_eq!(response.uuid, TEST_USER_UUID.into_uuid());
        assert_eq!(response.bonus_points, 150);
        assert_eq!(response.referral_code, "AB12CD34");

        Ok(())
    }

    #[tokio::test]
    async fn test_profile_unknown_user_returns_404() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_profile()
            .once()
            .return_once(|_| Err(UsersServiceError::NotFound));

        let res = TestClient::get("http://example.com/profile")
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
