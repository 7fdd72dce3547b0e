use chrono::Duration;
use tubely_api::auth::make_jwt;
use uuid::Uuid;

/// Secret the test config signs and validates tokens with.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

pub struct TestUser {
    pub user_id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

pub fn test_user() -> TestUser {
    let user_id = Uuid::new_v4();
    let token = make_jwt(user_id, TEST_JWT_SECRET, Duration::hours(1)).expect("Failed to sign token");
    TestUser { user_id, token }
}
