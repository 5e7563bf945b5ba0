//! Storage key constants.

/// Keys under which the session context is persisted
pub struct SessionKeys;

impl SessionKeys {
    /// Tenant identifier scoping every API call
    pub const TENANT_ID: &'static str = "tenant_id";

    /// Bearer access token
    pub const ACCESS_TOKEN: &'static str = "access_token";

    /// Refresh token (stored, not consumed by this core)
    pub const REFRESH_TOKEN: &'static str = "refresh_token";

    /// Display name of the signed-in user
    pub const USER_NAME: &'static str = "user_name";

    /// Role of the signed-in user
    pub const USER_ROLE: &'static str = "user_role";

    /// User identifier
    pub const USER_ID: &'static str = "user_id";

    /// User email
    pub const USER_EMAIL: &'static str = "user_email";

    /// Whether the user is a super admin ("true"/"false")
    pub const IS_SUPER_ADMIN: &'static str = "is_super_admin";

    /// Subscription status snapshot
    pub const SUBSCRIPTION_STATUS: &'static str = "subscription_status";

    /// Subscription period end (RFC 3339)
    pub const SUBSCRIPTION_CURRENT_PERIOD_END_AT: &'static str =
        "subscription_current_period_end_at";

    /// Days until subscription expiry, if the server computed one
    pub const SUBSCRIPTION_DAYS_TO_EXPIRY: &'static str = "subscription_days_to_expiry";

    /// Every key that makes up a session. All of these are cleared
    /// together on any termination path.
    pub const ALL: [&'static str; 11] = [
        Self::TENANT_ID,
        Self::ACCESS_TOKEN,
        Self::REFRESH_TOKEN,
        Self::USER_NAME,
        Self::USER_ROLE,
        Self::USER_ID,
        Self::USER_EMAIL,
        Self::IS_SUPER_ADMIN,
        Self::SUBSCRIPTION_STATUS,
        Self::SUBSCRIPTION_CURRENT_PERIOD_END_AT,
        Self::SUBSCRIPTION_DAYS_TO_EXPIRY,
    ];
}
