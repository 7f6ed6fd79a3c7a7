//! Context the evaluator reads: who is acting, and the realm's ambient
//! settings.

use agora_groups::{GroupSettingValue, UserId};
use chrono::{DateTime, Utc};

use crate::policy::CommonPolicy;

/// Role flags describing the acting user.
///
/// Snapshotted from the server at login; the evaluator never mutates it.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub is_admin: bool,
    pub is_owner: bool,
    pub is_moderator: bool,
    pub is_guest: bool,
    /// Logged-out visitor browsing publicly accessible content.
    pub is_spectator: bool,
    /// Join date of the account. Spectators carry the present date so
    /// tenure checks never pass for them by accident.
    pub date_joined: DateTime<Utc>,
}

/// Realm-wide settings the evaluator consults.
#[derive(Clone, Debug)]
pub struct RealmSettings {
    /// Days a member waits before counting as a full member. Zero means
    /// the member / full-member distinction does not exist in this realm.
    pub waiting_period_threshold: i64,

    /// Who may administer every group in the realm.
    pub can_manage_all_groups: GroupSettingValue,
    pub create_multiuse_invite_group: GroupSettingValue,
    pub can_create_groups: GroupSettingValue,
    pub can_create_web_public_channel_group: GroupSettingValue,
    pub can_access_all_users_group: GroupSettingValue,
    pub can_delete_any_message_group: GroupSettingValue,
    pub can_delete_own_message_group: GroupSettingValue,

    pub invite_to_realm_policy: CommonPolicy,

    pub name_changes_disabled: bool,
    pub avatar_changes_disabled: bool,
    pub email_changes_disabled: bool,
    pub enable_spectator_access: bool,
}
