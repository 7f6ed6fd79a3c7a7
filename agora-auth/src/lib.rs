// SPDX-License-Identifier: MIT OR Apache-2.0

//! Permission evaluation for the agora team-chat client.
//!
//! Actions in the realm are gated either by a group-valued setting (a
//! [`GroupSettingValue`](agora_groups::GroupSettingValue) naming who may
//! act) or by an ordinal role/tenure [`CommonPolicy`] code. This crate
//! holds the static configuration describing which groups each setting may
//! name, and the evaluator which answers, for a concrete acting user,
//! whether they are authorized.
//!
//! Every query is a pure read returning a definite boolean: "not
//! authorized" and "cannot determine" collapse into `false`, so degraded
//! client state can never grant access, only withhold it.

mod config;
mod permission;
mod policy;
mod state;

pub use config::{
    GroupPermissionSetting, SYSTEM_GROUPS, SettingType, SystemGroup,
    get_group_permission_setting_config, groups_for_setting, system_group_allowed_for_setting,
    system_group_option_name,
};
pub use permission::{
    can_add_members_to_group, can_join_group, can_leave_group, can_manage_group,
    groups_allowed_to_mention, guests_can_access_all_other_users, is_empty_group_setting,
    user_can_access_all_other_users, user_can_change_avatar, user_can_change_email,
    user_can_change_name, user_can_create_multiuse_invite, user_can_create_user_groups,
    user_can_create_web_public_channels, user_can_delete_any_message,
    user_can_delete_own_message, user_can_invite_users_by_email, user_can_manage_all_groups,
    user_has_group_permission,
};
pub use policy::{CommonPolicy, user_has_policy_permission};
pub use state::{CurrentUser, RealmSettings};
