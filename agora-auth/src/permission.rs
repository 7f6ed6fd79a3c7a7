// SPDX-License-Identifier: MIT OR Apache-2.0

//! Group-valued permission checks for the acting user.
//!
//! Each check is a pure read against the group store and the realm
//! context, returning a definite boolean. Id-level desyncs (a group the
//! server referenced but never delivered) are reported through `tracing`
//! and conservatively deny.

use agora_groups::{Group, GroupId, GroupSettingValue, GroupStore};
use chrono::{DateTime, Utc};
use tracing::error;

use crate::config::{SettingType, SystemGroup, get_group_permission_setting_config};
use crate::policy::user_has_policy_permission;
use crate::state::{CurrentUser, RealmSettings};

/// Decide whether the acting user is covered by a group-valued setting.
///
/// Spectators are always denied. Guests are denied unless the setting's
/// config admits everyone. Otherwise the setting value's membership
/// decides.
pub fn user_has_group_permission(
    store: &GroupStore,
    value: &GroupSettingValue,
    setting_name: &str,
    setting_type: SettingType,
    user: &CurrentUser,
) -> bool {
    if user.is_spectator {
        return false;
    }

    // A missing config means the caller constructed a descriptor for a
    // setting that does not exist. That is a bug in the caller, never a
    // deniable request.
    let config = get_group_permission_setting_config(setting_name, setting_type)
        .unwrap_or_else(|| panic!("no config for {setting_type:?} setting {setting_name}"));

    if !config.allow_everyone_group && user.is_guest {
        return false;
    }

    store.is_user_in_setting_value(value, user.user_id)
}

/// True if the user may administer every group in the realm.
pub fn user_can_manage_all_groups(
    store: &GroupStore,
    realm: &RealmSettings,
    user: &CurrentUser,
) -> bool {
    user_has_group_permission(
        store,
        &realm.can_manage_all_groups,
        "can_manage_all_groups",
        SettingType::Realm,
        user,
    )
}

/// True if the user may administer the given group, through the realm-wide
/// manage-all grant or the group's own setting. The two grants are
/// independent; either suffices.
pub fn can_manage_group(
    store: &GroupStore,
    realm: &RealmSettings,
    user: &CurrentUser,
    group_id: GroupId,
) -> bool {
    if user.is_spectator {
        return false;
    }
    let Ok(group) = store.get(group_id) else {
        error!(group_id, "could not find user group");
        return false;
    };

    if user_can_manage_all_groups(store, realm, user) {
        return true;
    }

    user_has_group_permission(
        store,
        &group.can_manage_group,
        "can_manage_group",
        SettingType::Group,
        user,
    )
}

fn group_setting_or_manage(
    store: &GroupStore,
    realm: &RealmSettings,
    user: &CurrentUser,
    group_id: GroupId,
    setting_name: &str,
    value_of: impl Fn(&Group) -> &GroupSettingValue,
) -> bool {
    let Ok(group) = store.get(group_id) else {
        error!(group_id, "could not find user group");
        return false;
    };

    if user_has_group_permission(store, value_of(group), setting_name, SettingType::Group, user) {
        return true;
    }

    // Management rights imply all membership-mutation rights.
    can_manage_group(store, realm, user, group_id)
}

/// True if the user may join the group.
pub fn can_join_group(
    store: &GroupStore,
    realm: &RealmSettings,
    user: &CurrentUser,
    group_id: GroupId,
) -> bool {
    group_setting_or_manage(store, realm, user, group_id, "can_join_group", |group| {
        &group.can_join_group
    })
}

/// True if the user may leave the group.
pub fn can_leave_group(
    store: &GroupStore,
    realm: &RealmSettings,
    user: &CurrentUser,
    group_id: GroupId,
) -> bool {
    group_setting_or_manage(store, realm, user, group_id, "can_leave_group", |group| {
        &group.can_leave_group
    })
}

/// True if the user may add members to the group.
pub fn can_add_members_to_group(
    store: &GroupStore,
    realm: &RealmSettings,
    user: &CurrentUser,
    group_id: GroupId,
) -> bool {
    group_setting_or_manage(
        store,
        realm,
        user,
        group_id,
        "can_add_members_group",
        |group| &group.can_add_members_group,
    )
}

/// True when the setting, interpreted as a group, currently has no members
/// at all. Gates dependent UI controls.
pub fn is_empty_group_setting(store: &GroupStore, value: &GroupSettingValue) -> bool {
    match value {
        GroupSettingValue::Group(group_id) => store.is_empty_group(*group_id),
        GroupSettingValue::Anonymous(spec) => {
            spec.direct_members.is_empty()
                && spec
                    .direct_subgroups
                    .iter()
                    .all(|&subgroup_id| store.is_empty_group(subgroup_id))
        }
    }
}

/// Active custom groups whose mention setting covers the user.
pub fn groups_allowed_to_mention<'a>(store: &'a GroupStore, user: &CurrentUser) -> Vec<&'a Group> {
    store
        .custom_groups(false)
        .into_iter()
        .filter(|group| store.is_user_in_setting_value(&group.can_mention_group, user.user_id))
        .collect()
}

/// True if the user may create reusable invitation links.
pub fn user_can_create_multiuse_invite(
    store: &GroupStore,
    realm: &RealmSettings,
    user: &CurrentUser,
) -> bool {
    user_has_group_permission(
        store,
        &realm.create_multiuse_invite_group,
        "create_multiuse_invite_group",
        SettingType::Realm,
        user,
    )
}

/// True if the user may create new user groups.
pub fn user_can_create_user_groups(
    store: &GroupStore,
    realm: &RealmSettings,
    user: &CurrentUser,
) -> bool {
    user_has_group_permission(
        store,
        &realm.can_create_groups,
        "can_create_groups",
        SettingType::Realm,
        user,
    )
}

/// True if the user may create channels visible to logged-out visitors.
pub fn user_can_create_web_public_channels(
    store: &GroupStore,
    realm: &RealmSettings,
    user: &CurrentUser,
) -> bool {
    if !realm.enable_spectator_access {
        return false;
    }
    user_has_group_permission(
        store,
        &realm.can_create_web_public_channel_group,
        "can_create_web_public_channel_group",
        SettingType::Realm,
        user,
    )
}

/// True if the user may delete any message in the realm.
pub fn user_can_delete_any_message(
    store: &GroupStore,
    realm: &RealmSettings,
    user: &CurrentUser,
) -> bool {
    user_has_group_permission(
        store,
        &realm.can_delete_any_message_group,
        "can_delete_any_message_group",
        SettingType::Realm,
        user,
    )
}

/// True if the user may delete their own messages.
pub fn user_can_delete_own_message(
    store: &GroupStore,
    realm: &RealmSettings,
    user: &CurrentUser,
) -> bool {
    user_has_group_permission(
        store,
        &realm.can_delete_own_message_group,
        "can_delete_own_message_group",
        SettingType::Realm,
        user,
    )
}

/// True if the user may invite others by email, per the realm's
/// role/tenure policy.
pub fn user_can_invite_users_by_email(
    user: &CurrentUser,
    realm: &RealmSettings,
    now: DateTime<Utc>,
) -> bool {
    user_has_policy_permission(realm.invite_to_realm_policy, user, realm, now)
}

/// True if the user may see every other user in the realm.
///
/// Spectators do not go through the guest access-restriction machinery;
/// they see the web-public subset, which is effectively everyone.
pub fn user_can_access_all_other_users(
    store: &GroupStore,
    realm: &RealmSettings,
    user: &CurrentUser,
) -> bool {
    if user.is_spectator {
        return true;
    }
    user_has_group_permission(
        store,
        &realm.can_access_all_users_group,
        "can_access_all_users_group",
        SettingType::Realm,
        user,
    )
}

/// True if guests in this realm may see every other user: the access
/// setting resolves to the everyone system group.
pub fn guests_can_access_all_other_users(store: &GroupStore, realm: &RealmSettings) -> bool {
    let GroupSettingValue::Group(group_id) = realm.can_access_all_users_group else {
        return false;
    };
    let Ok(group) = store.get(group_id) else {
        error!(group_id, "could not find user group");
        return false;
    };
    group.name == SystemGroup::Everyone.name()
}

/// True if the user may change their own name.
pub fn user_can_change_name(realm: &RealmSettings, user: &CurrentUser) -> bool {
    user.is_admin || !realm.name_changes_disabled
}

/// True if the user may change their own avatar.
pub fn user_can_change_avatar(realm: &RealmSettings, user: &CurrentUser) -> bool {
    user.is_admin || !realm.avatar_changes_disabled
}

/// True if the user may change their own email address.
pub fn user_can_change_email(realm: &RealmSettings, user: &CurrentUser) -> bool {
    user.is_admin || !realm.email_changes_disabled
}
