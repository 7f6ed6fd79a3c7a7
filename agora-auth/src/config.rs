// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static configuration of group-valued permission settings.
//!
//! Every group-valued setting has a config describing which groups may
//! hold it as a value: flags for the special system groups, an optional
//! explicit allow-list, and whether custom groups are permitted at all.
//! The tables mirror the server's settings model and are keyed by setting
//! name within three independent namespaces.

use agora_groups::{Group, GroupStore};
use tracing::error;

use crate::state::RealmSettings;

/// Namespace of a group-valued permission setting.
///
/// A setting name may exist in more than one namespace with a different
/// configuration.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SettingType {
    Realm,
    Stream,
    Group,
}

/// The predefined role groups provisioned for every realm.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SystemGroup {
    Owners,
    Administrators,
    Moderators,
    FullMembers,
    Members,
    Everyone,
    Internet,
    Nobody,
}

impl SystemGroup {
    /// The reserved group name, as stored in the group store.
    pub fn name(self) -> &'static str {
        match self {
            SystemGroup::Owners => "role:owners",
            SystemGroup::Administrators => "role:administrators",
            SystemGroup::Moderators => "role:moderators",
            SystemGroup::FullMembers => "role:fullmembers",
            SystemGroup::Members => "role:members",
            SystemGroup::Everyone => "role:everyone",
            SystemGroup::Internet => "role:internet",
            SystemGroup::Nobody => "role:nobody",
        }
    }

    /// Human-readable name shown in settings UIs.
    pub fn display_name(self) -> &'static str {
        match self {
            SystemGroup::Owners => "Owners",
            SystemGroup::Administrators => "Administrators",
            SystemGroup::Moderators => "Moderators",
            SystemGroup::FullMembers => "Full members",
            SystemGroup::Members => "Members",
            SystemGroup::Everyone => "Everyone",
            SystemGroup::Internet => "Everyone on the internet",
            SystemGroup::Nobody => "Nobody",
        }
    }
}

/// System groups in the order they are offered in settings UIs.
pub const SYSTEM_GROUPS: [SystemGroup; 8] = [
    SystemGroup::Owners,
    SystemGroup::Administrators,
    SystemGroup::Moderators,
    SystemGroup::FullMembers,
    SystemGroup::Members,
    SystemGroup::Everyone,
    SystemGroup::Internet,
    SystemGroup::Nobody,
];

/// Which values a group-valued permission setting may take.
#[derive(Clone, Debug)]
pub struct GroupPermissionSetting {
    /// Only system groups are permitted as the value.
    pub require_system_group: bool,
    pub allow_internet_group: bool,
    pub allow_owners_group: bool,
    pub allow_nobody_group: bool,
    /// The value may cover anyone, including guests.
    pub allow_everyone_group: bool,
    /// Value assigned when the realm is provisioned.
    pub default_group: SystemGroup,
    /// When non-empty, an explicit allow-list of system groups.
    pub allowed_system_groups: &'static [SystemGroup],
}

// Realm-level settings.

static CREATE_MULTIUSE_INVITE_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: true,
    allow_everyone_group: false,
    default_group: SystemGroup::Administrators,
    allowed_system_groups: &[],
};

static CAN_ACCESS_ALL_USERS_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: true,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: false,
    allow_everyone_group: true,
    default_group: SystemGroup::Everyone,
    allowed_system_groups: &[SystemGroup::Everyone, SystemGroup::Members],
};

static CAN_ADD_CUSTOM_EMOJI_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: false,
    allow_everyone_group: false,
    default_group: SystemGroup::Members,
    allowed_system_groups: &[],
};

static CAN_CREATE_GROUPS: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: true,
    allow_nobody_group: false,
    allow_everyone_group: false,
    default_group: SystemGroup::Members,
    allowed_system_groups: &[],
};

static CAN_CREATE_PUBLIC_CHANNEL_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: false,
    allow_everyone_group: false,
    default_group: SystemGroup::Members,
    allowed_system_groups: &[],
};

static CAN_CREATE_PRIVATE_CHANNEL_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: false,
    allow_everyone_group: false,
    default_group: SystemGroup::Members,
    allowed_system_groups: &[],
};

static CAN_CREATE_WEB_PUBLIC_CHANNEL_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: true,
    allow_internet_group: false,
    allow_owners_group: true,
    allow_nobody_group: true,
    allow_everyone_group: false,
    default_group: SystemGroup::Owners,
    allowed_system_groups: &[
        SystemGroup::Moderators,
        SystemGroup::Administrators,
        SystemGroup::Owners,
        SystemGroup::Nobody,
    ],
};

static CAN_DELETE_ANY_MESSAGE_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: false,
    allow_everyone_group: false,
    default_group: SystemGroup::Administrators,
    allowed_system_groups: &[],
};

static CAN_DELETE_OWN_MESSAGE_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: false,
    allow_everyone_group: true,
    default_group: SystemGroup::Everyone,
    allowed_system_groups: &[],
};

static CAN_MANAGE_ALL_GROUPS: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: true,
    allow_nobody_group: false,
    allow_everyone_group: false,
    default_group: SystemGroup::Owners,
    allowed_system_groups: &[],
};

static CAN_MOVE_MESSAGES_BETWEEN_CHANNELS_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: true,
    allow_everyone_group: false,
    default_group: SystemGroup::Members,
    allowed_system_groups: &[],
};

static CAN_MOVE_MESSAGES_BETWEEN_TOPICS_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: true,
    allow_everyone_group: true,
    default_group: SystemGroup::Everyone,
    allowed_system_groups: &[],
};

static DIRECT_MESSAGE_INITIATOR_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: true,
    allow_nobody_group: true,
    allow_everyone_group: true,
    default_group: SystemGroup::Everyone,
    allowed_system_groups: &[],
};

static DIRECT_MESSAGE_PERMISSION_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: true,
    allow_nobody_group: true,
    allow_everyone_group: true,
    default_group: SystemGroup::Everyone,
    allowed_system_groups: &[],
};

// Stream-level settings.

static CAN_REMOVE_SUBSCRIBERS_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: false,
    allow_everyone_group: true,
    default_group: SystemGroup::Administrators,
    allowed_system_groups: &[],
};

static CAN_ADMINISTER_CHANNEL_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: true,
    allow_everyone_group: false,
    default_group: SystemGroup::Administrators,
    allowed_system_groups: &[],
};

// Group-level settings, carried by every group.

static CAN_ADD_MEMBERS_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: true,
    allow_everyone_group: false,
    default_group: SystemGroup::Nobody,
    allowed_system_groups: &[],
};

static CAN_JOIN_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: true,
    allow_everyone_group: false,
    default_group: SystemGroup::Nobody,
    allowed_system_groups: &[],
};

static CAN_LEAVE_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: true,
    allow_everyone_group: true,
    default_group: SystemGroup::Everyone,
    allowed_system_groups: &[],
};

static CAN_MANAGE_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: true,
    allow_everyone_group: false,
    default_group: SystemGroup::Nobody,
    allowed_system_groups: &[],
};

static CAN_MENTION_GROUP: GroupPermissionSetting = GroupPermissionSetting {
    require_system_group: false,
    allow_internet_group: false,
    allow_owners_group: false,
    allow_nobody_group: true,
    allow_everyone_group: true,
    default_group: SystemGroup::Everyone,
    allowed_system_groups: &[],
};

/// Look up the config for a setting name within a namespace.
///
/// Returns `None` for unknown combinations; callers treat that as a bug
/// in the caller, not as a denial.
pub fn get_group_permission_setting_config(
    setting_name: &str,
    setting_type: SettingType,
) -> Option<&'static GroupPermissionSetting> {
    let config = match (setting_type, setting_name) {
        (SettingType::Realm, "create_multiuse_invite_group") => &CREATE_MULTIUSE_INVITE_GROUP,
        (SettingType::Realm, "can_access_all_users_group") => &CAN_ACCESS_ALL_USERS_GROUP,
        (SettingType::Realm, "can_add_custom_emoji_group") => &CAN_ADD_CUSTOM_EMOJI_GROUP,
        (SettingType::Realm, "can_create_groups") => &CAN_CREATE_GROUPS,
        (SettingType::Realm, "can_create_public_channel_group") => {
            &CAN_CREATE_PUBLIC_CHANNEL_GROUP
        }
        (SettingType::Realm, "can_create_private_channel_group") => {
            &CAN_CREATE_PRIVATE_CHANNEL_GROUP
        }
        (SettingType::Realm, "can_create_web_public_channel_group") => {
            &CAN_CREATE_WEB_PUBLIC_CHANNEL_GROUP
        }
        (SettingType::Realm, "can_delete_any_message_group") => &CAN_DELETE_ANY_MESSAGE_GROUP,
        (SettingType::Realm, "can_delete_own_message_group") => &CAN_DELETE_OWN_MESSAGE_GROUP,
        (SettingType::Realm, "can_manage_all_groups") => &CAN_MANAGE_ALL_GROUPS,
        (SettingType::Realm, "can_move_messages_between_channels_group") => {
            &CAN_MOVE_MESSAGES_BETWEEN_CHANNELS_GROUP
        }
        (SettingType::Realm, "can_move_messages_between_topics_group") => {
            &CAN_MOVE_MESSAGES_BETWEEN_TOPICS_GROUP
        }
        (SettingType::Realm, "direct_message_initiator_group") => &DIRECT_MESSAGE_INITIATOR_GROUP,
        (SettingType::Realm, "direct_message_permission_group") => {
            &DIRECT_MESSAGE_PERMISSION_GROUP
        }
        (SettingType::Stream, "can_remove_subscribers_group") => &CAN_REMOVE_SUBSCRIBERS_GROUP,
        (SettingType::Stream, "can_administer_channel_group") => &CAN_ADMINISTER_CHANNEL_GROUP,
        (SettingType::Group, "can_add_members_group") => &CAN_ADD_MEMBERS_GROUP,
        (SettingType::Group, "can_join_group") => &CAN_JOIN_GROUP,
        (SettingType::Group, "can_leave_group") => &CAN_LEAVE_GROUP,
        (SettingType::Group, "can_manage_group") => &CAN_MANAGE_GROUP,
        (SettingType::Group, "can_mention_group") => &CAN_MENTION_GROUP,
        _ => return None,
    };
    Some(config)
}

/// Decide whether a system group may be offered as the value of a setting.
///
/// `for_ui` applies the stricter rules for user-facing choices: the
/// nobody group is only ever programmatically meaningful, and the full
/// members group is hidden when the realm has no waiting period (the
/// member / full-member distinction is meaningless then).
pub fn system_group_allowed_for_setting(
    system_group: SystemGroup,
    config: &GroupPermissionSetting,
    for_ui: bool,
    waiting_period_threshold: i64,
) -> bool {
    if !config.allow_internet_group && system_group == SystemGroup::Internet {
        return false;
    }
    if !config.allow_owners_group && system_group == SystemGroup::Owners {
        return false;
    }
    if (!config.allow_nobody_group || for_ui) && system_group == SystemGroup::Nobody {
        return false;
    }
    if !config.allow_everyone_group && system_group == SystemGroup::Everyone {
        return false;
    }
    if !config.allowed_system_groups.is_empty()
        && !config.allowed_system_groups.contains(&system_group)
    {
        return false;
    }
    if system_group == SystemGroup::FullMembers && for_ui && waiting_period_threshold == 0 {
        return false;
    }
    true
}

/// Groups which may be offered as the value of a setting: the allowed
/// system groups, followed by the realm's active custom groups unless the
/// config admits system groups only.
///
/// An unknown setting yields an empty list; a system group missing from
/// the store is a provisioning failure and is reported and skipped.
pub fn groups_for_setting<'a>(
    store: &'a GroupStore,
    realm: &RealmSettings,
    setting_name: &str,
    setting_type: SettingType,
    for_ui: bool,
) -> Vec<&'a Group> {
    let Some(config) = get_group_permission_setting_config(setting_name, setting_type) else {
        error!(setting_name, ?setting_type, "no permission setting config");
        return Vec::new();
    };

    let mut groups = Vec::new();
    for system_group in SYSTEM_GROUPS {
        if !system_group_allowed_for_setting(
            system_group,
            config,
            for_ui,
            realm.waiting_period_threshold,
        ) {
            continue;
        }
        match store.get_by_name(system_group.name()) {
            Some(group) => groups.push(group),
            None => error!(name = system_group.name(), "unknown system group"),
        }
    }

    if config.require_system_group {
        return groups;
    }

    groups.extend(store.custom_groups(false));
    groups
}

/// Display name for a system group offered as the value of `setting_name`.
pub fn system_group_option_name(system_group: SystemGroup, setting_name: &str) -> &'static str {
    // The nobody group gets a clearer label when choosing it disables
    // direct messages entirely.
    if setting_name == "direct_message_permission_group" && system_group == SystemGroup::Nobody {
        return "Direct messages disabled";
    }
    system_group.display_name()
}
