// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a user account within the realm.
pub type UserId = u64;

/// Identifier of a user group within the realm.
pub type GroupId = u64;

/// The value of a group-valued permission setting.
///
/// Either a reference to a named group, meaning "members of that group,
/// including members of its transitive subgroups", or an inline grant not
/// backed by any named group.
///
/// On the wire the server sends a bare integer for the first form and an
/// object for the second, hence the untagged representation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupSettingValue {
    Group(GroupId),
    Anonymous(AnonymousSpec),
}

impl GroupSettingValue {
    /// Return true if this value is an inline grant rather than a group
    /// reference.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, GroupSettingValue::Anonymous(_))
    }
}

/// An inline permission grant: these explicit users, plus members
/// (recursively) of these explicit subgroups.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AnonymousSpec {
    pub direct_members: Vec<UserId>,
    pub direct_subgroups: Vec<GroupId>,
}

/// A user group as delivered in the startup snapshot.
///
/// Member and subgroup lists arrive as arrays; they are converted to sets
/// when the group is added to the store.
#[derive(Clone, Debug, Deserialize)]
pub struct RawGroup {
    pub id: GroupId,
    pub name: String,
    pub description: String,
    pub creator_id: Option<UserId>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub date_created: Option<DateTime<Utc>>,
    pub is_system_group: bool,
    #[serde(default)]
    pub deactivated: bool,
    pub members: Vec<UserId>,
    pub direct_subgroup_ids: Vec<GroupId>,
    pub can_add_members_group: GroupSettingValue,
    pub can_join_group: GroupSettingValue,
    pub can_leave_group: GroupSettingValue,
    pub can_manage_group: GroupSettingValue,
    pub can_mention_group: GroupSettingValue,
}

/// A user group held by the [`GroupStore`](crate::GroupStore).
#[derive(Clone, Debug)]
pub struct Group {
    pub id: GroupId,
    /// Unique under case-insensitive comparison.
    pub name: String,
    pub description: String,
    pub creator_id: Option<UserId>,
    pub date_created: Option<DateTime<Utc>>,
    /// Provisioned with the realm and never deleted.
    pub is_system_group: bool,
    pub deactivated: bool,
    /// Direct members only; transitive membership is resolved by the store.
    pub members: HashSet<UserId>,
    /// Direct subgroup edges only.
    pub direct_subgroup_ids: HashSet<GroupId>,
    pub can_add_members_group: GroupSettingValue,
    pub can_join_group: GroupSettingValue,
    pub can_leave_group: GroupSettingValue,
    pub can_manage_group: GroupSettingValue,
    pub can_mention_group: GroupSettingValue,
}

impl From<RawGroup> for Group {
    fn from(raw: RawGroup) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            creator_id: raw.creator_id,
            date_created: raw.date_created,
            is_system_group: raw.is_system_group,
            deactivated: raw.deactivated,
            members: raw.members.into_iter().collect(),
            direct_subgroup_ids: raw.direct_subgroup_ids.into_iter().collect(),
            can_add_members_group: raw.can_add_members_group,
            can_join_group: raw.can_join_group,
            can_leave_group: raw.can_leave_group,
            can_manage_group: raw.can_manage_group,
            can_mention_group: raw.can_mention_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_value_wire_forms() {
        // A bare integer is a reference to a named group.
        let value: GroupSettingValue = serde_json::from_str("6").unwrap();
        assert_eq!(value, GroupSettingValue::Group(6));

        // An object is an inline grant.
        let value: GroupSettingValue =
            serde_json::from_str(r#"{"direct_members": [7], "direct_subgroups": [3, 4]}"#).unwrap();
        assert_eq!(
            value,
            GroupSettingValue::Anonymous(AnonymousSpec {
                direct_members: vec![7],
                direct_subgroups: vec![3, 4],
            })
        );
    }

    #[test]
    fn snapshot_record() {
        let raw: RawGroup = serde_json::from_str(
            r#"{
                "id": 2,
                "name": "backend",
                "description": "Backend team",
                "creator_id": null,
                "date_created": 1700000000,
                "is_system_group": false,
                "deactivated": false,
                "members": [10, 20, 10],
                "direct_subgroup_ids": [1],
                "can_add_members_group": 4,
                "can_join_group": 4,
                "can_leave_group": 4,
                "can_manage_group": {"direct_members": [10], "direct_subgroups": []},
                "can_mention_group": 4
            }"#,
        )
        .unwrap();

        let group = Group::from(raw);

        // Duplicate wire entries collapse into the set.
        assert_eq!(group.members.len(), 2);
        assert!(group.members.contains(&10));
        assert!(group.direct_subgroup_ids.contains(&1));
        assert!(group.can_manage_group.is_anonymous());
        assert_eq!(group.date_created.unwrap().timestamp(), 1_700_000_000);
    }
}
