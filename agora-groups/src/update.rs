// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-pushed incremental updates to the group store.
//!
//! Events carry a partial field diff; absent fields are untouched. The
//! server is authoritative, so updates apply last-write-wins with no
//! client-side conflict handling.

use serde::Deserialize;
use tracing::error;

use crate::group::{GroupId, GroupSettingValue, UserId};
use crate::store::{GroupStore, GroupStoreError, fold_name};

/// Partial field diff carried by a group update event.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub deactivated: Option<bool>,
    pub can_add_members_group: Option<GroupSettingValue>,
    pub can_join_group: Option<GroupSettingValue>,
    pub can_leave_group: Option<GroupSettingValue>,
    pub can_manage_group: Option<GroupSettingValue>,
    pub can_mention_group: Option<GroupSettingValue>,
}

/// A server event updating one group's fields.
#[derive(Clone, Debug, Deserialize)]
pub struct GroupUpdateEvent {
    pub group_id: GroupId,
    pub data: GroupUpdate,
}

impl GroupStore {
    /// Apply a group update event in place.
    ///
    /// The group must already exist; an unknown id means the event stream
    /// has diverged from the snapshot.
    pub fn apply_update_event(&mut self, event: &GroupUpdateEvent) -> Result<(), GroupStoreError> {
        let group = self
            .by_id
            .get_mut(&event.group_id)
            .ok_or(GroupStoreError::UnknownGroup(event.group_id))?;
        let data = &event.data;

        if let Some(name) = &data.name {
            // Re-key the name index under the new name. The id index needs
            // no change.
            self.by_name.remove(&fold_name(&group.name));
            group.name = name.clone();
            self.by_name.insert(fold_name(&group.name), group.id);
        }
        if let Some(description) = &data.description {
            group.description = description.clone();
        }
        if let Some(deactivated) = data.deactivated {
            group.deactivated = deactivated;
        }
        if let Some(value) = &data.can_add_members_group {
            group.can_add_members_group = value.clone();
        }
        if let Some(value) = &data.can_join_group {
            group.can_join_group = value.clone();
        }
        if let Some(value) = &data.can_leave_group {
            group.can_leave_group = value.clone();
        }
        if let Some(value) = &data.can_manage_group {
            group.can_manage_group = value.clone();
        }
        if let Some(value) = &data.can_mention_group {
            group.can_mention_group = value.clone();
        }

        Ok(())
    }

    /// Add users to a group's direct member set.
    pub fn add_members(&mut self, group_id: GroupId, user_ids: &[UserId]) {
        let Some(group) = self.by_id.get_mut(&group_id) else {
            error!(group_id, "could not find user group");
            return;
        };
        group.members.extend(user_ids.iter().copied());
    }

    /// Remove users from a group's direct member set.
    pub fn remove_members(&mut self, group_id: GroupId, user_ids: &[UserId]) {
        let Some(group) = self.by_id.get_mut(&group_id) else {
            error!(group_id, "could not find user group");
            return;
        };
        for user_id in user_ids {
            group.members.remove(user_id);
        }
    }

    /// Add direct subgroup edges to a group.
    pub fn add_subgroups(&mut self, group_id: GroupId, subgroup_ids: &[GroupId]) {
        let Some(group) = self.by_id.get_mut(&group_id) else {
            error!(group_id, "could not find user group");
            return;
        };
        group.direct_subgroup_ids.extend(subgroup_ids.iter().copied());
    }

    /// Remove direct subgroup edges from a group.
    pub fn remove_subgroups(&mut self, group_id: GroupId, subgroup_ids: &[GroupId]) {
        let Some(group) = self.by_id.get_mut(&group_id) else {
            error!(group_id, "could not find user group");
            return;
        };
        for subgroup_id in subgroup_ids {
            group.direct_subgroup_ids.remove(subgroup_id);
        }
    }
}
