// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of all user groups known to the client.
//!
//! Groups are indexed by id and by case-folded name. Recursive queries
//! (transitive subgroup closure, transitive members, emptiness) walk the
//! subgroup graph with an explicit worklist: a pending queue plus a result
//! set which doubles as the visited set. Each id enters the result set at
//! most once, so the walk terminates in O(edges) even if a cycle slipped
//! into the data.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use thiserror::Error;
use tracing::error;

use crate::group::{Group, GroupId, GroupSettingValue, RawGroup, UserId};

#[derive(Debug, Error, PartialEq)]
pub enum GroupStoreError {
    /// An id which must exist is absent from the store. This means the
    /// client model has diverged from the server and is not recoverable by
    /// the caller.
    #[error("unknown group id: {0}")]
    UnknownGroup(GroupId),
}

/// Case-fold a group name for index lookups. Group names are unique under
/// case-insensitive comparison.
pub(crate) fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// All user groups of the realm, as known to this client.
///
/// Built from the startup snapshot and kept current by the mutation API in
/// [`crate::update`]. The id index is ordered so listings come out in
/// ascending id order without re-sorting.
#[derive(Clone, Debug, Default)]
pub struct GroupStore {
    pub(crate) by_id: BTreeMap<GroupId, Group>,
    pub(crate) by_name: HashMap<String, GroupId>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from the startup snapshot.
    pub fn initialize(snapshot: impl IntoIterator<Item = RawGroup>) -> Self {
        let mut store = Self::new();
        for raw in snapshot {
            store.add(raw);
        }
        store
    }

    /// Insert a group, replacing any prior entry with the same id.
    pub fn add(&mut self, raw: RawGroup) -> &Group {
        let group = Group::from(raw);

        // A replaced entry may have carried a different name; drop the old
        // name from the index so lookups cannot resolve through it.
        if let Some(prior) = self.by_id.get(&group.id) {
            self.by_name.remove(&fold_name(&prior.name));
        }

        let id = group.id;
        self.by_name.insert(fold_name(&group.name), id);
        self.by_id.insert(id, group);

        // Unwrap as the entry was just inserted.
        self.by_id.get(&id).unwrap()
    }

    /// Delete a group from both indexes. No-op if the id is unknown.
    pub fn remove(&mut self, group_id: GroupId) {
        if let Some(group) = self.by_id.remove(&group_id) {
            self.by_name.remove(&fold_name(&group.name));
        }
    }

    /// Look up a group which is expected to exist.
    pub fn get(&self, group_id: GroupId) -> Result<&Group, GroupStoreError> {
        self.by_id
            .get(&group_id)
            .ok_or(GroupStoreError::UnknownGroup(group_id))
    }

    /// Non-fatal variant of [`get`](Self::get).
    pub fn maybe_get(&self, group_id: GroupId) -> Option<&Group> {
        self.by_id.get(&group_id)
    }

    /// Case-insensitive lookup by name.
    pub fn get_by_name(&self, name: &str) -> Option<&Group> {
        self.by_name
            .get(&fold_name(name))
            .and_then(|id| self.by_id.get(id))
    }

    /// All non-system groups in ascending id order. Deactivated groups are
    /// omitted unless requested.
    pub fn custom_groups(&self, include_deactivated: bool) -> Vec<&Group> {
        self.by_id
            .values()
            .filter(|group| {
                !group.is_system_group && (include_deactivated || !group.deactivated)
            })
            .collect()
    }

    /// Every group including system groups, in ascending id order.
    pub fn all_groups(&self) -> Vec<&Group> {
        self.by_id.values().collect()
    }

    /// Ids of all groups reachable from `group` through subgroup edges.
    ///
    /// Returns `None` if the graph references an id missing from the
    /// store, which indicates corrupted data upstream; the caller decides
    /// the safe fallback.
    pub fn recursive_subgroup_ids(&self, group: &Group) -> Option<HashSet<GroupId>> {
        let mut result: HashSet<GroupId> = group.direct_subgroup_ids.iter().copied().collect();
        let mut pending: VecDeque<GroupId> = result.iter().copied().collect();

        while let Some(subgroup_id) = pending.pop_front() {
            let Some(subgroup) = self.by_id.get(&subgroup_id) else {
                error!(subgroup_id, "could not find subgroup");
                return None;
            };
            for &direct_id in &subgroup.direct_subgroup_ids {
                if result.insert(direct_id) {
                    pending.push_back(direct_id);
                }
            }
        }

        Some(result)
    }

    /// All users who are members of `group` directly or through any group
    /// in its recursive subgroup closure.
    ///
    /// Falls back to direct members only if the closure cannot be
    /// computed.
    pub fn recursive_members(&self, group: &Group) -> HashSet<UserId> {
        let mut members = group.members.clone();

        let Some(subgroup_ids) = self.recursive_subgroup_ids(group) else {
            return members;
        };

        for subgroup_id in subgroup_ids {
            // Unwrap as the closure only contains ids resolved above.
            let subgroup = self.by_id.get(&subgroup_id).unwrap();
            members.extend(subgroup.members.iter().copied());
        }
        members
    }

    /// True if `user_id` is a direct member of the group.
    pub fn is_direct_member(&self, user_id: UserId, group_id: GroupId) -> bool {
        let Some(group) = self.by_id.get(&group_id) else {
            error!(group_id, "could not find user group");
            return false;
        };
        group.members.contains(&user_id)
    }

    /// True if `user_id` is a member of the group: directly, or (unless
    /// `direct_only`) through the recursive subgroup closure.
    pub fn is_member(&self, user_id: UserId, group_id: GroupId, direct_only: bool) -> bool {
        let Some(group) = self.by_id.get(&group_id) else {
            error!(group_id, "could not find user group");
            return false;
        };

        if group.members.contains(&user_id) {
            return true;
        }
        if direct_only {
            return false;
        }

        let Some(subgroup_ids) = self.recursive_subgroup_ids(group) else {
            return false;
        };
        subgroup_ids
            .into_iter()
            .any(|subgroup_id| self.is_direct_member(user_id, subgroup_id))
    }

    /// True if the group and every group in its recursive subgroup closure
    /// have no direct members at all.
    pub fn is_empty_group(&self, group_id: GroupId) -> bool {
        let Some(group) = self.by_id.get(&group_id) else {
            error!(group_id, "could not find user group");
            return false;
        };
        if !group.members.is_empty() {
            return false;
        }

        // Walk the closure, stopping at the first non-empty group found.
        let mut visited: HashSet<GroupId> = group.direct_subgroup_ids.iter().copied().collect();
        let mut pending: VecDeque<GroupId> = visited.iter().copied().collect();

        while let Some(subgroup_id) = pending.pop_front() {
            let Some(subgroup) = self.by_id.get(&subgroup_id) else {
                error!(subgroup_id, "could not find subgroup");
                return false;
            };
            if !subgroup.members.is_empty() {
                return false;
            }
            for &direct_id in &subgroup.direct_subgroup_ids {
                if visited.insert(direct_id) {
                    pending.push_back(direct_id);
                }
            }
        }
        true
    }

    /// Decide whether `candidate` may become a direct subgroup of `target`.
    ///
    /// Rejects deactivated candidates, self-edges, edges that already
    /// exist, and edges that would close a cycle.
    pub fn can_be_subgroup(&self, candidate: &Group, target: &Group) -> bool {
        if candidate.deactivated {
            return false;
        }
        if candidate.id == target.id {
            return false;
        }
        if target.direct_subgroup_ids.contains(&candidate.id) {
            return false;
        }

        // The new edge would close a cycle if the target is already
        // reachable from the candidate.
        match self.recursive_subgroup_ids(candidate) {
            Some(closure) => !closure.contains(&target.id),
            None => false,
        }
    }

    /// Groups which could currently be added as subgroups of `target`.
    pub fn potential_subgroups(
        &self,
        target_id: GroupId,
    ) -> Result<Vec<&Group>, GroupStoreError> {
        let target = self.get(target_id)?;
        Ok(self
            .all_groups()
            .into_iter()
            .filter(|candidate| self.can_be_subgroup(candidate, target))
            .collect())
    }

    /// Active custom groups the user is a direct member of.
    pub fn groups_of_user(&self, user_id: UserId) -> Vec<&Group> {
        self.custom_groups(false)
            .into_iter()
            .filter(|group| group.members.contains(&user_id))
            .collect()
    }

    /// Resolve the direct subgroups of a group. Dangling edges are
    /// reported and skipped.
    pub fn direct_subgroups_of(&self, group: &Group) -> Vec<&Group> {
        let mut subgroups = Vec::new();
        for &subgroup_id in &group.direct_subgroup_ids {
            match self.by_id.get(&subgroup_id) {
                Some(subgroup) => subgroups.push(subgroup),
                None => error!(subgroup_id, "could not find subgroup"),
            }
        }
        subgroups
    }

    /// Membership test against a permission setting value.
    ///
    /// A group reference defers to [`is_member`](Self::is_member); an
    /// inline grant matches its explicit users and, recursively, the
    /// members of its explicit subgroups.
    pub fn is_user_in_setting_value(&self, value: &GroupSettingValue, user_id: UserId) -> bool {
        match value {
            GroupSettingValue::Group(group_id) => self.is_member(user_id, *group_id, false),
            GroupSettingValue::Anonymous(spec) => {
                spec.direct_members.contains(&user_id)
                    || spec
                        .direct_subgroups
                        .iter()
                        .any(|&subgroup_id| self.is_member(user_id, subgroup_id, false))
            }
        }
    }
}
