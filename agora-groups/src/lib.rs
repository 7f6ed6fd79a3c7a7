// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory group membership model for the agora team-chat client.
//!
//! The server delivers a snapshot of every user group at startup and pushes
//! incremental update events for the rest of the session. [`GroupStore`]
//! holds that state, indexed by id and by case-folded name, and answers
//! membership queries over the nested subgroup graph: groups may contain
//! other groups, and a user counts as a member of a group if they are a
//! direct member of it or of any group in its recursive subgroup closure.
//!
//! Permission settings on groups (and on the realm) are group-valued: a
//! [`GroupSettingValue`] either references a named group or carries an
//! inline ("anonymous") list of users and subgroups. Membership tests
//! against either form go through
//! [`GroupStore::is_user_in_setting_value`].
//!
//! All state is plain single-threaded memory owned by the host event loop;
//! queries recompute closures fresh on every call, which is cheap at the
//! graph sizes a realm produces. A missing id encountered during a query
//! indicates the client model has diverged from the server; such cases are
//! reported through `tracing` and degrade to a conservative default rather
//! than unwinding into UI code.

mod group;
mod store;
mod update;

pub use group::{AnonymousSpec, Group, GroupId, GroupSettingValue, RawGroup, UserId};
pub use store::{GroupStore, GroupStoreError};
pub use update::{GroupUpdate, GroupUpdateEvent};
