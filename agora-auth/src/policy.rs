// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordinal realm-wide policies gating actions by role or tenure, distinct
//! from group-valued settings.

use chrono::{DateTime, Utc};

use crate::state::{CurrentUser, RealmSettings};

/// Policy codes shared with the server settings table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommonPolicy {
    Members = 1,
    AdminsOnly = 2,
    FullMembers = 3,
    ModeratorsOnly = 4,
    /// Sentinel denying the action for everyone.
    Nobody = 6,
}

impl CommonPolicy {
    /// Decode a wire policy code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(CommonPolicy::Members),
            2 => Some(CommonPolicy::AdminsOnly),
            3 => Some(CommonPolicy::FullMembers),
            4 => Some(CommonPolicy::ModeratorsOnly),
            6 => Some(CommonPolicy::Nobody),
            _ => None,
        }
    }
}

/// Evaluate a role/tenure policy for the acting user.
///
/// The precedence is fixed: the nobody sentinel denies everyone, admins
/// always pass, spectators and guests always fail; then the moderator,
/// member and full-member thresholds apply in order. `now` is injected so
/// tenure checks are reproducible in tests.
pub fn user_has_policy_permission(
    policy: CommonPolicy,
    user: &CurrentUser,
    realm: &RealmSettings,
    now: DateTime<Utc>,
) -> bool {
    if policy == CommonPolicy::Nobody {
        return false;
    }
    if user.is_admin {
        return true;
    }
    if user.is_spectator || user.is_guest {
        return false;
    }
    if policy == CommonPolicy::AdminsOnly {
        return false;
    }
    if user.is_moderator {
        return true;
    }
    if policy == CommonPolicy::ModeratorsOnly {
        return false;
    }
    if policy == CommonPolicy::Members {
        return true;
    }

    // Only the full-member tenure threshold remains.
    let days_since_join = (now - user.date_joined).num_days();
    days_since_join >= realm.waiting_period_threshold
}

#[cfg(test)]
mod tests {
    use agora_groups::{AnonymousSpec, GroupSettingValue};
    use chrono::{Duration, TimeZone};

    use super::*;

    fn no_one() -> GroupSettingValue {
        GroupSettingValue::Anonymous(AnonymousSpec::default())
    }

    fn realm(waiting_period_threshold: i64) -> RealmSettings {
        RealmSettings {
            waiting_period_threshold,
            can_manage_all_groups: no_one(),
            create_multiuse_invite_group: no_one(),
            can_create_groups: no_one(),
            can_create_web_public_channel_group: no_one(),
            can_access_all_users_group: no_one(),
            can_delete_any_message_group: no_one(),
            can_delete_own_message_group: no_one(),
            invite_to_realm_policy: CommonPolicy::Members,
            name_changes_disabled: false,
            avatar_changes_disabled: false,
            email_changes_disabled: false,
            enable_spectator_access: true,
        }
    }

    fn member(joined: DateTime<Utc>) -> CurrentUser {
        CurrentUser {
            user_id: 10,
            is_admin: false,
            is_owner: false,
            is_moderator: false,
            is_guest: false,
            is_spectator: false,
            date_joined: joined,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    const ALL_POLICIES: [CommonPolicy; 5] = [
        CommonPolicy::Members,
        CommonPolicy::AdminsOnly,
        CommonPolicy::FullMembers,
        CommonPolicy::ModeratorsOnly,
        CommonPolicy::Nobody,
    ];

    #[test]
    fn wire_codes() {
        for policy in ALL_POLICIES {
            assert_eq!(CommonPolicy::from_code(policy as i64), Some(policy));
        }
        assert_eq!(CommonPolicy::from_code(0), None);
        assert_eq!(CommonPolicy::from_code(5), None);
    }

    #[test]
    fn admins_pass_everything_but_nobody() {
        let realm = realm(10);
        let admin = CurrentUser {
            is_admin: true,
            ..member(now())
        };

        for policy in ALL_POLICIES {
            let expected = policy != CommonPolicy::Nobody;
            assert_eq!(
                user_has_policy_permission(policy, &admin, &realm, now()),
                expected,
                "policy {policy:?}"
            );
        }
    }

    #[test]
    fn guests_and_spectators_fail_everything() {
        let realm = realm(0);
        let guest = CurrentUser {
            is_guest: true,
            ..member(now() - Duration::days(1000))
        };
        let spectator = CurrentUser {
            is_spectator: true,
            ..member(now())
        };

        for policy in ALL_POLICIES {
            assert!(!user_has_policy_permission(policy, &guest, &realm, now()));
            assert!(!user_has_policy_permission(policy, &spectator, &realm, now()));
        }
    }

    #[test]
    fn moderator_threshold() {
        let realm = realm(10);
        let moderator = CurrentUser {
            is_moderator: true,
            ..member(now())
        };

        assert!(user_has_policy_permission(
            CommonPolicy::ModeratorsOnly,
            &moderator,
            &realm,
            now()
        ));
        // A fresh moderator also counts as a full member.
        assert!(user_has_policy_permission(
            CommonPolicy::FullMembers,
            &moderator,
            &realm,
            now()
        ));
        assert!(!user_has_policy_permission(
            CommonPolicy::AdminsOnly,
            &moderator,
            &realm,
            now()
        ));

        let plain = member(now());
        assert!(!user_has_policy_permission(
            CommonPolicy::ModeratorsOnly,
            &plain,
            &realm,
            now()
        ));
        assert!(user_has_policy_permission(
            CommonPolicy::Members,
            &plain,
            &realm,
            now()
        ));
    }

    #[test]
    fn full_member_tenure() {
        let realm = realm(10);

        // Joined five days ago: not yet a full member.
        let newcomer = member(now() - Duration::days(5));
        assert!(!user_has_policy_permission(
            CommonPolicy::FullMembers,
            &newcomer,
            &realm,
            now()
        ));

        // The same user eleven days after joining.
        let later = now() + Duration::days(6);
        assert!(user_has_policy_permission(
            CommonPolicy::FullMembers,
            &newcomer,
            &realm,
            later
        ));

        // The threshold itself passes.
        let exact = member(now() - Duration::days(10));
        assert!(user_has_policy_permission(
            CommonPolicy::FullMembers,
            &exact,
            &realm,
            now()
        ));
    }
}
