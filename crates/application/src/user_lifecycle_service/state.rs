use metagov_core::{AppError, AppResult};
use metagov_domain::MetabaseUser;

/// Desired end state of a lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetUserState {
    /// The user can sign in.
    Enabled,
    /// The user cannot sign in.
    Disabled,
}

impl TargetUserState {
    /// Returns the verb used in logs and error messages.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Enabled => "enable",
            Self::Disabled => "disable",
        }
    }
}

/// User state as observed through a lookup that only surfaces active users.
#[derive(Debug)]
pub enum ObservedUserState {
    /// The lookup returned an active record.
    Active(MetabaseUser),
    /// The lookup returned not-found, or a record flagged inactive.
    Inactive(Option<MetabaseUser>),
    /// The lookup failed for another reason; the state cannot be known.
    Unknown(AppError),
}

impl ObservedUserState {
    /// Classifies a lookup result. Not-found is evidence of `Inactive`.
    #[must_use]
    pub fn from_lookup(result: AppResult<MetabaseUser>) -> Self {
        match result {
            Ok(user) if user.is_active => Self::Active(user),
            Ok(user) => Self::Inactive(Some(user)),
            Err(error) if error.is_not_found() => Self::Inactive(None),
            Err(error) => Self::Unknown(error),
        }
    }

    /// Returns true when the lookup returned a record at all.
    #[must_use]
    pub fn was_found(&self) -> bool {
        matches!(self, Self::Active(_) | Self::Inactive(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use metagov_core::AppError;
    use metagov_domain::MetabaseUser;

    use super::ObservedUserState;

    fn user(is_active: bool) -> MetabaseUser {
        MetabaseUser {
            id: "u1".to_owned(),
            email: None,
            first_name: None,
            last_name: None,
            is_active,
        }
    }

    #[test]
    fn not_found_is_classified_as_inactive() {
        let state =
            ObservedUserState::from_lookup(Err(AppError::NotFound("user u1".to_owned())));
        assert!(matches!(state, ObservedUserState::Inactive(None)));
        assert!(!state.was_found());
    }

    #[test]
    fn other_failures_are_unknown() {
        let state = ObservedUserState::from_lookup(Err(AppError::Remote("boom".to_owned())));
        assert!(matches!(state, ObservedUserState::Unknown(_)));
    }

    #[test]
    fn records_are_classified_by_activity_flag() {
        assert!(matches!(
            ObservedUserState::from_lookup(Ok(user(true))),
            ObservedUserState::Active(_)
        ));

        let inactive = ObservedUserState::from_lookup(Ok(user(false)));
        assert!(matches!(inactive, ObservedUserState::Inactive(Some(_))));
        assert!(inactive.was_found());
    }
}
