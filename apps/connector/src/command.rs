use metagov_application::UserAction;
use metagov_core::{AppError, AppResult};

const USAGE: &str = "usage: metagov-connector <databases | entitlements <db> | grants <db> | actions | enable-user <id> | disable-user <id>>";

/// One connector invocation parsed from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Databases,
    Entitlements { database_id: String },
    Grants { database_id: String },
    Actions,
    Invoke { action: UserAction, user_id: String },
}

impl Command {
    pub fn parse(mut args: impl Iterator<Item = String>) -> AppResult<Self> {
        let name = args.next().ok_or_else(usage)?;
        let mut operand = |what: &str| {
            args.next()
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::Validation(format!("{name} requires a {what}")))
        };

        let command = match name.as_str() {
            "databases" => Self::Databases,
            "entitlements" => Self::Entitlements {
                database_id: operand("database id")?,
            },
            "grants" => Self::Grants {
                database_id: operand("database id")?,
            },
            "actions" => Self::Actions,
            "enable-user" => Self::Invoke {
                action: UserAction::EnableUser,
                user_id: operand("user id")?,
            },
            "disable-user" => Self::Invoke {
                action: UserAction::DisableUser,
                user_id: operand("user id")?,
            },
            _ => return Err(usage()),
        };

        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Databases => "databases",
            Self::Entitlements { .. } => "entitlements",
            Self::Grants { .. } => "grants",
            Self::Actions => "actions",
            Self::Invoke { action, .. } => action.as_str(),
        }
    }
}

fn usage() -> AppError {
    AppError::Validation(USAGE.to_owned())
}

#[cfg(test)]
mod tests {
    use metagov_application::UserAction;

    use super::Command;

    fn parse(args: &[&str]) -> Option<Command> {
        Command::parse(args.iter().map(|arg| (*arg).to_owned())).ok()
    }

    #[test]
    fn parses_listing_commands() {
        assert_eq!(parse(&["databases"]), Some(Command::Databases));
        assert_eq!(
            parse(&["grants", "4"]),
            Some(Command::Grants {
                database_id: "4".to_owned()
            })
        );
    }

    #[test]
    fn parses_user_actions() {
        assert_eq!(
            parse(&["disable-user", "17"]),
            Some(Command::Invoke {
                action: UserAction::DisableUser,
                user_id: "17".to_owned()
            })
        );
    }

    #[test]
    fn rejects_missing_operand_and_unknown_command() {
        assert_eq!(parse(&[]), None);
        assert_eq!(parse(&["entitlements"]), None);
        assert_eq!(parse(&["enable-user", " "]), None);
        assert_eq!(parse(&["purge"]), None);
    }
}
