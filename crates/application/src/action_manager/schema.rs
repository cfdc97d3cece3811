use serde::Serialize;

use super::UserAction;

/// Value type of an action argument or return field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionFieldType {
    /// UTF-8 string.
    String,
    /// Boolean flag.
    Bool,
}

/// One argument or return field of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionField {
    /// Wire name.
    pub name: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Field description.
    pub description: &'static str,
    /// Value type.
    pub field_type: ActionFieldType,
    /// Whether the field must be present.
    pub required: bool,
}

/// Published description of one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSchema {
    /// Stable action name.
    pub name: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Action description.
    pub description: &'static str,
    /// Accepted arguments.
    pub arguments: Vec<ActionField>,
    /// Fields of the returned object.
    pub return_fields: Vec<ActionField>,
}

impl ActionSchema {
    pub(super) fn for_action(action: UserAction) -> Self {
        let (display_name, description) = match action {
            UserAction::EnableUser => ("Enable User", "Reactivate a deactivated Metabase user"),
            UserAction::DisableUser => ("Disable User", "Deactivate an active Metabase user"),
        };

        Self {
            name: action.as_str(),
            display_name,
            description,
            arguments: vec![ActionField {
                name: "userId",
                display_name: "User ID",
                description: "Metabase identifier of the user; must not be blank",
                field_type: ActionFieldType::String,
                required: true,
            }],
            return_fields: vec![ActionField {
                name: "success",
                display_name: "Success",
                description: "Whether the user reached the requested state",
                field_type: ActionFieldType::Bool,
                required: true,
            }],
        }
    }
}
