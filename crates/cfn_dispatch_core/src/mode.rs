use serde::{Deserialize, Serialize};

use crate::contract::RequestType;

/// Phases a resource runs in when no `Mode` is configured. Matches the
/// default the template macro writes.
pub const DEFAULT_MODE: [RequestType; 2] = [RequestType::Create, RequestType::Update];

/// The `Mode` resource property.
///
/// Hand-written templates use a string such as `"Create"` or `"CreateUpdate"`;
/// the template macro emits a list such as `["Create", "Update"]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ModeSpec {
    Phases(String),
    PhaseList(Vec<String>),
}

impl ModeSpec {
    pub fn matches(&self, request_type: RequestType) -> bool {
        match self {
            Self::Phases(mode) => should_execute(request_type, mode),
            Self::PhaseList(phases) => phases
                .iter()
                .any(|phase| phase == request_type.as_str()),
        }
    }
}

/// Substring test: `"Create"` matches both `"Create"` and `"CreateUpdate"`.
///
/// Matching is loose and case-sensitive: `"Create"` also matches any other
/// value containing it, such as `"UpdateCreateDelete"`.
pub fn should_execute(request_type: RequestType, mode: &str) -> bool {
    let request = request_type.as_str();
    request == mode || mode.contains(request)
}

pub fn should_execute_mode(request_type: RequestType, mode: Option<&ModeSpec>) -> bool {
    match mode {
        Some(mode) => mode.matches(request_type),
        None => DEFAULT_MODE.contains(&request_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_phase_matches() {
        assert!(should_execute(RequestType::Create, "Create"));
        assert!(!should_execute(RequestType::Update, "Create"));
    }

    #[test]
    fn concatenated_phases_match_by_substring() {
        assert!(should_execute(RequestType::Create, "CreateUpdate"));
        assert!(should_execute(RequestType::Update, "CreateUpdate"));
        assert!(!should_execute(RequestType::Delete, "CreateUpdate"));
    }

    #[test]
    fn substring_matching_stays_loose() {
        assert!(should_execute(RequestType::Create, "UpdateCreateDelete"));
        assert!(!should_execute(RequestType::Create, "create"));
    }

    #[test]
    fn phase_list_uses_membership() {
        let mode = ModeSpec::PhaseList(vec!["Create".to_string(), "Update".to_string()]);
        assert!(mode.matches(RequestType::Update));
        assert!(!mode.matches(RequestType::Delete));

        let partial = ModeSpec::PhaseList(vec!["CreateUpdate".to_string()]);
        assert!(!partial.matches(RequestType::Create));
    }

    #[test]
    fn mode_deserializes_from_string_or_list() {
        let single: ModeSpec = serde_json::from_str("\"Delete\"").expect("string mode");
        assert_eq!(single, ModeSpec::Phases("Delete".to_string()));

        let list: ModeSpec =
            serde_json::from_str("[\"Create\",\"Delete\"]").expect("list mode");
        assert!(list.matches(RequestType::Delete));
    }

    #[test]
    fn missing_mode_runs_on_create_and_update() {
        assert!(should_execute_mode(RequestType::Create, None));
        assert!(should_execute_mode(RequestType::Update, None));
        assert!(!should_execute_mode(RequestType::Delete, None));
    }
}
