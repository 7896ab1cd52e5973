//! Workspace naming and classification. Pure functions, no state.
//!
//! A workspace whose name starts with `ap-` belongs to exactly one project;
//! everything else, including the numeric default workspaces, is neutral
//! ground the user can be sent back to.

/// Reserved prefix marking a workspace as project-owned.
pub const PROJECT_WORKSPACE_PREFIX: &str = "ap-";

/// Where to send the user when no better non-project workspace exists.
pub const FALLBACK_WORKSPACE: &str = "1";

pub fn is_project_workspace(name: &str) -> bool {
    name.starts_with(PROJECT_WORKSPACE_PREFIX)
}

/// The project id encoded in a workspace name. `None` for non-project names
/// and for the bare prefix, which carries no id.
pub fn project_id(workspace: &str) -> Option<&str> {
    let rest = workspace.strip_prefix(PROJECT_WORKSPACE_PREFIX)?;
    if rest.is_empty() { None } else { Some(rest) }
}

/// Total: callers validate ids, this only formats.
pub fn workspace_name(project_id: &str) -> String {
    format!("{PROJECT_WORKSPACE_PREFIX}{project_id}")
}

/// Pick the workspace to land on when leaving project space. Project
/// workspaces are filtered out in input order; among the rest a populated
/// workspace beats an empty one, the first entry beats later ones, and the
/// fixed fallback covers an all-project list.
pub fn preferred_non_project_workspace<F>(workspaces: &[String], mut has_windows: F) -> String
where
    F: FnMut(&str) -> bool,
{
    let candidates: Vec<&str> = workspaces
        .iter()
        .map(String::as_str)
        .filter(|name| !is_project_workspace(name))
        .collect();

    for name in &candidates {
        if has_windows(name) {
            return (*name).to_string();
        }
    }

    candidates
        .first()
        .map(|name| (*name).to_string())
        .unwrap_or_else(|| FALLBACK_WORKSPACE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_marks_project_workspaces() {
        assert!(is_project_workspace("ap-web"));
        assert!(is_project_workspace("ap-"));
        assert!(!is_project_workspace("1"));
        assert!(!is_project_workspace("mail"));
        assert!(!is_project_workspace("AP-web"));
    }

    #[test]
    fn bare_prefix_has_no_project_id() {
        assert_eq!(project_id("ap-web"), Some("web"));
        assert_eq!(project_id("ap-"), None);
        assert_eq!(project_id("3"), None);
    }

    #[test]
    fn name_and_id_round_trip() {
        for id in ["web", "api", "a", "proj-with-dash"] {
            assert_eq!(project_id(&workspace_name(id)), Some(id));
        }
    }

    #[test]
    fn prefers_populated_non_project_workspace() {
        let workspaces = vec![
            "ap-web".to_string(),
            "2".to_string(),
            "3".to_string(),
            "mail".to_string(),
        ];
        let picked = preferred_non_project_workspace(&workspaces, |name| name == "3");
        assert_eq!(picked, "3");
    }

    #[test]
    fn falls_back_to_first_non_project_when_all_empty() {
        let workspaces = vec!["ap-web".to_string(), "2".to_string(), "mail".to_string()];
        let picked = preferred_non_project_workspace(&workspaces, |_| false);
        assert_eq!(picked, "2");
    }

    #[test]
    fn never_returns_a_project_workspace() {
        let workspaces = vec!["ap-web".to_string(), "ap-api".to_string(), "4".to_string()];
        let picked = preferred_non_project_workspace(&workspaces, |_| true);
        assert_eq!(picked, "4");
    }

    #[test]
    fn all_project_list_yields_fixed_fallback() {
        let workspaces = vec!["ap-web".to_string(), "ap-api".to_string()];
        let picked = preferred_non_project_workspace(&workspaces, |_| true);
        assert_eq!(picked, FALLBACK_WORKSPACE);
    }

    #[test]
    fn empty_input_yields_fixed_fallback() {
        let picked = preferred_non_project_workspace(&[], |_| true);
        assert_eq!(picked, FALLBACK_WORKSPACE);
    }
}
