// src/services/channel_router.rs
//
// Project tag -> upload channel routing.
//
// Routing is explicit and total over the configured tag set, partial
// otherwise: an unrecognized tag is an error, never a silent default.

use std::collections::HashMap;

use crate::domain::ChannelBinding;
use crate::error::{AppError, AppResult};

pub struct ChannelRouter {
    bindings: HashMap<String, ChannelBinding>,
}

impl ChannelRouter {
    pub fn new(bindings: Vec<ChannelBinding>) -> Self {
        let bindings = bindings
            .into_iter()
            .map(|b| (b.project_tag.clone(), b))
            .collect();
        Self { bindings }
    }

    /// Resolve the upload identity for a project tag.
    pub fn route(&self, project_tag: &str) -> AppResult<&ChannelBinding> {
        self.bindings
            .get(project_tag)
            .ok_or_else(|| AppError::UnknownProject {
                tag: project_tag.to_string(),
            })
    }

    /// Tags with a configured binding, sorted for stable logging.
    pub fn configured_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CredentialHandle;

    fn router() -> ChannelRouter {
        ChannelRouter::new(vec![
            ChannelBinding {
                project_tag: "NB".to_string(),
                credential: CredentialHandle("token_NB".to_string()),
            },
            ChannelBinding {
                project_tag: "OM".to_string(),
                credential: CredentialHandle("token_OM".to_string()),
            },
        ])
    }

    #[test]
    fn test_route_known_tag() {
        let router = router();
        let binding = router.route("OM").unwrap();
        assert_eq!(binding.credential.as_str(), "token_OM");
    }

    #[test]
    fn test_route_unknown_tag_is_error() {
        let router = router();
        let err = router.route("RL").unwrap_err();
        assert!(matches!(err, AppError::UnknownProject { tag } if tag == "RL"));
    }

    #[test]
    fn test_no_default_for_empty_tag() {
        let router = router();
        assert!(router.route("").is_err());
    }

    #[test]
    fn test_configured_tags_sorted() {
        assert_eq!(router().configured_tags(), vec!["NB", "OM"]);
    }
}
