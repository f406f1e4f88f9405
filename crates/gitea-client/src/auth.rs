//! Authentication applied to Gitea API requests.

use std::fmt;

/// How requests are authenticated against the Gitea API.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum GiteaAuth {
    /// Anonymous access
    #[default]
    None,
    /// Personal access token, sent as `Authorization: token <value>`
    Token(String),
    /// HTTP basic authentication
    Basic { username: String, password: String },
}

impl GiteaAuth {
    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            GiteaAuth::None => request,
            GiteaAuth::Token(token) => {
                request.header(reqwest::header::AUTHORIZATION, format!("token {token}"))
            }
            GiteaAuth::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        }
    }
}

impl fmt::Debug for GiteaAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GiteaAuth::None => f.write_str("None"),
            GiteaAuth::Token(_) => f.write_str("Token(****)"),
            GiteaAuth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"****")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let token = GiteaAuth::Token("s3cr3t".to_string());
        assert!(!format!("{token:?}").contains("s3cr3t"));

        let basic = GiteaAuth::Basic {
            username: "ci-bot".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{basic:?}");
        assert!(rendered.contains("ci-bot"));
        assert!(!rendered.contains("hunter2"));
    }
}
