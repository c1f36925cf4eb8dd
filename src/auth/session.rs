use std::fmt;

/// Bearer token issued by the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        AccessToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() <= 16 {
            return write!(f, "AccessToken(***)");
        }
        let prefix: String = self.0.chars().take(12).collect();
        write!(f, "AccessToken({}...)", prefix)
    }
}

/// Authentication state for the lifetime of one page.
///
/// Empty until a code exchange succeeds; there is no refresh, a reload
/// starts over with an empty session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    access_token: Option<AccessToken>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AccessToken) -> Self {
        Session {
            access_token: Some(token),
        }
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub(crate) fn set_access_token(&mut self, token: AccessToken) {
        self.access_token = Some(token);
    }

    pub fn sign_out(&mut self) {
        self.access_token = None;
    }
}
