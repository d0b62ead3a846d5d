use blogapi_auth::Identity;

/// Actor context for a request.
///
/// Present on every request that passed the authentication middleware.
/// `identity` is `None` for anonymous callers (no `Authorization` header).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorContext {
    identity: Option<Identity>,
}

impl ActorContext {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}
