/// The caller identity resolved for a request.
///
/// Every request carries exactly one of these: "no credentials" is the
/// `Anonymous` variant, never a missing value. Handlers read it from request
/// extensions and pass it into services, which decide per operation what the
/// identity may do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    Authenticated { subject: String },
}

impl Identity {
    /// Identity for a verified subject.
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Identity::Authenticated {
            subject: subject.into(),
        }
    }

    /// The subject identifier, if authenticated.
    pub fn subject(&self) -> Option<&str> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated { subject } => Some(subject),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated { .. })
    }
}
