/// Caller that passed the authorization guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub uid: String,
    pub email: Option<String>,
}
