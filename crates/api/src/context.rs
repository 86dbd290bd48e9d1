use videoclub_auth::Identity;

/// Authenticated identity for a request.
///
/// Inserted by the auth middleware; handlers behind it can rely on its
/// presence, the role gate treats absence as unauthenticated.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);
