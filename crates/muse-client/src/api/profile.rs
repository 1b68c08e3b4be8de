//! Profile API.

use crate::client::ProviderClient;
use crate::error::Result;
use crate::types::UserProfile;

/// Profile API client.
///
/// The `me` endpoint doubles as the session liveness probe.
pub struct ProfileApi {
    client: ProviderClient,
}

impl ProfileApi {
    pub(crate) fn new(client: ProviderClient) -> Self {
        Self { client }
    }

    /// Fetch the signed-in user's profile.
    pub async fn me(&self) -> Result<UserProfile> {
        self.client.get("me").await
    }
}
