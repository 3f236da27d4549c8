use std::sync::Arc;

use azure_core::credentials::TokenCredential;
use azure_identity::AzureCliCredential;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{ArmError, ArmResult};

/// OAuth scope requested for Resource Manager tokens.
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

/// Environment variable holding a pre-acquired bearer token.
pub const ACCESS_TOKEN_ENV: &str = "AZURE_ACCESS_TOKEN";

/// Credential types supported by the Resource Manager clients.
#[derive(Clone)]
pub enum ArmCredential {
    /// A bearer token acquired out of band (e.g. `az account get-access-token`).
    AccessToken(SecretString),

    /// Any `azure_identity` credential. A token for [`MANAGEMENT_SCOPE`]
    /// is requested on every call; caching is left to the credential.
    TokenCredential(Arc<dyn TokenCredential>),
}

impl ArmCredential {
    /// Create a credential from the `AZURE_ACCESS_TOKEN` environment variable.
    /// Falls back to the Azure CLI credential if the variable is not set.
    pub fn from_env() -> ArmResult<Self> {
        match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(token) if !token.is_empty() => Ok(Self::AccessToken(SecretString::from(token))),
            _ => Self::azure_cli(),
        }
    }

    /// Create a static bearer-token credential.
    pub fn access_token(token: impl Into<String>) -> Self {
        Self::AccessToken(SecretString::from(token.into()))
    }

    /// Authenticate through the logged-in Azure CLI.
    pub fn azure_cli() -> ArmResult<Self> {
        let credential: Arc<dyn TokenCredential> = AzureCliCredential::new(None)
            .map_err(|e| ArmError::Auth(format!("failed to create Azure CLI credential: {e}")))?;
        Ok(Self::TokenCredential(credential))
    }

    /// Wrap an arbitrary `TokenCredential`.
    pub fn token_credential(credential: Arc<dyn TokenCredential>) -> Self {
        Self::TokenCredential(credential)
    }

    /// Resolve the credential to an authorization header value.
    pub async fn resolve(&self) -> ArmResult<String> {
        match self {
            Self::AccessToken(token) => Ok(format!("Bearer {}", token.expose_secret())),
            Self::TokenCredential(credential) => {
                let token = credential
                    .get_token(&[MANAGEMENT_SCOPE], None)
                    .await
                    .map_err(|e| ArmError::Auth(format!("token acquisition failed: {e}")))?;
                Ok(format!("Bearer {}", token.token.secret()))
            }
        }
    }
}

impl std::fmt::Debug for ArmCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessToken(_) => write!(f, "ArmCredential::AccessToken(****)"),
            Self::TokenCredential(_) => write!(f, "ArmCredential::TokenCredential"),
        }
    }
}
