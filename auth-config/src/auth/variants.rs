//! Concrete auth config variants, one per [`AuthSource`].
//!
//! Each variant pins its own source and name, so an `email` config reporting
//! OAuth2 semantics cannot be constructed.
//!
//! # Invariants
//! - An enabled instance carries every mandatory provider field. Constructors
//!   of variants with such fields return `Err` otherwise; disabled instances
//!   may leave them empty.
//! - Every instance encodes to a record that decodes back to it.

use super::base::{AuthConfigBase, AuthConfigId, ProviderConfig, Secret, require_non_empty};
use super::error::AuthConfigError;
use super::source::{AuthSource, AuthType};

/// Scope requested from OIDC providers when none is configured.
pub const DEFAULT_OIDC_SCOPE: &str = "openid email profile";

/// Return `config` if it is disabled or has its mandatory fields.
fn checked<T: ProviderConfig>(config: T) -> Result<T, AuthConfigError> {
    if config.base().enabled() {
        config.check_enabled()?;
    }
    Ok(config)
}

/// Email and password login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAuthConfig {
    base: AuthConfigBase,
}

impl EmailAuthConfig {
    #[must_use]
    pub const fn new(base: AuthConfigBase) -> Self {
        Self { base }
    }
}

impl ProviderConfig for EmailAuthConfig {
    const SOURCE: AuthSource = AuthSource::Email;

    fn base(&self) -> &AuthConfigBase {
        &self.base
    }
}

/// Phone number and one-time code login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneAuthConfig {
    base: AuthConfigBase,
}

impl PhoneAuthConfig {
    #[must_use]
    pub const fn new(base: AuthConfigBase) -> Self {
        Self { base }
    }
}

impl ProviderConfig for PhoneAuthConfig {
    const SOURCE: AuthSource = AuthSource::Phone;

    fn base(&self) -> &AuthConfigBase {
        &self.base
    }
}

/// OAuth2 client registration shared by the OAuth providers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OAuthClient {
    pub client_id: Option<String>,
    pub client_secret: Option<Secret>,
}

impl OAuthClient {
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(Secret::new(client_secret)),
        }
    }

    fn check(&self) -> Result<(), AuthConfigError> {
        require_non_empty("clientId", self.client_id.as_deref())?;
        require_non_empty(
            "clientSecret",
            self.client_secret.as_ref().map(Secret::expose),
        )
    }
}

/// Google OAuth2 login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleAuthConfig {
    base: AuthConfigBase,
    client: OAuthClient,
}

impl GoogleAuthConfig {
    /// # Errors
    /// Returns `AuthConfigError::InvalidAuthConfig` if the config is enabled
    /// and the client id or secret is empty.
    pub fn new(base: AuthConfigBase, client: OAuthClient) -> Result<Self, AuthConfigError> {
        checked(Self { base, client })
    }

    #[must_use]
    pub const fn client(&self) -> &OAuthClient {
        &self.client
    }
}

impl ProviderConfig for GoogleAuthConfig {
    const SOURCE: AuthSource = AuthSource::Google;

    fn base(&self) -> &AuthConfigBase {
        &self.base
    }

    fn check_enabled(&self) -> Result<(), AuthConfigError> {
        self.client.check()
    }
}

/// GitHub OAuth2 login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubAuthConfig {
    base: AuthConfigBase,
    client: OAuthClient,
}

impl GithubAuthConfig {
    /// # Errors
    /// Returns `AuthConfigError::InvalidAuthConfig` if the config is enabled
    /// and the client id or secret is empty.
    pub fn new(base: AuthConfigBase, client: OAuthClient) -> Result<Self, AuthConfigError> {
        checked(Self { base, client })
    }

    #[must_use]
    pub const fn client(&self) -> &OAuthClient {
        &self.client
    }
}

impl ProviderConfig for GithubAuthConfig {
    const SOURCE: AuthSource = AuthSource::Github;

    fn base(&self) -> &AuthConfigBase {
        &self.base
    }

    fn check_enabled(&self) -> Result<(), AuthConfigError> {
        self.client.check()
    }
}

/// Admin-chosen label shown on the login page. Absent means "use the name".
fn check_label(label: Option<String>) -> Result<Option<String>, AuthConfigError> {
    match label {
        Some(label) if label.is_empty() => {
            Err(AuthConfigError::invalid("displayLabel", "must not be empty"))
        }
        label => Ok(label),
    }
}

/// Generic OpenID Connect login.
///
/// # Invariants
/// - `scope` is never empty; it falls back to [`DEFAULT_OIDC_SCOPE`].
/// - `display_label`, when present, is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OidcAuthConfig {
    base: AuthConfigBase,
    client: OAuthClient,
    issuer_uri: Option<String>,
    scope: String,
    display_label: Option<String>,
}

impl OidcAuthConfig {
    /// # Errors
    /// Returns `AuthConfigError::InvalidAuthConfig` if `display_label` is
    /// empty, or if the config is enabled and the client id, client secret,
    /// or issuer is empty.
    pub fn new(
        base: AuthConfigBase,
        client: OAuthClient,
        issuer_uri: Option<String>,
        scope: Option<String>,
        display_label: Option<String>,
    ) -> Result<Self, AuthConfigError> {
        checked(Self {
            base,
            client,
            issuer_uri,
            scope: scope
                .filter(|scope| !scope.is_empty())
                .unwrap_or_else(|| DEFAULT_OIDC_SCOPE.to_string()),
            display_label: check_label(display_label)?,
        })
    }

    #[must_use]
    pub const fn client(&self) -> &OAuthClient {
        &self.client
    }

    /// Issuer used for discovery (`{issuer}/.well-known/openid-configuration`).
    #[must_use]
    pub fn issuer_uri(&self) -> Option<&str> {
        self.issuer_uri.as_deref()
    }

    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    #[must_use]
    pub fn display_label(&self) -> Option<&str> {
        self.display_label.as_deref()
    }
}

impl ProviderConfig for OidcAuthConfig {
    const SOURCE: AuthSource = AuthSource::Oidc;

    fn base(&self) -> &AuthConfigBase {
        &self.base
    }

    fn check_enabled(&self) -> Result<(), AuthConfigError> {
        self.client.check()?;
        require_non_empty("issuerUri", self.issuer_uri.as_deref())
    }
}

/// Generic SAML 2.0 login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamlAuthConfig {
    base: AuthConfigBase,
    metadata_url: Option<String>,
    entity_id: Option<String>,
    display_label: Option<String>,
}

impl SamlAuthConfig {
    /// # Errors
    /// Returns `AuthConfigError::InvalidAuthConfig` if `display_label` is
    /// empty, or if the config is enabled and the metadata url is empty.
    pub fn new(
        base: AuthConfigBase,
        metadata_url: Option<String>,
        entity_id: Option<String>,
        display_label: Option<String>,
    ) -> Result<Self, AuthConfigError> {
        checked(Self {
            base,
            metadata_url,
            entity_id,
            display_label: check_label(display_label)?,
        })
    }

    /// Where the identity provider publishes its SAML metadata.
    #[must_use]
    pub fn metadata_url(&self) -> Option<&str> {
        self.metadata_url.as_deref()
    }

    /// Service-provider entity id, if it differs from the default.
    #[must_use]
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    #[must_use]
    pub fn display_label(&self) -> Option<&str> {
        self.display_label.as_deref()
    }
}

impl ProviderConfig for SamlAuthConfig {
    const SOURCE: AuthSource = AuthSource::Saml;

    fn base(&self) -> &AuthConfigBase {
        &self.base
    }

    fn check_enabled(&self) -> Result<(), AuthConfigError> {
        require_non_empty("metadataUrl", self.metadata_url.as_deref())
    }
}

/// Any auth config, tagged by source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthConfig {
    Email(EmailAuthConfig),
    Phone(PhoneAuthConfig),
    Google(GoogleAuthConfig),
    Github(GithubAuthConfig),
    Oidc(OidcAuthConfig),
    Saml(SamlAuthConfig),
}

/// Run `$body` with `$config` bound to the inner variant.
macro_rules! with_variant {
    ($self:expr, $config:ident => $body:expr) => {
        match $self {
            AuthConfig::Email($config) => $body,
            AuthConfig::Phone($config) => $body,
            AuthConfig::Google($config) => $body,
            AuthConfig::Github($config) => $body,
            AuthConfig::Oidc($config) => $body,
            AuthConfig::Saml($config) => $body,
        }
    };
}

/// Source of a concrete variant type, usable where `Self::SOURCE` is not.
const fn source_of<T: ProviderConfig>(_: &T) -> AuthSource {
    T::SOURCE
}

impl AuthConfig {
    #[must_use]
    pub const fn source(&self) -> AuthSource {
        with_variant!(self, c => source_of(c))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        with_variant!(self, c => c.name())
    }

    #[must_use]
    pub fn auth_type(&self) -> AuthType {
        with_variant!(self, c => c.auth_type())
    }

    #[must_use]
    pub fn base(&self) -> &AuthConfigBase {
        with_variant!(self, c => c.base())
    }

    #[must_use]
    pub fn id(&self) -> Option<&AuthConfigId> {
        self.base().id()
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.base().enabled()
    }

    #[must_use]
    pub fn enable_register(&self) -> bool {
        self.base().enable_register()
    }

    /// Label for the login page: the admin's display label when one is set,
    /// otherwise the name.
    #[must_use]
    pub fn label(&self) -> &str {
        let label = match self {
            Self::Oidc(oidc) => oidc.display_label(),
            Self::Saml(saml) => saml.display_label(),
            _ => None,
        };
        label.unwrap_or_else(|| self.name())
    }
}

impl From<EmailAuthConfig> for AuthConfig {
    fn from(config: EmailAuthConfig) -> Self {
        Self::Email(config)
    }
}

impl From<PhoneAuthConfig> for AuthConfig {
    fn from(config: PhoneAuthConfig) -> Self {
        Self::Phone(config)
    }
}

impl From<GoogleAuthConfig> for AuthConfig {
    fn from(config: GoogleAuthConfig) -> Self {
        Self::Google(config)
    }
}

impl From<GithubAuthConfig> for AuthConfig {
    fn from(config: GithubAuthConfig) -> Self {
        Self::Github(config)
    }
}

impl From<OidcAuthConfig> for AuthConfig {
    fn from(config: OidcAuthConfig) -> Self {
        Self::Oidc(config)
    }
}

impl From<SamlAuthConfig> for AuthConfig {
    fn from(config: SamlAuthConfig) -> Self {
        Self::Saml(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_base() -> AuthConfigBase {
        AuthConfigBase::new(None, true, true)
    }

    fn disabled_base() -> AuthConfigBase {
        AuthConfigBase::new(None, false, false)
    }

    fn field_of<T: std::fmt::Debug>(result: Result<T, AuthConfigError>) -> String {
        match result {
            Err(AuthConfigError::InvalidAuthConfig { field, .. }) => field,
            other => panic!("expected InvalidAuthConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_email_config_is_form_login() {
        let config = AuthConfig::from(EmailAuthConfig::new(AuthConfigBase::new(None, true, false)));
        assert_eq!(config.source(), AuthSource::Email);
        assert_eq!(config.name(), "email");
        assert_eq!(config.auth_type(), AuthType::Form);
        assert!(config.enabled());
        assert!(!config.enable_register());
    }

    #[test]
    fn test_every_variant_reports_its_source_auth_type_and_name() {
        let configs: Vec<AuthConfig> = vec![
            EmailAuthConfig::new(disabled_base()).into(),
            PhoneAuthConfig::new(disabled_base()).into(),
            GoogleAuthConfig::new(disabled_base(), OAuthClient::default())
                .expect("disabled")
                .into(),
            GithubAuthConfig::new(disabled_base(), OAuthClient::default())
                .expect("disabled")
                .into(),
            OidcAuthConfig::new(disabled_base(), OAuthClient::default(), None, None, None)
                .expect("disabled")
                .into(),
            SamlAuthConfig::new(disabled_base(), None, None, None)
                .expect("disabled")
                .into(),
        ];

        let sources: Vec<AuthSource> = configs.iter().map(AuthConfig::source).collect();
        assert_eq!(sources, AuthSource::ALL.to_vec());

        for config in &configs {
            assert_eq!(config.auth_type(), config.source().auth_type());
            assert_eq!(config.name(), config.source().key());
        }
    }

    #[test]
    fn test_enabled_google_requires_client_id() {
        let result = GoogleAuthConfig::new(
            enabled_base(),
            OAuthClient {
                client_id: None,
                client_secret: Some(Secret::new("s3cret")),
            },
        );
        assert_eq!(field_of(result), "clientId");
    }

    #[test]
    fn test_enabled_github_requires_non_empty_secret() {
        let result = GithubAuthConfig::new(enabled_base(), OAuthClient::new("client", ""));
        assert_eq!(field_of(result), "clientSecret");
    }

    #[test]
    fn test_disabled_provider_skips_mandatory_fields() {
        let google = GoogleAuthConfig::new(disabled_base(), OAuthClient::default())
            .expect("disabled configs may be incomplete");
        assert!(google.client().client_id.is_none());
    }

    #[test]
    fn test_oidc_defaults_and_issuer_check() {
        let oidc = OidcAuthConfig::new(
            disabled_base(),
            OAuthClient::new("client", "secret"),
            None,
            Some(String::new()),
            None,
        )
        .expect("disabled");
        assert_eq!(oidc.scope(), DEFAULT_OIDC_SCOPE);
        assert_eq!(AuthConfig::from(oidc).label(), "oidc");

        let result = OidcAuthConfig::new(
            enabled_base(),
            OAuthClient::new("client", "secret"),
            None,
            None,
            None,
        );
        assert_eq!(field_of(result), "issuerUri");
    }

    #[test]
    fn test_saml_label_does_not_change_name() {
        let saml = SamlAuthConfig::new(
            enabled_base(),
            Some("https://idp.example.com/metadata".to_string()),
            None,
            Some("Okta".to_string()),
        )
        .expect("valid saml");
        assert_eq!(saml.display_label(), Some("Okta"));

        let config = AuthConfig::from(saml);
        assert_eq!(config.name(), "saml");
        assert_eq!(config.label(), "Okta");
        assert_eq!(config.auth_type(), AuthType::Saml);
    }

    #[test]
    fn test_enabled_saml_requires_metadata_url() {
        let result = SamlAuthConfig::new(enabled_base(), None, Some("sp".to_string()), None);
        assert_eq!(field_of(result), "metadataUrl");
    }

    #[test]
    fn test_empty_display_label_rejected_even_when_disabled() {
        let result = SamlAuthConfig::new(disabled_base(), None, None, Some(String::new()));
        assert_eq!(field_of(result), "displayLabel");

        let result = OidcAuthConfig::new(
            disabled_base(),
            OAuthClient::default(),
            None,
            None,
            Some(String::new()),
        );
        assert_eq!(field_of(result), "displayLabel");
    }

    #[test]
    fn test_debug_output_hides_client_secret() {
        let config = AuthConfig::from(
            GoogleAuthConfig::new(
                enabled_base(),
                OAuthClient::new("client", "very-secret-value"),
            )
            .expect("valid google"),
        );
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret-value"));
        assert!(debug.contains("client"));
    }
}
