//! Server configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CI_TENDER_*` environment variables and an
//! optional configuration file, in increasing order of precedence the way
//! OrthoConfig layers them.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Runtime settings of the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CI_TENDER")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// Port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Email of the administrator account created at startup.
    pub admin_email: Option<String>,
    /// Password of the administrator account created at startup.
    pub admin_password: Option<String>,
}

impl ServerSettings {
    /// Socket address to bind, defaulting to `0.0.0.0:8080`.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port,
        )
    }

    /// Administrator credentials, when both halves are configured.
    #[must_use]
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        let email = self.admin_email.as_deref().map(str::trim)?;
        let password = self.admin_password.as_deref()?;
        (!email.is_empty() && !password.is_empty()).then_some((email, password))
    }
}
