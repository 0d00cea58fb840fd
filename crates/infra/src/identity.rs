//! Session identity resolution

use vigil_core::IdentityProvider;

/// Resolves the session owner from the process environment.
///
/// Checked per event rather than cached so an account switch shows up in
/// subsequent samples.
#[derive(Debug, Default)]
pub struct SessionIdentityProvider;

impl SessionIdentityProvider {
    pub fn new() -> Self {
        Self
    }
}

impl IdentityProvider for SessionIdentityProvider {
    fn username(&self) -> String {
        std::env::var("USERNAME")
            .or_else(|_| std::env::var("USER"))
            .unwrap_or_else(|_| "unknown".to_string())
    }
}
