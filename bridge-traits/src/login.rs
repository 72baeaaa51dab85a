//! Remote Account Login
//!
//! The login collaborator opens the host's interactive sign-in flow (a modal
//! embedding the storefront's login page) and reports whether the user ended
//! up authenticated.

use crate::{error::Result, platform::PlatformSendSync};

/// Interactive login capability.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::login::LoginProvider;
///
/// async fn ensure_signed_in(login: &dyn LoginProvider) -> bool {
///     login.login().await.unwrap_or(false)
/// }
/// ```
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait LoginProvider: PlatformSendSync {
    /// Run the login flow.
    ///
    /// Returns `Ok(true)` once authenticated and `Ok(false)` when the user
    /// closed the flow without signing in.
    async fn login(&self) -> Result<bool>;
}
