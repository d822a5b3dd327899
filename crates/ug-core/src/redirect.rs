//! Redirect target providers
//!
//! `Redir` groups answer with whatever address the proxy is currently
//! configured to redirect to. The address is read on every call, so a
//! provider that changes is picked up immediately.

use std::sync::{OnceLock, PoisonError, RwLock};

/// Source of the redirect address used by `Redir` groups.
pub trait RedirectTarget {
    /// Current redirect address.
    fn redirect_addr(&self) -> String;
}

// =============================================================================
// Process-wide Target
// =============================================================================

static REDIRECT_ADDR: OnceLock<RwLock<String>> = OnceLock::new();

fn process_slot() -> &'static RwLock<String> {
    REDIRECT_ADDR.get_or_init(|| RwLock::new(String::new()))
}

/// Set the process-wide redirect address.
pub fn set_redirect_addr(addr: impl Into<String>) {
    let addr = addr.into();
    log::debug!("redirect address set to {addr}");
    // Poisoning cannot leave a torn String.
    *process_slot().write().unwrap_or_else(PoisonError::into_inner) = addr;
}

/// Process-wide redirect address, empty until configured.
pub fn redirect_addr() -> String {
    process_slot()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Provider backed by the process-wide address.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRedirect;

impl RedirectTarget for ProcessRedirect {
    fn redirect_addr(&self) -> String {
        redirect_addr()
    }
}

// =============================================================================
// Local Targets
// =============================================================================

/// Provider with an address fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedRedirect(pub String);

impl RedirectTarget for FixedRedirect {
    fn redirect_addr(&self) -> String {
        self.0.clone()
    }
}

/// Provider whose address can be replaced while groups are being queried.
#[derive(Debug, Default)]
pub struct SharedRedirect {
    addr: RwLock<String>,
}

impl SharedRedirect {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: RwLock::new(addr.into()),
        }
    }

    pub fn set(&self, addr: impl Into<String>) {
        *self.addr.write().unwrap_or_else(PoisonError::into_inner) = addr.into();
    }
}

impl RedirectTarget for SharedRedirect {
    fn redirect_addr(&self) -> String {
        self.addr
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T: RedirectTarget + ?Sized> RedirectTarget for &T {
    fn redirect_addr(&self) -> String {
        (**self).redirect_addr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_redirect() {
        let target = FixedRedirect("http://block.local/".to_string());
        assert_eq!(target.redirect_addr(), "http://block.local/");
    }

    #[test]
    fn test_shared_redirect_reflects_updates() {
        let target = SharedRedirect::new("http://a.local/");
        assert_eq!(target.redirect_addr(), "http://a.local/");
        target.set("http://b.local/");
        assert_eq!(target.redirect_addr(), "http://b.local/");
    }

    #[test]
    fn test_process_redirect_reads_global() {
        set_redirect_addr("http://deny.local/blocked.html");
        assert_eq!(ProcessRedirect.redirect_addr(), "http://deny.local/blocked.html");
        assert_eq!(redirect_addr(), "http://deny.local/blocked.html");
    }
}
