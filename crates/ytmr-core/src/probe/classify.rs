//! Fold probe status codes and curl errors into a verdict.

/// Result of verifying a resolved URL.
///
/// Only `Forbidden` blocks a resolution. `Inconclusive` covers timeouts,
/// network failures and unexpected statuses; callers log it and carry on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeVerdict {
    /// 2xx, or a 3xx from the URL itself (redirects are not followed).
    Reachable(u32),
    /// HTTP 403.
    Forbidden,
    Inconclusive(String),
}

pub fn classify_status(code: u32) -> ProbeVerdict {
    match code {
        403 => ProbeVerdict::Forbidden,
        200..=399 => ProbeVerdict::Reachable(code),
        _ => ProbeVerdict::Inconclusive(format!("HTTP {code}")),
    }
}

/// Describe a probe failure. Never yields `Forbidden`.
pub fn classify_error(e: &anyhow::Error) -> ProbeVerdict {
    let reason = match e.downcast_ref::<curl::Error>() {
        Some(ce) if ce.is_operation_timedout() => "timed out".to_string(),
        Some(ce)
            if ce.is_couldnt_connect()
                || ce.is_couldnt_resolve_host()
                || ce.is_couldnt_resolve_proxy()
                || ce.is_recv_error()
                || ce.is_send_error()
                || ce.is_got_nothing() =>
        {
            format!("connection failed: {ce}")
        }
        _ => format!("{e:#}"),
    };
    ProbeVerdict::Inconclusive(reason)
}
