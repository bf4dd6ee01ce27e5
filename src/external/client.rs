use std::sync::LazyLock;
use std::time::Duration;

/// Global HTTP client shared by the SMS and push channels
///
/// Initialized lazily on first access and reused for the lifetime of the
/// process, so concurrent sends share one connection pool.
///
/// # Features
/// - **Timeouts**: 30s request timeout, 10s connect timeout. The dispatcher
///   applies its own tighter per-channel bound on top.
/// - **HTTP/2**: adaptive window sizing and keep-alive
/// - **User-Agent**: `parcel-notify/{version}`
///
/// # Example
/// ```no_run
/// use parcel_notify::external::HTTP_CLIENT;
///
/// async fn ping() -> Result<reqwest::StatusCode, reqwest::Error> {
///     let response = HTTP_CLIENT
///         .get("https://api.twilio.com/healthcheck")
///         .send()
///         .await?;
///
///     Ok(response.status())
/// }
/// ```
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        .user_agent(user_agent())
        .build()
        .expect("Failed to build HTTP client")
});

fn user_agent() -> String {
    format!("parcel-notify/{}", crate::pkg_version())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_initialization() {
        let _ = &*HTTP_CLIENT;
    }

    #[test]
    fn test_user_agent_carries_version() {
        let agent = user_agent();
        assert!(agent.starts_with("parcel-notify/"));
        assert!(agent.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
