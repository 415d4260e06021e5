//! Build-time configuration of the realtime endpoint.

pub const DEFAULT_API_URL: &str = "ws://localhost:4000/socket";
pub const DEFAULT_TOKEN: &str = "123";
pub const PROTOCOL_VERSION: &str = "2.0.0";

#[derive(Debug, Clone, PartialEq)]
pub struct FrontendConfig {
    pub api_url: String,
    pub token: String,
    pub push_timeout_ms: u32,
    pub heartbeat_interval_ms: u32,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: DEFAULT_TOKEN.to_string(),
            push_timeout_ms: 10_000,
            heartbeat_interval_ms: 30_000,
        }
    }
}

impl FrontendConfig {
    /// Reads `DASHBOARD_API_URL` and `DASHBOARD_TOKEN` captured at compile time.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: non_blank(option_env!("DASHBOARD_API_URL")).unwrap_or(defaults.api_url),
            token: non_blank(option_env!("DASHBOARD_TOKEN")).unwrap_or(defaults.token),
            ..defaults
        }
    }

    pub fn socket_url(&self) -> String {
        socket_endpoint(&self.api_url, &self.token)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Turns a base URL into the websocket endpoint:
/// `http(s)` becomes `ws(s)`, `/websocket` is appended, `token` and `vsn` are added.
pub fn socket_endpoint(base: &str, token: &str) -> String {
    let (path, query) = match base.trim().split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (base.trim(), None),
    };

    let path = if let Some(rest) = path.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = path.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        path.to_string()
    };

    let path = path.trim_end_matches('/');
    let path = if path.ends_with("/websocket") {
        path.to_string()
    } else {
        format!("{}/websocket", path)
    };

    let mut params: Vec<String> = query
        .into_iter()
        .flat_map(|q| q.split('&'))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    params.push(format!("token={}", urlencoding::encode(token)));
    params.push(format!("vsn={}", PROTOCOL_VERSION));

    format!("{}?{}", path, params.join("&"))
}
