use crate::errors::ConfigError;
use reqwest::Url;
use std::{env, net::IpAddr, net::SocketAddr};

pub const DEFAULT_API_ORIGIN: &str = "https://url-shortner-api-pi.vercel.app";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: SocketAddr,
    pub api_origin: Url,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            env::var("HOST").ok().as_deref(),
            env::var("PORT").ok().as_deref(),
            env::var("SHORTENER_API_ORIGIN").ok().as_deref(),
        )
    }

    fn from_values(
        host: Option<&str>,
        port: Option<&str>,
        origin: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let ip = host
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::from([127, 0, 0, 1]));
        let port = port
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            addr: SocketAddr::new(ip, port),
            api_origin: parse_origin(origin.unwrap_or(DEFAULT_API_ORIGIN))?,
        })
    }
}

pub fn parse_origin(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidOrigin {
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a base url".to_string()));
    }
    Ok(url)
}
