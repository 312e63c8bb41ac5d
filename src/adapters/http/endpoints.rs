use crate::utils::error::{EtlError, Result};
use url::Url;

pub const DEFAULT_SITE_URL: &str = "https://www.viacaocometa.com.br/";
pub const DEFAULT_API_URL: &str = "https://api.jcatlm.com.br/";

const AUTHORIZATION_PATH: &str = "content/jca/cometa/pt-br/jcr:content.authorization.json?clear=1";
const LOGIN_PATH: &str = "oauth/v3/login";
const DIRECTORY_PATH: &str = "place/v1/searchOrigin";
const ROUTES_PATH: &str = "route/v1/getRoutes";

/// Every operator URL the pipeline talks to, derived from the public site
/// base and the API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorEndpoints {
    pub landing_page: Url,
    pub authorization: Url,
    pub login: Url,
    pub directory: Url,
    pub routes: Url,
}

impl OperatorEndpoints {
    pub fn new(site_url: &str, api_url: &str) -> Result<Self> {
        let site = parse("source.site_url", site_url)?;
        let api = parse("source.api_url", api_url)?;

        Ok(Self {
            authorization: join(&site, AUTHORIZATION_PATH)?,
            login: join(&api, LOGIN_PATH)?,
            directory: join(&api, DIRECTORY_PATH)?,
            routes: join(&api, ROUTES_PATH)?,
            landing_page: site,
        })
    }
}

fn parse(field: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| EtlError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })
}

fn join(base: &Url, path: &str) -> Result<Url> {
    base.join(path).map_err(|e| EtlError::ProcessingError {
        message: format!("cannot build operator URL from {} and {}: {}", base, path, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints_point_at_operator() {
        let endpoints = OperatorEndpoints::new(DEFAULT_SITE_URL, DEFAULT_API_URL).unwrap();
        assert_eq!(endpoints.landing_page.as_str(), "https://www.viacaocometa.com.br/");
        assert_eq!(
            endpoints.authorization.as_str(),
            "https://www.viacaocometa.com.br/content/jca/cometa/pt-br/jcr:content.authorization.json?clear=1"
        );
        assert_eq!(endpoints.login.as_str(), "https://api.jcatlm.com.br/oauth/v3/login");
        assert_eq!(
            endpoints.directory.as_str(),
            "https://api.jcatlm.com.br/place/v1/searchOrigin"
        );
        assert_eq!(
            endpoints.routes.as_str(),
            "https://api.jcatlm.com.br/route/v1/getRoutes"
        );
    }

    #[test]
    fn endpoints_follow_custom_bases() {
        let endpoints =
            OperatorEndpoints::new("http://127.0.0.1:8080/site/", "http://127.0.0.1:9090/").unwrap();
        assert_eq!(endpoints.login.as_str(), "http://127.0.0.1:9090/oauth/v3/login");
        assert!(endpoints
            .authorization
            .as_str()
            .starts_with("http://127.0.0.1:8080/site/content/"));
    }

    #[test]
    fn invalid_base_is_a_config_error() {
        assert!(matches!(
            OperatorEndpoints::new("not a url", DEFAULT_API_URL),
            Err(EtlError::InvalidConfigValueError { .. })
        ));
    }
}
