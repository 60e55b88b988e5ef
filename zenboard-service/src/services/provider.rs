//! External identity provider client.
//!
//! Models the WeChat OAuth contract: an authorization proof (the `code`
//! query parameter of the scan callback) is exchanged for an upstream
//! access token, which is then traded for the user profile. The trait seam
//! lets orchestration tests substitute a canned provider.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ProviderConfig;

/// Identity as reported by the external provider.
#[derive(Debug, Clone)]
pub struct ExternalIdentity {
    /// Opaque stable id (WeChat openid).
    pub external_id: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Error)]
#[error("Upstream provider error: {0}")]
pub struct ProviderError(pub String);

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange an authorization proof for the external identity.
    /// Not retried here; a failed handshake is restarted by the client.
    async fn exchange(&self, proof: &str) -> Result<ExternalIdentity, ProviderError>;

    /// Authorize URL presented as a QR code, with the session id riding
    /// along as the opaque `state` correlation token.
    fn authorize_url(&self, session_id: &str) -> String;
}

#[derive(Debug, Deserialize)]
struct WeChatTokenResponse {
    access_token: Option<String>,
    openid: Option<String>,
    errcode: Option<i64>,
    errmsg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WeChatUserInfo {
    openid: Option<String>,
    nickname: Option<String>,
    headimgurl: Option<String>,
    errcode: Option<i64>,
    errmsg: Option<String>,
}

/// HTTP client for the WeChat open platform.
pub struct WeChatProvider {
    client: reqwest::Client,
    app_id: String,
    app_secret: String,
    redirect_uri: String,
    api_base: String,
    authorize_base: String,
}

impl WeChatProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, anyhow::Error> {
        // The provider exchange is the only network-bound suspend point in
        // the login flow; the timeout keeps a hung upstream from pinning a
        // handler task indefinitely.
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build provider HTTP client: {}", e))?;

        Ok(Self {
            client,
            app_id: config.app_id.clone(),
            app_secret: config.app_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            api_base: config.api_base.clone(),
            authorize_base: config.authorize_base.clone(),
        })
    }

    async fn fetch_token(&self, proof: &str) -> Result<WeChatTokenResponse, ProviderError> {
        let url = format!("{}/sns/oauth2/access_token", self.api_base);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("appid", self.app_id.as_str()),
                ("secret", self.app_secret.as_str()),
                ("code", proof),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError(format!("Token exchange request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ProviderError(format!(
                "Token exchange returned status {}",
                response.status()
            )));
        }

        response
            .json::<WeChatTokenResponse>()
            .await
            .map_err(|e| ProviderError(format!("Failed to parse token response: {}", e)))
    }

    async fn fetch_user_info(
        &self,
        access_token: &str,
        openid: &str,
    ) -> Result<WeChatUserInfo, ProviderError> {
        let url = format!("{}/sns/userinfo", self.api_base);
        let response = self
            .client
            .get(&url)
            .query(&[("access_token", access_token), ("openid", openid)])
            .send()
            .await
            .map_err(|e| ProviderError(format!("Userinfo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ProviderError(format!(
                "Userinfo returned status {}",
                response.status()
            )));
        }

        response
            .json::<WeChatUserInfo>()
            .await
            .map_err(|e| ProviderError(format!("Failed to parse userinfo response: {}", e)))
    }
}

#[async_trait]
impl IdentityProvider for WeChatProvider {
    async fn exchange(&self, proof: &str) -> Result<ExternalIdentity, ProviderError> {
        let token = self.fetch_token(proof).await?;
        // WeChat reports failures as 200 bodies carrying errcode.
        if let Some(errcode) = token.errcode {
            return Err(ProviderError(format!(
                "Token exchange rejected: errcode={} {}",
                errcode,
                token.errmsg.unwrap_or_default()
            )));
        }

        let access_token = token
            .access_token
            .ok_or_else(|| ProviderError("Token response missing access_token".to_string()))?;
        let openid = token
            .openid
            .ok_or_else(|| ProviderError("Token response missing openid".to_string()))?;

        let info = self.fetch_user_info(&access_token, &openid).await?;
        if let Some(errcode) = info.errcode {
            return Err(ProviderError(format!(
                "Userinfo rejected: errcode={} {}",
                errcode,
                info.errmsg.unwrap_or_default()
            )));
        }

        Ok(ExternalIdentity {
            external_id: info.openid.unwrap_or(openid),
            name: info.nickname,
            avatar_url: info.headimgurl,
        })
    }

    fn authorize_url(&self, session_id: &str) -> String {
        format!(
            "{}/connect/qrconnect?appid={}&redirect_uri={}&response_type=code&scope=snsapi_login&state={}#wechat_redirect",
            self.authorize_base,
            urlencoding::encode(&self.app_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(session_id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provider() -> WeChatProvider {
        WeChatProvider::new(&ProviderConfig {
            app_id: "wx-test-app".to_string(),
            app_secret: "secret".to_string(),
            redirect_uri: "http://localhost:8080/auth/login/callback".to_string(),
            api_base: "https://api.weixin.qq.com".to_string(),
            authorize_base: "https://open.weixin.qq.com".to_string(),
            request_timeout_seconds: 10,
        })
        .unwrap()
    }

    #[test]
    fn authorize_url_embeds_session_as_state() {
        let provider = test_provider();
        let url = provider.authorize_url("session-123");
        assert!(url.contains("state=session-123"));
        assert!(url.contains("appid=wx-test-app"));
        assert!(url.starts_with("https://open.weixin.qq.com/connect/qrconnect"));
    }
}
