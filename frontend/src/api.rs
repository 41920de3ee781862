//! 带凭证的 HTTP 客户端
//!
//! 客户端实例持有 base URL 与当前 Bearer 凭证，由会话层按需构造并
//! 显式传递——不存在进程级的默认请求头可变状态。401 在此统一识别，
//! 由调用方触发全局会话过期。

use gloo_net::http::{Request, Response};

use nexcrm_shared::protocol::{
    CreateContact, CreateLead, DeleteContact, DeleteLead, DeleteUser, Endpoint, GetLeadAnalytics,
    ListContacts, ListLeads, ListQuery, ListUsers, MeRequest, Method, UpdateContact, UpdateLead,
    UpdateProfile, UpdateUserRole,
};
use nexcrm_shared::{
    AuthResponse, BEARER_PREFIX, Contact, ContactListResponse, ContactPayload, ErrorResponse,
    HEADER_AUTH, Lead, LeadAnalytics, LeadListResponse, LeadPayload, LoginRequest, ProfilePayload,
    RegisterRequest, Role, UserListResponse, UserProfile,
};

use crate::web::LocalStorage;

/// 默认后端地址（开发环境）
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// LocalStorage 中的后端地址覆盖键
const STORAGE_API_URL_KEY: &str = "crm_api_url";

/// 解析后端 base URL：LocalStorage 覆盖值优先，否则用默认值
pub fn api_base() -> String {
    LocalStorage::get(STORAGE_API_URL_KEY)
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
        .trim_end_matches('/')
        .to_string()
}

// =========================================================
// 错误类型
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 请求构建失败
    BuildFailed(String),
    /// 网络请求失败
    Network(String),
    /// 响应解析失败
    Parse(String),
    /// 非 2xx 状态码，附后端给出的 message（可能为空）
    Status { status: u16, message: String },
}

impl ApiError {
    /// 凭证被后端拒绝
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }

    /// 后端错误响应体中的 message，为空则 None
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BuildFailed(msg) => write!(f, "request build error: {}", msg),
            ApiError::Network(msg) => write!(f, "network error: {}", msg),
            ApiError::Parse(msg) => write!(f, "unexpected response: {}", msg),
            ApiError::Status { status, message } if message.is_empty() => {
                write!(f, "server responded with {}", status)
            }
            ApiError::Status { message, .. } => write!(f, "{}", message),
        }
    }
}

// =========================================================
// 客户端
// =========================================================

#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    pub base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url, token }
    }

    /// 发送请求并返回原始响应，统一处理凭证注入与错误归类
    async fn dispatch<E: Endpoint>(&self, endpoint: &E) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint.path());

        let mut builder = match E::METHOD {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Delete => Request::delete(&url),
        };

        if let Some(token) = &self.token {
            builder = builder.header(HEADER_AUTH, &format!("{BEARER_PREFIX}{token}"));
        }

        let params = endpoint.query();
        if !params.is_empty() {
            builder = builder.query(params.iter().map(|(key, value)| (*key, value.as_str())));
        }

        let sent = if E::METHOD.has_body() {
            builder
                .json(endpoint)
                .map_err(|e| ApiError::BuildFailed(e.to_string()))?
                .send()
                .await
        } else {
            builder.send().await
        };
        let response = sent.map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            // 错误体若不是 { message } 形态则保留空 message
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.message)
                .unwrap_or_default();
            return Err(ApiError::Status { status, message });
        }

        Ok(response)
    }

    /// 发送请求并解析响应体
    async fn send<E: Endpoint>(&self, endpoint: &E) -> Result<E::Response, ApiError> {
        let response = self.dispatch(endpoint).await?;
        response
            .json::<E::Response>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// 发送请求，只关心成败不读响应体（变更类端点）
    async fn execute<E: Endpoint>(&self, endpoint: &E) -> Result<(), ApiError> {
        self.dispatch(endpoint).await.map(|_| ())
    }

    // ---------------- 认证 ----------------

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.send(request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.send(request).await
    }

    /// whoami：用当前凭证换取用户档案
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.send(&MeRequest).await.map(|body| body.user)
    }

    // ---------------- 联系人 ----------------

    pub async fn list_contacts(&self, query: ListQuery) -> Result<ContactListResponse, ApiError> {
        self.send(&ListContacts { query }).await
    }

    pub async fn create_contact(&self, payload: ContactPayload) -> Result<Contact, ApiError> {
        self.send(&CreateContact(payload)).await
    }

    pub async fn update_contact(
        &self,
        id: String,
        payload: ContactPayload,
    ) -> Result<Contact, ApiError> {
        self.send(&UpdateContact { id, payload }).await
    }

    pub async fn delete_contact(&self, id: String) -> Result<(), ApiError> {
        self.execute(&DeleteContact { id }).await
    }

    // ---------------- 线索 ----------------

    pub async fn list_leads(&self, query: ListQuery) -> Result<LeadListResponse, ApiError> {
        self.send(&ListLeads { query }).await
    }

    pub async fn create_lead(&self, payload: LeadPayload) -> Result<Lead, ApiError> {
        self.send(&CreateLead(payload)).await
    }

    pub async fn update_lead(&self, id: String, payload: LeadPayload) -> Result<Lead, ApiError> {
        self.send(&UpdateLead { id, payload }).await
    }

    pub async fn delete_lead(&self, id: String) -> Result<(), ApiError> {
        self.execute(&DeleteLead { id }).await
    }

    pub async fn lead_analytics(&self) -> Result<LeadAnalytics, ApiError> {
        self.send(&GetLeadAnalytics).await
    }

    // ---------------- 用户管理 ----------------

    pub async fn list_users(&self, query: ListQuery) -> Result<UserListResponse, ApiError> {
        self.send(&ListUsers { query }).await
    }

    pub async fn update_user_role(&self, id: String, role: Role) -> Result<(), ApiError> {
        self.execute(&UpdateUserRole { id, role }).await
    }

    pub async fn delete_user(&self, id: String) -> Result<(), ApiError> {
        self.execute(&DeleteUser { id }).await
    }

    pub async fn update_profile(&self, payload: ProfilePayload) -> Result<(), ApiError> {
        self.execute(&UpdateProfile(payload)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("https://crm.example.com/".to_string(), None);
        assert_eq!(client.base_url, "https://crm.example.com");
    }

    #[test]
    fn unauthorized_is_recognised() {
        let err = ApiError::Status {
            status: 401,
            message: "Token expired".to_string(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), Some("Token expired"));

        let err = ApiError::Status {
            status: 500,
            message: String::new(),
        };
        assert!(!err.is_unauthorized());
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn display_prefers_server_message() {
        let err = ApiError::Status {
            status: 400,
            message: "Email already exists".to_string(),
        };
        assert_eq!(err.to_string(), "Email already exists");

        let err = ApiError::Status {
            status: 502,
            message: String::new(),
        };
        assert_eq!(err.to_string(), "server responded with 502");
    }
}
