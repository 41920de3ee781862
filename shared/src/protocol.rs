//! 接口协议定义
//!
//! 通过 `Endpoint` trait 把每个请求类型与其路径、HTTP 方法和
//! 响应类型绑定在一起，HTTP 层据此做一次性的泛型分发。

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    AuthResponse, ContactListResponse, ContactPayload, Contact, Lead, LeadAnalytics,
    LeadListResponse, LeadPayload, LoginRequest, MeResponse, ProfilePayload, RegisterRequest,
    Role, UserListResponse, DEFAULT_PAGE_LIMIT,
};

/// HTTP 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// 该方法是否携带 JSON 请求体
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }
}

/// 一个 API 端点：请求类型即请求体，关联响应类型与元数据
///
/// 路径为实例方法而非关联常量，因为部分端点在路径中携带资源 id。
pub trait Endpoint: Serialize {
    /// 该请求对应的响应类型
    type Response: DeserializeOwned;
    /// HTTP 方法
    const METHOD: Method;
    /// URL 路径（不含 base URL）
    fn path(&self) -> String;
    /// 查询参数，默认为空
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

// =========================================================
// 列表查询参数
// =========================================================

/// 分页 + 过滤查询，空过滤器不会出现在查询串中
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub status: String,
    pub source: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            search: String::new(),
            status: String::new(),
            source: String::new(),
        }
    }
}

impl ListQuery {
    pub fn page(page: u32) -> Self {
        ListQuery {
            page,
            ..Default::default()
        }
    }

    /// 只取前 n 条（仪表盘的 recent 列表）
    pub fn recent(limit: u32) -> Self {
        ListQuery {
            limit,
            ..Default::default()
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if !self.search.is_empty() {
            params.push(("search", self.search.clone()));
        }
        if !self.status.is_empty() {
            params.push(("status", self.status.clone()));
        }
        if !self.source.is_empty() {
            params.push(("source", self.source.clone()));
        }
        params
    }
}

// =========================================================
// 认证端点
// =========================================================

impl Endpoint for LoginRequest {
    type Response = AuthResponse;
    const METHOD: Method = Method::Post;
    fn path(&self) -> String {
        "/api/auth/login".to_string()
    }
}

impl Endpoint for RegisterRequest {
    type Response = AuthResponse;
    const METHOD: Method = Method::Post;
    fn path(&self) -> String {
        "/api/auth/register".to_string()
    }
}

/// whoami：用持久化凭证换取当前用户
#[derive(Debug, Clone, Serialize)]
pub struct MeRequest;

impl Endpoint for MeRequest {
    type Response = MeResponse;
    const METHOD: Method = Method::Get;
    fn path(&self) -> String {
        "/api/auth/me".to_string()
    }
}

// =========================================================
// 联系人端点
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct ListContacts {
    #[serde(skip)]
    pub query: ListQuery,
}

impl Endpoint for ListContacts {
    type Response = ContactListResponse;
    const METHOD: Method = Method::Get;
    fn path(&self) -> String {
        "/api/contacts".to_string()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        self.query.params()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct CreateContact(pub ContactPayload);

impl Endpoint for CreateContact {
    type Response = Contact;
    const METHOD: Method = Method::Post;
    fn path(&self) -> String {
        "/api/contacts".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateContact {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub payload: ContactPayload,
}

impl Endpoint for UpdateContact {
    type Response = Contact;
    const METHOD: Method = Method::Put;
    fn path(&self) -> String {
        format!("/api/contacts/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteContact {
    #[serde(skip)]
    pub id: String,
}

impl Endpoint for DeleteContact {
    type Response = crate::ErrorResponse;
    const METHOD: Method = Method::Delete;
    fn path(&self) -> String {
        format!("/api/contacts/{}", self.id)
    }
}

// =========================================================
// 线索端点
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct ListLeads {
    #[serde(skip)]
    pub query: ListQuery,
}

impl Endpoint for ListLeads {
    type Response = LeadListResponse;
    const METHOD: Method = Method::Get;
    fn path(&self) -> String {
        "/api/leads".to_string()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        self.query.params()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct CreateLead(pub LeadPayload);

impl Endpoint for CreateLead {
    type Response = Lead;
    const METHOD: Method = Method::Post;
    fn path(&self) -> String {
        "/api/leads".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateLead {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub payload: LeadPayload,
}

impl Endpoint for UpdateLead {
    type Response = Lead;
    const METHOD: Method = Method::Put;
    fn path(&self) -> String {
        format!("/api/leads/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteLead {
    #[serde(skip)]
    pub id: String,
}

impl Endpoint for DeleteLead {
    type Response = crate::ErrorResponse;
    const METHOD: Method = Method::Delete;
    fn path(&self) -> String {
        format!("/api/leads/{}", self.id)
    }
}

/// 线索管道分析
#[derive(Debug, Clone, Serialize)]
pub struct GetLeadAnalytics;

impl Endpoint for GetLeadAnalytics {
    type Response = LeadAnalytics;
    const METHOD: Method = Method::Get;
    fn path(&self) -> String {
        "/api/leads/analytics".to_string()
    }
}

// =========================================================
// 用户管理端点（仅管理员）
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct ListUsers {
    #[serde(skip)]
    pub query: ListQuery,
}

impl Endpoint for ListUsers {
    type Response = UserListResponse;
    const METHOD: Method = Method::Get;
    fn path(&self) -> String {
        "/api/users".to_string()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        self.query.params()
    }
}

/// `PUT /api/users/:id/role`，请求体仅含 `{ role }`
#[derive(Debug, Clone, Serialize)]
pub struct UpdateUserRole {
    #[serde(skip)]
    pub id: String,
    pub role: Role,
}

impl Endpoint for UpdateUserRole {
    type Response = crate::ErrorResponse;
    const METHOD: Method = Method::Put;
    fn path(&self) -> String {
        format!("/api/users/{}/role", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteUser {
    #[serde(skip)]
    pub id: String,
}

impl Endpoint for DeleteUser {
    type Response = crate::ErrorResponse;
    const METHOD: Method = Method::Delete;
    fn path(&self) -> String {
        format!("/api/users/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct UpdateProfile(pub ProfilePayload);

impl Endpoint for UpdateProfile {
    type Response = crate::ErrorResponse;
    const METHOD: Method = Method::Put;
    fn path(&self) -> String {
        "/api/users/profile".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_omits_empty_filters() {
        let query = ListQuery::page(3);
        assert_eq!(
            query.params(),
            vec![("page", "3".to_string()), ("limit", "10".to_string())]
        );

        let query = ListQuery {
            page: 1,
            limit: 10,
            search: "rao".to_string(),
            status: "active".to_string(),
            source: String::new(),
        };
        let params = query.params();
        assert!(params.contains(&("search", "rao".to_string())));
        assert!(params.contains(&("status", "active".to_string())));
        assert!(!params.iter().any(|(key, _)| *key == "source"));
    }

    #[test]
    fn paths_carry_resource_ids() {
        let update = UpdateContact {
            id: "abc123".to_string(),
            payload: ContactPayload::default(),
        };
        assert_eq!(update.path(), "/api/contacts/abc123");
        assert_eq!(
            UpdateUserRole {
                id: "u1".to_string(),
                role: Role::Admin
            }
            .path(),
            "/api/users/u1/role"
        );
        assert_eq!(GetLeadAnalytics.path(), "/api/leads/analytics");
    }

    #[test]
    fn role_update_body_contains_only_role() {
        let body = serde_json::to_value(UpdateUserRole {
            id: "u1".to_string(),
            role: Role::Admin,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "role": "admin" }));
    }

    #[test]
    fn transparent_wrappers_serialize_as_payload() {
        let body = serde_json::to_value(CreateContact(ContactPayload {
            name: "Asha".to_string(),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(body["name"], "Asha");
        assert_eq!(body["address"]["country"], "India");
    }

    #[test]
    fn update_body_flattens_payload_without_id() {
        let body = serde_json::to_value(UpdateLead {
            id: "l9".to_string(),
            payload: LeadPayload {
                name: "Vikram".to_string(),
                ..Default::default()
            },
        })
        .unwrap();
        assert_eq!(body["name"], "Vikram");
        assert!(body.get("id").is_none());
        assert!(body.get("_id").is_none());
    }

    #[test]
    fn methods_with_bodies() {
        assert!(Method::Post.has_body());
        assert!(Method::Put.has_body());
        assert!(!Method::Get.has_body());
        assert!(!Method::Delete.has_body());
    }
}
