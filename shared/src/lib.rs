//! NexCRM 共享类型库
//!
//! 定义前端与 CRM 后端之间的线上数据模型（wire model）。
//! 字段命名遵循后端的 JSON 约定：驼峰命名、`_id` 主键、
//! 枚举值为 snake_case 字符串。

use serde::{Deserialize, Serialize};

pub mod date;
pub mod format;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 认证头名称
pub const HEADER_AUTH: &str = "Authorization";
/// Bearer 前缀
pub const BEARER_PREFIX: &str = "Bearer ";
/// 列表接口默认分页大小
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

// =========================================================
// 用户与会话 (Users & Session)
// =========================================================

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::User];

    /// 线上取值（与后端一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// 界面展示名
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }

    pub fn from_value(value: &str) -> Role {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// 当前登录用户档案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// 登录/注册成功响应：`{ token, user }`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// whoami 响应：`{ user }`
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: UserProfile,
}

/// 后端错误响应体：`{ message }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: String,
}

// =========================================================
// 联系人 (Contacts)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
    /// 原产品的默认国别
    #[serde(default = "default_country")]
    pub country: String,
}

impl Default for Address {
    fn default() -> Self {
        Address {
            street: String::new(),
            city: String::new(),
            state: String::new(),
            pincode: String::new(),
            country: default_country(),
        }
    }
}

fn default_country() -> String {
    "India".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    #[default]
    Active,
    Inactive,
    Prospect,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 3] = [
        ContactStatus::Active,
        ContactStatus::Inactive,
        ContactStatus::Prospect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::Active => "active",
            ContactStatus::Inactive => "inactive",
            ContactStatus::Prospect => "prospect",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContactStatus::Active => "Active",
            ContactStatus::Inactive => "Inactive",
            ContactStatus::Prospect => "Prospect",
        }
    }

    pub fn from_value(value: &str) -> ContactStatus {
        match value {
            "inactive" => ContactStatus::Inactive,
            "prospect" => ContactStatus::Prospect,
            _ => ContactStatus::Active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub status: ContactStatus,
    #[serde(default)]
    pub notes: String,
}

/// 新建/更新联系人的请求体（无 `_id`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub status: ContactStatus,
    #[serde(default)]
    pub notes: String,
}

impl Default for ContactPayload {
    fn default() -> Self {
        ContactPayload {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            position: String::new(),
            address: Address::default(),
            status: ContactStatus::Active,
            notes: String::new(),
        }
    }
}

impl From<&Contact> for ContactPayload {
    fn from(contact: &Contact) -> Self {
        ContactPayload {
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            company: contact.company.clone(),
            position: contact.position.clone(),
            address: contact.address.clone(),
            status: contact.status,
            notes: contact.notes.clone(),
        }
    }
}

/// `GET /api/contacts` 响应
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListResponse {
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default = "one")]
    pub total_pages: u32,
    #[serde(default)]
    pub total: u64,
}

// =========================================================
// 销售线索 (Leads)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    #[default]
    Website,
    Referral,
    SocialMedia,
    Advertisement,
    ColdCall,
    Other,
}

impl LeadSource {
    pub const ALL: [LeadSource; 6] = [
        LeadSource::Website,
        LeadSource::Referral,
        LeadSource::SocialMedia,
        LeadSource::Advertisement,
        LeadSource::ColdCall,
        LeadSource::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Website => "website",
            LeadSource::Referral => "referral",
            LeadSource::SocialMedia => "social_media",
            LeadSource::Advertisement => "advertisement",
            LeadSource::ColdCall => "cold_call",
            LeadSource::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadSource::Website => "Website",
            LeadSource::Referral => "Referral",
            LeadSource::SocialMedia => "Social Media",
            LeadSource::Advertisement => "Advertisement",
            LeadSource::ColdCall => "Cold Call",
            LeadSource::Other => "Other",
        }
    }

    pub fn from_value(value: &str) -> LeadSource {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == value)
            .unwrap_or(LeadSource::Other)
    }
}

/// 销售管道阶段，按推进顺序排列：
/// new → contacted → qualified → proposal → negotiation → closed_won | closed_lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 7] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Proposal,
        LeadStatus::Negotiation,
        LeadStatus::ClosedWon,
        LeadStatus::ClosedLost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Proposal => "proposal",
            LeadStatus::Negotiation => "negotiation",
            LeadStatus::ClosedWon => "closed_won",
            LeadStatus::ClosedLost => "closed_lost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Proposal => "Proposal",
            LeadStatus::Negotiation => "Negotiation",
            LeadStatus::ClosedWon => "Closed Won",
            LeadStatus::ClosedLost => "Closed Lost",
        }
    }

    pub fn from_value(value: &str) -> LeadStatus {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .unwrap_or(LeadStatus::New)
    }

    /// 管道是否已终结（赢单或丢单）
    pub fn is_closed(&self) -> bool {
        matches!(self, LeadStatus::ClosedWon | LeadStatus::ClosedLost)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub source: LeadSource,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub value: f64,
    /// 成单概率，0–100
    #[serde(default)]
    pub probability: u8,
    /// ISO 日期时间串，界面仅取日期部分
    #[serde(default)]
    pub expected_close_date: Option<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub source: LeadSource,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub probability: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_close_date: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl Default for LeadPayload {
    fn default() -> Self {
        LeadPayload {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            source: LeadSource::Website,
            status: LeadStatus::New,
            value: 0.0,
            probability: 10,
            expected_close_date: None,
            notes: String::new(),
        }
    }
}

impl From<&Lead> for LeadPayload {
    fn from(lead: &Lead) -> Self {
        LeadPayload {
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            company: lead.company.clone(),
            source: lead.source,
            status: lead.status,
            value: lead.value,
            probability: lead.probability,
            // 表单只保留日期部分
            expected_close_date: lead
                .expected_close_date
                .as_deref()
                .map(|raw| date::date_input_value(raw).to_string()),
            notes: lead.notes.clone(),
        }
    }
}

/// `GET /api/leads` 响应
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadListResponse {
    #[serde(default)]
    pub leads: Vec<Lead>,
    #[serde(default = "one")]
    pub total_pages: u32,
    #[serde(default)]
    pub total: u64,
}

// =========================================================
// 用户管理 (User admin)
// =========================================================

/// `GET /api/users` 响应
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default = "one")]
    pub total_pages: u32,
    #[serde(default)]
    pub total: u64,
}

/// `PUT /api/users/profile` 请求体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePayload {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub department: String,
}

// =========================================================
// 线索分析 (Lead analytics)
// =========================================================

/// `GET /api/leads/analytics` 中的分布桶：`{ _id, count }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DistributionBucket {
    #[serde(rename = "_id")]
    pub key: String,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadAnalytics {
    #[serde(default)]
    pub total_leads: u32,
    #[serde(default)]
    pub won_leads: u32,
    #[serde(default)]
    pub lost_leads: u32,
    #[serde(default)]
    pub conversion_rate: f64,
    #[serde(default)]
    pub total_value: f64,
    #[serde(default)]
    pub won_value: f64,
    #[serde(default)]
    pub status_distribution: Vec<DistributionBucket>,
    #[serde(default)]
    pub source_distribution: Vec<DistributionBucket>,
}

fn one() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================
    // 线上格式测试
    // =========================================================

    #[test]
    fn contact_deserializes_mongo_wire_shape() {
        let json = r#"{
            "_id": "66b2",
            "name": "Asha Rao",
            "email": "asha@example.com",
            "phone": "+91 98765 43210",
            "company": "Meridian",
            "address": { "city": "Pune", "state": "MH" },
            "status": "prospect"
        }"#;
        let contact: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.id, "66b2");
        assert_eq!(contact.status, ContactStatus::Prospect);
        assert_eq!(contact.address.city, "Pune");
        // 未给出的字段落默认值
        assert_eq!(contact.position, "");
        assert_eq!(contact.address.country, "India");
    }

    #[test]
    fn lead_uses_camel_case_and_snake_case_enums() {
        let json = r#"{
            "_id": "1",
            "name": "Vikram",
            "email": "v@x.in",
            "phone": "9",
            "source": "cold_call",
            "status": "closed_won",
            "value": 250000.0,
            "probability": 90,
            "expectedCloseDate": "2026-09-01T00:00:00.000Z"
        }"#;
        let lead: Lead = serde_json::from_str(json).unwrap();
        assert_eq!(lead.source, LeadSource::ColdCall);
        assert_eq!(lead.status, LeadStatus::ClosedWon);
        assert!(lead.status.is_closed());
        assert_eq!(
            lead.expected_close_date.as_deref(),
            Some("2026-09-01T00:00:00.000Z")
        );

        let payload = LeadPayload::from(&lead);
        assert_eq!(payload.expected_close_date.as_deref(), Some("2026-09-01"));
        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["expectedCloseDate"], "2026-09-01");
        assert_eq!(body["source"], "cold_call");
    }

    #[test]
    fn lead_payload_omits_missing_close_date() {
        let body = serde_json::to_value(LeadPayload::default()).unwrap();
        assert!(body.get("expectedCloseDate").is_none());
        assert_eq!(body["status"], "new");
        assert_eq!(body["probability"], 10);
    }

    #[test]
    fn role_round_trip() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
            assert_eq!(Role::from_value(role.as_str()), role);
        }
        // 未知角色回落为普通用户
        assert_eq!(Role::from_value("owner"), Role::User);
    }

    #[test]
    fn list_response_defaults_are_safe() {
        let resp: ContactListResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.contacts.is_empty());
        assert_eq!(resp.total_pages, 1);
        assert_eq!(resp.total, 0);
    }

    #[test]
    fn pipeline_order_is_stable() {
        let stages: Vec<&str> = LeadStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            stages,
            [
                "new",
                "contacted",
                "qualified",
                "proposal",
                "negotiation",
                "closed_won",
                "closed_lost"
            ]
        );
        assert_eq!(LeadStatus::from_value("negotiation"), LeadStatus::Negotiation);
        assert_eq!(LeadStatus::from_value("bogus"), LeadStatus::New);
    }

    #[test]
    fn analytics_distribution_buckets() {
        let json = r#"{
            "totalLeads": 12,
            "wonLeads": 3,
            "lostLeads": 2,
            "conversionRate": 25.0,
            "totalValue": 900000.0,
            "wonValue": 300000.0,
            "statusDistribution": [{ "_id": "new", "count": 5 }],
            "sourceDistribution": [{ "_id": "website", "count": 7 }]
        }"#;
        let analytics: LeadAnalytics = serde_json::from_str(json).unwrap();
        assert_eq!(analytics.total_leads, 12);
        assert_eq!(analytics.status_distribution[0].key, "new");
        assert_eq!(analytics.source_distribution[0].count, 7);
    }
}
