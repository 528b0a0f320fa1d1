// ==========================================
// 护理实习管理系统 - 导入后端客户端
// ==========================================
// 职责: 调用远端 /users/import 与 /users/import/undo
// 策略: 不重试，错误原样上抛；超时由配置决定
// ==========================================

use crate::api::dto::{ImportRequest, ImportResponse, UndoResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::RowRecord;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const IMPORT_PATH: &str = "/users/import";
pub const UNDO_IMPORT_PATH: &str = "/users/import/undo";

// ==========================================
// ImportGateway Trait
// ==========================================
// 用途: 远端导入接口抽象（测试中可替换为内存实现）
// 实现者: HttpImportGateway
#[async_trait]
pub trait ImportGateway: Send + Sync {
    /// 提交用户列表，返回后端跳过的记录
    async fn import_users(&self, access_token: &str, users: &[RowRecord])
        -> ApiResult<ImportResponse>;

    /// 撤销最近一次导入（语义由后端决定）
    async fn undo_last_import(&self, access_token: &str) -> ApiResult<UndoResponse>;
}

// ==========================================
// HttpImportGateway - 基于 reqwest 的实现
// ==========================================
pub struct HttpImportGateway {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpImportGateway {
    /// 创建客户端
    ///
    /// # 参数
    /// - base_url: 后端根地址（如 http://localhost:3000）
    /// - timeout: 单次请求超时；None 表示不设超时
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ApiResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidEndpoint("后端地址为空".to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 读取响应体；非 2xx 时转换为 ApiError
    async fn read_body(response: reqwest::Response) -> ApiResult<String> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            warn!(status = status.as_u16(), "后端返回错误状态");
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }
}

#[async_trait]
impl ImportGateway for HttpImportGateway {
    #[instrument(skip(self, access_token, users), fields(sent = users.len()))]
    async fn import_users(
        &self,
        access_token: &str,
        users: &[RowRecord],
    ) -> ApiResult<ImportResponse> {
        let url = self.endpoint(IMPORT_PATH);
        debug!(url = %url, "提交导入请求");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(&ImportRequest { users })
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        if body.trim().is_empty() {
            return Ok(ImportResponse::default());
        }
        Ok(serde_json::from_str(&body)?)
    }

    #[instrument(skip(self, access_token))]
    async fn undo_last_import(&self, access_token: &str) -> ApiResult<UndoResponse> {
        let url = self.endpoint(UNDO_IMPORT_PATH);
        debug!(url = %url, "提交撤销导入请求");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        // 撤销接口的响应体不作约定，解析失败时按空响应处理
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}
