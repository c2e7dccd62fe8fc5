//! Academic API REST client
//!
//! HTTP client for the school-management backend. Every call is a single
//! request: there is no retry or backoff, a failure is reported to the
//! caller and the user re-triggers the action.

use super::dto::{BulkAttendanceSave, BulkGradeSave, WorkingDaysUpdate};
use super::error::{ClientError, ClientResult};
use super::resources::{
    Resource, ATTENDANCE_BULK_PATH, ATTENDANCE_PATH, GRADES_BULK_PATH, GRADES_PATH,
    WORKING_DAYS_PATH,
};
use super::AcademicApi;
use crate::grading::{parse_working_days, GradeKey};
use crate::normalize::{extract_list, unwrap_record};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

/// Configuration for the academic API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the API prefix (e.g., "http://localhost:3000/api")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Optional bearer token
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            request_timeout_ms: 15_000,
            token: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// REST client for the academic records API
pub struct AcademicClient {
    client: Client,
    config: ClientConfig,
    base_url: String,
}

impl AcademicClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidInput(format!(
                "base URL must start with http:// or https://: {}",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for a path under the API base
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn record_url(&self, resource: Resource, id: &str) -> ClientResult<String> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ClientError::InvalidInput(format!(
                "empty id for {}",
                resource
            )));
        }
        Ok(self.url(&format!("{}/{}", resource.path(), urlencoding::encode(id))))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(method = %method, url = %url, request_id = %request_id, "Sending request");

        let builder = self
            .client
            .request(method, url)
            .header("X-Request-Id", request_id);

        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and read the body as JSON.
    ///
    /// Empty bodies (e.g. `204 No Content`) read as `null`.
    async fn send(&self, builder: RequestBuilder) -> ClientResult<Value> {
        let response = builder.send().await.map_err(ClientError::from_transport)?;
        let status = response.status();
        let text = response.text().await.map_err(ClientError::from_transport)?;

        if !status.is_success() {
            let message = error_message(&text);
            tracing::warn!(status = status.as_u16(), message = %message, "Academic API error");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn get_json(&self, url: &str) -> ClientResult<Value> {
        self.send(self.request(Method::GET, url)).await
    }

    async fn get_query<Q: Serialize + ?Sized + Sync>(&self, url: &str, query: &Q) -> ClientResult<Value> {
        self.send(self.request(Method::GET, url).query(query)).await
    }

    async fn send_json<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> ClientResult<Value> {
        self.send(self.request(method, url).json(body)).await
    }
}

#[async_trait]
impl AcademicApi for AcademicClient {
    async fn list(&self, resource: Resource) -> ClientResult<Vec<Value>> {
        let body = self.get_json(&self.url(resource.path())).await?;
        let items = extract_list(&body, &[resource.list_field()]).to_vec();
        tracing::debug!(resource = %resource, count = items.len(), "Listed records");
        Ok(items)
    }

    async fn get(&self, resource: Resource, id: &str) -> ClientResult<Value> {
        let body = self.get_json(&self.record_url(resource, id)?).await?;
        Ok(unwrap_record(&body).clone())
    }

    async fn create(&self, resource: Resource, body: &Value) -> ClientResult<Value> {
        let created = self
            .send_json(Method::POST, &self.url(resource.path()), body)
            .await?;
        Ok(unwrap_record(&created).clone())
    }

    async fn update(&self, resource: Resource, id: &str, body: &Value) -> ClientResult<Value> {
        let url = self.record_url(resource, id)?;
        let updated = self.send_json(Method::PUT, &url, body).await?;
        Ok(unwrap_record(&updated).clone())
    }

    async fn delete(&self, resource: Resource, id: &str) -> ClientResult<()> {
        let url = self.record_url(resource, id)?;
        self.send(self.request(Method::DELETE, &url)).await?;
        Ok(())
    }

    async fn students_by_ids(&self, ids: &[String]) -> ClientResult<Vec<Value>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.url(Resource::Students.path());
        let body = self.get_query(&url, &[("ids", ids.join(","))]).await?;
        Ok(extract_list(&body, &[Resource::Students.list_field()]).to_vec())
    }

    async fn enrollments_for(&self, course_id: &str, year_id: Option<&str>) -> ClientResult<Vec<Value>> {
        let url = self.url(Resource::Enrollments.path());
        let mut query = vec![("cursoId", course_id.to_string())];
        if let Some(year) = year_id {
            query.push(("anioLectivoId", year.to_string()));
        }
        let body = self.get_query(&url, &query).await?;
        Ok(extract_list(&body, &[Resource::Enrollments.list_field()]).to_vec())
    }

    async fn grades(&self, key: &GradeKey) -> ClientResult<Vec<Value>> {
        let body = self.get_query(&self.url(GRADES_PATH), key).await?;
        Ok(extract_list(&body, &["calificaciones"]).to_vec())
    }

    async fn save_grades(&self, body: &BulkGradeSave) -> ClientResult<Value> {
        tracing::info!(
            curso = %body.key.curso_id,
            materia = %body.key.materia_id,
            trimestre = %body.key.trimestre,
            count = body.calificaciones.len(),
            "Saving grades"
        );
        self.send_json(Method::POST, &self.url(GRADES_BULK_PATH), body)
            .await
    }

    async fn attendance(&self, key: &GradeKey) -> ClientResult<Vec<Value>> {
        let body = self.get_query(&self.url(ATTENDANCE_PATH), key).await?;
        Ok(extract_list(&body, &["asistencias", "registros"]).to_vec())
    }

    async fn save_attendance(&self, body: &BulkAttendanceSave) -> ClientResult<Value> {
        tracing::info!(
            curso = %body.key.curso_id,
            trimestre = %body.key.trimestre,
            count = body.registros.len(),
            "Saving attendance"
        );
        self.send_json(Method::POST, &self.url(ATTENDANCE_BULK_PATH), body)
            .await
    }

    async fn working_days(&self, key: &GradeKey) -> ClientResult<Option<u32>> {
        match self.get_query(&self.url(WORKING_DAYS_PATH), key).await {
            Ok(body) => Ok(parse_working_days(&body)),
            // Not configured yet for this context
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set_working_days(&self, body: &WorkingDaysUpdate) -> ClientResult<()> {
        self.send_json(Method::PUT, &self.url(WORKING_DAYS_PATH), body)
            .await?;
        Ok(())
    }
}

/// Pull a readable message out of an error body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => ["message", "msg", "error"]
            .iter()
            .find_map(|field| match json.get(*field) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Object(inner)) => inner
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .unwrap_or_else(|| body.trim().to_string()),
        Err(_) => body.trim().to_string(),
    }
}
