use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub generation: String,
    pub versions: Vec<Version>,
}

/// Stored the way the live API reports it: flat `template_id`, integer
/// `active`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Version {
    pub id: String,
    pub template_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_content: Option<String>,
    pub active: u8,
}

#[derive(Deserialize)]
pub struct CreateTemplate {
    pub name: String,
    pub generation: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTemplate {
    pub name: Option<String>,
}

/// Create and update share one payload shape; `name` is checked on create.
/// `active` accepts `true`/`false` or `1`/`0`.
#[derive(Deserialize)]
pub struct VersionInput {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub html_content: Option<String>,
    pub plain_content: Option<String>,
    pub active: Option<Value>,
}

#[derive(Serialize, Deserialize)]
pub struct TemplateList {
    pub templates: Vec<Template>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorItem {
    pub field: Option<String>,
    pub message: String,
}

type Failure = (StatusCode, Json<ErrorBody>);

fn failure(status: StatusCode, field: Option<&str>, message: &str) -> Failure {
    (
        status,
        Json(ErrorBody {
            errors: vec![ErrorItem {
                field: field.map(str::to_string),
                message: message.to_string(),
            }],
        }),
    )
}

fn template_not_found() -> Failure {
    failure(StatusCode::NOT_FOUND, None, "template not found")
}

fn version_not_found() -> Failure {
    failure(StatusCode::NOT_FOUND, None, "template version not found")
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    }
}

pub type Db = Arc<RwLock<HashMap<String, Template>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/v3/templates", get(list_templates).post(create_template))
        .route(
            "/v3/templates/{template_id}",
            get(get_template).patch(update_template).delete(delete_template),
        )
        .route("/v3/templates/{template_id}/versions", post(create_version))
        .route(
            "/v3/templates/{template_id}/versions/{version_id}",
            get(get_version).patch(update_version).delete(delete_version),
        )
        .route(
            "/v3/templates/{template_id}/versions/{version_id}/activate",
            post(activate_version),
        )
        .route_layer(middleware::from_fn(require_bearer))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Any non-empty bearer token is accepted.
async fn require_bearer(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty());
    if !authorized {
        return failure(
            StatusCode::UNAUTHORIZED,
            None,
            "authorization required",
        )
        .into_response();
    }
    next.run(request).await
}

// --- templates ---

async fn list_templates(State(db): State<Db>) -> Json<TemplateList> {
    let templates = db.read().await;
    Json(TemplateList {
        templates: templates.values().cloned().collect(),
    })
}

async fn create_template(
    State(db): State<Db>,
    Json(input): Json<CreateTemplate>,
) -> Result<(StatusCode, Json<Template>), Failure> {
    if input.name.trim().is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, Some("name"), "name is required"));
    }
    let template = Template {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        generation: input.generation.unwrap_or_else(|| "legacy".to_string()),
        versions: Vec::new(),
    };
    db.write().await.insert(template.id.clone(), template.clone());
    Ok((StatusCode::CREATED, Json(template)))
}

async fn get_template(
    State(db): State<Db>,
    Path(template_id): Path<String>,
) -> Result<Json<Template>, Failure> {
    let templates = db.read().await;
    templates
        .get(&template_id)
        .cloned()
        .map(Json)
        .ok_or_else(template_not_found)
}

async fn update_template(
    State(db): State<Db>,
    Path(template_id): Path<String>,
    Json(input): Json<UpdateTemplate>,
) -> Result<Json<Template>, Failure> {
    let mut templates = db.write().await;
    let template = templates.get_mut(&template_id).ok_or_else(template_not_found)?;
    if let Some(name) = input.name {
        template.name = name;
    }
    Ok(Json(template.clone()))
}

async fn delete_template(
    State(db): State<Db>,
    Path(template_id): Path<String>,
) -> Result<StatusCode, Failure> {
    let mut templates = db.write().await;
    templates
        .remove(&template_id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(template_not_found)
}

// --- versions ---

/// Marks `version_id` active and every sibling inactive.
fn activate(template: &mut Template, version_id: &str) {
    for version in &mut template.versions {
        version.active = u8::from(version.id == version_id);
    }
}

async fn create_version(
    State(db): State<Db>,
    Path(template_id): Path<String>,
    Json(input): Json<VersionInput>,
) -> Result<(StatusCode, Json<Version>), Failure> {
    let mut templates = db.write().await;
    let template = templates.get_mut(&template_id).ok_or_else(template_not_found)?;
    let name = match input.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(failure(StatusCode::BAD_REQUEST, Some("name"), "name is required")),
    };
    let version = Version {
        id: Uuid::new_v4().to_string(),
        template_id: template_id.clone(),
        name,
        subject: input.subject,
        html_content: input.html_content,
        plain_content: input.plain_content,
        active: 0,
    };
    let id = version.id.clone();
    template.versions.push(version);
    if input.active.as_ref().is_some_and(is_truthy) {
        activate(template, &id);
    }
    let created = template
        .versions
        .iter()
        .find(|v| v.id == id)
        .cloned()
        .ok_or_else(version_not_found)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_version(
    State(db): State<Db>,
    Path((template_id, version_id)): Path<(String, String)>,
) -> Result<Json<Version>, Failure> {
    let templates = db.read().await;
    let template = templates.get(&template_id).ok_or_else(template_not_found)?;
    template
        .versions
        .iter()
        .find(|v| v.id == version_id)
        .cloned()
        .map(Json)
        .ok_or_else(version_not_found)
}

async fn update_version(
    State(db): State<Db>,
    Path((template_id, version_id)): Path<(String, String)>,
    Json(input): Json<VersionInput>,
) -> Result<Json<Version>, Failure> {
    let mut templates = db.write().await;
    let template = templates.get_mut(&template_id).ok_or_else(template_not_found)?;
    let version = template
        .versions
        .iter_mut()
        .find(|v| v.id == version_id)
        .ok_or_else(version_not_found)?;
    if let Some(name) = input.name {
        version.name = name;
    }
    if input.subject.is_some() {
        version.subject = input.subject;
    }
    if input.html_content.is_some() {
        version.html_content = input.html_content;
    }
    if input.plain_content.is_some() {
        version.plain_content = input.plain_content;
    }
    match input.active.as_ref().map(is_truthy) {
        Some(true) => activate(template, &version_id),
        Some(false) => version.active = 0,
        None => {}
    }
    template
        .versions
        .iter()
        .find(|v| v.id == version_id)
        .cloned()
        .map(Json)
        .ok_or_else(version_not_found)
}

async fn delete_version(
    State(db): State<Db>,
    Path((template_id, version_id)): Path<(String, String)>,
) -> Result<StatusCode, Failure> {
    let mut templates = db.write().await;
    let template = templates.get_mut(&template_id).ok_or_else(template_not_found)?;
    let before = template.versions.len();
    template.versions.retain(|v| v.id != version_id);
    if template.versions.len() == before {
        return Err(version_not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn activate_version(
    State(db): State<Db>,
    Path((template_id, version_id)): Path<(String, String)>,
) -> Result<Json<Version>, Failure> {
    let mut templates = db.write().await;
    let template = templates.get_mut(&template_id).ok_or_else(template_not_found)?;
    if !template.versions.iter().any(|v| v.id == version_id) {
        return Err(version_not_found());
    }
    activate(template, &version_id);
    template
        .versions
        .iter()
        .find(|v| v.id == version_id)
        .cloned()
        .map(Json)
        .ok_or_else(version_not_found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_with(ids: &[&str]) -> Template {
        Template {
            id: "t1".to_string(),
            name: "welcome".to_string(),
            generation: "legacy".to_string(),
            versions: ids
                .iter()
                .map(|id| Version {
                    id: id.to_string(),
                    template_id: "t1".to_string(),
                    name: id.to_string(),
                    subject: None,
                    html_content: None,
                    plain_content: None,
                    active: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn activate_leaves_exactly_one_active() {
        let mut template = template_with(&["a", "b", "c"]);
        activate(&mut template, "a");
        activate(&mut template, "c");
        let active: Vec<_> = template
            .versions
            .iter()
            .filter(|v| v.active == 1)
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(active, vec!["c"]);
    }

    #[test]
    fn version_serializes_flat_template_id_and_int_active() {
        let mut template = template_with(&["a"]);
        activate(&mut template, "a");
        let json = serde_json::to_value(&template.versions[0]).unwrap();
        assert_eq!(json["template_id"], "t1");
        assert_eq!(json["active"], 1);
        assert!(json.get("subject").is_none());
    }

    #[test]
    fn truthy_accepts_bool_and_int() {
        assert!(is_truthy(&serde_json::json!(true)));
        assert!(is_truthy(&serde_json::json!(1)));
        assert!(!is_truthy(&serde_json::json!(0)));
        assert!(!is_truthy(&serde_json::json!("1")));
    }

    #[test]
    fn create_template_rejects_missing_name() {
        let result: Result<CreateTemplate, _> = serde_json::from_str(r#"{"generation":"dynamic"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_template_all_fields_optional() {
        let input: UpdateTemplate = serde_json::from_str("{}").unwrap();
        assert!(input.name.is_none());
    }

    #[test]
    fn version_input_ignores_nested_template_reference() {
        let input: VersionInput =
            serde_json::from_str(r#"{"template":{"id":"t1"},"name":"v1","active":true}"#).unwrap();
        assert_eq!(input.name.as_deref(), Some("v1"));
        assert!(input.active.as_ref().is_some_and(is_truthy));
    }
}
