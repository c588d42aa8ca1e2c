//! GLP-1 treatment plan endpoint.
//!
//! The source this replaces registered two handlers at this path; only one
//! was reachable. This keeps the survivor's contract: the model produces an
//! HTML plan and the response is `{"planHtml": "..."}`.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::openai::ChatMessage;
use crate::state::AppState;

/// Request body for POST `/api/glp1/plan`.
///
/// Profile fields are free-form; only `goals` is required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub current_weight: Option<f64>,
    #[serde(default)]
    pub goal_weight: Option<f64>,
    #[serde(default)]
    pub medication: Option<String>,
    #[serde(default)]
    pub goals: Option<String>,
}

/// Response for POST `/api/glp1/plan`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub plan_html: String,
}

const SYSTEM_PROMPT: &str = "You are a GLP-1 program assistant for an \
e-commerce wellness store. Given a customer profile, produce a personalized \
weekly plan as a self-contained HTML fragment (headings, lists, short \
paragraphs). Respond with HTML only, no Markdown and no surrounding prose. \
Always include a disclaimer that the plan is not medical advice.";

/// POST `/api/glp1/plan`
#[instrument(skip(state, request))]
pub async fn generate_plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    let openai = state.openai().ok_or_else(|| {
        AppError::BadRequest("OpenAI credentials not configured (OPENAI_API_KEY)".to_string())
    })?;

    let goals = request
        .goals
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .ok_or_else(|| AppError::BadRequest("goals is required".to_string()))?;

    let plan_html = openai
        .chat(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_profile_prompt(&request, goals)),
        ])
        .await?;

    Ok(Json(PlanResponse {
        plan_html: plan_html.trim().to_string(),
    }))
}

/// Render the profile fields into the user prompt, skipping absent ones.
fn build_profile_prompt(request: &PlanRequest, goals: &str) -> String {
    let mut prompt = String::from("Customer profile:\n");

    if let Some(name) = request.name.as_deref().filter(|n| !n.trim().is_empty()) {
        prompt.push_str(&format!("Name: {name}\n"));
    }
    if let Some(age) = request.age {
        prompt.push_str(&format!("Age: {age}\n"));
    }
    if let Some(weight) = request.current_weight {
        prompt.push_str(&format!("Current weight: {weight} lbs\n"));
    }
    if let Some(goal_weight) = request.goal_weight {
        prompt.push_str(&format!("Goal weight: {goal_weight} lbs\n"));
    }
    if let Some(medication) = request
        .medication
        .as_deref()
        .filter(|m| !m.trim().is_empty())
    {
        prompt.push_str(&format!("Medication: {medication}\n"));
    }
    prompt.push_str(&format!("Goals: {goals}\n"));

    prompt
}
