// handlers/employee/projects.rs - GET /api/employee/projects

use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::database::FindOptions;
use crate::error::ApiResult;
use crate::middleware::CurrentEmployee;
use crate::models::{Department, ManagerAssignment, Project};
use crate::state::AppState;

/// Projects the caller works on or manages
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentEmployee(me)): Extension<CurrentEmployee>,
) -> ApiResult<Json<Vec<Value>>> {
    let assignments = state
        .repo::<ManagerAssignment>()
        .select_any(json!({ "employee_id": me.id }))
        .await?;
    let assignment_ids: Vec<&str> = assignments.iter().map(|a| a.id.as_str()).collect();

    let projects = state
        .repo::<Project>()
        .select_sorted(
            json!({ "$or": [
                { "employee_ids": { "$contains": me.id } },
                { "manager_id": { "$in": assignment_ids } },
            ] }),
            FindOptions::default().asc("name"),
        )
        .await?;

    let managers = state.repo::<ManagerAssignment>().select_any(json!({})).await?;
    let departments = state.repo::<Department>().select_any(json!({})).await?;
    let rows = projects
        .into_iter()
        .map(|p| {
            let manager = managers.iter().find(|m| m.id == p.manager_id);
            let department = departments.iter().find(|d| d.id == p.department_id);
            let role = if assignment_ids.contains(&p.manager_id.as_str()) { "manager" } else { "member" };
            json!({
                "id": p.id,
                "name": p.name,
                "description": p.description,
                "department_id": p.department_id,
                "department_name": department.map(|d| d.name.clone()),
                "manager_id": p.manager_id,
                "manager_name": manager.map(|m| m.employee_name.clone()),
                "team_size": p.employee_ids.len(),
                "start_date": p.start_date,
                "end_date": p.end_date,
                "status": p.status,
                "role": role,
            })
        })
        .collect();
    Ok(Json(rows))
}
