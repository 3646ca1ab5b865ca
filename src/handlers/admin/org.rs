// handlers/admin/org.rs - Departments, manager assignments, projects and the org tree

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::FindOptions;
use crate::error::{ApiError, ApiResult};
use crate::handlers::utils;
use crate::models::{new_id, Department, Employee, ManagerAssignment, Project};
use crate::services::org_tree::{self, OrgTree};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateManagerRequest {
    pub employee_id: String,
    pub department_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub department_id: String,
    pub manager_id: String,
    #[serde(default)]
    pub employee_ids: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
}

/// POST /api/admin/create-department
pub async fn create_department(
    State(state): State<AppState>,
    Json(req): Json<CreateDepartmentRequest>,
) -> ApiResult<Json<Value>> {
    let name = utils::required("name", &req.name)?;
    let departments = state.repo::<Department>();

    let wanted = name.to_lowercase();
    if departments.select_any(json!({})).await?.iter().any(|d| d.name.to_lowercase() == wanted) {
        return Err(ApiError::bad_request("Department with this name already exists"));
    }

    let department = Department {
        id: new_id(),
        name,
        description: req.description.trim().to_string(),
        created_at: state.now(),
    };
    departments.insert(&department).await?;

    tracing::info!("Created department {}", department.name);
    Ok(Json(json!({ "message": "Department created successfully", "department_id": department.id })))
}

/// GET /api/admin/departments - with head counts and manager names
pub async fn departments(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    let departments = state
        .repo::<Department>()
        .select_sorted(json!({}), FindOptions::default().asc("name"))
        .await?;
    let managers = state.repo::<ManagerAssignment>().select_any(json!({})).await?;
    let employees = state.repo::<Employee>();

    let mut rows = Vec::with_capacity(departments.len());
    for dept in departments {
        let employee_count = employees.count(json!({ "department_id": dept.id })).await?;
        let manager_names: Vec<&str> = managers
            .iter()
            .filter(|m| m.department_id == dept.id)
            .map(|m| m.employee_name.as_str())
            .collect();
        rows.push(json!({
            "id": dept.id,
            "name": dept.name,
            "description": dept.description,
            "created_at": dept.created_at,
            "employee_count": employee_count,
            "managers": manager_names,
        }));
    }
    Ok(Json(rows))
}

/// POST /api/admin/create-manager
pub async fn create_manager(
    State(state): State<AppState>,
    Json(req): Json<CreateManagerRequest>,
) -> ApiResult<Json<Value>> {
    let employee = state
        .repo::<Employee>()
        .select_one(json!({ "id": req.employee_id }))
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;
    let department = state
        .repo::<Department>()
        .select_one(json!({ "id": req.department_id }))
        .await?
        .ok_or_else(|| ApiError::not_found("Department not found"))?;

    let managers = state.repo::<ManagerAssignment>();
    let existing = managers
        .count(json!({ "employee_id": employee.id, "department_id": department.id }))
        .await?;
    if existing > 0 {
        return Err(ApiError::bad_request("Employee is already a manager of this department"));
    }

    let assignment = ManagerAssignment {
        id: new_id(),
        employee_id: employee.id,
        department_id: department.id,
        employee_name: employee.name,
        employee_email: employee.email,
        department_name: department.name,
        created_at: state.now(),
    };
    managers.insert(&assignment).await?;

    tracing::info!("Assigned {} as manager of {}", assignment.employee_email, assignment.department_name);
    Ok(Json(json!({ "message": "Manager assigned successfully", "manager_id": assignment.id })))
}

/// GET /api/admin/managers
pub async fn managers(State(state): State<AppState>) -> ApiResult<Json<Vec<ManagerAssignment>>> {
    let managers = state
        .repo::<ManagerAssignment>()
        .select_sorted(json!({}), FindOptions::default().asc("department_name").asc("employee_name"))
        .await?;
    Ok(Json(managers))
}

/// GET /api/admin/manager-assignments
pub async fn manager_assignments(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let managers = state
        .repo::<ManagerAssignment>()
        .select_sorted(json!({}), FindOptions::default().asc("department_name"))
        .await?;
    let departments = state
        .repo::<Department>()
        .select_sorted(json!({}), FindOptions::default().asc("name"))
        .await?;

    let without: Vec<Value> = departments
        .iter()
        .filter(|d| !managers.iter().any(|m| m.department_id == d.id))
        .map(|d| json!({ "id": d.id, "name": d.name }))
        .collect();

    Ok(Json(json!({
        "total_managers": managers.len(),
        "departments_without_manager": without,
        "managers": managers,
    })))
}

/// POST /api/admin/create-project
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<Value>> {
    let name = utils::required("name", &req.name)?;
    let start_date = utils::parse_optional_date("start_date", req.start_date.as_deref())?;
    let end_date = utils::parse_optional_date("end_date", req.end_date.as_deref())?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            return Err(ApiError::invalid_field("end_date", "End date cannot be before start date"));
        }
    }

    if state.repo::<Department>().count(json!({ "id": req.department_id })).await? == 0 {
        return Err(ApiError::not_found("Department not found"));
    }
    let manager = state
        .repo::<ManagerAssignment>()
        .select_one(json!({ "id": req.manager_id }))
        .await?
        .ok_or_else(|| ApiError::not_found("Manager not found"))?;
    if manager.department_id != req.department_id {
        return Err(ApiError::invalid_field("manager_id", "Manager does not belong to this department"));
    }

    let mut employee_ids: Vec<String> = Vec::with_capacity(req.employee_ids.len());
    for id in req.employee_ids {
        if employee_ids.contains(&id) {
            continue;
        }
        if state.repo::<Employee>().count(json!({ "id": id })).await? == 0 {
            return Err(ApiError::not_found(format!("Employee {} not found", id)));
        }
        employee_ids.push(id);
    }

    let project = Project {
        id: new_id(),
        name,
        description: req.description.trim().to_string(),
        department_id: req.department_id,
        manager_id: req.manager_id,
        employee_ids,
        start_date,
        end_date,
        status: utils::optional(req.status).unwrap_or_else(|| "active".to_string()),
        created_at: state.now(),
    };
    state.repo::<Project>().insert(&project).await?;

    tracing::info!("Created project {} with {} members", project.name, project.employee_ids.len());
    Ok(Json(json!({ "message": "Project created successfully", "project_id": project.id })))
}

/// GET /api/admin/projects
pub async fn projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    let projects = state
        .repo::<Project>()
        .select_sorted(json!({}), FindOptions::default().asc("name"))
        .await?;
    let managers = state.repo::<ManagerAssignment>().select_any(json!({})).await?;
    let departments = state.repo::<Department>().select_any(json!({})).await?;

    let mut rows = Vec::with_capacity(projects.len());
    for p in &projects {
        let manager = managers.iter().find(|m| m.id == p.manager_id);
        let department = departments.iter().find(|d| d.id == p.department_id);
        let mut row = serde_json::to_value(p)?;
        row["department_name"] = json!(department.map(|d| d.name.as_str()));
        row["manager_name"] = json!(manager.map(|m| m.employee_name.as_str()));
        row["team_size"] = json!(p.employee_ids.len());
        rows.push(row);
    }
    Ok(Json(rows))
}

/// GET /api/admin/organization-tree
pub async fn organization_tree(State(state): State<AppState>) -> ApiResult<Json<OrgTree>> {
    let departments = state
        .repo::<Department>()
        .select_sorted(json!({}), FindOptions::default().asc("name"))
        .await?;
    let managers = state
        .repo::<ManagerAssignment>()
        .select_sorted(json!({}), FindOptions::default().asc("employee_name"))
        .await?;
    let projects = state
        .repo::<Project>()
        .select_sorted(json!({}), FindOptions::default().asc("name"))
        .await?;
    let employees = state
        .repo::<Employee>()
        .select_sorted(json!({}), FindOptions::default().asc("name"))
        .await?;

    Ok(Json(org_tree::build_tree(&departments, &managers, &projects, &employees)))
}
