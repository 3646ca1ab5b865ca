// handlers/admin/employees.rs - Employee CRUD with cascading delete

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::database::FindOptions;
use crate::error::{ApiError, ApiResult};
use crate::handlers::utils;
use crate::middleware::CurrentAdmin;
use crate::models::{
    Break, Department, Employee, EmployeeProfile, EmployeeStatus, ItTicket, LeaveRequest, ManagerAssignment,
    Notification, Project, Timesheet, WorkSession,
};
use crate::state::AppState;

const DUPLICATE_EMPLOYEE: &str = "Employee with this email or phone already exists";

#[derive(Debug, Default, Deserialize)]
pub struct EmployeeFields {
    pub dob: Option<String>,
    pub blood_group: Option<String>,
    pub emergency_contact: Option<String>,
    pub address: Option<String>,
    pub aadhar_card: Option<String>,
    pub designation: Option<String>,
    /// Department id or name
    pub department: Option<String>,
    pub joining_date: Option<String>,
    pub release_date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    #[serde(flatten)]
    pub fields: EmployeeFields,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    #[serde(flatten)]
    pub fields: EmployeeFields,
}

/// Looks a department up by id, then by case-insensitive name
pub(crate) async fn resolve_department(state: &AppState, key: &str) -> ApiResult<Department> {
    let departments = state.repo::<Department>();
    if let Some(dept) = departments.select_one(json!({ "id": key })).await? {
        return Ok(dept);
    }
    let wanted = key.trim().to_lowercase();
    departments
        .select_any(json!({}))
        .await?
        .into_iter()
        .find(|d| d.name.to_lowercase() == wanted)
        .ok_or_else(|| ApiError::not_found("Department not found"))
}

/// Patch document for the optional profile fields that were supplied
async fn optional_fields(state: &AppState, fields: EmployeeFields) -> ApiResult<Map<String, Value>> {
    let mut set = Map::new();

    let dates: [(&str, Option<String>); 3] = [
        ("dob", fields.dob),
        ("joining_date", fields.joining_date),
        ("release_date", fields.release_date),
    ];
    for (name, raw) in dates {
        if let Some(raw) = raw {
            let date: Option<NaiveDate> = utils::parse_optional_date(name, Some(raw.as_str()))?;
            set.insert(name.into(), json!(date));
        }
    }

    let texts: [(&str, Option<String>); 5] = [
        ("blood_group", fields.blood_group),
        ("emergency_contact", fields.emergency_contact),
        ("address", fields.address),
        ("aadhar_card", fields.aadhar_card),
        ("designation", fields.designation),
    ];
    for (name, raw) in texts {
        if raw.is_some() {
            set.insert(name.into(), json!(utils::optional(raw)));
        }
    }

    if let Some(department) = fields.department {
        if department.trim().is_empty() {
            set.insert("department".into(), Value::Null);
            set.insert("department_id".into(), Value::Null);
        } else {
            let dept = resolve_department(state, &department).await?;
            set.insert("department".into(), json!(dept.name));
            set.insert("department_id".into(), json!(dept.id));
        }
    }

    if let Some(status) = fields.status {
        let status: EmployeeStatus = utils::parse_choice("status", &status)?;
        set.insert("status".into(), json!(status));
    }

    Ok(set)
}

async fn contact_taken(state: &AppState, email: Option<&str>, phone: Option<&str>, except: Option<&str>) -> ApiResult<bool> {
    let mut clauses = Vec::new();
    if let Some(email) = email {
        clauses.push(json!({ "email": email }));
    }
    if let Some(phone) = phone {
        clauses.push(json!({ "phone": phone }));
    }
    if clauses.is_empty() {
        return Ok(false);
    }
    let filter = match except {
        Some(id) => json!({ "$or": clauses, "id": { "$ne": id } }),
        None => json!({ "$or": clauses }),
    };
    Ok(state.repo::<Employee>().count(filter).await? > 0)
}

/// GET /api/admin/employees
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<EmployeeProfile>>> {
    let employees = state
        .repo::<Employee>()
        .select_sorted(json!({}), FindOptions::default().asc("name"))
        .await?;
    Ok(Json(employees.into_iter().map(EmployeeProfile::from).collect()))
}

/// POST /api/admin/create-employee
pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentAdmin(me)): Extension<CurrentAdmin>,
    Json(req): Json<CreateEmployeeRequest>,
) -> ApiResult<Json<Value>> {
    let name = utils::required("name", &req.name)?;
    let email = utils::normalize_email("email", &req.email)?;
    let phone = utils::required("phone", &req.phone)?;
    let password_hash = utils::hash_password(&req.password, state.config.security.bcrypt_cost)?;

    if contact_taken(&state, Some(&email), Some(&phone), None).await? {
        return Err(ApiError::bad_request(DUPLICATE_EMPLOYEE));
    }

    let extra = optional_fields(&state, req.fields).await?;
    let mut doc = serde_json::to_value(Employee::new(name, email, phone, password_hash, state.now()))?;
    if let Some(obj) = doc.as_object_mut() {
        obj.extend(extra);
    }
    let employee: Employee = serde_json::from_value(doc)?;

    state
        .repo::<Employee>()
        .insert(&employee)
        .await
        .map_err(utils::duplicate_as_bad_request(DUPLICATE_EMPLOYEE))?;

    tracing::info!("Admin {} created employee {} ({})", me.email, employee.id, employee.email);
    Ok(Json(json!({
        "message": "Employee created successfully",
        "employee_id": employee.id,
        "employee": EmployeeProfile::from(employee),
    })))
}

/// PUT /api/admin/update-employee/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> ApiResult<Json<EmployeeProfile>> {
    let employees = state.repo::<Employee>();
    let current = employees.select_404(&id).await?;

    let email = req.email.as_deref().map(|e| utils::normalize_email("email", e)).transpose()?;
    let phone = req.phone.as_deref().map(|p| utils::required("phone", p)).transpose()?;
    if contact_taken(&state, email.as_deref(), phone.as_deref(), Some(&id)).await? {
        return Err(ApiError::bad_request(DUPLICATE_EMPLOYEE));
    }

    let mut set = optional_fields(&state, req.fields).await?;
    if let Some(name) = &req.name {
        set.insert("name".into(), json!(utils::required("name", name)?));
    }
    if let Some(email) = &email {
        set.insert("email".into(), json!(email));
    }
    if let Some(phone) = &phone {
        set.insert("phone".into(), json!(phone));
    }
    if let Some(password) = &req.password {
        set.insert(
            "password_hash".into(),
            json!(utils::hash_password(password, state.config.security.bcrypt_cost)?),
        );
    }

    let updated = employees
        .update_by_id(&id, Value::Object(set))
        .await
        .map_err(utils::duplicate_as_bad_request(DUPLICATE_EMPLOYEE))?;

    // Manager assignments carry a copy of the name and email
    if updated.name != current.name || updated.email != current.email {
        state
            .repo::<ManagerAssignment>()
            .update(
                json!({ "employee_id": id }),
                json!({ "employee_name": updated.name, "employee_email": updated.email }),
            )
            .await?;
    }

    Ok(Json(updated.into()))
}

/// DELETE /api/admin/delete-employee/:id - removes the employee and everything they own
pub async fn delete(
    State(state): State<AppState>,
    Extension(CurrentAdmin(me)): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let employee = state.repo::<Employee>().select_404(&id).await?;

    let sessions = state.repo::<WorkSession>().select_any(json!({ "user_id": id })).await?;
    let session_ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();

    let breaks = state.repo::<Break>().delete(json!({ "session_id": { "$in": session_ids } })).await?;
    let timesheets = state
        .repo::<Timesheet>()
        .delete(json!({ "$or": [{ "user_id": id }, { "session_id": { "$in": session_ids } }] }))
        .await?;
    let sessions_deleted = state.repo::<WorkSession>().delete(json!({ "user_id": id })).await?;
    let leaves = state.repo::<LeaveRequest>().delete(json!({ "employee_id": id })).await?;
    // Pending requests routed to this employee fall back to the admins
    let unrouted = state
        .repo::<LeaveRequest>()
        .update(
            json!({ "manager_id": id, "status": "pending" }),
            json!({ "manager_id": null, "manager_name": null }),
        )
        .await?;
    let tickets = state.repo::<ItTicket>().delete(json!({ "employee_id": id })).await?;
    let notifications = state.repo::<Notification>().delete(json!({ "user_id": id })).await?;
    let assignments = state.repo::<ManagerAssignment>().delete(json!({ "employee_id": id })).await?;

    let projects = state.repo::<Project>();
    let memberships = projects.select_any(json!({ "employee_ids": { "$contains": id } })).await?;
    for project in &memberships {
        let remaining: Vec<&String> = project.employee_ids.iter().filter(|e| **e != id).collect();
        projects
            .update(json!({ "id": project.id }), json!({ "employee_ids": remaining }))
            .await?;
    }

    state.repo::<Employee>().delete_by_id(&id).await?;

    tracing::warn!("Admin {} deleted employee {} ({})", me.email, employee.id, employee.email);
    Ok(Json(json!({
        "message": "Employee deleted successfully",
        "deleted": {
            "sessions": sessions_deleted,
            "breaks": breaks,
            "timesheets": timesheets,
            "leave_requests": leaves,
            "unrouted_leave_requests": unrouted,
            "it_tickets": tickets,
            "notifications": notifications,
            "manager_assignments": assignments,
            "project_memberships": memberships.len(),
        },
    })))
}
