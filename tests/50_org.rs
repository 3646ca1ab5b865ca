mod common;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn departments_managers_projects_and_tree() -> Result<()> {
    let app = TestApp::spawn().await?;
    let admin = app.admin_token().await?;
    let lead = app.register("Ravi", "ravi@example.com", "9000000002").await?;
    let dev = app.register("Asha", "asha@example.com", "9000000001").await?;
    let ops = app.register("Kiran", "kiran@example.com", "9000000003").await?;
    let lead_id = app.employee_id(&lead).await?;
    let dev_id = app.employee_id(&dev).await?;
    let ops_id = app.employee_id(&ops).await?;

    let (status, dept) = app
        .post("/api/admin/create-department", &admin, json!({ "name": "Engineering", "description": "Product" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    let dept_id = dept["department_id"].as_str().context("department id")?.to_string();
    let (status, _) = app
        .post("/api/admin/create-department", &admin, json!({ "name": "engineering" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, finance) = app.post("/api/admin/create-department", &admin, json!({ "name": "Finance" })).await?;
    let finance_id = finance["department_id"].as_str().context("department id")?.to_string();

    for id in [&lead_id, &dev_id, &ops_id] {
        app.put(&format!("/api/admin/update-employee/{}", id), &admin, json!({ "department": dept_id }))
            .await?;
    }

    let (status, _) = app
        .post("/api/admin/create-manager", &admin, json!({ "employee_id": "ghost", "department_id": dept_id }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, manager) = app
        .post("/api/admin/create-manager", &admin, json!({ "employee_id": lead_id, "department_id": dept_id }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    let manager_id = manager["manager_id"].as_str().context("manager id")?.to_string();
    let (status, _) = app
        .post("/api/admin/create-manager", &admin, json!({ "employee_id": lead_id, "department_id": dept_id }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, assignments) = app.get("/api/admin/manager-assignments", &admin).await?;
    assert_eq!(assignments["total_managers"], 1);
    assert_eq!(assignments["departments_without_manager"][0]["name"], "Finance");

    let project = json!({
        "name": "Apollo",
        "description": "Launch",
        "department_id": dept_id,
        "manager_id": manager_id,
        "employee_ids": [dev_id],
        "start_date": "2025-03-01",
        "end_date": "2025-02-01",
    });
    let (status, _) = app.post("/api/admin/create-project", &admin, project.clone()).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_member = project.clone();
    bad_member["end_date"] = json!("2025-06-30");
    bad_member["employee_ids"] = json!(["ghost"]);
    let (status, _) = app.post("/api/admin/create-project", &admin, bad_member).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The manager must run the project's department
    let mut other_department = project.clone();
    other_department["end_date"] = json!("2025-06-30");
    other_department["department_id"] = json!(finance_id);
    let (status, res) = app.post("/api/admin/create-project", &admin, other_department).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["field_errors"]["manager_id"], "Manager does not belong to this department");

    let mut good = project;
    good["end_date"] = json!("2025-06-30");
    let (status, created) = app.post("/api/admin/create-project", &admin, good).await?;
    assert_eq!(status, StatusCode::OK, "{}", created);

    let (_, projects) = app.get("/api/admin/projects", &admin).await?;
    assert_eq!(projects[0]["manager_name"], "Ravi");
    assert_eq!(projects[0]["team_size"], 1);

    let (_, mine) = app.get("/api/employee/projects", &dev).await?;
    assert_eq!(mine[0]["role"], "member");
    assert_eq!(mine[0]["department_name"], "Engineering");
    let (_, managed) = app.get("/api/employee/projects", &lead).await?;
    assert_eq!(managed[0]["role"], "manager");
    let (_, none) = app.get("/api/employee/projects", &ops).await?;
    assert_eq!(none.as_array().map(Vec::len), Some(0));

    let (_, departments) = app.get("/api/admin/departments", &admin).await?;
    assert_eq!(departments[0]["name"], "Engineering");
    assert_eq!(departments[0]["employee_count"], 3);

    let (status, org) = app.get("/api/admin/organization-tree", &admin).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(org["summary"]["departments"], 2);
    assert_eq!(org["summary"]["employees"], 3);
    let engineering = &org["tree"][0];
    assert_eq!(engineering["type"], "department");
    assert_eq!(engineering["children"][0]["type"], "manager");
    assert_eq!(engineering["children"][0]["children"][0]["name"], "Apollo");
    assert_eq!(engineering["children"][0]["children"][0]["children"][0]["id"], dev_id.as_str());
    assert_eq!(engineering["children"][1]["id"], ops_id.as_str());

    // Deleting a member drops them from the project
    app.delete(&format!("/api/admin/delete-employee/{}", dev_id), &admin).await?;
    let (_, projects) = app.get("/api/admin/projects", &admin).await?;
    assert_eq!(projects[0]["team_size"], 0);
    Ok(())
}
