use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Department, Employee, ManagerAssignment, Project};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Department,
    Manager,
    Project,
    Employee,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrgNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub children: Vec<OrgNode>,
}

impl OrgNode {
    fn new(id: &str, name: &str, node_type: NodeType) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            node_type,
            email: None,
            description: None,
            designation: None,
            status: None,
            start_date: None,
            end_date: None,
            children: Vec::new(),
        }
    }

    fn employee(e: &Employee) -> Self {
        Self {
            email: Some(e.email.clone()),
            designation: e.designation.clone(),
            status: Some(e.status.to_string()),
            ..Self::new(&e.id, &e.name, NodeType::Employee)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrgSummary {
    pub departments: usize,
    pub managers: usize,
    pub projects: usize,
    pub employees: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrgTree {
    pub tree: Vec<OrgNode>,
    pub summary: OrgSummary,
}

/// Department → manager → project → member hierarchy.
///
/// Department employees outside every project of that department hang
/// directly off the department node.
pub fn build_tree(
    departments: &[Department],
    managers: &[ManagerAssignment],
    projects: &[Project],
    employees: &[Employee],
) -> OrgTree {
    let by_id: HashMap<&str, &Employee> = employees.iter().map(|e| (e.id.as_str(), e)).collect();

    let tree = departments
        .iter()
        .map(|dept| {
            let mut node = OrgNode {
                description: Some(dept.description.clone()),
                ..OrgNode::new(&dept.id, &dept.name, NodeType::Department)
            };
            let mut placed: HashSet<&str> = HashSet::new();

            for manager in managers.iter().filter(|m| m.department_id == dept.id) {
                placed.insert(manager.employee_id.as_str());
                let mut manager_node = OrgNode {
                    email: Some(manager.employee_email.clone()),
                    designation: by_id.get(manager.employee_id.as_str()).and_then(|e| e.designation.clone()),
                    ..OrgNode::new(&manager.id, &manager.employee_name, NodeType::Manager)
                };

                for project in projects.iter().filter(|p| p.manager_id == manager.id) {
                    let mut project_node = OrgNode {
                        description: Some(project.description.clone()),
                        status: Some(project.status.clone()),
                        start_date: project.start_date,
                        end_date: project.end_date,
                        ..OrgNode::new(&project.id, &project.name, NodeType::Project)
                    };
                    for member in project.employee_ids.iter().filter_map(|id| by_id.get(id.as_str())) {
                        placed.insert(member.id.as_str());
                        project_node.children.push(OrgNode::employee(member));
                    }
                    manager_node.children.push(project_node);
                }
                node.children.push(manager_node);
            }

            for e in employees
                .iter()
                .filter(|e| e.department_id.as_deref() == Some(dept.id.as_str()) && !placed.contains(e.id.as_str()))
            {
                node.children.push(OrgNode::employee(e));
            }
            node
        })
        .collect();

    OrgTree {
        tree,
        summary: OrgSummary {
            departments: departments.len(),
            managers: managers.len(),
            projects: projects.len(),
            employees: employees.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn employee(id: &str, dept: Option<&str>) -> Employee {
        let mut e = Employee::new(id.to_uppercase(), format!("{}@x.com", id), id.into(), "h".into(), Utc::now());
        e.id = id.into();
        e.department_id = dept.map(str::to_string);
        e
    }

    #[test]
    fn nests_projects_under_managers() {
        let now = Utc::now();
        let departments = vec![Department { id: "d1".into(), name: "Eng".into(), description: "".into(), created_at: now }];
        let managers = vec![ManagerAssignment {
            id: "m1".into(),
            employee_id: "boss".into(),
            department_id: "d1".into(),
            employee_name: "BOSS".into(),
            employee_email: "boss@x.com".into(),
            department_name: "Eng".into(),
            created_at: now,
        }];
        let projects = vec![Project {
            id: "p1".into(),
            name: "Apollo".into(),
            description: "".into(),
            department_id: "d1".into(),
            manager_id: "m1".into(),
            employee_ids: vec!["dev".into()],
            start_date: None,
            end_date: None,
            status: "active".into(),
            created_at: now,
        }];
        let employees = vec![employee("boss", Some("d1")), employee("dev", Some("d1")), employee("ops", Some("d1"))];

        let org = build_tree(&departments, &managers, &projects, &employees);
        let dept = &org.tree[0];
        assert_eq!(dept.children.len(), 2);
        assert_eq!(dept.children[0].node_type, NodeType::Manager);
        assert_eq!(dept.children[0].children[0].children[0].id, "dev");
        assert_eq!(dept.children[1].id, "ops");
        assert_eq!(org.summary.employees, 3);

        let json = serde_json::to_value(&org).unwrap();
        assert_eq!(json["tree"][0]["children"][0]["children"][0]["type"], "project");
    }
}
