//! Common fixtures for integration tests

#![allow(dead_code, clippy::unwrap_used)]

use recruitly_dashboard::{
    Department, EmployeeRecord, EmploymentStatus, HttpGateway, RecordId, Salary,
};
use serde_json::{Value, json};
use wiremock::MockServer;

/// Path of the employee collection on the service
pub const EMPLOYEES: &str = "/api/employees";

/// Start a stand-in employee service and a gateway pointed at it
pub async fn service() -> (MockServer, HttpGateway) {
    let server = MockServer::start().await;
    let gateway = HttpGateway::new(server.uri());
    (server, gateway)
}

/// A record as the service would hold it
pub fn employee(id: &str, name: &str, department: Department) -> EmployeeRecord {
    EmployeeRecord {
        id: RecordId::from(id),
        name: name.to_string(),
        department,
        role: "Engineer".to_string(),
        salary: Salary::new(100_000.0).unwrap(),
        status: EmploymentStatus::Active,
    }
}

/// The service's JSON for a record, `_id` and version key included
pub fn employee_json(record: &EmployeeRecord) -> Value {
    json!({
        "_id": record.id.as_str(),
        "name": record.name,
        "department": record.department.as_str(),
        "role": record.role,
        "salary": record.salary.amount(),
        "status": record.status.as_str(),
        "__v": 0
    })
}

/// JSON array for a list response
pub fn employees_json(records: &[EmployeeRecord]) -> Value {
    Value::Array(records.iter().map(employee_json).collect())
}

/// Seed data used across tests
pub fn staff() -> Vec<EmployeeRecord> {
    vec![
        employee("x", "Ada Lovelace", Department::Engineering),
        employee("y", "Grace Hopper", Department::Engineering),
        employee("z", "Mary Barra", Department::Operations),
    ]
}
