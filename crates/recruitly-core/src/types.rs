//! Employee data model shared between the gateway and the view state

use crate::error::{Error, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Largest integer an `f64` represents exactly; whole salaries up to this
/// bound go over the wire as JSON integers.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Department an employee belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    /// Engineering
    Engineering,
    /// Marketing
    Marketing,
    /// Human resources
    #[serde(rename = "HR")]
    Hr,
    /// Finance
    Finance,
    /// Sales
    Sales,
    /// Operations
    Operations,
}

impl Department {
    /// Every department, in selector display order
    pub const ALL: [Self; 6] = [
        Self::Engineering,
        Self::Marketing,
        Self::Hr,
        Self::Finance,
        Self::Sales,
        Self::Operations,
    ];

    /// Display and wire name of the department
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Engineering => "Engineering",
            Self::Marketing => "Marketing",
            Self::Hr => "HR",
            Self::Finance => "Finance",
            Self::Sales => "Sales",
            Self::Operations => "Operations",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|dept| dept.as_str() == s)
            .ok_or_else(|| Error::validation("department", format!("unknown department '{s}'")))
    }
}

/// Employment status of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmploymentStatus {
    /// Currently employed
    #[default]
    Active,
    /// No longer active
    Inactive,
}

impl EmploymentStatus {
    /// Wire name of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmploymentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            other => Err(Error::validation(
                "status",
                format!("unknown status '{other}'"),
            )),
        }
    }
}

/// Identifier assigned by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a raw identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is blank
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Non-negative salary amount
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Salary(f64);

impl Salary {
    /// Build a salary, rejecting negative and non-finite amounts
    pub fn new(amount: f64) -> Result<Self> {
        if amount.is_finite() && amount >= 0.0 {
            Ok(Self(amount))
        } else {
            Err(Error::validation(
                "salary",
                format!("{amount} is not a non-negative number"),
            ))
        }
    }

    /// Numeric value of the salary
    #[must_use]
    pub const fn amount(self) -> f64 {
        self.0
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn whole(self) -> Option<u64> {
        if self.0.fract() == 0.0 && self.0 <= MAX_EXACT_INTEGER {
            Some(self.0 as u64)
        } else {
            None
        }
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.whole() {
            Some(whole) => write!(f, "{whole}"),
            None => write!(f, "{}", self.0),
        }
    }
}

impl FromStr for Salary {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let amount = trimmed.parse::<f64>().map_err(|_| {
            Error::validation("salary", format!("'{trimmed}' is not a number"))
        })?;
        Self::new(amount)
    }
}

impl Serialize for Salary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.whole() {
            Some(whole) => serializer.serialize_u64(whole),
            None => serializer.serialize_f64(self.0),
        }
    }
}

struct SalaryVisitor;

impl Visitor<'_> for SalaryVisitor {
    type Value = Salary;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative number or numeric string")
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Salary, E> {
        Salary::new(v as f64).map_err(E::custom)
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Salary, E> {
        Salary::new(v as f64).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Salary, E> {
        Salary::new(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Salary, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Salary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(SalaryVisitor)
    }
}

/// Employee record as stored by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Service-assigned identifier
    #[serde(rename = "_id", alias = "id", default)]
    pub id: RecordId,

    /// Display name
    pub name: String,

    /// Department
    pub department: Department,

    /// Free-text role
    pub role: String,

    /// Salary
    pub salary: Salary,

    /// Employment status
    #[serde(default)]
    pub status: EmploymentStatus,
}

impl EmployeeRecord {
    /// Body for a create or update request carrying this record's fields
    #[must_use]
    pub fn payload(&self) -> EmployeePayload {
        EmployeePayload {
            name: self.name.clone(),
            department: self.department,
            role: self.role.clone(),
            salary: self.salary,
            status: self.status,
        }
    }

    /// Attach an identifier to a payload, as the service does on create
    #[must_use]
    pub fn from_payload(id: RecordId, payload: EmployeePayload) -> Self {
        Self {
            id,
            name: payload.name,
            department: payload.department,
            role: payload.role,
            salary: payload.salary,
            status: payload.status,
        }
    }
}

/// Employee fields without the identifier, as sent on create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeePayload {
    /// Display name
    pub name: String,
    /// Department
    pub department: Department,
    /// Free-text role
    pub role: String,
    /// Salary
    pub salary: Salary,
    /// Employment status
    pub status: EmploymentStatus,
}

/// List filter inputs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FilterState {
    /// Name substring to search for
    pub name_pattern: String,
    /// Department to restrict to, `None` for all departments
    pub department: Option<Department>,
    /// Only include active employees
    pub active_only: bool,
}

impl FilterState {
    /// Query parameters for a list request.
    ///
    /// `name` is always sent; `department` only when one is selected and
    /// `status=Active` only when `active_only` is set.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("name", self.name_pattern.clone())];
        if let Some(department) = self.department {
            pairs.push(("department", department.as_str().to_string()));
        }
        if self.active_only {
            pairs.push(("status", EmploymentStatus::Active.as_str().to_string()));
        }
        pairs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_department_catalogue_order() {
        let names: Vec<_> = Department::ALL.iter().map(|d| d.as_str()).collect();
        assert_eq!(
            names,
            vec!["Engineering", "Marketing", "HR", "Finance", "Sales", "Operations"]
        );
    }

    #[test]
    fn test_department_parse_is_exact() {
        assert_eq!("HR".parse::<Department>().unwrap(), Department::Hr);
        assert!("engineering".parse::<Department>().is_err());
        assert!("".parse::<Department>().is_err());
    }

    #[test]
    fn test_status_defaults_to_active() {
        assert_eq!(EmploymentStatus::default(), EmploymentStatus::Active);
        assert_eq!(
            "Inactive".parse::<EmploymentStatus>().unwrap(),
            EmploymentStatus::Inactive
        );
    }

    #[rstest]
    #[case("100000", 100_000.0)]
    #[case(" 42.5 ", 42.5)]
    #[case("0", 0.0)]
    fn test_salary_parse_accepts(#[case] input: &str, #[case] expected: f64) {
        assert_eq!(input.parse::<Salary>().unwrap().amount(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("-1")]
    #[case("NaN")]
    #[case("inf")]
    fn test_salary_parse_rejects(#[case] input: &str) {
        let err = input.parse::<Salary>().unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "salary"));
    }

    #[test]
    fn test_whole_salary_serializes_as_integer() {
        let salary: Salary = "100000".parse().unwrap();
        assert_eq!(serde_json::to_value(salary).unwrap(), serde_json::json!(100_000));

        let fractional: Salary = "1234.5".parse().unwrap();
        assert_eq!(serde_json::to_value(fractional).unwrap(), serde_json::json!(1234.5));
    }

    #[test]
    fn test_salary_display() {
        assert_eq!("100000".parse::<Salary>().unwrap().to_string(), "100000");
        assert_eq!("99.95".parse::<Salary>().unwrap().to_string(), "99.95");
    }

    #[test]
    fn test_record_accepts_service_identifier() {
        let json = r#"{
            "_id": "665f1c2e9b",
            "name": "Ada",
            "department": "Engineering",
            "role": "Engineer",
            "salary": 100000,
            "status": "Inactive",
            "__v": 0
        }"#;

        let record: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, RecordId::from("665f1c2e9b"));
        assert_eq!(record.department, Department::Engineering);
        assert_eq!(record.status, EmploymentStatus::Inactive);
        assert_eq!(record.salary.amount(), 100_000.0);
    }

    #[test]
    fn test_record_accepts_plain_id_and_string_salary() {
        let json = r#"{"id":"x","name":"Grace","department":"HR","role":"Lead","salary":"5000"}"#;

        let record: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id.as_str(), "x");
        assert_eq!(record.department, Department::Hr);
        assert_eq!(record.status, EmploymentStatus::Active);
    }

    #[test]
    fn test_record_rejects_negative_salary() {
        let json = r#"{"_id":"x","name":"A","department":"HR","role":"R","salary":-5}"#;
        assert!(serde_json::from_str::<EmployeeRecord>(json).is_err());
    }

    #[test]
    fn test_payload_omits_identifier() {
        let record = EmployeeRecord {
            id: RecordId::from("abc"),
            name: "Ada".to_string(),
            department: Department::Engineering,
            role: "Engineer".to_string(),
            salary: Salary::new(100_000.0).unwrap(),
            status: EmploymentStatus::Active,
        };

        let body = serde_json::to_value(record.payload()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "name": "Ada",
                "department": "Engineering",
                "role": "Engineer",
                "salary": 100_000,
                "status": "Active"
            })
        );
    }

    #[test]
    fn test_default_filter_sends_only_name() {
        assert_eq!(
            FilterState::default().query_pairs(),
            vec![("name", String::new())]
        );
    }

    #[test]
    fn test_department_and_active_filter_query() {
        let filter = FilterState {
            name_pattern: String::new(),
            department: Some(Department::Engineering),
            active_only: true,
        };

        assert_eq!(
            filter.query_pairs(),
            vec![
                ("name", String::new()),
                ("department", "Engineering".to_string()),
                ("status", "Active".to_string()),
            ]
        );
    }

    fn any_filter() -> impl Strategy<Value = FilterState> {
        (
            ".{0,12}",
            proptest::option::of(proptest::sample::select(Department::ALL.to_vec())),
            any::<bool>(),
        )
            .prop_map(|(name_pattern, department, active_only)| FilterState {
                name_pattern,
                department,
                active_only,
            })
    }

    proptest! {
        #[test]
        fn prop_query_carries_exactly_the_filter(filter in any_filter()) {
            let pairs = filter.query_pairs();
            let get = |key: &str| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone());

            prop_assert_eq!(get("name"), Some(filter.name_pattern.clone()));
            prop_assert_eq!(
                get("department"),
                filter.department.map(|d| d.as_str().to_string())
            );
            prop_assert_eq!(get("status").is_some(), filter.active_only);
            prop_assert!(pairs.len() <= 3);
        }
    }
}
