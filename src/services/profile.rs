// src/services/profile.rs
//! Read-only snapshot of a student's records, loaded fresh for every request.

use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentProfile {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub roll_no: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub semester: Option<i64>,
    #[serde(default)]
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub attendance_percent: Option<f64>,
}

/// Course columns joined onto enrollment, mark and attendance rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseRef {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub credits: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Enrollment {
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default, rename = "courses")]
    pub course: Option<CourseRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkRecord {
    #[serde(default)]
    pub internal: Option<f64>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default, rename = "courses")]
    pub course: Option<CourseRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceRecord {
    pub date: String,
    pub status: String,
    #[serde(default, rename = "courses")]
    pub course: Option<CourseRef>,
}

impl AttendanceRecord {
    pub fn is_present(&self) -> bool {
        self.status == "present"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeeRecord {
    pub total_fee: f64,
    #[serde(default)]
    pub paid: Option<f64>,
    pub pending: f64,
    #[serde(default)]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileContext {
    pub profile: StudentProfile,
    pub enrollments: Vec<Enrollment>,
    pub marks: Vec<MarkRecord>,
    /// Most recent first, at most ten.
    pub attendance: Vec<AttendanceRecord>,
    pub fees: Option<FeeRecord>,
}

impl CourseRef {
    pub fn display_name(course: Option<&CourseRef>) -> &str {
        course.map(|c| c.name.as_str()).unwrap_or("Unknown course")
    }
}

/// Renders `YYYY-MM-DD` (optionally followed by a time) as `M/D/YYYY`.
/// Anything else is returned untouched.
pub fn format_date(raw: &str) -> String {
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .map(|d| d.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates() {
        assert_eq!(format_date("2024-03-05"), "3/5/2024");
        assert_eq!(format_date("2024-11-20T10:00:00+00:00"), "11/20/2024");
        assert_eq!(format_date("next week"), "next week");
    }

    #[test]
    fn decodes_joined_rows() {
        let row: MarkRecord = serde_json::from_str(
            r#"{"id":"m1","internal":null,"grade":"A","courses":{"name":"DBMS","code":"CS301"}}"#,
        )
        .unwrap();
        assert!(row.internal.is_none());
        assert_eq!(row.course.unwrap().code.as_deref(), Some("CS301"));
    }
}
