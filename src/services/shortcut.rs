// src/services/shortcut.rs
//! Deterministic answers for the four quick-reply questions. Matching is plain
//! substring containment on the lower-cased message, first intent wins.

use super::profile::{CourseRef, ProfileContext, format_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Courses,
    Attendance,
    Marks,
    Fees,
}

const INTENT_PHRASES: &[(Intent, &[&str])] = &[
    (Intent::Courses, &["what are my courses", "my courses"]),
    (Intent::Attendance, &["show my attendance", "my attendance"]),
    (Intent::Marks, &["check my marks", "my marks"]),
    (Intent::Fees, &["fee status", "fees"]),
];

pub const NO_COURSES: &str = "You don't have any enrolled courses yet.";
pub const NO_MARKS: &str = "No marks available yet.";
pub const NO_FEES: &str = "No fee information available.";

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Courses => "courses",
            Intent::Attendance => "attendance",
            Intent::Marks => "marks",
            Intent::Fees => "fees",
        }
    }

    /// Reply used when the caller's records could not be loaded.
    pub fn unavailable_message(&self) -> &'static str {
        match self {
            Intent::Courses => "I couldn't fetch your courses data.",
            Intent::Attendance => "I couldn't fetch your attendance data.",
            Intent::Marks => "I couldn't fetch your marks data.",
            Intent::Fees => "I couldn't fetch your fee data.",
        }
    }
}

pub fn detect_intent(msg: &str) -> Option<Intent> {
    let msg_lower = msg.to_lowercase();

    INTENT_PHRASES
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|p| msg_lower.contains(p)))
        .map(|(intent, _)| *intent)
}

/// Returns the final answer for `msg`, or `None` when the message should go
/// to the language model instead.
pub fn resolve(msg: &str, ctx: Option<&ProfileContext>) -> Option<String> {
    let intent = detect_intent(msg)?;

    let Some(ctx) = ctx else {
        return Some(intent.unavailable_message().to_string());
    };

    let reply = match intent {
        Intent::Courses => courses_reply(ctx),
        Intent::Attendance => attendance_reply(ctx),
        Intent::Marks => marks_reply(ctx),
        Intent::Fees => fees_reply(ctx),
    };
    Some(reply)
}

fn courses_reply(ctx: &ProfileContext) -> String {
    if ctx.enrollments.is_empty() {
        return NO_COURSES.to_string();
    }

    let list = ctx
        .enrollments
        .iter()
        .map(|e| {
            let course = e.course.as_ref();
            format!(
                "• {} ({}) - {} credits",
                CourseRef::display_name(course),
                course.and_then(|c| c.code.as_deref()).unwrap_or("N/A"),
                course
                    .and_then(|c| c.credits)
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("Here are your enrolled courses:\n\n{list}")
}

fn attendance_reply(ctx: &ProfileContext) -> String {
    let present = ctx.attendance.iter().filter(|r| r.is_present()).count();
    let total = ctx.attendance.len();

    let overall = ctx
        .profile
        .attendance_percent
        .map(|p| format!("{p:.1}%"))
        .unwrap_or_else(|| "N/A".to_string());

    let recent = if ctx.attendance.is_empty() {
        "No records".to_string()
    } else {
        ctx.attendance
            .iter()
            .take(5)
            .map(|r| {
                format!(
                    "• {} - {} ({})",
                    CourseRef::display_name(r.course.as_ref()),
                    if r.is_present() { '✓' } else { '✗' },
                    format_date(&r.date),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Your attendance summary:\n\nOverall Attendance: {overall}\nRecent classes: {present}/{total} attended\n\nRecent records:\n{recent}"
    )
}

fn marks_reply(ctx: &ProfileContext) -> String {
    if ctx.marks.is_empty() {
        return NO_MARKS.to_string();
    }

    let list = ctx
        .marks
        .iter()
        .map(|m| {
            let course = m.course.as_ref();
            format!(
                "• {} ({}): {} marks - Grade: {}",
                CourseRef::display_name(course),
                course.and_then(|c| c.code.as_deref()).unwrap_or("N/A"),
                or_na(m.internal),
                m.grade.as_deref().filter(|g| !g.is_empty()).unwrap_or("Pending"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("Your marks:\n\n{list}\n\nCGPA: {}", or_na(ctx.profile.cgpa))
}

// A zero score or CGPA means "not entered yet" in the records.
fn or_na(value: Option<f64>) -> String {
    value
        .filter(|v| *v != 0.0)
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn fees_reply(ctx: &ProfileContext) -> String {
    let Some(fees) = &ctx.fees else {
        return NO_FEES.to_string();
    };

    let mut reply = format!(
        "Your fee status:\n\nTotal Fee: ₹{}\nPaid: ₹{}\nPending: ₹{}",
        fees.total_fee,
        fees.paid.unwrap_or(0.0),
        fees.pending,
    );
    if let Some(due) = &fees.due_date {
        reply.push_str(&format!("\nDue Date: {}", format_date(due)));
    }
    reply
}
