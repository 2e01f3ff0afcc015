// src/services/prompt.rs
use crate::message::ConversationMessage;

use super::profile::StudentProfile;

const PREAMBLE: &str = "You are an intelligent academic assistant for Horizon Institute of Technology students. You can help with:
- Subject doubts and explanations (Math, Physics, Computer Science, AI, Data Science, Deep Learning, Cloud Computing, etc.)
- Problem-solving and step-by-step solutions
- Conceptual understanding of topics
- Study tips and learning strategies
- College management system queries
- General academic guidance";

const CLOSING: &str = "When students ask about their courses, attendance, marks, or fees, provide helpful information based on their profile data above.

Provide clear, accurate, and helpful responses. When explaining complex topics, break them down into simple steps. For math problems, show your work.";

pub fn system_prompt(profile: Option<&StudentProfile>) -> String {
    let student = profile.map(student_block).unwrap_or_default();
    format!("{PREAMBLE}\n\n{student}\n\n{CLOSING}")
}

fn student_block(p: &StudentProfile) -> String {
    fn or_na<T: ToString>(v: Option<T>) -> String {
        v.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
    }

    format!(
        "Current Student Information:\n- Name: {}\n- Roll No: {}\n- Branch: {}\n- Semester: {}\n- CGPA: {}\n- Attendance: {}%\n",
        p.name,
        or_na(p.roll_no.as_deref()),
        or_na(p.branch.as_deref()),
        or_na(p.semester),
        or_na(p.cgpa),
        or_na(p.attendance_percent),
    )
}

/// Prepends the system message to the caller's conversation.
pub fn augment(messages: &[ConversationMessage], profile: Option<&StudentProfile>) -> Vec<ConversationMessage> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    out.push(ConversationMessage::system(system_prompt(profile)));
    out.extend_from_slice(messages);
    out
}
