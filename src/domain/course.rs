// ==========================================
// Course Planner - course and prerequisite model
// ==========================================
// Prerequisite groups: OR inside a group, AND across groups.
// Prerequisite and corequisite groups are kept in two lists.
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Course
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: String,              // canonical form, e.g. "COMP 110"
    pub name: String,
    pub credits: Option<String>,        // "3", "1-3", ...
    pub department_code: String,
    #[serde(default)]
    pub gen_ed: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub grading_status: Option<String>,
}

impl Course {
    /// Credit string with the empty default applied
    pub fn credits_or_default(&self) -> &str {
        self.credits.as_deref().unwrap_or("")
    }
}

/// Reference to a course inside a prerequisite group or requirement list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRef {
    pub course_id: String,
    #[serde(default)]
    pub name: String,
}

impl CourseRef {
    pub fn new(course_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            name: name.into(),
        }
    }
}

// ==========================================
// PrerequisiteGroup
// ==========================================
// prereq_group is unique per course and only used for display numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteGroup {
    pub prereq_group: i32,
    pub is_corequisite: bool,
    pub courses: Vec<CourseRef>,
}

impl PrerequisiteGroup {
    pub fn new(prereq_group: i32, is_corequisite: bool, courses: Vec<CourseRef>) -> Self {
        Self {
            prereq_group,
            is_corequisite,
            courses,
        }
    }

    /// Canonical ids of the OR-set
    pub fn course_ids(&self) -> impl Iterator<Item = String> + '_ {
        self.courses.iter().map(|c| normalize_course_id(&c.course_id))
    }

    /// "COMP 110 or COMP 116"
    pub fn describe(&self) -> String {
        self.courses
            .iter()
            .map(|c| c.course_id.as_str())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

// ==========================================
// CoursePrerequisites
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoursePrerequisites {
    pub course_id: String,
    #[serde(default)]
    pub prerequisite_groups: Vec<PrerequisiteGroup>,
    #[serde(default)]
    pub corequisite_groups: Vec<PrerequisiteGroup>,
}

impl CoursePrerequisites {
    /// A course without any requirement groups
    pub fn none(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            prerequisite_groups: Vec::new(),
            corequisite_groups: Vec::new(),
        }
    }

    /// Splits a flat list of groups on the corequisite flag, preserving order.
    pub fn from_groups(course_id: impl Into<String>, groups: Vec<PrerequisiteGroup>) -> Self {
        let (corequisite_groups, prerequisite_groups): (Vec<_>, Vec<_>) =
            groups.into_iter().partition(|g| g.is_corequisite);
        Self {
            course_id: course_id.into(),
            prerequisite_groups,
            corequisite_groups,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prerequisite_groups.is_empty() && self.corequisite_groups.is_empty()
    }
}

// ==========================================
// Course id / credit helpers
// ==========================================

/// Uppercases and collapses interior whitespace: " comp  110 " -> "COMP 110"
pub fn normalize_course_id(course_id: &str) -> String {
    course_id
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Whole-string integer parse of a credit value.
///
/// Ranges and other non-integer values ("1-3", "", "TBD") yield 0.
pub fn parse_credits_strict(credits: &str) -> u32 {
    credits.trim().parse::<u32>().unwrap_or(0)
}

/// Nominal credit value: the first integer token of the string, 0 if there is none.
///
/// "3" -> 3, "1-3" -> 1, "4.0" -> 4, "var" -> 0
pub fn nominal_credits(credits: &str) -> u32 {
    credits
        .trim()
        .split(|c: char| !c.is_ascii_digit())
        .find(|token| !token.is_empty())
        .and_then(|token| token.parse::<u32>().ok())
        .unwrap_or(0)
}

/// Human readable credit string: "3 credits", "1 credit", "1-3 credits"
pub fn format_credits(credits: Option<&str>) -> String {
    match credits.map(str::trim) {
        None | Some("") => String::new(),
        Some(c) if c.contains('-') => format!("{} credits", c),
        Some("1") => "1 credit".to_string(),
        Some(c) => format!("{} credits", c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_course_id() {
        assert_eq!(normalize_course_id(" comp  110 "), "COMP 110");
        assert_eq!(normalize_course_id("MATH\t231"), "MATH 231");
        assert_eq!(normalize_course_id("COMP 110"), "COMP 110");
    }

    #[test]
    fn test_parse_credits_strict() {
        assert_eq!(parse_credits_strict("3"), 3);
        assert_eq!(parse_credits_strict(" 4 "), 4);
        assert_eq!(parse_credits_strict("1-3"), 0);
        assert_eq!(parse_credits_strict(""), 0);
        assert_eq!(parse_credits_strict("TBD"), 0);
    }

    #[test]
    fn test_nominal_credits() {
        assert_eq!(nominal_credits("3"), 3);
        assert_eq!(nominal_credits("1-3"), 1);
        assert_eq!(nominal_credits("4.0"), 4);
        assert_eq!(nominal_credits("variable"), 0);
    }

    #[test]
    fn test_format_credits() {
        assert_eq!(format_credits(Some("3")), "3 credits");
        assert_eq!(format_credits(Some("1")), "1 credit");
        assert_eq!(format_credits(Some("1-3")), "1-3 credits");
        assert_eq!(format_credits(None), "");
    }

    #[test]
    fn test_from_groups_partitions_on_flag() {
        let prereqs = CoursePrerequisites::from_groups(
            "COMP 211",
            vec![
                PrerequisiteGroup::new(1, false, vec![CourseRef::new("COMP 110", "")]),
                PrerequisiteGroup::new(2, true, vec![CourseRef::new("COMP 227", "")]),
                PrerequisiteGroup::new(3, false, vec![CourseRef::new("MATH 231", "")]),
            ],
        );
        assert_eq!(prereqs.prerequisite_groups.len(), 2);
        assert_eq!(prereqs.prerequisite_groups[1].prereq_group, 3);
        assert_eq!(prereqs.corequisite_groups.len(), 1);
    }
}
