//! Fixed, ordered vocabularies shared by the feature builders.
//!
//! Order is part of the model contract: each table maps one-to-one onto a block of
//! the feature vectors, so entries must never be reordered.

pub const SUBJECT_COUNT: usize = 15;
pub const INTEREST_COUNT: usize = 7;
pub const SKILL_COUNT: usize = 7;
pub const LEVEL_COUNT: usize = 5;
pub const STUDY_TRACK_COUNT: usize = 2;
pub const FIELD_SLOT_COUNT: usize = 20;

pub const SUBJECTS: [&str; SUBJECT_COUNT] = [
    "BM",
    "English",
    "History",
    "Mathematics",
    "IslamicOrMoral",
    "Physics",
    "Chemistry",
    "Bio",
    "AddMaths",
    "Geography",
    "Economics",
    "Accounting",
    "Chinese",
    "Tamil",
    "ICT",
];

/// Prefix used by the subject-taken columns (`Took_Mathematics`, ...).
pub const TAKEN_PREFIX: &str = "Took_";

pub const INTERESTS: [&str; INTEREST_COUNT] = [
    "Maths_Interest",
    "Science_Interest",
    "Computer_Interest",
    "Writing_Interest",
    "Art_Interest",
    "Business_Interest",
    "Social_Interest",
];

pub const SKILLS: [&str; SKILL_COUNT] = [
    "Logical",
    "Problem_Solving",
    "Creativity",
    "Communication",
    "Teamwork",
    "Leadership",
    "Attention_to_Detail",
];

/// Canonical study levels, in one-hot order.
pub const LEVELS: [&str; LEVEL_COUNT] = ["bachelor", "diploma", "foundation", "master", "phd"];

/// Pre-tertiary examination tracks, in one-hot order. Unknown tracks use slot 0.
pub const STUDY_TRACKS: [&str; STUDY_TRACK_COUNT] = ["SPM", "STPM"];

/// Output classes of the field-interest model, in probability order.
pub const FIELD_CATEGORIES: [&str; 14] = [
    "Computer Science & IT",
    "Engineering",
    "Health Science",
    "Medicine, Dentistry & Pharmacy",
    "Traditional and Complementary Medicine",
    "Business & Management",
    "Arts & Design",
    "Education",
    "Social Sciences",
    "Law",
    "Agriculture & Forestry",
    "Hospitality & Tourism",
    "Architecture & Built Environment",
    "Others",
];

/// Subjects that contribute to the CGPA estimate.
pub const CGPA_SUBJECTS: [&str; 9] = [
    "BM",
    "English",
    "Mathematics",
    "Physics",
    "Chemistry",
    "Bio",
    "AddMaths",
    "Accounting",
    "Economics",
];

pub fn taken_column(subject: &str) -> String {
    format!("{}{}", TAKEN_PREFIX, subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tables_have_no_duplicates() {
        assert_eq!(SUBJECTS.iter().collect::<HashSet<_>>().len(), SUBJECT_COUNT);
        assert_eq!(INTERESTS.iter().collect::<HashSet<_>>().len(), INTEREST_COUNT);
        assert_eq!(SKILLS.iter().collect::<HashSet<_>>().len(), SKILL_COUNT);
        assert_eq!(
            FIELD_CATEGORIES.iter().collect::<HashSet<_>>().len(),
            FIELD_CATEGORIES.len()
        );
    }

    #[test]
    fn cgpa_subjects_are_known_subjects() {
        for subject in CGPA_SUBJECTS {
            assert!(SUBJECTS.contains(&subject), "{} missing", subject);
        }
    }

    #[test]
    fn taken_column_prefixes_subject() {
        assert_eq!(taken_column("ICT"), "Took_ICT");
    }
}
