//! Label normalization and the presence policy for optional inputs.

use crate::types::{GradeValue, SubjectProfile};
use crate::vocab::{CGPA_SUBJECTS, LEVELS};

/// Canonical form of a study-level label.
///
/// Case-insensitive and whitespace-trimmed. Unrecognized labels pass through
/// lowercased so they still compare literally against each other.
pub fn normalize_level(level: &str) -> String {
    let lower = level.trim().to_lowercase();
    match lower.as_str() {
        "bachelor" | "bachelor's" | "degree" | "undergraduate" | "bachelors" => {
            "bachelor".to_string()
        }
        "diploma" => "diploma".to_string(),
        "foundation" => "foundation".to_string(),
        "master" | "masters" => "master".to_string(),
        "phd" | "doctorate" => "phd".to_string(),
        _ => lower,
    }
}

/// One-hot slot for a level label. Unknown or empty labels use slot 0.
pub fn level_index(level: &str) -> usize {
    let canonical = normalize_level(level);
    LEVELS
        .iter()
        .position(|known| *known == canonical)
        .unwrap_or(0)
}

/// True when the label carries any content after trimming.
pub fn has_label(label: &str) -> bool {
    !label.trim().is_empty()
}

/// Letter grade to the model's integer scale: A..E => 5..1, G/0/absent => 0.
pub fn grade_value(grade: Option<&GradeValue>) -> u8 {
    match grade {
        Some(GradeValue::Letter(letter)) => match letter.trim() {
            "A" => 5,
            "B" => 4,
            "C" => 3,
            "D" => 2,
            "E" => 1,
            _ => 0,
        },
        Some(GradeValue::Numeric(_)) | None => 0,
    }
}

/// Letter grade to a 4.0-scale grade point. `None` for "not taken" and unknown marks.
pub fn grade_points(grade: &GradeValue) -> Option<f64> {
    match grade {
        GradeValue::Letter(letter) => match letter.trim() {
            "A" => Some(4.0),
            "B" => Some(3.0),
            "C" => Some(2.0),
            "D" => Some(1.0),
            "E" => Some(0.5),
            "G" => Some(0.0),
            _ => None,
        },
        GradeValue::Numeric(_) => None,
    }
}

/// Mean grade point over the core subjects that carry a recognized grade.
pub fn estimate_cgpa(profile: &SubjectProfile) -> Option<f64> {
    let points: Vec<f64> = CGPA_SUBJECTS
        .iter()
        .filter_map(|subject| profile.grades.get(*subject))
        .filter_map(grade_points)
        .collect();

    if points.is_empty() {
        return None;
    }
    Some(points.iter().sum::<f64>() / points.len() as f64)
}

/// Presence policy for optional numbers: present, finite and strictly positive.
/// Zero is treated as unknown.
pub fn known(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(s: &str) -> GradeValue {
        GradeValue::Letter(s.to_string())
    }

    #[test]
    fn level_synonyms_collapse() {
        for raw in ["Bachelor", " bachelor's ", "DEGREE", "Undergraduate", "bachelors"] {
            assert_eq!(normalize_level(raw), "bachelor", "{}", raw);
        }
        assert_eq!(normalize_level("Masters"), "master");
        assert_eq!(normalize_level("Doctorate"), "phd");
        assert_eq!(normalize_level("Foundation"), "foundation");
        assert_eq!(normalize_level("Diploma"), "diploma");
    }

    #[test]
    fn unknown_level_passes_through_lowercased() {
        assert_eq!(normalize_level("  Certificate "), "certificate");
        assert_eq!(level_index("Certificate"), 0);
    }

    #[test]
    fn level_index_follows_canonical_order() {
        assert_eq!(level_index("Bachelor"), 0);
        assert_eq!(level_index("diploma"), 1);
        assert_eq!(level_index("Foundation"), 2);
        assert_eq!(level_index("masters"), 3);
        assert_eq!(level_index("PhD"), 4);
        assert_eq!(level_index(""), 0);
    }

    #[test]
    fn grade_letters_map_to_scale() {
        assert_eq!(grade_value(Some(&letter("A"))), 5);
        assert_eq!(grade_value(Some(&letter("B"))), 4);
        assert_eq!(grade_value(Some(&letter("C"))), 3);
        assert_eq!(grade_value(Some(&letter("D"))), 2);
        assert_eq!(grade_value(Some(&letter("E"))), 1);
        assert_eq!(grade_value(Some(&letter("G"))), 0);
        assert_eq!(grade_value(Some(&letter("0"))), 0);
        assert_eq!(grade_value(Some(&letter("A+"))), 0);
        assert_eq!(grade_value(Some(&GradeValue::Numeric(0.0))), 0);
        assert_eq!(grade_value(None), 0);
    }

    #[test]
    fn cgpa_estimate_skips_untaken_subjects() {
        let mut profile = SubjectProfile::default();
        profile.grades.insert("Mathematics".into(), letter("A"));
        profile.grades.insert("English".into(), letter("C"));
        profile.grades.insert("Physics".into(), letter("0"));
        // History is not a CGPA subject.
        profile.grades.insert("History".into(), letter("E"));

        let cgpa = estimate_cgpa(&profile).unwrap();
        assert!((cgpa - 3.0).abs() < 1e-9);
    }

    #[test]
    fn cgpa_estimate_absent_without_grades() {
        assert_eq!(estimate_cgpa(&SubjectProfile::default()), None);
    }

    #[test]
    fn zero_and_non_finite_are_unknown() {
        assert_eq!(known(Some(0.0)), None);
        assert_eq!(known(Some(-5.0)), None);
        assert_eq!(known(Some(f64::NAN)), None);
        assert_eq!(known(None), None);
        assert_eq!(known(Some(3.2)), Some(3.2));
    }
}
