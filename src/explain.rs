use crate::normalize::{has_label, known, normalize_level};
use crate::ranking::in_preferred_state;
use crate::types::{ProgramCandidate, StudentProfile};

const FALLBACK_REASON: &str = "Recommended based on overall profile match";

/// Human-readable reasons a program suits a student.
pub fn reasons(profile: &StudentProfile, program: &ProgramCandidate) -> Vec<String> {
    let mut reasons = Vec::new();

    if !profile.field_ids.is_empty() && profile.field_ids.contains(&program.field_id) {
        reasons.push("Matches your preferred field of interest".to_string());
    }

    if has_label(&profile.study_level)
        && has_label(&program.level)
        && normalize_level(&profile.study_level) == normalize_level(&program.level)
    {
        reasons.push(format!("Matches {} level preference", program.level.trim()));
    }

    if let (Some(budget), Some(tuition)) = (known(profile.budget), known(program.tuition_fee)) {
        if tuition <= budget {
            reasons.push("Within your tuition budget".to_string());
        } else if tuition <= budget * 1.1 {
            reasons.push("Slightly above budget (within 10%)".to_string());
        }
    }

    if in_preferred_state(program, profile) {
        if let Some(state) = &program.university_state {
            reasons.push(format!("Located in preferred state: {}", state));
        }
    }

    match program.employment_rate {
        Some(rate) if rate >= 90.0 => reasons.push("High employment rate (90%+)".to_string()),
        Some(rate) if rate >= 80.0 => reasons.push("Good employment rate (80%+)".to_string()),
        _ => {}
    }

    match program.rating {
        Some(rating) if rating >= 4.5 => {
            reasons.push("Excellent program rating (4.5+)".to_string())
        }
        Some(rating) if rating >= 4.0 => reasons.push("High program rating (4.0+)".to_string()),
        _ => {}
    }

    if program.average_salary.map_or(false, |salary| salary >= 5000.0) {
        reasons.push("High average graduate salary".to_string());
    }

    if reasons.is_empty() {
        reasons.push(FALLBACK_REASON.to_string());
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_when_nothing_matches() {
        let reasons = reasons(&StudentProfile::default(), &ProgramCandidate::default());
        assert_eq!(reasons, vec![FALLBACK_REASON.to_string()]);
    }

    #[test]
    fn lists_every_matching_signal() {
        let profile = StudentProfile {
            study_level: "Degree".into(),
            field_ids: vec![3],
            cgpa: Some(3.4),
            budget: Some(40_000.0),
            preferred_states: vec!["Penang".into()],
        };
        let program = ProgramCandidate {
            program_id: 9,
            university_id: 2,
            field_id: 3,
            tuition_fee: Some(42_000.0),
            duration_months: Some(36),
            level: "Bachelor".into(),
            university_state: Some("PENANG".into()),
            employment_rate: Some(85.0),
            rating: Some(4.2),
            average_salary: Some(5200.0),
        };

        assert_eq!(
            reasons(&profile, &program),
            vec![
                "Matches your preferred field of interest",
                "Matches Bachelor level preference",
                "Slightly above budget (within 10%)",
                "Located in preferred state: PENANG",
                "Good employment rate (80%+)",
                "High program rating (4.0+)",
                "High average graduate salary",
            ]
        );
    }

    #[test]
    fn within_budget_takes_precedence() {
        let profile = StudentProfile {
            budget: Some(40_000.0),
            ..Default::default()
        };
        let program = ProgramCandidate {
            tuition_fee: Some(40_000.0),
            ..Default::default()
        };
        assert_eq!(reasons(&profile, &program), vec!["Within your tuition budget"]);
    }
}
