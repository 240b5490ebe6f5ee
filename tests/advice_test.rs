use chronic_risk::advice::CLOSING_DISCLAIMER;
use chronic_risk::{ConfidenceLevel, Disease, RiskLevel, advice_for, generate_advice};
use pretty_assertions::assert_eq;

/// Test that every risk value yields exactly one level line
#[test]
fn test_single_level_line() {
    for risk in [0.0, 12.5, 29.99, 30.0, 45.0, 59.99, 60.0, 88.8, 100.0] {
        let advice = generate_advice("heart", risk);
        let levels = advice.iter().filter(|l| l.starts_with("Risk Level: ")).count();
        assert_eq!(levels, 1, "risk {risk}");
        assert_eq!(advice[0], format!("Risk Level: {}", RiskLevel::from_percentage(risk)));
    }
}

/// Test the documented band boundaries
#[test]
fn test_boundaries() {
    let level = |risk| generate_advice("diabetes", risk)[0].clone();
    assert_eq!(level(0.0), "Risk Level: Low");
    assert_eq!(level(30.0), "Risk Level: Moderate");
    assert_eq!(level(60.0), "Risk Level: High");
    assert_eq!(level(100.0), "Risk Level: High");
}

/// Test that recognized diseases always close with the disclaimer
#[test]
fn test_disclaimer_is_last() {
    for disease in Disease::ALL {
        for risk in [5.0, 50.0, 95.0] {
            let advice = generate_advice(disease.as_str(), risk);
            assert_eq!(advice.len(), 6);
            assert_eq!(advice.last().unwrap(), CLOSING_DISCLAIMER);
        }
    }
}

/// Test that an unknown disease degrades to level and disclaimer only
#[test]
fn test_unknown_disease() {
    assert_eq!(
        generate_advice("migraine", 72.5),
        vec!["Risk Level: High".to_string(), CLOSING_DISCLAIMER.to_string()]
    );
}

/// Test the diabetes walkthrough: a 72.50% risk with 81.30% accuracy
#[test]
fn test_diabetes_walkthrough() {
    let advice = advice_for(Disease::Diabetes, 72.50);
    assert_eq!(
        advice,
        vec![
            "Risk Level: High",
            "Maintain a balanced diet with limited sugar intake",
            "Engage in regular physical activity",
            "Monitor blood glucose levels regularly",
            "Avoid excessive processed foods",
            "Consult a healthcare professional for proper diagnosis.",
        ]
    );
    assert_eq!(ConfidenceLevel::from_accuracy(Some(81.30)), ConfidenceLevel::High);
}
