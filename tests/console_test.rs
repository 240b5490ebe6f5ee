mod utils;

use std::io::Cursor;

use chronic_risk::shell::console::run_assessment;
use chronic_risk::{ConfidenceLevel, Disease};
use utils::{diabetes_bundle, engine_with};

const DIABETES_SESSION: &str = "diabetes\nyes\nyes\nno\nno\nyes\nno\nyes\n45\n31.2\n160\n7.1\n";

/// Test a scripted session from disease selection to advice
#[test]
fn test_scripted_session() -> chronic_risk::Result<()> {
    let engine = engine_with(Disease::Diabetes, &diabetes_bundle(Some(0.813)))?;
    let mut output = Vec::new();
    let assessment = run_assessment(&engine, None, Cursor::new(DIABETES_SESSION), &mut output)?;
    let printed = String::from_utf8(output).unwrap();

    assert_eq!(assessment.disease, Disease::Diabetes);
    assert_eq!(assessment.confidence, ConfidenceLevel::High);
    assert!(printed.contains(&format!("Diabetes Risk Score: {:.2}%", assessment.risk)));
    assert!(printed.contains("Model Accuracy (test set): 81.30%"));
    assert!(printed.contains("Prediction Confidence: High"));
    assert!(printed.contains("- Risk Level: High"));
    assert!(printed.ends_with("- Consult a healthcare professional for proper diagnosis.\n"));
    Ok(())
}

/// Test that skipped values and a missing accuracy record are reported
#[test]
fn test_skipped_values_without_accuracy() -> chronic_risk::Result<()> {
    let engine = engine_with(Disease::Diabetes, &diabetes_bundle(None))?;
    let script = "no\n".repeat(7) + "\n\n\n\n";
    let mut output = Vec::new();
    let assessment =
        run_assessment(&engine, Some(Disease::Diabetes), Cursor::new(script), &mut output)?;
    let printed = String::from_utf8(output).unwrap();

    assert_eq!(assessment.accuracy, None);
    assert!(printed.contains("Model accuracy not available"));
    assert!(printed.contains("Prediction Confidence: Unknown"));
    assert!(!printed.contains("Select disease"));
    Ok(())
}
