//! Question and clinical test tables for each disease

use super::{ClinicalTest, SymptomQuestion};

const fn q(prompt: &'static str, feature: &'static str) -> SymptomQuestion {
    SymptomQuestion { prompt, feature }
}

const fn t(label: &'static str, feature: &'static str) -> ClinicalTest {
    ClinicalTest { label, feature }
}

pub(super) const DIABETES_SYMPTOMS: &[SymptomQuestion] = &[
    q("Do you feel excessively thirsty?", "polydipsia"),
    q("Do you urinate more frequently than usual?", "polyuria"),
    q("Do you feel unusually hungry?", "polyphagia"),
    q("Do you experience unexplained weight loss?", "weight_loss"),
    q("Do you often feel fatigued?", "fatigue"),
    q("Do you have blurred vision?", "blurred_vision"),
    q("Do you have a family history of diabetes?", "family_history"),
];

pub(super) const DIABETES_TESTS: &[ClinicalTest] = &[
    t("Age (years)", "age"),
    t("Body Mass Index (BMI)", "bmi"),
    t("Fasting Blood Glucose (mg/dL)", "glucose"),
    t("HbA1c (%)", "hba1c"),
];

pub(super) const HEART_SYMPTOMS: &[SymptomQuestion] = &[
    q("Do you experience chest pain or discomfort?", "chest_pain"),
    q("Do you feel shortness of breath during exertion?", "shortness_of_breath"),
    q("Do you have a history of high blood pressure?", "hypertension"),
    q("Do you have high cholesterol?", "high_cholesterol"),
    q("Do you smoke cigarettes?", "smoking"),
    q("Do you feel palpitations or irregular heartbeat?", "palpitations"),
    q("Do you have a family history of heart disease?", "family_history"),
];

pub(super) const HEART_TESTS: &[ClinicalTest] = &[
    t("Age (years)", "age"),
    t("Resting Blood Pressure (mmHg)", "resting_bp"),
    t("Total Cholesterol (mg/dL)", "cholesterol"),
    t("Maximum Heart Rate Achieved", "max_hr"),
];

pub(super) const KIDNEY_SYMPTOMS: &[SymptomQuestion] = &[
    q("Do you have swelling in your feet or ankles?", "pedal_edema"),
    q("Do you often feel fatigued?", "fatigue"),
    q("Have you lost your appetite recently?", "appetite_loss"),
    q("Do you have a history of high blood pressure?", "hypertension"),
    q("Have you been diagnosed with diabetes?", "diabetes_mellitus"),
    q("Have you been told you are anemic?", "anemia"),
];

pub(super) const KIDNEY_TESTS: &[ClinicalTest] = &[
    t("Age (years)", "age"),
    t("Blood Pressure (mmHg)", "bp"),
    t("Serum Creatinine (mg/dL)", "serum_creatinine"),
    t("Blood Urea (mg/dL)", "blood_urea"),
    t("Hemoglobin (g/dL)", "hemoglobin"),
];

pub(super) const LIVER_SYMPTOMS: &[SymptomQuestion] = &[
    q("Have you noticed yellowing of your skin or eyes?", "jaundice"),
    q("Do you have pain in the upper right abdomen?", "abdominal_pain"),
    q("Do you often feel fatigued?", "fatigue"),
    q("Is your urine unusually dark?", "dark_urine"),
    q("Do you drink alcohol regularly?", "alcohol_use"),
];

pub(super) const LIVER_TESTS: &[ClinicalTest] = &[
    t("Age (years)", "age"),
    t("Total Bilirubin (mg/dL)", "total_bilirubin"),
    t("Alkaline Phosphatase (IU/L)", "alkaline_phosphatase"),
    t("Alanine Aminotransferase (ALT, IU/L)", "alt"),
    t("Albumin (g/dL)", "albumin"),
];

pub(super) const ASTHMA_SYMPTOMS: &[SymptomQuestion] = &[
    q("Do you experience wheezing?", "wheezing"),
    q("Do you feel shortness of breath?", "shortness_of_breath"),
    q("Do you have chest tightness?", "chest_tightness"),
    q("Do you experience coughing at night or early morning?", "night_cough"),
    q("Do symptoms worsen with exercise?", "exercise_induced"),
    q("Do you have a history of allergies?", "allergy_history"),
];

pub(super) const ASTHMA_TESTS: &[ClinicalTest] = &[
    t("Age (years)", "age"),
    t("Peak Expiratory Flow (PEF)", "pef"),
];
