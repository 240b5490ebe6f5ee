//! Interactive questionnaire
//!
//! Generic over the reader and writer so sessions can be scripted in tests.

use std::io::{self, BufRead, Write};

use crate::disease::Disease;
use crate::error::{Result, RiskError};
use crate::inference::InferenceEngine;
use crate::input::{RawInput, parse_numeric};
use crate::schema::FeatureSchema;

use super::Assessment;

/// A questionnaire session over a pair of streams
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output stream
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print a prompt and read one trimmed line
    fn prompt(&mut self, text: &str) -> Result<String> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(RiskError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before the questionnaire was complete",
            )));
        }
        Ok(line.trim().to_string())
    }

    /// Ask which disease to assess until a supported one is given
    pub fn select_disease(&mut self) -> Result<Disease> {
        let choices = Disease::ALL.map(Disease::as_str).join(" / ");
        loop {
            let answer = self.prompt(&format!("Select disease ({choices}): "))?;
            match answer.parse() {
                Ok(disease) => return Ok(disease),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    /// Ask the yes/no questions, then the optional clinical values
    pub fn ask_questions(&mut self, schema: &FeatureSchema) -> Result<RawInput> {
        let mut input = RawInput::new();
        writeln!(
            self.output,
            "\nAnswer the following questions for {}:\n",
            schema.disease.display_name()
        )?;

        for question in schema.symptoms() {
            loop {
                let answer = self.prompt(&format!("{} (Yes/No): ", question.prompt))?;
                match answer.to_lowercase().as_str() {
                    "yes" => input.set_flag(question.feature, true),
                    "no" => input.set_flag(question.feature, false),
                    _ => {
                        writeln!(self.output, "Please answer Yes or No.")?;
                        continue;
                    }
                }
                break;
            }
        }

        writeln!(self.output, "\nEnter clinical values (press Enter to skip):\n")?;
        for test in schema.clinical_tests() {
            loop {
                let answer = self.prompt(&format!("{}: ", test.label))?;
                match parse_numeric(test.feature, &answer) {
                    Ok(value) => {
                        input.set_value(test.feature, value);
                        break;
                    }
                    Err(RiskError::MalformedInput { .. }) => writeln!(
                        self.output,
                        "Please enter a valid number or press Enter to skip."
                    )?,
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(input)
    }

    /// Print the risk score, confidence and advice
    pub fn report(&mut self, assessment: &Assessment) -> Result<()> {
        let out = &mut self.output;
        writeln!(
            out,
            "\n{} Risk Score: {:.2}%",
            assessment.disease.display_name(),
            assessment.risk
        )?;
        match assessment.accuracy {
            Some(accuracy) => writeln!(out, "Model Accuracy (test set): {accuracy:.2}%")?,
            None => writeln!(out, "Model accuracy not available")?,
        }
        writeln!(out, "Prediction Confidence: {}", assessment.confidence)?;

        writeln!(out, "\nAdvice:")?;
        for line in &assessment.advice {
            writeln!(out, "- {line}")?;
        }
        Ok(())
    }
}

/// Run a full console assessment, asking for the disease when none is given
pub fn run_assessment<R: BufRead, W: Write>(
    engine: &InferenceEngine,
    disease: Option<Disease>,
    input: R,
    output: W,
) -> Result<Assessment> {
    let mut console = Console::new(input, output);
    writeln!(console.output, "\nChronic Disease Risk Assessment\n")?;

    let disease = match disease {
        Some(d) => d,
        None => console.select_disease()?,
    };
    let answers = console.ask_questions(FeatureSchema::for_disease(disease))?;
    let result = engine.compute_risk(disease, &answers)?;
    let assessment = Assessment::new(disease, result);
    console.report(&assessment)?;
    Ok(assessment)
}
