use super::domain::ApplicantProfile;
use super::eligibility::{EligibilityEvaluator, EligibilityVerdict, InvalidAmount};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Verdict for one CSV row; `row` is 1-based and excludes the header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    pub row: usize,
    pub profile: ApplicantProfile,
    pub verdict: EligibilityVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub rows: Vec<BatchRow>,
    pub eligible: usize,
    pub ineligible: usize,
}

#[derive(Debug)]
pub enum BatchError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { row: usize, error: InvalidAmount },
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::Io(err) => write!(f, "failed to read applicant CSV: {}", err),
            BatchError::Csv(err) => write!(f, "invalid applicant CSV data: {}", err),
            BatchError::InvalidRow { row, error } => {
                write!(f, "invalid applicant CSV row {}: {}", row, error)
            }
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Io(err) => Some(err),
            BatchError::Csv(err) => Some(err),
            BatchError::InvalidRow { error, .. } => Some(error),
        }
    }
}

impl From<std::io::Error> for BatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct ApplicantRow {
    income: f64,
    credit_score: u32,
    loan_amount: f64,
    property_value: f64,
}

/// Evaluates every row of a CSV with `income,credit_score,loan_amount,property_value` headers.
pub fn evaluate_csv<R: Read>(
    reader: R,
    evaluator: &EligibilityEvaluator,
) -> Result<BatchReport, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in csv_reader.deserialize::<ApplicantRow>().enumerate() {
        let row = record?;
        let verdict = evaluator
            .evaluate_values(
                row.income,
                row.credit_score,
                row.loan_amount,
                row.property_value,
            )
            .map_err(|error| BatchError::InvalidRow {
                row: index + 1,
                error,
            })?;
        let profile = ApplicantProfile::complete(
            row.income,
            row.credit_score,
            row.loan_amount,
            row.property_value,
        );
        rows.push(BatchRow {
            row: index + 1,
            profile,
            verdict,
        });
    }

    let eligible = rows.iter().filter(|row| row.verdict.eligible).count();
    Ok(BatchReport {
        eligible,
        ineligible: rows.len() - eligible,
        rows,
    })
}

pub fn evaluate_csv_path<P: AsRef<Path>>(
    path: P,
    evaluator: &EligibilityEvaluator,
) -> Result<BatchReport, BatchError> {
    let file = File::open(path)?;
    evaluate_csv(file, evaluator)
}
