//! Tabular export of assessments (CSV and JSON)

use serde::Serialize;

use crate::domain::{AssessmentRecord, AuditLogRecord, DomainError, DomainResult};

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Json => "application/json",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// A rendered export: body plus its content type.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub body: String,
    pub content_type: &'static str,
}

#[derive(Serialize)]
struct ExportRow<'a> {
    customer_name: &'a str,
    is_new_customer: bool,
    credit_history: i32,
    income_stability: i32,
    location: i32,
    banking_access: i32,
    referral: i32,
    credit_score: f64,
    risk_category: &'a str,
    recommended_products: &'a str,
    created_at: String,
    assessed_by: &'a str,
}

impl<'a> ExportRow<'a> {
    fn from_record(record: &'a AssessmentRecord) -> Self {
        let a = &record.assessment;
        Self {
            customer_name: &a.customer_name,
            is_new_customer: a.is_new_customer,
            credit_history: a.scores.credit_history,
            income_stability: a.scores.income_stability,
            location: a.scores.location,
            banking_access: a.scores.banking_access,
            referral: a.scores.referral,
            credit_score: a.credit_score,
            risk_category: &a.risk_category,
            recommended_products: &a.recommended_products,
            created_at: a.created_at.to_rfc3339(),
            assessed_by: &record.assessed_by,
        }
    }
}

pub struct AssessmentExporter;

impl AssessmentExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(
        &self,
        records: &[AssessmentRecord],
        format: ExportFormat,
    ) -> DomainResult<ExportOutput> {
        let body = match format {
            ExportFormat::Csv => self.format_csv(records),
            ExportFormat::Json => self.format_json(records)?,
        };
        Ok(ExportOutput {
            body,
            content_type: format.content_type(),
        })
    }

    fn format_csv(&self, records: &[AssessmentRecord]) -> String {
        let mut csv = String::new();
        csv.push_str(
            "customer_name,is_new_customer,credit_history,income_stability,location,\
             banking_access,referral,credit_score,risk_category,recommended_products,\
             created_at,assessed_by\n",
        );

        for record in records {
            let row = ExportRow::from_record(record);
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{:.2},{},{},{},{}\n",
                escape_csv_field(row.customer_name),
                row.is_new_customer,
                row.credit_history,
                row.income_stability,
                row.location,
                row.banking_access,
                row.referral,
                row.credit_score,
                escape_csv_field(row.risk_category),
                escape_csv_field(row.recommended_products),
                row.created_at,
                escape_csv_field(row.assessed_by),
            ));
        }

        csv
    }

    fn format_json(&self, records: &[AssessmentRecord]) -> DomainResult<String> {
        let rows: Vec<ExportRow> = records.iter().map(ExportRow::from_record).collect();
        serde_json::to_string_pretty(&rows)
            .map_err(|e| DomainError::Validation(format!("Serialization error: {}", e)))
    }

    /// CSV rendering of audit entries, newest first.
    pub fn format_audit_csv(&self, records: &[AuditLogRecord]) -> String {
        let mut csv = String::new();
        csv.push_str("timestamp,username,action,details\n");
        for record in records {
            csv.push_str(&format!(
                "{},{},{},{}\n",
                record.entry.created_at.to_rfc3339(),
                escape_csv_field(record.username.as_deref().unwrap_or("")),
                escape_csv_field(&record.entry.action),
                escape_csv_field(record.entry.details.as_deref().unwrap_or("")),
            ));
        }
        csv
    }
}

impl Default for AssessmentExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote a field when it contains commas, quotes or newlines.
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Assessment, ComponentScores};
    use chrono::Utc;

    fn sample_record(customer: &str) -> AssessmentRecord {
        AssessmentRecord {
            assessment: Assessment {
                id: 1,
                user_id: "u1".into(),
                customer_name: customer.into(),
                is_new_customer: true,
                scores: ComponentScores {
                    credit_history: 10,
                    income_stability: 10,
                    location: 10,
                    banking_access: 10,
                    referral: 10,
                },
                credit_score: 10.0,
                risk_category: "Low Risk".into(),
                recommended_products: "All Products".into(),
                created_at: Utc::now(),
            },
            assessed_by: "Field Officer".into(),
        }
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("simple"), "simple");
        assert_eq!(escape_csv_field("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv_field("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv_field("with\nnewline"), "\"with\nnewline\"");
        assert_eq!(escape_csv_field("with\rreturn"), "\"with\rreturn\"");
    }

    #[test]
    fn test_csv_header_and_row_count() {
        let exporter = AssessmentExporter::new();
        let records = vec![sample_record("Jane Banda"), sample_record("Mary, Phiri")];
        let csv = exporter.format_csv(&records);

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("customer_name,is_new_customer"));
        assert!(lines[1].contains("Jane Banda"));
        assert!(lines[2].contains("\"Mary, Phiri\""));
        assert!(lines[1].contains("10.00"));
    }

    #[test]
    fn test_json_export_is_valid() {
        let exporter = AssessmentExporter::new();
        let records = vec![sample_record("Jane Banda")];
        let json = exporter.format_json(&records).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["customer_name"], "Jane Banda");
        assert_eq!(parsed[0]["risk_category"], "Low Risk");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse("xlsx"), None);
    }
}
