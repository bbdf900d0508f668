//! Startup validation of the resolved configuration

use crate::schema::{Configuration, DEFAULT_REGION};
use std::ops::ControlFlow;
use tracing::{debug, info, warn};
use types::{ConfigError, RegionResolver};

/// Startup validator.
///
/// Checks run in a fixed order. Warnings are collected and processing
/// continues; the first fatal issue stops the sequence.
pub struct StartupValidator;

impl StartupValidator {
    /// Validate `config`, filling in the region when it is empty
    pub async fn validate(
        mut config: Configuration,
        resolver: &dyn RegionResolver,
    ) -> ValidationOutcome {
        let mut report = ValidationReport::new();

        Self::warn_missing_credentials(&config, &mut report);

        if Self::require_bucket(&config, &mut report).is_break() {
            return ValidationOutcome { config, report };
        }

        Self::resolve_region(&mut config, resolver, &mut report).await;

        if Self::require_endpoint(&config, &mut report).is_break()
            || Self::require_credentials(&config, &mut report).is_break()
        {
            return ValidationOutcome { config, report };
        }

        info!(endpoint = %config.s3_endpoint, "S3 endpoint");
        info!(region = %config.aws_region, "AWS region");
        info!(bucket = %config.s3_bucket, "S3 bucket");

        ValidationOutcome { config, report }
    }

    fn warn_missing_credentials(config: &Configuration, report: &mut ValidationReport) {
        if config.s3_access_key_id.is_empty() {
            report.add_warning(
                "s3_access_key_id",
                IssueKind::MissingOptionalField,
                "Access key id is not defined (AWS_ACCESS_KEY_ID)",
            );
        }
        if config.s3_access_secret_key.is_empty() {
            report.add_warning(
                "s3_access_secret_key",
                IssueKind::MissingOptionalField,
                "Secret access key is not defined (AWS_SECRET_ACCESS_KEY)",
            );
        }
    }

    fn require_bucket(config: &Configuration, report: &mut ValidationReport) -> ControlFlow<()> {
        if config.s3_bucket.is_empty() {
            report.add_error(
                "s3_bucket",
                IssueKind::MissingMandatoryField,
                "Bucket name is required (AWS_S3_BUCKET)",
            );
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    async fn resolve_region(
        config: &mut Configuration,
        resolver: &dyn RegionResolver,
        report: &mut ValidationReport,
    ) {
        if !config.aws_region.is_empty() {
            return;
        }

        config.aws_region = DEFAULT_REGION.to_string();

        match resolver.guess(&config.s3_bucket).await {
            Ok(region) if !region.is_empty() => {
                debug!(resolver = resolver.name(), region = %region, "Bucket region guessed");
                config.aws_region = region;
            }
            Ok(_) => {
                report.add_warning(
                    "aws_region",
                    IssueKind::RegionLookupFailure,
                    &format!("Region lookup returned nothing, using {}", DEFAULT_REGION),
                );
            }
            Err(e) => {
                report.add_warning(
                    "aws_region",
                    IssueKind::RegionLookupFailure,
                    &format!("{}, using {}", e, DEFAULT_REGION),
                );
            }
        }
    }

    fn require_endpoint(config: &Configuration, report: &mut ValidationReport) -> ControlFlow<()> {
        if config.s3_endpoint.is_empty() {
            report.add_error(
                "s3_endpoint",
                IssueKind::MissingMandatoryField,
                "S3 endpoint is not defined in the configuration",
            );
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    fn require_credentials(
        config: &Configuration,
        report: &mut ValidationReport,
    ) -> ControlFlow<()> {
        if config.s3_access_key_id.is_empty() || config.s3_access_secret_key.is_empty() {
            report.add_error(
                "s3_credentials",
                IssueKind::MissingMandatoryField,
                "Access credentials (access key id and secret key) are not defined in the configuration",
            );
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }
}

/// Classification of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// Mandatory field empty; fatal
    MissingMandatoryField,
    /// Optional field empty; warning
    MissingOptionalField,
    /// Region lookup failed; warning, baseline kept
    RegionLookupFailure,
}

/// Validated configuration and the issues found on the way
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub config: Configuration,
    pub report: ValidationReport,
}

impl ValidationOutcome {
    /// Fail with the first fatal issue, if any
    pub fn into_ready(self) -> Result<(Configuration, ValidationReport), ConfigError> {
        match self.report.errors.first() {
            Some(issue) => Err(ConfigError::MissingField {
                field: issue.field.clone(),
            }),
            None => Ok((self.config, self.report)),
        }
    }
}

/// Validation report containing errors and warnings
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// A validation issue (error or warning)
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub kind: IssueKind,
    pub message: String,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, kind: IssueKind, message: &str) {
        self.errors.push(ValidationIssue {
            field: field.to_string(),
            kind,
            message: message.to_string(),
        });
    }

    pub fn add_warning(&mut self, field: &str, kind: IssueKind, message: &str) {
        warn!(field = field, "{}", message);
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            kind,
            message: message.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn summary(&self) -> String {
        format!("Validation: {} errors, {} warnings", self.errors.len(), self.warnings.len())
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}
