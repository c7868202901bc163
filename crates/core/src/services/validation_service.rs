use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::category::{CategoryInput, CategoryPatch, CategoryType};
use crate::models::settings::ValidationLimits;
use crate::models::transaction::{TransactionInput, TransactionPatch};
use crate::models::validation::{Field, FieldError, FieldResult, ValidationReport};

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("invalid html tag regex"));

static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("invalid date regex"));

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").expect("invalid color regex")
});

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// Field-level checks for everything a user can type into a form.
///
/// Each `validate_*` field check is a pure predicate returning the first
/// problem it finds. The two `*_input` aggregates run every relevant
/// field check and collect all failures, so a form can show every error
/// at once. Nothing here panics or touches shared state.
#[derive(Debug, Clone, Default)]
pub struct ValidationService {
    limits: ValidationLimits,
}

impl ValidationService {
    /// Validator with the default limits (10 billion max amount, etc.).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    #[must_use]
    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    // ── Numbers ─────────────────────────────────────────────────────

    /// A transaction amount: finite, positive, at most the ceiling, and a
    /// whole number. Fractions are rejected, never rounded.
    pub fn validate_amount(&self, amount: f64) -> FieldResult {
        if !amount.is_finite() {
            return Err(FieldError::NotFinite);
        }
        if amount <= 0.0 {
            return Err(FieldError::NotPositive);
        }
        if amount > self.limits.max_amount as f64 {
            return Err(FieldError::AmountTooLarge {
                max: self.limits.max_amount,
            });
        }
        if amount.fract() != 0.0 {
            return Err(FieldError::Fractional);
        }
        Ok(())
    }

    /// A target weight in percent, 0..=100 inclusive.
    pub fn validate_target_percent(&self, percent: f64) -> FieldResult {
        if !percent.is_finite() {
            return Err(FieldError::NotFinite);
        }
        if !(0.0..=100.0).contains(&percent) {
            return Err(FieldError::PercentOutOfRange { min: 0, max: 100 });
        }
        Ok(())
    }

    // ── Text ────────────────────────────────────────────────────────

    pub fn validate_category_name(&self, name: &str) -> FieldResult {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(FieldError::Empty);
        }
        if trimmed.chars().count() > self.limits.max_category_name_len {
            return Err(FieldError::TooLong {
                max: self.limits.max_category_name_len,
            });
        }
        reject_html(trimmed)
    }

    /// An optional note; absent or blank is fine. Checked after trimming,
    /// which is the form it is stored in.
    pub fn validate_description(&self, description: Option<&str>) -> FieldResult {
        let Some(text) = description.map(str::trim).filter(|d| !d.is_empty()) else {
            return Ok(());
        };
        if text.chars().count() > self.limits.max_description_len {
            return Err(FieldError::TooLong {
                max: self.limits.max_description_len,
            });
        }
        reject_html(text)
    }

    /// `#RGB` or `#RRGGBB`.
    pub fn validate_color(&self, color: &str) -> FieldResult {
        if HEX_COLOR.is_match(color) {
            Ok(())
        } else {
            Err(FieldError::InvalidColor)
        }
    }

    /// A `local@domain.tld` shape check, not a full RFC 5322 parser.
    pub fn validate_email(&self, email: &str) -> FieldResult {
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(FieldError::Empty);
        }
        if !EMAIL_SHAPE.is_match(trimmed) {
            return Err(FieldError::InvalidEmail);
        }
        if trimmed.chars().count() > self.limits.max_email_len {
            return Err(FieldError::TooLong {
                max: self.limits.max_email_len,
            });
        }
        Ok(())
    }

    pub fn validate_password(&self, password: &str) -> FieldResult {
        let len = password.chars().count();
        if len == 0 {
            return Err(FieldError::Empty);
        }
        if len < self.limits.min_password_len {
            return Err(FieldError::TooShort {
                min: self.limits.min_password_len,
            });
        }
        if len > self.limits.max_password_len {
            return Err(FieldError::TooLong {
                max: self.limits.max_password_len,
            });
        }
        Ok(())
    }

    // ── Dates ───────────────────────────────────────────────────────

    /// Validate a `YYYY-MM-DD` date against the local calendar date.
    pub fn validate_date(&self, date: &str) -> FieldResult {
        self.validate_date_at(date, Local::now().date_naive())
    }

    /// Validate a `YYYY-MM-DD` date relative to `today`.
    ///
    /// The date must exist (leap years respected), be no later than
    /// `today` plus the future window, and strictly later than `today`
    /// minus the past window.
    pub fn validate_date_at(&self, date: &str, today: NaiveDate) -> FieldResult {
        self.parse_date_at(date, today).map(|_| ())
    }

    /// Same checks as [`validate_date_at`](Self::validate_date_at), returning the parsed date.
    pub fn parse_date_at(&self, date: &str, today: NaiveDate) -> Result<NaiveDate, FieldError> {
        if !DATE_SHAPE.is_match(date) {
            return Err(FieldError::InvalidDateFormat);
        }

        // The shape check guarantees three all-digit parts.
        let mut parts = date.split('-').map(str::parse::<u32>);
        let (Some(Ok(year)), Some(Ok(month)), Some(Ok(day))) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(FieldError::InvalidDateFormat);
        };

        if !(1..=12).contains(&month) {
            return Err(FieldError::InvalidMonth);
        }
        let parsed = NaiveDate::from_ymd_opt(year as i32, month, day).ok_or(FieldError::InvalidDay)?;

        if let Some(latest) = shift_years(today, self.limits.max_future_years as i32) {
            if parsed > latest {
                return Err(FieldError::TooFarInFuture);
            }
        }
        if let Some(earliest) = shift_years(today, -(self.limits.max_past_years as i32)) {
            if parsed <= earliest {
                return Err(FieldError::TooFarInPast);
            }
        }

        Ok(parsed)
    }

    // ── Whole forms ─────────────────────────────────────────────────

    /// Check a transaction form; every field is checked.
    ///
    /// `category_id` and `amount` are required. Date and description are
    /// only checked when present and non-empty.
    pub fn validate_transaction_input(
        &self,
        input: &TransactionInput,
        today: NaiveDate,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();

        if input.category_id.is_none() {
            report.insert(Field::CategoryId, FieldError::Missing);
        }

        match input.amount {
            Some(amount) => report.check(Field::Amount, self.validate_amount(amount)),
            None => report.insert(Field::Amount, FieldError::Missing),
        }

        if let Some(date) = input.transaction_date.as_deref().filter(|d| !d.is_empty()) {
            report.check(Field::TransactionDate, self.validate_date_at(date, today));
        }

        report.check(
            Field::Description,
            self.validate_description(input.description.as_deref()),
        );

        report
    }

    /// Check a category form; every field is checked.
    ///
    /// Name and type are required. Target percent and color are only
    /// checked when supplied.
    pub fn validate_category_input(&self, input: &CategoryInput) -> ValidationReport {
        let mut report = ValidationReport::new();

        report.check(Field::Name, self.validate_category_name(&input.name));

        if input.category_type.parse::<CategoryType>().is_err() {
            report.insert(Field::Type, FieldError::InvalidCategoryType);
        }

        if let Some(percent) = input.target_percent {
            report.check(Field::TargetPercent, self.validate_target_percent(percent));
        }

        if let Some(color) = input.color.as_deref().filter(|c| !c.is_empty()) {
            report.check(Field::Color, self.validate_color(color));
        }

        report
    }

    /// Check only the fields a transaction update actually sets.
    pub fn validate_transaction_patch(
        &self,
        patch: &TransactionPatch,
        today: NaiveDate,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();

        if let Some(amount) = patch.amount {
            report.check(Field::Amount, self.validate_amount(amount));
        }
        if let Some(date) = patch.transaction_date.as_deref() {
            report.check(Field::TransactionDate, self.validate_date_at(date, today));
        }
        if let Some(description) = &patch.description {
            report.check(
                Field::Description,
                self.validate_description(description.as_deref()),
            );
        }

        report
    }

    /// Check only the fields a category update actually sets.
    pub fn validate_category_patch(&self, patch: &CategoryPatch) -> ValidationReport {
        let mut report = ValidationReport::new();

        if let Some(name) = patch.name.as_deref() {
            report.check(Field::Name, self.validate_category_name(name));
        }
        if let Some(percent) = patch.target_percent {
            report.check(Field::TargetPercent, self.validate_target_percent(percent));
        }
        if let Some(color) = patch.color.as_deref().filter(|c| !c.is_empty()) {
            report.check(Field::Color, self.validate_color(color));
        }

        report
    }

    // ── Output ──────────────────────────────────────────────────────

    /// Escape `& < > " '` for text rendered outside an auto-escaping context.
    #[must_use]
    pub fn escape_html(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#039;"),
                other => out.push(other),
            }
        }
        out
    }
}

/// Same month and day `years` away; Feb 29 rolls over to Mar 1 in a
/// non-leap year.
fn shift_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

fn reject_html(text: &str) -> FieldResult {
    if HTML_TAG.is_match(text) {
        Err(FieldError::ContainsHtml)
    } else {
        Ok(())
    }
}
