//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `invalid_request` (or `invalid_product_code`)
//! [`Error`] whose `details` carry `{field, code[, index][, value]}` so
//! clients can highlight the offending input.

use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};

use crate::domain::{
    AMOUNT_SCALE, CustomerDetails, CustomerValidationError, Error, MAX_AMOUNT, MAX_QUANTITY,
    Product,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    Negative,
    OutOfRange,
    TooPrecise,
    InvalidTimestamp,
    UnknownProduct,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::Negative => "negative",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::TooPrecise => "too_precise",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::UnknownProduct => "unknown_product",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const PHONE: FieldName = FieldName::new("phone");
pub(crate) const ADDRESS: FieldName = FieldName::new("address");
pub(crate) const PRODUCT: FieldName = FieldName::new("product");
pub(crate) const QUANTITY: FieldName = FieldName::new("quantity");
pub(crate) const UNIT_PRICE: FieldName = FieldName::new("unitPrice");
pub(crate) const DELIVERY_AT: FieldName = FieldName::new("deliveryAt");
pub(crate) const DELIVERY_FEE: FieldName = FieldName::new("deliveryFee");
pub(crate) const ORDER_ID: FieldName = FieldName::new("orderId");

/// Builder for validation error details with field context.
struct ValidationError {
    field: &'static str,
    message: String,
    index: Option<usize>,
    value: Option<Value>,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
            index: None,
            value: None,
        }
    }

    fn at(mut self, index: Option<usize>) -> Self {
        self.index = index;
        self
    }

    fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    fn details(&self, code: &str) -> Value {
        let mut details = Map::new();
        details.insert("field".to_owned(), json!(self.field));
        details.insert("code".to_owned(), json!(code));
        if let Some(index) = self.index {
            details.insert("index".to_owned(), json!(index));
        }
        if let Some(value) = &self.value {
            details.insert("value".to_owned(), value.clone());
        }
        Value::Object(details)
    }

    fn with_code(self, code: ErrorCode) -> Error {
        let details = self.details(code.as_str());
        Error::invalid_request(self.message).with_details(details)
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    ValidationError::new(field, format!("missing required field: {}", field.as_str()))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Map a customer value-object failure onto the request field it came from.
pub(crate) fn customer_validation_error(err: CustomerValidationError) -> Error {
    let details = json!({ "field": err.field(), "code": err.code() });
    Error::invalid_request(err.to_string()).with_details(details)
}

/// Build validated customer details from optional payload fields.
pub(crate) fn parse_customer_details(
    name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
) -> Result<CustomerDetails, Error> {
    let name = require(name, NAME)?;
    let phone = require(phone, PHONE)?;
    let address = require(address, ADDRESS)?;
    CustomerDetails::try_from_parts(&name, &phone, &address).map_err(customer_validation_error)
}

/// Resolve a catalog code, rejecting unknown values with
/// `invalid_product_code`.
pub(crate) fn parse_product(
    value: &str,
    field: FieldName,
    index: Option<usize>,
) -> Result<Product, Error> {
    Product::lookup(value).map_err(|err| {
        let details = ValidationError::new(field, err.to_string())
            .at(index)
            .value(value)
            .details(ErrorCode::UnknownProduct.as_str());
        Error::invalid_product_code(err.to_string()).with_details(details)
    })
}

/// Accept quantities from zero up to [`MAX_QUANTITY`].
pub(crate) fn parse_quantity(value: i64, index: Option<usize>) -> Result<u32, Error> {
    let quantity = u32::try_from(value).ok().filter(|q| *q <= MAX_QUANTITY);
    quantity.ok_or_else(|| {
        let (message, code) = if value < 0 {
            ("quantity must not be negative".to_owned(), ErrorCode::Negative)
        } else {
            (
                format!("quantity must not exceed {MAX_QUANTITY}"),
                ErrorCode::OutOfRange,
            )
        };
        ValidationError::new(QUANTITY, message)
            .at(index)
            .value(value)
            .with_code(code)
    })
}

/// Accept money amounts between zero and [`MAX_AMOUNT`] with at most
/// [`AMOUNT_SCALE`] decimal places. Trailing zeros do not count.
pub(crate) fn non_negative_amount(
    value: Option<Decimal>,
    field: FieldName,
    index: Option<usize>,
) -> Result<Option<Decimal>, Error> {
    let Some(amount) = value else {
        return Ok(None);
    };
    let name = field.as_str();
    let rejection = if amount < Decimal::ZERO {
        Some((format!("{name} must not be negative"), ErrorCode::Negative))
    } else if amount > MAX_AMOUNT {
        Some((
            format!("{name} must not exceed {MAX_AMOUNT}"),
            ErrorCode::OutOfRange,
        ))
    } else if amount.normalize().scale() > AMOUNT_SCALE {
        Some((
            format!("{name} must have at most {AMOUNT_SCALE} decimal places"),
            ErrorCode::TooPrecise,
        ))
    } else {
        None
    };
    match rejection {
        Some((message, code)) => Err(ValidationError::new(field, message)
            .at(index)
            .value(amount.to_string())
            .with_code(code)),
        None => Ok(Some(amount)),
    }
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    ValidationError::new(
        field,
        format!("{} must be an ISO-8601 date-time", field.as_str()),
    )
    .value(value)
    .with_code(ErrorCode::InvalidTimestamp)
}

/// Parse an ISO-8601 local date-time (`2024-01-10T12:00:00`). Values with an
/// offset keep their wall-clock time.
pub(crate) fn parse_datetime(value: &str, field: FieldName) -> Result<NaiveDateTime, Error> {
    let trimmed = value.trim();
    trimmed
        .parse::<NaiveDateTime>()
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.naive_local()))
        .map_err(|_| invalid_timestamp_error(field, value))
}

/// Parse an optional date-time; blank strings count as absent.
pub(crate) fn parse_optional_datetime(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveDateTime>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_datetime(raw, field))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn detail<'a>(err: &'a Error, key: &str) -> Option<&'a Value> {
        err.details().and_then(|d| d.get(key))
    }

    #[rstest]
    fn missing_field_names_the_field() {
        let err = missing_field_error(PHONE);
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some(&json!("phone")));
        assert_eq!(detail(&err, "code"), Some(&json!("missing_field")));
        assert!(detail(&err, "index").is_none());
    }

    #[rstest]
    #[case(Some("Ana"), Some("   "), Some("Rua A"), "phone", "blank")]
    #[case(None, Some("111"), Some("Rua A"), "name", "missing_field")]
    #[case(Some("Ana"), Some("111"), Some(""), "address", "blank")]
    fn customer_details_errors_point_at_the_field(
        #[case] name: Option<&str>,
        #[case] phone: Option<&str>,
        #[case] address: Option<&str>,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let err = parse_customer_details(
            name.map(str::to_owned),
            phone.map(str::to_owned),
            address.map(str::to_owned),
        )
        .expect_err("invalid customer");
        assert_eq!(detail(&err, "field"), Some(&json!(field)));
        assert_eq!(detail(&err, "code"), Some(&json!(code)));
    }

    #[rstest]
    fn overlong_address_is_too_long() {
        let err = parse_customer_details(
            Some("Ana".to_owned()),
            Some("111".to_owned()),
            Some("x".repeat(201)),
        )
        .expect_err("too long");
        assert_eq!(detail(&err, "field"), Some(&json!("address")));
        assert_eq!(detail(&err, "code"), Some(&json!("too_long")));
    }

    #[rstest]
    fn unknown_product_is_invalid_product_code() {
        let err = parse_product("PICANHA", PRODUCT, Some(2)).expect_err("unknown");
        assert_eq!(err.code(), DomainCode::InvalidProductCode);
        assert_eq!(detail(&err, "index"), Some(&json!(2)));
        assert_eq!(detail(&err, "value"), Some(&json!("PICANHA")));
    }

    #[rstest]
    #[case(0, Some(0))]
    #[case(5, Some(5))]
    #[case(2_147_483_647, Some(2_147_483_647))]
    #[case(-1, None)]
    #[case(2_147_483_648, None)]
    #[case(3_000_000_000, None)]
    fn quantities_must_fit_storage(#[case] raw: i64, #[case] expected: Option<u32>) {
        assert_eq!(parse_quantity(raw, None).ok(), expected);
    }

    #[rstest]
    #[case(-1, "negative")]
    #[case(3_000_000_000, "out_of_range")]
    fn rejected_quantities_carry_a_code(#[case] raw: i64, #[case] code: &str) {
        let err = parse_quantity(raw, Some(1)).expect_err("rejected");
        assert_eq!(detail(&err, "field"), Some(&json!("quantity")));
        assert_eq!(detail(&err, "code"), Some(&json!(code)));
        assert_eq!(detail(&err, "index"), Some(&json!(1)));
    }

    #[rstest]
    #[case(Some(dec!(0)), true)]
    #[case(Some(dec!(7.5)), true)]
    #[case(Some(dec!(7.500)), true)]
    #[case(None, true)]
    #[case(Some(dec!(9999999999.99)), true)]
    #[case(Some(dec!(-0.01)), false)]
    #[case(Some(dec!(10000000000)), false)]
    #[case(Some(dec!(0.335)), false)]
    fn amounts_must_be_storable(#[case] value: Option<Decimal>, #[case] ok: bool) {
        assert_eq!(non_negative_amount(value, DELIVERY_FEE, None).is_ok(), ok);
    }

    #[rstest]
    #[case(dec!(-1), "negative")]
    #[case(dec!(10000000000000000000000000000), "out_of_range")]
    #[case(dec!(20.125), "too_precise")]
    fn rejected_amounts_carry_a_code(#[case] amount: Decimal, #[case] code: &str) {
        let err = non_negative_amount(Some(amount), UNIT_PRICE, Some(0)).expect_err("rejected");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some(&json!("unitPrice")));
        assert_eq!(detail(&err, "code"), Some(&json!(code)));
    }

    #[rstest]
    #[case("2024-01-10T12:30:00")]
    #[case("2024-01-10T12:30:00Z")]
    #[case("2024-01-10T12:30:00-03:00")]
    fn datetimes_accept_local_and_offset_forms(#[case] raw: &str) {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 10).and_then(|d| d.and_hms_opt(12, 30, 0));
        assert_eq!(parse_datetime(raw, DELIVERY_AT).ok(), expected);
    }

    #[rstest]
    fn invalid_datetime_reports_value() {
        let err = parse_datetime("10/01/2024", DELIVERY_AT).expect_err("invalid");
        assert_eq!(detail(&err, "code"), Some(&json!("invalid_timestamp")));
        assert_eq!(detail(&err, "value"), Some(&json!("10/01/2024")));
    }

    #[rstest]
    fn blank_optional_datetime_is_absent() {
        assert_eq!(parse_optional_datetime(Some("  "), DELIVERY_AT).ok(), Some(None));
    }
}
