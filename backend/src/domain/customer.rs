//! Customer data model.
//!
//! Customers are identified by a database id and, for business purposes, by
//! their phone number, which is unique across the directory. Name, phone and
//! address are validated newtypes so that only well-formed values reach the
//! services and repositories.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum allowed length for a customer name.
pub const CUSTOMER_NAME_MAX: usize = 100;
/// Maximum allowed length for a phone number.
pub const PHONE_MAX: usize = 20;
/// Maximum allowed length for an address.
pub const ADDRESS_MAX: usize = 200;

/// Validation errors returned by customer constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerValidationError {
    EmptyName,
    NameTooLong { max: usize },
    EmptyPhone,
    PhoneTooLong { max: usize },
    EmptyAddress,
    AddressTooLong { max: usize },
}

impl CustomerValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyPhone | Self::PhoneTooLong { .. } => "phone",
            Self::EmptyAddress | Self::AddressTooLong { .. } => "address",
        }
    }

    /// Stable machine-readable code for the failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::EmptyPhone | Self::EmptyAddress => "blank",
            Self::NameTooLong { .. } | Self::PhoneTooLong { .. } | Self::AddressTooLong { .. } => {
                "too_long"
            }
        }
    }
}

impl fmt::Display for CustomerValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "customer name must not be blank"),
            Self::NameTooLong { max } => {
                write!(f, "customer name must be at most {max} characters")
            }
            Self::EmptyPhone => write!(f, "phone must not be blank"),
            Self::PhoneTooLong { max } => write!(f, "phone must be at most {max} characters"),
            Self::EmptyAddress => write!(f, "address must not be blank"),
            Self::AddressTooLong { max } => write!(f, "address must be at most {max} characters"),
        }
    }
}

impl std::error::Error for CustomerValidationError {}

fn bounded_text(
    value: &str,
    max: usize,
    empty: CustomerValidationError,
    too_long: CustomerValidationError,
) -> Result<String, CustomerValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > max {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

/// Database identifier of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i64);

impl CustomerId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Customer display name, trimmed, non-blank and at most
/// [`CUSTOMER_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerName(String);

impl CustomerName {
    /// Validate and construct a [`CustomerName`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, CustomerValidationError> {
        bounded_text(
            value.as_ref(),
            CUSTOMER_NAME_MAX,
            CustomerValidationError::EmptyName,
            CustomerValidationError::NameTooLong {
                max: CUSTOMER_NAME_MAX,
            },
        )
        .map(Self)
    }
}

/// Customer phone number, trimmed, non-blank and at most [`PHONE_MAX`]
/// characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate and construct a [`PhoneNumber`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, CustomerValidationError> {
        bounded_text(
            value.as_ref(),
            PHONE_MAX,
            CustomerValidationError::EmptyPhone,
            CustomerValidationError::PhoneTooLong { max: PHONE_MAX },
        )
        .map(Self)
    }
}

/// Delivery address, trimmed, non-blank and at most [`ADDRESS_MAX`]
/// characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Validate and construct an [`Address`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, CustomerValidationError> {
        bounded_text(
            value.as_ref(),
            ADDRESS_MAX,
            CustomerValidationError::EmptyAddress,
            CustomerValidationError::AddressTooLong { max: ADDRESS_MAX },
        )
        .map(Self)
    }
}

macro_rules! text_newtype_conversions {
    ($($name:ident),* $(,)?) => {
        $(
            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    self.0.as_str()
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<$name> for String {
                fn from(value: $name) -> Self {
                    value.0
                }
            }

            impl TryFrom<String> for $name {
                type Error = CustomerValidationError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::new(value)
                }
            }
        )*
    };
}

text_newtype_conversions!(CustomerName, PhoneNumber, Address);

/// Validated customer fields supplied by callers before an id exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: CustomerName,
    pub phone: PhoneNumber,
    pub address: Address,
}

impl CustomerDetails {
    /// Validate raw inputs into customer details.
    ///
    /// # Examples
    /// ```
    /// use orders_backend::domain::CustomerDetails;
    ///
    /// let details = CustomerDetails::try_from_parts(" Ana ", "111", "Rua A, 1").unwrap();
    /// assert_eq!(details.name.as_ref(), "Ana");
    /// ```
    pub fn try_from_parts(
        name: &str,
        phone: &str,
        address: &str,
    ) -> Result<Self, CustomerValidationError> {
        Ok(Self {
            name: CustomerName::new(name)?,
            phone: PhoneNumber::new(phone)?,
            address: Address::new(address)?,
        })
    }
}

/// Persisted customer record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: CustomerName,
    pub phone: PhoneNumber,
    pub address: Address,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Overwrite name and address in place. The phone is immutable once the
    /// customer exists.
    pub fn refresh_contact(&mut self, details: &CustomerDetails) {
        self.name = details.name.clone();
        self.address = details.address.clone();
    }

    /// Replace every editable field, phone included.
    pub fn apply(&mut self, details: CustomerDetails) {
        let CustomerDetails {
            name,
            phone,
            address,
        } = details;
        self.name = name;
        self.phone = phone;
        self.address = address;
    }
}
