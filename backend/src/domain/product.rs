//! Fixed product catalog.
//!
//! The catalog is compiled into the process: eight products, each with a
//! stable code, a display description and a unit price. Nothing is created or
//! destroyed at runtime, so lookups are pure functions over a static table.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sellable product from the closed catalog.
///
/// Serialised as its code string (for example `"FILE"`).
///
/// # Examples
/// ```
/// use orders_backend::domain::Product;
///
/// let product = Product::lookup("TIRAS").expect("catalog code");
/// assert_eq!(product.description(), "Filé de Tilápia em tiras");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Product {
    /// 1 kg tilapia fillet.
    File,
    /// 500 g tilapia fillet.
    MeioFile,
    /// Tilapia fillet strips.
    Tiras,
    /// Tilapia ribs.
    Costelinha,
    /// Whole butterflied tilapia.
    Espalmada,
    /// Breaded tilapia bites.
    Empanadinho,
    /// Fillet and strips combo.
    Combo,
    /// Seasoning.
    Tempero,
}

/// Error returned when a code does not name a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown product code: {code}")]
pub struct UnknownProductError {
    /// The unrecognised input value.
    pub code: String,
}

impl Product {
    /// Every catalog product in declaration order.
    pub const ALL: [Product; 8] = [
        Self::File,
        Self::MeioFile,
        Self::Tiras,
        Self::Costelinha,
        Self::Espalmada,
        Self::Empanadinho,
        Self::Combo,
        Self::Tempero,
    ];

    /// Stable catalog code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::File => "FILE",
            Self::MeioFile => "MEIOFILE",
            Self::Tiras => "TIRAS",
            Self::Costelinha => "COSTELINHA",
            Self::Espalmada => "ESPALMADA",
            Self::Empanadinho => "EMPANADINHO",
            Self::Combo => "COMBO",
            Self::Tempero => "TEMPERO",
        }
    }

    /// Display description shown to customers.
    pub const fn description(self) -> &'static str {
        match self {
            Self::File => "Filé de Tilápia - 1kg",
            Self::MeioFile => "Filé de Tilápia - 500g",
            Self::Tiras => "Filé de Tilápia em tiras",
            Self::Costelinha => "Costelinha de Tilápia",
            Self::Espalmada => "Tilápia inteira espalmada",
            Self::Empanadinho => "Empanadinho de Tilápia",
            Self::Combo => "Filé + Tiras",
            Self::Tempero => "Tempero Supreme",
        }
    }

    /// Catalog unit price.
    pub fn unit_price(self) -> Decimal {
        let cents = match self {
            Self::File => 5390,
            Self::MeioFile => 2990,
            Self::Tiras => 2490,
            Self::Costelinha => 2690,
            Self::Espalmada => 3190,
            Self::Empanadinho => 3490,
            Self::Combo => 5190,
            Self::Tempero => 300,
        };
        Decimal::new(cents, 2)
    }

    /// Resolve a catalog code.
    ///
    /// # Errors
    /// Returns [`UnknownProductError`] when `code` names no product.
    pub fn lookup(code: &str) -> Result<Self, UnknownProductError> {
        Self::ALL
            .into_iter()
            .find(|product| product.code() == code)
            .ok_or_else(|| UnknownProductError {
                code: code.to_owned(),
            })
    }

    /// All products in stable declaration order.
    pub fn list_all() -> &'static [Product] {
        &Self::ALL
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Product {
    type Err = UnknownProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

impl TryFrom<String> for Product {
    type Error = UnknownProductError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::lookup(&value)
    }
}

impl From<Product> for String {
    fn from(value: Product) -> Self {
        value.code().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("FILE", Product::File, dec!(53.90))]
    #[case("MEIOFILE", Product::MeioFile, dec!(29.90))]
    #[case("TIRAS", Product::Tiras, dec!(24.90))]
    #[case("COSTELINHA", Product::Costelinha, dec!(26.90))]
    #[case("ESPALMADA", Product::Espalmada, dec!(31.90))]
    #[case("EMPANADINHO", Product::Empanadinho, dec!(34.90))]
    #[case("COMBO", Product::Combo, dec!(51.90))]
    #[case("TEMPERO", Product::Tempero, dec!(3.00))]
    fn lookup_resolves_codes_and_prices(
        #[case] code: &str,
        #[case] expected: Product,
        #[case] price: Decimal,
    ) {
        let product = Product::lookup(code).expect("known code");
        assert_eq!(product, expected);
        assert_eq!(product.unit_price(), price);
        assert_eq!(product.code(), code);
    }

    #[rstest]
    #[case("UNKNOWN")]
    #[case("file")]
    #[case("")]
    fn lookup_rejects_unknown_codes(#[case] code: &str) {
        let err = Product::lookup(code).expect_err("unknown code");
        assert_eq!(err.code, code);
    }

    #[test]
    fn list_all_keeps_declaration_order() {
        let codes: Vec<&str> = Product::list_all().iter().map(|p| p.code()).collect();
        assert_eq!(
            codes,
            [
                "FILE",
                "MEIOFILE",
                "TIRAS",
                "COSTELINHA",
                "ESPALMADA",
                "EMPANADINHO",
                "COMBO",
                "TEMPERO"
            ]
        );
    }

    #[test]
    fn serde_uses_code_strings() {
        let json = serde_json::to_string(&Product::Combo).expect("serialise");
        assert_eq!(json, "\"COMBO\"");
        let parsed: Product = serde_json::from_str("\"TEMPERO\"").expect("deserialise");
        assert_eq!(parsed, Product::Tempero);
        assert!(serde_json::from_str::<Product>("\"NOPE\"").is_err());
    }
}
