use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(DocumentType {
    MasterBill => "master_bill",
    Invoice => "invoice",
});

// Note: the store does not validate this against DocumentType; a master bill
// stored with a reference_number key is persisted as-is.
str_enum!(DocumentUuidType {
    BlNumber => "bl_number",
    ReferenceNumber => "reference_number",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn document_type_round_trip() {
        for (variant, s) in [
            (DocumentType::MasterBill, "master_bill"),
            (DocumentType::Invoice, "invoice"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(DocumentType::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn document_uuid_type_round_trip() {
        for (variant, s) in [
            (DocumentUuidType::BlNumber, "bl_number"),
            (DocumentUuidType::ReferenceNumber, "reference_number"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(DocumentUuidType::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(DocumentType::from_str("house_bill").is_err());
        assert!(DocumentUuidType::from_str("container_number").is_err());
        assert!(DocumentType::from_str("").is_err());
    }
}
