//! Field values stored exactly as they appeared on the wire

use std::borrow::Cow;
use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use num_bigint::BigUint;

use crate::error::ValueError;
use crate::schema::FieldType;

/// The stored bytes of a field together with its declared type
///
/// Values are never decoded eagerly so that serializing a parsed TRE reproduces the original
/// bytes. Numeric accessors decode on demand: text types are read as ASCII decimal, while
/// [`FieldType::UnsignedBigEndian`] and [`FieldType::Ieee754`] are read as binary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldValue {
    bytes: Vec<u8>,
    field_type: FieldType,
}

impl FieldValue {
    /// Wrap stored bytes
    pub fn new(bytes: impl Into<Vec<u8>>, field_type: FieldType) -> Self {
        FieldValue {
            bytes: bytes.into(),
            field_type,
        }
    }

    /// Store an unsigned integer as big endian bytes without leading zeros
    pub fn unsigned(value: &BigUint) -> Self {
        Self::new(value.to_bytes_be(), FieldType::UnsignedBigEndian)
    }

    /// The stored bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The declared type
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Number of stored bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The stored bytes as text, replacing anything that is not UTF-8
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Read the value as a 32 bit signed integer
    pub fn to_i32(&self) -> Result<i32, ValueError> {
        let value = self.to_i64()?;
        i32::try_from(value).map_err(|_| ValueError::Overflow {
            value: value.to_string(),
            kind: "a 32 bit integer",
        })
    }

    /// Read the value as a 64 bit signed integer
    pub fn to_i64(&self) -> Result<i64, ValueError> {
        match self.field_type {
            FieldType::UnsignedBigEndian => {
                let value = self.to_big_uint()?;
                i64::try_from(&value).map_err(|_| ValueError::Overflow {
                    value: value.to_string(),
                    kind: "a 64 bit integer",
                })
            }
            FieldType::Ieee754 => Err(ValueError::NotANumber {
                value: self.text().into_owned(),
                kind: "integer",
            }),
            _ => self
                .decimal("integer")?
                .parse::<i64>()
                .map_err(|_| self.not_a_number("integer")),
        }
    }

    /// Read the value as an unsigned integer of any size
    pub fn to_big_uint(&self) -> Result<BigUint, ValueError> {
        match self.field_type {
            FieldType::UnsignedBigEndian => Ok(BigUint::from_bytes_be(&self.bytes)),
            _ => {
                let text = self.decimal("unsigned integer")?;
                text.strip_prefix('+')
                    .unwrap_or(text)
                    .parse::<BigUint>()
                    .map_err(|_| self.not_a_number("unsigned integer"))
            }
        }
    }

    /// Read the value as a double
    pub fn to_f64(&self) -> Result<f64, ValueError> {
        match self.field_type {
            FieldType::Ieee754 => match self.bytes.len() {
                4 => Ok(BigEndian::read_f32(&self.bytes) as f64),
                8 => Ok(BigEndian::read_f64(&self.bytes)),
                width => Err(ValueError::UnsupportedWidth {
                    width,
                    kind: "an IEEE-754 float",
                }),
            },
            FieldType::UnsignedBigEndian => match self.bytes.len() {
                0 => Ok(0.0),
                width @ 1..=8 => Ok(BigEndian::read_uint(&self.bytes, width) as f64),
                width => Err(ValueError::UnsupportedWidth {
                    width,
                    kind: "a double",
                }),
            },
            _ => self
                .decimal("real")?
                .parse::<f64>()
                .map_err(|_| self.not_a_number("real")),
        }
    }

    fn decimal(&self, kind: &'static str) -> Result<&str, ValueError> {
        std::str::from_utf8(self.bytes.trim_ascii()).map_err(|_| self.not_a_number(kind))
    }

    fn not_a_number(&self, kind: &'static str) -> ValueError {
        ValueError::NotANumber {
            value: self.text().into_owned(),
            kind,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field_type {
            FieldType::UnsignedBigEndian => write!(f, "{}", BigUint::from_bytes_be(&self.bytes)),
            FieldType::Ieee754 => match self.to_f64() {
                Ok(value) => write!(f, "{value}"),
                Err(_) => write!(f, "{:02X?}", self.bytes),
            },
            _ => f.write_str(&self.text()),
        }
    }
}

#[cfg(test)]
mod test {
    use num_bigint::BigUint;
    use pretty_assertions::assert_eq;

    use crate::error::ValueError;
    use crate::schema::FieldType;
    use crate::value::FieldValue;

    #[test]
    fn read_padded_integer() {
        let value = FieldValue::new("0042 ", FieldType::Integer);

        assert_eq!(value.to_i32(), Ok(42));
        assert_eq!(value.to_i64(), Ok(42));
        assert_eq!(value.to_big_uint(), Ok(BigUint::from(42u32)));
    }

    #[test]
    fn read_invalid_integer() {
        let value = FieldValue::new("4X", FieldType::Integer);

        assert_eq!(
            value.to_i64(),
            Err(ValueError::NotANumber {
                value: "4X".into(),
                kind: "integer"
            })
        );
    }

    #[test]
    fn read_integer_out_of_range() {
        let value = FieldValue::new("99999999999", FieldType::Integer);

        assert!(matches!(value.to_i32(), Err(ValueError::Overflow { .. })));
        assert_eq!(value.to_i64(), Ok(99_999_999_999));
    }

    #[test]
    fn read_real() {
        assert_eq!(FieldValue::new("-0012.50", FieldType::Real).to_f64(), Ok(-12.5));
        assert!(FieldValue::new("NaN", FieldType::Real).to_f64().unwrap().is_nan());
    }

    #[test]
    fn read_unsigned_big_endian() {
        let value = FieldValue::new(vec![0x00, 0x00, 0x01, 0x00], FieldType::UnsignedBigEndian);

        assert_eq!(value.to_i64(), Ok(256));
        assert_eq!(value.to_f64(), Ok(256.0));
        assert_eq!(value.to_string(), "256");
    }

    #[test]
    fn read_wide_unsigned_big_endian() {
        #[rustfmt::skip]
        let bytes = vec![
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        let value = FieldValue::new(bytes, FieldType::UnsignedBigEndian);

        assert_eq!(value.to_big_uint(), Ok(BigUint::from(1u8) << 120));
        assert!(matches!(value.to_i64(), Err(ValueError::Overflow { .. })));
        assert_eq!(
            value.to_f64(),
            Err(ValueError::UnsupportedWidth {
                width: 16,
                kind: "a double"
            })
        );
    }

    #[test]
    fn read_ieee754() {
        let single = FieldValue::new(1.5f32.to_be_bytes(), FieldType::Ieee754);
        let double = FieldValue::new((-2.25f64).to_be_bytes(), FieldType::Ieee754);
        let broken = FieldValue::new(vec![0x3F, 0xC0], FieldType::Ieee754);

        assert_eq!(single.to_f64(), Ok(1.5));
        assert_eq!(double.to_f64(), Ok(-2.25));
        assert_eq!(
            broken.to_f64(),
            Err(ValueError::UnsupportedWidth {
                width: 2,
                kind: "an IEEE-754 float"
            })
        );
    }

    #[test]
    fn unsigned_round_trips_through_bytes() {
        let value = FieldValue::unsigned(&BigUint::from(0x4Eu8));

        assert_eq!(value.as_bytes(), &[0x4E]);
        assert_eq!(value.to_i64(), Ok(0x4E));
    }
}
