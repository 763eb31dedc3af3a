use crate::{SqlType, separated_by, types};
use rust_decimal::Decimal;
use std::fmt::{self, Display, Write};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed datum exchanged with the driver.
///
/// Every variant except `Null` wraps an `Option` so that a NULL of a specific
/// type can be represented (and bound with the right type by the driver).
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Int128(Option<i128>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    UInt128(Option<u128>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>, /* prec: */ u8, /* scale: */ u8),
    Char(Option<char>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
    List(Option<Vec<Value>>, /* type: */ Box<Value>),
    Struct(Option<Vec<Value>>, /* type_name: */ String),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int8(l), Self::Int8(r)) => l == r,
            (Self::Int16(l), Self::Int16(r)) => l == r,
            (Self::Int32(l), Self::Int32(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::Int128(l), Self::Int128(r)) => l == r,
            (Self::UInt8(l), Self::UInt8(r)) => l == r,
            (Self::UInt16(l), Self::UInt16(r)) => l == r,
            (Self::UInt32(l), Self::UInt32(r)) => l == r,
            (Self::UInt64(l), Self::UInt64(r)) => l == r,
            (Self::UInt128(l), Self::UInt128(r)) => l == r,
            (Self::Float32(l), Self::Float32(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Decimal(l, l_prec, l_scale), Self::Decimal(r, r_prec, r_scale)) => {
                l == r && l_prec == r_prec && l_scale == r_scale
            }
            (Self::Char(l), Self::Char(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            (Self::Blob(l), Self::Blob(r)) => l == r,
            (Self::Date(l), Self::Date(r)) => l == r,
            (Self::Time(l), Self::Time(r)) => l == r,
            (Self::Timestamp(l), Self::Timestamp(r)) => l == r,
            (Self::TimestampWithTimezone(l), Self::TimestampWithTimezone(r)) => l == r,
            (Self::Uuid(l), Self::Uuid(r)) => l == r,
            (Self::List(l, ..), Self::List(r, ..)) => l == r && self.same_type(other),
            (Self::Struct(l, ..), Self::Struct(r, ..)) => l == r && self.same_type(other),
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl Value {
    pub fn same_type(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Decimal(.., l_prec, l_scale), Self::Decimal(.., r_prec, r_scale)) => {
                l_prec == r_prec && l_scale == r_scale
            }
            (Self::List(.., l), Self::List(.., r)) => l.same_type(r),
            (Self::Struct(.., l), Self::Struct(.., r)) => l.eq_ignore_ascii_case(r),
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }

    /// True for `Value::Null` and for any typed variant not holding a value.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null
            | Value::Boolean(None)
            | Value::Int8(None)
            | Value::Int16(None)
            | Value::Int32(None)
            | Value::Int64(None)
            | Value::Int128(None)
            | Value::UInt8(None)
            | Value::UInt16(None)
            | Value::UInt32(None)
            | Value::UInt64(None)
            | Value::UInt128(None)
            | Value::Float32(None)
            | Value::Float64(None)
            | Value::Decimal(None, ..)
            | Value::Char(None)
            | Value::Varchar(None)
            | Value::Blob(None)
            | Value::Date(None)
            | Value::Time(None)
            | Value::Timestamp(None)
            | Value::TimestampWithTimezone(None)
            | Value::Uuid(None)
            | Value::List(None, ..)
            | Value::Struct(None, ..) => true,
            _ => false,
        }
    }

    /// The type code a driver would pick for this value when none is given.
    pub fn sql_type(&self) -> SqlType {
        match self {
            Value::Null => types::NULL,
            Value::Boolean(..) => types::BOOLEAN,
            Value::Int8(..) => types::TINYINT,
            Value::Int16(..) | Value::UInt8(..) => types::SMALLINT,
            Value::Int32(..) | Value::UInt16(..) => types::INTEGER,
            Value::Int64(..) | Value::UInt32(..) => types::BIGINT,
            Value::Int128(..) | Value::UInt64(..) | Value::UInt128(..) => types::NUMERIC,
            Value::Float32(..) => types::REAL,
            Value::Float64(..) => types::DOUBLE,
            Value::Decimal(..) => types::DECIMAL,
            Value::Char(..) => types::CHAR,
            Value::Varchar(..) => types::VARCHAR,
            Value::Blob(..) => types::VARBINARY,
            Value::Date(..) => types::DATE,
            Value::Time(..) => types::TIME,
            Value::Timestamp(..) => types::TIMESTAMP,
            Value::TimestampWithTimezone(..) => types::TIMESTAMP_WITH_TIMEZONE,
            Value::Uuid(..) => types::OTHER,
            Value::List(..) => types::ARRAY,
            Value::Struct(..) => types::STRUCT,
        }
    }

    /// Name of the structured type, only for `Value::Struct`.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Value::Struct(.., name) => Some(name),
            _ => None,
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: impl Display) -> fmt::Result {
    f.write_char('\'')?;
    let value = value.to_string();
    for c in value.chars() {
        if c == '\'' {
            f.write_char('\'')?;
        }
        f.write_char(c)?;
    }
    f.write_char('\'')
}

fn write_sequence(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    let mut out = String::new();
    separated_by(
        &mut out,
        values,
        |out, v| {
            let _ = write!(out, "{v}");
        },
        ", ",
    );
    f.write_str(&out)
}

/// SQL literal like rendering, meant for logs and diagnostics.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("NULL");
        }
        match self {
            Value::Boolean(Some(v)) => write!(f, "{v}"),
            Value::Int8(Some(v)) => write!(f, "{v}"),
            Value::Int16(Some(v)) => write!(f, "{v}"),
            Value::Int32(Some(v)) => write!(f, "{v}"),
            Value::Int64(Some(v)) => write!(f, "{v}"),
            Value::Int128(Some(v)) => write!(f, "{v}"),
            Value::UInt8(Some(v)) => write!(f, "{v}"),
            Value::UInt16(Some(v)) => write!(f, "{v}"),
            Value::UInt32(Some(v)) => write!(f, "{v}"),
            Value::UInt64(Some(v)) => write!(f, "{v}"),
            Value::UInt128(Some(v)) => write!(f, "{v}"),
            Value::Float32(Some(v)) => write!(f, "{v}"),
            Value::Float64(Some(v)) => write!(f, "{v}"),
            Value::Decimal(Some(v), ..) => write!(f, "{v}"),
            Value::Char(Some(v)) => write_quoted(f, v),
            Value::Varchar(Some(v)) => write_quoted(f, v),
            Value::Blob(Some(v)) => write!(f, "X'{}'", hex::encode(v)),
            Value::Date(Some(v)) => write_quoted(f, v),
            Value::Time(Some(v)) => write_quoted(f, v),
            Value::Timestamp(Some(v)) => write_quoted(f, v),
            Value::TimestampWithTimezone(Some(v)) => write_quoted(f, v),
            Value::Uuid(Some(v)) => write_quoted(f, v),
            Value::List(Some(v), ..) => {
                f.write_char('[')?;
                write_sequence(f, v)?;
                f.write_char(']')
            }
            Value::Struct(Some(v), name) => {
                f.write_str(name)?;
                f.write_char('(')?;
                write_sequence(f, v)?;
                f.write_char(')')
            }
            _ => f.write_str("NULL"),
        }
    }
}
