/// Database type code, as understood by the driver.
///
/// The registry and the statement adapter never interpret it, they forward it
/// to the driver untouched.
pub type SqlType = i32;

/// Standard X/Open SQL CLI type codes.
///
/// Drivers are free to accept vendor specific codes as well.
pub mod types {
    use super::SqlType;

    pub const BIT: SqlType = -7;
    pub const TINYINT: SqlType = -6;
    pub const SMALLINT: SqlType = 5;
    pub const INTEGER: SqlType = 4;
    pub const BIGINT: SqlType = -5;
    pub const FLOAT: SqlType = 6;
    pub const REAL: SqlType = 7;
    pub const DOUBLE: SqlType = 8;
    pub const NUMERIC: SqlType = 2;
    pub const DECIMAL: SqlType = 3;
    pub const CHAR: SqlType = 1;
    pub const VARCHAR: SqlType = 12;
    pub const LONGVARCHAR: SqlType = -1;
    pub const DATE: SqlType = 91;
    pub const TIME: SqlType = 92;
    pub const TIMESTAMP: SqlType = 93;
    pub const BINARY: SqlType = -2;
    pub const VARBINARY: SqlType = -3;
    pub const LONGVARBINARY: SqlType = -4;
    pub const NULL: SqlType = 0;
    pub const OTHER: SqlType = 1111;
    pub const DISTINCT: SqlType = 2001;
    pub const STRUCT: SqlType = 2002;
    pub const ARRAY: SqlType = 2003;
    pub const BLOB: SqlType = 2004;
    pub const CLOB: SqlType = 2005;
    pub const REF: SqlType = 2006;
    pub const BOOLEAN: SqlType = 16;
    pub const ROWID: SqlType = -8;
    pub const NCHAR: SqlType = -15;
    pub const NVARCHAR: SqlType = -9;
    pub const REF_CURSOR: SqlType = 2012;
    pub const TIME_WITH_TIMEZONE: SqlType = 2013;
    pub const TIMESTAMP_WITH_TIMEZONE: SqlType = 2014;

    /// Upper case name of a standard type code, mostly for diagnostics.
    pub fn name(sql_type: SqlType) -> Option<&'static str> {
        Some(match sql_type {
            BIT => "BIT",
            TINYINT => "TINYINT",
            SMALLINT => "SMALLINT",
            INTEGER => "INTEGER",
            BIGINT => "BIGINT",
            FLOAT => "FLOAT",
            REAL => "REAL",
            DOUBLE => "DOUBLE",
            NUMERIC => "NUMERIC",
            DECIMAL => "DECIMAL",
            CHAR => "CHAR",
            VARCHAR => "VARCHAR",
            LONGVARCHAR => "LONGVARCHAR",
            DATE => "DATE",
            TIME => "TIME",
            TIMESTAMP => "TIMESTAMP",
            BINARY => "BINARY",
            VARBINARY => "VARBINARY",
            LONGVARBINARY => "LONGVARBINARY",
            NULL => "NULL",
            OTHER => "OTHER",
            DISTINCT => "DISTINCT",
            STRUCT => "STRUCT",
            ARRAY => "ARRAY",
            BLOB => "BLOB",
            CLOB => "CLOB",
            REF => "REF",
            BOOLEAN => "BOOLEAN",
            ROWID => "ROWID",
            NCHAR => "NCHAR",
            NVARCHAR => "NVARCHAR",
            REF_CURSOR => "REF_CURSOR",
            TIME_WITH_TIMEZONE => "TIME_WITH_TIMEZONE",
            TIMESTAMP_WITH_TIMEZONE => "TIMESTAMP_WITH_TIMEZONE",
            _ => return None,
        })
    }
}
