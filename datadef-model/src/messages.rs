//! Message keys of validation failures.
//!
//! Keys are handed to the localization layer together with their format
//! arguments; nothing in the data layer branches on them.

pub const STRING_IS_TOO_LONG: &str = "stringIsTooLong";
pub const STRING_IS_TOO_SHORT: &str = "stringIsTooShort";
pub const NUMERIC_IS_TOO_BIG: &str = "numericIsTooBig";
pub const INVALID_NUMERIC_FORMAT: &str = "invalidNumericFormat";
pub const INVALID_DATE_FORMAT: &str = "invalidDateFormat";
pub const INVALID_DATE_TIME_FORMAT: &str = "invalidDateTimeFormat";
pub const INVALID_DICTIONARY_ITEM: &str = "invalidDictionaryItem";
pub const WRONG_TYPE: &str = "wrongType";
pub const MISSING: &str = "missing";
pub const OUT_OF_RANGE: &str = "outOfRange";
