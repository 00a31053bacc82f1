use serde::de::{self, Deserializer, Visitor};
use serde::ser::{self, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Enumerations that travel either by name (protocol JSON) or by number
/// (plain JSON encoding of the same message). Decoding never fails on a value
/// this client does not know; implementors keep it in a fallback variant.
pub(crate) trait ProtoEnum: Sized {
    const TYPE_NAME: &'static str;

    /// `None` for numbers this client does not know a name for.
    fn name(&self) -> Option<&str>;
    /// `None` for names this client does not know a number for.
    fn number(&self) -> Option<i32>;
    fn from_name(name: &str) -> Self;
    fn from_number(number: i32) -> Self;
}

pub(crate) fn serialize_name<T: ProtoEnum, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match (value.name(), value.number()) {
        (Some(name), _) => serializer.serialize_str(name),
        (None, Some(number)) => serializer.serialize_i32(number),
        (None, None) => Err(ser::Error::custom(format!("empty {}", T::TYPE_NAME))),
    }
}

/// Request bodies that the server decodes with its plain JSON decoder carry
/// the numeric form.
pub(crate) fn serialize_number<T: ProtoEnum, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value.number() {
        Some(number) => serializer.serialize_i32(number),
        None => Err(ser::Error::custom(format!(
            "{} {:?} has no numeric form",
            T::TYPE_NAME,
            value.name().unwrap_or_default()
        ))),
    }
}

pub(crate) fn deserialize<'de, T: ProtoEnum, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<T, D::Error> {
    deserializer.deserialize_any(ProtoEnumVisitor(PhantomData))
}

struct ProtoEnumVisitor<T>(PhantomData<T>);

impl<'de, T: ProtoEnum> Visitor<'de> for ProtoEnumVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} name or number", T::TYPE_NAME)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<T, E> {
        Ok(T::from_name(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<T, E> {
        i32::try_from(value)
            .map(T::from_number)
            .map_err(|_| E::custom(format!("{} out of range: {value}", T::TYPE_NAME)))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<T, E> {
        i32::try_from(value)
            .map(T::from_number)
            .map_err(|_| E::custom(format!("{} out of range: {value}", T::TYPE_NAME)))
    }
}
