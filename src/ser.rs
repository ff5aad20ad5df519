//! Serde serialization into a [`CommentedProperties`] document.
//!
//! A properties file is a flat list of string pairs, so only structs and
//! maps with string keys can be serialized at the top level. Each field
//! becomes one property, in declaration order:
//!
//! - numbers and `bool` use their `Display` form
//! - `char` and strings are stored as is
//! - unit enum variants are stored by name
//! - `None` fields are skipped
//!
//! Sequences, nested structs and data-carrying enum variants have no flat
//! representation and fail with [`Error::UnsupportedType`].
//!
//! ## Usage
//!
//! ```rust
//! use commented_properties::{PropertiesOptions, Serializer};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Server { host: String, port: u16 }
//!
//! let server = Server { host: "localhost".into(), port: 8080 };
//! let mut serializer = Serializer::new(PropertiesOptions::default());
//! server.serialize(&mut serializer).unwrap();
//!
//! let props = serializer.into_inner();
//! assert_eq!(props.get("host"), Some("localhost"));
//! assert_eq!(props.get("port"), Some("8080"));
//! ```

use crate::{CommentedProperties, Error, PropertiesOptions, Result};
use serde::ser::{self, Impossible, Serialize};

/// Serializes a struct or string-keyed map into a [`CommentedProperties`].
pub struct Serializer {
    output: CommentedProperties,
}

impl Serializer {
    pub fn new(options: PropertiesOptions) -> Self {
        Serializer {
            output: CommentedProperties::with_options(options),
        }
    }

    pub fn into_inner(self) -> CommentedProperties {
        self.output
    }

    fn top_level(kind: &str) -> Error {
        Error::unsupported_type(&format!(
            "expected a struct or map at the top level, found {}",
            kind
        ))
    }
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = StructSerializer<'a>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, _v: bool) -> Result<()> {
        Err(Serializer::top_level("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<()> {
        Err(Serializer::top_level("integer"))
    }

    fn serialize_i16(self, _v: i16) -> Result<()> {
        Err(Serializer::top_level("integer"))
    }

    fn serialize_i32(self, _v: i32) -> Result<()> {
        Err(Serializer::top_level("integer"))
    }

    fn serialize_i64(self, _v: i64) -> Result<()> {
        Err(Serializer::top_level("integer"))
    }

    fn serialize_u8(self, _v: u8) -> Result<()> {
        Err(Serializer::top_level("integer"))
    }

    fn serialize_u16(self, _v: u16) -> Result<()> {
        Err(Serializer::top_level("integer"))
    }

    fn serialize_u32(self, _v: u32) -> Result<()> {
        Err(Serializer::top_level("integer"))
    }

    fn serialize_u64(self, _v: u64) -> Result<()> {
        Err(Serializer::top_level("integer"))
    }

    fn serialize_f32(self, _v: f32) -> Result<()> {
        Err(Serializer::top_level("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<()> {
        Err(Serializer::top_level("float"))
    }

    fn serialize_char(self, _v: char) -> Result<()> {
        Err(Serializer::top_level("char"))
    }

    fn serialize_str(self, _v: &str) -> Result<()> {
        Err(Serializer::top_level("string"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(Serializer::top_level("bytes"))
    }

    // An absent document is an empty one.
    fn serialize_none(self) -> Result<()> {
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        Err(Serializer::top_level("enum variant"))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Err(Serializer::top_level("enum variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Serializer::top_level("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Serializer::top_level("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Serializer::top_level("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Serializer::top_level("enum variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapSerializer {
            ser: self,
            key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(StructSerializer { ser: self })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Serializer::top_level("enum variant"))
    }
}

pub struct MapSerializer<'a> {
    ser: &'a mut Serializer,
    key: Option<String>,
}

impl<'a> ser::SerializeMap for MapSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(ValueSerializer)? {
            Some(key) => {
                self.key = Some(key);
                Ok(())
            }
            None => Err(Error::unsupported_type("map keys must not be None")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called before serialize_key"))?;
        if let Some(value) = value.serialize(ValueSerializer)? {
            self.ser.output.insert(key, value);
        }
        Ok(())
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

pub struct StructSerializer<'a> {
    ser: &'a mut Serializer,
}

impl<'a> ser::SerializeStruct for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(value) = value.serialize(ValueSerializer)? {
            self.ser.output.insert(key, value);
        }
        Ok(())
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Turns one field into its stored string. `None` means "omit the field".
struct ValueSerializer;

impl ValueSerializer {
    fn nested(kind: &str) -> Error {
        Error::unsupported_type(&format!("{} cannot be stored in a single property", kind))
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Option<String>;
    type Error = Error;

    type SerializeSeq = Impossible<Option<String>, Error>;
    type SerializeTuple = Impossible<Option<String>, Error>;
    type SerializeTupleStruct = Impossible<Option<String>, Error>;
    type SerializeTupleVariant = Impossible<Option<String>, Error>;
    type SerializeMap = Impossible<Option<String>, Error>;
    type SerializeStruct = Impossible<Option<String>, Error>;
    type SerializeStructVariant = Impossible<Option<String>, Error>;

    fn serialize_bool(self, v: bool) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_i16(self, v: i16) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_i32(self, v: i32) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_i64(self, v: i64) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_i128(self, v: i128) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_u16(self, v: u16) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_u32(self, v: u32) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_u64(self, v: u64) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_u128(self, v: u128) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_f64(self, v: f64) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_char(self, v: char) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Option<String>> {
        Err(ValueSerializer::nested("bytes"))
    }

    fn serialize_none(self) -> Result<Option<String>> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Option<String>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Option<String>> {
        Ok(Some(String::new()))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Option<String>> {
        Ok(Some(String::new()))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Option<String>> {
        Ok(Some(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Option<String>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Option<String>>
    where
        T: ?Sized + Serialize,
    {
        Err(ValueSerializer::nested("a newtype variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(ValueSerializer::nested("a sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(ValueSerializer::nested("a tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(ValueSerializer::nested("a tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(ValueSerializer::nested("a tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(ValueSerializer::nested("a map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(ValueSerializer::nested("a struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(ValueSerializer::nested("a struct variant"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename_all = "lowercase")]
    enum Level {
        Debug,
        Info,
    }

    #[derive(Serialize)]
    struct Settings {
        name: &'static str,
        threads: u8,
        ratio: f64,
        verbose: bool,
        level: Level,
        proxy: Option<String>,
    }

    fn serialize<T: Serialize>(value: &T) -> Result<CommentedProperties> {
        let mut serializer = Serializer::new(PropertiesOptions::default());
        value.serialize(&mut serializer)?;
        Ok(serializer.into_inner())
    }

    #[test]
    fn test_struct_fields_in_order() {
        let settings = Settings {
            name: "demo app",
            threads: 4,
            ratio: 0.5,
            verbose: true,
            level: Level::Info,
            proxy: None,
        };
        let props = serialize(&settings).unwrap();
        let pairs: Vec<_> = props.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("name", "demo app"),
                ("threads", "4"),
                ("ratio", "0.5"),
                ("verbose", "true"),
                ("level", "info"),
            ]
        );
    }

    #[test]
    fn test_map_with_string_keys() {
        let mut map = IndexMap::new();
        map.insert("b", 2);
        map.insert("a", 1);
        let props = serialize(&map).unwrap();
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(props.get("a"), Some("1"));
    }

    #[test]
    fn test_some_level_is_stored() {
        #[derive(Serialize)]
        struct Wrapper {
            level: Option<Level>,
        }
        let props = serialize(&Wrapper {
            level: Some(Level::Debug),
        })
        .unwrap();
        assert_eq!(props.get("level"), Some("debug"));
    }

    #[test]
    fn test_rejects_top_level_scalars() {
        assert!(matches!(serialize(&42), Err(Error::UnsupportedType(_))));
        assert!(matches!(serialize(&vec![1, 2]), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn test_rejects_nested_values() {
        #[derive(Serialize)]
        struct Nested {
            tags: Vec<String>,
        }
        let err = serialize(&Nested { tags: vec![] }).unwrap_err();
        assert!(err.to_string().contains("sequence"));
    }

    #[test]
    fn test_none_document_is_empty() {
        let props = serialize(&Option::<Settings>::None).unwrap();
        assert!(props.is_empty());
    }
}
