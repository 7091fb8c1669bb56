//! Declared shapes of configuration types.
//!
//! A [`Schema`] lists the property names a type accepts and how each one is
//! checked. It is consulted alongside serde: serde binds the values, the
//! schema decides which names are legal.

/// How the value under a declared field is checked.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    /// A leaf value (scalar or list of scalars). Not descended.
    Value,
    /// A nested object checked against its own schema.
    Object(&'static Schema),
    /// A sequence whose elements are objects of the given schema.
    List(&'static Schema),
    /// A string-to-string map. Any key is accepted.
    OpenMap,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
}

impl Field {
    pub const fn value(name: &'static str) -> Self {
        Self {
            name,
            shape: Shape::Value,
        }
    }

    pub const fn object(name: &'static str, schema: &'static Schema) -> Self {
        Self {
            name,
            shape: Shape::Object(schema),
        }
    }

    pub const fn list(name: &'static str, schema: &'static Schema) -> Self {
        Self {
            name,
            shape: Shape::List(schema),
        }
    }

    pub const fn open_map(name: &'static str) -> Self {
        Self {
            name,
            shape: Shape::OpenMap,
        }
    }
}

#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [Field]) -> Self {
        Self { name, fields }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

/// A configuration type with a declared schema.
pub trait Described {
    fn schema() -> &'static Schema;
}
