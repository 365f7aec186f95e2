//! Classes for `to_be_instance_of`.
//!
//! Built-in classes mirror the reference kinds of [`Value`]. User classes are
//! [`ClassDef`]s with an optional parent, compared by identity.

use std::{fmt, rc::Rc};

use super::Value;

#[derive(Debug, Clone)]
pub enum Class {
    Object,
    Array,
    Date,
    Error,
    Function,
    RegExp,
    Custom(Rc<ClassDef>),
}

/// A user-defined class. Parents may be built-in or user-defined.
#[derive(Debug)]
pub struct ClassDef {
    name: String,
    parent: Option<Class>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            parent: None,
        })
    }

    pub fn extending(name: impl Into<String>, parent: impl Into<Class>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            parent: Some(parent.into()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Class> {
        self.parent.as_ref()
    }

    /// True if this class is `class` or derives from it.
    pub fn inherits(&self, class: &Class) -> bool {
        if let Class::Custom(def) = class {
            if std::ptr::eq(self, Rc::as_ptr(def)) {
                return true;
            }
        }
        match &self.parent {
            Some(Class::Custom(parent)) => parent.inherits(class),
            Some(builtin) => builtin == class,
            None => false,
        }
    }
}

impl Class {
    pub fn name(&self) -> &str {
        match self {
            Class::Object => "Object",
            Class::Array => "Array",
            Class::Date => "Date",
            Class::Error => "Error",
            Class::Function => "Function",
            Class::RegExp => "RegExp",
            Class::Custom(def) => def.name(),
        }
    }

    /// Instance check. Primitives and `null` are instances of nothing; every
    /// reference value is an instance of `Object`.
    pub fn is_instance(&self, value: &Value) -> bool {
        if !value.is_reference() {
            return false;
        }
        match (self, value) {
            (Class::Object, _) => true,
            (Class::Array, Value::Array(_))
            | (Class::Date, Value::Date(_))
            | (Class::Error, Value::Error(_))
            | (Class::Function, Value::Function(_))
            | (Class::RegExp, Value::Regex(_)) => true,
            (class, Value::Instance(inst)) => inst.class.inherits(class),
            _ => false,
        }
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Class::Custom(a), Class::Custom(b)) => Rc::ptr_eq(a, b),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl From<Rc<ClassDef>> for Class {
    fn from(def: Rc<ClassDef>) -> Self {
        Class::Custom(def)
    }
}

impl From<&Rc<ClassDef>> for Class {
    fn from(def: &Rc<ClassDef>) -> Self {
        Class::Custom(Rc::clone(def))
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
