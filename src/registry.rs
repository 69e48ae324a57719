use crate::{
    error::Error,
    object::{ObjectReader, ObjectWriter},
    value::CustomValue,
};
use std::{
    any::{Any, TypeId},
    rc::Rc,
};
use tracing::trace;

/// How a registered writer claims values. The exact kind matches one
/// concrete type; the predicate kind covers family/assignability style
/// matching that has no direct `TypeId` equivalent.
#[derive(Clone, Copy, Debug)]
pub enum TypeMatch {
    Exact(TypeId),
    Predicate(fn(&dyn Any) -> bool),
}

impl TypeMatch {
    pub fn exact<T: Any>() -> Self {
        Self::Exact(TypeId::of::<T>())
    }

    pub fn matches(&self, value: &dyn Any) -> bool {
        match self {
            Self::Exact(id) => value.type_id() == *id,
            Self::Predicate(f) => f(value),
        }
    }
}

/// Pluggable per-type writer: claims values via a [`TypeMatch`], names
/// the wire key written as the type discriminator, and encodes the
/// payload. The façade is passed back in so writers can recurse.
pub trait ValueWrite {
    fn type_match(&self) -> TypeMatch;

    fn type_key(&self) -> &str;

    fn write_value(&self, value: &dyn Any, out: &mut ObjectWriter) -> Result<(), Error>;
}

/// Symmetric counterpart: reconstructs the payload written under its key.
pub trait ValueRead {
    fn type_key(&self) -> &str;

    fn read_value(&self, input: &mut ObjectReader<'_>) -> Result<Box<dyn CustomValue>, Error>;
}

/// Ordered writer collection. Resolution is first match in registration
/// order; overlapping registrations are legal and the order is part of
/// the observable contract, so no duplicate detection is done.
#[derive(Default)]
pub struct WriterRegistry {
    entries: Vec<Rc<dyn ValueWrite>>,
}

impl WriterRegistry {
    pub fn register(&mut self, writer: impl ValueWrite + 'static) {
        self.entries.push(Rc::new(writer));
    }

    pub fn resolve(&self, value: &dyn Any) -> Option<Rc<dyn ValueWrite>> {
        let found = self
            .entries
            .iter()
            .find(|e| e.type_match().matches(value))
            .cloned();
        trace!(
            key = found.as_ref().map(|e| e.type_key()).unwrap_or("<none>"),
            "resolve writer"
        );
        found
    }

    /// Registered wire keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.type_key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered reader collection, matched against the type key read off the
/// wire. Must mirror the writer registry that produced the stream.
#[derive(Default)]
pub struct ReaderRegistry {
    entries: Vec<Rc<dyn ValueRead>>,
}

impl ReaderRegistry {
    pub fn register(&mut self, reader: impl ValueRead + 'static) {
        self.entries.push(Rc::new(reader));
    }

    pub fn resolve(&self, key: &str) -> Option<Rc<dyn ValueRead>> {
        trace!(key, "resolve reader");
        self.entries.iter().find(|e| e.type_key() == key).cloned()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.type_key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct KeyOnly {
        matcher: TypeMatch,
        key: &'static str,
    }

    impl ValueWrite for KeyOnly {
        fn type_match(&self) -> TypeMatch {
            self.matcher
        }

        fn type_key(&self) -> &str {
            self.key
        }

        fn write_value(&self, _value: &dyn Any, _out: &mut ObjectWriter) -> Result<(), Error> {
            Ok(())
        }
    }

    #[test]
    fn exact_match() {
        let m = TypeMatch::exact::<u32>();
        assert!(m.matches(&7_u32));
        assert!(!m.matches(&7_i32));
    }

    #[test]
    fn first_match_wins() {
        fn any_unsigned(v: &dyn Any) -> bool {
            v.is::<u32>() || v.is::<u64>()
        }

        let mut reg = WriterRegistry::default();
        reg.register(KeyOnly {
            matcher: TypeMatch::Predicate(any_unsigned),
            key: "wide",
        });
        reg.register(KeyOnly {
            matcher: TypeMatch::exact::<u32>(),
            key: "narrow",
        });

        // both entries match a u32; registration order decides
        let hit = reg.resolve(&1_u32).unwrap();
        assert_eq!(hit.type_key(), "wide");
        assert_eq!(reg.keys().collect::<Vec<_>>(), vec!["wide", "narrow"]);

        assert!(reg.resolve(&1_i8).is_none());
    }
}
