//! `Dumpable` implementations for standard library and ecosystem types.
//!
//! Scalars project to [`Value::Scalar`], optional slots holding scalars to
//! [`Value::Nullable`], smart pointers forward to their target, and
//! collections expose themselves through [`DumpSequence`] / [`DumpMap`].
//! `Vec<u8>` and `[u8; N]` are recognised as byte sequences and rendered as a
//! hex dump.

use crate::types::{TypeInfo, TypeName};
use crate::value::{Scalar, Value};
use crate::visitor::{DumpMap, DumpSequence, Dumpable};
use std::any::Any;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

// --- Scalars ---

macro_rules! impl_scalar {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl Dumpable for $t {
                fn dump_value(&self) -> Value<'_> {
                    Value::Scalar(Scalar::$variant(*self))
                }
            }
        )*
    };
}

impl_scalar!(
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    Duration => Duration,
    uuid::Uuid => Guid,
);

impl Dumpable for () {
    fn dump_value(&self) -> Value<'_> {
        Value::Null
    }
}

impl Dumpable for String {
    fn dump_value(&self) -> Value<'_> {
        Value::str(self)
    }
}

impl Dumpable for str {
    fn dump_value(&self) -> Value<'_> {
        Value::str(self)
    }
}

impl Dumpable for Cow<'static, str> {
    fn dump_value(&self) -> Value<'_> {
        Value::str(self)
    }
}

impl<T: ?Sized + 'static> Dumpable for *const T {
    fn dump_value(&self) -> Value<'_> {
        Value::Scalar(Scalar::Pointer {
            type_name: std::any::type_name::<Self>(),
            address: self.cast::<()>() as usize,
        })
    }
}

impl<T: ?Sized + 'static> Dumpable for *mut T {
    fn dump_value(&self) -> Value<'_> {
        Value::Scalar(Scalar::Pointer {
            type_name: std::any::type_name::<Self>(),
            address: self.cast::<()>() as usize,
        })
    }
}

// --- Date and time ---

impl<Tz> Dumpable for chrono::DateTime<Tz>
where
    Tz: chrono::TimeZone + 'static,
    Tz::Offset: std::fmt::Display,
{
    fn dump_value(&self) -> Value<'_> {
        Value::Scalar(Scalar::DateTime {
            type_name: std::any::type_name::<Self>(),
            text: self.to_rfc3339(),
        })
    }
}

macro_rules! impl_naive_time {
    ($($t:ty),*) => {
        $(
            impl Dumpable for $t {
                fn dump_value(&self) -> Value<'_> {
                    Value::Scalar(Scalar::DateTime {
                        type_name: std::any::type_name::<Self>(),
                        text: self.to_string(),
                    })
                }
            }
        )*
    };
}

impl_naive_time!(chrono::NaiveDateTime, chrono::NaiveDate, chrono::NaiveTime);

// --- Type descriptors and callables ---

impl Dumpable for TypeName {
    fn dump_value(&self) -> Value<'_> {
        Value::Type(*self)
    }
}

impl Dumpable for TypeInfo {
    fn dump_value(&self) -> Value<'_> {
        Value::Type(self.name())
    }
}

macro_rules! impl_callable {
    ($($arg:ident),*) => {
        impl<R: 'static, $($arg: 'static),*> Dumpable for fn($($arg),*) -> R {
            fn dump_value(&self) -> Value<'_> {
                Value::Callable(std::any::type_name::<Self>())
            }
        }
    };
}

impl_callable!();
impl_callable!(A);
impl_callable!(A, B);
impl_callable!(A, B, C);

// --- Wrappers ---

impl<T: Dumpable> Dumpable for Option<T> {
    fn dump_value(&self) -> Value<'_> {
        match self {
            None => Value::Null,
            Some(inner) => match inner.dump_value() {
                Value::Scalar(scalar) => Value::Nullable(scalar),
                other => other,
            },
        }
    }
}

impl<T: Dumpable + ?Sized> Dumpable for Box<T> {
    fn dump_value(&self) -> Value<'_> {
        (**self).dump_value()
    }
}

impl<T: Dumpable + ?Sized> Dumpable for Rc<T> {
    fn dump_value(&self) -> Value<'_> {
        (**self).dump_value()
    }
}

impl<T: Dumpable + ?Sized> Dumpable for Arc<T> {
    fn dump_value(&self) -> Value<'_> {
        (**self).dump_value()
    }
}

impl<T: Dumpable + ?Sized> Dumpable for &'static T {
    fn dump_value(&self) -> Value<'_> {
        (**self).dump_value()
    }
}

impl<T: Dumpable> Dumpable for std::rc::Weak<T> {
    fn dump_value(&self) -> Value<'_> {
        self.upgrade().map_or(Value::Null, Value::owned)
    }
}

impl<T: Dumpable> Dumpable for std::sync::Weak<T> {
    fn dump_value(&self) -> Value<'_> {
        self.upgrade().map_or(Value::Null, Value::owned)
    }
}

impl<T: Dumpable> Dumpable for OnceLock<T> {
    fn dump_value(&self) -> Value<'_> {
        self.get().map_or(Value::Null, Dumpable::dump_value)
    }
}

// --- Sequences ---

macro_rules! impl_sequence {
    ($([$($gen:tt)*] $t:ty $(=> bytes $bytes:ty)?),* $(,)?) => {
        $(
            impl<$($gen)*> Dumpable for $t {
                fn dump_value(&self) -> Value<'_> {
                    Value::Sequence(self)
                }
            }

            impl<$($gen)*> DumpSequence for $t {
                fn type_name(&self) -> TypeName {
                    TypeName::of::<Self>()
                }

                fn len(&self) -> usize {
                    self.iter().len()
                }

                fn entries(&self) -> Box<dyn Iterator<Item = Value<'_>> + '_> {
                    Box::new(self.iter().map(Dumpable::dump_value))
                }

                $(
                    fn as_bytes(&self) -> Option<&[u8]> {
                        (self as &dyn Any)
                            .downcast_ref::<$bytes>()
                            .map(|bytes| bytes.as_slice())
                    }
                )?
            }
        )*
    };
}

impl_sequence!(
    [T: Dumpable] Vec<T> => bytes Vec<u8>,
    [T: Dumpable, const N: usize] [T; N] => bytes [u8; N],
    [T: Dumpable] VecDeque<T>,
    [T: Dumpable] BTreeSet<T>,
    [T: Dumpable, S: 'static] HashSet<T, S>,
);

// --- Maps ---

macro_rules! impl_map {
    ($([$($gen:tt)*] $t:ty),* $(,)?) => {
        $(
            impl<$($gen)*> Dumpable for $t {
                fn dump_value(&self) -> Value<'_> {
                    Value::Map(self)
                }
            }

            impl<$($gen)*> DumpMap for $t {
                fn type_name(&self) -> TypeName {
                    TypeName::of::<Self>()
                }

                fn len(&self) -> usize {
                    self.iter().len()
                }

                fn entries(&self) -> Box<dyn Iterator<Item = (Value<'_>, Value<'_>)> + '_> {
                    Box::new(self.iter().map(|(k, v)| (k.dump_value(), v.dump_value())))
                }
            }
        )*
    };
}

impl_map!(
    [K: Dumpable, V: Dumpable] BTreeMap<K, V>,
    [K: Dumpable, V: Dumpable, S: 'static] HashMap<K, V, S>,
);
