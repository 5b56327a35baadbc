// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! [`Reflect`] for std types and the leaf implementation macros.

use super::{PathSegment, Reflect, ReflectMut, ReflectRef, Walker};
use crate::error::Result;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};

/// Implement [`Reflect`](crate::Reflect) for `Clone` leaf types.
///
/// Leaves are converted only into the same type and copied with `clone_from`.
///
/// ```ignore
/// #[derive(Debug, Clone, Default, PartialEq)]
/// pub enum Phase { #[default] Pending, Active }
///
/// hscheme::impl_reflect_value!(Phase);
/// ```
#[macro_export]
macro_rules! impl_reflect_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Reflect for $ty {
                fn type_name(&self) -> &'static str {
                    ::std::any::type_name::<$ty>()
                }

                fn as_any(&self) -> &dyn ::std::any::Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                    self
                }

                fn reflect_ref(&self) -> $crate::ReflectRef<'_> {
                    $crate::ReflectRef::Value
                }

                fn reflect_mut(&mut self) -> $crate::ReflectMut<'_> {
                    $crate::ReflectMut::Value
                }

                fn fill_from(
                    &mut self,
                    src: &dyn $crate::Reflect,
                    walker: &mut dyn $crate::Walker,
                ) -> $crate::Result<()> {
                    match src.as_any().downcast_ref::<$ty>() {
                        ::std::option::Option::Some(value) => {
                            ::std::clone::Clone::clone_from(self, value);
                            ::std::result::Result::Ok(())
                        }
                        ::std::option::Option::None => ::std::result::Result::Err(walker.mismatch(
                            src.type_name(),
                            ::std::any::type_name::<$ty>(),
                            "value types differ",
                        )),
                    }
                }
            }
        )*
    };
}

/// Implement [`Reflect`](crate::Reflect) for types with hidden state.
///
/// Opaque values are never copied structurally: converting one needs a
/// registered conversion function and copying one needs a registered
/// deep-copy function.
#[macro_export]
macro_rules! impl_reflect_opaque {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Reflect for $ty {
                fn type_name(&self) -> &'static str {
                    ::std::any::type_name::<$ty>()
                }

                fn as_any(&self) -> &dyn ::std::any::Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                    self
                }

                fn reflect_ref(&self) -> $crate::ReflectRef<'_> {
                    $crate::ReflectRef::Opaque
                }

                fn reflect_mut(&mut self) -> $crate::ReflectMut<'_> {
                    $crate::ReflectMut::Opaque
                }

                fn fill_from(
                    &mut self,
                    src: &dyn $crate::Reflect,
                    walker: &mut dyn $crate::Walker,
                ) -> $crate::Result<()> {
                    ::std::result::Result::Err(
                        walker.opaque(src.type_name(), ::std::any::type_name::<$ty>()),
                    )
                }
            }
        )*
    };
}

impl_reflect_value!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    serde_json::Value,
);

impl<T: Reflect + Default> Reflect for Vec<T> {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Seq(self.iter().map(|v| v as &dyn Reflect).collect())
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Seq(self.iter_mut().map(|v| v as &mut dyn Reflect).collect())
    }

    fn fill_from(&mut self, src: &dyn Reflect, walker: &mut dyn Walker) -> Result<()> {
        let ReflectRef::Seq(items) = src.reflect_ref() else {
            return Err(walker.mismatch(src.type_name(), self.type_name(), "source is not a sequence"));
        };
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let mut elem = T::default();
            walker.walk_at(PathSegment::Index(index), item, &mut elem)?;
            out.push(elem);
        }
        *self = out;
        Ok(())
    }
}

impl<T: Reflect + Default> Reflect for Option<T> {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Optional(self.as_ref().map(|v| v as &dyn Reflect))
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Optional(self.as_mut().map(|v| v as &mut dyn Reflect))
    }

    /// `None` stays `None`; a present or plain source becomes `Some`.
    fn fill_from(&mut self, src: &dyn Reflect, walker: &mut dyn Walker) -> Result<()> {
        let inner = match src.reflect_ref() {
            ReflectRef::Optional(None) => {
                *self = None;
                return Ok(());
            }
            ReflectRef::Optional(Some(inner)) => inner,
            _ => src,
        };
        let mut value = T::default();
        walker.walk(inner, &mut value)?;
        *self = Some(value);
        Ok(())
    }
}

/// Boxes are transparent: registered functions see the boxed type.
impl<T: Reflect> Reflect for Box<T> {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        (**self).as_any_mut()
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        (**self).reflect_ref()
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        (**self).reflect_mut()
    }

    fn fill_from(&mut self, src: &dyn Reflect, walker: &mut dyn Walker) -> Result<()> {
        (**self).fill_from(src, walker)
    }
}

macro_rules! impl_reflect_string_map {
    ($map:ident) => {
        impl<T: Reflect + Default> Reflect for $map<String, T> {
            fn type_name(&self) -> &'static str {
                std::any::type_name::<Self>()
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }

            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Map(
                    self.iter()
                        .map(|(k, v)| (k.as_str(), v as &dyn Reflect))
                        .collect(),
                )
            }

            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Map(
                    self.iter_mut()
                        .map(|(k, v)| (k.as_str(), v as &mut dyn Reflect))
                        .collect(),
                )
            }

            fn fill_from(&mut self, src: &dyn Reflect, walker: &mut dyn Walker) -> Result<()> {
                let ReflectRef::Map(entries) = src.reflect_ref() else {
                    return Err(walker.mismatch(src.type_name(), self.type_name(), "source is not a map"));
                };
                let mut out = $map::new();
                for (key, value) in entries {
                    let mut elem = T::default();
                    walker.walk_at(PathSegment::Key(key.to_string()), value, &mut elem)?;
                    out.insert(key.to_string(), elem);
                }
                *self = out;
                Ok(())
            }
        }
    };
}

impl_reflect_string_map!(HashMap);
impl_reflect_string_map!(BTreeMap);
