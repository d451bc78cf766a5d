use super::TypeKey;
use crate::{stmt::Value, Result};
use uuid::Uuid;

/// A Rust type that can be stored in a single column.
///
/// The registry looks serializers up by [`Field::ty`], so `Option<T>` shares the
/// serializer of `T` and only flips [`Field::NULLABLE`].
pub trait Field: Sized + 'static {
    const NULLABLE: bool = false;

    fn ty() -> TypeKey;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self>;
}

macro_rules! impl_field {
    ( $( $ty:ty => $into:ident, )* ) => {
        $(
            impl Field for $ty {
                fn ty() -> TypeKey {
                    TypeKey::of::<$ty>()
                }

                fn to_value(&self) -> Value {
                    Value::from(self.clone())
                }

                fn from_value(value: Value) -> Result<Self> {
                    value.$into()
                }
            }
        )*
    };
}

impl_field! {
    bool => to_bool,
    i16 => to_i16,
    i32 => to_i32,
    i64 => to_i64,
    f32 => to_f32,
    f64 => to_f64,
    String => into_string,
    Vec<u8> => into_bytes,
    Uuid => to_uuid,
}

impl<T: Field> Field for Option<T> {
    const NULLABLE: bool = true;

    fn ty() -> TypeKey {
        T::ty()
    }

    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}
