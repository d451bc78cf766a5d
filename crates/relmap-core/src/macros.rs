/// Declares a struct and implements [`Model`](crate::schema::Model) for it.
///
/// A property written `name: Ty = expr` is defaulted: rows without a `name` column
/// construct it from `expr`.
///
/// ```
/// relmap_core::model! {
///     #[derive(Debug)]
///     pub struct Parent {
///         pub pk: Option<i32>,
///         pub value: String,
///         pub score: i64 = 0,
///     }
/// }
/// ```
#[macro_export]
macro_rules! model {
    (@defaulted) => { false };
    (@defaulted $default:expr) => { true };
    (@load $record:ident, $field:ident, $ty:ty) => {
        $record.field::<$ty>(stringify!($field))?
    };
    (@load $record:ident, $field:ident, $ty:ty, $default:expr) => {
        $record.field_or::<$ty>(stringify!($field), || $default)?
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(= $default:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::schema::Model for $name {
            fn describe() -> $crate::schema::ModelDescriptor {
                $crate::schema::ModelDescriptor::new::<Self>(
                    stringify!($name),
                    vec![
                        $(
                            $crate::schema::Property::new::<$ty>(
                                stringify!($field),
                                $crate::model!(@defaulted $($default)?),
                            ),
                        )*
                    ],
                )
            }

            #[allow(unused_variables)]
            fn get(&self, property: &str) -> Option<$crate::stmt::Value> {
                match property {
                    $(
                        stringify!($field) => Some($crate::schema::Field::to_value(&self.$field)),
                    )*
                    _ => None,
                }
            }

            #[allow(unused_variables)]
            fn set(&mut self, property: &str, value: $crate::stmt::Value) -> $crate::Result<()> {
                match property {
                    $(
                        stringify!($field) => {
                            self.$field = <$ty as $crate::schema::Field>::from_value(value)?;
                            Ok(())
                        }
                    )*
                    _ => Err($crate::Error::from_args(format_args!(
                        "`{}` has no property `{}`",
                        stringify!($name),
                        property
                    ))),
                }
            }

            #[allow(unused_mut, unused_variables)]
            fn load(mut record: $crate::schema::Record) -> $crate::Result<Self> {
                Ok(Self {
                    $(
                        $field: $crate::model!(@load record, $field, $ty $(, $default)?),
                    )*
                })
            }
        }
    };
}
