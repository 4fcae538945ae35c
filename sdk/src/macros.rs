/// Declares a fixed binary record as a plain Rust struct.
///
/// Field types are written in wire terms and mapped to Rust types:
///
/// | declared          | Rust field  |
/// |-------------------|-------------|
/// | `U8` .. `U64`     | `u8` .. `u64` |
/// | `I8` .. `I64`     | `i8` .. `i64` |
/// | `F16`, `F32`      | `f32`       |
/// | `F64`, `Float`    | `f64`       |
/// | `Int`             | `u64`       |
/// | `Pad`             | [Pad](crate::types::Pad) |
/// | `[Text; n]`       | `String` of exactly `n` bytes |
/// | `[Bytes; n]`      | `Vec<u8>` of exactly `n` bytes |
/// | `[T; n]`          | `Vec<T>` of exactly `n` elements |
/// | another record    | that record |
///
/// A field may carry a default, used when a dynamic value omits the field:
/// `pub id: U8 = 7`. Nested records and lists cannot have defaults.
///
/// ```
/// use bytechomp::{record, serialize, types::*, ByteOrder};
///
/// record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Point {
///         pub x: I16,
///         pub y: I16,
///     }
/// }
///
/// record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Shape {
///         pub kind: U8 = 1,
///         pub name: [Text; 4],
///         pub corners: [Point; 2],
///     }
/// }
///
/// let shape = Shape {
///     kind: 1,
///     name: "quad".to_owned(),
///     corners: vec![Point { x: 1, y: -1 }, Point { x: 2, y: -2 }],
/// };
/// let bytes = serialize(&shape, ByteOrder::Big).unwrap();
/// assert_eq!(bytes.len(), 1 + 4 + 2 * 4);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:tt $(= $default:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $crate::__chomp_rust_type!($ty),
            )*
        }

        impl $crate::Record for $name {
            fn schema() -> $crate::RecordDecl {
                $crate::RecordDecl::new(
                    stringify!($name),
                    vec![$(
                        $crate::FieldDecl::new(
                            stringify!($field),
                            $crate::__chomp_decl!($ty),
                            $crate::__chomp_default!($ty $(, $default)?),
                        ),
                    )*],
                )
                .typed::<Self>()
            }

            #[allow(unused_mut, unused_variables)]
            fn from_value(value: $crate::Value) -> Result<Self, $crate::ChompError> {
                let mut fields = $crate::convert::Fields::new(value, stringify!($name))?;
                Ok($name {
                    $(
                        $field: $crate::__chomp_from_value!(
                            $ty,
                            fields.take(stringify!($field))?,
                            stringify!($field)
                        )?,
                    )*
                })
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::Record(
                    stringify!($name),
                    vec![$(
                        (stringify!($field), $crate::__chomp_to_value!($ty, &self.$field)),
                    )*],
                )
            }
        }

        $crate::record_shape!($name);
    };
}

/// Lets a record be nested inside other records. `record!` does this
/// already; use it for hand-written [Record](crate::Record) impls.
#[macro_export]
macro_rules! record_shape {
    ($name:ty) => {
        impl $crate::types::Shape for $name {
            type Rust = $name;

            fn decl() -> $crate::TypeDecl {
                $crate::TypeDecl::Record(<$name as $crate::Record>::schema)
            }

            fn to_value(value: &$name) -> $crate::Value {
                <$name as $crate::Record>::to_value(value)
            }

            fn from_value(value: $crate::Value, _field: &str) -> Result<$name, $crate::ChompError> {
                <$name as $crate::Record>::from_value(value)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __chomp_rust_type {
    ([Text; $len:expr]) => { ::std::string::String };
    ([Bytes; $len:expr]) => { ::std::vec::Vec<u8> };
    ([$inner:tt; $len:expr]) => { ::std::vec::Vec<$crate::__chomp_rust_type!($inner)> };
    ($shape:ty) => { <$shape as $crate::types::Shape>::Rust };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __chomp_decl {
    ([Text; $len:expr]) => { $crate::TypeDecl::annotated($crate::TypeDecl::Text, $len) };
    ([Bytes; $len:expr]) => { $crate::TypeDecl::annotated($crate::TypeDecl::Bytes, $len) };
    ([$inner:tt; $len:expr]) => {
        $crate::TypeDecl::list_of($crate::__chomp_decl!($inner), $len)
    };
    ($shape:ty) => { <$shape as $crate::types::Shape>::decl() };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __chomp_default {
    ($ty:tt) => { None };
    ([Text; $len:expr], $default:expr) => { Some($crate::Value::from($default)) };
    ([Bytes; $len:expr], $default:expr) => { Some($crate::Value::from($default)) };
    ($ty:tt, $default:expr) => { Some($crate::__chomp_to_value!($ty, &$default)) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __chomp_to_value {
    ([Text; $len:expr], $value:expr) => {
        $crate::Value::Text(::std::clone::Clone::clone($value))
    };
    ([Bytes; $len:expr], $value:expr) => {
        $crate::Value::Bytes(::std::clone::Clone::clone($value))
    };
    ([$inner:tt; $len:expr], $value:expr) => {
        $crate::Value::List(
            $value
                .iter()
                .map(|item| $crate::__chomp_to_value!($inner, item))
                .collect(),
        )
    };
    ($shape:ty, $value:expr) => { <$shape as $crate::types::Shape>::to_value($value) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __chomp_from_value {
    ([Text; $len:expr], $value:expr, $field:expr) => { $crate::convert::text($value, $field) };
    ([Bytes; $len:expr], $value:expr, $field:expr) => { $crate::convert::bytes($value, $field) };
    ([$inner:tt; $len:expr], $value:expr, $field:expr) => {
        $crate::convert::list($value, $field, |item| {
            $crate::__chomp_from_value!($inner, item, $field)
        })
    };
    ($shape:ty, $value:expr, $field:expr) => {
        <$shape as $crate::types::Shape>::from_value($value, $field)
    };
}
