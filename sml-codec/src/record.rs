//! Declarative fixed-length SML records

/// Declare a struct encoded as an SML list with one element per field
///
/// The generated type derives `Debug`, `Clone`, `PartialEq`, `Default` and
/// serde traits, exposes `FIELD_COUNT` and implements `SmlDecode` and
/// `SmlEncode`. Decoding fails with `LengthMismatch` unless the list
/// announces exactly `FIELD_COUNT` elements. Every field type must
/// implement both traits; use `Option<T>` for optional fields.
///
/// ```ignore
/// sml_record! {
///     pub struct CloseRequest {
///         pub global_signature: Option<OctetString>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! sml_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default, ::serde::Serialize, ::serde::Deserialize)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $name {
            /// Number of list elements on the wire
            pub const FIELD_COUNT: usize = [$(stringify!($field)),*].len();
        }

        impl $crate::SmlDecode for $name {
            fn decode(reader: &mut $crate::SmlReader<'_>) -> $crate::SmlResult<Self> {
                reader.read_list_header(Self::FIELD_COUNT)?;
                Ok(Self {
                    $($field: <$ty as $crate::SmlDecode>::decode(reader)?,)*
                })
            }
        }

        impl $crate::SmlEncode for $name {
            fn encode(&self, writer: &mut $crate::SmlWriter) -> $crate::SmlResult<()> {
                writer.write_list_header(Self::FIELD_COUNT)?;
                $($crate::SmlEncode::encode(&self.$field, writer)?;)*
                Ok(())
            }
        }
    };
}
