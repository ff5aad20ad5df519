/// Implements [`ValueCodec`](crate::ValueCodec) for a fieldless enum,
/// storing each variant by its name.
///
/// Decoding is case-sensitive; an unknown name decodes to `None`, so the
/// entry falls back to its default.
///
/// # Examples
///
/// ```rust
/// use commented_properties::{value_codec_enum, ValueCodec};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Difficulty {
///     Easy,
///     Normal,
///     Hard,
/// }
///
/// value_codec_enum!(Difficulty { Easy, Normal, Hard });
///
/// assert_eq!(Difficulty::Hard.encode(), "Hard");
/// assert_eq!(Difficulty::decode("Easy"), Some(Difficulty::Easy));
/// assert_eq!(Difficulty::decode("easy"), None);
/// ```
#[macro_export]
macro_rules! value_codec_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::ValueCodec for $ty {
            fn encode(&self) -> ::std::string::String {
                match self {
                    $($ty::$variant => ::std::string::String::from(stringify!($variant)),)+
                }
            }

            fn decode(text: &str) -> ::std::option::Option<Self> {
                match text {
                    $(stringify!($variant) => ::std::option::Option::Some($ty::$variant),)+
                    _ => ::std::option::Option::None,
                }
            }
        }
    };
}
