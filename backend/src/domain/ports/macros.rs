//! Helper macro for declaring port error enums with snake_case constructors.
//!
//! Each variant becomes a `thiserror` variant with the supplied message and a
//! constructor named after the variant. Struct fields are taken as
//! `impl Into<T>` so call sites can pass `&str` for `String` fields.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use crate::domain::UserId;

    define_port_error! {
        pub enum ProbeError {
            Unreachable => "upstream unreachable",
            Status { status: u16, message: String } => "status {status}: {message}",
            Missing { user_id: UserId } => "user {user_id} missing",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(ProbeError::unreachable().to_string(), "upstream unreachable");
    }

    #[test]
    fn string_fields_accept_str() {
        let err = ProbeError::status(502_u16, "bad gateway");
        assert_eq!(err.to_string(), "status 502: bad gateway");
    }

    #[test]
    fn domain_fields_pass_through() {
        let user_id = UserId::new(9).expect("positive id");
        assert_eq!(ProbeError::missing(user_id).to_string(), "user 9 missing");
    }
}
