//! types for working with raw big-endian bytes

/// A type with a known, fixed size in raw table data.
///
/// This is the size of the encoded representation, which for scalars is
/// not necessarily the same as the size of the native type.
pub trait FixedSize: Sized {
    /// The number of bytes required to encode this type.
    const RAW_BYTE_LEN: usize;
}

/// A trait for scalars stored as big-endian bytes.
///
/// Decoding never fails once the input is known to be long enough: any
/// bit pattern of the right length is a value of the type.
pub trait Scalar: FixedSize + Copy {
    /// The raw byte representation of this type.
    type Raw: Copy + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Create an instance of this type from raw big-endian bytes.
    fn from_raw(raw: Self::Raw) -> Self;

    /// Encode this type as raw big-endian bytes.
    fn to_raw(self) -> Self::Raw;

    /// Read a value from the front of `bytes`, if it is long enough.
    fn read(bytes: &[u8]) -> Option<Self> {
        bytes
            .get(..Self::RAW_BYTE_LEN)
            .and_then(|bytes| <Self::Raw>::try_from(bytes).ok())
            .map(Self::from_raw)
    }
}

/// An internal macro for implementing `Scalar` for newtypes over scalars.
#[macro_export]
macro_rules! newtype_scalar {
    ($name:ident, $raw:ty) => {
        impl $crate::FixedSize for $name {
            const RAW_BYTE_LEN: usize = core::mem::size_of::<$raw>();
        }

        impl $crate::Scalar for $name {
            type Raw = $raw;
            fn to_raw(self) -> $raw {
                $crate::Scalar::to_raw(self.0)
            }

            fn from_raw(raw: $raw) -> Self {
                Self($crate::Scalar::from_raw(raw))
            }
        }
    };
}

macro_rules! int_scalar {
    ($ty:ty, $len:expr) => {
        impl FixedSize for $ty {
            const RAW_BYTE_LEN: usize = $len;
        }

        impl Scalar for $ty {
            type Raw = [u8; $len];
            fn to_raw(self) -> Self::Raw {
                self.to_be_bytes()
            }

            fn from_raw(raw: Self::Raw) -> Self {
                Self::from_be_bytes(raw)
            }
        }
    };
}

int_scalar!(u8, 1);
int_scalar!(i8, 1);
int_scalar!(u16, 2);
int_scalar!(i16, 2);
int_scalar!(u32, 4);
int_scalar!(i32, 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_requires_full_length() {
        assert_eq!(u16::read(&[0x01, 0x02]), Some(0x0102));
        assert_eq!(u16::read(&[0x01]), None);
        assert_eq!(u32::read(&[0xff, 0, 0, 1, 9]), Some(0xff000001));
    }

    #[test]
    fn signed_round_trip() {
        assert_eq!(i8::from_raw((-5i8).to_raw()), -5);
        assert_eq!(i16::read(&[0xff, 0xfe]), Some(-2));
    }
}
