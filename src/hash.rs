use {
    super::{SpanError, SpanResult},
    hex::FromHexError,
    sha2::{Digest, Sha256, Sha512},
    std::{fmt, str::FromStr},
};

/// Width of a hash value, in bytes (608 bits).
pub const HASH_LEN: usize = 76;

/// Flips a canonical (two's complement) byte into offset-binary and back.
const SIGN_FLIP: u8 = 0x80;

/// Fixed-width identifier of a chunk and a position in the hash space.
///
/// The canonical form is a big-endian array of [`HASH_LEN`] bytes, each byte
/// being a signed quantity in `[-128, 127]`. Values are ordered byte-wise
/// lexicographically over those signed bytes, so [`HashValue::FIRST`] is the
/// all `0x80` array and [`HashValue::LAST`] is the all `0x7f` array.
///
/// Internally bytes are kept in offset-binary (sign bit flipped): the signed
/// order then matches plain unsigned comparison, and the hash space becomes the
/// integer range `[0, 2^608)` with `FIRST` as zero. Arithmetic below operates on
/// that number line.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashValue([u8; HASH_LEN]);

impl HashValue {
    /// Smallest value of the hash space.
    pub const FIRST: Self = Self([0x00; HASH_LEN]);

    /// Largest value of the hash space.
    pub const LAST: Self = Self([0xff; HASH_LEN]);

    /// Creates a hash value from its canonical byte representation.
    pub const fn from_array(bytes: [u8; HASH_LEN]) -> Self {
        let mut offset = [0u8; HASH_LEN];
        let mut i = 0;
        while i < HASH_LEN {
            offset[i] = bytes[i] ^ SIGN_FLIP;
            i += 1;
        }
        Self(offset)
    }

    /// Creates a hash value from a canonical byte slice.
    ///
    /// The slice must be exactly [`HASH_LEN`] bytes long.
    pub fn from_bytes(bytes: &[u8]) -> SpanResult<Self> {
        let bytes: [u8; HASH_LEN] = bytes
            .try_into()
            .map_err(|_| SpanError::InvalidHashLength(bytes.len()))?;
        Ok(Self::from_array(bytes))
    }

    /// Returns the canonical byte representation.
    pub fn to_bytes(&self) -> [u8; HASH_LEN] {
        self.0.map(|b| b ^ SIGN_FLIP)
    }

    /// Derives the identifier of a chunk from its content.
    ///
    /// Layout: SHA-256 of the data (32 bytes), the leading 36 bytes of SHA-512
    /// of the data, and the data length as a big-endian `u64`.
    pub fn of_content(data: impl AsRef<[u8]>) -> Self {
        let data = data.as_ref();
        let mut bytes = [0u8; HASH_LEN];
        bytes[..32].copy_from_slice(&Sha256::digest(data));
        bytes[32..68].copy_from_slice(&Sha512::digest(data)[..36]);
        bytes[68..].copy_from_slice(&(data.len() as u64).to_be_bytes());
        Self::from_array(bytes)
    }

    /// Returns the value one unit above this one, `None` for `LAST`.
    pub fn successor(&self) -> Option<Self> {
        let mut bytes = self.0;
        for b in bytes.iter_mut().rev() {
            let (sum, carry) = b.overflowing_add(1);
            *b = sum;
            if !carry {
                return Some(Self(bytes));
            }
        }
        None
    }

    /// Returns the value one unit below this one, `None` for `FIRST`.
    pub fn predecessor(&self) -> Option<Self> {
        let mut bytes = self.0;
        for b in bytes.iter_mut().rev() {
            let (diff, borrow) = b.overflowing_sub(1);
            *b = diff;
            if !borrow {
                return Some(Self(bytes));
            }
        }
        None
    }

    /// Adds two positions, measuring both from `FIRST`.
    ///
    /// Returns `None` if the sum runs past `LAST`.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        let mut bytes = [0u8; HASH_LEN];
        let mut carry = 0u16;
        for i in (0..HASH_LEN).rev() {
            let sum = self.0[i] as u16 + other.0[i] as u16 + carry;
            bytes[i] = sum as u8;
            carry = sum >> 8;
        }
        (carry == 0).then_some(Self(bytes))
    }

    /// Multiplies the position (measured from `FIRST`) by a scalar.
    ///
    /// Returns `None` if the product runs past `LAST`.
    pub fn checked_mul(&self, factor: u32) -> Option<Self> {
        let mut bytes = [0u8; HASH_LEN];
        let mut carry = 0u64;
        for i in (0..HASH_LEN).rev() {
            let product = self.0[i] as u64 * factor as u64 + carry;
            bytes[i] = product as u8;
            carry = product >> 8;
        }
        (carry == 0).then_some(Self(bytes))
    }

    /// Start of the block of values whose leading byte is the `unit`-th one.
    ///
    /// Units count from `FIRST`: unit `0` has leading byte `-128`, unit `255`
    /// has leading byte `127`.
    pub(crate) fn unit_start(unit: u8) -> Self {
        let mut bytes = Self::FIRST.0;
        bytes[0] = unit;
        Self(bytes)
    }

    /// End (inclusive) of the block of values whose leading byte is the
    /// `unit`-th one.
    pub(crate) fn unit_end(unit: u8) -> Self {
        let mut bytes = Self::LAST.0;
        bytes[0] = unit;
        Self(bytes)
    }
}

impl From<[u8; HASH_LEN]> for HashValue {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Self::from_array(bytes)
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::FIRST {
            f.write_str("HashValue(FIRST)")
        } else if *self == Self::LAST {
            f.write_str("HashValue(LAST)")
        } else {
            write!(f, "HashValue({self})")
        }
    }
}

impl FromStr for HashValue {
    type Err = SpanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; HASH_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|err| match err {
            FromHexError::OddLength | FromHexError::InvalidStringLength => {
                SpanError::InvalidHashLength(s.len() / 2)
            }
            _ => SpanError::InvalidHashEncoding,
        })?;
        Ok(Self::from_array(bytes))
    }
}
