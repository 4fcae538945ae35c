use serde::Serialize;

/// Byte ordering applied to every multi-byte primitive of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ByteOrder {
    /// Whatever the host uses.
    #[default]
    Native,
    Big,
    Little,
}

impl ByteOrder {
    /// Returns the struct-module style marker for this ordering.
    pub fn to_pattern(self) -> char {
        match self {
            ByteOrder::Native => '@',
            ByteOrder::Big => '>',
            ByteOrder::Little => '<',
        }
    }

    /// Resolves `Native` against the target so the codec only has to deal
    /// with big or little.
    pub fn is_big_endian(self) -> bool {
        match self {
            ByteOrder::Native => cfg!(target_endian = "big"),
            ByteOrder::Big => true,
            ByteOrder::Little => false,
        }
    }
}

#[test]
fn byte_order_patterns() {
    assert_eq!(ByteOrder::Native.to_pattern(), '@');
    assert_eq!(ByteOrder::Big.to_pattern(), '>');
    assert_eq!(ByteOrder::Little.to_pattern(), '<');
    assert_eq!(ByteOrder::default(), ByteOrder::Native);
}

#[test]
fn byte_order_resolution() {
    assert!(ByteOrder::Big.is_big_endian());
    assert!(!ByteOrder::Little.is_big_endian());
    assert_eq!(ByteOrder::Native.is_big_endian(), cfg!(target_endian = "big"));
}
