use crate::{ByteOrder, PrimitiveType, Value};

/// A fixed-width byte buffer meant for reading.
///
/// Every multi-byte read honours the byte order the buffer was created
/// with.
///
/// Example usage:
///
/// ```
/// use bytechomp_schema::{ByteBuffer, ByteOrder};
/// let mut bb = ByteBuffer::new(&[0x01, 0x02, 0xf9, 0xff, 0xff, 0xff], ByteOrder::Little);
/// assert_eq!(bb.read_u16(), Ok(0x0201));
/// assert_eq!(bb.read_i32(), Ok(-7));
/// ```
///
pub struct ByteBuffer<'a> {
    data: &'a [u8],
    index: usize,
    big_endian: bool,
}

macro_rules! read_fixed {
    ($($name:ident -> $t:ty),* $(,)?) => {
        $(
            #[doc = concat!("Try to read a `", stringify!($t), "` starting at the current index.")]
            pub fn $name(&mut self) -> Result<$t, ()> {
                let bytes = self.read_array()?;
                Ok(if self.big_endian {
                    <$t>::from_be_bytes(bytes)
                } else {
                    <$t>::from_le_bytes(bytes)
                })
            }
        )*
    };
}

impl<'a> ByteBuffer<'a> {
    /// Create a new ByteBuffer that wraps the provided byte slice. The lifetime
    /// of the returned ByteBuffer must not outlive the lifetime of the byte
    /// slice.
    pub fn new(data: &'a [u8], order: ByteOrder) -> ByteBuffer<'a> {
        ByteBuffer {
            data,
            index: 0,
            big_endian: order.is_big_endian(),
        }
    }

    /// Retrieves the underlying byte slice.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Retrieves the current index into the underlying byte slice. This starts
    /// off as 0 and ends up as `self.data().len()` when everything has been
    /// read.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Try to read a byte starting at the current index.
    pub fn read_byte(&mut self) -> Result<u8, ()> {
        if self.index >= self.data.len() {
            Err(())
        } else {
            let value = self.data[self.index];
            self.index += 1;
            Ok(value)
        }
    }

    /// Try to read `len` raw bytes starting at the current index.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ()> {
        if self.index + len > self.data.len() {
            Err(())
        } else {
            let value = &self.data[self.index..self.index + len];
            self.index += len;
            Ok(value)
        }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ()> {
        let bytes = self.read_bytes(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    read_fixed! {
        read_u16 -> u16,
        read_u32 -> u32,
        read_u64 -> u64,
        read_i16 -> i16,
        read_i32 -> i32,
        read_i64 -> i64,
        read_f32 -> f32,
        read_f64 -> f64,
    }

    pub fn read_i8(&mut self) -> Result<i8, ()> {
        Ok(self.read_byte()? as i8)
    }

    /// Try to read an IEEE 754 half precision float, widened to `f32`.
    pub fn read_f16(&mut self) -> Result<f32, ()> {
        Ok(f16_to_f32(self.read_u16()?))
    }

    /// Reads one primitive and returns it as the dynamic value the rest of
    /// the pipeline works with: unsigned integers as `UInt`, signed as
    /// `Int`, every float width as `Float`. Padding consumes its byte and
    /// always yields `UInt(0)`.
    pub fn read_primitive(&mut self, ty: PrimitiveType) -> Result<Value, ()> {
        Ok(match ty {
            PrimitiveType::Pad => {
                self.read_byte()?;
                Value::UInt(0)
            }
            PrimitiveType::U8 => Value::UInt(self.read_byte()? as u64),
            PrimitiveType::U16 => Value::UInt(self.read_u16()? as u64),
            PrimitiveType::U32 => Value::UInt(self.read_u32()? as u64),
            PrimitiveType::U64 | PrimitiveType::Int => Value::UInt(self.read_u64()?),
            PrimitiveType::I8 => Value::Int(self.read_i8()? as i64),
            PrimitiveType::I16 => Value::Int(self.read_i16()? as i64),
            PrimitiveType::I32 => Value::Int(self.read_i32()? as i64),
            PrimitiveType::I64 => Value::Int(self.read_i64()?),
            PrimitiveType::F16 => Value::Float(self.read_f16()? as f64),
            PrimitiveType::F32 => Value::Float(self.read_f32()? as f64),
            PrimitiveType::F64 | PrimitiveType::Float => Value::Float(self.read_f64()?),
        })
    }
}

/// A fixed-width byte buffer meant for writing.
///
/// Example usage:
///
/// ```
/// use bytechomp_schema::{ByteBufferMut, ByteOrder};
/// let mut bb = ByteBufferMut::new(ByteOrder::Big);
/// bb.write_u16(0x0102);
/// bb.write_bytes(b"ok");
/// assert_eq!(bb.data(), [1, 2, b'o', b'k']);
/// ```
///
pub struct ByteBufferMut {
    data: Vec<u8>,
    big_endian: bool,
}

macro_rules! write_fixed {
    ($($name:ident <- $t:ty),* $(,)?) => {
        $(
            #[doc = concat!("Write a `", stringify!($t), "` to the end of the buffer.")]
            pub fn $name(&mut self, value: $t) {
                if self.big_endian {
                    self.data.extend_from_slice(&value.to_be_bytes());
                } else {
                    self.data.extend_from_slice(&value.to_le_bytes());
                }
            }
        )*
    };
}

impl ByteBufferMut {
    /// Creates an empty ByteBufferMut ready for writing.
    pub fn new(order: ByteOrder) -> ByteBufferMut {
        ByteBufferMut::with_capacity(order, 0)
    }

    pub fn with_capacity(order: ByteOrder, capacity: usize) -> ByteBufferMut {
        ByteBufferMut {
            data: Vec::with_capacity(capacity),
            big_endian: order.is_big_endian(),
        }
    }

    /// Consumes this buffer and returns the underlying backing store. Use this
    /// to get the data out when you're done writing to the buffer.
    pub fn data(self) -> Vec<u8> {
        self.data
    }

    /// Returns the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a byte to the end of the buffer.
    pub fn write_byte(&mut self, value: u8) {
        self.data.push(value);
    }

    /// Write a raw byte slice to the end of the buffer.
    pub fn write_bytes(&mut self, value: &[u8]) {
        self.data.extend_from_slice(value);
    }

    write_fixed! {
        write_u16 <- u16,
        write_u32 <- u32,
        write_u64 <- u64,
        write_i16 <- i16,
        write_i32 <- i32,
        write_i64 <- i64,
        write_f32 <- f32,
        write_f64 <- f64,
    }

    pub fn write_i8(&mut self, value: i8) {
        self.data.push(value as u8);
    }

    /// Write an `f32` narrowed to IEEE 754 half precision.
    pub fn write_f16(&mut self, value: f32) {
        self.write_u16(f32_to_f16(value));
    }

    /// Writes one primitive from its dynamic value. Integers are truncated
    /// to the primitive's width, so callers range check first. Fails only
    /// when the value is not of the primitive's kind.
    pub fn write_primitive(&mut self, ty: PrimitiveType, value: &Value) -> Result<(), ()> {
        if ty == PrimitiveType::Pad {
            self.write_byte(0);
            return Ok(());
        }

        if let Some(int) = value.integer() {
            match ty {
                PrimitiveType::U8 => self.write_byte(int as u8),
                PrimitiveType::U16 => self.write_u16(int as u16),
                PrimitiveType::U32 => self.write_u32(int as u32),
                PrimitiveType::U64 | PrimitiveType::Int => self.write_u64(int as u64),
                PrimitiveType::I8 => self.write_i8(int as i8),
                PrimitiveType::I16 => self.write_i16(int as i16),
                PrimitiveType::I32 => self.write_i32(int as i32),
                PrimitiveType::I64 => self.write_i64(int as i64),
                _ => return Err(()),
            }
            return Ok(());
        }

        match (ty, value) {
            (PrimitiveType::F16, Value::Float(float)) => self.write_f16(*float as f32),
            (PrimitiveType::F32, Value::Float(float)) => self.write_f32(*float as f32),
            (PrimitiveType::F64 | PrimitiveType::Float, Value::Float(float)) => {
                self.write_f64(*float)
            }
            _ => return Err(()),
        }
        Ok(())
    }
}

impl Default for ByteBufferMut {
    fn default() -> ByteBufferMut {
        ByteBufferMut::new(ByteOrder::Native)
    }
}

/// Widens IEEE 754 half precision bits to an `f32`. Exact for every input.
pub fn f16_to_f32(bits: u16) -> f32 {
    let sign = ((bits & 0x8000) as u32) << 16;
    let exponent = ((bits >> 10) & 0x1f) as u32;
    let mantissa = (bits & 0x3ff) as u32;

    let out = if exponent == 0 {
        if mantissa == 0 {
            sign
        } else {
            // Subnormal half, renormalize into an f32 normal.
            let mut mantissa = mantissa;
            let mut exponent = 127 - 15 + 1;
            while mantissa & 0x400 == 0 {
                mantissa <<= 1;
                exponent -= 1;
            }
            sign | (exponent << 23) | ((mantissa & 0x3ff) << 13)
        }
    } else if exponent == 0x1f {
        sign | 0x7f80_0000 | (mantissa << 13)
    } else {
        sign | ((exponent + 127 - 15) << 23) | (mantissa << 13)
    };

    f32::from_bits(out)
}

/// Narrows an `f32` to IEEE 754 half precision bits, rounding to nearest
/// even. Out of range values become infinity.
pub fn f32_to_f16(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exponent = ((bits >> 23) & 0xff) as i32;
    let mantissa = bits & 0x7f_ffff;

    if exponent == 0xff {
        let nan = if mantissa != 0 { 0x200 | (mantissa >> 13) as u16 } else { 0 };
        return sign | 0x7c00 | nan;
    }

    let half_exponent = exponent - 127 + 15;
    if half_exponent >= 0x1f {
        return sign | 0x7c00;
    }

    if half_exponent <= 0 {
        if half_exponent < -10 {
            return sign;
        }
        let mantissa = mantissa | 0x80_0000;
        let shift = (14 - half_exponent) as u32;
        let half = mantissa >> shift;
        let rest = mantissa & ((1 << shift) - 1);
        let halfway = 1 << (shift - 1);
        let rounded = if rest > halfway || (rest == halfway && half & 1 == 1) {
            half + 1
        } else {
            half
        };
        return sign | rounded as u16;
    }

    let half = ((half_exponent as u32) << 10) | (mantissa >> 13);
    let rest = mantissa & 0x1fff;
    // A carry out of the mantissa bumps the exponent, which is what we want.
    let rounded = if rest > 0x1000 || (rest == 0x1000 && half & 1 == 1) {
        half + 1
    } else {
        half
    };
    sign | rounded as u16
}

#[test]
fn read_byte() {
    let read = |bytes| ByteBuffer::new(bytes, ByteOrder::Little).read_byte();
    assert_eq!(read(&[]), Err(()));
    assert_eq!(read(&[0]), Ok(0));
    assert_eq!(read(&[255]), Ok(255));
}

#[test]
fn read_bytes() {
    let read = |bytes, len| ByteBuffer::new(bytes, ByteOrder::Little).read_bytes(len);
    assert_eq!(read(&[], 0), Ok(vec![].as_slice()));
    assert_eq!(read(&[], 1), Err(()));
    assert_eq!(read(&[0], 1), Ok(vec![0].as_slice()));
    assert_eq!(read(&[0], 2), Err(()));

    let mut bb = ByteBuffer::new(&[1, 2, 3, 4, 5], ByteOrder::Big);
    assert_eq!(bb.read_bytes(3), Ok(vec![1, 2, 3].as_slice()));
    assert_eq!(bb.read_bytes(2), Ok(vec![4, 5].as_slice()));
    assert_eq!(bb.read_bytes(1), Err(()));
    assert_eq!(bb.index(), 5);
}

#[test]
fn read_integers_big_and_little() {
    let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    let mut big = ByteBuffer::new(&data, ByteOrder::Big);
    assert_eq!(big.read_u16(), Ok(0x0102));
    assert_eq!(big.read_u16(), Ok(0x0304));
    assert_eq!(big.read_u32(), Ok(0x0506_0708));

    let mut little = ByteBuffer::new(&data, ByteOrder::Little);
    assert_eq!(little.read_u64(), Ok(0x0807_0605_0403_0201));
    assert_eq!(little.read_u16(), Err(()));

    let mut signed = ByteBuffer::new(&[0xff, 0xfe, 0xff], ByteOrder::Little);
    assert_eq!(signed.read_i8(), Ok(-1));
    assert_eq!(signed.read_i16(), Ok(-2));
}

#[test]
fn read_short_buffer() {
    let mut bb = ByteBuffer::new(&[1, 2, 3], ByteOrder::Big);
    assert_eq!(bb.read_u32(), Err(()));
    // A failed read leaves the index untouched.
    assert_eq!(bb.index(), 0);
    assert_eq!(bb.read_u16(), Ok(0x0102));
}

#[test]
fn read_primitives() {
    let mut bb = ByteBuffer::new(&[0xaa, 0x07, 0xf9, 0xff, 0x00, 0x3c], ByteOrder::Little);
    assert_eq!(bb.read_primitive(PrimitiveType::Pad), Ok(Value::UInt(0)));
    assert_eq!(bb.read_primitive(PrimitiveType::U8), Ok(Value::UInt(7)));
    assert_eq!(bb.read_primitive(PrimitiveType::I16), Ok(Value::Int(-7)));
    assert_eq!(bb.read_primitive(PrimitiveType::F16), Ok(Value::Float(1.0)));
    assert_eq!(bb.read_primitive(PrimitiveType::U8), Err(()));
}

#[test]
fn half_precision_known_values() {
    assert_eq!(f32_to_f16(0.0), 0x0000);
    assert_eq!(f32_to_f16(-0.0), 0x8000);
    assert_eq!(f32_to_f16(1.0), 0x3c00);
    assert_eq!(f32_to_f16(-2.0), 0xc000);
    assert_eq!(f32_to_f16(9.0), 0x4880);
    assert_eq!(f32_to_f16(65504.0), 0x7bff);
    assert_eq!(f32_to_f16(65536.0), 0x7c00);
    assert_eq!(f32_to_f16(f32::INFINITY), 0x7c00);
    assert_eq!(f32_to_f16(f32::NEG_INFINITY), 0xfc00);
    assert_eq!(f32_to_f16(5.960_464_5e-8), 0x0001);

    assert_eq!(f16_to_f32(0x3c00), 1.0);
    assert_eq!(f16_to_f32(0x4880), 9.0);
    assert_eq!(f16_to_f32(0x7bff), 65504.0);
    assert_eq!(f16_to_f32(0x0001), 5.960_464_5e-8);
    assert_eq!(f16_to_f32(0x0200), 3.051_757_8e-5);
    assert_eq!(f16_to_f32(0xfc00), f32::NEG_INFINITY);
    assert!(f16_to_f32(0x7e00).is_nan());
    assert!(f16_to_f32(f32_to_f16(f32::NAN)).is_nan());
}

#[test]
fn half_precision_round_trips_every_pattern() {
    for bits in 0..=u16::MAX {
        let value = f16_to_f32(bits);
        if value.is_nan() {
            continue;
        }
        assert_eq!(f32_to_f16(value), bits, "bits {:#06x}", bits);
    }
}

#[cfg(test)]
fn write_once(order: ByteOrder, cb: fn(&mut ByteBufferMut)) -> Vec<u8> {
    let mut bb = ByteBufferMut::new(order);
    cb(&mut bb);
    bb.data()
}

#[test]
fn write_bytes() {
    let mut bb = ByteBufferMut::new(ByteOrder::Little);
    bb.write_bytes(&[1, 2, 3]);
    bb.write_bytes(&[]);
    bb.write_bytes(&[4, 5]);
    assert_eq!(bb.len(), 5);
    assert_eq!(bb.data(), [1, 2, 3, 4, 5]);
}

#[test]
fn write_integers_big_and_little() {
    assert_eq!(write_once(ByteOrder::Big, |bb| bb.write_u16(0x0102)), [1, 2]);
    assert_eq!(write_once(ByteOrder::Little, |bb| bb.write_u16(0x0102)), [2, 1]);
    assert_eq!(
        write_once(ByteOrder::Little, |bb| bb.write_i32(-7)),
        [0xf9, 0xff, 0xff, 0xff]
    );
    assert_eq!(
        write_once(ByteOrder::Big, |bb| bb.write_i32(-7)),
        [0xff, 0xff, 0xff, 0xf9]
    );
    assert_eq!(
        write_once(ByteOrder::Big, |bb| bb.write_u64(1)),
        [0, 0, 0, 0, 0, 0, 0, 1]
    );
    assert_eq!(write_once(ByteOrder::Little, |bb| bb.write_i8(-1)), [0xff]);
}

#[test]
fn write_floats() {
    assert_eq!(
        write_once(ByteOrder::Big, |bb| bb.write_f32(1.0)),
        [0x3f, 0x80, 0, 0]
    );
    assert_eq!(
        write_once(ByteOrder::Little, |bb| bb.write_f64(1.0)),
        [0, 0, 0, 0, 0, 0, 0xf0, 0x3f]
    );
    assert_eq!(write_once(ByteOrder::Big, |bb| bb.write_f16(9.0)), [0x48, 0x80]);
}

#[test]
fn write_primitives() {
    let mut bb = ByteBufferMut::new(ByteOrder::Big);
    assert_eq!(bb.write_primitive(PrimitiveType::Pad, &Value::UInt(9)), Ok(()));
    assert_eq!(bb.write_primitive(PrimitiveType::I16, &Value::Int(-2)), Ok(()));
    assert_eq!(bb.write_primitive(PrimitiveType::U8, &Value::UInt(5)), Ok(()));
    assert_eq!(bb.write_primitive(PrimitiveType::F16, &Value::Float(1.0)), Ok(()));
    assert_eq!(bb.write_primitive(PrimitiveType::U8, &Value::Float(1.0)), Err(()));
    assert_eq!(bb.write_primitive(PrimitiveType::F32, &Value::Int(1)), Err(()));
    assert_eq!(bb.data(), [0, 0xff, 0xfe, 5, 0x3c, 0]);
}
