//! Bit-to-physical-unit conversion.
//!
//! The ADC ships channel readings as big-endian 24-bit two's-complement
//! "counts"; the accelerometer ships 16-bit counts. Both are sign-extended
//! to `i32` and multiplied by a fixed linear scale factor. All functions are
//! total over their inputs and safe to call from any thread.

/// ADC reference voltage in volts, fixed by the amplifier hardware.
pub const VREF: f64 = 4.5;

/// Programmable gain the board configures on the ADC (its maximum).
pub const GAIN: f64 = 24.0;

/// Microvolts per channel count: `VREF / GAIN / (2^23 − 1) × 1e6`.
pub const UV_PER_COUNT: f64 = VREF / GAIN / ((1 << 23) as f64 - 1.0) * 1e6;

/// G-force per accelerometer count.
///
/// ±4 g range gives 2 mg per digit, and the low 4 bits of each axis are
/// unused: `0.002 / 2^4`.
pub const G_PER_COUNT: f64 = 0.002 / 16.0;

/// Sign-extends a big-endian 24-bit two's-complement value to `i32`.
pub fn sign_extend_24(bytes: [u8; 3]) -> i32 {
    let mut value =
        (u32::from(bytes[0]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[2])) as i32;
    if value & 0x0080_0000 != 0 {
        value |= 0xFF00_0000u32 as i32;
    }
    value
}

/// Sign-extends a big-endian 16-bit two's-complement value to `i32`.
pub fn sign_extend_16(bytes: [u8; 2]) -> i32 {
    let mut value = (u32::from(bytes[0]) << 8 | u32::from(bytes[1])) as i32;
    if value & 0x0000_8000 != 0 {
        value |= 0xFFFF_0000u32 as i32;
    }
    value
}

/// Converts raw channel counts to microvolts.
pub fn counts_to_microvolts(counts: i32) -> f64 {
    f64::from(counts) * UV_PER_COUNT
}

/// Converts raw accelerometer counts to g-force.
pub fn counts_to_g(counts: i32) -> f64 {
    f64::from(counts) * G_PER_COUNT
}
