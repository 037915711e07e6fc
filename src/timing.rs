//! Settle time after area commands.
//!
//! The acceleration engine of the SSD1331 keeps drawing after the command bytes have been
//! clocked in, and a command arriving before it finishes corrupts the command queue. Fill and
//! copy therefore block for a time proportional to the number of pixels they touch.

/// Right shift applied to the pixel count. Calibrated on a 96x64 panel, where a full-screen fill
/// (6144 pixels) needs somewhat over 1000 us.
pub const SETTLE_SHIFT: u32 = 2;

/// Microseconds to wait after a fill or copy touching `pixels` pixels.
pub fn settle_delay_us(pixels: u32) -> u32 {
    pixels >> SETTLE_SHIFT
}
