//! Frame-boundary synchronization.
//!
//! Finds a trustworthy frame-start offset in an accumulated buffer. A single
//! header byte is not sufficient evidence of alignment — channel data bytes
//! can incidentally equal the header constant — so a candidate offset is
//! confirmed by requiring the header to recur at the next two frame-length
//! strides. Stride positions beyond the end of the buffer cannot contradict
//! a candidate and are left to the decoder's header+footer validation once a
//! full frame is available; this is what lets the final frames of a stream
//! (which have no successor header to check) decode at all.

use crate::protocol::{FRAME_LEN, HEADER};

/// Returns the lowest offset `p >= from` that passes the stride check, or
/// `None` when every testable position is disproven.
///
/// Earliest valid offset wins: lowest latency, deterministic.
pub fn find_frame_start(buf: &[u8], from: usize) -> Option<usize> {
    (from..buf.len()).find(|&p| is_confirmed_start(buf, p))
}

/// Checks `buf[p]` and the two following frame-length strides, skipping
/// strides that fall past the end of the buffer.
fn is_confirmed_start(buf: &[u8], p: usize) -> bool {
    if buf.get(p) != Some(&HEADER) {
        return false;
    }
    [p + FRAME_LEN, p + 2 * FRAME_LEN]
        .iter()
        .all(|&stride| stride >= buf.len() || buf[stride] == HEADER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::FOOTER;

    /// Builds `n` consecutive empty-but-valid frames.
    fn frames(n: usize) -> Vec<u8> {
        let mut out = Vec::new();
        for seq in 0..n {
            let mut f = vec![0u8; FRAME_LEN];
            f[0] = HEADER;
            f[1] = seq as u8;
            f[FRAME_LEN - 1] = FOOTER;
            out.extend_from_slice(&f);
        }
        out
    }

    #[test]
    fn finds_aligned_start_of_three_frames() {
        let buf = frames(3);
        assert_eq!(find_frame_start(&buf, 0), Some(0));
    }

    #[test]
    fn finds_start_after_garbage_prefix() {
        let mut buf = vec![0x11, 0x22, 0x33];
        buf.extend_from_slice(&frames(3));
        assert_eq!(find_frame_start(&buf, 0), Some(3));
    }

    #[test]
    fn rejects_header_valued_data_byte() {
        // A lone header byte whose +33/+66 strides are in range but do not
        // match must not be accepted; the real boundary follows it.
        let mut buf = vec![0u8; 5];
        buf[2] = HEADER;
        buf.extend_from_slice(&frames(3));
        // Offset 2 has non-header bytes at 35 and 68 (mid-frame data).
        assert_eq!(find_frame_start(&buf, 0), Some(5));
    }

    #[test]
    fn no_header_anywhere_reports_none() {
        let buf = vec![0x55u8; 100];
        assert_eq!(find_frame_start(&buf, 0), None);
    }

    #[test]
    fn respects_search_start_position() {
        let buf = frames(4);
        assert_eq!(find_frame_start(&buf, 1), Some(FRAME_LEN));
    }

    #[test]
    fn single_frame_passes_with_vacuous_strides() {
        // One 33-byte frame: both strides fall past the buffer end, so the
        // header alone is accepted; the decoder's footer check backstops it.
        let buf = frames(1);
        assert_eq!(find_frame_start(&buf, 0), Some(0));
    }

    #[test]
    fn empty_buffer_reports_none() {
        assert_eq!(find_frame_start(&[], 0), None);
    }

    #[test]
    fn earliest_valid_offset_wins() {
        // Two candidate alignments; the earlier one is returned.
        let mut buf = frames(3);
        // Make a second plausible start one frame in — already the case for
        // aligned frames; scanning from 0 must return 0, not 33.
        buf[1] = 7;
        assert_eq!(find_frame_start(&buf, 0), Some(0));
    }
}
