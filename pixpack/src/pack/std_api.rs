use crate::{pack::PackContext, BitDepth};
use snafu::{ResultExt, Snafu};
use std::io::Write;

/// Bytes packed per `write_all` call.
const CHUNK_BYTES: usize = 512;

#[derive(Debug, Snafu)]
pub enum PackWriteError {
    WriteIo { source: std::io::Error },
}

impl PackContext {
    pub fn pack<W: Write>(pixels: &[u8], depth: BitDepth, mut w: W) -> Result<(), PackWriteError> {
        let mut state = PackContext::new(depth);
        state.pack_with_state(pixels, &mut w)?;
        state.finish_to(w)
    }

    /// Packs `pixels` into `w`, keeping an incomplete last byte pending in `self`.
    pub fn pack_with_state<W: Write>(
        &mut self,
        pixels: &[u8],
        mut w: W,
    ) -> Result<(), PackWriteError> {
        let mut buf = [0u8; CHUNK_BYTES];
        let mut len = 0;

        for &pixel in pixels {
            if let Some(byte) = self.push(pixel) {
                buf[len] = byte;
                len += 1;

                if len == CHUNK_BYTES {
                    w.write_all(&buf).context(WriteIoSnafu)?;
                    len = 0;
                }
            }
        }

        w.write_all(&buf[..len]).context(WriteIoSnafu)
    }

    /// Writes out the pending partial byte, if any.
    pub fn finish_to<W: Write>(&mut self, mut w: W) -> Result<(), PackWriteError> {
        match self.finish() {
            Some(byte) => w.write_all(&[byte]).context(WriteIoSnafu),
            None => Ok(()),
        }
    }
}
