//! Little-endian byte accumulator shared by every encoder in
//! [`crate::encode`]. Output datagrams are always little-endian (§6.4);
//! unlike the read side there is no swap to track.
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        ByteWriter { buf: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn i8(&mut self, v: i8) {
        self.buf.push(v as u8);
    }

    pub fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn bytes(&mut self, b: &[u8]) {
        self.buf.extend_from_slice(b);
    }

    /// Writes `s` verbatim followed by the `0x03` sentinel used by the
    /// ASCII record kinds (§4.1 point 7). Callers that join comma-
    /// separated fields (`Start`/`Stop`'s key=value list) must escape
    /// embedded commas to `^` themselves before calling this, since the
    /// comma here has no structural meaning to `ByteWriter` itself.
    pub fn ascii_with_stop(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0x03);
    }

    /// Pads with one `0x00` byte if the accumulator's length so far is
    /// odd (§4.3: `WaterColumn`/`NetworkAttitude` pad their body to an
    /// even length before the trailer).
    pub fn pad_to_even(&mut self) {
        if self.buf.len() % 2 != 0 {
            self.buf.push(0);
        }
    }
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}
