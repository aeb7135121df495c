//! Fixed-capacity append-only bit tape for bit-packed codecs
//! 面向位压缩编解码器的固定容量只追加位磁带

pub mod error;
pub mod word;

pub use self::{
  error::{Error, Result},
  word::Word,
};

/// Append-only bit tape over an array of fixed-width words.
/// 基于定宽字数组的只追加位磁带。
///
/// Runs of `1..=W::BITS` bits are packed at arbitrary bit positions; a run
/// straddling a word boundary is split into two sub-operations. The read head
/// never passes the write head, and neither head ever moves backwards.
/// `1..=W::BITS` 位的位段可写入任意位偏移；跨字边界的位段被拆分为两次子操作。
/// 读头永不越过写头，两个游标均单调递增。
#[derive(Clone, Debug)]
pub struct BitTape<W: Word = u64> {
  /// Packed bit storage. 位存储。
  pub words: Vec<W>,
  read_pos: usize,
  write_pos: usize,
  cap: usize,
}

impl<W: Word> BitTape<W> {
  /// Create a tape able to hold `capacity` bits, zero-filled, both heads at 0.
  /// 创建可容纳 `capacity` 位的磁带，存储清零，两个游标归零。
  pub fn new(capacity: usize) -> Self {
    Self {
      words: vec![W::default(); capacity.div_ceil(W::BITS as usize)],
      read_pos: 0,
      write_pos: 0,
      cap: capacity,
    }
  }

  /// Append `cnt` bits of `val` at the write head.
  /// 在写头处追加 `val` 的低 `cnt` 位。
  ///
  /// `cnt` must not exceed `W::BITS`. Bits of `val` at positions `>= cnt`
  /// are masked off before packing.
  pub fn put(&mut self, cnt: u8, val: u64) -> Result<()> {
    debug_assert!(cnt <= W::BITS);

    if self.write_pos + cnt as usize > self.cap {
      return Err(Error::CapacityExceeded {
        want: cnt,
        used: self.write_pos,
        cap: self.cap,
      });
    }
    if cnt == 0 {
      return Ok(());
    }
    let val = val & (!0u64 >> (64 - cnt));

    let pos = self.write_pos % W::BITS as usize;
    if pos + cnt as usize <= W::BITS as usize {
      self.put_word(val, cnt);
    } else {
      // Bits landing in the next word.
      let spl = (pos + cnt as usize - W::BITS as usize) as u8;
      self.put_word(val, cnt - spl);
      self.put_word(val >> (cnt - spl), spl);
    }

    Ok(())
  }

  /// Consume and return `cnt` bits from the read head.
  /// 从读头处消费并返回 `cnt` 位。
  ///
  /// `cnt` must not exceed `W::BITS`.
  pub fn get(&mut self, cnt: u8) -> Result<u64> {
    debug_assert!(cnt <= W::BITS);

    if self.read_pos + cnt as usize > self.write_pos {
      return Err(Error::InsufficientData {
        want: cnt,
        avail: self.write_pos - self.read_pos,
      });
    }
    if cnt == 0 {
      return Ok(0);
    }

    let pos = self.read_pos % W::BITS as usize;
    if pos + cnt as usize <= W::BITS as usize {
      Ok(self.get_word(cnt))
    } else {
      let spl = (pos + cnt as usize - W::BITS as usize) as u8;
      let lower = self.get_word(cnt - spl);
      let upper = self.get_word(spl);
      Ok(lower | (upper << (cnt - spl)))
    }
  }

  /// Maximum number of bits the tape may hold.
  /// 磁带可容纳的最大位数。
  #[inline]
  #[must_use]
  pub fn capacity(&self) -> usize {
    self.cap
  }

  /// Total bits appended so far (the write head position).
  /// 到目前为止追加的总位数（写头位置）。
  #[inline]
  #[must_use]
  pub fn total_bits(&self) -> usize {
    self.write_pos
  }

  /// Written but not yet consumed bits.
  /// 已写入但尚未消费的位数。
  #[inline]
  #[must_use]
  pub fn available(&self) -> usize {
    self.write_pos - self.read_pos
  }

  /// Free bits left for writes.
  /// 剩余可写位数。
  #[inline]
  #[must_use]
  pub fn remaining(&self) -> usize {
    self.cap - self.write_pos
  }

  /// Write within a single word: `1 <= cnt` and the run ends at or before the
  /// word boundary. Bits of `val` shifted past the word width are dropped by
  /// the narrowing conversion.
  #[inline(always)]
  fn put_word(&mut self, val: u64, cnt: u8) {
    let idx = self.write_pos / W::BITS as usize;
    let off = self.write_pos % W::BITS as usize;
    let cur = self.words[idx].as_u64();
    self.words[idx] = W::from_u64(cur | (val << off));
    self.write_pos += cnt as usize;
  }

  /// Read within a single word, masked to exactly `cnt` bits, `1 <= cnt`.
  #[inline(always)]
  fn get_word(&mut self, cnt: u8) -> u64 {
    let idx = self.read_pos / W::BITS as usize;
    let off = self.read_pos % W::BITS as usize;
    // SAFETY: read_pos + cnt <= write_pos <= cap, and the storage holds
    // cap.div_ceil(W::BITS) words, so idx is in bounds.
    let word = unsafe { *self.words.get_unchecked(idx) };
    self.read_pos += cnt as usize;
    (word.as_u64() >> off) & (!0u64 >> (64 - cnt))
  }
}
