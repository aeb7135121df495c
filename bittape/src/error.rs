use thiserror::Error;

/// Tape specialized Result type.
/// 磁带专用的 Result 类型。
pub type Result<T> = std::result::Result<T, Error>;

/// Tape error enum. Both kinds are recoverable: a failed operation leaves the
/// tape untouched and usable.
/// 磁带错误枚举。两种错误均可恢复：失败的操作不会改变磁带状态。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  /// Write would run past the fixed capacity.
  /// 写入将超出固定容量。
  #[error("tape capacity exceeded: {used} of {cap} bits written, {want} more requested")]
  CapacityExceeded { want: u8, used: usize, cap: usize },
  /// Read would run past the write head.
  /// 读取将越过写头。
  #[error("insufficient data: {avail} bits readable, {want} requested")]
  InsufficientData { want: u8, avail: usize },
}
