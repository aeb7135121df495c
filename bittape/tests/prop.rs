//! Randomized round-trip tests for BitTape
//! BitTape 随机往返测试

use aok::{OK, Void};
use bittape::{BitTape, Word};
use log::trace;
use rand::prelude::*;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

/// Runs of bits written to the tape during each repetition.
const LEN: usize = 24;
/// Repetitions per word width.
const REP: usize = 512;

/// Random counts in `1..=W::BITS` with values masked accordingly.
/// 随机位数（`1..=W::BITS`），值按位数掩码。
fn gen_runs<W: Word>(rng: &mut StdRng) -> Vec<(u8, u64)> {
  (0..LEN)
    .map(|_| {
      let cnt = rng.random_range(1..=W::BITS);
      let val = rng.random::<u64>() & (!0u64 >> (64 - cnt));
      (cnt, val)
    })
    .collect()
}

/// Random interleaving of `LEN` writes and `LEN` reads where each read is
/// scheduled only behind the writes. A write is picked with probability 2/3
/// whenever both moves are possible.
/// 随机交错 `LEN` 次写与 `LEN` 次读，读操作只会排在对应写操作之后。
fn gen_ops(rng: &mut StdRng) -> Vec<bool> {
  let mut ops = Vec::with_capacity(LEN * 2);
  let mut reads = 0;
  let mut writes = 0;

  while reads < LEN || writes < LEN {
    let dice = rng.random_range(0..3u8);
    if dice == 0 && reads < writes {
      ops.push(false);
      reads += 1;
    } else if writes < LEN {
      ops.push(true);
      writes += 1;
    } else if reads < writes {
      ops.push(false);
      reads += 1;
    }
  }

  ops
}

/// Replay one schedule and verify every read returns the written value.
/// 重放一个操作序列并校验每次读取返回写入的值。
fn run_case<W: Word>(rng: &mut StdRng) {
  let runs = gen_runs::<W>(rng);
  let ops = gen_ops(rng);

  let mut tape: BitTape<W> = BitTape::new(LEN * W::BITS as usize);
  let mut put = 0;
  let mut get = 0;

  for &write in &ops {
    if write {
      let (cnt, val) = runs[put];
      tape.put(cnt, val).unwrap();
      put += 1;
    } else {
      let (cnt, val) = runs[get];
      assert_eq!(tape.get(cnt).unwrap(), val, "run {get} of {ops:?}");
      get += 1;
    }
  }

  assert_eq!(tape.available(), 0);
}

#[test]
fn test_roundtrip_random() -> Void {
  let mut rng = StdRng::seed_from_u64(42);

  for _ in 0..REP {
    run_case::<u8>(&mut rng);
    run_case::<u16>(&mut rng);
    run_case::<u32>(&mut rng);
    run_case::<u64>(&mut rng);
  }

  trace!("roundtrip_random passed");
  OK
}

/// A tape sized to exactly the sum of the run lengths fills completely and
/// rejects one more bit.
/// 容量恰好等于位段长度之和的磁带可被写满，且无法再写入任何一位。
fn run_exact_fill<W: Word>(rng: &mut StdRng) {
  let runs = gen_runs::<W>(rng);
  let total: usize = runs.iter().map(|&(cnt, _)| cnt as usize).sum();

  let mut tape: BitTape<W> = BitTape::new(total);
  for &(cnt, val) in &runs {
    tape.put(cnt, val).unwrap();
  }
  assert_eq!(tape.remaining(), 0);
  assert!(tape.put(1, 0).is_err());
  assert_eq!(tape.total_bits(), total);

  for &(cnt, val) in &runs {
    assert_eq!(tape.get(cnt).unwrap(), val);
  }
  assert!(tape.get(1).is_err());
}

#[test]
fn test_exact_fill_random() -> Void {
  let mut rng = StdRng::seed_from_u64(7);

  for _ in 0..REP {
    run_exact_fill::<u8>(&mut rng);
    run_exact_fill::<u16>(&mut rng);
    run_exact_fill::<u32>(&mut rng);
    run_exact_fill::<u64>(&mut rng);
  }

  trace!("exact_fill_random passed");
  OK
}
