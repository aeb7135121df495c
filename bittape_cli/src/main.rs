//! Command-line driver for the bit tape
//! 位磁带的命令行驱动器
//!
//! Commands run in the order they appear on the command line, e.g.
//! `bittape -b 8 -n 2 -p 3:5 -p 8:202 -g 3:5 -g 8:202 -G 1`.

use std::process::ExitCode;

use bittape::{BitTape, Word};
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// Word width in bits (8, 16, 32 or 64)
  /// 字宽，单位为位（8、16、32 或 64）
  #[arg(short, long, default_value_t = 8)]
  bit: u8,

  /// Number of storage words; the capacity is words * width
  /// 存储字数；容量为字数乘以字宽
  #[arg(short = 'n', long, default_value_t = 2)]
  words: usize,

  /// Write `cnt:val` bits, expecting success; prints the tape afterwards
  /// 写入 `cnt:val`，预期成功；成功后打印磁带内容
  #[arg(short = 'p', value_name = "CNT:VAL", action = ArgAction::Append)]
  put: Vec<String>,

  /// Read `cnt:val` bits, expecting success and the value to match
  /// 读取 `cnt:val`，预期成功且值相符
  #[arg(short = 'g', value_name = "CNT:VAL", action = ArgAction::Append)]
  get: Vec<String>,

  /// Write `cnt` zero bits, expecting failure
  /// 写入 `cnt` 个零位，预期失败
  #[arg(short = 'P', value_name = "CNT", action = ArgAction::Append)]
  fail_put: Vec<String>,

  /// Read `cnt` bits, expecting failure
  /// 读取 `cnt` 位，预期失败
  #[arg(short = 'G', value_name = "CNT", action = ArgAction::Append)]
  fail_get: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Cmd {
  Put { cnt: u8, val: u64 },
  Get { cnt: u8, val: u64 },
  FailPut { cnt: u8 },
  FailGet { cnt: u8 },
}

/// Parse a `cnt:val` command parameter.
/// 解析 `cnt:val` 形式的命令参数。
fn parse_pair(raw: &str) -> Result<(u8, u64), String> {
  let (cnt, val) = raw
    .split_once(':')
    .ok_or_else(|| format!("unable to parse the command parameters: '{raw}'"))?;
  let cnt = cnt
    .parse()
    .map_err(|_| format!("invalid bit count: '{cnt}'"))?;
  let val = val.parse().map_err(|_| format!("invalid value: '{val}'"))?;
  Ok((cnt, val))
}

fn parse_cnt(raw: &str) -> Result<u8, String> {
  raw
    .parse()
    .map_err(|_| format!("unable to parse the command parameter: '{raw}'"))
}

/// Recover the command-line order of all four command kinds from the clap
/// argument indices.
/// 通过 clap 参数索引恢复四种命令在命令行中的顺序。
fn ordered_cmds(matches: &ArgMatches, args: &Args) -> Result<Vec<Cmd>, String> {
  let mut cmds: Vec<(usize, Cmd)> = Vec::new();

  macro_rules! collect {
    ($id:literal, $field:ident, $raw:ident => $cmd:expr) => {
      if let Some(idxs) = matches.indices_of($id) {
        for (idx, $raw) in idxs.zip(&args.$field) {
          cmds.push((idx, $cmd));
        }
      }
    };
  }

  collect!("put", put, raw => {
    let (cnt, val) = parse_pair(raw)?;
    Cmd::Put { cnt, val }
  });
  collect!("get", get, raw => {
    let (cnt, val) = parse_pair(raw)?;
    Cmd::Get { cnt, val }
  });
  collect!("fail_put", fail_put, raw => Cmd::FailPut { cnt: parse_cnt(raw)? });
  collect!("fail_get", fail_get, raw => Cmd::FailGet { cnt: parse_cnt(raw)? });

  cmds.sort_by_key(|&(idx, _)| idx);
  Ok(cmds.into_iter().map(|(_, cmd)| cmd).collect())
}

/// Render the tape storage as a binary string: bits LSB-first, bytes split
/// into nibbles by `-`, bytes joined by `_`, words separated by spaces.
/// 将磁带存储渲染为二进制字符串：位按低位在前，字节以 `-` 分为两个半字节，
/// 字节间以 `_` 连接，字与字之间以空格分隔。
fn tape_str<W: Word>(tape: &BitTape<W>) -> String {
  let mut out = String::new();

  for (i, word) in tape.words.iter().enumerate() {
    if i > 0 {
      out.push_str("   ");
    }
    let bits = word.as_u64();
    for byte in 0..W::BITS / 8 {
      if byte > 0 {
        out.push('_');
      }
      for k in 0..8 {
        if k == 4 {
          out.push('-');
        }
        out.push(if (bits >> (byte * 8 + k)) & 1 == 1 {
          '1'
        } else {
          '0'
        });
      }
    }
  }

  out
}

/// Execute the command sequence against a tape of the requested geometry.
/// 在指定几何参数的磁带上执行命令序列。
fn run<W: Word>(words: usize, cmds: &[Cmd]) -> Result<(), String> {
  let mut tape: BitTape<W> = BitTape::new(words * W::BITS as usize);
  println!("{}", tape_str(&tape));

  for cmd in cmds {
    let cnt = match *cmd {
      Cmd::Put { cnt, .. } | Cmd::Get { cnt, .. } | Cmd::FailPut { cnt } | Cmd::FailGet { cnt } => {
        cnt
      }
    };
    if cnt > W::BITS {
      return Err(format!("bit count {cnt} exceeds the word width {}", W::BITS));
    }

    match *cmd {
      Cmd::Put { cnt, val } => {
        tape.put(cnt, val).map_err(|e| format!("put failed: {e}"))?;
        println!("{}", tape_str(&tape));
      }
      Cmd::Get { cnt, val } => {
        let act = tape.get(cnt).map_err(|e| format!("get failed: {e}"))?;
        if act != val {
          return Err(format!("get({cnt}) value mismatch: exp={val} act={act}"));
        }
      }
      Cmd::FailPut { cnt } => {
        if tape.put(cnt, 0).is_ok() {
          return Err("put succeeded but was supposed to fail".into());
        }
      }
      Cmd::FailGet { cnt } => {
        if tape.get(cnt).is_ok() {
          return Err("get succeeded but was supposed to fail".into());
        }
      }
    }
  }

  Ok(())
}

fn main() -> ExitCode {
  let matches = Args::command().get_matches();
  let args = match Args::from_arg_matches(&matches) {
    Ok(args) => args,
    Err(e) => e.exit(),
  };

  let ret = ordered_cmds(&matches, &args).and_then(|cmds| match args.bit {
    8 => run::<u8>(args.words, &cmds),
    16 => run::<u16>(args.words, &cmds),
    32 => run::<u32>(args.words, &cmds),
    64 => run::<u64>(args.words, &cmds),
    bit => Err(format!("unsupported word width: {bit}")),
  });

  match ret {
    Ok(()) => ExitCode::SUCCESS,
    Err(msg) => {
      eprintln!("{msg}");
      ExitCode::FAILURE
    }
  }
}
