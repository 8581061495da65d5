//! check 子命令
//!
//! 不连接任何设备，逐行解析指令脚本并报告文法错误；供上位机脚本
//! 作者在下发前自检。

use anyhow::{Context, Result, bail};
use armlink_protocol::parse_line;
use clap::Args;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CheckCommand {
    /// 指令脚本路径（缺省从 stdin 读取）
    file: Option<PathBuf>,
}

impl CheckCommand {
    pub fn run(self) -> Result<()> {
        let reader: Box<dyn BufRead> = match &self.file {
            Some(path) => Box::new(BufReader::new(
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
            )),
            None => Box::new(BufReader::new(io::stdin())),
        };

        let mut total = 0usize;
        let mut failures = 0usize;
        for (number, line) in reader.lines().enumerate() {
            let line = line.context("failed to read input")?;
            // 脚本文件允许空行作分隔，线协议本身不允许
            if line.trim().is_empty() {
                continue;
            }
            total += 1;
            if let Err(err) = parse_line(&line) {
                failures += 1;
                eprintln!("line {}: {err}", number + 1);
            }
        }

        if failures > 0 {
            bail!("{failures} of {total} instruction line(s) invalid");
        }
        println!("{total} instruction line(s) OK");
        Ok(())
    }
}
