//! 单连接会话
//!
//! 每个上位机连接一个会话线程：逐行读入、解析、分派、写回响应。
//! 会话内的协议/执行错误只产生错误行，不终止会话；对端断开或 IO
//! 失败时会话结束。

use armlink_engine::{Dispatcher, EngineError};
use armlink_protocol::{ErrorCode, encode_error, parse_line};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::TcpStream;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// 运行一个会话直到对端断开
pub fn run_session(stream: TcpStream, dispatcher: Arc<Dispatcher>) -> std::io::Result<()> {
    let peer = stream.peer_addr()?;
    debug!("session started for {peer}");

    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let size = reader.read_line(&mut buffer)?;
        if size == 0 {
            debug!("session for {peer} closed by peer");
            return Ok(());
        }
        let line = buffer.trim();
        trace!("<<< {line}");

        if let Some(response) = handle_line(&dispatcher, line) {
            trace!(">>> {response}");
            writer.write_all(response.as_bytes())?;
            writer.write_all(b"\r\n")?;
            writer.flush()?;
        }
    }
}

/// 处理一行，返回要写回的响应行（若有）
///
/// 需要响应的指令恰好产生一行；火忘指令成功时不产生输出，失败时
/// 仍然产生一条错误行。
pub fn handle_line(dispatcher: &Dispatcher, line: &str) -> Option<String> {
    let instruction = match parse_line(line) {
        Ok(instruction) => instruction,
        Err(err) => {
            warn!("rejected line {line:?}: {err}");
            return Some(encode_error(ErrorCode::from(&err), &err.to_string()));
        }
    };

    match dispatcher.dispatch(instruction) {
        Ok(Some(response)) => Some(response.encode()),
        Ok(None) => None,
        Err(err) => {
            warn!("dispatch failed for {line:?}: {err}");
            let code = match &err {
                EngineError::Execution(_) => ErrorCode::ExecutionFailure,
                EngineError::QueueHalted => ErrorCode::QueueHalted,
                EngineError::UnhandledCustom(_) => ErrorCode::UnhandledCustom,
            };
            Some(encode_error(code, &err.to_string()))
        }
    }
}
