//! 端到端会话测试
//!
//! 起一个真实 TCP 服务（仿真后端），按上位机的方式逐行收发，覆盖
//! 协议的端到端场景。

use armlink_engine::{CustomRegistry, Dispatcher, Engine};
use armlink_server::{Server, SimDigitalIo, SimGripper, sim_arm};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 上位机侧的最小行客户端
struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    buffer: String,
}

impl Client {
    fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        Self {
            reader: BufReader::new(stream.try_clone().unwrap()),
            writer: BufWriter::new(stream),
            buffer: String::new(),
        }
    }

    fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).unwrap();
        self.writer.write_all(b"\n").unwrap();
        self.writer.flush().unwrap();
    }

    fn recv(&mut self) -> String {
        self.buffer.clear();
        self.reader.read_line(&mut self.buffer).unwrap();
        self.buffer.trim().to_string()
    }

    fn roundtrip(&mut self, line: &str) -> String {
        self.send(line);
        self.recv()
    }
}

fn spawn_server() -> (Server, SocketAddr) {
    let (controller, state) = sim_arm();
    let mut registry = CustomRegistry::new();
    registry.register("ECHO", |fields: &[String]| Ok(Some(fields[1..].join(","))));

    let dispatcher = Arc::new(Dispatcher::new(
        Engine::new(controller),
        Arc::new(SimGripper::default()),
        Arc::new(SimDigitalIo::default()),
        state,
        registry,
    ));
    let server = Server::spawn("127.0.0.1:0", dispatcher).unwrap();
    let addr = server.local_addr();
    (server, addr)
}

#[test]
fn test_execute_motion_and_query_frame() {
    let (_server, addr) = spawn_server();
    let mut client = Client::connect(addr);

    assert_eq!(
        client.roundtrip("EXECUTE, MOTION, L, T, 1, 2, 3, 0, 0, 0"),
        "OK"
    );
    assert_eq!(client.roundtrip("CURRENT, FRAME"), "1,2,3,0,0,0");
    assert_eq!(client.roundtrip("CURRENT, JOINT"), "0,0,0,0,0,0");
}

#[test]
fn test_digital_output_then_input() {
    let (_server, addr) = spawn_server();
    let mut client = Client::connect(addr);

    // 输出是火忘指令：下一条读到的行就是 INPUT 的响应
    client.send("DIGITAL, BECKHOFF, 1, OUTPUT, HIGH");
    assert_eq!(client.roundtrip("DIGITAL, BECKHOFF, 1, INPUT"), "HIGH");
    assert_eq!(client.roundtrip("DIGITAL, WRIST, INPUT"), "LOW");
}

#[test]
fn test_gripper_sequence() {
    let (_server, addr) = spawn_server();
    let mut client = Client::connect(addr);

    client.send("GRIPPER, ACTIVATE");
    client.send("GRIPPER, SET, OPEN");
    assert_eq!(client.roundtrip("GRIPPER, GET"), "100");
}

#[test]
fn test_unknown_keyword_yields_error_and_protocol_continues() {
    let (_server, addr) = spawn_server();
    let mut client = Client::connect(addr);

    let response = client.roundtrip("FOO, 1, 2");
    assert!(response.starts_with("ERROR,MALFORMED_INSTRUCTION,"));

    // 会话继续接收后续行
    assert_eq!(client.roundtrip("CURRENT, JOINT"), "0,0,0,0,0,0");
}

#[test]
fn test_custom_echo_handler() {
    let (_server, addr) = spawn_server();
    let mut client = Client::connect(addr);

    assert_eq!(client.roundtrip("CUSTOM, ECHO, hello, world"), "hello,world");

    let response = client.roundtrip("CUSTOM, NOPE");
    assert!(response.starts_with("ERROR,UNHANDLED_CUSTOM,"));
}

#[test]
fn test_queries_not_blocked_by_draining_sleep() {
    let (_server, addr) = spawn_server();
    let mut client = Client::connect(addr);

    // 排空线程睡着时，查询路径仍然即时响应
    client.send("ENQUEUE, SLEEP, 0.5");
    let start = Instant::now();
    assert_eq!(client.roundtrip("CURRENT, FRAME"), "0,0,0,0,0,0");
    assert!(
        start.elapsed() < Duration::from_millis(250),
        "query stalled behind queue drain"
    );
}

#[test]
fn test_sequential_connections() {
    let (_server, addr) = spawn_server();

    {
        let mut first = Client::connect(addr);
        assert_eq!(first.roundtrip("EXECUTE, MOTION, L, T, 9,0,0,0,0,0"), "OK");
    }

    // 前一个连接断开后，新连接看到同一条机械臂
    let mut second = Client::connect(addr);
    assert_eq!(second.roundtrip("CURRENT, FRAME"), "9,0,0,0,0,0");
}
