//! 台本どおりに応答するトランスポートを使ったセッションのテスト

use gdbcon_core::{ConsoleError, Gdb, KillOutcome, RunOutcome, Transport};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

const PROMPT: &str = "(gdb) ";

/// 送られたコマンドごとに、用意した応答とプロンプトを返すトランスポート
///
/// 台本が尽きた後のコマンドには何も返さない（ストリーム終端になる）。
struct ScriptedTransport {
    replies: VecDeque<(&'static str, &'static str)>,
    pending: VecDeque<u8>,
    sent: Rc<RefCell<Vec<String>>>,
    shut_down: Rc<RefCell<bool>>,
}

impl ScriptedTransport {
    fn new(banner: &str, replies: &[(&'static str, &'static str)]) -> Self {
        Self {
            replies: replies.iter().copied().collect(),
            pending: format!("{}{}", banner, PROMPT).into_bytes().into(),
            sent: Rc::default(),
            shut_down: Rc::default(),
        }
    }
}

impl Transport for ScriptedTransport {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.pending.pop_front())
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let line = String::from_utf8(bytes.to_vec()).unwrap();
        let line = line.strip_suffix('\n').expect("command must end with a newline");
        assert!(!line.contains('\n'), "one command per write");
        self.sent.borrow_mut().push(line.to_string());

        if let Some((expected, reply)) = self.replies.pop_front() {
            assert_eq!(line, expected, "unexpected command");
            self.pending.extend(reply.as_bytes());
            self.pending.extend(PROMPT.as_bytes());
        }
        Ok(())
    }

    fn shutdown(&mut self) -> io::Result<()> {
        *self.shut_down.borrow_mut() = true;
        Ok(())
    }
}

/// セッションと送信ログを作成する
fn session(
    replies: &[(&'static str, &'static str)],
) -> (Gdb<ScriptedTransport>, Rc<RefCell<Vec<String>>>) {
    let transport = ScriptedTransport::new("GNU gdb (GDB) 13.2\n", replies);
    let sent = Rc::clone(&transport.sent);
    let gdb = Gdb::with_transport(transport, PROMPT).expect("Failed to start session");
    (gdb, sent)
}

#[test]
fn test_backtrace() {
    let (mut gdb, sent) = session(&[(
        "backtrace",
        "#0  0x950aa9e6 in mach_msg_trap ()\n\
         #1  0x6840 in expand_token (obs=0x0, t=177664, td=0xf7fffb08) at macro.c:71\n\
         #2  main (argc=1, argv=0xbffff590) at main.c:75\n",
    )]);

    let frames = gdb.backtrace().unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[&1].location.function, "expand_token");
    assert_eq!(frames[&2].location.source.as_deref(), Some("main.c:75"));
    assert_eq!(*sent.borrow(), vec!["backtrace"]);
}

#[test]
fn test_backtrace_without_stack() {
    let (mut gdb, _) = session(&[("backtrace", "No stack.\n")]);
    assert!(gdb.backtrace().unwrap().is_empty());
}

#[test]
fn test_info_threads_and_thread_detail() {
    let (mut gdb, sent) = session(&[
        (
            "info threads",
            "* 1 process 2332 thread 0x20b  0x950aa9e6 in mach_msg_trap ()\n\
             \x20 2 process 2332 thread 0x1703  0x950b2b4a in semaphore_wait_trap ()\n",
        ),
        ("info thread 2", "Thread 2 has target id 'thread 0x1703'\n"),
    ]);

    let threads = gdb.info_threads().unwrap();
    assert_eq!(threads.len(), 2);
    assert!(threads[&1].current);

    let info = threads[&2].info(&mut gdb).unwrap();
    assert_eq!(info, "Thread 2 has target id 'thread 0x1703'\n");
    assert_eq!(*sent.borrow(), vec!["info threads", "info thread 2"]);
}

#[test]
fn test_frame_locals_selects_frame() {
    let (mut gdb, sent) = session(&[
        ("frame 1", "#1  0x6840 in expand_token (obs=0x0) at macro.c:71\n71\t  return t;\n"),
        ("select-frame 1", ""),
        ("info locals", "t = 177664\nobs = (struct obstack *) 0x0\n"),
        ("select-frame 1", ""),
        ("info args", "No arguments.\n"),
    ]);

    let frame = gdb.frame(Some(1)).unwrap();
    assert_eq!(frame.number, 1);

    let locals = frame.locals(&mut gdb).unwrap();
    assert_eq!(locals.len(), 2);
    assert_eq!(locals["obs"].value, "(struct obstack *) 0x0");

    let args = frame.args(&mut gdb).unwrap();
    assert!(args.is_empty());

    assert_eq!(
        *sent.borrow(),
        vec!["frame 1", "select-frame 1", "info locals", "select-frame 1", "info args"]
    );
}

#[test]
fn test_up_and_down_at_the_ends() {
    let (mut gdb, _) = session(&[
        ("up", "Initial frame selected; you cannot go up.\n"),
        ("down 2", "Bottom (innermost) frame selected; you cannot go down.\n"),
        ("up 1", "#1  main () at main.c:9\n9\t  f();\n"),
    ]);

    assert_eq!(gdb.up(None).unwrap(), None);
    assert_eq!(gdb.down(Some(2)).unwrap(), None);
    let frame = gdb.up(Some(1)).unwrap().unwrap();
    assert_eq!(frame.location.function, "main");
}

#[test]
fn test_return_confirms() {
    let (mut gdb, sent) = session(&[
        ("return 0", "Make f return now? (y or n) [answered Y; input not from terminal]\n"),
        ("y", "#0  0x0000555555555161 in main () at main.c:9\n9\t  f();\n"),
    ]);

    let frame = gdb.return_from_frame(Some("0")).unwrap();
    assert_eq!(frame.number, 0);
    assert_eq!(frame.location.pc_address(), Some(0x555555555161));
    assert_eq!(*sent.borrow(), vec!["return 0", "y"]);
}

#[test]
fn test_run_fresh() {
    let (mut gdb, sent) = session(&[("run --verbose", "Starting program: /tmp/a.out --verbose\n")]);

    let outcome = gdb.run(Some("--verbose")).unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Started("Starting program: /tmp/a.out --verbose\n".to_string())
    );
    assert_eq!(*sent.borrow(), vec!["run --verbose"]);
}

#[test]
fn test_start_restarts_running_program() {
    let (mut gdb, sent) = session(&[
        (
            "start",
            "The program being debugged has been started already.\n\
             Start it from the beginning? (y or n) ",
        ),
        (
            "y",
            "Temporary breakpoint 2 at 0x1151: file main.c, line 5.\n\
             Starting program: /tmp/a.out\n",
        ),
    ]);

    let outcome = gdb.start(None).unwrap();
    assert!(matches!(outcome, RunOutcome::Restarted(_)));
    assert!(outcome.output().contains("Starting program"));
    assert_eq!(*sent.borrow(), vec!["start", "y"]);
}

#[test]
fn test_attach_refused() {
    let (mut gdb, _) = session(&[(
        "attach 4242",
        "Unable to access task for process-id 4242: (os/kern) failure.\n",
    )]);

    match gdb.attach(&4242u32) {
        Err(ConsoleError::AttachRefused(message)) => {
            assert!(message.starts_with("Unable to access task"));
        }
        other => panic!("Expected AttachRefused, got {:?}", other),
    }
}

#[test]
fn test_attach_refused_on_second_line() {
    let (mut gdb, _) = session(&[(
        "attach 4242",
        "Attaching to process 4242\nUnable to attach: ptrace: Operation not permitted.\n",
    )]);

    match gdb.attach(&4242u32) {
        Err(ConsoleError::AttachRefused(message)) => {
            assert_eq!(message, "Unable to attach: ptrace: Operation not permitted.");
        }
        other => panic!("Expected AttachRefused, got {:?}", other),
    }
}

#[test]
fn test_attach_single_line_reply() {
    // 2行目がない応答でも失敗しない
    let (mut gdb, _) = session(&[("attach 4242", "Attaching to process 4242\n")]);
    assert_eq!(gdb.attach(&4242u32).unwrap(), "Attaching to process 4242\n");
}

#[test]
fn test_kill() {
    let (mut gdb, sent) = session(&[
        ("kill", "The program is not being run.\n"),
        ("kill", "Kill the program being debugged? (y or n) "),
        ("y", "[Inferior 1 (process 4242) killed]\n"),
    ]);

    assert_eq!(gdb.kill().unwrap(), KillOutcome::NotRunning);
    assert_eq!(
        gdb.kill().unwrap(),
        KillOutcome::Killed("[Inferior 1 (process 4242) killed]\n".to_string())
    );
    assert_eq!(*sent.borrow(), vec!["kill", "kill", "y"]);
}

#[test]
fn test_registers() {
    let (mut gdb, _) = session(&[
        (
            "info registers",
            "eax            0x1c\t28\n\
             eip            0x950aa9e6\t0x950aa9e6 <mach_msg_trap+10>\n",
        ),
        ("info registers eip", "eip            0x950aa9e6\t0x950aa9e6 <mach_msg_trap+10>\n"),
        ("info registers eip", "The program has no registers now.\n"),
    ]);

    let regs = gdb.info_registers().unwrap();
    assert_eq!(regs.len(), 2);
    assert_eq!(regs["eax"].value, "28");

    let eip = gdb.info_register("eip").unwrap().unwrap();
    assert_eq!(eip.value, "<mach_msg_trap+10>");

    assert_eq!(gdb.info_register("eip").unwrap(), None);
}

#[test]
fn test_command_arguments() {
    let (mut gdb, sent) = session(&[
        ("step 3", ""),
        ("next", ""),
        ("break main.c:12", "Breakpoint 1 at 0x1139: file main.c, line 12.\n"),
        ("continue 2", ""),
        ("file /tmp/a.out", "Reading symbols from /tmp/a.out...\n"),
    ]);

    gdb.step(Some(3)).unwrap();
    gdb.next(None).unwrap();
    let txt = gdb.set_breakpoint(Some("main.c:12")).unwrap();
    assert!(txt.starts_with("Breakpoint 1"));
    gdb.continue_execution(Some(2)).unwrap();
    gdb.file("/tmp/a.out").unwrap();

    assert_eq!(
        *sent.borrow(),
        vec!["step 3", "next", "break main.c:12", "continue 2", "file /tmp/a.out"]
    );
}

#[test]
fn test_malformed_listing_is_an_error() {
    let (mut gdb, _) = session(&[("backtrace", "#0  main () at main.c:3\nwarning: garbage\n")]);
    assert!(matches!(gdb.backtrace(), Err(ConsoleError::Parse { .. })));
}

#[test]
fn test_console_exit_is_reported() {
    // 台本にないコマンドには応答がなく、ストリームが終端する
    let (mut gdb, _) = session(&[]);
    match gdb.execute("info functions") {
        Err(ConsoleError::Disconnected { partial }) => assert_eq!(partial, ""),
        other => panic!("Expected Disconnected, got {:?}", other),
    }
}

#[test]
fn test_quit_sends_q_and_shuts_down() {
    let transport = ScriptedTransport::new("", &[]);
    let sent = Rc::clone(&transport.sent);
    let shut_down = Rc::clone(&transport.shut_down);
    let gdb = Gdb::with_transport(transport, PROMPT).unwrap();

    gdb.quit().unwrap();
    assert_eq!(*sent.borrow(), vec!["q"]);
    assert!(*shut_down.borrow());
}
