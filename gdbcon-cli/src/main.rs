//! gdbcon CLI - コマンドラインインターフェース
//!
//! gdbをパイプ越しに操作し、その応答を構造化して表示するREPLとデモ

mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gdbcon_core::{
    Command, ConsoleConfig, FrameRecord, Gdb, RegisterRecord, Transport, VariableRecord,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

/// gdbcon - structured front-end for the gdb console
#[derive(Parser)]
#[command(name = "gdbcon")]
#[command(version = "0.1.0")]
#[command(about = "Drive gdb over pipes and parse its replies", long_about = None)]
struct Cli {
    /// Path to the gdb executable
    #[arg(long, global = true, default_value = "gdb")]
    gdb: PathBuf,

    /// Prompt printed by gdb when it is ready for a command
    #[arg(long, global = true, default_value = "(gdb) ")]
    prompt: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Load a program, start it and print threads, stack and registers
    Demo {
        /// Path to the executable binary
        binary: String,

        /// Arguments to pass to the program
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Interactive session
    Repl {
        /// Path to the executable binary to load
        binary: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = ConsoleConfig::default()
        .with_program(&cli.gdb)
        .with_prompt(cli.prompt.clone());

    match cli.command {
        CliCommand::Demo { binary, args } => run_demo(&config, &binary, &args),
        CliCommand::Repl { binary } => {
            let mut gdb = Gdb::launch(&config)?;
            if let Some(binary) = binary {
                info!("Loading {}", binary);
                print!("{}", gdb.file(&binary)?);
            }
            run_repl(&mut gdb)?;
            gdb.quit()?;
            Ok(())
        }
    }
}

/// プログラムを起動し、スレッド・スタック・レジスタを表示する
fn run_demo(config: &ConsoleConfig, binary: &str, args: &[String]) -> Result<()> {
    let gdb = Gdb::launch(config)?;
    info!("Running demo on {}", binary);
    demo(gdb, binary, args, &mut io::stdout().lock())
}

/// デモの流れを実行し、結果を `out` に書き出す
///
/// `start` の後に3行進め、各フレームのローカル変数も表示します。
fn demo<T: Transport>(
    mut gdb: Gdb<T>,
    binary: &str,
    args: &[String],
    out: &mut impl Write,
) -> Result<()> {
    debug!("{}", gdb.file(binary)?.trim_end());
    let program_args = args.join(" ");
    let outcome = gdb.start(Some(program_args.as_str()))?;
    debug!("{}", outcome.output().trim_end());

    for thread in gdb.info_threads()?.values() {
        write!(out, "{}", thread.info(&mut gdb)?)?;
    }

    gdb.step(Some(3))?;

    for frame in gdb.backtrace()?.values() {
        writeln!(out, "{}", frame.location.function)?;
        for local in frame.locals(&mut gdb)?.values() {
            writeln!(out, "{}: {}", local.name, local.value)?;
        }
        writeln!(out)?;
    }

    for reg in gdb.info_registers()?.values() {
        writeln!(out, "{} = {} {}", reg.name, reg.hex_value, reg.value)?;
    }

    gdb.quit()?;
    Ok(())
}

/// REPLループを実行する
fn run_repl(gdb: &mut Gdb) -> Result<()> {
    println!("Type 'help' for available commands, 'quit' to exit.");
    println!();

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline("(gdbcon) ");
        match readline {
            Ok(line) => {
                let Some(command) = Command::parse(&line) else {
                    continue;
                };
                rl.add_history_entry(line.trim())?;

                if command == Command::Quit {
                    break;
                }
                if let Err(e) = handle_command(gdb, command) {
                    eprintln!("Error: {}", e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

fn handle_command(gdb: &mut Gdb, command: Command) -> Result<()> {
    match command {
        Command::Help => print_help(),
        Command::Quit => {}
        Command::Threads => {
            let threads = gdb.info_threads()?;
            if threads.is_empty() {
                println!("No threads");
            }
            for thread in threads.values() {
                let marker = if thread.current { "*" } else { " " };
                println!(
                    "{} {:>3}  pid {}  tid {}  {}",
                    marker,
                    thread.number,
                    thread.pid,
                    thread.tid,
                    thread.location.function
                );
            }
        }
        Command::Backtrace => {
            let frames = gdb.backtrace()?;
            if frames.is_empty() {
                println!("No stack");
            }
            for frame in frames.values() {
                print_frame(frame);
            }
        }
        Command::Registers(None) => {
            let regs = gdb.info_registers()?;
            if regs.is_empty() {
                println!("No registers");
            }
            for reg in regs.values() {
                print_register(reg);
            }
        }
        Command::Registers(Some(name)) => match gdb.info_register(&name)? {
            Some(reg) => print_register(&reg),
            None => println!("No registers"),
        },
        Command::Locals => print_variables("locals", &gdb.info_locals()?),
        Command::Args => print_variables("arguments", &gdb.info_args()?),
        Command::Frame(num) => print_frame(&gdb.frame(num)?),
        Command::Up => match gdb.up(None)? {
            Some(frame) => print_frame(&frame),
            None => println!("Already at the outermost frame"),
        },
        Command::Down => match gdb.down(None)? {
            Some(frame) => print_frame(&frame),
            None => println!("Already at the innermost frame"),
        },
        Command::Raw(line) => print!("{}", gdb.execute(&line)?),
    }

    Ok(())
}

fn print_frame(frame: &FrameRecord) {
    let loc = &frame.location;
    let pc = loc.pc.as_deref().unwrap_or("-");
    print!("#{:<3} {:>18}  {} ({})", frame.number, pc, loc.function, loc.args);
    match &loc.source {
        Some(source) => println!(" at {}", source),
        None => println!(),
    }
}

fn print_register(reg: &RegisterRecord) {
    println!("{:<10} {:>18}  {}", reg.name, reg.hex_value, reg.value);
}

/// 変数の一覧を表示するヘルパー関数
fn print_variables(title: &str, vars: &BTreeMap<String, VariableRecord>) {
    if vars.is_empty() {
        println!("No {}", title);
        return;
    }
    for var in vars.values() {
        println!("  {} = {}", var.name, var.value);
    }
}

fn print_help() {
    println!("Available commands:");
    println!();
    println!("  help           - Show this help message");
    println!("  quit/exit/q    - Exit gdbcon");
    println!();
    println!("Parsed views:");
    println!("  threads        - List threads");
    println!("  bt             - Show the backtrace");
    println!("  regs [name]    - Show registers");
    println!("  locals         - Show locals of the selected frame");
    println!("  args           - Show arguments of the selected frame");
    println!("  frame [n]      - Select and show a frame");
    println!("  up / down      - Move one frame out / in");
    println!();
    println!("Anything else is sent to gdb as is, for example:");
    println!("  break main");
    println!("  run");
    println!("  next");
}
