//! Intcode Runtime - CLI
//!
//! Command-line front end: run a program, search amplifier phase settings,
//! or brute-force a noun/verb patch.

use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use intcode_core::log::{self, Level};
use intcode_core::{error, info, Interpreter, Program, VmConfig};
use intcode_link::ascii;
use intcode_link::search::find_noun_verb;
use intcode_link::{max_signal, Pipeline, PipelineConfig, Topology};

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(name = "intcode", version, about = "Intcode virtual machine")]
struct Cli {
    /// Log every executed instruction.
    #[arg(long, global = true)]
    trace: bool,

    /// Only log errors.
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Upper bound on memory cells per machine.
    #[arg(long, global = true, value_name = "CELLS")]
    max_memory: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a program to completion and print its output.
    Run {
        file: PathBuf,
        /// Comma-separated input values.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        input: Vec<i64>,
        /// Text line fed as ASCII after `--input`; may be repeated.
        #[arg(long, value_name = "LINE")]
        ascii: Vec<String>,
        /// Patch memory before running.
        #[arg(long = "set", value_name = "ADDR=VAL", value_parser = parse_assignment)]
        set: Vec<(usize, i64)>,
        /// Print a memory cell after the run; may be repeated.
        #[arg(long, value_name = "ADDR")]
        dump: Vec<usize>,
        /// Print output as text, with any non-ASCII value on its own line.
        #[arg(long)]
        render_ascii: bool,
    },
    /// Find the phase ordering that maximises an amplifier signal.
    Amplify {
        file: PathBuf,
        /// Feed the last amplifier back into the first.
        #[arg(long)]
        feedback: bool,
        /// Phase set to permute. Defaults to 0-4, or 5-9 with `--feedback`.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        phases: Option<Vec<i64>>,
    },
    /// Find the noun and verb that leave TARGET at address 0.
    Search {
        file: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        target: i64,
        /// Exclusive upper bound for noun and verb.
        #[arg(long, default_value_t = 100)]
        max: i64,
    },
}

fn parse_assignment(raw: &str) -> Result<(usize, i64), String> {
    let (address, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ADDR=VAL, got {:?}", raw))?;
    let address = address
        .trim()
        .parse()
        .map_err(|e| format!("bad address {:?}: {}", address, e))?;
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("bad value {:?}: {}", value, e))?;
    Ok((address, value))
}

impl Cli {
    fn vm_config(&self) -> VmConfig {
        let config = VmConfig::new().with_trace(self.trace);
        match self.max_memory {
            Some(cells) => config.with_max_memory_cells(cells),
            None => config,
        }
    }

    fn configure_logging(&self) {
        if self.quiet {
            log::set_min_level(Level::Error);
        } else if self.trace {
            log::set_min_level(Level::Debug);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    cli.configure_logging();

    if let Err(e) = execute(&cli) {
        error!("{}", e);
        process::exit(1);
    }
}

fn execute(cli: &Cli) -> CliResult {
    let config = cli.vm_config();
    match &cli.command {
        Command::Run {
            file,
            input,
            ascii: lines,
            set,
            dump,
            render_ascii,
        } => {
            let program = Program::load(file)?;
            info!("loaded {} cells from {}", program.len(), file.display());
            let mut vm = Interpreter::with_config(&program, config);
            for &(address, value) in set {
                vm.poke(address, value)?;
            }

            let mut values = input.clone();
            values.extend(ascii::encode_lines(lines.iter().map(String::as_str)));
            let output = vm.run_with_input(values)?;

            if *render_ascii {
                let decoded = ascii::decode(&output);
                print!("{}", decoded.text);
                for value in &decoded.other {
                    println!("{}", value);
                }
            } else {
                for value in &output {
                    println!("{}", value);
                }
            }
            for &address in dump {
                println!("[{}] = {}", address, vm.peek(address));
            }
        }

        Command::Amplify {
            file,
            feedback,
            phases,
        } => {
            let program = Program::load(file)?;
            let topology = if *feedback {
                Topology::Feedback
            } else {
                Topology::Chain
            };
            let phase_set = match phases {
                Some(phases) => phases.clone(),
                None if *feedback => (5..10).collect(),
                None => (0..5).collect(),
            };
            let pipeline = Pipeline::new(
                Interpreter::with_config(&program, config),
                PipelineConfig::default(),
            );
            let best = max_signal(&pipeline, &phase_set, topology)?;
            info!("best phases {:?}", best.phases);
            println!("{}", best.signal);
        }

        Command::Search { file, target, max } => {
            let program = Program::load(file)?;
            let template = Interpreter::with_config(&program, config);
            match find_noun_verb(&template, *target, *max)? {
                Some((noun, verb)) => {
                    info!("noun {} verb {}", noun, verb);
                    println!("{}", 100 * noun + verb);
                }
                None => return Err(format!("no noun/verb below {} yields {}", max, target).into()),
            }
        }
    }
    Ok(())
}
