use clap::Parser;
use lc3vm::console::{self, RawModeGuard, Terminal};
use lc3vm::vm::{Args, VM};
use log::error;

fn main() {
    env_logger::init();

    let args = Args::parse();

    let mut vm = match VM::boot(&args, Terminal::new()) {
        Ok(vm) => vm,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = ctrlc::set_handler(|| console::interrupt()) {
        error!("failed to install interrupt handler: {}", err);
    }

    let guard = match RawModeGuard::new() {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("failed to switch the terminal to raw mode: {}", err);
            std::process::exit(1);
        }
    };

    let mut fatal = false;
    while vm.is_running() {
        if let Err(code) = vm.next() {
            error!("{}, halting...", code);
            vm.abort();
            fatal = true;
        }
    }

    // Restore the terminal before any abnormal exit.
    drop(guard);

    if fatal {
        std::process::abort();
    }
}
