//! Duet demo driver
//!
//! Thin front end over `duet-core`: builds object graphs through the
//! VM API and prints the collection reports. All of the interesting
//! behavior lives in the core crate.

use anyhow::Result;
use clap::{Parser, Subcommand};
use duet_core::{Vm, VmOptions};

#[derive(Parser)]
#[command(name = "duet")]
#[command(about = "Duet toy VM and mark-sweep garbage collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demonstration scenarios
    Demo,

    /// Allocation churn exercising the adaptive trigger
    Stress {
        /// Number of objects to allocate
        #[arg(short = 'n', long, default_value_t = 1_000_000)]
        count: usize,

        /// Rolling number of roots to keep live
        #[arg(long, default_value_t = 64)]
        window: usize,

        /// Value stack capacity
        #[arg(long, default_value_t = 256)]
        stack_capacity: usize,
    },
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::Demo => demo(),
        Commands::Stress {
            count,
            window,
            stack_capacity,
        } => stress(count, window, stack_capacity),
    }
}

fn demo() -> Result<()> {
    println!("scenario 1: objects on the stack are preserved");
    let mut vm = Vm::new();
    vm.push_int(1)?;
    vm.push_int(2)?;
    println!("  {}", vm.collect());

    println!("scenario 2: unreachable objects are collected");
    let mut vm = Vm::new();
    vm.push_int(1)?;
    vm.push_int(2)?;
    vm.pop()?;
    vm.pop()?;
    println!("  {}", vm.collect());

    println!("scenario 3: nested pairs are reached");
    let mut vm = Vm::new();
    vm.push_int(1)?;
    vm.push_int(2)?;
    vm.push_pair()?;
    vm.push_int(3)?;
    vm.push_int(4)?;
    vm.push_pair()?;
    vm.push_pair()?;
    println!("  {}", vm.collect());

    println!("scenario 4: cycles terminate and stale tails are freed");
    let mut vm = Vm::new();
    vm.push_int(1)?;
    vm.push_int(2)?;
    let a = vm.push_pair()?;
    vm.push_int(3)?;
    vm.push_int(4)?;
    let b = vm.push_pair()?;
    vm.set_tail(a, b)?;
    vm.set_tail(b, a)?;
    println!("  {}", vm.collect());

    Ok(())
}

fn stress(count: usize, window: usize, stack_capacity: usize) -> Result<()> {
    let mut vm = Vm::with_options(VmOptions {
        stack_capacity,
        ..VmOptions::default()
    });

    for i in 0..count {
        vm.push_int(i as i64)?;
        if vm.stack_depth() > window {
            vm.pop()?;
        }
    }
    println!("final {}", vm.collect());

    let stats = vm.gc_stats();
    println!(
        "{} collections, {} objects freed, {:?} total pause ({:?} last)",
        stats.collections, stats.objects_freed, stats.total_pause_time, stats.last_pause_time
    );
    Ok(())
}
